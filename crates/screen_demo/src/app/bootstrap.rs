use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use screen_engine::{ConfigValidationError, ManagerConfig};
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

pub(crate) const CONFIG_ENV_VAR: &str = "SCREEN_DEMO_CONFIG";
pub(crate) const HEADLESS_ENV_VAR: &str = "SCREEN_DEMO_HEADLESS";
const SCREENSHOT_DIR: &str = "screenshots";

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config {} at {json_path}: {source}", path.display())]
    Parse {
        path: PathBuf,
        json_path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid config {}: {source}", path.display())]
    Invalid {
        path: PathBuf,
        #[source]
        source: ConfigValidationError,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Presentation {
    Window,
    Headless,
}

pub(crate) struct AppWiring {
    pub(crate) config: ManagerConfig,
    pub(crate) presentation: Presentation,
    pub(crate) screenshot_dir: PathBuf,
}

pub(crate) fn build_app() -> Result<AppWiring, ConfigError> {
    init_tracing();
    info!("=== Screen Demo Startup ===");

    let config = match env::var_os(CONFIG_ENV_VAR) {
        Some(path) => load_config(Path::new(&path))?,
        None => ManagerConfig::default(),
    };
    let presentation = if is_truthy(env::var(HEADLESS_ENV_VAR).ok().as_deref()) {
        Presentation::Headless
    } else {
        Presentation::Window
    };
    info!(
        presentation = ?presentation,
        target_framerate = config.target_framerate,
        transitions_enabled = config.transitions_enabled,
        "config_resolved"
    );

    Ok(AppWiring {
        config,
        presentation,
        screenshot_dir: PathBuf::from(SCREENSHOT_DIR),
    })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}

pub(crate) fn load_config(path: &Path) -> Result<ManagerConfig, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse_config(&raw, path)?;
    config.validate().map_err(|source| ConfigError::Invalid {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), "config_loaded");
    Ok(config)
}

fn parse_config(raw: &str, path: &Path) -> Result<ManagerConfig, ConfigError> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|error| {
        let json_path = error.path().to_string();
        ConfigError::Parse {
            path: path.to_path_buf(),
            json_path,
            source: error.into_inner(),
        }
    })
}

fn is_truthy(value: Option<&str>) -> bool {
    matches!(
        value.map(|v| v.trim().to_ascii_lowercase()).as_deref(),
        Some("1" | "true" | "yes" | "on")
    )
}
