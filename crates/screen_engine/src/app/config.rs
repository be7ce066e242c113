use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use super::scheduler::DEFAULT_TARGET_FRAMERATE;

pub const SLOW_FRAME_ENV_VAR: &str = "SCREEN_ENGINE_SLOW_FRAME_MS";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigValidationError {
    #[error("target_framerate must be a positive finite number, got {0}")]
    TargetFramerate(f32),
    #[error("game_speed_multiplier must be a positive finite number, got {0}")]
    GameSpeedMultiplier(f32),
    #[error("window size must be non-zero, got {width}x{height}")]
    WindowSize { width: u32, height: u32 },
}

/// Flags and pacing values the run loop consults every iteration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagerConfig {
    pub window_title: String,
    pub window_width: u32,
    pub window_height: u32,
    pub target_framerate: f32,
    pub transitions_enabled: bool,
    pub show_fps: bool,
    pub show_controller: bool,
    pub developer_mode: bool,
    pub pause_on_focus_loss: bool,
    pub use_fullscreen: bool,
    /// Developer pacing multiplier; values above 1 slow the loop down in wall time.
    pub game_speed_multiplier: f32,
    pub simulated_slow_frame_ms: u64,
    pub metrics_interval_ms: u64,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            window_title: "Screen Engine".to_string(),
            window_width: 800,
            window_height: 600,
            target_framerate: DEFAULT_TARGET_FRAMERATE,
            transitions_enabled: true,
            show_fps: false,
            show_controller: false,
            developer_mode: false,
            pause_on_focus_loss: true,
            use_fullscreen: false,
            game_speed_multiplier: 1.0,
            simulated_slow_frame_ms: 0,
            metrics_interval_ms: 500,
        }
    }
}

impl ManagerConfig {
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if !(self.target_framerate.is_finite() && self.target_framerate > 0.0) {
            return Err(ConfigValidationError::TargetFramerate(
                self.target_framerate,
            ));
        }
        if !(self.game_speed_multiplier.is_finite() && self.game_speed_multiplier > 0.0) {
            return Err(ConfigValidationError::GameSpeedMultiplier(
                self.game_speed_multiplier,
            ));
        }
        if self.window_width == 0 || self.window_height == 0 {
            return Err(ConfigValidationError::WindowSize {
                width: self.window_width,
                height: self.window_height,
            });
        }
        Ok(())
    }

    pub fn metrics_interval(&self) -> Duration {
        normalize_non_zero_duration(
            Duration::from_millis(self.metrics_interval_ms),
            Duration::from_millis(500),
        )
    }
}

pub(crate) fn normalize_non_zero_duration(value: Duration, fallback: Duration) -> Duration {
    if value.is_zero() {
        fallback
    } else {
        value
    }
}

pub(crate) fn resolve_slow_frame_delay(config_slow_frame_ms: u64) -> Duration {
    parse_slow_frame_delay(env::var(SLOW_FRAME_ENV_VAR), config_slow_frame_ms)
}

fn parse_slow_frame_delay(
    value: Result<String, env::VarError>,
    config_slow_frame_ms: u64,
) -> Duration {
    match value {
        Ok(value) => match value.trim().parse::<u64>() {
            Ok(ms) => Duration::from_millis(ms),
            Err(_) => {
                warn!(
                    env_var = SLOW_FRAME_ENV_VAR,
                    value = value.as_str(),
                    "invalid slow-frame env var value; falling back to config"
                );
                Duration::from_millis(config_slow_frame_ms)
            }
        },
        Err(env::VarError::NotPresent) => Duration::from_millis(config_slow_frame_ms),
        Err(err) => {
            warn!(
                env_var = SLOW_FRAME_ENV_VAR,
                error = %err,
                "unable to read slow-frame env var; falling back to config"
            );
            Duration::from_millis(config_slow_frame_ms)
        }
    }
}
