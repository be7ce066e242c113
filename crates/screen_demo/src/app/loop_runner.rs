use std::process::ExitCode;

use screen_engine::{
    create_platform, EventSource, HeadlessVideo, ManagerConfig, PlatformError, RunError,
    ScreenManager, VideoBackend,
};
use thiserror::Error;
use tracing::{error, info};

use super::autopilot::AutopilotEvents;
use super::bootstrap::{AppWiring, Presentation};
use super::help_overlay::HelpOverlay;
use super::screens::TitleScreen;

#[derive(Debug, Error)]
enum DemoError {
    #[error(transparent)]
    Platform(#[from] PlatformError),
    #[error("run loop failed: {0}")]
    Run(#[from] RunError),
}

pub(crate) fn run(app: AppWiring) -> ExitCode {
    if let Err(err) = run_demo(app) {
        error!(error = %err, "demo_failed");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn run_demo(app: AppWiring) -> Result<(), DemoError> {
    let manager = match app.presentation {
        Presentation::Window => {
            let (events, video) = create_platform(&app.config, app.screenshot_dir)?;
            build_manager(app.config, Box::new(video), Box::new(events))
        }
        Presentation::Headless => {
            let video = HeadlessVideo::new(app.config.window_width, app.config.window_height);
            build_manager(
                app.config,
                Box::new(video),
                Box::new(AutopilotEvents::demo_script()),
            )
        }
    };
    finish(manager)
}

fn build_manager(
    config: ManagerConfig,
    video: Box<dyn VideoBackend>,
    events: Box<dyn EventSource>,
) -> ScreenManager {
    let mut manager = ScreenManager::new(config, video, events);
    manager.add_overlay(Box::new(HelpOverlay::default()));
    manager.push_screen(Box::new(TitleScreen::new()), None);
    manager
}

fn finish(mut manager: ScreenManager) -> Result<(), DemoError> {
    manager.run()?;
    let metrics = manager.metrics_handle().snapshot();
    info!(
        real_time = manager.real_time(),
        game_time = manager.game_time(),
        fps = metrics.fps,
        tps = metrics.tps,
        "demo_finished"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use screen_engine::{FrameClock, InputEvent, Key};

    use super::*;
    use crate::app::autopilot::DEMO_SCRIPT_DEADLINE;

    /// Time only moves when the loop sleeps.
    struct SleepClock {
        now: Instant,
    }

    impl FrameClock for SleepClock {
        fn now(&self) -> Instant {
            self.now
        }

        fn sleep(&mut self, duration: Duration) {
            self.now += duration;
        }
    }

    fn headless_manager(events: AutopilotEvents) -> ScreenManager {
        let config = ManagerConfig::default();
        let video = HeadlessVideo::new(config.window_width, config.window_height);
        build_manager(config, Box::new(video), Box::new(events)).with_frame_clock(SleepClock {
            now: Instant::now(),
        })
    }

    #[test]
    fn demo_script_quits_through_the_menu_before_deadline() {
        let mut manager = headless_manager(AutopilotEvents::demo_script());

        manager.run().expect("demo run");

        assert_eq!(manager.stack_len(), 0);
        let deadline = f64::from(DEMO_SCRIPT_DEADLINE) / f64::from(manager.target_framerate());
        assert!(
            manager.real_time() < deadline,
            "quit took {}s",
            manager.real_time()
        );
        // The session paused for ten steps, so game time lags real time.
        assert!(manager.game_time() < manager.real_time());
    }

    #[test]
    fn escape_on_title_quits() {
        let events = AutopilotEvents::new(vec![
            (2, InputEvent::key_down(Key::Escape)),
            (120, InputEvent::CloseRequested),
        ]);
        let mut manager = headless_manager(events);

        manager.run().expect("run");

        assert_eq!(manager.stack_len(), 0);
        assert!(manager.real_time() < 1.0);
    }
}
