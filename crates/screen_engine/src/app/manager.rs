use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info, warn};

use super::action::ActionQueue;
use super::backend::{
    AudioSink, BackendError, EventSource, NoAudio, NoScripts, ScriptHost, VideoBackend,
};
use super::config::{resolve_slow_frame_delay, ManagerConfig};
use super::drawing::DrawingContext;
use super::fade::ScreenFade;
use super::input::{InputEvent, InputManager, Key, Modifiers};
use super::metrics::{MetricsAccumulator, MetricsHandle};
use super::overlay::{draw_developer_line, draw_fps, ControllerHud, Overlay};
use super::scheduler::{FrameClock, FrameScheduler, GameClock, SystemClock};
use super::screen::{Screen, ScreenContext, ScreenError};
use super::stack::{reconcile, ReconcileReport, ScreenStack};

#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Screen(#[from] ScreenError),
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Owns the screen stack and drives it with a fixed-timestep loop.
///
/// Screens request transitions through [`ScreenContext`]; the manager applies
/// them between iterations, once any running fade has finished.
pub struct ScreenManager {
    config: ManagerConfig,
    stack: ScreenStack,
    actions: ActionQueue,
    clock: GameClock,
    scheduler: FrameScheduler,
    input: InputManager,
    overlays: Vec<Box<dyn Overlay>>,
    controller_hud: ControllerHud,
    video: Box<dyn VideoBackend>,
    events: Box<dyn EventSource>,
    scripts: Box<dyn ScriptHost>,
    audio: Box<dyn AudioSink>,
    frame_clock: Box<dyn FrameClock>,
    metrics: MetricsAccumulator,
    metrics_handle: MetricsHandle,
    fps: f32,
    slow_frame_delay: Duration,
}

impl ScreenManager {
    pub fn new(
        config: ManagerConfig,
        mut video: Box<dyn VideoBackend>,
        events: Box<dyn EventSource>,
    ) -> Self {
        let mut scheduler = FrameScheduler::new(config.target_framerate);
        scheduler.set_pacing_multiplier(config.game_speed_multiplier);
        if config.use_fullscreen {
            video.set_fullscreen(true);
        }

        Self {
            stack: ScreenStack::new(),
            actions: ActionQueue::new(config.transitions_enabled),
            clock: GameClock::default(),
            scheduler,
            input: InputManager::new(),
            overlays: Vec::new(),
            controller_hud: ControllerHud,
            video,
            events,
            scripts: Box::new(NoScripts),
            audio: Box::new(NoAudio),
            frame_clock: Box::new(SystemClock),
            metrics: MetricsAccumulator::new(config.metrics_interval()),
            metrics_handle: MetricsHandle::default(),
            fps: 0.0,
            slow_frame_delay: resolve_slow_frame_delay(config.simulated_slow_frame_ms),
            config,
        }
    }

    pub fn with_script_host(mut self, scripts: impl ScriptHost + 'static) -> Self {
        self.scripts = Box::new(scripts);
        self
    }

    pub fn with_audio(mut self, audio: impl AudioSink + 'static) -> Self {
        self.audio = Box::new(audio);
        self
    }

    pub fn with_frame_clock(mut self, clock: impl FrameClock + 'static) -> Self {
        self.frame_clock = Box::new(clock);
        self
    }

    /// Publishes loop metrics into an existing handle instead of a private one.
    pub fn with_metrics_handle(mut self, handle: MetricsHandle) -> Self {
        self.metrics_handle = handle;
        self
    }

    pub fn add_overlay(&mut self, overlay: Box<dyn Overlay>) {
        self.overlays.push(overlay);
    }

    pub fn push_screen(&mut self, screen: Box<dyn Screen>, fade: Option<Box<dyn ScreenFade>>) {
        self.actions.push_screen(screen, fade);
    }

    pub fn pop_screen(&mut self, fade: Option<Box<dyn ScreenFade>>) {
        self.actions.pop_screen(fade);
    }

    pub fn quit(&mut self, fade: Option<Box<dyn ScreenFade>>) {
        self.actions.quit(fade);
    }

    pub fn set_screen_fade(&mut self, fade: Option<Box<dyn ScreenFade>>) {
        self.actions.set_screen_fade(fade);
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.clock.set_speed(speed);
    }

    pub fn speed(&self) -> f32 {
        self.clock.speed()
    }

    pub fn set_target_framerate(&mut self, framerate: f32) {
        self.scheduler.set_target_framerate(framerate);
        self.config.target_framerate = self.scheduler.target_framerate();
    }

    pub fn target_framerate(&self) -> f32 {
        self.scheduler.target_framerate()
    }

    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    /// Changes take effect at the start of the next loop iteration.
    pub fn config_mut(&mut self) -> &mut ManagerConfig {
        &mut self.config
    }

    pub fn stack_len(&self) -> usize {
        self.stack.len()
    }

    pub fn top_screen_name(&self) -> Option<&str> {
        self.stack.top_name()
    }

    pub fn game_time(&self) -> f64 {
        self.clock.game_time()
    }

    pub fn real_time(&self) -> f64 {
        self.clock.real_time()
    }

    pub fn metrics_handle(&self) -> MetricsHandle {
        self.metrics_handle.clone()
    }

    /// Applies pending stack actions unless the active fade is still running.
    pub fn handle_screen_switch(&mut self) -> Result<ReconcileReport, ScreenError> {
        let report = reconcile(
            &mut self.stack,
            &mut self.actions,
            &mut self.clock,
            self.scripts.as_mut(),
        )?;
        if report.deferred {
            debug!(pending = self.actions.len(), "fade_deferred");
        }
        Ok(report)
    }

    /// Runs until the screen stack is empty.
    pub fn run(&mut self) -> Result<(), RunError> {
        self.handle_screen_switch()?;
        let mut last = self.frame_clock.now();
        self.metrics.start(last);
        info!(
            target_framerate = self.scheduler.target_framerate(),
            depth = self.stack.len(),
            top = self.stack.top_name().unwrap_or("<none>"),
            "run_loop_start"
        );

        while !self.stack.is_empty() {
            self.sync_config();
            if !self.slow_frame_delay.is_zero() {
                self.frame_clock.sleep(self.slow_frame_delay);
            }

            let now = self.frame_clock.now();
            let elapsed = now.saturating_duration_since(last);
            last = now;

            let plan = self.scheduler.plan(elapsed);
            if !plan.dropped_backlog.is_zero() {
                self.metrics.record_stall();
                debug!(
                    dropped_ms = plan.dropped_backlog.as_secs_f64() * 1000.0,
                    "frame_stall_discarded"
                );
            }
            if !plan.sleep.is_zero() {
                self.frame_clock.sleep(plan.sleep);
                last += plan.sleep;
            }

            for _ in 0..plan.steps {
                self.step()?;
            }

            if !self.stack.is_empty() {
                self.draw_frame()?;
                let frame_end = self.frame_clock.now();
                self.metrics
                    .record_frame(frame_end.saturating_duration_since(now));
                if let Some(snapshot) = self.metrics.maybe_snapshot(frame_end) {
                    self.fps = snapshot.fps;
                    self.metrics_handle.publish(snapshot);
                    debug!(
                        fps = snapshot.fps,
                        tps = snapshot.tps,
                        frame_time_ms = snapshot.frame_time_ms,
                        dropped_stalls = snapshot.dropped_stalls,
                        "loop_metrics"
                    );
                }
            }

            self.audio.update();
            self.handle_screen_switch()?;
        }

        info!(
            real_time = self.clock.real_time(),
            game_time = self.clock.game_time(),
            "run_loop_end"
        );
        Ok(())
    }

    fn sync_config(&mut self) {
        if self.actions.transitions_enabled() != self.config.transitions_enabled {
            self.actions
                .set_transitions_enabled(self.config.transitions_enabled);
        }
        self.scheduler
            .set_target_framerate(self.config.target_framerate);
        self.scheduler
            .set_pacing_multiplier(self.config.game_speed_multiplier);
    }

    fn step(&mut self) -> Result<(), RunError> {
        let step = self.scheduler.step();
        let dt_seconds = self.clock.advance(step);
        self.input.update();
        self.process_events()?;
        self.update_gamelogic(dt_seconds, step.as_secs_f32())?;
        self.metrics.record_tick();
        Ok(())
    }

    fn process_events(&mut self) -> Result<(), RunError> {
        while let Some(event) = self.events.poll_event() {
            self.input.process_event(&event, self.video.as_ref());
            for overlay in &mut self.overlays {
                overlay.event(&event);
            }
            if let Some(top) = self.stack.top_mut() {
                top.event(&event);
            }

            match event {
                InputEvent::CloseRequested => {
                    info!("close_requested");
                    self.actions.quit(None);
                }
                InputEvent::Resized { width, height } => {
                    self.video.on_resize(width, height)?;
                    for overlay in &mut self.overlays {
                        overlay.on_resize(width, height);
                    }
                    if let Some(top) = self.stack.top_mut() {
                        top.on_resize(width, height);
                    }
                }
                InputEvent::FocusLost if self.config.pause_on_focus_loss => {
                    if let Some(top) = self.stack.top_mut() {
                        top.on_focus_lost();
                    }
                }
                InputEvent::Key {
                    key,
                    pressed: true,
                    modifiers,
                } => self.handle_hotkey(key, modifiers),
                _ => {}
            }
        }
        Ok(())
    }

    fn handle_hotkey(&mut self, key: Key, modifiers: Modifiers) {
        match key {
            Key::Function(10) => {
                self.config.show_fps = !self.config.show_fps;
                debug!(show_fps = self.config.show_fps, "show_fps_toggled");
            }
            Key::Function(11) => self.toggle_fullscreen(),
            Key::Enter if modifiers.alt => self.toggle_fullscreen(),
            Key::Function(12) | Key::PrintScreen => match self.video.take_screenshot() {
                Ok(Some(path)) => info!(path = %path.display(), "screenshot_saved"),
                Ok(None) => debug!("screenshot_unsupported"),
                Err(err) => warn!(error = %err, "screenshot_failed"),
            },
            Key::Function(2) if modifiers.ctrl => {
                self.config.developer_mode = !self.config.developer_mode;
                info!(
                    developer_mode = self.config.developer_mode,
                    "developer_mode_toggled"
                );
            }
            _ => {}
        }
    }

    fn toggle_fullscreen(&mut self) {
        self.config.use_fullscreen = !self.config.use_fullscreen;
        self.video.set_fullscreen(self.config.use_fullscreen);
        info!(fullscreen = self.config.use_fullscreen, "fullscreen_toggled");
    }

    fn update_gamelogic(&mut self, dt_seconds: f32, real_dt_seconds: f32) -> Result<(), ScreenError> {
        self.scripts.advance(self.clock.game_time());

        let controller = self.input.controller();
        if let Some(top) = self.stack.top_mut() {
            let mut ctx = ScreenContext::new(&mut self.actions, &mut self.clock);
            top.update(dt_seconds, controller, &mut ctx)?;
        }
        for overlay in &mut self.overlays {
            overlay.update(dt_seconds, controller);
        }
        // Fades run on real time so a paused game can still transition.
        if let Some(fade) = self.actions.fade_mut() {
            fade.update(real_dt_seconds);
        }
        Ok(())
    }

    fn draw_frame(&mut self) -> Result<(), RunError> {
        let (width, height) = self.video.logical_size();
        let mut context = DrawingContext::new(width, height);

        if let Some(top) = self.stack.top_mut() {
            top.draw(&mut context)?;
        }
        for overlay in &mut self.overlays {
            overlay.draw(&mut context);
        }
        if let Some(fade) = self.actions.fade() {
            fade.draw(&mut context);
        }
        if self.config.show_fps {
            draw_fps(&mut context, self.fps);
        }
        if self.config.show_controller {
            self.controller_hud
                .draw(&mut context, self.input.controller());
        }
        if self.config.developer_mode {
            draw_developer_line(&mut context, &self.clock, self.stack.len());
        }

        self.video.render(&context)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::app::backend::QueuedEvents;
    use crate::app::drawing::DrawCommand;
    use crate::app::fade::FadeToBlack;
    use crate::app::input::{Control, Controller};
    use crate::app::test_support::{
        EventLog, ManualClock, RecordingScreen, SharedScripts, SharedVideo,
    };

    fn manager(events: QueuedEvents) -> (ScreenManager, SharedVideo, ManualClock) {
        manager_with_config(ManagerConfig::default(), events)
    }

    fn manager_with_config(
        config: ManagerConfig,
        events: QueuedEvents,
    ) -> (ScreenManager, SharedVideo, ManualClock) {
        manager_with_source(config, Box::new(events))
    }

    fn manager_with_source(
        config: ManagerConfig,
        events: Box<dyn EventSource>,
    ) -> (ScreenManager, SharedVideo, ManualClock) {
        let video = SharedVideo::new(320, 240);
        let clock = ManualClock::new();
        let manager = ScreenManager::new(config, Box::new(video.clone()), events)
            .with_frame_clock(clock.clone());
        (manager, video, clock)
    }

    /// Hands out one key press per drain, so every step sees exactly one event.
    struct OnePerDrain {
        remaining: u32,
        ready: bool,
    }

    impl EventSource for OnePerDrain {
        fn poll_event(&mut self) -> Option<InputEvent> {
            if self.ready && self.remaining > 0 {
                self.ready = false;
                self.remaining -= 1;
                return Some(InputEvent::key_down(Key::Char('x')));
            }
            self.ready = true;
            None
        }
    }

    fn quit_after(updates: u32) -> impl FnMut(&Controller, &mut ScreenContext<'_>) {
        let mut remaining = updates;
        move |_, ctx| {
            remaining = remaining.saturating_sub(1);
            if remaining == 0 {
                ctx.quit(None);
            }
        }
    }

    fn has_text(frame: &[DrawCommand], needle: &str) -> bool {
        frame
            .iter()
            .any(|command| matches!(command, DrawCommand::Text { text, .. } if text == needle))
    }

    #[test]
    fn quit_from_update_ends_run_without_leave() {
        let log = EventLog::default();
        let (mut manager, video, _clock) = manager(QueuedEvents::new());
        manager.push_screen(
            Box::new(RecordingScreen::new("a", &log).with_update(quit_after(1))),
            None,
        );

        manager.run().expect("run");

        assert_eq!(manager.stack_len(), 0);
        assert_eq!(log.count("setup:a"), 1);
        assert_eq!(log.count("update:a"), 1);
        assert_eq!(log.count("leave:a"), 0);
        assert_eq!(log.count("drop:a"), 1);
        // One sleeping iteration, then one stepping iteration; each draws once.
        assert_eq!(video.borrow().frames_rendered(), 2);
    }

    #[test]
    fn quit_clears_every_layer() {
        let log = EventLog::default();
        let (mut manager, _video, _clock) = manager(QueuedEvents::new());
        manager.push_screen(RecordingScreen::boxed("a", &log), None);
        manager.push_screen(RecordingScreen::boxed("b", &log), None);
        manager.push_screen(
            Box::new(RecordingScreen::new("c", &log).with_update(quit_after(1))),
            None,
        );

        manager.run().expect("run");

        assert_eq!(manager.stack_len(), 0);
        for name in ["a", "b", "c"] {
            assert_eq!(log.count(&format!("drop:{name}")), 1);
        }
        assert_eq!(log.count("setup:a"), 0);
        assert_eq!(log.count("setup:c"), 1);
    }

    #[test]
    fn close_request_quits_at_next_reconciliation() {
        let log = EventLog::default();
        let events = [InputEvent::CloseRequested].into_iter().collect();
        let (mut manager, _video, _clock) = manager(events);
        manager.push_screen(RecordingScreen::boxed("a", &log), None);

        manager.run().expect("run");

        assert_eq!(manager.stack_len(), 0);
        assert_eq!(log.count("update:a"), 1);
    }

    #[test]
    fn step_events_reach_screen_before_its_update() {
        let log = EventLog::default();
        let events = [InputEvent::key_down(Key::Space), InputEvent::CloseRequested]
            .into_iter()
            .collect();
        let (mut manager, _video, _clock) = manager(events);
        let saw_jump = Rc::new(Cell::new(false));
        let seen = Rc::clone(&saw_jump);
        manager.push_screen(
            Box::new(
                RecordingScreen::new("a", &log)
                    .with_update(move |controller, _| seen.set(controller.pressed(Control::Jump))),
            ),
            None,
        );

        manager.run().expect("run");

        assert!(saw_jump.get());
        let entries = log.entries();
        let event_at = entries.iter().position(|e| e == "event:a").expect("event");
        let update_at = entries.iter().position(|e| e == "update:a").expect("update");
        assert!(event_at < update_at);
    }

    #[test]
    fn f10_toggles_fps_counter_in_rendered_frame() {
        let log = EventLog::default();
        let events = [
            InputEvent::key_down(Key::Function(10)),
            InputEvent::CloseRequested,
        ]
        .into_iter()
        .collect();
        let (mut manager, video, _clock) = manager(events);
        manager.push_screen(RecordingScreen::boxed("a", &log), None);

        manager.run().expect("run");

        assert!(manager.config().show_fps);
        assert!(has_text(video.borrow().last_frame(), "FPS"));
    }

    #[test]
    fn hotkeys_toggle_fullscreen_and_developer_mode() {
        let log = EventLog::default();
        let events = [
            InputEvent::Key {
                key: Key::Enter,
                pressed: true,
                modifiers: Modifiers {
                    alt: true,
                    ..Modifiers::default()
                },
            },
            InputEvent::Key {
                key: Key::Function(2),
                pressed: true,
                modifiers: Modifiers {
                    ctrl: true,
                    ..Modifiers::default()
                },
            },
            InputEvent::key_down(Key::Function(12)),
            InputEvent::CloseRequested,
        ]
        .into_iter()
        .collect();
        let (mut manager, video, _clock) = manager(events);
        manager.push_screen(RecordingScreen::boxed("a", &log), None);

        manager.run().expect("run");

        assert!(manager.config().use_fullscreen);
        assert!(video.borrow().is_fullscreen());
        assert!(manager.config().developer_mode);
    }

    #[test]
    fn focus_loss_notifies_top_screen_only_when_enabled() {
        for pause_on_focus_loss in [true, false] {
            let log = EventLog::default();
            let events = [InputEvent::FocusLost, InputEvent::CloseRequested]
                .into_iter()
                .collect();
            let config = ManagerConfig {
                pause_on_focus_loss,
                ..ManagerConfig::default()
            };
            let (mut manager, _video, _clock) = manager_with_config(config, events);
            manager.push_screen(RecordingScreen::boxed("a", &log), None);

            manager.run().expect("run");

            assert_eq!(log.count("focus_lost:a"), usize::from(pause_on_focus_loss));
        }
    }

    #[test]
    fn resize_reaches_video_backend() {
        let log = EventLog::default();
        let events = [
            InputEvent::Resized {
                width: 640,
                height: 480,
            },
            InputEvent::CloseRequested,
        ]
        .into_iter()
        .collect();
        let (mut manager, video, _clock) = manager(events);
        manager.push_screen(RecordingScreen::boxed("a", &log), None);

        manager.run().expect("run");

        assert_eq!(video.borrow().physical_size(), (640, 480));
    }

    #[test]
    fn fade_holds_back_push_until_done() {
        let log = EventLog::default();
        let (mut manager, _video, _clock) = manager(QueuedEvents::new());
        let mut next = Some(Box::new(
            RecordingScreen::new("b", &log).with_setup(|ctx| ctx.quit(None)),
        ) as Box<dyn Screen>);
        manager.push_screen(
            Box::new(RecordingScreen::new("a", &log).with_update(move |_, ctx| {
                if let Some(screen) = next.take() {
                    ctx.push_screen(screen, Some(FadeToBlack::fade_out(0.04)));
                }
            })),
            None,
        );

        manager.run().expect("run");

        // 0.04s of fade at 60 Hz needs three real-time steps.
        assert_eq!(log.count("update:a"), 3);
        let entries = log.entries();
        let leave_a = entries.iter().position(|e| e == "leave:a").expect("leave a");
        let setup_b = entries.iter().position(|e| e == "setup:b").expect("setup b");
        assert!(leave_a < setup_b);
        assert_eq!(log.count("update:b"), 0);
    }

    #[test]
    fn fade_is_drawn_above_screen() {
        let log = EventLog::default();
        let (mut manager, video, _clock) = manager(QueuedEvents::new());
        manager.push_screen(
            Box::new(RecordingScreen::new("a", &log).with_update(|_, ctx| {
                ctx.quit(Some(FadeToBlack::fade_out(0.05)));
            })),
            None,
        );

        manager.run().expect("run");

        let video = video.borrow();
        let frame = video.last_frame();
        assert!(has_text(frame, "a"));
        assert!(matches!(frame.last(), Some(DrawCommand::FillScreen { .. })));
    }

    #[test]
    fn disabled_transitions_ignore_fades() {
        let log = EventLog::default();
        let config = ManagerConfig {
            transitions_enabled: false,
            ..ManagerConfig::default()
        };
        let (mut manager, _video, _clock) = manager_with_config(config, QueuedEvents::new());
        manager.push_screen(
            Box::new(RecordingScreen::new("a", &log).with_update(|_, ctx| {
                ctx.quit(Some(FadeToBlack::fade_out(1.0)));
            })),
            None,
        );

        manager.run().expect("run");

        assert_eq!(log.count("update:a"), 1);
    }

    #[test]
    fn scripts_advance_every_step_and_wake_on_switch() {
        let log = EventLog::default();
        let scripts = SharedScripts::default();
        let (manager, _video, _clock) = manager(QueuedEvents::new());
        let mut manager = manager.with_script_host(scripts.clone());
        manager.push_screen(
            Box::new(RecordingScreen::new("a", &log).with_update(quit_after(3))),
            None,
        );

        manager.run().expect("run");

        let scripts = scripts.borrow();
        assert_eq!(scripts.advances, 3);
        assert_eq!(scripts.wakeups, 1);
        assert!((scripts.last_game_time - manager.game_time()).abs() < 1e-9);
    }

    #[test]
    fn speed_scales_game_time_but_not_real_time() {
        let log = EventLog::default();
        let (mut manager, _video, _clock) = manager(QueuedEvents::new());
        let mut updates = 0;
        manager.push_screen(
            Box::new(RecordingScreen::new("a", &log).with_update(move |_, ctx| {
                updates += 1;
                ctx.set_speed(0.5);
                if updates == 3 {
                    ctx.quit(None);
                }
            })),
            None,
        );

        manager.run().expect("run");

        let step = 1.0 / 60.0;
        assert!((manager.real_time() - 3.0 * step).abs() < 1e-6);
        assert!((manager.game_time() - 2.0 * step).abs() < 1e-6);
    }

    #[test]
    fn failing_setup_stops_run_with_screen_error() {
        let log = EventLog::default();
        let (mut manager, _video, _clock) = manager(QueuedEvents::new());
        manager.push_screen(
            Box::new(RecordingScreen::new("broken", &log).failing_setup()),
            None,
        );

        let err = manager.run().expect_err("setup failure");
        assert!(matches!(err, RunError::Screen(ScreenError::Failed { .. })));
    }

    #[test]
    fn run_with_empty_stack_returns_immediately() {
        let (mut manager, video, clock) = manager(QueuedEvents::new());
        manager.run().expect("run");
        assert_eq!(video.borrow().frames_rendered(), 0);
        assert_eq!(clock.total_slept(), Duration::ZERO);
    }

    #[test]
    fn lagging_iteration_catches_up_with_two_steps_and_one_draw() {
        let log = EventLog::default();
        let events = OnePerDrain {
            remaining: 3,
            ready: true,
        };
        let (mut manager, video, clock) =
            manager_with_source(ManagerConfig::default(), Box::new(events));
        let lag = manager.scheduler.frame_interval().mul_f64(2.5);
        let mut updates = 0;
        manager.push_screen(
            Box::new(RecordingScreen::new("a", &log).with_update(move |_, ctx| {
                updates += 1;
                match updates {
                    1 => clock.advance(lag),
                    3 => ctx.quit(None),
                    _ => {}
                }
            })),
            None,
        );

        manager.run().expect("run");

        assert_eq!(
            log.entries(),
            vec![
                "setup:a", "draw:a", "event:a", "update:a", "draw:a", "event:a", "update:a",
                "event:a", "update:a", "draw:a", "drop:a",
            ]
        );
        assert_eq!(video.borrow().frames_rendered(), 3);
    }

    #[test]
    fn long_stall_is_dropped_without_simulating_it() {
        let log = EventLog::default();
        let config = ManagerConfig {
            metrics_interval_ms: 40,
            ..ManagerConfig::default()
        };
        let (mut manager, _video, clock) = manager_with_config(config, QueuedEvents::new());
        let step = manager.scheduler.step().as_secs_f64();
        let mut updates = 0;
        manager.push_screen(
            Box::new(RecordingScreen::new("a", &log).with_update(move |_, ctx| {
                updates += 1;
                match updates {
                    1 => clock.advance(Duration::from_secs(5)),
                    4 => ctx.quit(None),
                    _ => {}
                }
            })),
            None,
        );
        let handle = manager.metrics_handle();

        manager.run().expect("run");

        let entries = log.entries();
        let updates_at = entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.as_str() == "update:a")
            .map(|(index, _)| index)
            .collect::<Vec<_>>();
        assert_eq!(updates_at.len(), 4);
        // Draws after the stalled step: its own frame, the stall frame, the sleep frame.
        let draws_between = entries[updates_at[0]..updates_at[1]]
            .iter()
            .filter(|e| e.as_str() == "draw:a")
            .count();
        assert_eq!(draws_between, 3);
        assert!((manager.real_time() - 4.0 * step).abs() < 1e-9);
        assert!((manager.game_time() - 4.0 * step).abs() < 1e-9);
        assert_eq!(handle.snapshot().dropped_stalls, 1);
    }

    #[test]
    fn top_screen_name_follows_applied_pushes() {
        let log = EventLog::default();
        let (mut manager, _video, _clock) = manager(QueuedEvents::new());
        manager.push_screen(RecordingScreen::boxed("a", &log), None);
        manager.push_screen(RecordingScreen::boxed("b", &log), None);
        assert_eq!(manager.top_screen_name(), None);

        manager.handle_screen_switch().expect("switch");

        assert_eq!(manager.top_screen_name(), Some("b"));
        assert_eq!(manager.stack_len(), 2);
    }

    #[test]
    fn metrics_are_published_after_interval() {
        let log = EventLog::default();
        let config = ManagerConfig {
            metrics_interval_ms: 50,
            ..ManagerConfig::default()
        };
        let (mut manager, _video, _clock) = manager_with_config(config, QueuedEvents::new());
        manager.push_screen(
            Box::new(RecordingScreen::new("a", &log).with_update(quit_after(10))),
            None,
        );
        let handle = manager.metrics_handle();

        manager.run().expect("run");

        let snapshot = handle.snapshot();
        assert!(snapshot.fps > 0.0);
        assert!(snapshot.tps > 0.0);
    }
}
