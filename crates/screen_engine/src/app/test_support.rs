use std::cell::{Cell, Ref, RefCell};
use std::path::PathBuf;
use std::rc::Rc;
use std::time::{Duration, Instant};

use super::backend::{BackendError, HeadlessVideo, ScriptHost, VideoBackend};
use super::drawing::{Align, DrawingContext, Vec2, LAYER_OBJECTS};
use super::input::{Controller, InputEvent};
use super::scheduler::FrameClock;
use super::screen::{Screen, ScreenContext, ScreenError};

#[derive(Debug, Clone, Default)]
pub(crate) struct EventLog(Rc<RefCell<Vec<String>>>);

impl EventLog {
    pub(crate) fn push(&self, entry: impl Into<String>) {
        self.0.borrow_mut().push(entry.into());
    }

    pub(crate) fn entries(&self) -> Vec<String> {
        self.0.borrow().clone()
    }

    pub(crate) fn count(&self, entry: &str) -> usize {
        self.0.borrow().iter().filter(|e| e.as_str() == entry).count()
    }

    pub(crate) fn clear(&self) {
        self.0.borrow_mut().clear();
    }
}

type SetupHook = Box<dyn FnMut(&mut ScreenContext<'_>)>;
type UpdateHook = Box<dyn FnMut(&Controller, &mut ScreenContext<'_>)>;

/// Screen that records every lifecycle call as `"<callback>:<name>"`.
pub(crate) struct RecordingScreen {
    name: String,
    log: EventLog,
    on_setup: Option<SetupHook>,
    on_update: Option<UpdateHook>,
    fail_setup: bool,
}

impl RecordingScreen {
    pub(crate) fn new(name: &str, log: &EventLog) -> Self {
        Self {
            name: name.to_string(),
            log: log.clone(),
            on_setup: None,
            on_update: None,
            fail_setup: false,
        }
    }

    pub(crate) fn boxed(name: &str, log: &EventLog) -> Box<dyn Screen> {
        Box::new(Self::new(name, log))
    }

    pub(crate) fn with_setup(mut self, hook: impl FnMut(&mut ScreenContext<'_>) + 'static) -> Self {
        self.on_setup = Some(Box::new(hook));
        self
    }

    pub(crate) fn with_update(
        mut self,
        hook: impl FnMut(&Controller, &mut ScreenContext<'_>) + 'static,
    ) -> Self {
        self.on_update = Some(Box::new(hook));
        self
    }

    pub(crate) fn failing_setup(mut self) -> Self {
        self.fail_setup = true;
        self
    }
}

impl Screen for RecordingScreen {
    fn setup(&mut self, ctx: &mut ScreenContext<'_>) -> Result<(), ScreenError> {
        self.log.push(format!("setup:{}", self.name));
        if self.fail_setup {
            return Err(ScreenError::failed(self.name.clone(), "setup refused"));
        }
        if let Some(hook) = self.on_setup.as_mut() {
            hook(ctx);
        }
        Ok(())
    }

    fn leave(&mut self) -> Result<(), ScreenError> {
        self.log.push(format!("leave:{}", self.name));
        Ok(())
    }

    fn update(
        &mut self,
        _dt_seconds: f32,
        controller: &Controller,
        ctx: &mut ScreenContext<'_>,
    ) -> Result<(), ScreenError> {
        self.log.push(format!("update:{}", self.name));
        if let Some(hook) = self.on_update.as_mut() {
            hook(controller, ctx);
        }
        Ok(())
    }

    fn draw(&mut self, context: &mut DrawingContext) -> Result<(), ScreenError> {
        self.log.push(format!("draw:{}", self.name));
        context.draw_text(
            self.name.clone(),
            Vec2::new(0.0, 0.0),
            Align::Left,
            [255, 255, 255, 255],
            LAYER_OBJECTS,
        );
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn event(&mut self, event: &InputEvent) {
        if matches!(event, InputEvent::Key { .. }) {
            self.log.push(format!("event:{}", self.name));
        }
    }

    fn on_focus_lost(&mut self) {
        self.log.push(format!("focus_lost:{}", self.name));
    }
}

impl Drop for RecordingScreen {
    fn drop(&mut self) {
        self.log.push(format!("drop:{}", self.name));
    }
}

#[derive(Debug, Default)]
pub(crate) struct CountingScripts {
    pub(crate) wakeups: u32,
    pub(crate) advances: u32,
    pub(crate) last_game_time: f64,
}

impl ScriptHost for CountingScripts {
    fn advance(&mut self, game_time: f64) {
        self.advances += 1;
        self.last_game_time = game_time;
    }

    fn resume_waiting_on_screen_switch(&mut self) {
        self.wakeups += 1;
    }
}

/// Script host whose counters stay readable after being boxed into a manager.
#[derive(Debug, Clone, Default)]
pub(crate) struct SharedScripts(Rc<RefCell<CountingScripts>>);

impl SharedScripts {
    pub(crate) fn borrow(&self) -> Ref<'_, CountingScripts> {
        self.0.borrow()
    }
}

impl ScriptHost for SharedScripts {
    fn advance(&mut self, game_time: f64) {
        self.0.borrow_mut().advance(game_time);
    }

    fn resume_waiting_on_screen_switch(&mut self) {
        self.0.borrow_mut().resume_waiting_on_screen_switch();
    }
}

#[derive(Debug, Clone)]
pub(crate) struct SharedVideo(Rc<RefCell<HeadlessVideo>>);

impl SharedVideo {
    pub(crate) fn new(width: u32, height: u32) -> Self {
        Self(Rc::new(RefCell::new(HeadlessVideo::new(width, height))))
    }

    pub(crate) fn borrow(&self) -> Ref<'_, HeadlessVideo> {
        self.0.borrow()
    }
}

impl VideoBackend for SharedVideo {
    fn logical_size(&self) -> (u32, u32) {
        self.0.borrow().logical_size()
    }

    fn to_logical(&self, physical_x: f32, physical_y: f32) -> Vec2 {
        self.0.borrow().to_logical(physical_x, physical_y)
    }

    fn render(&mut self, context: &DrawingContext) -> Result<(), BackendError> {
        self.0.borrow_mut().render(context)
    }

    fn on_resize(&mut self, width: u32, height: u32) -> Result<(), BackendError> {
        self.0.borrow_mut().on_resize(width, height)
    }

    fn set_fullscreen(&mut self, fullscreen: bool) {
        self.0.borrow_mut().set_fullscreen(fullscreen);
    }

    fn take_screenshot(&mut self) -> Result<Option<PathBuf>, BackendError> {
        self.0.borrow_mut().take_screenshot()
    }
}

/// Frame clock whose time only moves when it sleeps or is advanced by hand.
#[derive(Debug, Clone)]
pub(crate) struct ManualClock {
    base: Instant,
    offset: Rc<Cell<Duration>>,
    slept: Rc<Cell<Duration>>,
}

impl ManualClock {
    pub(crate) fn new() -> Self {
        Self {
            base: Instant::now(),
            offset: Rc::new(Cell::new(Duration::ZERO)),
            slept: Rc::new(Cell::new(Duration::ZERO)),
        }
    }

    pub(crate) fn advance(&self, duration: Duration) {
        self.offset.set(self.offset.get() + duration);
    }

    pub(crate) fn total_slept(&self) -> Duration {
        self.slept.get()
    }
}

impl FrameClock for ManualClock {
    fn now(&self) -> Instant {
        self.base + self.offset.get()
    }

    fn sleep(&mut self, duration: Duration) {
        self.advance(duration);
        self.slept.set(self.slept.get() + duration);
    }
}
