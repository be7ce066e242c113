use std::error::Error as StdError;

use thiserror::Error;

use super::action::ActionQueue;
use super::drawing::DrawingContext;
use super::fade::ScreenFade;
use super::input::{Controller, InputEvent};
use super::scheduler::GameClock;

#[derive(Debug, Error)]
pub enum ScreenError {
    #[error("screen '{screen}' failed: {message}")]
    Failed { screen: String, message: String },
    #[error(transparent)]
    Other(#[from] Box<dyn StdError + Send + Sync>),
}

impl ScreenError {
    pub fn failed(screen: impl Into<String>, message: impl Into<String>) -> Self {
        ScreenError::Failed {
            screen: screen.into(),
            message: message.into(),
        }
    }
}

/// One layer of the presentation stack (title menu, game session, editor...).
///
/// Only the top screen receives `update` and `draw`. `setup` runs once, right
/// after the screen first becomes top; `leave` runs when it stops being top.
pub trait Screen {
    fn setup(&mut self, ctx: &mut ScreenContext<'_>) -> Result<(), ScreenError>;
    fn leave(&mut self) -> Result<(), ScreenError>;
    fn update(
        &mut self,
        dt_seconds: f32,
        controller: &Controller,
        ctx: &mut ScreenContext<'_>,
    ) -> Result<(), ScreenError>;
    fn draw(&mut self, context: &mut DrawingContext) -> Result<(), ScreenError>;
    fn name(&self) -> &str {
        "screen"
    }
    fn event(&mut self, _event: &InputEvent) {}
    fn on_focus_lost(&mut self) {}
    fn on_resize(&mut self, _width: u32, _height: u32) {}
}

/// Handle given to screen callbacks for requesting transitions and changing speed.
///
/// Requests are queued; the stack changes at the next reconciliation point.
pub struct ScreenContext<'a> {
    actions: &'a mut ActionQueue,
    clock: &'a mut GameClock,
}

impl<'a> ScreenContext<'a> {
    pub(crate) fn new(actions: &'a mut ActionQueue, clock: &'a mut GameClock) -> Self {
        Self { actions, clock }
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

    pub fn game_time(&self) -> f64 {
        self.clock.game_time()
    }

    pub fn real_time(&self) -> f64 {
        self.clock.real_time()
    }

    pub fn pending_actions(&self) -> usize {
        self.actions.len()
    }
}
