use screen_engine::{
    Align, Controller, DrawingContext, FadeToBlack, Screen, ScreenContext, ScreenError, Vec2,
    LAYER_BACKGROUND, LAYER_GUI,
};
use tracing::info;

use super::session::{Level, SessionScreen};
use super::FADE_OUT_SECONDS;

const BACKGROUND: [u8; 4] = [8, 8, 12, 255];
const TEXT_COLOR: [u8; 4] = [176, 198, 220, 255];
const PICKUP_COUNT: usize = 8;
const LEVEL_SEED: u64 = 0x5eed_cafe;

/// Builds the session level, then replaces itself with the session.
#[derive(Debug, Default)]
pub(crate) struct LoadingScreen {
    handed_off: bool,
}

impl LoadingScreen {
    pub(crate) fn new() -> Self {
        Self::default()
    }
}

impl Screen for LoadingScreen {
    fn setup(&mut self, _ctx: &mut ScreenContext<'_>) -> Result<(), ScreenError> {
        Ok(())
    }

    fn leave(&mut self) -> Result<(), ScreenError> {
        Ok(())
    }

    fn update(
        &mut self,
        _dt_seconds: f32,
        _controller: &Controller,
        ctx: &mut ScreenContext<'_>,
    ) -> Result<(), ScreenError> {
        if self.handed_off {
            return Ok(());
        }
        let level = Level::generate(LEVEL_SEED, PICKUP_COUNT)
            .ok_or_else(|| ScreenError::failed("loading", "level generation produced no pickups"))?;
        info!(pickups = level.pickups().len(), "level_loaded");
        ctx.pop_screen(None);
        ctx.push_screen(
            Box::new(SessionScreen::new(level)),
            Some(FadeToBlack::fade_out(FADE_OUT_SECONDS)),
        );
        self.handed_off = true;
        Ok(())
    }

    fn draw(&mut self, context: &mut DrawingContext) -> Result<(), ScreenError> {
        context.fill_screen(BACKGROUND, LAYER_BACKGROUND);
        context.draw_text(
            "LOADING...",
            Vec2::new(context.width() as f32 / 2.0, context.height() as f32 / 2.0),
            Align::Center,
            TEXT_COLOR,
            LAYER_GUI,
        );
        Ok(())
    }

    fn name(&self) -> &str {
        "loading"
    }
}
