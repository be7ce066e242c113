use super::drawing::{Color, DrawingContext, LAYER_FADE};

/// Visual transition that gates screen stack changes until it reports done.
///
/// `done()` must be monotonic: once it returns `true` it keeps returning `true`.
pub trait ScreenFade {
    fn update(&mut self, dt_seconds: f32);
    fn draw(&self, context: &mut DrawingContext);
    fn done(&self) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeDirection {
    FadeIn,
    FadeOut,
}

#[derive(Debug, Clone)]
pub struct FadeToBlack {
    direction: FadeDirection,
    duration_seconds: f32,
    elapsed_seconds: f32,
    color: Color,
}

impl FadeToBlack {
    pub fn new(direction: FadeDirection, duration_seconds: f32) -> Self {
        Self::with_color(direction, duration_seconds, [0, 0, 0, 255])
    }

    pub fn with_color(direction: FadeDirection, duration_seconds: f32, color: Color) -> Self {
        let duration_seconds = if duration_seconds.is_finite() {
            duration_seconds.max(0.0)
        } else {
            0.0
        };
        Self {
            direction,
            duration_seconds,
            elapsed_seconds: 0.0,
            color,
        }
    }

    pub fn fade_out(duration_seconds: f32) -> Box<dyn ScreenFade> {
        Box::new(Self::new(FadeDirection::FadeOut, duration_seconds))
    }

    pub fn fade_in(duration_seconds: f32) -> Box<dyn ScreenFade> {
        Box::new(Self::new(FadeDirection::FadeIn, duration_seconds))
    }

    pub fn progress(&self) -> f32 {
        if self.duration_seconds <= 0.0 {
            return 1.0;
        }
        (self.elapsed_seconds / self.duration_seconds).clamp(0.0, 1.0)
    }

    fn opacity(&self) -> f32 {
        match self.direction {
            FadeDirection::FadeOut => self.progress(),
            FadeDirection::FadeIn => 1.0 - self.progress(),
        }
    }
}

impl ScreenFade for FadeToBlack {
    fn update(&mut self, dt_seconds: f32) {
        if dt_seconds.is_finite() && dt_seconds > 0.0 {
            self.elapsed_seconds = (self.elapsed_seconds + dt_seconds).min(self.duration_seconds);
        }
    }

    fn draw(&self, context: &mut DrawingContext) {
        let alpha = (self.opacity() * self.color[3] as f32).round() as u8;
        if alpha == 0 {
            return;
        }
        let [r, g, b, _] = self.color;
        context.fill_screen([r, g, b, alpha], LAYER_FADE);
    }

    fn done(&self) -> bool {
        self.elapsed_seconds >= self.duration_seconds
    }
}
