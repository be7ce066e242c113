use screen_engine::{
    Align, Control, Controller, DrawingContext, FadeToBlack, Rect, Screen, ScreenContext,
    ScreenError, Vec2, BORDER_X, BORDER_Y, LAYER_BACKGROUND, LAYER_GUI, LAYER_HUD,
    LAYER_OBJECTS,
};
use tracing::info;

use super::{FADE_IN_SECONDS, FADE_OUT_SECONDS};

/// Playfield size in logical pixels; positions are clamped to it.
pub(crate) const FIELD_WIDTH: f32 = 800.0;
pub(crate) const FIELD_HEIGHT: f32 = 600.0;
const PLAYER_SIZE: f32 = 16.0;
const PICKUP_SIZE: f32 = 8.0;
const PLAYER_SPEED: f32 = 180.0;
const PICKUP_MARGIN: f32 = 32.0;

const BACKGROUND: [u8; 4] = [20, 28, 24, 255];
const PLAYER_COLOR: [u8; 4] = [90, 200, 250, 255];
const PICKUP_COLOR: [u8; 4] = [255, 210, 70, 255];
const TEXT_COLOR: [u8; 4] = [244, 248, 252, 255];

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Level {
    pickups: Vec<Vec2>,
}

impl Level {
    /// Deterministic pickup layout inside the playfield margins.
    pub(crate) fn generate(seed: u64, count: usize) -> Option<Self> {
        let mut state = seed | 1;
        let mut next_unit = move || {
            // xorshift64
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            (state >> 40) as f32 / (1u64 << 24) as f32
        };
        let span_x = FIELD_WIDTH - PICKUP_MARGIN * 2.0;
        let span_y = FIELD_HEIGHT - PICKUP_MARGIN * 2.0;
        let pickups: Vec<Vec2> = (0..count)
            .map(|_| {
                Vec2::new(
                    PICKUP_MARGIN + next_unit() * span_x,
                    PICKUP_MARGIN + next_unit() * span_y,
                )
            })
            .collect();
        (!pickups.is_empty()).then_some(Self { pickups })
    }

    pub(crate) fn pickups(&self) -> &[Vec2] {
        &self.pickups
    }
}

/// Player position and collection progress.
#[derive(Debug, Clone)]
pub(crate) struct SessionState {
    player: Vec2,
    remaining: Vec<Vec2>,
    collected: usize,
}

impl SessionState {
    pub(crate) fn new(level: Level) -> Self {
        Self {
            player: Vec2::new(FIELD_WIDTH / 2.0, FIELD_HEIGHT / 2.0),
            remaining: level.pickups,
            collected: 0,
        }
    }

    pub(crate) fn player(&self) -> Vec2 {
        self.player
    }

    pub(crate) fn collected(&self) -> usize {
        self.collected
    }

    pub(crate) fn cleared(&self) -> bool {
        self.remaining.is_empty()
    }

    /// Moves by held directions for `dt_seconds` of game time; returns pickups taken.
    pub(crate) fn advance(&mut self, controller: &Controller, dt_seconds: f32) -> usize {
        let axis = |negative: Control, positive: Control| {
            let held = |control| f32::from(u8::from(controller.hold(control)));
            held(positive) - held(negative)
        };
        let dx = axis(Control::Left, Control::Right);
        let dy = axis(Control::Up, Control::Down);
        let step = PLAYER_SPEED * dt_seconds;
        self.player.x = (self.player.x + dx * step).clamp(0.0, FIELD_WIDTH - PLAYER_SIZE);
        self.player.y = (self.player.y + dy * step).clamp(0.0, FIELD_HEIGHT - PLAYER_SIZE);

        let player = self.player;
        let before = self.remaining.len();
        self.remaining.retain(|pickup| !overlaps(player, *pickup));
        let taken = before - self.remaining.len();
        self.collected += taken;
        taken
    }
}

fn overlaps(player: Vec2, pickup: Vec2) -> bool {
    pickup.x + PICKUP_SIZE > player.x
        && pickup.x < player.x + PLAYER_SIZE
        && pickup.y + PICKUP_SIZE > player.y
        && pickup.y < player.y + PLAYER_SIZE
}

pub(crate) struct SessionScreen {
    state: SessionState,
    total: usize,
    paused: bool,
    pause_requested: bool,
}

impl SessionScreen {
    pub(crate) fn new(level: Level) -> Self {
        let total = level.pickups().len();
        Self {
            state: SessionState::new(level),
            total,
            paused: false,
            pause_requested: false,
        }
    }

    fn set_paused(&mut self, paused: bool, ctx: &mut ScreenContext<'_>) {
        self.paused = paused;
        ctx.set_speed(if paused { 0.0 } else { 1.0 });
        info!(paused, game_time = ctx.game_time(), "session_pause_changed");
    }
}

impl Screen for SessionScreen {
    fn setup(&mut self, ctx: &mut ScreenContext<'_>) -> Result<(), ScreenError> {
        ctx.set_screen_fade(Some(FadeToBlack::fade_in(FADE_IN_SECONDS)));
        info!(pickups = self.total, "session_started");
        Ok(())
    }

    fn leave(&mut self) -> Result<(), ScreenError> {
        info!(
            collected = self.state.collected(),
            total = self.total,
            "session_left"
        );
        Ok(())
    }

    fn update(
        &mut self,
        dt_seconds: f32,
        controller: &Controller,
        ctx: &mut ScreenContext<'_>,
    ) -> Result<(), ScreenError> {
        if ctx.pending_actions() > 0 {
            return Ok(());
        }
        if std::mem::take(&mut self.pause_requested) && !self.paused {
            self.set_paused(true, ctx);
        }
        if controller.pressed(Control::Escape) || controller.pressed(Control::MenuBack) {
            ctx.pop_screen(Some(FadeToBlack::fade_out(FADE_OUT_SECONDS)));
            return Ok(());
        }
        if controller.pressed(Control::Start) {
            let paused = !self.paused;
            self.set_paused(paused, ctx);
        }
        if self.state.cleared() && controller.pressed(Control::MenuSelect) {
            ctx.pop_screen(Some(FadeToBlack::fade_out(FADE_OUT_SECONDS)));
            return Ok(());
        }
        if self.state.advance(controller, dt_seconds) > 0 && self.state.cleared() {
            info!(game_time = ctx.game_time(), "session_cleared");
        }
        Ok(())
    }

    fn draw(&mut self, context: &mut DrawingContext) -> Result<(), ScreenError> {
        context.fill_screen(BACKGROUND, LAYER_BACKGROUND);
        for pickup in &self.state.remaining {
            context.fill_rect(
                Rect::new(pickup.x, pickup.y, PICKUP_SIZE, PICKUP_SIZE),
                PICKUP_COLOR,
                LAYER_OBJECTS,
            );
        }
        let player = self.state.player();
        context.fill_rect(
            Rect::new(player.x, player.y, PLAYER_SIZE, PLAYER_SIZE),
            PLAYER_COLOR,
            LAYER_OBJECTS,
        );
        context.draw_text(
            format!("{}/{}", self.state.collected(), self.total),
            Vec2::new(BORDER_X, BORDER_Y),
            Align::Left,
            TEXT_COLOR,
            LAYER_HUD,
        );

        let center = Vec2::new(context.width() as f32 / 2.0, context.height() as f32 / 2.0);
        if self.paused {
            context.draw_text("PAUSED", center, Align::Center, TEXT_COLOR, LAYER_GUI);
        } else if self.state.cleared() {
            context.draw_text("CLEARED - ENTER", center, Align::Center, TEXT_COLOR, LAYER_GUI);
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "session"
    }

    fn on_focus_lost(&mut self) {
        self.pause_requested = true;
    }
}
