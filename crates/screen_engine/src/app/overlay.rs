use super::drawing::{Align, DrawingContext, Rect, Vec2, BORDER_X, BORDER_Y, LAYER_DEBUG, LAYER_HUD};
use super::input::{Control, Controller, InputEvent};
use super::rendering::text_width;
use super::scheduler::GameClock;

const HUD_TEXT_COLOR: [u8; 4] = [244, 248, 252, 255];
const HUD_DIM_COLOR: [u8; 4] = [176, 198, 220, 255];
const HUD_PANEL_COLOR: [u8; 4] = [10, 12, 16, 180];
const HUD_ACTIVE_COLOR: [u8; 4] = [255, 210, 70, 255];
const HUD_IDLE_COLOR: [u8; 4] = [52, 58, 70, 255];
const HUD_CELL: f32 = 14.0;
const HUD_GAP: f32 = 4.0;

/// Layer drawn above the top screen that sees every event (menus, console, ...).
pub trait Overlay {
    fn event(&mut self, _event: &InputEvent) {}
    fn update(&mut self, _dt_seconds: f32, _controller: &Controller) {}
    fn draw(&mut self, context: &mut DrawingContext);
    fn on_resize(&mut self, _width: u32, _height: u32) {}
}

pub(crate) fn draw_fps(context: &mut DrawingContext, fps: f32) {
    let width = context.width() as f32;
    let label = "FPS";
    let label_x = width - text_width(label) - text_width(" 99999") - BORDER_X;
    let y = BORDER_Y + 20.0;
    context.draw_text(label, Vec2::new(label_x, y), Align::Left, HUD_DIM_COLOR, LAYER_HUD);
    context.draw_text(
        format_fps(fps),
        Vec2::new(width - BORDER_X, y),
        Align::Right,
        HUD_TEXT_COLOR,
        LAYER_HUD,
    );
}

fn format_fps(fps: f32) -> String {
    format!("{fps:5.1}")
}

pub(crate) fn draw_developer_line(context: &mut DrawingContext, clock: &GameClock, depth: usize) {
    let text = format!(
        "T:{:.1} R:{:.1} X{:.2} S:{}",
        clock.game_time(),
        clock.real_time(),
        clock.speed(),
        depth
    );
    let width = context.width() as f32;
    context.draw_text(
        text,
        Vec2::new(width - BORDER_X, BORDER_Y + 40.0),
        Align::Right,
        HUD_DIM_COLOR,
        LAYER_HUD,
    );
}

/// Grid of the logical controls, lit while held.
#[derive(Debug, Default, Clone, Copy)]
pub struct ControllerHud;

impl ControllerHud {
    pub fn draw(&self, context: &mut DrawingContext, controller: &Controller) {
        let columns = Control::ALL.len() as f32;
        let panel_width = columns * (HUD_CELL + HUD_GAP) + HUD_GAP;
        let panel_height = HUD_CELL + HUD_GAP * 2.0;
        let left = BORDER_X;
        let top = context.height() as f32 - BORDER_Y - panel_height;

        context.fill_rect(
            Rect::new(left, top, panel_width, panel_height),
            HUD_PANEL_COLOR,
            LAYER_DEBUG,
        );
        for (index, control) in Control::ALL.iter().enumerate() {
            let color = if controller.hold(*control) {
                HUD_ACTIVE_COLOR
            } else {
                HUD_IDLE_COLOR
            };
            let x = left + HUD_GAP + index as f32 * (HUD_CELL + HUD_GAP);
            context.fill_rect(
                Rect::new(x, top + HUD_GAP, HUD_CELL, HUD_CELL),
                color,
                LAYER_DEBUG,
            );
        }
    }
}
