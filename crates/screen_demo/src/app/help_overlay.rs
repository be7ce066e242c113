use screen_engine::{
    Align, Control, Controller, DrawingContext, Overlay, Rect, Vec2, BORDER_X, BORDER_Y,
    LAYER_GUI, LINE_HEIGHT,
};

const PANEL_COLOR: [u8; 4] = [10, 12, 16, 210];
const TEXT_COLOR: [u8; 4] = [244, 248, 252, 255];
const PANEL_WIDTH: f32 = 300.0;

const HELP_LINES: [&str; 8] = [
    "ARROWS/WASD  MOVE",
    "ENTER  SELECT",
    "ESC  BACK",
    "P  PAUSE",
    "F10  FPS",
    "F11  FULLSCREEN",
    "F12  SCREENSHOT",
    "CTRL+F2  DEVELOPER",
];

/// Key reference toggled with the debug-menu control (F1).
#[derive(Debug, Default)]
pub(crate) struct HelpOverlay {
    visible: bool,
}

impl Overlay for HelpOverlay {
    fn update(&mut self, _dt_seconds: f32, controller: &Controller) {
        if controller.pressed(Control::DebugMenu) {
            self.visible = !self.visible;
        }
    }

    fn draw(&mut self, context: &mut DrawingContext) {
        if !self.visible {
            return;
        }
        let line_step = LINE_HEIGHT as f32 + 6.0;
        let height = line_step * HELP_LINES.len() as f32 + BORDER_Y * 2.0;
        context.fill_rect(
            Rect::new(BORDER_X, BORDER_Y, PANEL_WIDTH, height),
            PANEL_COLOR,
            LAYER_GUI,
        );
        for (index, line) in HELP_LINES.iter().enumerate() {
            context.draw_text(
                *line,
                Vec2::new(BORDER_X * 2.0, BORDER_Y * 2.0 + index as f32 * line_step),
                Align::Left,
                TEXT_COLOR,
                LAYER_GUI,
            );
        }
    }
}
