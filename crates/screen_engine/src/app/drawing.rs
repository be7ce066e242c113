pub type Color = [u8; 4];

pub const LAYER_BACKGROUND: i32 = -300;
pub const LAYER_OBJECTS: i32 = 50;
pub const LAYER_FOREGROUND: i32 = 200;
pub const LAYER_HUD: i32 = 400;
pub const LAYER_GUI: i32 = 500;
pub const LAYER_FADE: i32 = 550;
pub const LAYER_DEBUG: i32 = 600;

pub const BORDER_X: f32 = 10.0;
pub const BORDER_Y: f32 = 10.0;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    FillRect {
        rect: Rect,
        color: Color,
        layer: i32,
    },
    FillScreen {
        color: Color,
        layer: i32,
    },
    Text {
        text: String,
        position: Vec2,
        align: Align,
        color: Color,
        layer: i32,
    },
}

impl DrawCommand {
    pub fn layer(&self) -> i32 {
        match self {
            DrawCommand::FillRect { layer, .. }
            | DrawCommand::FillScreen { layer, .. }
            | DrawCommand::Text { layer, .. } => *layer,
        }
    }
}

/// Records draw commands for one rendered frame in logical coordinates.
///
/// Screens, overlays and fades all write into the same recorder; the video
/// back-end replays the commands ordered by layer, keeping submission order
/// within a layer.
#[derive(Debug, Clone)]
pub struct DrawingContext {
    width: u32,
    height: u32,
    commands: Vec<DrawCommand>,
}

impl DrawingContext {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn fill_rect(&mut self, rect: Rect, color: Color, layer: i32) {
        if rect.width <= 0.0 || rect.height <= 0.0 {
            return;
        }
        self.commands
            .push(DrawCommand::FillRect { rect, color, layer });
    }

    pub fn fill_screen(&mut self, color: Color, layer: i32) {
        self.commands.push(DrawCommand::FillScreen { color, layer });
    }

    pub fn draw_text(
        &mut self,
        text: impl Into<String>,
        position: Vec2,
        align: Align,
        color: Color,
        layer: i32,
    ) {
        let text = text.into();
        if text.is_empty() {
            return;
        }
        self.commands.push(DrawCommand::Text {
            text,
            position,
            align,
            color,
            layer,
        });
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn sorted_commands(&self) -> Vec<&DrawCommand> {
        let mut sorted = self.commands.iter().collect::<Vec<_>>();
        sorted.sort_by_key(|command| command.layer());
        sorted
    }
}
