use std::collections::HashMap;

use super::backend::VideoBackend;
use super::drawing::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    Left,
    Right,
    Up,
    Down,
    Jump,
    Action,
    Start,
    Escape,
    MenuSelect,
    MenuBack,
    Console,
    DebugMenu,
}

const CONTROL_COUNT: usize = 12;

impl Control {
    pub const ALL: [Control; CONTROL_COUNT] = [
        Control::Left,
        Control::Right,
        Control::Up,
        Control::Down,
        Control::Jump,
        Control::Action,
        Control::Start,
        Control::Escape,
        Control::MenuSelect,
        Control::MenuBack,
        Control::Console,
        Control::DebugMenu,
    ];

    const fn index(self) -> usize {
        match self {
            Control::Left => 0,
            Control::Right => 1,
            Control::Up => 2,
            Control::Down => 3,
            Control::Jump => 4,
            Control::Action => 5,
            Control::Start => 6,
            Control::Escape => 7,
            Control::MenuSelect => 8,
            Control::MenuBack => 9,
            Control::Console => 10,
            Control::DebugMenu => 11,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Control::Left => "left",
            Control::Right => "right",
            Control::Up => "up",
            Control::Down => "down",
            Control::Jump => "jump",
            Control::Action => "action",
            Control::Start => "start",
            Control::Escape => "escape",
            Control::MenuSelect => "menu-select",
            Control::MenuBack => "menu-back",
            Control::Console => "console",
            Control::DebugMenu => "debug-menu",
        }
    }
}

/// Logical control state for the current and the previous simulation step.
#[derive(Debug, Clone, Copy, Default)]
pub struct Controller {
    controls: [bool; CONTROL_COUNT],
    old_controls: [bool; CONTROL_COUNT],
    mouse_pressed: bool,
    mouse_pos: Vec2,
}

impl Controller {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn set_control(&mut self, control: Control, is_down: bool) {
        self.controls[control.index()] = is_down;
    }

    pub fn hold(&self, control: Control) -> bool {
        self.controls[control.index()]
    }

    pub fn pressed(&self, control: Control) -> bool {
        !self.old_controls[control.index()] && self.controls[control.index()]
    }

    pub fn released(&self, control: Control) -> bool {
        self.old_controls[control.index()] && !self.controls[control.index()]
    }

    /// Latches the current state so the next step reports edges relative to it.
    pub fn update(&mut self) {
        self.old_controls = self.controls;
    }

    pub fn mouse_pressed(&self) -> bool {
        self.mouse_pressed
    }

    pub fn mouse_pos(&self) -> Vec2 {
        self.mouse_pos
    }

    pub fn set_mouse(&mut self, logical_pos: Vec2, pressed: bool) {
        self.mouse_pos = logical_pos;
        self.mouse_pressed = pressed;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Space,
    Enter,
    Escape,
    Backspace,
    Tab,
    Backquote,
    PrintScreen,
    Function(u8),
    Char(char),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Raw device/window event as reported by an [`EventSource`](super::EventSource).
///
/// Mouse positions are physical window pixels; the input manager maps them to
/// logical coordinates through the video back-end.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Key {
        key: Key,
        pressed: bool,
        modifiers: Modifiers,
    },
    MouseMoved {
        x: f32,
        y: f32,
    },
    MouseButton {
        button: MouseButton,
        pressed: bool,
    },
    Resized {
        width: u32,
        height: u32,
    },
    FocusLost,
    FocusGained,
    CloseRequested,
}

impl InputEvent {
    pub fn key_down(key: Key) -> Self {
        InputEvent::Key {
            key,
            pressed: true,
            modifiers: Modifiers::default(),
        }
    }

    pub fn key_up(key: Key) -> Self {
        InputEvent::Key {
            key,
            pressed: false,
            modifiers: Modifiers::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct InputManager {
    controller: Controller,
    bindings: HashMap<Key, Control>,
    mouse_physical: Vec2,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InputManager {
    pub fn new() -> Self {
        let bindings = [
            (Key::Left, Control::Left),
            (Key::Right, Control::Right),
            (Key::Up, Control::Up),
            (Key::Down, Control::Down),
            (Key::Char('a'), Control::Left),
            (Key::Char('d'), Control::Right),
            (Key::Char('w'), Control::Up),
            (Key::Char('s'), Control::Down),
            (Key::Space, Control::Jump),
            (Key::Char('x'), Control::Action),
            (Key::Char('p'), Control::Start),
            (Key::Escape, Control::Escape),
            (Key::Enter, Control::MenuSelect),
            (Key::Backspace, Control::MenuBack),
            (Key::Backquote, Control::Console),
            (Key::Function(1), Control::DebugMenu),
        ]
        .into_iter()
        .collect();

        Self {
            controller: Controller::default(),
            bindings,
            mouse_physical: Vec2::default(),
        }
    }

    pub fn bind(&mut self, key: Key, control: Control) {
        self.bindings.insert(key, control);
    }

    pub fn unbind(&mut self, key: Key) -> Option<Control> {
        self.bindings.remove(&key)
    }

    pub fn binding(&self, key: Key) -> Option<Control> {
        self.bindings.get(&key).copied()
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    pub fn reset(&mut self) {
        self.controller.reset();
    }

    /// Starts a new simulation step; edges are reported relative to the previous one.
    pub fn update(&mut self) {
        self.controller.update();
    }

    pub fn process_event(&mut self, event: &InputEvent, video: &dyn VideoBackend) {
        match *event {
            InputEvent::Key { key, pressed, .. } => {
                if let Some(control) = self.binding(key) {
                    self.controller.set_control(control, pressed);
                }
            }
            InputEvent::MouseMoved { x, y } => {
                self.mouse_physical = Vec2::new(x, y);
                let pressed = self.controller.mouse_pressed();
                self.controller.set_mouse(video.to_logical(x, y), pressed);
            }
            InputEvent::MouseButton {
                button: MouseButton::Left,
                pressed,
            } => {
                let position = video.to_logical(self.mouse_physical.x, self.mouse_physical.y);
                self.controller.set_mouse(position, pressed);
            }
            InputEvent::FocusLost => {
                // Keys released while unfocused never reach us.
                self.controller.reset();
            }
            InputEvent::MouseButton { .. }
            | InputEvent::Resized { .. }
            | InputEvent::FocusGained
            | InputEvent::CloseRequested => {}
        }
    }
}
