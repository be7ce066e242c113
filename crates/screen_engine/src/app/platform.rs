use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use pixels::Error as PixelsError;
use thiserror::Error;
use tracing::{debug, info};
use winit::dpi::LogicalSize;
use winit::error::{EventLoopError, OsError};
use winit::event::{ElementState, Event, MouseButton as WinitMouseButton, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::WindowBuilder;

use super::backend::EventSource;
use super::config::ManagerConfig;
use super::input::{InputEvent, Key, Modifiers, MouseButton};
use super::rendering::PixelsVideo;

#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("failed to create event loop: {0}")]
    CreateEventLoop(#[source] EventLoopError),
    #[error("failed to create application window: {0}")]
    CreateWindow(#[source] OsError),
    #[error("failed to initialize renderer: {0}")]
    CreateRenderer(#[source] PixelsError),
}

/// Opens the window and returns its event source and video back-end.
pub fn create_platform(
    config: &ManagerConfig,
    screenshot_dir: PathBuf,
) -> Result<(WinitEvents, PixelsVideo), PlatformError> {
    let event_loop = EventLoop::new().map_err(PlatformError::CreateEventLoop)?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(config.window_title.clone())
            .with_inner_size(LogicalSize::new(
                config.window_width as f64,
                config.window_height as f64,
            ))
            .build(&event_loop)
            .map_err(PlatformError::CreateWindow)?,
    );
    let video = PixelsVideo::new(
        window,
        config.window_width,
        config.window_height,
        screenshot_dir,
    )
    .map_err(PlatformError::CreateRenderer)?;
    event_loop.set_control_flow(ControlFlow::Poll);
    info!(
        title = config.window_title.as_str(),
        width = config.window_width,
        height = config.window_height,
        "window_created"
    );

    Ok((WinitEvents::new(event_loop), video))
}

/// Event source that pumps the `winit` loop once per drain.
pub struct WinitEvents {
    event_loop: EventLoop<()>,
    pending: VecDeque<InputEvent>,
    modifiers: Modifiers,
    pumped: bool,
}

impl WinitEvents {
    fn new(event_loop: EventLoop<()>) -> Self {
        Self {
            event_loop,
            pending: VecDeque::new(),
            modifiers: Modifiers::default(),
            pumped: false,
        }
    }

    fn pump(&mut self) {
        let pending = &mut self.pending;
        let modifiers = &mut self.modifiers;
        let status = self
            .event_loop
            .pump_events(Some(Duration::ZERO), |event, _target| {
                if let Event::WindowEvent { event, .. } = event {
                    if let Some(input) = translate_window_event(&event, modifiers) {
                        pending.push_back(input);
                    }
                }
            });
        if let PumpStatus::Exit(code) = status {
            debug!(code, "event_loop_exit");
            self.pending.push_back(InputEvent::CloseRequested);
        }
    }
}

impl EventSource for WinitEvents {
    fn poll_event(&mut self) -> Option<InputEvent> {
        if self.pending.is_empty() && !self.pumped {
            self.pump();
            self.pumped = true;
        }
        let event = self.pending.pop_front();
        if event.is_none() {
            self.pumped = false;
        }
        event
    }
}

fn translate_window_event(event: &WindowEvent, modifiers: &mut Modifiers) -> Option<InputEvent> {
    match event {
        WindowEvent::CloseRequested => Some(InputEvent::CloseRequested),
        WindowEvent::Resized(size) => Some(InputEvent::Resized {
            width: size.width,
            height: size.height,
        }),
        WindowEvent::Focused(true) => Some(InputEvent::FocusGained),
        WindowEvent::Focused(false) => Some(InputEvent::FocusLost),
        WindowEvent::ModifiersChanged(state) => {
            let state = state.state();
            *modifiers = Modifiers {
                ctrl: state.control_key(),
                alt: state.alt_key(),
                shift: state.shift_key(),
            };
            None
        }
        WindowEvent::CursorMoved { position, .. } => Some(InputEvent::MouseMoved {
            x: position.x as f32,
            y: position.y as f32,
        }),
        WindowEvent::MouseInput { state, button, .. } => {
            translate_mouse_button(*button).map(|button| InputEvent::MouseButton {
                button,
                pressed: *state == ElementState::Pressed,
            })
        }
        WindowEvent::KeyboardInput { event, .. } if !event.repeat => {
            translate_key(event.physical_key).map(|key| InputEvent::Key {
                key,
                pressed: event.state == ElementState::Pressed,
                modifiers: *modifiers,
            })
        }
        _ => None,
    }
}

fn translate_mouse_button(button: WinitMouseButton) -> Option<MouseButton> {
    match button {
        WinitMouseButton::Left => Some(MouseButton::Left),
        WinitMouseButton::Right => Some(MouseButton::Right),
        WinitMouseButton::Middle => Some(MouseButton::Middle),
        _ => None,
    }
}

const CHARACTER_KEYS: [(KeyCode, char); 36] = [
    (KeyCode::KeyA, 'a'),
    (KeyCode::KeyB, 'b'),
    (KeyCode::KeyC, 'c'),
    (KeyCode::KeyD, 'd'),
    (KeyCode::KeyE, 'e'),
    (KeyCode::KeyF, 'f'),
    (KeyCode::KeyG, 'g'),
    (KeyCode::KeyH, 'h'),
    (KeyCode::KeyI, 'i'),
    (KeyCode::KeyJ, 'j'),
    (KeyCode::KeyK, 'k'),
    (KeyCode::KeyL, 'l'),
    (KeyCode::KeyM, 'm'),
    (KeyCode::KeyN, 'n'),
    (KeyCode::KeyO, 'o'),
    (KeyCode::KeyP, 'p'),
    (KeyCode::KeyQ, 'q'),
    (KeyCode::KeyR, 'r'),
    (KeyCode::KeyS, 's'),
    (KeyCode::KeyT, 't'),
    (KeyCode::KeyU, 'u'),
    (KeyCode::KeyV, 'v'),
    (KeyCode::KeyW, 'w'),
    (KeyCode::KeyX, 'x'),
    (KeyCode::KeyY, 'y'),
    (KeyCode::KeyZ, 'z'),
    (KeyCode::Digit0, '0'),
    (KeyCode::Digit1, '1'),
    (KeyCode::Digit2, '2'),
    (KeyCode::Digit3, '3'),
    (KeyCode::Digit4, '4'),
    (KeyCode::Digit5, '5'),
    (KeyCode::Digit6, '6'),
    (KeyCode::Digit7, '7'),
    (KeyCode::Digit8, '8'),
    (KeyCode::Digit9, '9'),
];

const FUNCTION_KEYS: [KeyCode; 12] = [
    KeyCode::F1,
    KeyCode::F2,
    KeyCode::F3,
    KeyCode::F4,
    KeyCode::F5,
    KeyCode::F6,
    KeyCode::F7,
    KeyCode::F8,
    KeyCode::F9,
    KeyCode::F10,
    KeyCode::F11,
    KeyCode::F12,
];

/// Layout-independent key translation from physical key positions.
fn translate_key(key: PhysicalKey) -> Option<Key> {
    let PhysicalKey::Code(code) = key else {
        return None;
    };
    let key = match code {
        KeyCode::ArrowLeft => Key::Left,
        KeyCode::ArrowRight => Key::Right,
        KeyCode::ArrowUp => Key::Up,
        KeyCode::ArrowDown => Key::Down,
        KeyCode::Space => Key::Space,
        KeyCode::Enter | KeyCode::NumpadEnter => Key::Enter,
        KeyCode::Escape => Key::Escape,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Tab => Key::Tab,
        KeyCode::Backquote => Key::Backquote,
        KeyCode::PrintScreen => Key::PrintScreen,
        other => {
            if let Some(index) = FUNCTION_KEYS.iter().position(|f| *f == other) {
                Key::Function(index as u8 + 1)
            } else {
                let (_, ch) = CHARACTER_KEYS.iter().find(|(code, _)| *code == other)?;
                Key::Char(*ch)
            }
        }
    };
    Some(key)
}
