use std::collections::VecDeque;
use std::error::Error as StdError;
use std::path::PathBuf;

use thiserror::Error;

use super::drawing::{DrawCommand, DrawingContext, Vec2};
use super::input::InputEvent;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("failed to present frame: {0}")]
    Render(#[source] Box<dyn StdError + Send + Sync>),
    #[error("failed to resize surface to {width}x{height}: {source}")]
    Resize {
        width: u32,
        height: u32,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
    #[error("failed to write screenshot {}: {source}", path.display())]
    Screenshot {
        path: PathBuf,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
}

pub trait EventSource {
    fn poll_event(&mut self) -> Option<InputEvent>;
}

pub trait VideoBackend {
    fn logical_size(&self) -> (u32, u32);
    fn to_logical(&self, physical_x: f32, physical_y: f32) -> Vec2;
    fn render(&mut self, context: &DrawingContext) -> Result<(), BackendError>;
    fn on_resize(&mut self, width: u32, height: u32) -> Result<(), BackendError>;
    fn set_fullscreen(&mut self, _fullscreen: bool) {}
    fn take_screenshot(&mut self) -> Result<Option<PathBuf>, BackendError> {
        Ok(None)
    }
}

pub trait ScriptHost {
    fn advance(&mut self, game_time: f64);
    fn resume_waiting_on_screen_switch(&mut self);
}

pub trait AudioSink {
    fn update(&mut self);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoScripts;

impl ScriptHost for NoScripts {
    fn advance(&mut self, _game_time: f64) {}

    fn resume_waiting_on_screen_switch(&mut self) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoAudio;

impl AudioSink for NoAudio {
    fn update(&mut self) {}
}

/// In-memory event source; every queued event is delivered on the next drain.
#[derive(Debug, Default, Clone)]
pub struct QueuedEvents {
    queue: VecDeque<InputEvent>,
}

impl QueuedEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: InputEvent) {
        self.queue.push_back(event);
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl FromIterator<InputEvent> for QueuedEvents {
    fn from_iter<I: IntoIterator<Item = InputEvent>>(iter: I) -> Self {
        Self {
            queue: iter.into_iter().collect(),
        }
    }
}

impl EventSource for QueuedEvents {
    fn poll_event(&mut self) -> Option<InputEvent> {
        self.queue.pop_front()
    }
}

/// Video back-end that keeps the last frame's commands instead of presenting them.
#[derive(Debug, Clone)]
pub struct HeadlessVideo {
    logical_width: u32,
    logical_height: u32,
    physical_width: u32,
    physical_height: u32,
    fullscreen: bool,
    frames_rendered: u64,
    last_frame: Vec<DrawCommand>,
}

impl HeadlessVideo {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            logical_width: width,
            logical_height: height,
            physical_width: width,
            physical_height: height,
            fullscreen: false,
            frames_rendered: 0,
            last_frame: Vec::new(),
        }
    }

    pub fn set_physical_size(&mut self, width: u32, height: u32) {
        self.physical_width = width;
        self.physical_height = height;
    }

    pub fn physical_size(&self) -> (u32, u32) {
        (self.physical_width, self.physical_height)
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    pub fn last_frame(&self) -> &[DrawCommand] {
        &self.last_frame
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }
}

impl VideoBackend for HeadlessVideo {
    fn logical_size(&self) -> (u32, u32) {
        (self.logical_width, self.logical_height)
    }

    fn to_logical(&self, physical_x: f32, physical_y: f32) -> Vec2 {
        let scale_x = self.logical_width as f32 / self.physical_width.max(1) as f32;
        let scale_y = self.logical_height as f32 / self.physical_height.max(1) as f32;
        Vec2::new(physical_x * scale_x, physical_y * scale_y)
    }

    fn render(&mut self, context: &DrawingContext) -> Result<(), BackendError> {
        self.last_frame = context.sorted_commands().into_iter().cloned().collect();
        self.frames_rendered = self.frames_rendered.saturating_add(1);
        Ok(())
    }

    fn on_resize(&mut self, width: u32, height: u32) -> Result<(), BackendError> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.set_physical_size(width, height);
        Ok(())
    }

    fn set_fullscreen(&mut self, fullscreen: bool) {
        self.fullscreen = fullscreen;
    }
}
