mod action;
mod backend;
mod config;
mod drawing;
mod fade;
mod input;
mod manager;
mod metrics;
mod overlay;
mod platform;
mod rendering;
mod scheduler;
mod screen;
mod stack;
#[cfg(test)]
mod test_support;

pub use action::{ActionQueue, ScreenAction};
pub use backend::{
    AudioSink, BackendError, EventSource, HeadlessVideo, NoAudio, NoScripts, QueuedEvents,
    ScriptHost, VideoBackend,
};
pub use config::{ConfigValidationError, ManagerConfig, SLOW_FRAME_ENV_VAR};
pub use drawing::{
    Align, Color, DrawCommand, DrawingContext, Rect, Vec2, BORDER_X, BORDER_Y, LAYER_BACKGROUND,
    LAYER_DEBUG, LAYER_FADE, LAYER_FOREGROUND, LAYER_GUI, LAYER_HUD, LAYER_OBJECTS,
};
pub use fade::{FadeDirection, FadeToBlack, ScreenFade};
pub use input::{Control, Controller, InputEvent, InputManager, Key, Modifiers, MouseButton};
pub use manager::{RunError, ScreenManager};
pub use metrics::{LoopMetricsSnapshot, MetricsHandle};
pub use overlay::{ControllerHud, Overlay};
pub use platform::{create_platform, PlatformError, WinitEvents};
pub use rendering::{
    rasterize, text_width, FrameBuffer, FrameSizeMismatch, PixelsVideo, CLEAR_COLOR,
    GLYPH_ADVANCE, LINE_HEIGHT,
};
pub use scheduler::{
    FramePlan, FrameClock, FrameScheduler, GameClock, SystemClock, DEFAULT_TARGET_FRAMERATE,
    MAX_FRAME_SKIP, STALL_THRESHOLD_FRAMES,
};
pub use screen::{Screen, ScreenContext, ScreenError};
pub use stack::ReconcileReport;
