pub mod app;

pub use app::{
    create_platform, text_width, ActionQueue, Align, AudioSink, BackendError, Color,
    ConfigValidationError, Control, Controller, DrawCommand, DrawingContext, EventSource,
    FadeDirection, FadeToBlack, FrameClock, FrameScheduler, GameClock, HeadlessVideo, InputEvent,
    Key, LoopMetricsSnapshot, ManagerConfig, MetricsHandle, Modifiers, MouseButton, NoAudio,
    NoScripts, Overlay, PixelsVideo, PlatformError, QueuedEvents, Rect, RunError, Screen,
    ScreenContext, ScreenError, ScreenFade, ScreenManager, ScriptHost, SystemClock, Vec2,
    VideoBackend, WinitEvents, BORDER_X, BORDER_Y, LAYER_BACKGROUND, LAYER_DEBUG, LAYER_FADE,
    LAYER_FOREGROUND, LAYER_GUI, LAYER_HUD, LAYER_OBJECTS, LINE_HEIGHT, SLOW_FRAME_ENV_VAR,
};
