mod pixels_video;
mod raster;
mod text;

pub use pixels_video::{FrameSizeMismatch, PixelsVideo};
pub use raster::{rasterize, FrameBuffer, CLEAR_COLOR};
pub use text::{text_width, GLYPH_ADVANCE, LINE_HEIGHT};
