use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::RgbaImage;
use pixels::{Error as PixelsError, Pixels, SurfaceTexture};
use thiserror::Error;
use tracing::info;
use winit::window::{Fullscreen, Window};

use crate::app::backend::{BackendError, VideoBackend};
use crate::app::drawing::{DrawingContext, Vec2};

use super::raster::{rasterize, FrameBuffer};

#[derive(Debug, Error)]
#[error("frame buffer holds {actual} bytes, expected {expected}")]
pub struct FrameSizeMismatch {
    pub expected: usize,
    pub actual: usize,
}

/// Software video back-end: rasterises draw commands into a logical-size
/// `pixels` buffer that the GPU scales onto the window surface.
pub struct PixelsVideo {
    window: Arc<Window>,
    pixels: Pixels<'static>,
    logical_width: u32,
    logical_height: u32,
    screenshot_dir: PathBuf,
}

impl PixelsVideo {
    pub fn new(
        window: Arc<Window>,
        logical_width: u32,
        logical_height: u32,
        screenshot_dir: PathBuf,
    ) -> Result<Self, PixelsError> {
        let size = window.inner_size();
        let surface = SurfaceTexture::new(
            size.width.max(1),
            size.height.max(1),
            Arc::clone(&window),
        );
        let pixels = Pixels::new(logical_width, logical_height, surface)?;
        Ok(Self {
            window,
            pixels,
            logical_width,
            logical_height,
            screenshot_dir,
        })
    }
}

impl VideoBackend for PixelsVideo {
    fn logical_size(&self) -> (u32, u32) {
        (self.logical_width, self.logical_height)
    }

    fn to_logical(&self, physical_x: f32, physical_y: f32) -> Vec2 {
        let (x, y) = match self.pixels.window_pos_to_pixel((physical_x, physical_y)) {
            Ok((x, y)) => (x as f32, y as f32),
            Err((x, y)) => (
                x.clamp(0, self.logical_width.max(1) as isize - 1) as f32,
                y.clamp(0, self.logical_height.max(1) as isize - 1) as f32,
            ),
        };
        Vec2::new(x, y)
    }

    fn render(&mut self, context: &DrawingContext) -> Result<(), BackendError> {
        let mut frame = FrameBuffer::new(
            self.pixels.frame_mut(),
            self.logical_width,
            self.logical_height,
        );
        rasterize(&mut frame, context);
        self.pixels
            .render()
            .map_err(|err| BackendError::Render(Box::new(err)))
    }

    fn on_resize(&mut self, width: u32, height: u32) -> Result<(), BackendError> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.pixels
            .resize_surface(width, height)
            .map_err(|source| BackendError::Resize {
                width,
                height,
                source: Box::new(source),
            })
    }

    fn set_fullscreen(&mut self, fullscreen: bool) {
        let mode = fullscreen.then_some(Fullscreen::Borderless(None));
        self.window.set_fullscreen(mode);
    }

    fn take_screenshot(&mut self) -> Result<Option<PathBuf>, BackendError> {
        let path = next_screenshot_path(&self.screenshot_dir);
        save_screenshot(
            self.pixels.frame(),
            self.logical_width,
            self.logical_height,
            &path,
        )?;
        Ok(Some(path))
    }
}

/// First unused `screenshot_NNNN.png` in `dir`.
pub(crate) fn next_screenshot_path(dir: &Path) -> PathBuf {
    let mut index = 1u32;
    loop {
        let candidate = dir.join(format!("screenshot_{index:04}.png"));
        if !candidate.exists() || index == u32::MAX {
            return candidate;
        }
        index += 1;
    }
}

pub(crate) fn save_screenshot(
    frame: &[u8],
    width: u32,
    height: u32,
    path: &Path,
) -> Result<(), BackendError> {
    let screenshot_error = |source: Box<dyn std::error::Error + Send + Sync>| {
        BackendError::Screenshot {
            path: path.to_path_buf(),
            source,
        }
    };

    let expected = width as usize * height as usize * 4;
    let image = RgbaImage::from_raw(width, height, frame.to_vec()).ok_or_else(|| {
        screenshot_error(Box::new(FrameSizeMismatch {
            expected,
            actual: frame.len(),
        }))
    })?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|err| screenshot_error(Box::new(err)))?;
    }
    image
        .save(path)
        .map_err(|err| screenshot_error(Box::new(err)))?;
    info!(path = %path.display(), width, height, "screenshot_written");
    Ok(())
}
