use crate::app::drawing::{Align, Color, DrawCommand, DrawingContext, Rect, Vec2};

use super::text::{glyph_rows, text_width, GLYPH_ADVANCE, GLYPH_WIDTH, TEXT_SCALE};

pub const CLEAR_COLOR: Color = [0, 0, 0, 255];

/// RGBA8 target the rasteriser writes into. Out-of-range writes are dropped.
pub struct FrameBuffer<'a> {
    pixels: &'a mut [u8],
    width: u32,
    height: u32,
}

impl<'a> FrameBuffer<'a> {
    pub fn new(pixels: &'a mut [u8], width: u32, height: u32) -> Self {
        Self {
            pixels,
            width,
            height,
        }
    }

    pub fn clear(&mut self, color: Color) {
        for pixel in self.pixels.chunks_exact_mut(4) {
            pixel.copy_from_slice(&color);
        }
    }

    fn blend_pixel(&mut self, x: i64, y: i64, color: Color) {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return;
        }
        let index = (y as usize * self.width as usize + x as usize) * 4;
        let Some(dst) = self.pixels.get_mut(index..index + 4) else {
            return;
        };
        let alpha = u32::from(color[3]);
        match alpha {
            0 => {}
            255 => dst.copy_from_slice(&color),
            _ => {
                for channel in 0..3 {
                    let src = u32::from(color[channel]);
                    let old = u32::from(dst[channel]);
                    dst[channel] = ((src * alpha + old * (255 - alpha) + 127) / 255) as u8;
                }
                dst[3] = 255;
            }
        }
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        if color[3] == 0 {
            return;
        }
        let x0 = (rect.x.round() as i64).max(0);
        let y0 = (rect.y.round() as i64).max(0);
        let x1 = ((rect.x + rect.width).round() as i64).min(i64::from(self.width));
        let y1 = ((rect.y + rect.height).round() as i64).min(i64::from(self.height));
        for y in y0..y1 {
            for x in x0..x1 {
                self.blend_pixel(x, y, color);
            }
        }
    }

    fn draw_text(&mut self, text: &str, position: Vec2, align: Align, color: Color) {
        let width = text_width(text);
        let left = match align {
            Align::Left => position.x,
            Align::Center => position.x - width / 2.0,
            Align::Right => position.x - width,
        };
        let mut origin_x = left.round() as i64;
        let origin_y = position.y.round() as i64;
        for ch in text.chars() {
            self.draw_glyph(ch, origin_x, origin_y, color);
            origin_x += i64::from(GLYPH_ADVANCE);
        }
    }

    fn draw_glyph(&mut self, ch: char, origin_x: i64, origin_y: i64, color: Color) {
        let scale = i64::from(TEXT_SCALE);
        for (row_index, row) in glyph_rows(ch).iter().enumerate() {
            for column in 0..GLYPH_WIDTH {
                let bit = 1u8 << (GLYPH_WIDTH - 1 - column);
                if row & bit == 0 {
                    continue;
                }
                let px = origin_x + i64::from(column) * scale;
                let py = origin_y + row_index as i64 * scale;
                for dy in 0..scale {
                    for dx in 0..scale {
                        self.blend_pixel(px + dx, py + dy, color);
                    }
                }
            }
        }
    }
}

/// Clears `frame` and draws every command of `context` in layer order.
pub fn rasterize(frame: &mut FrameBuffer<'_>, context: &DrawingContext) {
    frame.clear(CLEAR_COLOR);
    for command in context.sorted_commands() {
        match command {
            DrawCommand::FillRect { rect, color, .. } => frame.fill_rect(*rect, *color),
            DrawCommand::FillScreen { color, .. } => {
                let full = Rect::new(0.0, 0.0, frame.width as f32, frame.height as f32);
                frame.fill_rect(full, *color);
            }
            DrawCommand::Text {
                text,
                position,
                align,
                color,
                ..
            } => frame.draw_text(text, *position, *align, *color),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::drawing::{LAYER_FADE, LAYER_OBJECTS};

    fn pixel(frame: &[u8], width: u32, x: u32, y: u32) -> [u8; 4] {
        let index = ((y * width + x) * 4) as usize;
        [
            frame[index],
            frame[index + 1],
            frame[index + 2],
            frame[index + 3],
        ]
    }

    fn render(width: u32, height: u32, context: &DrawingContext) -> Vec<u8> {
        let mut pixels = vec![0u8; (width * height * 4) as usize];
        rasterize(&mut FrameBuffer::new(&mut pixels, width, height), context);
        pixels
    }

    #[test]
    fn empty_context_clears_to_opaque_black() {
        let context = DrawingContext::new(4, 4);
        let pixels = render(4, 4, &context);
        assert!(pixels.chunks_exact(4).all(|p| p == CLEAR_COLOR));
    }

    #[test]
    fn rect_is_clipped_to_frame() {
        let mut context = DrawingContext::new(8, 8);
        context.fill_rect(Rect::new(-4.0, 6.0, 20.0, 20.0), [255, 0, 0, 255], LAYER_OBJECTS);
        let pixels = render(8, 8, &context);

        assert_eq!(pixel(&pixels, 8, 0, 7), [255, 0, 0, 255]);
        assert_eq!(pixel(&pixels, 8, 7, 6), [255, 0, 0, 255]);
        assert_eq!(pixel(&pixels, 8, 3, 5), CLEAR_COLOR);
    }

    #[test]
    fn higher_layer_blends_over_lower_layer() {
        let mut context = DrawingContext::new(2, 2);
        // Recorded out of order; layers decide.
        context.fill_screen([0, 0, 0, 128], LAYER_FADE);
        context.fill_screen([200, 100, 50, 255], LAYER_OBJECTS);
        let pixels = render(2, 2, &context);

        assert_eq!(pixel(&pixels, 2, 1, 1), [100, 50, 25, 255]);
    }

    #[test]
    fn right_aligned_text_ends_at_anchor() {
        let mut context = DrawingContext::new(64, 16);
        context.draw_text("1", Vec2::new(64.0, 0.0), Align::Right, [255, 255, 255, 255], LAYER_OBJECTS);
        let pixels = render(64, 16, &context);

        let lit_columns: Vec<u32> = (0..64)
            .filter(|x| (0..16).any(|y| pixel(&pixels, 64, *x, y) != CLEAR_COLOR))
            .collect();
        let first = *lit_columns.first().expect("lit pixels");
        let last = *lit_columns.last().expect("lit pixels");
        assert_eq!(first, 64 - GLYPH_ADVANCE);
        assert_eq!(last, 64 - GLYPH_ADVANCE + GLYPH_WIDTH * TEXT_SCALE - 1);
    }

    #[test]
    fn drawing_outside_or_into_short_buffers_never_panics() {
        let mut context = DrawingContext::new(3, 3);
        context.draw_text("WIDE TEXT", Vec2::new(-20.0, -3.0), Align::Center, [9, 9, 9, 255], 0);
        context.fill_rect(Rect::new(1e9, 1e9, 5.0, 5.0), [9, 9, 9, 255], 0);
        context.fill_rect(Rect::new(-1e9, -1e9, 2e9, 2e9), [9, 9, 9, 100], 0);
        for (width, height) in [(1, 1), (3, 3), (0, 0)] {
            let _ = render(width, height, &context);
        }

        let mut short = vec![0u8; 10];
        rasterize(&mut FrameBuffer::new(&mut short, 8, 8), &context);
    }
}
