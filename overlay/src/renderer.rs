//! Software renderer using tiny-skia
//!
//! All rendering is done on the CPU into a premultiplied RGBA pixel buffer
//! owned by the platform surface.

use tiny_skia::{Color, Paint, PixmapMut, Rect, Transform};

pub mod colors {
    use tiny_skia::Color;

    #[inline]
    pub fn transparent() -> Color {
        Color::from_rgba8(0, 0, 0, 0)
    }

    /// Fill color for the edge indicators
    #[inline]
    pub fn indicator(rgba: [u8; 4]) -> Color {
        let [r, g, b, a] = rgba;
        Color::from_rgba8(r, g, b, a)
    }
}

/// A stateless software renderer for overlay content
#[derive(Debug, Default, Clone, Copy)]
pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    /// Create a new pixel buffer (RGBA format)
    pub fn create_buffer(width: u32, height: u32) -> Vec<u8> {
        vec![0u8; (width * height * 4) as usize]
    }

    /// Clear a pixel buffer with a color
    pub fn clear(&self, buffer: &mut [u8], width: u32, height: u32, color: Color) {
        if let Some(mut pixmap) = PixmapMut::from_bytes(buffer, width, height) {
            pixmap.fill(color);
        }
    }

    /// Draw a filled rectangle. Degenerate rectangles are skipped.
    pub fn fill_rect(
        &self,
        buffer: &mut [u8],
        width: u32,
        height: u32,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        color: Color,
    ) {
        let Some(mut pixmap) = PixmapMut::from_bytes(buffer, width, height) else {
            return;
        };

        let Some(rect) = Rect::from_xywh(x, y, w, h) else {
            return;
        };

        let mut paint = Paint::default();
        paint.set_color(color);
        paint.anti_alias = true;

        pixmap.fill_rect(rect, &paint, Transform::identity(), None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pixel(buffer: &[u8], width: u32, x: u32, y: u32) -> [u8; 4] {
        let i = ((y * width + x) * 4) as usize;
        [buffer[i], buffer[i + 1], buffer[i + 2], buffer[i + 3]]
    }

    #[test]
    fn fill_rect_writes_premultiplied_pixels() {
        let renderer = Renderer::new();
        let mut buffer = Renderer::create_buffer(8, 4);
        renderer.fill_rect(
            &mut buffer,
            8,
            4,
            0.0,
            0.0,
            4.0,
            4.0,
            colors::indicator([255, 255, 255, 64]),
        );

        assert_eq!(pixel(&buffer, 8, 1, 2), [64, 64, 64, 64]);
        assert_eq!(pixel(&buffer, 8, 6, 2), [0, 0, 0, 0]);

        renderer.clear(&mut buffer, 8, 4, colors::transparent());
        assert!(buffer.iter().all(|&b| b == 0));
    }

    #[test]
    fn degenerate_inputs_are_ignored() {
        let renderer = Renderer::new();
        let mut buffer = Renderer::create_buffer(4, 4);
        renderer.fill_rect(&mut buffer, 4, 4, 0.0, 0.0, 0.0, 4.0, colors::transparent());
        // buffer too small for the stated size
        renderer.fill_rect(&mut buffer, 8, 8, 0.0, 0.0, 2.0, 2.0, colors::indicator([255; 4]));
        assert!(buffer.iter().all(|&b| b == 0));
    }
}
