//! Overlay rendering onto the grayscale frame buffer.
//!
//! Stateless apart from the static glyph table: text and markers are drawn
//! directly into an 8-bit canvas before colorization. Glyph pixels outside
//! the canvas are skipped; overlay text never corrupts adjacent memory.

pub mod font;

use font::{glyph, GLYPH_ADVANCE, GLYPH_HEIGHT, GLYPH_WIDTH};

/// Default overlay intensity (white after colormap lookup on most palettes).
pub const DEFAULT_COLOR: u8 = 0xFF;

/// Width × height 8-bit grayscale buffer.
#[derive(Debug, Clone)]
pub struct Canvas {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl Canvas {
    /// Canvas filled with mid-gray (the text strip background).
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, pixels: vec![128; width * height] }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Pixel value at `(x, y)`; out-of-bounds reads return `None`.
    pub fn get(&self, x: usize, y: usize) -> Option<u8> {
        if x < self.width && y < self.height {
            Some(self.pixels[y * self.width + x])
        } else {
            None
        }
    }

    /// Write a pixel, skipping silently when outside the canvas.
    pub fn put(&mut self, x: usize, y: usize, value: u8) {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x] = value;
        }
    }

    /// Raw pixel access for colorization.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Draw `text` with its top-left corner at `(x, y)`.
    ///
    /// 5×7 glyphs advance 6 px per character; unset glyph bits are
    /// transparent. Characters outside printable ASCII render as spaces.
    pub fn draw_text(&mut self, x: usize, y: usize, text: &str, color: u8) {
        let mut cx = x;
        for c in text.chars() {
            let columns = glyph(c);
            for (rx, column) in columns.iter().enumerate().take(GLYPH_WIDTH) {
                for ry in 0..GLYPH_HEIGHT {
                    if (column >> ry) & 1 == 1 {
                        self.put(cx + rx, y + ry, color);
                    }
                }
            }
            cx += GLYPH_ADVANCE;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_sets_glyph_pixels_transparently() {
        let mut canvas = Canvas::new(40, 20);
        canvas.draw_text(2, 3, "|", DEFAULT_COLOR);

        // '|' is a single full-height column at glyph x=2.
        for ry in 0..7 {
            assert_eq!(canvas.get(4, 3 + ry), Some(DEFAULT_COLOR));
        }
        // Unset bits stay at background.
        assert_eq!(canvas.get(2, 3), Some(128));
    }

    #[test]
    fn advances_six_pixels_per_char() {
        let mut canvas = Canvas::new(40, 10);
        canvas.draw_text(0, 0, "||", DEFAULT_COLOR);
        assert_eq!(canvas.get(2, 0), Some(DEFAULT_COLOR));
        assert_eq!(canvas.get(8, 0), Some(DEFAULT_COLOR));
    }

    #[test]
    fn clipping_never_panics() {
        let mut canvas = Canvas::new(10, 10);
        canvas.draw_text(8, 8, "WWWW", DEFAULT_COLOR);
        canvas.draw_text(0, 9, "gj", DEFAULT_COLOR);
        // Interior untouched by clipped glyphs' transparent regions.
        assert_eq!(canvas.get(0, 0), Some(128));
    }

    #[test]
    fn non_printables_render_blank() {
        let mut canvas = Canvas::new(20, 10);
        canvas.draw_text(0, 0, "\u{1}\t", DEFAULT_COLOR);
        assert!(canvas.pixels().iter().all(|&p| p == 128));
    }
}
