//! Text rasterization for the watermark renderer.
//!
//! The renderer draws through the [`TextRasterizer`] capability so it can run
//! against any 2D text backend — a GPU canvas adapter, a font library, or the
//! built-in [`BlockFont`]. The trait methods are fallible: adapter backends
//! whose drawing surface disappears report
//! [`PassfotoError::RenderContextUnavailable`].

use image::GrayImage;

use crate::error::PassfotoError;

/// Injected text-drawing capability: measure a string and stamp it into a
/// coverage mask at a given position and size.
pub trait TextRasterizer {
    /// Advance width of `text` at `size_px`, in pixels.
    fn measure(&self, text: &str, size_px: f32) -> Result<f32, PassfotoError>;

    /// Stamp `text` into `mask` with its top-left corner at `(x, y)`.
    /// Pixels covered by glyphs are raised to full coverage (255); pixels
    /// outside the mask are ignored.
    fn stamp(
        &self,
        mask: &mut GrayImage,
        text: &str,
        x: f32,
        y: f32,
        size_px: f32,
    ) -> Result<(), PassfotoError>;
}

/// Built-in 5×7 block font.
///
/// Glyphs are classic 5×7 dot-matrix bitmaps scaled to the requested pixel
/// size. Covers ASCII letters (case-folded to uppercase), digits, and a few
/// punctuation marks; unknown characters advance without marking. Metrics
/// are exact and deterministic, which keeps compositing reproducible.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockFont;

/// Glyph cell geometry: 5 columns of ink plus 1 column of spacing, 7 rows.
const GLYPH_COLS: u32 = 5;
const GLYPH_ROWS: u32 = 7;
const ADVANCE_COLS: u32 = GLYPH_COLS + 1;

impl TextRasterizer for BlockFont {
    fn measure(&self, text: &str, size_px: f32) -> Result<f32, PassfotoError> {
        let cell = size_px / GLYPH_ROWS as f32;
        Ok(text.chars().count() as f32 * ADVANCE_COLS as f32 * cell)
    }

    fn stamp(
        &self,
        mask: &mut GrayImage,
        text: &str,
        x: f32,
        y: f32,
        size_px: f32,
    ) -> Result<(), PassfotoError> {
        let cell = size_px / GLYPH_ROWS as f32;
        let mut pen_x = x;
        for ch in text.chars() {
            if let Some(rows) = glyph_rows(ch) {
                stamp_glyph(mask, pen_x, y, cell, &rows);
            }
            pen_x += ADVANCE_COLS as f32 * cell;
        }
        Ok(())
    }
}

/// Fill one glyph's on-bits as `cell`-sized blocks with top-left at `(x, y)`.
fn stamp_glyph(mask: &mut GrayImage, x: f32, y: f32, cell: f32, rows: &[u8; 7]) {
    let (mask_w, mask_h) = mask.dimensions();
    for (row, bits) in rows.iter().enumerate() {
        for col in 0..GLYPH_COLS {
            if (bits >> (GLYPH_COLS - 1 - col)) & 1 == 0 {
                continue;
            }
            let x0 = x + col as f32 * cell;
            let y0 = y + row as f32 * cell;
            let px0 = x0.round().max(0.0) as u32;
            let py0 = y0.round().max(0.0) as u32;
            let px1 = ((x0 + cell).round().max(0.0) as u32).min(mask_w);
            let py1 = ((y0 + cell).round().max(0.0) as u32).min(mask_h);
            for py in py0..py1 {
                for px in px0..px1 {
                    mask.put_pixel(px, py, image::Luma([255]));
                }
            }
        }
    }
}

/// 5×7 row bitmasks, bit 4 = leftmost column.
#[rustfmt::skip]
fn glyph_rows(ch: char) -> Option<[u8; 7]> {
    let ch = ch.to_ascii_uppercase();
    Some(match ch {
        '0' => [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
        '1' => [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        '2' => [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111],
        '3' => [0b11110, 0b00001, 0b00001, 0b01110, 0b00001, 0b00001, 0b11110],
        '4' => [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010],
        '5' => [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110],
        '6' => [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110],
        '7' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000],
        '8' => [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
        '9' => [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100],
        'A' => [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'B' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110],
        'C' => [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110],
        'D' => [0b11110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11110],
        'E' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111],
        'F' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000],
        'G' => [0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01111],
        'H' => [0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'I' => [0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        'J' => [0b00111, 0b00010, 0b00010, 0b00010, 0b00010, 0b10010, 0b01100],
        'K' => [0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001],
        'L' => [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111],
        'M' => [0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001],
        'N' => [0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001, 0b10001],
        'O' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'P' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000],
        'Q' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101],
        'R' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001],
        'S' => [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110],
        'T' => [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100],
        'U' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'V' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100],
        'W' => [0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b11011, 0b10001],
        'X' => [0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001],
        'Y' => [0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100, 0b00100],
        'Z' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111],
        '-' => [0b00000, 0b00000, 0b00000, 0b01110, 0b00000, 0b00000, 0b00000],
        '.' => [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b00110, 0b00110],
        '/' => [0b00001, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b10000],
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn measure_scales_with_size() {
        let font = BlockFont;
        let narrow = font.measure("SAMPLE", 14.0).unwrap();
        let wide = font.measure("SAMPLE", 28.0).unwrap();
        assert!((wide - narrow * 2.0).abs() < 1e-3);
    }

    #[test]
    fn measure_counts_every_char() {
        let font = BlockFont;
        let one = font.measure("A", 14.0).unwrap();
        let three = font.measure("ABC", 14.0).unwrap();
        assert!((three - one * 3.0).abs() < 1e-3);
    }

    #[test]
    fn stamp_marks_pixels() {
        let font = BlockFont;
        let mut mask = GrayImage::new(100, 40);
        font.stamp(&mut mask, "HI", 2.0, 2.0, 21.0).unwrap();
        let inked = mask.pixels().filter(|p| p.0[0] > 0).count();
        assert!(inked > 0);
    }

    #[test]
    fn stamp_ignores_out_of_bounds() {
        let font = BlockFont;
        let mut mask = GrayImage::new(10, 10);
        // Mostly off the left and top edges — must not panic
        font.stamp(&mut mask, "EDGE", -30.0, -30.0, 21.0).unwrap();
    }

    #[test]
    fn unknown_chars_advance_without_ink() {
        let font = BlockFont;
        let mut mask = GrayImage::new(60, 20);
        font.stamp(&mut mask, "\u{263a}\u{263a}", 0.0, 0.0, 14.0).unwrap();
        assert!(mask.pixels().all(|p| p.0[0] == 0));
        // width still accounted for
        assert!(font.measure("\u{263a}\u{263a}", 14.0).unwrap() > 0.0);
    }

    #[test]
    fn lowercase_folds_to_uppercase() {
        let font = BlockFont;
        let mut upper = GrayImage::new(40, 20);
        let mut lower = GrayImage::new(40, 20);
        font.stamp(&mut upper, "AB", 0.0, 0.0, 14.0).unwrap();
        font.stamp(&mut lower, "ab", 0.0, 0.0, 14.0).unwrap();
        assert_eq!(upper.as_raw(), lower.as_raw());
    }
}
