//! Tiled watermark rendering.
//!
//! The watermark is a brick-staggered tiling of semi-transparent text,
//! rotated 25° counter-clockwise about the canvas center. Text is stamped
//! into oversized coverage masks (one for the fill, one for a 1-px outline
//! standing in for the stroke), the masks are rotated, and their center
//! window is blended onto the photo in white at very low opacity.

use image::{GrayImage, RgbImage};
use imageproc::geometric_transformations::{rotate_about_center, Interpolation};

use crate::error::PassfotoError;
use crate::font::TextRasterizer;

/// Rotation applied about the canvas center, in degrees.
const ANGLE_DEG: f32 = -25.0;

/// Fill opacity (white).
const FILL_OPACITY: f32 = 0.04;

/// Stroke opacity (white).
const STROKE_OPACITY: f32 = 0.03;

/// Font size floor in pixels.
const MIN_FONT_PX: f32 = 14.0;

/// Font size as a fraction of the canvas's smaller dimension.
const FONT_FRACTION: f32 = 0.075;

/// Minimum text width in font-size units, to keep spacing sane for short strings.
const MIN_TEXT_WIDTH_EM: f32 = 6.0;

/// Horizontal gap between repetitions, in font-size units.
const GAP_EM: f32 = 1.25;

/// Vertical step between rows, in font-size units.
const LINE_EM: f32 = 2.6;

/// Tiling metrics derived from the canvas size and the measured text width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WatermarkMetrics {
    /// Text size in pixels.
    pub font_size: f32,
    /// Effective text width used for spacing.
    pub text_width: f32,
    /// Horizontal distance between repetition starts.
    pub step_x: f32,
    /// Vertical distance between rows.
    pub step_y: f32,
}

/// Font size for a canvas: 7.5% of the smaller dimension, floored at 14 px.
pub fn font_size(width: u32, height: u32) -> f32 {
    (width.min(height) as f32 * FONT_FRACTION).floor().max(MIN_FONT_PX)
}

/// Derive tiling steps from the canvas size and the measured text width.
pub fn metrics(width: u32, height: u32, measured_text_width: f32) -> WatermarkMetrics {
    let font_size = font_size(width, height);
    let text_width = measured_text_width.max(font_size * MIN_TEXT_WIDTH_EM);
    WatermarkMetrics {
        font_size,
        text_width,
        step_x: text_width + font_size * GAP_EM,
        step_y: font_size * LINE_EM,
    }
}

/// Tile `text` across `photo` as a rotated, staggered, low-opacity overlay.
///
/// The photo is modified in place; dimensions are unchanged. Text drawing
/// goes through `rasterizer` and targets intermediate masks, so a failed
/// backend surfaces its error with the photo untouched — no partial overlay
/// is ever visible.
pub fn apply_watermark(
    photo: &mut RgbImage,
    text: &str,
    rasterizer: &dyn TextRasterizer,
) -> Result<(), PassfotoError> {
    if text.is_empty() {
        return Ok(());
    }

    let (width, height) = photo.dimensions();
    let m = metrics(width, height, rasterizer.measure(text, font_size(width, height))?);

    // The mask extends one canvas diagonal beyond the photo so the rotated
    // tiling leaves no gaps at the corners.
    let diagonal = ((width as f32).hypot(height as f32)).ceil();
    let side = (diagonal + 2.0 * m.step_y).ceil() as u32;

    let mut fill = GrayImage::new(side, side);
    let mut stroke = GrayImage::new(side, side);

    let mut row = 0u32;
    let mut y = -m.step_y;
    while y < side as f32 + m.step_y {
        let stagger = if row % 2 == 1 { m.step_x / 2.0 } else { 0.0 };
        let mut x = -m.step_x + stagger;
        while x < side as f32 + m.step_x {
            rasterizer.stamp(&mut fill, text, x, y, m.font_size)?;
            // 1-px outline offsets approximate the stroke pass
            for (dx, dy) in [(-1.0, 0.0), (1.0, 0.0), (0.0, -1.0), (0.0, 1.0)] {
                rasterizer.stamp(&mut stroke, text, x + dx, y + dy, m.font_size)?;
            }
            x += m.step_x;
        }
        y += m.step_y;
        row += 1;
    }

    let theta = ANGLE_DEG.to_radians();
    let fill = rotate_about_center(&fill, theta, Interpolation::Bilinear, image::Luma([0]));
    let stroke = rotate_about_center(&stroke, theta, Interpolation::Bilinear, image::Luma([0]));

    let offset_x = (side - width) / 2;
    let offset_y = (side - height) / 2;
    blend_white(photo, &stroke, offset_x, offset_y, STROKE_OPACITY);
    blend_white(photo, &fill, offset_x, offset_y, FILL_OPACITY);

    Ok(())
}

/// Blend a coverage mask onto the photo in white, scaled by `opacity`.
fn blend_white(photo: &mut RgbImage, mask: &GrayImage, offset_x: u32, offset_y: u32, opacity: f32) {
    for (x, y, pixel) in photo.enumerate_pixels_mut() {
        let coverage = mask.get_pixel(x + offset_x, y + offset_y).0[0] as f32 / 255.0;
        if coverage == 0.0 {
            continue;
        }
        let alpha = opacity * coverage;
        for channel in pixel.0.iter_mut() {
            *channel = (*channel as f32 * (1.0 - alpha) + 255.0 * alpha).round() as u8;
        }
    }
}
