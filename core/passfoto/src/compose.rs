use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageEncoder, ImageFormat, RgbImage, RgbaImage};

use crate::crop::{cover_crop, view_region, CropRegion, CropView, Viewport};
use crate::error::PassfotoError;
use crate::font::TextRasterizer;
use crate::watermark::apply_watermark;
use crate::{ComposedPhoto, OutputFormat};

/// Decode input bytes into a `DynamicImage`.
pub(crate) fn decode_image(input: &[u8]) -> Result<DynamicImage, PassfotoError> {
    image::load_from_memory(input).map_err(|e| PassfotoError::DecodeError(e.to_string()))
}

/// Detect the input image format from the raw bytes.
pub(crate) fn detect_format(input: &[u8]) -> Result<ImageFormat, PassfotoError> {
    image::guess_format(input).map_err(|e| PassfotoError::DecodeError(e.to_string()))
}

/// Flatten alpha channel by compositing onto a white background.
pub(crate) fn flatten_alpha(image: &DynamicImage) -> RgbImage {
    let rgba: RgbaImage = image.to_rgba8();
    let (width, height) = (rgba.width(), rgba.height());
    let mut rgb = RgbImage::new(width, height);

    for (x, y, pixel) in rgba.enumerate_pixels() {
        let [r, g, b, a] = pixel.0;
        let alpha = a as f32 / 255.0;
        let inv_alpha = 1.0 - alpha;
        let out_r = (r as f32 * alpha + 255.0 * inv_alpha).round() as u8;
        let out_g = (g as f32 * alpha + 255.0 * inv_alpha).round() as u8;
        let out_b = (b as f32 * alpha + 255.0 * inv_alpha).round() as u8;
        rgb.put_pixel(x, y, image::Rgb([out_r, out_g, out_b]));
    }

    rgb
}

/// Encode an image to the output format.
///
/// PNG is lossless (quality ignored); JPEG maps quality 0.0–1.0 to 1–100.
pub(crate) fn encode_image(
    image: &RgbImage,
    format: &OutputFormat,
    quality: f32,
) -> Result<Vec<u8>, PassfotoError> {
    let mut buffer = Vec::new();
    let raw = image.as_raw();
    let color = image::ExtendedColorType::Rgb8;

    match format {
        OutputFormat::Png => {
            PngEncoder::new(&mut buffer)
                .write_image(raw, image.width(), image.height(), color)
                .map_err(|e| PassfotoError::EncodeError(e.to_string()))?;
        }
        OutputFormat::Jpeg => {
            let quality_percent = ((quality * 100.0).round() as u8).clamp(1, 100);
            JpegEncoder::new_with_quality(&mut buffer, quality_percent)
                .write_image(raw, image.width(), image.height(), color)
                .map_err(|e| PassfotoError::EncodeError(e.to_string()))?;
        }
    }

    Ok(buffer)
}

/// Full compositing pipeline: decode → crop → scale → flatten → watermark → encode.
///
/// The crop is the auto-centered cover crop unless an interactive `view` is
/// supplied, in which case the clamped visible region is used instead. The
/// output buffer is exactly `target_width`×`target_height`.
#[allow(clippy::too_many_arguments)]
pub(crate) fn compose_pipeline(
    input: &[u8],
    target_width: u32,
    target_height: u32,
    view: Option<(CropView, Viewport)>,
    watermark: Option<&str>,
    rasterizer: &dyn TextRasterizer,
    format: &OutputFormat,
    quality: f32,
) -> Result<ComposedPhoto, PassfotoError> {
    let decoded = decode_image(input)?;

    if decoded.width() == 0 || decoded.height() == 0 {
        return Err(PassfotoError::InvalidSourceImage);
    }

    let CropRegion {
        x,
        y,
        width,
        height,
    } = match view {
        Some((view, viewport)) => view_region(view, viewport, decoded.width(), decoded.height()),
        None => cover_crop(decoded.width(), decoded.height(), target_width, target_height),
    };

    let cropped = decoded.crop_imm(x, y, width, height);
    let scaled = cropped.resize_exact(target_width, target_height, FilterType::Lanczos3);
    let mut rgb = flatten_alpha(&scaled);

    if let Some(text) = watermark {
        apply_watermark(&mut rgb, text, rasterizer)?;
    }

    let data = encode_image(&rgb, format, quality)?;

    Ok(ComposedPhoto {
        data,
        format: *format,
        width: rgb.width(),
        height: rgb.height(),
        original_size: input.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::BlockFont;
    use image::ImageEncoder;

    fn make_test_rgb(width: u32, height: u32) -> RgbImage {
        let mut img = RgbImage::new(width, height);
        for (x, y, pixel) in img.enumerate_pixels_mut() {
            *pixel = image::Rgb([
                (x * 255 / width.max(1)) as u8,
                (y * 255 / height.max(1)) as u8,
                128,
            ]);
        }
        img
    }

    fn make_test_png(width: u32, height: u32) -> Vec<u8> {
        let img = make_test_rgb(width, height);
        let mut buffer = Vec::new();
        PngEncoder::new(&mut buffer)
            .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
            .unwrap();
        buffer
    }

    #[test]
    fn output_matches_target_exactly() {
        let png = make_test_png(200, 300);
        for (w, h) in [(413, 531), (600, 600), (64, 480)] {
            let photo = compose_pipeline(
                &png,
                w,
                h,
                None,
                None,
                &BlockFont,
                &OutputFormat::Png,
                1.0,
            )
            .unwrap();
            assert_eq!((photo.width, photo.height), (w, h));
        }
    }

    #[test]
    fn png_output_is_png() {
        let png = make_test_png(100, 100);
        let photo = compose_pipeline(
            &png,
            64,
            64,
            None,
            None,
            &BlockFont,
            &OutputFormat::Png,
            1.0,
        )
        .unwrap();
        assert_eq!(&photo.data[1..4], b"PNG");
    }

    #[test]
    fn jpeg_output_is_jpeg() {
        let png = make_test_png(100, 100);
        let photo = compose_pipeline(
            &png,
            64,
            64,
            None,
            None,
            &BlockFont,
            &OutputFormat::Jpeg,
            1.0,
        )
        .unwrap();
        assert_eq!(photo.data[0], 0xFF);
        assert_eq!(photo.data[1], 0xD8);
    }

    #[test]
    fn compositing_is_deterministic() {
        let png = make_test_png(320, 240);
        let run = || {
            compose_pipeline(
                &png,
                413,
                531,
                None,
                Some("SPECIMEN"),
                &BlockFont,
                &OutputFormat::Png,
                1.0,
            )
            .unwrap()
        };
        assert_eq!(run().data, run().data);
    }

    #[test]
    fn undecodable_input_is_rejected() {
        let result = compose_pipeline(
            b"not an image",
            64,
            64,
            None,
            None,
            &BlockFont,
            &OutputFormat::Png,
            1.0,
        );
        assert!(matches!(result, Err(PassfotoError::DecodeError(_))));
    }

    #[test]
    fn view_crop_changes_output() {
        let png = make_test_png(400, 400);
        let viewport = Viewport::new(100.0, 100.0);
        let centered = compose_pipeline(
            &png,
            100,
            100,
            Some((CropView::centered(viewport, 400, 400, 2.0), viewport)),
            None,
            &BlockFont,
            &OutputFormat::Png,
            1.0,
        )
        .unwrap();
        let panned = compose_pipeline(
            &png,
            100,
            100,
            Some((
                CropView {
                    offset_x: -600.0,
                    offset_y: 0.0,
                    zoom: 2.0,
                },
                viewport,
            )),
            None,
            &BlockFont,
            &OutputFormat::Png,
            1.0,
        )
        .unwrap();
        assert_ne!(centered.data, panned.data);
    }

    #[test]
    fn flatten_alpha_composites_over_white() {
        let mut rgba = RgbaImage::new(1, 1);
        rgba.put_pixel(0, 0, image::Rgba([255, 0, 0, 0]));
        let rgb = flatten_alpha(&DynamicImage::ImageRgba8(rgba));
        assert_eq!(rgb.get_pixel(0, 0), &image::Rgb([255, 255, 255]));
    }

    #[test]
    fn flatten_alpha_preserves_opaque() {
        let mut rgba = RgbaImage::new(1, 1);
        rgba.put_pixel(0, 0, image::Rgba([100, 150, 200, 255]));
        let rgb = flatten_alpha(&DynamicImage::ImageRgba8(rgba));
        assert_eq!(rgb.get_pixel(0, 0), &image::Rgb([100, 150, 200]));
    }

    #[test]
    fn jpeg_quality_affects_size() {
        let img = make_test_rgb(200, 200);
        let high = encode_image(&img, &OutputFormat::Jpeg, 1.0).unwrap();
        let low = encode_image(&img, &OutputFormat::Jpeg, 0.3).unwrap();
        assert!(low.len() < high.len());
    }
}
