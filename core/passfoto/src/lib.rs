//! Passport photo composition: crop, scale, watermark, and lay out photos
//! for printing.
//!
//! # Example
//!
//! ```no_run
//! use passfoto::PhotoComposer;
//!
//! let raw_bytes = std::fs::read("photo.jpg").unwrap();
//! let result = PhotoComposer::new(raw_bytes)
//!     .unwrap()
//!     .target(413, 531)
//!     .watermark("SPECIMEN")
//!     .compose()
//!     .unwrap();
//! println!("Composed: {} bytes", result.data.len());
//! ```
#![warn(missing_docs)]

mod compose;
/// Cover-crop math and the interactive pan/zoom view.
pub mod crop;
/// Print document generation.
pub mod document;
mod error;
/// Download naming for exported photos.
pub mod export;
/// Photo format catalog and registry.
pub mod format;
/// Text rasterization backends for the watermark renderer.
pub mod font;
/// Sheet layout planning for print.
pub mod layout;
/// Tiled watermark rendering.
pub mod watermark;

/// Error type returned by passfoto operations.
pub use error::PassfotoError;
/// Injected text-drawing capability and the built-in block font.
pub use font::{BlockFont, TextRasterizer};

use crop::{CropView, Viewport};
use format::PhotoFormat;

/// Output image format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// PNG encoding (lossless).
    #[default]
    Png,

    /// JPEG encoding.
    Jpeg,
}

impl OutputFormat {
    /// Conventional file extension for the format.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpg",
        }
    }
}

/// Result of a single composition operation.
#[derive(Debug, Clone)]
pub struct ComposedPhoto {
    /// The encoded image bytes.
    pub data: Vec<u8>,

    /// The output format used.
    pub format: OutputFormat,

    /// Width of the output image in pixels.
    pub width: u32,

    /// Height of the output image in pixels.
    pub height: u32,

    /// Size of the original input in bytes.
    pub original_size: usize,
}

/// Builder for composing passport photos.
///
/// Decodes the input image on construction, then applies crop, scale,
/// watermark, and encoding with configurable parameters. The default target
/// is the 35×45 mm format at 413×531 px.
pub struct PhotoComposer {
    input: Vec<u8>,
    target_width: u32,
    target_height: u32,
    view: Option<(CropView, Viewport)>,
    watermark: Option<String>,
    rasterizer: Option<Box<dyn TextRasterizer>>,
    output: OutputFormat,
    quality: f32,
}

impl PhotoComposer {
    /// Create a new composer from raw image bytes (JPEG, PNG, or WebP).
    pub fn new(input: Vec<u8>) -> Result<Self, PassfotoError> {
        match compose::detect_format(&input)? {
            image::ImageFormat::Png | image::ImageFormat::Jpeg | image::ImageFormat::WebP => {}
            _ => return Err(PassfotoError::UnsupportedFormat),
        }

        Ok(Self {
            input,
            target_width: 413,
            target_height: 531,
            view: None,
            watermark: None,
            rasterizer: None,
            output: OutputFormat::default(),
            quality: 1.0,
        })
    }

    /// Set the output dimensions in pixels (default: 413×531).
    pub fn target(mut self, width: u32, height: u32) -> Self {
        self.target_width = width;
        self.target_height = height;
        self
    }

    /// Set the output dimensions from a photo format's pixel size.
    pub fn format(self, format: &PhotoFormat) -> Self {
        self.target(format.width_px, format.height_px)
    }

    /// Use an interactive pan/zoom view instead of the auto-centered cover
    /// crop. The view is clamped against the viewport before cropping, so a
    /// stale offset from a dragged-out state still yields a full frame.
    pub fn view(mut self, view: CropView, viewport: Viewport) -> Self {
        self.view = Some((view, viewport));
        self
    }

    /// Overlay a tiled watermark with the given text. Empty text disables
    /// the overlay.
    pub fn watermark(mut self, text: impl Into<String>) -> Self {
        self.watermark = Some(text.into());
        self
    }

    /// Provide a custom text rasterizer for the watermark.
    ///
    /// When unset, the built-in [`BlockFont`] is used. This allows routing
    /// watermark text through a platform canvas or a font library.
    pub fn text_rasterizer(mut self, rasterizer: Box<dyn TextRasterizer>) -> Self {
        self.rasterizer = Some(rasterizer);
        self
    }

    /// Set the output format (default: `OutputFormat::Png`).
    pub fn output(mut self, format: OutputFormat) -> Self {
        self.output = format;
        self
    }

    /// Set the encoding quality from 0.0 (lowest) to 1.0 (highest).
    /// Default: 1.0. Only affects JPEG output.
    pub fn quality(mut self, quality: f32) -> Self {
        self.quality = quality;
        self
    }

    /// Compose the photo with the configured settings.
    pub fn compose(self) -> Result<ComposedPhoto, PassfotoError> {
        if self.target_width == 0 || self.target_height == 0 {
            return Err(PassfotoError::InvalidFormatDimensions(format!(
                "target must be positive, got {}x{}",
                self.target_width, self.target_height
            )));
        }
        if !(0.0..=1.0).contains(&self.quality) {
            return Err(PassfotoError::InvalidQuality(self.quality));
        }

        let rasterizer = self.rasterizer.as_deref().unwrap_or(&BlockFont);

        compose::compose_pipeline(
            &self.input,
            self.target_width,
            self.target_height,
            self.view,
            self.watermark.as_deref(),
            rasterizer,
            &self.output,
            self.quality,
        )
    }
}
