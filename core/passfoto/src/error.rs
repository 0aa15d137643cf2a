use thiserror::Error;

#[derive(Debug, Error)]
pub enum PassfotoError {
    #[error("failed to decode image: {0}")]
    DecodeError(String),

    #[error("unsupported image format")]
    UnsupportedFormat,

    #[error("source image has zero width or height")]
    InvalidSourceImage,

    #[error("format dimensions must be positive: {0}")]
    InvalidFormatDimensions(String),

    #[error("failed to encode image: {0}")]
    EncodeError(String),

    #[error("quality must be between 0.0 and 1.0, got {0}")]
    InvalidQuality(f32),

    #[error("render context unavailable: {0}")]
    RenderContextUnavailable(String),
}
