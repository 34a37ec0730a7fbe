//! Error types for the image crate.

use thiserror::Error;

/// Result type alias for resize operations.
pub type Result<T> = std::result::Result<T, ResizeError>;

/// Errors that can occur while resizing an image.
///
/// At the nullable boundary ([`crate::resize`], [`crate::Resizer::resize`])
/// every variant collapses to `None`; the variant is still logged.
#[derive(Debug, Error)]
pub enum ResizeError {
    /// Width or height is zero or negative
    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions {
        /// Requested width
        width: i64,
        /// Requested height
        height: i64,
    },

    /// Quality outside `[0, 100]` while the reject policy is active
    #[error("Invalid quality: {0} (expected 0-100)")]
    InvalidQuality(i32),

    /// Input bytes could not be parsed as a supported image
    #[error("Decode failure: {0}")]
    DecodeFailure(String),

    /// Input is a recognised image family without a compiled-in codec
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Resampled raster could not be serialized
    #[error("Encode failure: {0}")]
    EncodeFailure(String),

    /// Allocation or size limit hit during decode, resample or encode
    #[error("Resource exhaustion: {0}")]
    ResourceExhaustion(String),

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ResizeError {
    /// Stable label for the error category, used as a log field.
    pub fn kind(&self) -> &'static str {
        match self {
            ResizeError::InvalidDimensions { .. } => "invalid_dimensions",
            ResizeError::InvalidQuality(_) => "invalid_quality",
            ResizeError::DecodeFailure(_) => "decode_failure",
            ResizeError::UnsupportedFormat(_) => "unsupported_format",
            ResizeError::EncodeFailure(_) => "encode_failure",
            ResizeError::ResourceExhaustion(_) => "resource_exhaustion",
            ResizeError::Config(_) => "config",
            ResizeError::IoError(_) => "io",
        }
    }

    /// Map a codec error raised while decoding.
    pub(crate) fn from_decode(err: image::ImageError) -> Self {
        match err {
            image::ImageError::Limits(e) => ResizeError::ResourceExhaustion(e.to_string()),
            image::ImageError::Unsupported(e) => ResizeError::UnsupportedFormat(e.to_string()),
            other => ResizeError::DecodeFailure(other.to_string()),
        }
    }

    /// Map a codec error raised while encoding.
    pub(crate) fn from_encode(err: image::ImageError) -> Self {
        match err {
            image::ImageError::Limits(e) => ResizeError::ResourceExhaustion(e.to_string()),
            image::ImageError::Unsupported(e) => ResizeError::UnsupportedFormat(e.to_string()),
            other => ResizeError::EncodeFailure(other.to_string()),
        }
    }
}
