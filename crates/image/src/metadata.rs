//! Image metadata extraction.

use crate::{codec, detect_format, ImageFormat, Result};
use serde::{Deserialize, Serialize};

/// Header-level facts about an encoded image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageInfo {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Detected format
    pub format: ImageFormat,
    /// Encoded size in bytes
    pub size_bytes: usize,
}

impl ImageInfo {
    /// Calculate aspect ratio (width / height).
    pub fn aspect_ratio(&self) -> f64 {
        self.width as f64 / self.height as f64
    }

    /// Check if image is landscape orientation.
    pub fn is_landscape(&self) -> bool {
        self.width > self.height
    }

    /// Check if image is portrait orientation.
    pub fn is_portrait(&self) -> bool {
        self.height > self.width
    }

    /// Check if image is square.
    pub fn is_square(&self) -> bool {
        self.width == self.height
    }

    /// Human-readable orientation label.
    pub fn orientation(&self) -> &'static str {
        if self.is_landscape() {
            "landscape"
        } else if self.is_portrait() {
            "portrait"
        } else {
            "square"
        }
    }
}

/// Read format and dimensions from encoded bytes without decoding pixels.
///
/// Fails like the resizer would: unknown signature is a decode failure and a
/// known family without a codec is unsupported.
pub fn inspect(data: &[u8]) -> Result<ImageInfo> {
    let format = detect_format(data)?;
    let (width, height) = codec::dimensions(data, format)?;

    Ok(ImageInfo {
        width,
        height,
        format,
        size_bytes: data.len(),
    })
}
