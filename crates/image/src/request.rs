//! Validated resize requests.
//!
//! The public boundary takes plain `i32` values so that zero and negative
//! sizes can be rejected explicitly instead of being unrepresentable.
//! [`ResizeRequest::new`] turns them into checked values before any byte of
//! the input is decoded.

use crate::{ResizeError, Result};
use serde::{Deserialize, Serialize};

/// Encoder quality on a 0-100 scale. Higher means higher fidelity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "u8")]
pub struct Quality(u8);

impl Quality {
    /// Lowest accepted value.
    pub const MIN: u8 = 0;
    /// Highest accepted value.
    pub const MAX: u8 = 100;

    /// Clamp any integer into range.
    pub fn clamped(value: i32) -> Self {
        Self(value.clamp(Self::MIN as i32, Self::MAX as i32) as u8)
    }

    /// Accept only values already in range.
    pub fn checked(value: i32) -> Result<Self> {
        if (Self::MIN as i32..=Self::MAX as i32).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(ResizeError::InvalidQuality(value))
        }
    }

    /// Raw value in `[0, 100]`.
    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(85)
    }
}

impl TryFrom<i32> for Quality {
    type Error = ResizeError;

    fn try_from(value: i32) -> Result<Self> {
        Self::checked(value)
    }
}

impl From<Quality> for u8 {
    fn from(q: Quality) -> u8 {
        q.0
    }
}

/// What to do with a quality value outside `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityPolicy {
    /// Clamp into range.
    #[default]
    Clamp,
    /// Fail with [`ResizeError::InvalidQuality`].
    Reject,
}

impl QualityPolicy {
    /// Apply the policy to a raw value.
    pub fn apply(self, value: i32) -> Result<Quality> {
        match self {
            QualityPolicy::Clamp => Ok(Quality::clamped(value)),
            QualityPolicy::Reject => Quality::checked(value),
        }
    }
}

/// Target dimensions and quality for one resize.
///
/// The output is resized to exactly `width x height`; aspect ratio is the
/// caller's concern (see [`crate::fit_within`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResizeRequest {
    /// Target width in pixels
    pub width: u32,
    /// Target height in pixels
    pub height: u32,
    /// Encoder quality
    #[serde(default)]
    pub quality: Quality,
}

impl ResizeRequest {
    /// Validate raw boundary values.
    pub fn new(width: i32, height: i32, quality: i32, policy: QualityPolicy) -> Result<Self> {
        if width <= 0 || height <= 0 {
            return Err(ResizeError::InvalidDimensions {
                width: width.into(),
                height: height.into(),
            });
        }

        Ok(Self {
            width: width as u32,
            height: height as u32,
            quality: policy.apply(quality)?,
        })
    }

    /// Build a request from already-unsigned dimensions.
    pub fn with_size(width: u32, height: u32, quality: Quality) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(ResizeError::InvalidDimensions {
                width: width.into(),
                height: height.into(),
            });
        }
        Ok(Self { width, height, quality })
    }
}

impl Default for ResizeRequest {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            quality: Quality::default(),
        }
    }
}
