//! Image resizing for CachePX.
//!
//! Takes encoded image bytes plus a target width, height and quality and
//! returns newly encoded bytes at exactly that size:
//! - Format detection from magic bytes
//! - Exact-size resizing with a configurable resampling filter
//! - Aspect-preserving downsampling to a bounding box
//! - Header-only metadata inspection
//!
//! ```no_run
//! use cachepx_image::{ResizeExt, Resizer, ResizerConfig};
//!
//! let data = std::fs::read("photo.jpg")?;
//!
//! // Nullable contract: any failure is `None`.
//! let thumb = data.resized(160, 120, 80);
//!
//! // Structured contract with a custom configuration.
//! let resizer = Resizer::new(ResizerConfig::load(None)?);
//! let bytes = resizer.try_resize(&data, 160, 120, 80)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]

mod alpha;
mod codec;
pub mod config;
mod detect;
mod dimensions;
mod error;
mod metadata;
mod request;
mod resize;

#[cfg(test)]
mod fixtures;

pub use alpha::{flatten_alpha, has_alpha_channel};
pub use config::{DecodeLimits, FilterKind, OutputPolicy, ResizerConfig};
pub use detect::{detect_format, ImageFormat};
pub use dimensions::{fit_within, raster_bytes};
pub use error::{ResizeError, Result};
pub use metadata::{inspect, ImageInfo};
pub use request::{Quality, QualityPolicy, ResizeRequest};
pub use resize::{resize, try_resize, ResizeExt, Resizer};
