//! Resize encoded images to exact dimensions.

use crate::config::ResizerConfig;
use crate::dimensions::{fit_within, raster_bytes};
use crate::{codec, detect_format, ImageFormat, ResizeError, ResizeRequest, Result};
use image::DynamicImage;
use tracing::{debug, instrument, warn};

/// Stateless resizing service.
///
/// Holds only its configuration; every call decodes, resamples and encodes
/// independently, so one instance can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct Resizer {
    config: ResizerConfig,
}

impl Resizer {
    /// Create a resizer with the given configuration.
    pub fn new(config: ResizerConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    pub fn config(&self) -> &ResizerConfig {
        &self.config
    }

    /// Resize to exactly `width x height`, or `None` on any failure.
    ///
    /// The failure category is logged before it is discarded; use
    /// [`Resizer::try_resize`] to keep it.
    pub fn resize(&self, data: &[u8], width: i32, height: i32, quality: i32) -> Option<Vec<u8>> {
        match self.try_resize(data, width, height, quality) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                warn!(kind = e.kind(), error = %e, width, height, quality, "resize failed");
                None
            }
        }
    }

    /// Resize to exactly `width x height`, keeping the error.
    pub fn try_resize(&self, data: &[u8], width: i32, height: i32, quality: i32) -> Result<Vec<u8>> {
        let request = ResizeRequest::new(width, height, quality, self.config.quality_policy)?;
        self.resize_request(data, &request)
    }

    /// Resize using an already-validated request.
    #[instrument(
        level = "debug",
        skip(self, data, request),
        fields(input_len = data.len(), width = request.width, height = request.height)
    )]
    pub fn resize_request(&self, data: &[u8], request: &ResizeRequest) -> Result<Vec<u8>> {
        if request.width == 0 || request.height == 0 {
            return Err(ResizeError::InvalidDimensions {
                width: request.width.into(),
                height: request.height.into(),
            });
        }

        let input_format = self.check_decodable(data)?;
        self.check_target(request.width, request.height)?;

        let img = codec::decode(data, input_format, self.config.limits)?;
        self.resample_and_encode(&img, input_format, request)
    }

    /// Downsample to fit inside `max_width x max_height`, keeping aspect ratio.
    ///
    /// Never upscales; an image already inside the box is re-encoded at its
    /// own size.
    pub fn fit(&self, data: &[u8], max_width: i32, max_height: i32, quality: i32) -> Result<Vec<u8>> {
        let bounds = ResizeRequest::new(max_width, max_height, quality, self.config.quality_policy)?;

        let input_format = self.check_decodable(data)?;
        let img = codec::decode(data, input_format, self.config.limits)?;

        let (width, height) = fit_within((img.width(), img.height()), (bounds.width, bounds.height));
        let request = ResizeRequest::with_size(width, height, bounds.quality)?;
        self.check_target(width, height)?;
        debug!(
            source_width = img.width(),
            source_height = img.height(),
            width,
            height,
            "fitted target dimensions"
        );

        self.resample_and_encode(&img, input_format, &request)
    }

    fn check_decodable(&self, data: &[u8]) -> Result<ImageFormat> {
        let format = detect_format(data)?;
        if !format.can_decode() {
            return Err(ResizeError::UnsupportedFormat(format!(
                "{format} input has no compiled-in decoder"
            )));
        }
        Ok(format)
    }

    fn check_target(&self, width: u32, height: u32) -> Result<()> {
        let limits = &self.config.limits;
        if width > limits.max_width || height > limits.max_height {
            return Err(ResizeError::ResourceExhaustion(format!(
                "target {width}x{height} exceeds {}x{}",
                limits.max_width, limits.max_height
            )));
        }

        let needed = raster_bytes(width, height);
        if needed > limits.max_alloc {
            return Err(ResizeError::ResourceExhaustion(format!(
                "target raster needs {needed} bytes, limit is {}",
                limits.max_alloc
            )));
        }
        Ok(())
    }

    fn resample_and_encode(
        &self,
        img: &DynamicImage,
        input_format: ImageFormat,
        request: &ResizeRequest,
    ) -> Result<Vec<u8>> {
        let output_format = self.config.output.resolve(input_format);
        if !output_format.can_encode() {
            return Err(ResizeError::UnsupportedFormat(format!(
                "{output_format} output has no compiled-in encoder"
            )));
        }

        let resized = img.resize_exact(request.width, request.height, self.config.filter.filter_type());
        let bytes = codec::encode(&resized, output_format, request.quality, self.config.background)?;

        debug!(
            input = %input_format,
            output = %output_format,
            quality = request.quality.value(),
            output_len = bytes.len(),
            "resized image"
        );
        Ok(bytes)
    }
}

/// Resize with the default configuration, or `None` on any failure.
///
/// # Example
/// ```no_run
/// let data = std::fs::read("photo.jpg").unwrap();
/// let thumb = cachepx_image::resize(&data, 50, 50, 80);
/// assert!(thumb.is_some());
/// ```
pub fn resize(data: &[u8], width: i32, height: i32, quality: i32) -> Option<Vec<u8>> {
    Resizer::default().resize(data, width, height, quality)
}

/// Resize with the default configuration, keeping the error.
pub fn try_resize(data: &[u8], width: i32, height: i32, quality: i32) -> Result<Vec<u8>> {
    Resizer::default().try_resize(data, width, height, quality)
}

/// Resizing directly on encoded byte buffers.
pub trait ResizeExt {
    /// Resize to exactly `width x height`, or `None` on any failure.
    fn resized(&self, width: i32, height: i32, quality: i32) -> Option<Vec<u8>>;

    /// Downsample to fit inside the box, or `None` on any failure.
    fn fitted(&self, max_width: i32, max_height: i32, quality: i32) -> Option<Vec<u8>>;
}

impl ResizeExt for [u8] {
    fn resized(&self, width: i32, height: i32, quality: i32) -> Option<Vec<u8>> {
        resize(self, width, height, quality)
    }

    fn fitted(&self, max_width: i32, max_height: i32, quality: i32) -> Option<Vec<u8>> {
        match Resizer::default().fit(self, max_width, max_height, quality) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                warn!(kind = e.kind(), error = %e, max_width, max_height, quality, "fit failed");
                None
            }
        }
    }
}
