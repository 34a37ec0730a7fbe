//! Decoding and encoding through the `image` crate.
//!
//! | Family | Encoder | What `quality` does |
//! |---|---|---|
//! | JPEG | baseline, alpha flattened onto the background | 1..=100 encoder quality (0 is raised to 1) |
//! | PNG | lossless, adaptive row filters | compression effort on a 0-10 scale (`quality / 10`) |
//! | WebP | lossless | nothing |
//! | GIF | single frame, palette quantised | nothing |

use crate::alpha::{flatten_alpha, has_alpha_channel};
use crate::config::DecodeLimits;
use crate::{ImageFormat, Quality, ResizeError, Result};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::io::Reader;
use image::{ColorType, DynamicImage, ImageEncoder, ImageOutputFormat};
use std::io::Cursor;

/// Decode `data` as `format` under the given limits.
pub(crate) fn decode(data: &[u8], format: ImageFormat, limits: DecodeLimits) -> Result<DynamicImage> {
    let codec = format
        .codec()
        .ok_or_else(|| ResizeError::UnsupportedFormat(format!("no decoder for {format}")))?;

    let mut reader = Reader::with_format(Cursor::new(data), codec);
    reader.limits(limits.to_codec_limits());
    reader.decode().map_err(ResizeError::from_decode)
}

/// Read dimensions from the header without decoding pixels.
pub(crate) fn dimensions(data: &[u8], format: ImageFormat) -> Result<(u32, u32)> {
    let codec = format
        .codec()
        .ok_or_else(|| ResizeError::UnsupportedFormat(format!("no decoder for {format}")))?;

    Reader::with_format(Cursor::new(data), codec)
        .into_dimensions()
        .map_err(ResizeError::from_decode)
}

/// Encode a raster into a new buffer.
pub(crate) fn encode(
    img: &DynamicImage,
    format: ImageFormat,
    quality: Quality,
    background: [u8; 3],
) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();

    match format {
        ImageFormat::Jpeg => {
            let rgb = flatten_alpha(img, background);
            let mut encoder = JpegEncoder::new_with_quality(&mut buffer, quality.value().max(1));
            encoder
                .encode(rgb.as_raw(), rgb.width(), rgb.height(), ColorType::Rgb8)
                .map_err(ResizeError::from_encode)?;
        }
        ImageFormat::Png => {
            let raster = to_8bit(img);
            let encoder = PngEncoder::new_with_quality(
                &mut buffer,
                png_compression(quality),
                PngFilter::Adaptive,
            );
            encoder
                .write_image(raster.as_bytes(), raster.width(), raster.height(), raster.color())
                .map_err(ResizeError::from_encode)?;
        }
        ImageFormat::WebP | ImageFormat::Gif => {
            let output = if format == ImageFormat::WebP {
                ImageOutputFormat::WebP
            } else {
                ImageOutputFormat::Gif
            };
            let raster = match format {
                ImageFormat::Gif => DynamicImage::ImageRgba8(img.to_rgba8()),
                _ => to_8bit(img),
            };
            raster
                .write_to(&mut Cursor::new(&mut buffer), output)
                .map_err(ResizeError::from_encode)?;
        }
        other => {
            return Err(ResizeError::UnsupportedFormat(format!("no encoder for {other}")));
        }
    }

    if buffer.is_empty() {
        return Err(ResizeError::EncodeFailure(format!("{format} encoder produced no data")));
    }
    Ok(buffer)
}

/// Map 0-100 onto the 0-10 compression scale.
fn png_compression(quality: Quality) -> CompressionType {
    match quality.value() / 10 {
        0..=3 => CompressionType::Fast,
        4..=6 => CompressionType::Default,
        _ => CompressionType::Best,
    }
}

/// Normalise to RGB8 or RGBA8, which every compiled-in encoder accepts.
fn to_8bit(img: &DynamicImage) -> DynamicImage {
    match img {
        DynamicImage::ImageRgb8(_) | DynamicImage::ImageRgba8(_) => img.clone(),
        _ if has_alpha_channel(img) => DynamicImage::ImageRgba8(img.to_rgba8()),
        _ => DynamicImage::ImageRgb8(img.to_rgb8()),
    }
}
