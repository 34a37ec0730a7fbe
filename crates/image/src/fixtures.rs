//! In-memory test images.

use image::codecs::jpeg::JpegEncoder;
use image::{ColorType, DynamicImage, ImageOutputFormat, Rgb, RgbImage, Rgba, RgbaImage};
use std::io::Cursor;

pub fn gradient_rgb(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x * 255 / width.max(1)) as u8, (y * 255 / height.max(1)) as u8, 128])
    })
}

pub fn gradient_rgba(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        let alpha = if x % 2 == 0 { 255 } else { 128 };
        Rgba([(x * 255 / width.max(1)) as u8, 64, (y * 255 / height.max(1)) as u8, alpha])
    })
}

fn write(img: &DynamicImage, format: ImageOutputFormat) -> Vec<u8> {
    let mut buffer = Vec::new();
    img.write_to(&mut Cursor::new(&mut buffer), format).unwrap();
    buffer
}

pub fn encode_png(img: &DynamicImage) -> Vec<u8> {
    write(img, ImageOutputFormat::Png)
}

pub fn png(width: u32, height: u32) -> Vec<u8> {
    encode_png(&DynamicImage::ImageRgb8(gradient_rgb(width, height)))
}

pub fn rgba_png(width: u32, height: u32) -> Vec<u8> {
    encode_png(&DynamicImage::ImageRgba8(gradient_rgba(width, height)))
}

pub fn jpeg(width: u32, height: u32) -> Vec<u8> {
    let img = gradient_rgb(width, height);
    let mut buffer = Vec::new();
    JpegEncoder::new_with_quality(&mut buffer, 90)
        .encode(img.as_raw(), width, height, ColorType::Rgb8)
        .unwrap();
    buffer
}

pub fn gif(width: u32, height: u32) -> Vec<u8> {
    write(&DynamicImage::ImageRgba8(gradient_rgba(width, height)), ImageOutputFormat::Gif)
}

pub fn webp(width: u32, height: u32) -> Vec<u8> {
    write(&DynamicImage::ImageRgb8(gradient_rgb(width, height)), ImageOutputFormat::WebP)
}

/// Mean absolute per-channel difference between two equally sized rasters.
pub fn mean_abs_error(a: &RgbImage, b: &RgbImage) -> f64 {
    assert_eq!(a.dimensions(), b.dimensions());
    let total: u64 = a
        .as_raw()
        .iter()
        .zip(b.as_raw())
        .map(|(x, y)| u64::from(x.abs_diff(*y)))
        .sum();
    total as f64 / a.as_raw().len() as f64
}
