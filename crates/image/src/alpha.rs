//! Alpha flattening for encoders without an alpha channel.

use image::{DynamicImage, Rgb, RgbImage, Rgba};

/// Composite an image over a solid background, dropping its alpha channel.
pub fn flatten_alpha(img: &DynamicImage, background: [u8; 3]) -> RgbImage {
    if !has_alpha_channel(img) {
        return img.to_rgb8();
    }

    let rgba = img.to_rgba8();
    let mut output = RgbImage::new(rgba.width(), rgba.height());

    for (x, y, pixel) in rgba.enumerate_pixels() {
        let Rgba([r, g, b, a]) = *pixel;
        let alpha = a as f32 / 255.0;
        let blend = |c: u8, bg: u8| (c as f32 * alpha + bg as f32 * (1.0 - alpha)).round() as u8;

        output.put_pixel(
            x,
            y,
            Rgb([blend(r, background[0]), blend(g, background[1]), blend(b, background[2])]),
        );
    }

    output
}

/// Check if an image has an alpha channel
pub fn has_alpha_channel(img: &DynamicImage) -> bool {
    img.color().has_alpha()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    #[test]
    fn test_flatten_white_background() {
        let mut img = RgbaImage::new(2, 2);
        img.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        img.put_pixel(0, 1, Rgba([0, 255, 0, 128]));
        img.put_pixel(1, 0, Rgba([0, 0, 255, 0]));
        img.put_pixel(1, 1, Rgba([255, 255, 0, 255]));

        let result = flatten_alpha(&DynamicImage::ImageRgba8(img), [255, 255, 255]);

        assert_eq!(result.get_pixel(0, 0), &Rgb([255, 0, 0]));
        assert_eq!(result.get_pixel(0, 1), &Rgb([127, 255, 127]));
        assert_eq!(result.get_pixel(1, 0), &Rgb([255, 255, 255]));
        assert_eq!(result.get_pixel(1, 1), &Rgb([255, 255, 0]));
    }

    #[test]
    fn test_flatten_custom_background() {
        let img = RgbaImage::from_pixel(1, 1, Rgba([10, 20, 30, 0]));
        let result = flatten_alpha(&DynamicImage::ImageRgba8(img), [1, 2, 3]);
        assert_eq!(result.get_pixel(0, 0), &Rgb([1, 2, 3]));
    }

    #[test]
    fn test_opaque_image_passes_through() {
        let img = RgbImage::from_pixel(3, 1, Rgb([9, 8, 7]));
        let result = flatten_alpha(&DynamicImage::ImageRgb8(img.clone()), [0, 0, 0]);
        assert_eq!(result, img);
    }

    #[test]
    fn test_has_alpha_channel() {
        assert!(has_alpha_channel(&DynamicImage::ImageRgba8(RgbaImage::new(1, 1))));
        assert!(!has_alpha_channel(&DynamicImage::ImageRgb8(RgbImage::new(1, 1))));
    }
}
