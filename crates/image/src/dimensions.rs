//! Dimension math for downsampling.
//!
//! The resizer itself always targets exact dimensions. These helpers let a
//! caller derive aspect-preserving targets first.

/// Scale `current` down so it fits inside `max`, preserving aspect ratio.
///
/// Never upscales: an image already inside the box keeps its size. Each edge
/// is rounded and kept at least 1 pixel.
///
/// # Example
/// ```
/// use cachepx_image::fit_within;
///
/// assert_eq!(fit_within((4000, 3000), (800, 800)), (800, 600));
/// assert_eq!(fit_within((300, 200), (800, 800)), (300, 200));
/// ```
pub fn fit_within(current: (u32, u32), max: (u32, u32)) -> (u32, u32) {
    let (width, height) = current;
    let (max_width, max_height) = max;
    if width == 0 || height == 0 {
        return current;
    }

    let scale = (max_width as f64 / width as f64)
        .min(max_height as f64 / height as f64)
        .min(1.0);

    if scale >= 1.0 {
        return current;
    }

    let new_width = (width as f64 * scale).round() as u32;
    let new_height = (height as f64 * scale).round() as u32;

    (new_width.max(1), new_height.max(1))
}

/// Bytes needed for an RGBA8 raster of the given size.
pub fn raster_bytes(width: u32, height: u32) -> u64 {
    u64::from(width) * u64::from(height) * 4
}
