// Luminance-based text segmentation: RGB raster -> binary text mask

use image::{GrayImage, Luma, RgbImage};

/// Mask value for foreground (ink) pixels.
pub const FOREGROUND: u8 = 255;
/// Mask value for background pixels.
pub const BACKGROUND: u8 = 0;

/// ITU-R 601-2 luma of one RGB pixel, in 16.16 fixed point with rounding.
///
/// `L = R * 299/1000 + G * 587/1000 + B * 114/1000`
#[inline]
pub fn luma(r: u8, g: u8, b: u8) -> u8 {
    let l = (r as u32 * 19595 + g as u32 * 38470 + b as u32 * 7471 + 0x8000) >> 16;
    l as u8
}

/// Convert an RGB raster to 8-bit grayscale.
pub fn to_luma(rgb: &RgbImage) -> GrayImage {
    GrayImage::from_fn(rgb.width(), rgb.height(), |x, y| {
        let [r, g, b] = rgb.get_pixel(x, y).0;
        Luma([luma(r, g, b)])
    })
}

/// Invert a grayscale buffer in place (`p' = 255 - p`), so dark ink becomes bright.
pub fn invert(gray: &mut GrayImage) {
    image::imageops::invert(gray);
}

/// Binarize an inverted grayscale buffer.
///
/// Pixels strictly greater than `threshold` become [`FOREGROUND`], all others
/// [`BACKGROUND`].
pub fn threshold_mask(inverted: &GrayImage, threshold: u8) -> GrayImage {
    let mut mask = inverted.clone();
    for pixel in mask.pixels_mut() {
        pixel.0[0] = if pixel.0[0] > threshold {
            FOREGROUND
        } else {
            BACKGROUND
        };
    }
    mask
}

/// Segment an RGB raster into a text mask: grayscale, invert, threshold.
pub fn segment_text_mask(rgb: &RgbImage, threshold: u8) -> GrayImage {
    let mut gray = to_luma(rgb);
    invert(&mut gray);
    threshold_mask(&gray, threshold)
}

/// Number of foreground pixels in a mask.
pub fn foreground_count(mask: &GrayImage) -> usize {
    mask.pixels().filter(|p| p.0[0] == FOREGROUND).count()
}
