pub mod compositor;
pub mod encoder;
pub mod segmenter;

use image::{Rgb, RgbImage};

/// Recolor a rendered page: dark ink becomes white text on `dark_rgb`.
///
/// Pipeline:
/// 1. Grayscale (ITU-R 601-2 luma)
/// 2. Invert
/// 3. Threshold into a text mask (`> threshold` is text)
/// 4. Composite white over `dark_rgb` through the mask
pub fn recolor_raster(rendered: &RgbImage, dark_rgb: [u8; 3], threshold: u8) -> RgbImage {
    let mask = segmenter::segment_text_mask(rendered, threshold);
    tracing::trace!(
        text_pixels = segmenter::foreground_count(&mask),
        total_pixels = u64::from(mask.width()) * u64::from(mask.height()),
        "text mask segmented"
    );
    compositor::composite(&mask, compositor::TEXT_RGB, Rgb(dark_rgb))
}
