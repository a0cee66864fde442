// Mask + colors -> recolored RGB raster

use image::{GrayImage, Rgb, RgbImage};

use super::segmenter::FOREGROUND;

/// Color written for foreground (text) pixels.
pub const TEXT_RGB: Rgb<u8> = Rgb([255, 255, 255]);

/// Build the recolored raster from a text mask.
///
/// Foreground pixels become `foreground`, every other pixel becomes
/// `background`. The output has the mask's dimensions.
pub fn composite(mask: &GrayImage, foreground: Rgb<u8>, background: Rgb<u8>) -> RgbImage {
    RgbImage::from_fn(mask.width(), mask.height(), |x, y| {
        if mask.get_pixel(x, y).0[0] == FOREGROUND {
            foreground
        } else {
            background
        }
    })
}
