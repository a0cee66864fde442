#[cfg(feature = "pdfium")]
pub mod pdfium;

use image::RgbImage;

/// Largest rendered bitmap side, in pixels.
pub const MAX_RASTER_SIDE_PX: u32 = 32_767;

/// Renders pages of the input document to RGB rasters.
///
/// `scale` multiplies the page's point size: a 612x792 pt page rendered at
/// 2.0 yields a 1224x1584 raster.
pub trait Rasterizer {
    fn render_page(&mut self, page_index: u32, scale: f32) -> crate::error::Result<RgbImage>;
}

impl<F> Rasterizer for F
where
    F: FnMut(u32, f32) -> crate::error::Result<RgbImage>,
{
    fn render_page(&mut self, page_index: u32, scale: f32) -> crate::error::Result<RgbImage> {
        self(page_index, scale)
    }
}

/// Pixel size of a page rendered at `scale`.
///
/// Each side is rounded to the nearest pixel and never drops below 1.
pub fn raster_dimensions(
    width_pts: f32,
    height_pts: f32,
    scale: f32,
) -> crate::error::Result<(u32, u32)> {
    if !(scale.is_finite() && scale > 0.0) {
        return Err(crate::error::DarkModeError::render(format!(
            "render scale must be positive, got {scale}"
        )));
    }

    let side = |pts: f32| -> crate::error::Result<u32> {
        let px = (pts * scale).round();
        if !px.is_finite() || px > MAX_RASTER_SIDE_PX as f32 {
            return Err(crate::error::DarkModeError::render(format!(
                "rendered size {px} px exceeds limit of {MAX_RASTER_SIDE_PX} px"
            )));
        }
        Ok((px as u32).max(1))
    };

    Ok((side(width_pts)?, side(height_pts)?))
}
