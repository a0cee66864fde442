// pdfium-render wrapper: page -> RgbImage (in-memory only)

use image::RgbImage;
use pdfium_render::prelude::*;
use std::path::PathBuf;

use super::{Rasterizer, raster_dimensions};

/// Resolves the path to the pdfium shared library.
///
/// Search order:
/// 1. `PDFIUM_DYNAMIC_LIB_PATH` environment variable
/// 2. `vendor/pdfium/lib/` relative to the project root (for development)
///
/// Returns `Ok(None)` when neither is present; the caller then falls back to
/// the system library.
fn resolve_pdfium_lib_path() -> crate::error::Result<Option<PathBuf>> {
    if let Ok(path) = std::env::var("PDFIUM_DYNAMIC_LIB_PATH") {
        let p = PathBuf::from(&path);
        if p.exists() {
            return Ok(Some(p));
        }
        return Err(crate::error::DarkModeError::render(format!(
            "PDFIUM_DYNAMIC_LIB_PATH is set to '{}' but the path does not exist",
            path
        )));
    }

    // In development, CARGO_MANIFEST_DIR points to the project root.
    if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
        let vendor_path = PathBuf::from(&manifest_dir).join("vendor/pdfium/lib");
        if vendor_path.exists() {
            return Ok(Some(vendor_path));
        }
    }

    Ok(None)
}

/// A bound pdfium library. Documents opened from it borrow the backend.
pub struct PdfiumBackend {
    pdfium: Pdfium,
}

impl PdfiumBackend {
    /// Binds to the pdfium shared library.
    ///
    /// # Errors
    /// Returns `DarkModeError::RenderError` if no usable library is found.
    pub fn bind() -> crate::error::Result<Self> {
        let bindings = match resolve_pdfium_lib_path()? {
            Some(lib_path) => {
                let lib_path_str = lib_path.to_str().ok_or_else(|| {
                    crate::error::DarkModeError::render(
                        "pdfium library path contains non-UTF-8 characters",
                    )
                })?;
                Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(
                    lib_path_str,
                ))
            }
            None => Pdfium::bind_to_system_library(),
        }
        .map_err(|e| {
            crate::error::DarkModeError::render(format!("pdfium library not available: {e}"))
        })?;

        tracing::debug!("pdfium library bound");
        Ok(Self {
            pdfium: Pdfium::new(bindings),
        })
    }

    /// Opens an in-memory PDF for rendering.
    ///
    /// # Errors
    /// Returns `DarkModeError::ParseError` if pdfium cannot open the buffer,
    /// including encrypted documents that need a password.
    pub fn open<'a>(&'a self, pdf_bytes: &'a [u8]) -> crate::error::Result<PdfiumRasterizer<'a>> {
        let document = self
            .pdfium
            .load_pdf_from_byte_slice(pdf_bytes, None)
            .map_err(|e| crate::error::DarkModeError::parse(e.to_string()))?;
        Ok(PdfiumRasterizer { document })
    }
}

/// Renders pages of one open document. The document is closed on drop.
pub struct PdfiumRasterizer<'a> {
    document: PdfDocument<'a>,
}

impl PdfiumRasterizer<'_> {
    /// Number of pages pdfium sees in the document.
    pub fn page_count(&self) -> u32 {
        self.document.pages().len() as u32
    }
}

impl Rasterizer for PdfiumRasterizer<'_> {
    /// Renders a page at `scale` x its point size, on a white background.
    ///
    /// # Errors
    /// Returns `DarkModeError::RenderError` if:
    /// - The page index is out of range
    /// - The scaled size is zero, non-finite or too large
    /// - Rendering fails
    fn render_page(&mut self, page_index: u32, scale: f32) -> crate::error::Result<RgbImage> {
        let page_index_u16 = u16::try_from(page_index)
            .map_err(|_| crate::error::DarkModeError::render("page index exceeds u16 range"))?;

        let page = self
            .document
            .pages()
            .get(page_index_u16)
            .map_err(|e| crate::error::DarkModeError::render(e.to_string()))?;

        let (width_px, height_px) =
            raster_dimensions(page.width().value, page.height().value, scale)?;
        tracing::trace!(page_index, width_px, height_px, "rendering page");

        let config = PdfRenderConfig::new()
            .set_target_width(width_px as i32)
            .set_target_height(height_px as i32);

        let bitmap = page
            .render_with_config(&config)
            .map_err(|e| crate::error::DarkModeError::render(e.to_string()))?;

        Ok(bitmap.as_image().to_rgb8())
    }
}
