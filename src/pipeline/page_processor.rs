// ページ単位処理: 分類 → (コピー | ラスタライズ → 再着色 → エンコード)

use crate::config::settings::ConvertParams;
use crate::pdf::reader::{PageKind, PdfReader};
use crate::recolor::encoder::{EncodedImage, encode_rgb};
use crate::recolor::recolor_raster;
use crate::render::{Rasterizer, raster_dimensions};

/// 1ページ分の処理結果。
#[derive(Debug)]
pub enum PageOutput {
    /// 元ページをそのままコピーする。
    Copy,
    /// 再着色済みラスタを全面画像として出力する。
    Recolored(EncodedImage),
}

/// Single page processing result.
#[derive(Debug)]
pub struct ProcessedPage {
    pub page_index: u32,
    pub kind: PageKind,
    pub output: PageOutput,
}

/// Process a single page.
///
/// Image-bearing pages are passed through untouched. Every other page is
/// rendered at `params.dpi_scale`, recolored and encoded. Its MediaBox is
/// checked first, so an empty or oversized page fails without being rendered.
///
/// Errors are returned as-is; the caller attaches the page index.
pub fn process_page<R: Rasterizer + ?Sized>(
    reader: &PdfReader,
    page_index: u32,
    params: &ConvertParams,
    rasterizer: &mut R,
) -> crate::error::Result<ProcessedPage> {
    let kind = reader.classify_page(page_index)?;
    tracing::debug!(page_index, ?kind, "classified page");

    let output = match kind {
        PageKind::ImageBearing => PageOutput::Copy,
        PageKind::TextLike => {
            // 描画前に寸法を検証し、巨大なページでビットマップを確保しない
            let (width_pts, height_pts) = reader.page_dimensions(page_index)?;
            let (width_px, height_px) =
                raster_dimensions(width_pts as f32, height_pts as f32, params.dpi_scale)?;
            tracing::debug!(page_index, width_px, height_px, "rasterizing page");

            let rendered = rasterizer.render_page(page_index, params.dpi_scale)?;
            let recolored = recolor_raster(&rendered, params.dark_rgb, params.threshold);
            PageOutput::Recolored(encode_rgb(&recolored)?)
        }
    };

    Ok(ProcessedPage {
        page_index,
        kind,
        output,
    })
}
