// 文書単位: PDF読込 -> ページ順次処理 -> 出力PDF組立

use crate::config::settings::ConvertParams;
use crate::pdf::reader::PdfReader;
use crate::pdf::writer::DarkPageWriter;
use crate::pipeline::page_processor::{PageOutput, process_page};
use crate::render::Rasterizer;

/// Build the dark-mode output document from a loaded input.
///
/// Pages are processed strictly in order and exactly one output page is
/// appended per input page. The first failing page aborts the whole
/// conversion with a `ConversionError` naming that page.
pub fn transform<R: Rasterizer + ?Sized>(
    reader: &PdfReader,
    params: &ConvertParams,
    rasterizer: &mut R,
) -> crate::error::Result<DarkPageWriter> {
    let page_count = reader.page_count();
    let mut writer = DarkPageWriter::new();

    for page_index in 0..page_count {
        let processed = process_page(reader, page_index, params, rasterizer)
            .map_err(|e| e.at_page(page_index))?;

        match &processed.output {
            PageOutput::Copy => {
                let page_id = reader
                    .page_id(page_index)
                    .map_err(|e| e.at_page(page_index))?;
                writer
                    .copy_page_from(reader.document(), page_id)
                    .map_err(|e| e.at_page(page_index))?;
            }
            PageOutput::Recolored(image) => {
                writer
                    .write_image_page(image)
                    .map_err(|e| e.at_page(page_index))?;
            }
        }
        tracing::debug!(
            page_index = processed.page_index,
            kind = ?processed.kind,
            "page written"
        );
    }

    Ok(writer)
}

/// Convert a PDF to dark mode using the given rasterizer.
///
/// `pdf_bytes` must be the same document the rasterizer renders from.
pub fn convert_with<R: Rasterizer + ?Sized>(
    pdf_bytes: &[u8],
    params: &ConvertParams,
    rasterizer: &mut R,
) -> crate::error::Result<Vec<u8>> {
    params.validate()?;
    let reader = PdfReader::from_bytes(pdf_bytes)?;
    let writer = transform(&reader, params, rasterizer)?;
    let out = writer.finish()?;
    tracing::debug!(
        pages = reader.page_count(),
        bytes = out.len(),
        "dark-mode conversion finished"
    );
    Ok(out)
}

/// Convert a PDF to dark mode, rendering pages with pdfium.
///
/// # Errors
/// - `ConfigError` if `params` fails validation
/// - `ParseError` if the input is not a readable PDF, or pdfium refuses it
///   (for example an encrypted document that needs a password)
/// - `RenderError` if the pdfium library cannot be bound
/// - `ConversionError` if a page fails to render, recolor or embed
/// - `SerializationError` if the output cannot be written
#[cfg(feature = "pdfium")]
pub fn convert(pdf_bytes: &[u8], params: &ConvertParams) -> crate::error::Result<Vec<u8>> {
    use crate::render::pdfium::PdfiumBackend;

    params.validate()?;
    let reader = PdfReader::from_bytes(pdf_bytes)?;

    let backend = PdfiumBackend::bind()?;
    let mut rasterizer = backend.open(pdf_bytes)?;
    if rasterizer.page_count() != reader.page_count() {
        return Err(crate::error::DarkModeError::parse(format!(
            "page tree mismatch: {} pages parsed, {} pages renderable",
            reader.page_count(),
            rasterizer.page_count()
        )));
    }

    let writer = transform(&reader, params, &mut rasterizer)?;
    writer.finish()
}
