//! Dark-mode conversion of PDF documents.
//!
//! Pages that embed raster images are copied as-is. Every other page is
//! rendered, its ink is found by a luminance threshold, and it is re-emitted
//! as a single full-page image with white text on a dark background.

pub mod config;
pub mod error;
pub mod pdf;
pub mod pipeline;
pub mod recolor;
pub mod render;

pub use config::settings::ConvertParams;
pub use error::{DarkModeError, Result};
#[cfg(feature = "pdfium")]
pub use pipeline::converter::convert;
pub use pipeline::converter::{convert_with, transform};
