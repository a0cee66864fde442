use thiserror::Error;

#[derive(Debug, Error)]
pub enum DarkModeError {
    #[error("PDF parse error: {0}")]
    ParseError(String),

    #[error("Conversion error on page {page_index}: {message}")]
    ConversionError { page_index: u32, message: String },

    #[error("PDF serialization error: {0}")]
    SerializationError(String),

    #[error("Render error: {0}")]
    RenderError(String),

    #[error("Image encode error: {0}")]
    EncodeError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Generates factory methods for [`DarkModeError`] variants that wrap a `String`.
macro_rules! error_constructors {
    ($(
        $(#[doc = $doc:expr])*
        $method:ident => $variant:ident
    ),* $(,)?) => {
        impl DarkModeError {
            $(
                $(#[doc = $doc])*
                pub fn $method(msg: impl Into<String>) -> Self {
                    Self::$variant(msg.into())
                }
            )*
        }
    };
}

error_constructors! {
    /// Create a PDF parse error.
    parse => ParseError,
    /// Create a PDF serialization error.
    serialization => SerializationError,
    /// Create a render error.
    render => RenderError,
    /// Create an image encode error.
    encode => EncodeError,
    /// Create a configuration error.
    config => ConfigError,
}

impl DarkModeError {
    /// Create a conversion error for the given 0-based page index.
    pub fn conversion(page_index: u32, msg: impl Into<String>) -> Self {
        Self::ConversionError {
            page_index,
            message: msg.into(),
        }
    }

    /// Wrap any error raised while processing a page into a [`DarkModeError::ConversionError`].
    ///
    /// An error that already names a page is passed through unchanged.
    pub fn at_page(self, page_index: u32) -> Self {
        match self {
            err @ Self::ConversionError { .. } => err,
            other => Self::conversion(page_index, other.to_string()),
        }
    }
}

impl From<lopdf::Error> for DarkModeError {
    fn from(e: lopdf::Error) -> Self {
        Self::ParseError(e.to_string())
    }
}

impl From<serde_yml::Error> for DarkModeError {
    fn from(e: serde_yml::Error) -> Self {
        Self::ConfigError(e.to_string())
    }
}

#[cfg(feature = "pdfium")]
impl From<pdfium_render::prelude::PdfiumError> for DarkModeError {
    fn from(e: pdfium_render::prelude::PdfiumError) -> Self {
        Self::RenderError(e.to_string())
    }
}

impl From<image::ImageError> for DarkModeError {
    fn from(e: image::ImageError) -> Self {
        Self::EncodeError(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DarkModeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_at_page_wraps_other_errors() {
        let err = DarkModeError::render("bitmap allocation failed").at_page(3);
        match err {
            DarkModeError::ConversionError {
                page_index,
                message,
            } => {
                assert_eq!(page_index, 3);
                assert!(message.contains("bitmap allocation failed"));
            }
            other => panic!("expected ConversionError, got {other:?}"),
        }
    }

    #[test]
    fn test_at_page_keeps_existing_page_index() {
        let err = DarkModeError::conversion(1, "bad content").at_page(7);
        assert!(matches!(
            err,
            DarkModeError::ConversionError { page_index: 1, .. }
        ));
    }
}
