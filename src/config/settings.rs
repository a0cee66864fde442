use std::path::Path;

use serde::Deserialize;

/// Upper bound for `dpi_scale`. 16x of a 14 400 pt page is already past what
/// pdfium can allocate as a single bitmap.
pub const MAX_DPI_SCALE: f32 = 16.0;

/// Parameters of a single dark-mode conversion.
///
/// Every field is optional in `settings.yaml`; missing keys take the defaults
/// below.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ConvertParams {
    /// Render zoom relative to 72 DPI (2.0 is roughly 150-200 DPI on screen).
    pub dpi_scale: f32,
    /// Background color of recolored pages.
    pub dark_rgb: [u8; 3],
    /// Inverted-luminance cutoff; pixels strictly above it are text.
    pub threshold: u8,
}

impl Default for ConvertParams {
    fn default() -> Self {
        ConvertParams {
            dpi_scale: 2.0,
            dark_rgb: [51, 51, 51],
            threshold: 128,
        }
    }
}

impl ConvertParams {
    pub fn from_yaml(yaml: &str) -> crate::error::Result<Self> {
        let params: Self = serde_yml::from_str(yaml).map_err(|e| {
            crate::error::DarkModeError::config(format!("Failed to parse settings YAML: {e}"))
        })?;
        params.validate()?;
        Ok(params)
    }

    pub fn from_file(path: &Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// dpi_scaleが有限の正数かつ上限以下であることを検証する。
    pub fn validate(&self) -> crate::error::Result<()> {
        if !self.dpi_scale.is_finite() || self.dpi_scale <= 0.0 {
            return Err(crate::error::DarkModeError::config(format!(
                "dpi_scale must be a positive number, got {}",
                self.dpi_scale
            )));
        }
        if self.dpi_scale > MAX_DPI_SCALE {
            return Err(crate::error::DarkModeError::config(format!(
                "dpi_scale must be at most {MAX_DPI_SCALE}, got {}",
                self.dpi_scale
            )));
        }
        Ok(())
    }
}
