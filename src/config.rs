//! Editor configuration handed in by the host page.
//!
//! Every field has a default, so the host may pass `{}` or only the keys it
//! wants to override. Keys are camelCase to match the rest of the JSON the
//! page deals with.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::Deserialize;

use crate::consts::{CELL_SIZE_PX, LINE_HEIGHT_PX, MAX_ZOOM, MIN_ZOOM, TEMPLATE_INDENT, ZOOM_IN_STEP, ZOOM_OUT_STEP};
use crate::error::ConfigError;

/// Tunable view and formatting parameters.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct EditorConfig {
    /// Cell edge length in world pixels.
    pub cell_size_px: f64,
    /// Lower zoom bound.
    pub min_zoom: f64,
    /// Upper zoom bound.
    pub max_zoom: f64,
    /// Factor applied per zoom-in wheel notch. Must be greater than 1.
    pub zoom_in_step: f64,
    /// Factor applied per zoom-out wheel notch. Must lie in (0, 1).
    pub zoom_out_step: f64,
    /// Source editor line height, used to compute scroll offsets.
    pub line_height_px: f64,
    /// Spaces per indent level in generated entity templates.
    pub template_indent: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            cell_size_px: CELL_SIZE_PX,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            zoom_in_step: ZOOM_IN_STEP,
            zoom_out_step: ZOOM_OUT_STEP,
            line_height_px: LINE_HEIGHT_PX,
            template_indent: TEMPLATE_INDENT,
        }
    }
}

impl EditorConfig {
    /// Parse and validate a JSON config object.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON or unknown keys, and
    /// [`ConfigError::Invalid`] when a value is out of range.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_positive(self.cell_size_px) {
            return Err(ConfigError::Invalid(format!("cellSizePx must be positive, got {}", self.cell_size_px)));
        }
        if !is_positive(self.min_zoom) || self.min_zoom > self.max_zoom {
            return Err(ConfigError::Invalid(format!(
                "zoom bounds must satisfy 0 < minZoom <= maxZoom, got [{}, {}]",
                self.min_zoom, self.max_zoom
            )));
        }
        if !is_positive(self.zoom_in_step - 1.0) {
            return Err(ConfigError::Invalid(format!("zoomInStep must exceed 1, got {}", self.zoom_in_step)));
        }
        if !is_positive(self.zoom_out_step) || !is_positive(1.0 - self.zoom_out_step) {
            return Err(ConfigError::Invalid(format!("zoomOutStep must lie in (0, 1), got {}", self.zoom_out_step)));
        }
        if !is_positive(self.line_height_px) {
            return Err(ConfigError::Invalid(format!("lineHeightPx must be positive, got {}", self.line_height_px)));
        }
        Ok(())
    }
}

/// `false` for zero, negatives and NaN.
fn is_positive(value: f64) -> bool {
    value > 0.0
}
