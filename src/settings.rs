//! Sketch pad settings.
//!
//! Settings are plain JSON. Every field has a default, so a partial file (or
//! `{}`) is valid.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::constants::{DEFAULT_BRUSH_WIDTH, DEFAULT_CANVAS_SIZE, DEFAULT_INK_COLOR, SETTLE_DELAY_MS};

/// Errors loading or validating settings
#[derive(Error, Debug)]
pub enum SettingsError {
    /// IO error from std::io
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error from serde_json
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// A value is out of range
    #[error("Invalid setting: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SketchSettings {
    /// Brush width in canvas pixels
    pub brush_width: f32,
    /// Idle time after the last touch before classifying
    pub settle_delay_ms: u64,
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// RGBA ink color
    pub ink_color: [u8; 4],
    /// Run normalization and inference on a worker thread
    pub offload_classification: bool,
}

impl Default for SketchSettings {
    fn default() -> Self {
        Self {
            brush_width: DEFAULT_BRUSH_WIDTH,
            settle_delay_ms: SETTLE_DELAY_MS,
            canvas_width: DEFAULT_CANVAS_SIZE.0,
            canvas_height: DEFAULT_CANVAS_SIZE.1,
            ink_color: DEFAULT_INK_COLOR,
            offload_classification: false,
        }
    }
}

impl SketchSettings {
    /// Parse and validate settings from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load and validate settings from a JSON file.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json_str(&json)?;
        debug!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if !self.brush_width.is_finite() || self.brush_width <= 0.0 {
            return Err(SettingsError::Invalid(format!(
                "brush_width must be positive, got {}",
                self.brush_width
            )));
        }
        if self.canvas_width == 0 || self.canvas_height == 0 {
            return Err(SettingsError::Invalid(format!(
                "canvas must be non-empty, got {}x{}",
                self.canvas_width, self.canvas_height
            )));
        }
        if self.ink_color[3] == 0 {
            return Err(SettingsError::Invalid(
                "ink_color must not be fully transparent".to_string(),
            ));
        }
        Ok(())
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}
