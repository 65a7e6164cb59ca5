//! Error types for a classification attempt
//!
//! Every failure here is terminal for the attempt in progress: nothing is
//! retried, and the session returns to idle with a cleared canvas.

use thiserror::Error;

use crate::classifier::InferenceError;
use crate::surface::SurfaceError;

/// Errors that end a classification attempt
#[derive(Error, Debug)]
pub enum SketchError {
    /// No ink to classify (no extent, or an extent without area)
    #[error("Nothing to classify")]
    EmptyExtent,

    /// The raster surface could not be read
    #[error("Failed to read raster surface: {0}")]
    BufferReadFailure(#[from] SurfaceError),

    /// The classifier rejected the grid or failed internally
    #[error("Inference failed: {0}")]
    InferenceFailure(#[from] InferenceError),
}

impl SketchError {
    /// True for outcomes the user should not be told about.
    pub fn is_silent(&self) -> bool {
        matches!(self, SketchError::EmptyExtent)
    }
}

/// Result type alias for pipeline operations
pub type SketchResult<T> = Result<T, SketchError>;
