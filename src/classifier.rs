//! Classifier adapter.
//!
//! The trained model is opaque to the rest of the crate: anything that maps a
//! [`NormalizedGrid`] to one score per digit class implements [`Classifier`].
//! Closures work directly, and [`LinearClassifier`] provides a soft-max
//! regression model loaded from JSON weights.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;
use tracing::info;

use crate::constants::{DIGIT_CLASSES, GRID_CELLS};
use crate::normalize::NormalizedGrid;

/// Errors raised by a classifier while scoring a grid
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InferenceError {
    /// Input or parameter shapes do not line up
    #[error("Shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    /// The model failed internally
    #[error("Model error: {0}")]
    Model(String),
}

/// Maps a normalized grid to per-class scores (index = digit).
pub trait Classifier: Send {
    fn infer(&mut self, grid: &NormalizedGrid) -> Result<Vec<f32>, InferenceError>;
}

impl<F> Classifier for F
where
    F: FnMut(&NormalizedGrid) -> Result<Vec<f32>, InferenceError> + Send,
{
    fn infer(&mut self, grid: &NormalizedGrid) -> Result<Vec<f32>, InferenceError> {
        self(grid)
    }
}

/// Errors loading model weights
#[derive(Error, Debug)]
pub enum ModelError {
    /// IO error from std::io
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error from serde_json
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Weights do not match the grid or class count
    #[error("Invalid model shape: {0}")]
    Shape(String),
}

/// Single-layer soft-max regression over the 784 grid cells.
#[derive(Debug, Clone, Deserialize)]
pub struct LinearClassifier {
    /// One row of 784 weights per class
    weights: Vec<Vec<f32>>,
    /// One bias per class
    bias: Vec<f32>,
}

impl LinearClassifier {
    /// Build from explicit parameters, checking their shapes.
    pub fn new(weights: Vec<Vec<f32>>, bias: Vec<f32>) -> Result<Self, ModelError> {
        let model = Self { weights, bias };
        model.validate()?;
        Ok(model)
    }

    pub fn from_json_str(json: &str) -> Result<Self, ModelError> {
        let model: Self = serde_json::from_str(json)?;
        model.validate()?;
        Ok(model)
    }

    /// Load weights from a JSON file of the form `{"weights": [[..]], "bias": [..]}`.
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let json = std::fs::read_to_string(path)?;
        let model = Self::from_json_str(&json)?;
        info!("Loaded linear classifier from {}", path.display());
        Ok(model)
    }

    pub fn class_count(&self) -> usize {
        self.bias.len()
    }

    fn validate(&self) -> Result<(), ModelError> {
        if self.weights.len() != DIGIT_CLASSES || self.bias.len() != DIGIT_CLASSES {
            return Err(ModelError::Shape(format!(
                "expected {} classes, got {} weight rows and {} biases",
                DIGIT_CLASSES,
                self.weights.len(),
                self.bias.len()
            )));
        }
        if let Some((class, row)) = self
            .weights
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != GRID_CELLS)
        {
            return Err(ModelError::Shape(format!(
                "class {} has {} weights, expected {}",
                class,
                row.len(),
                GRID_CELLS
            )));
        }
        Ok(())
    }
}

impl Classifier for LinearClassifier {
    fn infer(&mut self, grid: &NormalizedGrid) -> Result<Vec<f32>, InferenceError> {
        let input = grid.as_slice();
        if input.len() != GRID_CELLS {
            return Err(InferenceError::ShapeMismatch {
                expected: GRID_CELLS,
                actual: input.len(),
            });
        }

        let logits: Vec<f32> = self
            .weights
            .iter()
            .zip(&self.bias)
            .map(|(row, b)| row.iter().zip(input).map(|(w, x)| w * x).sum::<f32>() + b)
            .collect();

        softmax(&logits).ok_or_else(|| InferenceError::Model("non-finite logits".to_string()))
    }
}

/// Numerically stable soft-max; `None` if any logit is not finite.
pub fn softmax(logits: &[f32]) -> Option<Vec<f32>> {
    if logits.iter().any(|v| !v.is_finite()) {
        return None;
    }
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|v| (v - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    Some(exps.into_iter().map(|e| e / sum).collect())
}
