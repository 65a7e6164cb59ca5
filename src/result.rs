//! Result interpretation: raw class scores to a label and a confidence.

use serde::Serialize;

use crate::constants::{CONFIDENCE_DECIMAL_PLACES, NO_RESULT_LABEL};

/// Outcome of interpreting a score vector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassificationResult {
    /// Winning class and its raw score
    Digit { label: usize, confidence: f32 },
    /// The classifier returned no scores
    NoResult,
}

impl ClassificationResult {
    pub fn label(&self) -> Option<usize> {
        match self {
            Self::Digit { label, .. } => Some(*label),
            Self::NoResult => None,
        }
    }

    pub fn confidence(&self) -> Option<f32> {
        match self {
            Self::Digit { confidence, .. } => Some(*confidence),
            Self::NoResult => None,
        }
    }

    /// Text for the label display; `"Err"` when there is no result.
    pub fn label_text(&self) -> String {
        match self {
            Self::Digit { label, .. } => label.to_string(),
            Self::NoResult => NO_RESULT_LABEL.to_string(),
        }
    }

    /// Text for the confidence display, e.g. `"Confidence: 93.4%"`.
    pub fn confidence_text(&self) -> Option<String> {
        self.confidence()
            .map(|c| format!("Confidence: {}%", format_percentage(c)))
    }
}

/// Pick the highest score; the first occurrence wins ties.
///
/// The score is reported as-is. It is typically a soft-max probability, but no
/// range is assumed. NaN scores never win.
pub fn interpret(scores: &[f32]) -> ClassificationResult {
    let mut best: Option<(usize, f32)> = None;
    for (index, &score) in scores.iter().enumerate() {
        if score.is_nan() {
            continue;
        }
        if best.is_none_or(|(_, top)| score > top) {
            best = Some((index, score));
        }
    }

    match best {
        Some((label, confidence)) => ClassificationResult::Digit { label, confidence },
        None if scores.is_empty() => ClassificationResult::NoResult,
        // All NaN: fall back to the first class, matching a plain left-to-right scan.
        None => ClassificationResult::Digit {
            label: 0,
            confidence: scores[0],
        },
    }
}

/// Round `value` half away from zero to `places` decimal places.
pub fn round_to_places(value: f32, places: i32) -> f32 {
    let power = 10f32.powi(places);
    (value * power).round() / power
}

/// Confidence as a percentage with one decimal place, e.g. `0.93417` -> `"93.4"`.
pub fn format_percentage(confidence: f32) -> String {
    let places = CONFIDENCE_DECIMAL_PLACES.max(0);
    format!(
        "{:.*}",
        places as usize,
        round_to_places(confidence * 100.0, places)
    )
}
