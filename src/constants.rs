//! Sketch pipeline constants.
//!
//! Centralizes the fixed classifier geometry and the interaction defaults so
//! the normalizer, the session and the settings agree on them.

// ============================================================================
// Classifier Input Geometry
// ============================================================================

/// Side length of the normalized grid fed to the classifier
pub const GRID_SIZE: u32 = 28;

/// Number of cells in the normalized grid
pub const GRID_CELLS: usize = (GRID_SIZE * GRID_SIZE) as usize;

/// Longest side of the scaled sketch inside the grid
pub const CONTENT_SIZE: u32 = 20;

/// Maximum value of the alpha channel
pub const ALPHA_MAX: f32 = 255.0;

/// Number of digit classes the classifier scores
pub const DIGIT_CLASSES: usize = 10;

// ============================================================================
// Interaction Defaults
// ============================================================================

/// Default brush width in canvas pixels
pub const DEFAULT_BRUSH_WIDTH: f32 = 20.0;

/// Idle time after the last touch before the sketch is classified
pub const SETTLE_DELAY_MS: u64 = 400;

/// Default drawing canvas size
pub const DEFAULT_CANVAS_SIZE: (u32, u32) = (400, 400);

/// Default ink color (opaque black)
pub const DEFAULT_INK_COLOR: [u8; 4] = [0, 0, 0, 255];

// ============================================================================
// Presentation
// ============================================================================

/// Decimal places shown for the confidence percentage
pub const CONFIDENCE_DECIMAL_PLACES: i32 = 1;

/// Label shown when the classifier produced nothing usable
pub const NO_RESULT_LABEL: &str = "Err";

// ============================================================================
// Profiling
// ============================================================================

/// Stage duration above which a pipeline stage is logged as slow
pub const SLOW_STAGE_MS: f64 = 16.0;
