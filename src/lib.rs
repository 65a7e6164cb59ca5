//! Freehand digit sketch pad core.
//!
//! Converts pointer input into a fixed 28x28 intensity grid, hands it to a
//! digit classifier and interprets the scores as a label and a confidence.
//!
//! - `extent` - running bounding box of the sketch
//! - `normalize` - crop, aspect-preserving scale, center-pad, alpha extraction
//! - `session` - draw/settle/classify state machine
//! - `result` - arg-max interpretation and display formatting
//! - `surface` / `classifier` - the two collaborators the session drives

pub mod classifier;
pub mod constants;
pub mod error;
pub mod extent;
pub mod geometry;
pub mod logging;
pub mod normalize;
pub mod perf;
pub mod result;
pub mod session;
pub mod settings;
pub mod surface;

pub use classifier::{Classifier, InferenceError, LinearClassifier};
pub use error::{SketchError, SketchResult};
pub use extent::{Extent, ExtentTracker};
pub use geometry::{PixelRect, Point};
pub use normalize::{NormalizedGrid, Normalizer};
pub use result::{ClassificationResult, interpret};
pub use session::{ClassificationReport, DrawSession, DrawState, PointerEvent};
pub use settings::SketchSettings;
pub use surface::{ImageSurface, RasterSurface};
