//! Sketch session: pointer input to classification results.
//!
//! A [`DrawSession`] owns one canvas. Pointer events paint ink on the raster
//! surface and grow the sketch extent; once the pointer has been lifted for
//! the settle delay, the sketch is cropped, normalized and classified, and
//! the canvas is reset for the next digit.
//!
//! ## Architecture
//!
//! The session is a single-threaded state machine ([`DrawState`]) driven by
//! explicit calls: pointer events via [`DrawSession::handle`], time via
//! [`DrawSession::poll`]. Nothing fires on its own. Classification can run
//! inline inside `poll` or on a worker thread; either way its result is
//! applied back on the session timeline.
//!
//! Every sketch gets a generation number. A result whose sketch has been
//! superseded by a newer one is still reported, marked `current: false`,
//! but does not clear the canvas the newer sketch is being drawn on.
//!
//! ## Modules
//!
//! - `state` - Draw state machine enum
//! - `touch` - Touch began/moved/ended handling
//! - `classify` - Settle expiry, dispatch and completion
//! - `settle` - Single-shot settle timer
//! - `worker` - Pipeline run and background worker
//! - `event` - Pointer event types

mod classify;
mod event;
mod settle;
mod state;
mod touch;
mod worker;

pub use event::{PointerEvent, TimedEvent};
pub use settle::SettleTimer;
pub use state::DrawState;
pub use worker::SharedClassifier;

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::warn;

use crate::classifier::Classifier;
use crate::constants::NO_RESULT_LABEL;
use crate::error::SketchResult;
use crate::extent::{Extent, ExtentTracker};
use crate::normalize::{NormalizedGrid, Normalizer};
use crate::result::ClassificationResult;
use crate::settings::SketchSettings;
use crate::surface::RasterSurface;
use worker::ClassifyWorker;

/// Outcome of one classification attempt, as delivered to the UI.
#[derive(Debug)]
pub struct ClassificationReport {
    /// Sketch generation that was classified
    pub generation: u64,
    /// False when a newer sketch started before this one finished; the UI
    /// should show the result but skip canvas side effects
    pub current: bool,
    pub outcome: SketchResult<ClassificationResult>,
    /// Grid fed to the classifier, for debug display
    pub grid: Option<NormalizedGrid>,
}

/// Label and confidence strings for the output display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayText {
    pub label: String,
    pub confidence: Option<String>,
}

impl ClassificationReport {
    /// What to show the user; `None` when there was nothing to classify.
    pub fn display(&self) -> Option<DisplayText> {
        match &self.outcome {
            Ok(result) => Some(DisplayText {
                label: result.label_text(),
                confidence: result.confidence_text(),
            }),
            Err(e) if e.is_silent() => None,
            Err(_) => Some(DisplayText {
                label: NO_RESULT_LABEL.to_string(),
                confidence: None,
            }),
        }
    }
}

/// One canvas, its sketch state and its classifier.
pub struct DrawSession<S: RasterSurface> {
    surface: S,
    tracker: ExtentTracker,
    state: DrawState,
    timer: SettleTimer,
    settle_delay: Duration,
    normalizer: Normalizer,
    classifier: SharedClassifier,
    worker: Option<ClassifyWorker>,
    sketch_generation: u64,
    reports: Vec<ClassificationReport>,
}

impl<S: RasterSurface> DrawSession<S> {
    pub fn new(surface: S, classifier: impl Classifier + 'static, settings: &SketchSettings) -> Self {
        let classifier: Box<dyn Classifier> = Box::new(classifier);
        Self::with_shared_classifier(surface, Arc::new(Mutex::new(classifier)), settings)
    }

    /// Build a session around a classifier that other code also holds.
    ///
    /// Falls back to inline classification if the worker thread cannot be spawned.
    pub fn with_shared_classifier(
        surface: S,
        classifier: SharedClassifier,
        settings: &SketchSettings,
    ) -> Self {
        let worker = if settings.offload_classification {
            match ClassifyWorker::spawn(classifier.clone()) {
                Ok(worker) => Some(worker),
                Err(e) => {
                    warn!("Failed to spawn classification worker, classifying inline: {}", e);
                    None
                }
            }
        } else {
            None
        };

        Self {
            surface,
            tracker: ExtentTracker::new(settings.brush_width),
            state: DrawState::Idle,
            timer: SettleTimer::new(),
            settle_delay: settings.settle_delay(),
            normalizer: Normalizer::new(),
            classifier,
            worker,
            sketch_generation: 0,
            reports: Vec::new(),
        }
    }

    /// Feed one pointer event.
    pub fn handle(&mut self, event: PointerEvent, now: Instant) {
        match event {
            PointerEvent::Began { .. } => self.touch_began(event.position()),
            PointerEvent::Moved { .. } => self.touch_moved(event.position()),
            PointerEvent::Ended { .. } => self.touch_ended(event.position(), now),
        }
    }

    pub fn state(&self) -> &DrawState {
        &self.state
    }

    /// Extent of the sketch being drawn
    pub fn extent(&self) -> Option<&Extent> {
        self.tracker.current()
    }

    pub fn brush_width(&self) -> f32 {
        self.tracker.brush_width()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Generation of the current (or most recent) sketch
    pub fn sketch_generation(&self) -> u64 {
        self.sketch_generation
    }

    /// When the settle timer will fire, if armed
    pub fn settle_deadline(&self) -> Option<Instant> {
        self.timer.deadline()
    }

    pub fn is_offloading(&self) -> bool {
        self.worker.is_some()
    }

    /// Discard the sketch: cancel the timer, erase the ink and return to idle.
    ///
    /// Any classification still running is reported later as not current.
    pub fn clear(&mut self) {
        self.timer.cancel();
        self.tracker.reset();
        self.surface.clear();
        self.state.reset();
    }
}
