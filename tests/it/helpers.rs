//! Test helpers and fakes for reducing boilerplate in tests.
//!
//! This module provides:
//! - `Clock` - deterministic instants relative to a fixed start
//! - `RecordingClassifier` / `GatedClassifier` - classifier fakes
//! - `FailingSurface` - a surface whose pixels cannot be read
//! - `tap()` / `stroke()` - scripted pointer input

#![allow(dead_code)]

use digitpad::classifier::{Classifier, InferenceError};
use digitpad::geometry::{PixelRect, Point};
use digitpad::normalize::NormalizedGrid;
use digitpad::session::{DrawSession, PointerEvent};
use digitpad::settings::SketchSettings;
use digitpad::surface::{ImageSurface, PixelBuffer, RasterSurface, SurfaceError};
use image::{Rgba, RgbaImage};
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

// ============================================================================
// Time
// ============================================================================

/// Instants at millisecond offsets from a fixed start.
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    start: Instant,
}

impl Clock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn at(&self, ms: u64) -> Instant {
        self.start + Duration::from_millis(ms)
    }
}

// ============================================================================
// Settings
// ============================================================================

pub const CANVAS: u32 = 280;

/// Default settings on a 280x280 canvas, classifying inline.
pub fn inline_settings() -> SketchSettings {
    SketchSettings {
        canvas_width: CANVAS,
        canvas_height: CANVAS,
        ..SketchSettings::default()
    }
}

/// Same as [`inline_settings`] but with a classification worker.
pub fn offload_settings() -> SketchSettings {
    SketchSettings {
        offload_classification: true,
        ..inline_settings()
    }
}

pub fn blank_surface() -> ImageSurface {
    ImageSurface::new(CANVAS, CANVAS)
}

// ============================================================================
// Classifier fakes
// ============================================================================

/// Returns fixed scores and keeps every grid it was asked about.
#[derive(Clone)]
pub struct RecordingClassifier {
    scores: Result<Vec<f32>, InferenceError>,
    grids: Arc<Mutex<Vec<NormalizedGrid>>>,
}

impl RecordingClassifier {
    pub fn returning(scores: Vec<f32>) -> Self {
        Self {
            scores: Ok(scores),
            grids: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            scores: Err(InferenceError::Model(message.to_string())),
            grids: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Scores peaking at `digit`.
    pub fn confident_in(digit: usize, confidence: f32) -> Self {
        let mut scores = vec![(1.0 - confidence) / 9.0; 10];
        scores[digit] = confidence;
        Self::returning(scores)
    }

    pub fn call_count(&self) -> usize {
        self.grids.lock().len()
    }

    pub fn grids(&self) -> Vec<NormalizedGrid> {
        self.grids.lock().clone()
    }
}

impl Classifier for RecordingClassifier {
    fn infer(&mut self, grid: &NormalizedGrid) -> Result<Vec<f32>, InferenceError> {
        self.grids.lock().push(grid.clone());
        self.scores.clone()
    }
}

/// Blocks each inference until the test releases it.
pub struct GatedClassifier {
    pub gate: Receiver<Vec<f32>>,
}

impl Classifier for GatedClassifier {
    fn infer(&mut self, _grid: &NormalizedGrid) -> Result<Vec<f32>, InferenceError> {
        self.gate
            .recv()
            .map_err(|_| InferenceError::Model("gate closed".to_string()))
    }
}

// ============================================================================
// Surface fakes
// ============================================================================

/// Paints normally but fails every read.
pub struct FailingSurface {
    inner: ImageSurface,
}

impl FailingSurface {
    pub fn new() -> Self {
        Self {
            inner: blank_surface(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.inner.is_blank()
    }
}

impl RasterSurface for FailingSurface {
    fn size(&self) -> (u32, u32) {
        self.inner.size()
    }

    fn paint_segment(&mut self, from: Point, to: Point, width: f32) {
        self.inner.paint_segment(from, to, width);
    }

    fn read_pixels(&self, _region: PixelRect) -> Result<PixelBuffer, SurfaceError> {
        Err(SurfaceError::Unreadable("backing store lost".to_string()))
    }

    fn clear(&mut self) {
        self.inner.clear();
    }
}

// ============================================================================
// Buffers
// ============================================================================

/// Transparent buffer with an opaque `rect` of ink.
pub fn buffer_with_block(width: u32, height: u32, rect: PixelRect, ink: [u8; 4]) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        let inside = x >= rect.x && x < rect.right() && y >= rect.y && y < rect.bottom();
        if inside { Rgba(ink) } else { Rgba([0, 0, 0, 0]) }
    })
}

pub const BLACK: [u8; 4] = [0, 0, 0, 255];

// ============================================================================
// Scripted input
// ============================================================================

/// Touch down and lift at `point` without moving.
pub fn tap<S: RasterSurface>(session: &mut DrawSession<S>, point: Point, now: Instant) {
    session.handle(PointerEvent::began(point), now);
    session.handle(PointerEvent::ended(point), now);
}

/// Touch down at the first point, move through the rest, lift at the last.
pub fn stroke<S: RasterSurface>(session: &mut DrawSession<S>, points: &[Point], now: Instant) {
    let Some((first, rest)) = points.split_first() else {
        return;
    };
    session.handle(PointerEvent::began(*first), now);
    for point in rest {
        session.handle(PointerEvent::moved(*point), now);
    }
    let last = rest.last().unwrap_or(first);
    session.handle(PointerEvent::ended(*last), now);
}

pub fn pt(x: f32, y: f32) -> Point {
    Point::new(x, y)
}
