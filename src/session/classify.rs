//! Settle expiry, classification dispatch and completion.

use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use super::worker::{Completed, Job, WorkerExited, run_pipeline};
use super::{ClassificationReport, DrawSession, DrawState};
use crate::error::{SketchError, SketchResult};
use crate::extent::Extent;
use crate::result::ClassificationResult;
use crate::surface::{PixelBuffer, RasterSurface};

impl<S: RasterSurface> DrawSession<S> {
    /// Advance time: fire the settle timer if due and collect finished
    /// classifications.
    pub fn poll(&mut self, now: Instant) -> Vec<ClassificationReport> {
        if self.timer.fire_if_due(now) && self.state.is_settling() {
            self.dispatch();
        }
        self.drain_worker();
        std::mem::take(&mut self.reports)
    }

    /// Block until every offloaded classification has finished or `timeout`
    /// elapses, then return all reports collected so far.
    pub fn wait_for_classification(&mut self, timeout: Duration) -> Vec<ClassificationReport> {
        let deadline = Instant::now() + timeout;
        loop {
            let Some(worker) = self.worker.as_mut() else { break };
            if worker.in_flight() == 0 {
                break;
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                warn!("Timed out waiting for {} classifications", worker.in_flight());
                break;
            }
            match worker.recv_timeout(remaining) {
                Ok(Some(done)) => self.complete(done),
                Ok(None) => break,
                Err(WorkerExited) => {
                    self.abandon_worker();
                    break;
                }
            }
        }
        std::mem::take(&mut self.reports)
    }

    /// Number of classifications handed to the worker and not yet collected
    pub fn pending_classifications(&self) -> usize {
        self.worker.as_ref().map_or(0, |w| w.in_flight())
    }

    fn dispatch(&mut self) {
        let generation = self.sketch_generation;
        let extent = self.tracker.take();
        self.state = DrawState::Classifying { generation };
        debug!("Classifying sketch {} with extent {:?}", generation, extent);

        let crop = match self.capture(extent.as_ref()) {
            Ok(crop) => crop,
            Err(e) => {
                self.complete(Completed {
                    generation,
                    grid: None,
                    outcome: Err(e),
                });
                return;
            }
        };

        let job = Job { generation, crop };
        let job = match self.worker.as_mut() {
            Some(worker) => match worker.submit(job) {
                Ok(()) => return,
                Err(job) => {
                    warn!("Worker unavailable, classifying sketch {} inline", generation);
                    self.abandon_worker();
                    job
                }
            },
            None => job,
        };

        let done = run_pipeline(&self.normalizer, &self.classifier, job);
        self.complete(done);
    }

    /// Copy the pixels under `extent` off the surface.
    fn capture(&self, extent: Option<&Extent>) -> SketchResult<PixelBuffer> {
        let extent = extent.ok_or(SketchError::EmptyExtent)?;
        if !extent.has_area() {
            return Err(SketchError::EmptyExtent);
        }
        let (width, height) = self.surface.size();
        match extent.pixel_rect_within(width, height) {
            Some(rect) => Ok(self.surface.read_pixels(rect)?),
            None => Ok(PixelBuffer::new(0, 0)),
        }
    }

    fn drain_worker(&mut self) {
        while let Some(worker) = self.worker.as_mut() {
            match worker.try_recv() {
                Ok(Some(done)) => self.complete(done),
                Ok(None) => break,
                Err(WorkerExited) => self.abandon_worker(),
            }
        }
    }

    /// Drop a dead worker, failing the sketches it never returned.
    /// Later sketches classify inline.
    fn abandon_worker(&mut self) {
        let Some(worker) = self.worker.take() else {
            return;
        };
        for done in worker.abandon() {
            self.complete(done);
        }
    }

    fn complete(&mut self, done: Completed) {
        let current = self.state.classifying_generation() == Some(done.generation);
        if current {
            self.surface.clear();
            self.tracker.reset();
            self.state.reset();
        }

        log_outcome(done.generation, current, &done.outcome);

        self.reports.push(ClassificationReport {
            generation: done.generation,
            current,
            outcome: done.outcome,
            grid: done.grid,
        });
    }
}

fn log_outcome(generation: u64, current: bool, outcome: &SketchResult<ClassificationResult>) {
    match outcome {
        Ok(ClassificationResult::Digit { label, confidence }) => info!(
            "Sketch {} classified as {} ({:.3}){}",
            generation,
            label,
            confidence,
            if current { "" } else { " after a newer sketch started" }
        ),
        Ok(ClassificationResult::NoResult) => {
            warn!("Sketch {}: classifier returned no scores", generation)
        }
        Err(e) if e.is_silent() => debug!("Sketch {}: {}", generation, e),
        Err(e) => warn!("Sketch {}: {}", generation, e),
    }
}
