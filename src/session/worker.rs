//! Classification pipeline and its optional background worker.
//!
//! Pixels are always read on the session timeline. The worker only sees the
//! cropped copy, so it never touches the live surface.

use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, error};

use crate::classifier::{Classifier, InferenceError};
use crate::error::{SketchError, SketchResult};
use crate::normalize::{NormalizedGrid, Normalizer};
use crate::profile_scope;
use crate::result::{ClassificationResult, interpret};
use crate::surface::PixelBuffer;

/// Classifier shared between the session and its worker
pub type SharedClassifier = Arc<Mutex<Box<dyn Classifier>>>;

/// Cropped sketch waiting to be classified
pub(crate) struct Job {
    pub generation: u64,
    pub crop: PixelBuffer,
}

/// Result of one pipeline run
pub(crate) struct Completed {
    pub generation: u64,
    pub grid: Option<NormalizedGrid>,
    pub outcome: SketchResult<ClassificationResult>,
}

/// Scale, pad and extract the crop, then infer and interpret.
pub(crate) fn run_pipeline(
    normalizer: &Normalizer,
    classifier: &SharedClassifier,
    job: Job,
) -> Completed {
    profile_scope!("classify");

    let grid = normalizer.normalize_cropped(&job.crop);
    let scores = {
        profile_scope!("classify::infer");
        classifier.lock().infer(&grid)
    };
    let outcome = scores
        .map(|scores| interpret(&scores))
        .map_err(SketchError::from);

    Completed {
        generation: job.generation,
        grid: Some(grid),
        outcome,
    }
}

/// The worker thread is gone; its outstanding jobs will never finish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct WorkerExited;

/// Background thread running [`run_pipeline`] for submitted jobs.
pub(crate) struct ClassifyWorker {
    jobs: Option<Sender<Job>>,
    results: Receiver<Completed>,
    thread: Option<JoinHandle<()>>,
    /// Generations submitted and not yet received, oldest first
    in_flight: Vec<u64>,
}

impl ClassifyWorker {
    pub fn spawn(classifier: SharedClassifier) -> std::io::Result<Self> {
        let (job_tx, job_rx) = mpsc::channel::<Job>();
        let (result_tx, result_rx) = mpsc::channel();

        let thread = thread::Builder::new()
            .name("digitpad-classify".to_string())
            .spawn(move || {
                let normalizer = Normalizer::new();
                for job in job_rx {
                    let generation = job.generation;
                    let done = run_pipeline(&normalizer, &classifier, job);
                    if result_tx.send(done).is_err() {
                        debug!("Session gone, dropping result for sketch {}", generation);
                        break;
                    }
                }
            })?;

        Ok(Self {
            jobs: Some(job_tx),
            results: result_rx,
            thread: Some(thread),
            in_flight: Vec::new(),
        })
    }

    /// Queue a job. Hands the job back if the worker thread has exited.
    pub fn submit(&mut self, job: Job) -> Result<(), Job> {
        let Some(jobs) = self.jobs.as_ref() else {
            return Err(job);
        };
        let generation = job.generation;
        match jobs.send(job) {
            Ok(()) => {
                self.in_flight.push(generation);
                Ok(())
            }
            Err(mpsc::SendError(job)) => {
                error!("Classification worker has exited");
                self.jobs = None;
                Err(job)
            }
        }
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Take a finished result without blocking.
    pub fn try_recv(&mut self) -> Result<Option<Completed>, WorkerExited> {
        match self.results.try_recv() {
            Ok(done) => Ok(Some(self.received(done))),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(WorkerExited),
        }
    }

    /// Wait up to `timeout` for the next finished result.
    pub fn recv_timeout(&mut self, timeout: Duration) -> Result<Option<Completed>, WorkerExited> {
        match self.results.recv_timeout(timeout) {
            Ok(done) => Ok(Some(self.received(done))),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(WorkerExited),
        }
    }

    /// Shut the worker down and fail every job it still owed.
    pub fn abandon(mut self) -> Vec<Completed> {
        let lost = std::mem::take(&mut self.in_flight);
        if !lost.is_empty() {
            error!("Classification worker exited with {} jobs pending", lost.len());
        }
        lost.into_iter()
            .map(|generation| Completed {
                generation,
                grid: None,
                outcome: Err(SketchError::InferenceFailure(InferenceError::Model(
                    "classification worker exited".to_string(),
                ))),
            })
            .collect()
    }

    fn received(&mut self, done: Completed) -> Completed {
        if let Some(index) = self.in_flight.iter().position(|&g| g == done.generation) {
            self.in_flight.remove(index);
        }
        done
    }
}

impl Drop for ClassifyWorker {
    fn drop(&mut self) {
        // Closing the job channel ends the worker loop.
        self.jobs = None;
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                error!("Classification worker panicked");
            }
        }
    }
}
