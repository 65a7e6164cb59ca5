//! Stage timing for the normalize/classify pipeline.
//!
//! Use the profiling macro for zero-cost instrumentation:
//! ```ignore
//! use digitpad::profile_scope;
//!
//! fn normalize() {
//!     profile_scope!("normalize");
//!     // ... work ...
//! }
//! ```
//!
//! The macro expands to nothing unless the `profiling` feature is enabled.
//! [`ScopedTimer`] can also be used directly where a duration is always wanted.

use std::time::Instant;
use tracing::{debug, warn};

use crate::constants::SLOW_STAGE_MS;

/// Profile a scope with the given name. Zero-cost when profiling is disabled.
#[macro_export]
macro_rules! profile_scope {
    ($name:expr) => {
        #[cfg(feature = "profiling")]
        let _timer = $crate::perf::ScopedTimer::with_default_threshold($name);
        #[cfg(not(feature = "profiling"))]
        let _ = $name;
    };
    ($name:expr, $threshold_ms:expr) => {
        #[cfg(feature = "profiling")]
        let _timer = $crate::perf::ScopedTimer::new($name, $threshold_ms);
        #[cfg(not(feature = "profiling"))]
        let _ = ($name, $threshold_ms);
    };
}

pub use crate::profile_scope;

/// A scoped timer that logs its duration on drop.
///
/// Durations above the threshold are logged at `warn`, everything else at `debug`.
pub struct ScopedTimer {
    name: &'static str,
    start: Instant,
    threshold_ms: f64,
}

impl ScopedTimer {
    /// Create a new scoped timer with a warning threshold.
    pub fn new(name: &'static str, threshold_ms: f64) -> Self {
        Self {
            name,
            start: Instant::now(),
            threshold_ms,
        }
    }

    /// Create a timer with the default slow-stage threshold.
    pub fn with_default_threshold(name: &'static str) -> Self {
        Self::new(name, SLOW_STAGE_MS)
    }

    /// Milliseconds since the timer started.
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for ScopedTimer {
    fn drop(&mut self) {
        let elapsed = self.elapsed_ms();
        if elapsed > self.threshold_ms {
            warn!(
                "Slow stage: {} took {:.2}ms (threshold {:.2}ms)",
                self.name, elapsed, self.threshold_ms
            );
        } else {
            debug!("{} took {:.3}ms", self.name, elapsed);
        }
    }
}
