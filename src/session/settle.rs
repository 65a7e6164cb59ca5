//! Single-shot settle timer.
//!
//! The timer is a deadline checked against an explicit clock, so it can only
//! fire from `poll` on the session timeline. Rescheduling replaces the
//! deadline in one assignment; there is no callback left behind to fire late.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, Default)]
pub struct SettleTimer {
    deadline: Option<Instant>,
}

impl SettleTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the timer to fire `delay` after `now`, replacing any earlier deadline.
    pub fn schedule(&mut self, now: Instant, delay: Duration) {
        self.deadline = Some(now + delay);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Disarm and return true if the deadline has passed.
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}
