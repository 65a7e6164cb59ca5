//! Draw state machine states.
//!
//! ## State Transitions
//!
//! ```text
//! Idle        -> Drawing      (touch begins or moves inside the canvas)
//! Drawing     -> Drawing      (touch moves; outside the canvas breaks the stroke)
//! Drawing     -> Settling     (touch ends; settle timer armed)
//! Idle        -> Settling     (touch ended without reaching the canvas)
//! Settling    -> Drawing      (new touch before the timer fires; same sketch)
//! Settling    -> Classifying  (settle timer fires)
//! Classifying -> Idle         (classification completes; canvas cleared)
//! Classifying -> Drawing      (new sketch starts before completion)
//! ```

use crate::geometry::Point;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DrawState {
    /// Blank canvas, nothing pending
    #[default]
    Idle,

    /// A touch is down on the canvas
    Drawing {
        /// Last pointer position on the canvas
        last_point: Point,
        /// The pointer has moved since touching down (false means a tap)
        has_swiped: bool,
        /// `last_point` starts the next segment; cleared when the pointer
        /// leaves the canvas so re-entry starts a disjoint segment
        pen_down: bool,
    },

    /// Touch lifted, waiting for the settle delay
    Settling,

    /// Sketch handed to the classifier
    Classifying {
        /// Sketch generation being classified
        generation: u64,
    },
}

impl DrawState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self, Self::Drawing { .. })
    }

    pub fn is_settling(&self) -> bool {
        matches!(self, Self::Settling)
    }

    pub fn is_classifying(&self) -> bool {
        matches!(self, Self::Classifying { .. })
    }

    /// Generation being classified, if classifying
    pub fn classifying_generation(&self) -> Option<u64> {
        match self {
            Self::Classifying { generation } => Some(*generation),
            _ => None,
        }
    }

    /// Last painted point, if drawing
    pub fn last_point(&self) -> Option<Point> {
        match self {
            Self::Drawing { last_point, .. } => Some(*last_point),
            _ => None,
        }
    }

    /// Break stroke continuity so the next move paints a fresh dot.
    pub fn break_stroke(&mut self) {
        if let Self::Drawing { pen_down, .. } = self {
            *pen_down = false;
        }
    }

    pub fn reset(&mut self) {
        *self = Self::Idle;
    }
}
