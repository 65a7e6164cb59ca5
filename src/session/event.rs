//! Pointer events fed to the session.

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// A pointer event in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum PointerEvent {
    Began { x: f32, y: f32 },
    Moved { x: f32, y: f32 },
    Ended { x: f32, y: f32 },
}

impl PointerEvent {
    pub fn began(point: Point) -> Self {
        Self::Began {
            x: point.x,
            y: point.y,
        }
    }

    pub fn moved(point: Point) -> Self {
        Self::Moved {
            x: point.x,
            y: point.y,
        }
    }

    pub fn ended(point: Point) -> Self {
        Self::Ended {
            x: point.x,
            y: point.y,
        }
    }

    pub fn position(&self) -> Point {
        match *self {
            Self::Began { x, y } | Self::Moved { x, y } | Self::Ended { x, y } => Point::new(x, y),
        }
    }
}

/// A pointer event with its time offset from the start of a recording.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimedEvent {
    pub at_ms: u64,
    #[serde(flatten)]
    pub event: PointerEvent,
}
