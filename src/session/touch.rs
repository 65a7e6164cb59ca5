//! Touch handling - painting ink and tracking the sketch extent.

use std::time::Instant;
use tracing::{debug, trace};

use super::{DrawSession, DrawState};
use crate::geometry::Point;
use crate::surface::RasterSurface;

impl<S: RasterSurface> DrawSession<S> {
    pub fn touch_began(&mut self, point: Point) {
        if !self.surface.contains(point) {
            self.state.break_stroke();
            return;
        }
        self.enter_drawing(point, true);
    }

    pub fn touch_moved(&mut self, point: Point) {
        if !self.surface.contains(point) {
            self.state.break_stroke();
            return;
        }

        // Pointer came onto the canvas without an in-canvas touch down.
        if !self.state.is_drawing() {
            self.enter_drawing(point, false);
        }

        let brush_width = self.tracker.brush_width();
        if let DrawState::Drawing {
            last_point,
            has_swiped,
            pen_down,
        } = &mut self.state
        {
            let from = if *pen_down { *last_point } else { point };
            self.surface.paint_segment(from, point, brush_width);
            *last_point = point;
            *has_swiped = true;
            *pen_down = true;
        }

        self.tracker.extend(point);
        self.timer.cancel();
    }

    pub fn touch_ended(&mut self, point: Point, now: Instant) {
        match self.state {
            DrawState::Drawing {
                last_point,
                has_swiped,
                ..
            } => {
                // A tap paints a single dot.
                if !has_swiped && self.surface.contains(point) {
                    let brush_width = self.tracker.brush_width();
                    self.surface.paint_segment(last_point, last_point, brush_width);
                }
            }
            // Reported as nothing to classify once the timer fires.
            DrawState::Idle => {
                self.sketch_generation += 1;
                debug!("Sketch {} ended without ink", self.sketch_generation);
            }
            DrawState::Settling => {}
            // Touch that never reached the canvas; the in-flight sketch is untouched.
            DrawState::Classifying { .. } => return,
        }

        self.timer.schedule(now, self.settle_delay);
        self.state = DrawState::Settling;
        trace!("Settling until {:?}", self.timer.deadline());
    }

    /// Move to `Drawing` at `point`, starting a new sketch unless the previous
    /// one is still settling.
    fn enter_drawing(&mut self, point: Point, pen_down: bool) {
        match self.state {
            DrawState::Idle => {
                self.sketch_generation += 1;
                debug!("Sketch {} started", self.sketch_generation);
            }
            DrawState::Classifying { generation } => {
                // The old ink was already captured for classification.
                self.surface.clear();
                self.tracker.reset();
                self.sketch_generation += 1;
                debug!(
                    "Sketch {} started while sketch {} is classifying",
                    self.sketch_generation, generation
                );
            }
            DrawState::Settling | DrawState::Drawing { .. } => {}
        }

        // A touch after a pause lands in the existing extent.
        self.tracker.begin(point);
        self.tracker.extend(point);
        self.timer.cancel();
        self.state = DrawState::Drawing {
            last_point: point,
            has_swiped: false,
            pen_down,
        };
    }
}
