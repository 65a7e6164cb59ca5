//! Running bounding box of the ink painted in the current sketch.
//!
//! The box carries a brush-sized margin so that cropping to it never clips
//! the round caps of the outermost strokes.

use crate::geometry::{PixelRect, Point};

/// Bounding box of a sketch in canvas coordinates.
///
/// Always satisfies `min_x <= max_x` and `min_y <= max_y`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl Extent {
    pub fn new(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Square of side `side` centered on `center`.
    pub fn centered_square(center: Point, side: f32) -> Self {
        let half = side / 2.0;
        Self::new(
            center.x - half,
            center.y - half,
            center.x + half,
            center.y + half,
        )
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }

    #[inline]
    pub fn contains_point(&self, p: Point) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }

    /// True if the box has a finite, strictly positive area.
    pub fn has_area(&self) -> bool {
        let (w, h) = (self.width(), self.height());
        w.is_finite() && h.is_finite() && w > 0.0 && h > 0.0
    }

    /// Pixel rectangle covered by this extent, clipped to a `width` x `height` buffer.
    ///
    /// Fractional edges round outward. Returns `None` when nothing of the box
    /// lies inside the buffer.
    pub fn pixel_rect_within(&self, width: u32, height: u32) -> Option<PixelRect> {
        let x0 = self.min_x.floor().max(0.0);
        let y0 = self.min_y.floor().max(0.0);
        let x1 = self.max_x.ceil().min(width as f32);
        let y1 = self.max_y.ceil().min(height as f32);
        if !(x1 > x0 && y1 > y0) {
            return None;
        }
        Some(PixelRect::new(
            x0 as u32,
            y0 as u32,
            (x1 - x0) as u32,
            (y1 - y0) as u32,
        ))
    }
}

/// Incrementally grows an [`Extent`] from pointer positions.
#[derive(Debug, Clone)]
pub struct ExtentTracker {
    brush_width: f32,
    extent: Option<Extent>,
}

impl ExtentTracker {
    pub fn new(brush_width: f32) -> Self {
        Self {
            brush_width,
            extent: None,
        }
    }

    pub fn brush_width(&self) -> f32 {
        self.brush_width
    }

    /// Current extent, `None` before the first touch of a sketch.
    pub fn current(&self) -> Option<&Extent> {
        self.extent.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.extent.is_none()
    }

    /// Start a sketch at `point` with a brush-sized square around it.
    ///
    /// Does nothing if the sketch already has an extent, so ink added after a
    /// pause accumulates into the same box.
    pub fn begin(&mut self, point: Point) {
        if self.extent.is_none() {
            self.extent = Some(Extent::centered_square(point, self.brush_width));
        }
    }

    /// Grow the extent to cover `point` plus a full brush width of margin.
    ///
    /// Only a violated bound moves, and it only moves outward.
    pub fn extend(&mut self, point: Point) {
        let Some(extent) = self.extent.as_mut() else {
            self.begin(point);
            return;
        };

        let margin = self.brush_width;
        if point.x < extent.min_x {
            extent.min_x = point.x - margin;
        } else if point.x > extent.max_x {
            extent.max_x = point.x + margin;
        }

        if point.y < extent.min_y {
            extent.min_y = point.y - margin;
        } else if point.y > extent.max_y {
            extent.max_y = point.y + margin;
        }
    }

    /// Drop the extent; the next touch starts a new sketch.
    pub fn reset(&mut self) {
        self.extent = None;
    }

    /// Remove and return the extent.
    pub fn take(&mut self) -> Option<Extent> {
        self.extent.take()
    }
}
