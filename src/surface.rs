//! Raster surface the sketch is painted on.
//!
//! The session only talks to the [`RasterSurface`] trait; the UI layer owns
//! the real surface. [`ImageSurface`] is an in-memory RGBA implementation used
//! by the replay tool and the tests.

use image::{Rgba, RgbaImage};
use thiserror::Error;

use crate::constants::{DEFAULT_CANVAS_SIZE, DEFAULT_INK_COLOR};
use crate::geometry::{PixelRect, Point};

/// Pixel data read back from a surface. Only the alpha channel is meaningful
/// to the normalizer.
pub type PixelBuffer = RgbaImage;

/// Errors reading from a raster surface
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    /// Requested region extends past the surface
    #[error("Region {rect:?} outside {width}x{height} surface")]
    RegionOutOfBounds {
        rect: PixelRect,
        width: u32,
        height: u32,
    },

    /// The backing store could not be accessed
    #[error("Surface unreadable: {0}")]
    Unreadable(String),
}

/// A 2-D pixel buffer that ink can be painted onto and read back from.
///
/// Paints must be visible to reads issued after them on the same timeline.
pub trait RasterSurface {
    /// Surface size in pixels (width, height)
    fn size(&self) -> (u32, u32);

    /// Paint a round-capped segment. `from == to` paints a dot.
    fn paint_segment(&mut self, from: Point, to: Point, width: f32);

    /// Copy the pixels of `region`.
    fn read_pixels(&self, region: PixelRect) -> Result<PixelBuffer, SurfaceError>;

    /// Erase all ink.
    fn clear(&mut self);

    /// True if `point` lies on the surface.
    fn contains(&self, point: Point) -> bool {
        let (w, h) = self.size();
        point.x >= 0.0 && point.y >= 0.0 && point.x < w as f32 && point.y < h as f32
    }
}

/// In-memory surface backed by a transparent RGBA image.
#[derive(Debug, Clone)]
pub struct ImageSurface {
    image: RgbaImage,
    ink: Rgba<u8>,
}

impl Default for ImageSurface {
    fn default() -> Self {
        Self::new(DEFAULT_CANVAS_SIZE.0, DEFAULT_CANVAS_SIZE.1)
    }
}

impl ImageSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
            ink: Rgba(DEFAULT_INK_COLOR),
        }
    }

    /// Use `ink` for subsequent strokes.
    pub fn with_ink(mut self, ink: [u8; 4]) -> Self {
        self.ink = Rgba(ink);
        self
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Number of pixels carrying any ink
    pub fn inked_pixel_count(&self) -> usize {
        self.image.pixels().filter(|p| p.0[3] > 0).count()
    }

    pub fn is_blank(&self) -> bool {
        self.image.pixels().all(|p| p.0[3] == 0)
    }
}

impl RasterSurface for ImageSurface {
    fn size(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    fn paint_segment(&mut self, from: Point, to: Point, width: f32) {
        let radius = width / 2.0;
        if !radius.is_finite() || radius <= 0.0 {
            return;
        }
        let (w, h) = self.image.dimensions();

        let min_x = (from.x.min(to.x) - radius).floor().max(0.0) as u32;
        let min_y = (from.y.min(to.y) - radius).floor().max(0.0) as u32;
        let max_x = ((from.x.max(to.x) + radius).ceil().max(0.0) as u32).min(w);
        let max_y = ((from.y.max(to.y) + radius).ceil().max(0.0) as u32).min(h);

        let radius_sq = radius * radius;
        for y in min_y..max_y {
            for x in min_x..max_x {
                let center = Point::new(x as f32 + 0.5, y as f32 + 0.5);
                if distance_sq_to_segment(center, from, to) <= radius_sq {
                    self.image.put_pixel(x, y, self.ink);
                }
            }
        }
    }

    fn read_pixels(&self, region: PixelRect) -> Result<PixelBuffer, SurfaceError> {
        let (width, height) = self.image.dimensions();
        if !region.fits_within(width, height) {
            return Err(SurfaceError::RegionOutOfBounds {
                rect: region,
                width,
                height,
            });
        }
        Ok(image::imageops::crop_imm(&self.image, region.x, region.y, region.width, region.height)
            .to_image())
    }

    fn clear(&mut self) {
        for pixel in self.image.pixels_mut() {
            *pixel = Rgba([0, 0, 0, 0]);
        }
    }
}

/// Squared distance from `p` to the segment `a`-`b`.
fn distance_sq_to_segment(p: Point, a: Point, b: Point) -> f32 {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let len_sq = dx * dx + dy * dy;
    let t = if len_sq > 0.0 {
        (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let (cx, cy) = (a.x + t * dx, a.y + t * dy);
    (p.x - cx) * (p.x - cx) + (p.y - cy) * (p.y - cy)
}
