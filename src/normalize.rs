//! Sketch-to-grid normalization.
//!
//! Turns an arbitrary raster sketch into the fixed 28x28 intensity grid the
//! classifier expects:
//!
//! 1. **Crop** the raster to the sketch extent (clipped to the buffer).
//! 2. **Scale** so the longer side is 20 px, preserving aspect ratio (the
//!    shorter side rounds up), with nearest-neighbor sampling so thin strokes
//!    stay sharp.
//! 3. **Center** the result on a transparent 28x28 canvas.
//! 4. **Extract** the alpha channel of every cell as a value in `[0, 1]`.
//!
//! Only alpha is read. Ink is painted as a solid color on a transparent
//! layer, so alpha is the ink density.

use image::imageops::FilterType;
use image::{GrayImage, Luma, RgbaImage};

use crate::constants::{ALPHA_MAX, CONTENT_SIZE, GRID_CELLS, GRID_SIZE};
use crate::error::{SketchError, SketchResult};
use crate::extent::Extent;
use crate::profile_scope;
use crate::surface::PixelBuffer;

/// Where the scaled sketch sits inside the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    pub scaled_width: u32,
    pub scaled_height: u32,
    pub offset_x: u32,
    pub offset_y: u32,
}

impl GridLayout {
    /// Layout for a `width` x `height` crop.
    pub fn for_crop(width: u32, height: u32) -> Self {
        let (scaled_width, scaled_height) = scaled_dimensions(width, height);
        Self {
            scaled_width,
            scaled_height,
            offset_x: center_offset(scaled_width),
            offset_y: center_offset(scaled_height),
        }
    }

    /// Blank columns to the right of the sketch
    pub fn right_margin(&self) -> u32 {
        GRID_SIZE - self.offset_x - self.scaled_width
    }

    /// Blank rows below the sketch
    pub fn bottom_margin(&self) -> u32 {
        GRID_SIZE - self.offset_y - self.scaled_height
    }
}

/// Size of a `width` x `height` crop after aspect-preserving scaling.
///
/// The longer side becomes exactly [`CONTENT_SIZE`]; the shorter side shrinks
/// proportionally, rounded up to whole pixels.
pub fn scaled_dimensions(width: u32, height: u32) -> (u32, u32) {
    let (w, h) = (u64::from(width.max(1)), u64::from(height.max(1)));
    let fit = |side: u64, other: u64| -> u32 {
        if side >= other {
            return CONTENT_SIZE;
        }
        // Exact ceiling; a float quotient can land just above a whole pixel.
        let scaled = (u64::from(CONTENT_SIZE) * side).div_ceil(other);
        (scaled as u32).clamp(1, CONTENT_SIZE)
    };
    (fit(w, h), fit(h, w))
}

/// Leading margin that centers `size` pixels in the grid, halves rounded up.
pub fn center_offset(size: u32) -> u32 {
    (GRID_SIZE - size.min(GRID_SIZE)).div_ceil(2)
}

/// A 28x28 grid of intensities in `[0, 1]`, row-major, top-left origin.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedGrid {
    cells: Vec<f32>,
    layout: Option<GridLayout>,
}

impl Default for NormalizedGrid {
    fn default() -> Self {
        Self::zeroed()
    }
}

impl NormalizedGrid {
    /// An all-zero grid (no ink).
    pub fn zeroed() -> Self {
        Self {
            cells: vec![0.0; GRID_CELLS],
            layout: None,
        }
    }

    /// Build a grid from raw row-major values.
    ///
    /// Returns `None` unless exactly 784 values are given. Values are clamped to `[0, 1]`.
    pub fn from_values(values: Vec<f32>) -> Option<Self> {
        if values.len() != GRID_CELLS {
            return None;
        }
        Some(Self {
            cells: values.into_iter().map(|v| v.clamp(0.0, 1.0)).collect(),
            layout: None,
        })
    }

    /// Row-major cell values
    pub fn as_slice(&self) -> &[f32] {
        &self.cells
    }

    pub fn into_vec(self) -> Vec<f32> {
        self.cells
    }

    /// Value at column `x`, row `y`.
    pub fn get(&self, x: u32, y: u32) -> Option<f32> {
        if x >= GRID_SIZE || y >= GRID_SIZE {
            return None;
        }
        self.cells.get((y * GRID_SIZE + x) as usize).copied()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f32]> {
        self.cells.chunks(GRID_SIZE as usize)
    }

    /// Placement of the scaled sketch; `None` for a blank grid.
    pub fn layout(&self) -> Option<GridLayout> {
        self.layout
    }

    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|&v| v == 0.0)
    }

    /// Text rendering for debug output: `#` for ink at or above half
    /// intensity, `+` for fainter ink, `.` for none.
    pub fn to_ascii(&self) -> String {
        self.rows()
            .map(|row| {
                row.iter()
                    .map(|&v| match v {
                        v if v >= 0.5 => '#',
                        v if v > 0.0 => '+',
                        _ => '.',
                    })
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Greyscale image of the grid, ink drawn white on black.
    pub fn to_image(&self) -> GrayImage {
        GrayImage::from_fn(GRID_SIZE, GRID_SIZE, |x, y| {
            let v = self.get(x, y).unwrap_or(0.0);
            Luma([(v * ALPHA_MAX).round() as u8])
        })
    }
}

/// Converts raster sketches into [`NormalizedGrid`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct Normalizer;

impl Normalizer {
    pub fn new() -> Self {
        Self
    }

    /// Normalize the part of `buffer` covered by `extent`.
    ///
    /// Fails with [`SketchError::EmptyExtent`] when there is no extent or it
    /// has no area. An extent lying entirely off the buffer, or covering only
    /// transparent pixels, yields an all-zero grid.
    pub fn normalize(
        &self,
        buffer: &PixelBuffer,
        extent: Option<&Extent>,
    ) -> SketchResult<NormalizedGrid> {
        profile_scope!("normalize");

        let extent = extent.ok_or(SketchError::EmptyExtent)?;
        if !extent.has_area() {
            return Err(SketchError::EmptyExtent);
        }

        let (width, height) = buffer.dimensions();
        let Some(rect) = extent.pixel_rect_within(width, height) else {
            return Ok(NormalizedGrid::zeroed());
        };

        let cropped =
            image::imageops::crop_imm(buffer, rect.x, rect.y, rect.width, rect.height).to_image();
        Ok(self.normalize_cropped(&cropped))
    }

    /// Scale, center and extract an already-cropped sketch.
    pub fn normalize_cropped(&self, cropped: &PixelBuffer) -> NormalizedGrid {
        let (width, height) = cropped.dimensions();
        if width == 0 || height == 0 || cropped.pixels().all(|p| p.0[3] == 0) {
            return NormalizedGrid::zeroed();
        }

        let layout = GridLayout::for_crop(width, height);

        let scaled = {
            profile_scope!("normalize::scale");
            image::imageops::resize(
                cropped,
                layout.scaled_width,
                layout.scaled_height,
                FilterType::Nearest,
            )
        };

        let mut canvas = RgbaImage::new(GRID_SIZE, GRID_SIZE);
        image::imageops::replace(
            &mut canvas,
            &scaled,
            i64::from(layout.offset_x),
            i64::from(layout.offset_y),
        );

        let cells = canvas
            .pixels()
            .map(|p| f32::from(p.0[3]) / ALPHA_MAX)
            .collect();

        NormalizedGrid {
            cells,
            layout: Some(layout),
        }
    }
}
