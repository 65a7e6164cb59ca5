//! Unit tests for the normalizer.

use crate::helpers::{BLACK, buffer_with_block};
use digitpad::constants::{CONTENT_SIZE, GRID_CELLS, GRID_SIZE};
use digitpad::error::SketchError;
use digitpad::extent::Extent;
use digitpad::geometry::PixelRect;
use digitpad::normalize::{GridLayout, NormalizedGrid, Normalizer, center_offset, scaled_dimensions};
use image::{Rgba, RgbaImage};

#[test]
fn test_missing_extent_is_empty_extent() {
    let buffer = RgbaImage::new(50, 50);
    let result = Normalizer::new().normalize(&buffer, None);
    assert!(matches!(result, Err(SketchError::EmptyExtent)));
}

#[test]
fn test_zero_area_extent_is_empty_extent() {
    let buffer = RgbaImage::new(50, 50);
    let flat = Extent::new(10.0, 10.0, 30.0, 10.0);
    let result = Normalizer::new().normalize(&buffer, Some(&flat));
    assert!(matches!(result, Err(SketchError::EmptyExtent)));
}

#[test]
fn test_transparent_crop_yields_zero_grid() {
    let buffer = RgbaImage::new(50, 50);
    let extent = Extent::new(5.0, 5.0, 25.0, 25.0);
    let grid = Normalizer::new().normalize(&buffer, Some(&extent)).unwrap();

    assert_eq!(grid.as_slice().len(), GRID_CELLS);
    assert!(grid.is_blank());
    assert_eq!(grid.layout(), None);
}

#[test]
fn test_extent_off_buffer_yields_zero_grid() {
    let buffer = buffer_with_block(50, 50, PixelRect::new(0, 0, 50, 50), BLACK);
    let extent = Extent::new(80.0, 80.0, 120.0, 120.0);
    let grid = Normalizer::new().normalize(&buffer, Some(&extent)).unwrap();
    assert!(grid.is_blank());
}

#[test]
fn test_square_sketch_fills_center_twenty() {
    let buffer = buffer_with_block(100, 100, PixelRect::new(30, 30, 10, 10), BLACK);
    let extent = Extent::new(30.0, 30.0, 40.0, 40.0);
    let grid = Normalizer::new().normalize(&buffer, Some(&extent)).unwrap();

    let layout = grid.layout().unwrap();
    assert_eq!(
        layout,
        GridLayout {
            scaled_width: 20,
            scaled_height: 20,
            offset_x: 4,
            offset_y: 4,
        }
    );

    for y in 0..GRID_SIZE {
        for x in 0..GRID_SIZE {
            let inside = (4..24).contains(&x) && (4..24).contains(&y);
            let expected = if inside { 1.0 } else { 0.0 };
            assert_eq!(grid.get(x, y), Some(expected), "cell ({}, {})", x, y);
        }
    }
}

#[test]
fn test_tall_sketch_preserves_aspect_ratio() {
    let buffer = buffer_with_block(100, 100, PixelRect::new(10, 10, 10, 20), BLACK);
    let extent = Extent::new(10.0, 10.0, 20.0, 30.0);
    let grid = Normalizer::new().normalize(&buffer, Some(&extent)).unwrap();

    let layout = grid.layout().unwrap();
    assert_eq!((layout.scaled_width, layout.scaled_height), (10, 20));
    assert_eq!((layout.offset_x, layout.offset_y), (9, 4));
    assert_eq!(grid.get(9, 4), Some(1.0));
    assert_eq!(grid.get(18, 23), Some(1.0));
    assert_eq!(grid.get(8, 10), Some(0.0));
    assert_eq!(grid.get(19, 10), Some(0.0));
}

#[test]
fn test_wide_sketch_rounds_offset_half_up() {
    let buffer = buffer_with_block(100, 100, PixelRect::new(10, 20, 30, 10), BLACK);
    let extent = Extent::new(10.0, 20.0, 40.0, 30.0);
    let grid = Normalizer::new().normalize(&buffer, Some(&extent)).unwrap();

    let layout = grid.layout().unwrap();
    assert_eq!((layout.scaled_width, layout.scaled_height), (20, 7));
    // (28 - 7) / 2 = 10.5 rounds up to 11
    assert_eq!((layout.offset_x, layout.offset_y), (4, 11));
    assert_eq!(layout.offset_y + layout.scaled_height + layout.bottom_margin(), GRID_SIZE);
}

#[test]
fn test_crop_is_clipped_to_buffer() {
    // Extent hangs off the top-left corner; only the in-buffer part is used.
    let buffer = buffer_with_block(60, 60, PixelRect::new(0, 0, 10, 10), BLACK);
    let extent = Extent::new(-10.0, -10.0, 10.0, 10.0);
    let grid = Normalizer::new().normalize(&buffer, Some(&extent)).unwrap();

    let layout = grid.layout().unwrap();
    assert_eq!((layout.scaled_width, layout.scaled_height), (20, 20));
    assert!(grid.as_slice().iter().filter(|&&v| v == 1.0).count() == 400);
}

#[test]
fn test_partial_alpha_maps_to_fraction() {
    let buffer = buffer_with_block(40, 40, PixelRect::new(0, 0, 40, 40), [0, 0, 0, 51]);
    let extent = Extent::new(0.0, 0.0, 40.0, 40.0);
    let grid = Normalizer::new().normalize(&buffer, Some(&extent)).unwrap();

    assert_eq!(grid.get(14, 14), Some(51.0 / 255.0));
    assert_eq!(grid.get(0, 0), Some(0.0));
}

#[test]
fn test_color_channels_are_ignored() {
    let rect = PixelRect::new(5, 5, 12, 30);
    let extent = Extent::new(5.0, 5.0, 17.0, 35.0);
    let black = buffer_with_block(50, 50, rect, BLACK);
    let red = buffer_with_block(50, 50, rect, [255, 0, 0, 255]);

    let normalizer = Normalizer::new();
    assert_eq!(
        normalizer.normalize(&black, Some(&extent)).unwrap(),
        normalizer.normalize(&red, Some(&extent)).unwrap()
    );
}

#[test]
fn test_values_stay_in_unit_range() {
    let buffer = RgbaImage::from_fn(64, 48, |x, y| Rgba([x as u8, y as u8, 0, ((x * 7 + y * 13) % 256) as u8]));
    let extent = Extent::new(3.0, 2.0, 61.0, 47.0);
    let grid = Normalizer::new().normalize(&buffer, Some(&extent)).unwrap();
    assert!(grid.as_slice().iter().all(|v| (0.0..=1.0).contains(v)));
}

#[test]
fn test_normalize_cropped_empty_buffer() {
    let grid = Normalizer::new().normalize_cropped(&RgbaImage::new(0, 0));
    assert!(grid.is_blank());
}

#[test]
fn test_scaled_dimensions_longer_side_is_content_size() {
    let sizes = [(1, 1), (7, 3), (3, 7), (20, 120), (333, 17), (40, 41), (280, 280), (1, 500)];
    for (w, h) in sizes {
        let (sw, sh) = scaled_dimensions(w, h);
        assert_eq!(sw.max(sh), CONTENT_SIZE, "{}x{}", w, h);
        assert!(sw.min(sh) >= 1 && sw.min(sh) <= CONTENT_SIZE);

        // Aspect ratio within one pixel
        let expected_short = CONTENT_SIZE as f32 * w.min(h) as f32 / w.max(h) as f32;
        assert!(((sw.min(sh) as f32) - expected_short).abs() <= 1.0, "{}x{}", w, h);
    }
}

#[test]
fn test_scaled_short_side_rounds_up() {
    assert_eq!(scaled_dimensions(20, 120), (4, 20));
    assert_eq!(scaled_dimensions(120, 20), (20, 4));
    assert_eq!(scaled_dimensions(30, 10), (20, 7));
    // Exact multiples stay exact.
    assert_eq!(scaled_dimensions(10, 20), (10, 20));
    assert_eq!(scaled_dimensions(20, 100), (4, 20));
    assert_eq!(scaled_dimensions(3, 1000), (1, 20));
}

#[test]
fn test_center_offset_is_symmetric() {
    for size in 1..=CONTENT_SIZE {
        let left = center_offset(size);
        let right = GRID_SIZE - left - size;
        assert!(left == right || left == right + 1, "size {}", size);
    }
    assert_eq!(center_offset(20), 4);
    assert_eq!(center_offset(13), 8);
}

#[test]
fn test_grid_from_values() {
    assert!(NormalizedGrid::from_values(vec![0.5; 10]).is_none());

    let grid = NormalizedGrid::from_values(vec![2.0; GRID_CELLS]).unwrap();
    assert!(grid.as_slice().iter().all(|&v| v == 1.0));
    assert_eq!(grid.rows().count(), GRID_SIZE as usize);
}

#[test]
fn test_grid_to_image_scales_to_bytes() {
    let mut values = vec![0.0; GRID_CELLS];
    values[0] = 1.0;
    values[GRID_CELLS - 1] = 0.5;
    let image = NormalizedGrid::from_values(values).unwrap().to_image();

    assert_eq!(image.dimensions(), (GRID_SIZE, GRID_SIZE));
    assert_eq!(image.get_pixel(0, 0).0[0], 255);
    assert_eq!(image.get_pixel(27, 27).0[0], 128);
    assert_eq!(image.get_pixel(1, 0).0[0], 0);
}
