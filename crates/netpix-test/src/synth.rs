//! Synthetic test images
//!
//! Regression tests build their inputs here instead of loading binary
//! fixtures.

use crate::error::TestResult;
use netpix_core::{BinaryMask, PixelLayout, Raster};

/// Uniform raster with every pixel set to gray `value`.
pub fn uniform(width: u32, height: u32, layout: PixelLayout, value: u8) -> TestResult<Raster> {
    Ok(Raster::from_fn(width, height, layout, |_, _| {
        (value, value, value, 255)
    })?)
}

/// Gray8 horizontal ramp from 0 at the left edge to 255 at the right edge.
pub fn gradient(width: u32, height: u32) -> TestResult<Raster> {
    let span = width.saturating_sub(1).max(1);
    Ok(Raster::from_fn(width, height, PixelLayout::Gray8, |x, _| {
        let v = (x * 255 / span) as u8;
        (v, v, v, 255)
    })?)
}

/// Gray8 image whose left half is `low` and right half is `high`.
pub fn bimodal(width: u32, height: u32, low: u8, high: u8) -> TestResult<Raster> {
    Ok(Raster::from_fn(width, height, PixelLayout::Gray8, |x, _| {
        let v = if x < width / 2 { low } else { high };
        (v, v, v, 255)
    })?)
}

/// Gray8 image of `background` with a single `dot` pixel at `(x, y)`.
pub fn dot(width: u32, height: u32, x: u32, y: u32, background: u8, dot: u8) -> TestResult<Raster> {
    Ok(Raster::from_fn(width, height, PixelLayout::Gray8, |px, py| {
        let v = if (px, py) == (x, y) { dot } else { background };
        (v, v, v, 255)
    })?)
}

/// Gray8 checkerboard of `cell`-sized squares, black in the top-left.
pub fn checkerboard(width: u32, height: u32, cell: u32) -> TestResult<Raster> {
    let cell = cell.max(1);
    Ok(Raster::from_fn(width, height, PixelLayout::Gray8, |x, y| {
        let v = if (x / cell + y / cell) % 2 == 0 { 0 } else { 255 };
        (v, v, v, 255)
    })?)
}

/// Build a mask from rows of text: `#` is foreground, anything else
/// is background. All rows must have the same length.
pub fn mask_from_rows(rows: &[&str]) -> TestResult<BinaryMask> {
    let height = rows.len() as u32;
    let width = rows.first().map_or(0, |r| r.len()) as u32;
    Ok(BinaryMask::from_fn(width, height, |x, y| {
        rows[y as usize].as_bytes().get(x as usize) == Some(&b'#')
    })?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gradient_endpoints() {
        let r = gradient(16, 2).unwrap();
        assert_eq!(r.get_gray(0, 1), Some(0));
        assert_eq!(r.get_gray(15, 1), Some(255));
    }

    #[test]
    fn test_mask_from_rows() {
        let mask = mask_from_rows(&["#..", ".##"]).unwrap();
        assert_eq!(mask.width(), 3);
        assert_eq!(mask.count_foreground(), 3);
        assert_eq!(mask.get(1, 1), Some(true));
    }
}
