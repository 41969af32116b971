//! Otsu segmentation with green coverage and region highlighting
//!
//! [`segment`] builds the Otsu foreground mask of a raster
//! (`luminance <= threshold`), keeps its largest 4-connected component and
//! reports the share of "green" pixels. Green classification is a summary
//! statistic only and never affects the mask.

use crate::conncomp::{Point, find_connected_components, select_largest};
use crate::{RegionError, RegionResult};
use netpix_core::{BinaryMask, Histogram, PixelLayout, Raster};
use tracing::debug;

/// Default highlight color: opaque red.
pub const HIGHLIGHT_RED: (u8, u8, u8, u8) = (255, 0, 0, 255);

/// Whether a pixel is green: `g >= r + threshold` and `g >= b + threshold`.
#[inline]
pub fn is_green(r: u8, g: u8, b: u8, threshold: u8) -> bool {
    let g = g as u16;
    g >= r as u16 + threshold as u16 && g >= b as u16 + threshold as u16
}

/// Percentage (0 to 100) of pixels classified green.
pub fn green_percentage(raster: &Raster, threshold: u8) -> f64 {
    let total = raster.pixel_count();
    if total == 0 {
        return 0.0;
    }
    let layout = raster.layout();
    let green = match layout {
        PixelLayout::Gray8 => {
            // r == g == b, so only a zero threshold can classify green
            if threshold == 0 { total } else { 0 }
        }
        _ => raster
            .data()
            .chunks_exact(layout.channels())
            .filter(|px| is_green(px[0], px[1], px[2], threshold))
            .count(),
    };
    green as f64 / total as f64 * 100.0
}

/// Segmentation parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentOptions {
    /// Margin by which green must exceed red and blue (0 to 255)
    pub green_threshold: i32,
}

impl Default for SegmentOptions {
    fn default() -> Self {
        Self { green_threshold: 20 }
    }
}

impl SegmentOptions {
    /// Validate the parameters
    pub fn validate(&self) -> RegionResult<()> {
        if !(0..=255).contains(&self.green_threshold) {
            return Err(RegionError::InvalidParameters(format!(
                "green threshold must be 0 to 255, got {}",
                self.green_threshold
            )));
        }
        Ok(())
    }
}

/// Output of [`segment`]
#[derive(Debug, Clone)]
pub struct Segmentation {
    /// Otsu threshold on luminance
    pub threshold: u8,
    /// Foreground mask, `luminance <= threshold`
    pub mask: BinaryMask,
    /// Number of 4-connected foreground components
    pub component_count: usize,
    /// Points of the largest component, empty if the mask has none
    pub largest: Vec<Point>,
    /// Percentage of green pixels
    pub green_percent: f64,
}

/// Segment a raster into its largest dark component.
pub fn segment(raster: &Raster, options: &SegmentOptions) -> RegionResult<Segmentation> {
    options.validate()?;
    let green_threshold = options.green_threshold as u8;

    let lum = raster.luminance_values();
    let threshold = Histogram::from_values(&lum).otsu_threshold();
    let width = raster.width();
    let mask = BinaryMask::from_fn(width, raster.height(), |x, y| {
        lum[y as usize * width as usize + x as usize] <= threshold
    })?;

    let components = find_connected_components(&mask);
    let largest = select_largest(&components)
        .map(|c| c.points.clone())
        .unwrap_or_default();
    let green_percent = green_percentage(raster, green_threshold);

    debug!(
        threshold,
        components = components.len(),
        largest = largest.len(),
        green_percent,
        "segment"
    );

    Ok(Segmentation {
        threshold,
        mask,
        component_count: components.len(),
        largest,
        green_percent,
    })
}

/// Paint `points` in `color` on an Rgba8 copy of the raster.
///
/// # Errors
///
/// Returns [`RegionError::PointOutOfBounds`] for a point outside the
/// raster; nothing is returned in that case.
pub fn highlight(
    raster: &Raster,
    points: &[Point],
    color: (u8, u8, u8, u8),
) -> RegionResult<Raster> {
    let (w, h) = (raster.width(), raster.height());
    if let Some(p) = points.iter().find(|p| !raster.contains(p.x, p.y)) {
        return Err(RegionError::PointOutOfBounds {
            x: p.x,
            y: p.y,
            width: w,
            height: h,
        });
    }

    let copy = raster.convert_layout(PixelLayout::Rgba8);
    let mut out = copy.to_mut();
    let (r, g, b, a) = color;
    for p in points {
        out.set_rgba_unchecked(p.x, p.y, r, g, b, a);
    }
    Ok(out.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_green() {
        assert!(is_green(10, 50, 20, 30));
        assert!(!is_green(10, 50, 21, 30));
        assert!(is_green(0, 0, 0, 0));
        // No overflow near the top of the range
        assert!(!is_green(250, 255, 0, 10));
    }

    #[test]
    fn test_green_percentage() {
        let r = Raster::from_fn(4, 1, PixelLayout::Rgb8, |x, _| {
            if x == 0 { (0, 200, 0, 255) } else { (100, 100, 100, 255) }
        })
        .unwrap();
        assert_eq!(green_percentage(&r, 20), 25.0);
        assert_eq!(green_percentage(&r, 0), 100.0);
    }

    #[test]
    fn test_options_validate() {
        assert!(SegmentOptions::default().validate().is_ok());
        assert!(SegmentOptions { green_threshold: 256 }.validate().is_err());
        assert!(SegmentOptions { green_threshold: -1 }.validate().is_err());
    }

    #[test]
    fn test_highlight_copy() {
        let src = Raster::from_fn(3, 1, PixelLayout::Gray8, |_, _| (50, 50, 50, 255)).unwrap();
        let out = highlight(&src, &[Point::new(1, 0)], HIGHLIGHT_RED).unwrap();
        assert_eq!(out.layout(), PixelLayout::Rgba8);
        assert_eq!(out.get_rgba(1, 0), Some((255, 0, 0, 255)));
        assert_eq!(out.get_rgba(0, 0), Some((50, 50, 50, 255)));
        // Source untouched
        assert_eq!(src.get_gray(1, 0), Some(50));
        assert!(highlight(&src, &[Point::new(3, 0)], HIGHLIGHT_RED).is_err());
    }
}
