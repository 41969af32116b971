//! Histogram remapping
//!
//! Both operations work on the weighted luminance and produce a Gray8
//! raster through a 256-entry lookup table.

use crate::FilterResult;
use netpix_core::{Histogram, PixelLayout, Raster};
use tracing::debug;

/// A 256-entry lookup table mapping input to output values.
pub type RemapLut = [u8; 256];

/// Build the linear stretch table mapping `[min, max]` onto `[0, 255]`.
///
/// Returns `None` when `max <= min`.
pub fn stretch_lut(min: u8, max: u8) -> Option<RemapLut> {
    if max <= min {
        return None;
    }
    let span = (max - min) as u32;
    let mut lut = [0u8; 256];
    for (i, entry) in lut.iter_mut().enumerate() {
        let v = (i as u32).clamp(min as u32, max as u32) - min as u32;
        *entry = (v * 255 / span) as u8;
    }
    Some(lut)
}

/// Build the equalization table for a histogram.
///
/// `lut[i] = round((cdf[i] - cdf_min) / (total - cdf_min) * 255)`, where
/// `cdf_min` is the first nonzero cumulative count. An image with a
/// single luminance value (`total == cdf_min`) gets the identity table.
pub fn equalize_lut(hist: &Histogram) -> RemapLut {
    let cdf = hist.cdf();
    let total = hist.total();
    let cdf_min = cdf.iter().copied().find(|&c| c > 0).unwrap_or(0);

    let mut lut = [0u8; 256];
    if total == cdf_min {
        for (i, entry) in lut.iter_mut().enumerate() {
            *entry = i as u8;
        }
        return lut;
    }

    let denom = (total - cdf_min) as f64;
    for (entry, &c) in lut.iter_mut().zip(cdf.iter()) {
        let num = c.saturating_sub(cdf_min) as f64;
        *entry = (num / denom * 255.0).round() as u8;
    }
    lut
}

/// Apply a lookup table to the luminance of a raster.
pub fn apply_lut(raster: &Raster, lut: &RemapLut) -> FilterResult<Raster> {
    let data = raster
        .luminance_values()
        .into_iter()
        .map(|v| lut[v as usize])
        .collect();
    Ok(Raster::from_data(
        raster.width(),
        raster.height(),
        PixelLayout::Gray8,
        data,
    )?)
}

/// Linearly stretch the luminance range to `[0, 255]`.
///
/// Computes `(lum - min) * 255 / (max - min)`, truncated. When every pixel
/// has the same luminance the input is returned unchanged (a shared
/// handle, in its original layout).
pub fn stretch_histogram(raster: &Raster) -> FilterResult<Raster> {
    let hist = Histogram::from_raster(raster);
    let (Some(min), Some(max)) = (hist.min_value(), hist.max_value()) else {
        return Ok(raster.clone());
    };
    let Some(lut) = stretch_lut(min, max) else {
        debug!(value = min, "stretch: flat luminance, returning input");
        return Ok(raster.clone());
    };
    debug!(min, max, "stretch: remapping luminance range");
    apply_lut(raster, &lut)
}

/// Equalize the luminance histogram.
pub fn equalize_histogram(raster: &Raster) -> FilterResult<Raster> {
    let hist = Histogram::from_raster(raster);
    let lut = equalize_lut(&hist);
    apply_lut(raster, &lut)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gray(values: &[u8]) -> Raster {
        Raster::from_data(values.len() as u32, 1, PixelLayout::Gray8, values.to_vec()).unwrap()
    }

    #[test]
    fn test_stretch_lut() {
        assert!(stretch_lut(5, 5).is_none());
        let lut = stretch_lut(50, 100).unwrap();
        assert_eq!(lut[50], 0);
        assert_eq!(lut[75], 127);
        assert_eq!(lut[100], 255);
    }

    #[test]
    fn test_stretch_full_range() {
        let out = stretch_histogram(&gray(&[50, 75, 100])).unwrap();
        assert_eq!(out.data(), &[0, 127, 255]);
    }

    #[test]
    fn test_stretch_flat_returns_input() {
        let src = Raster::from_fn(3, 2, PixelLayout::Rgb8, |_, _| (40, 40, 40, 255)).unwrap();
        let out = stretch_histogram(&src).unwrap();
        assert!(out.ptr_eq(&src));
    }

    #[test]
    fn test_equalize_two_levels() {
        // cdf: [.., 2 @ 10, .., 4 @ 200], cdf_min = 2, total = 4
        let out = equalize_histogram(&gray(&[10, 10, 200, 200])).unwrap();
        assert_eq!(out.data(), &[0, 0, 255, 255]);
    }

    #[test]
    fn test_equalize_rounding() {
        // cdf at 0,1,2 = 1,2,3 ; (cdf - 1) / 2 * 255 -> 0, 127.5 -> 128, 255
        let out = equalize_histogram(&gray(&[0, 1, 2])).unwrap();
        assert_eq!(out.data(), &[0, 128, 255]);
    }

    #[test]
    fn test_equalize_uniform_identity() {
        let lut = equalize_lut(&Histogram::from_values(&[77; 9]));
        assert_eq!(lut[77], 77);
        assert_eq!(lut[0], 0);
        let out = equalize_histogram(&gray(&[77, 77])).unwrap();
        assert_eq!(out.data(), &[77, 77]);
    }
}
