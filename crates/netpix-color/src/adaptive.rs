//! Adaptive (local) thresholds
//!
//! Both strategies derive a threshold per pixel from a square window
//! centred on it. Windows are clipped to the image, so border pixels use
//! fewer samples rather than padded ones.
//!
//! - [`threshold_niblack`]: `mean + k * stddev` of the window, computed in
//!   O(1) per pixel from summed area tables
//! - [`threshold_bernsen`]: midpoint of the window's min and max, only
//!   where the local contrast is high enough

use crate::{ColorError, ColorResult};
use netpix_core::{BinaryMask, Raster};
use tracing::debug;

fn check_window(window_size: u32) -> ColorResult<()> {
    if window_size < 3 || window_size % 2 == 0 {
        return Err(ColorError::InvalidParameters(format!(
            "window size must be odd and >= 3, got {}",
            window_size
        )));
    }
    Ok(())
}

/// Options for [`threshold_niblack`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NiblackOptions {
    /// Side of the square window (odd, >= 3)
    pub window_size: u32,
    /// Weight of the standard deviation
    pub k: f64,
}

impl Default for NiblackOptions {
    fn default() -> Self {
        Self {
            window_size: 15,
            k: -0.2,
        }
    }
}

impl NiblackOptions {
    /// Check that the window is odd and at least 3, and `k` is finite.
    pub fn validate(&self) -> ColorResult<()> {
        check_window(self.window_size)?;
        if !self.k.is_finite() {
            return Err(ColorError::InvalidParameters(format!(
                "k must be finite, got {}",
                self.k
            )));
        }
        Ok(())
    }
}

/// Options for [`threshold_bernsen`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BernsenOptions {
    /// Side of the square window (odd, >= 3)
    pub window_size: u32,
    /// Minimum `max - min` for a window to be thresholded, 0..=255
    pub contrast_threshold: i32,
}

impl Default for BernsenOptions {
    fn default() -> Self {
        Self {
            window_size: 15,
            contrast_threshold: 15,
        }
    }
}

impl BernsenOptions {
    /// Check the window and that the contrast threshold is in 0..=255.
    pub fn validate(&self) -> ColorResult<()> {
        check_window(self.window_size)?;
        if !(0..=255).contains(&self.contrast_threshold) {
            return Err(ColorError::InvalidParameters(format!(
                "contrast threshold must be between 0 and 255, got {}",
                self.contrast_threshold
            )));
        }
        Ok(())
    }
}

/// Summed area tables of values and squared values.
///
/// Both tables are `(w + 1) x (h + 1)` with a zero first row and column.
struct IntegralImages {
    sum: Vec<f64>,
    sum_sq: Vec<f64>,
    stride: usize,
}

impl IntegralImages {
    fn new(values: &[u8], width: usize, height: usize) -> Self {
        let stride = width + 1;
        let mut sum = vec![0.0f64; stride * (height + 1)];
        let mut sum_sq = vec![0.0f64; stride * (height + 1)];
        for y in 0..height {
            let mut row = 0.0;
            let mut row_sq = 0.0;
            for x in 0..width {
                let v = values[y * width + x] as f64;
                row += v;
                row_sq += v * v;
                let i = (y + 1) * stride + (x + 1);
                sum[i] = sum[i - stride] + row;
                sum_sq[i] = sum_sq[i - stride] + row_sq;
            }
        }
        IntegralImages {
            sum,
            sum_sq,
            stride,
        }
    }

    /// Sum and squared sum over the inclusive rectangle `[x0, x1] x [y0, y1]`.
    #[inline]
    fn rect(&self, x0: usize, y0: usize, x1: usize, y1: usize) -> (f64, f64) {
        let s = self.stride;
        let (a, b, c, d) = (y0 * s + x0, y0 * s + x1 + 1, (y1 + 1) * s + x0, (y1 + 1) * s + x1 + 1);
        (
            self.sum[d] - self.sum[b] - self.sum[c] + self.sum[a],
            self.sum_sq[d] - self.sum_sq[b] - self.sum_sq[c] + self.sum_sq[a],
        )
    }
}

/// Niblack local threshold.
///
/// For each pixel the window mean `m` and standard deviation `s` give the
/// local threshold `m + k * s`; the pixel is foreground when its luminance
/// is `<=` that value.
///
/// # Errors
///
/// Returns [`ColorError::InvalidParameters`] for an even or too small
/// window, or a non-finite `k`.
pub fn threshold_niblack(raster: &Raster, options: &NiblackOptions) -> ColorResult<BinaryMask> {
    options.validate()?;
    let width = raster.width() as usize;
    let height = raster.height() as usize;
    let half = (options.window_size / 2) as usize;
    let lum = raster.luminance_values();
    let integral = IntegralImages::new(&lum, width, height);

    let mask = BinaryMask::from_fn(raster.width(), raster.height(), |x, y| {
        let (x, y) = (x as usize, y as usize);
        let x0 = x.saturating_sub(half);
        let y0 = y.saturating_sub(half);
        let x1 = (x + half).min(width - 1);
        let y1 = (y + half).min(height - 1);
        let n = ((x1 - x0 + 1) * (y1 - y0 + 1)) as f64;

        let (sum, sum_sq) = integral.rect(x0, y0, x1, y1);
        let mean = sum / n;
        let variance = (sum_sq / n - mean * mean).max(0.0);
        let local = mean + options.k * variance.sqrt();
        lum[y * width + x] as f64 <= local
    })?;
    debug!(
        window = options.window_size,
        k = options.k,
        foreground = mask.count_foreground(),
        "niblack threshold"
    );
    Ok(mask)
}

/// Running min and max over a clipped 1-D window of radius `half`.
fn window_min_max(src: &[(u8, u8)], half: usize, out: &mut Vec<(u8, u8)>) {
    out.clear();
    let n = src.len();
    for i in 0..n {
        let lo = i.saturating_sub(half);
        let hi = (i + half).min(n - 1);
        let (mut mn, mut mx) = (u8::MAX, u8::MIN);
        for &(a, b) in &src[lo..=hi] {
            mn = mn.min(a);
            mx = mx.max(b);
        }
        out.push((mn, mx));
    }
}

/// Bernsen local contrast threshold.
///
/// For each pixel the window's min and max luminance are found. If
/// `max - min >= contrast_threshold` the pixel is foreground when its
/// luminance is `<= (min + max) / 2`. Otherwise the window is treated as
/// flat and the pixel is background.
///
/// # Errors
///
/// Returns [`ColorError::InvalidParameters`] for an even or too small
/// window, or a contrast threshold outside 0..=255.
pub fn threshold_bernsen(raster: &Raster, options: &BernsenOptions) -> ColorResult<BinaryMask> {
    options.validate()?;
    let width = raster.width() as usize;
    let height = raster.height() as usize;
    let half = (options.window_size / 2) as usize;
    let lum = raster.luminance_values();

    // The min/max over a rectangle separates into a row pass and a column pass.
    let mut rows = Vec::with_capacity(width * height);
    let mut scratch = Vec::with_capacity(width.max(height));
    for y in 0..height {
        let line: Vec<(u8, u8)> = lum[y * width..(y + 1) * width]
            .iter()
            .map(|&v| (v, v))
            .collect();
        window_min_max(&line, half, &mut scratch);
        rows.extend_from_slice(&scratch);
    }
    let mut extremes = vec![(0u8, 0u8); width * height];
    let mut column = Vec::with_capacity(height);
    for x in 0..width {
        column.clear();
        column.extend((0..height).map(|y| rows[y * width + x]));
        window_min_max(&column, half, &mut scratch);
        for (y, &mm) in scratch.iter().enumerate() {
            extremes[y * width + x] = mm;
        }
    }

    let contrast_threshold = options.contrast_threshold as u16;
    let mask = BinaryMask::from_fn(raster.width(), raster.height(), |x, y| {
        let i = y as usize * width + x as usize;
        let (mn, mx) = extremes[i];
        if (mx - mn) as u16 >= contrast_threshold {
            let mid = ((mn as u16 + mx as u16) / 2) as u8;
            lum[i] <= mid
        } else {
            false
        }
    })?;
    debug!(
        window = options.window_size,
        contrast = options.contrast_threshold,
        foreground = mask.count_foreground(),
        "bernsen threshold"
    );
    Ok(mask)
}

#[cfg(test)]
mod tests {
    use super::*;
    use netpix_core::PixelLayout;

    fn gray_fn(w: u32, h: u32, f: impl Fn(u32, u32) -> u8) -> Raster {
        Raster::from_fn(w, h, PixelLayout::Gray8, |x, y| {
            let v = f(x, y);
            (v, v, v, 255)
        })
        .unwrap()
    }

    #[test]
    fn test_window_validation() {
        let r = gray_fn(4, 4, |_, _| 0);
        for window_size in [0, 1, 2, 4, 16] {
            let o = NiblackOptions {
                window_size,
                ..Default::default()
            };
            assert!(threshold_niblack(&r, &o).is_err());
            let o = BernsenOptions {
                window_size,
                ..Default::default()
            };
            assert!(threshold_bernsen(&r, &o).is_err());
        }
        let o = BernsenOptions {
            contrast_threshold: 300,
            ..Default::default()
        };
        assert!(threshold_bernsen(&r, &o).is_err());
        let o = NiblackOptions {
            k: f64::INFINITY,
            ..Default::default()
        };
        assert!(threshold_niblack(&r, &o).is_err());
    }

    #[test]
    fn test_integral_rect_matches_brute_force() {
        let values: Vec<u8> = (0..30).map(|i| (i * 7 % 256) as u8).collect();
        let ii = IntegralImages::new(&values, 6, 5);
        let (sum, sum_sq) = ii.rect(1, 2, 4, 3);
        let mut bs = 0.0;
        let mut bsq = 0.0;
        for y in 2..=3 {
            for x in 1..=4 {
                let v = values[y * 6 + x] as f64;
                bs += v;
                bsq += v * v;
            }
        }
        assert_eq!(sum, bs);
        assert_eq!(sum_sq, bsq);
    }

    #[test]
    fn test_niblack_dark_text_on_light() {
        // Dark vertical stroke on a light background
        let r = gray_fn(9, 9, |x, _| if x == 4 { 20 } else { 230 });
        let o = NiblackOptions {
            window_size: 3,
            k: 0.0,
        };
        let mask = threshold_niblack(&r, &o).unwrap();
        assert_eq!(mask.get(4, 4), Some(true));
        assert_eq!(mask.get(3, 4), Some(false));
        assert_eq!(mask.get(5, 4), Some(false));
    }

    #[test]
    fn test_bernsen_low_contrast_is_background() {
        let r = gray_fn(5, 5, |x, y| 100 + ((x + y) % 3) as u8);
        let mask = threshold_bernsen(&r, &BernsenOptions::default()).unwrap();
        assert_eq!(mask.count_foreground(), 0);
    }

    #[test]
    fn test_bernsen_edges() {
        let r = gray_fn(8, 3, |x, _| if x < 4 { 10 } else { 240 });
        let o = BernsenOptions {
            window_size: 3,
            contrast_threshold: 50,
        };
        let mask = threshold_bernsen(&r, &o).unwrap();
        // Next to the edge the window sees both sides
        assert_eq!(mask.get(3, 1), Some(true));
        assert_eq!(mask.get(4, 1), Some(false));
        // Far from the edge the window is flat
        assert_eq!(mask.get(0, 1), Some(false));
        assert_eq!(mask.get(7, 1), Some(false));
    }
}
