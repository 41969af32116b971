//! Global thresholds
//!
//! Each strategy reduces the image to one threshold `t` and marks every
//! pixel with luminance `<= t` as foreground.
//!
//! - [`threshold_manual`]: caller-supplied `t`
//! - [`threshold_percentile`]: `t` is the luminance at a given percentile
//! - [`threshold_iterative`]: isodata, `t` converges to the midpoint of
//!   the two class means
//! - [`threshold_otsu`]: `t` maximizes between-class variance

use crate::{ColorError, ColorResult, mask_below_or_equal};
use netpix_core::{BinaryMask, Histogram, Raster};
use tracing::debug;

/// Options for [`threshold_manual`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManualOptions {
    /// Threshold in 0..=255
    pub threshold: i32,
}

impl Default for ManualOptions {
    fn default() -> Self {
        Self { threshold: 127 }
    }
}

impl ManualOptions {
    /// Check that the threshold is in 0..=255.
    pub fn validate(&self) -> ColorResult<()> {
        if !(0..=255).contains(&self.threshold) {
            return Err(ColorError::InvalidParameters(format!(
                "threshold must be between 0 and 255, got {}",
                self.threshold
            )));
        }
        Ok(())
    }
}

/// Options for [`threshold_percentile`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PercentileOptions {
    /// Percentile in 0..=100
    pub percent: f64,
}

impl Default for PercentileOptions {
    fn default() -> Self {
        Self { percent: 50.0 }
    }
}

impl PercentileOptions {
    /// Check that the percentile is in 0..=100.
    pub fn validate(&self) -> ColorResult<()> {
        if !(0.0..=100.0).contains(&self.percent) {
            return Err(ColorError::InvalidParameters(format!(
                "percent must be between 0 and 100, got {}",
                self.percent
            )));
        }
        Ok(())
    }
}

/// Options for [`threshold_iterative`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IterativeOptions {
    /// Maximum refinement rounds in 0..=100
    pub max_iterations: u32,
}

impl Default for IterativeOptions {
    fn default() -> Self {
        Self { max_iterations: 10 }
    }
}

impl IterativeOptions {
    /// Largest accepted iteration count.
    pub const MAX_ITERATIONS: u32 = 100;

    /// Check that the iteration count is in 0..=100.
    pub fn validate(&self) -> ColorResult<()> {
        if self.max_iterations > Self::MAX_ITERATIONS {
            return Err(ColorError::InvalidParameters(format!(
                "max iterations must be between 0 and {}, got {}",
                Self::MAX_ITERATIONS,
                self.max_iterations
            )));
        }
        Ok(())
    }
}

/// Binarize with a fixed threshold.
///
/// A pixel is foreground when its luminance is `<= threshold`, so a
/// luminance exactly equal to the threshold is always foreground.
///
/// # Errors
///
/// Returns [`ColorError::InvalidParameters`] if the threshold is outside
/// 0..=255.
pub fn threshold_manual(raster: &Raster, options: &ManualOptions) -> ColorResult<BinaryMask> {
    options.validate()?;
    mask_below_or_equal(raster, options.threshold as u8)
}

/// Compute the luminance at a percentile.
///
/// Equivalent to sorting all luminances ascending and taking
/// `sorted[floor(percent / 100 * pixel_count)]`; an index equal to the
/// pixel count (100%) is clamped to the last element.
pub fn compute_percentile_threshold(raster: &Raster, options: &PercentileOptions) -> ColorResult<u8> {
    options.validate()?;
    let hist = Histogram::from_raster(raster);
    let count = hist.total();
    let index = ((options.percent / 100.0 * count as f64).floor() as u64).min(count - 1);

    // sorted[index] is the first value whose cumulative count exceeds index
    let cdf = hist.cdf();
    let threshold = cdf.iter().position(|&c| c > index).unwrap_or(255) as u8;
    debug!(percent = options.percent, index, threshold, "percentile threshold");
    Ok(threshold)
}

/// Binarize at a luminance percentile ("percent black").
pub fn threshold_percentile(
    raster: &Raster,
    options: &PercentileOptions,
) -> ColorResult<BinaryMask> {
    let t = compute_percentile_threshold(raster, options)?;
    mask_below_or_equal(raster, t)
}

/// Compute the iterative mean (isodata) threshold.
///
/// Starts from the truncated mean luminance. Each round splits the pixels
/// into `<= t` and `> t` and sets `t` to the truncated average of the two
/// truncated class means. Stops after `max_iterations` rounds, when `t`
/// no longer changes, or when one class is empty.
pub fn compute_iterative_threshold(
    raster: &Raster,
    options: &IterativeOptions,
) -> ColorResult<u8> {
    options.validate()?;
    let hist = Histogram::from_raster(raster);
    let counts = hist.counts();
    let total = hist.total();
    let sum_all = hist.weighted_sum();

    let mut threshold = (sum_all / total) as u8;
    let mut rounds = 0;
    for _ in 0..options.max_iterations {
        rounds += 1;
        let (mut count_low, mut sum_low) = (0u64, 0u64);
        for (v, &c) in counts.iter().enumerate().take(threshold as usize + 1) {
            count_low += c as u64;
            sum_low += v as u64 * c as u64;
        }
        let count_high = total - count_low;
        if count_low == 0 || count_high == 0 {
            break;
        }
        let mean_low = sum_low / count_low;
        let mean_high = (sum_all - sum_low) / count_high;
        let next = ((mean_low + mean_high) / 2) as u8;
        if next == threshold {
            break;
        }
        threshold = next;
    }
    debug!(threshold, rounds, "iterative threshold");
    Ok(threshold)
}

/// Binarize with the iterative mean (isodata) threshold.
pub fn threshold_iterative(raster: &Raster, options: &IterativeOptions) -> ColorResult<BinaryMask> {
    let t = compute_iterative_threshold(raster, options)?;
    mask_below_or_equal(raster, t)
}

/// Compute Otsu's threshold for a raster.
///
/// See [`Histogram::otsu_threshold`] for tie and degenerate handling.
pub fn compute_otsu_threshold(raster: &Raster) -> u8 {
    let t = Histogram::from_raster(raster).otsu_threshold();
    debug!(threshold = t, "otsu threshold");
    t
}

/// Binarize with Otsu's threshold.
pub fn threshold_otsu(raster: &Raster) -> ColorResult<BinaryMask> {
    let t = compute_otsu_threshold(raster);
    mask_below_or_equal(raster, t)
}
