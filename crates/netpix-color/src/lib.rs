//! netpix Color - Binarization for image analysis
//!
//! This crate turns a raster into a [`BinaryMask`](netpix_core::BinaryMask)
//! using one of six strategies, all working on per-pixel luminance:
//!
//! - **Global** ([`threshold`]): manual, percentile, iterative mean
//!   (isodata) and Otsu
//! - **Adaptive** ([`adaptive`]): Niblack and Bernsen local thresholds
//!
//! Every strategy uses the same polarity: a pixel is foreground (`true`)
//! when its luminance is less than or equal to the threshold that applies
//! to it. Rendered with [`BinaryMask::to_raster`](netpix_core::BinaryMask::to_raster),
//! foreground is black on white.
//!
//! Parameters are validated before any pixel is read.

pub mod adaptive;
pub mod error;
pub mod threshold;

pub use error::{ColorError, ColorResult};

pub use adaptive::{BernsenOptions, NiblackOptions, threshold_bernsen, threshold_niblack};
pub use threshold::{
    IterativeOptions, ManualOptions, PercentileOptions, compute_iterative_threshold,
    compute_otsu_threshold, compute_percentile_threshold, threshold_iterative, threshold_manual,
    threshold_otsu, threshold_percentile,
};

use netpix_core::{BinaryMask, Raster};

/// Binarization strategy with its parameters
#[derive(Debug, Clone, PartialEq)]
pub enum BinarizeMethod {
    /// Fixed global threshold
    Manual(ManualOptions),
    /// Threshold at a luminance percentile
    Percentile(PercentileOptions),
    /// Iterative mean (isodata)
    Iterative(IterativeOptions),
    /// Otsu's method
    Otsu,
    /// Niblack local threshold
    Niblack(NiblackOptions),
    /// Bernsen local contrast threshold
    Bernsen(BernsenOptions),
}

impl BinarizeMethod {
    /// Check the parameters without touching any pixels.
    pub fn validate(&self) -> ColorResult<()> {
        match self {
            BinarizeMethod::Manual(o) => o.validate(),
            BinarizeMethod::Percentile(o) => o.validate(),
            BinarizeMethod::Iterative(o) => o.validate(),
            BinarizeMethod::Otsu => Ok(()),
            BinarizeMethod::Niblack(o) => o.validate(),
            BinarizeMethod::Bernsen(o) => o.validate(),
        }
    }
}

/// Binarize a raster with the given strategy.
pub fn binarize(raster: &Raster, method: &BinarizeMethod) -> ColorResult<BinaryMask> {
    match method {
        BinarizeMethod::Manual(o) => threshold_manual(raster, o),
        BinarizeMethod::Percentile(o) => threshold_percentile(raster, o),
        BinarizeMethod::Iterative(o) => threshold_iterative(raster, o),
        BinarizeMethod::Otsu => threshold_otsu(raster),
        BinarizeMethod::Niblack(o) => threshold_niblack(raster, o),
        BinarizeMethod::Bernsen(o) => threshold_bernsen(raster, o),
    }
}

/// Foreground mask for a single global threshold.
pub(crate) fn mask_below_or_equal(raster: &Raster, threshold: u8) -> ColorResult<BinaryMask> {
    let lum = raster.luminance_values();
    let width = raster.width();
    Ok(BinaryMask::from_fn(width, raster.height(), |x, y| {
        lum[y as usize * width as usize + x as usize] <= threshold
    })?)
}
