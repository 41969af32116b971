//! netpix Filter - Image filtering operations
//!
//! This crate provides:
//!
//! - 3x3 smoothing: box blur over in-bounds neighbors and an approximate
//!   Gaussian with clamped borders ([`convolve`])
//! - 3x3 median filtering ([`rank`])
//! - Sobel edge magnitude ([`edge`])
//! - Histogram stretch and equalization ([`enhance`])
//! - Pointwise gray conversion, alpha replacement and RGB arithmetic
//!   ([`pointwise`])
//!
//! Every operation returns a new raster of the same size as its input.

pub mod convolve;
pub mod edge;
pub mod enhance;
mod error;
pub mod kernel;
pub mod pointwise;
pub mod rank;

pub use error::{FilterError, FilterResult};
pub use kernel::Kernel3;

pub use convolve::{box_blur, gaussian_blur};
pub use edge::sobel_edge;
pub use enhance::{
    RemapLut, apply_lut, equalize_histogram, equalize_lut, stretch_histogram, stretch_lut,
};
pub use pointwise::{
    GrayMethod, RgbOp, RgbOperation, apply_rgb_op, pixel_gray, set_alpha, to_gray,
};
pub use rank::median_filter;

use netpix_core::Raster;

/// 3x3 neighborhood filter selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpatialFilter {
    /// Box blur over in-bounds neighbors
    Average,
    /// Per-channel median
    Median,
    /// Sobel edge magnitude
    Sobel,
    /// Approximate Gaussian blur
    Gaussian,
}

/// Apply a 3x3 neighborhood filter.
pub fn apply_filter(raster: &Raster, filter: SpatialFilter) -> FilterResult<Raster> {
    match filter {
        SpatialFilter::Average => box_blur(raster),
        SpatialFilter::Median => median_filter(raster),
        SpatialFilter::Sobel => sobel_edge(raster),
        SpatialFilter::Gaussian => gaussian_blur(raster),
    }
}
