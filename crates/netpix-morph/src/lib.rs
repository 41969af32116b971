//! netpix Morph - Grayscale morphology
//!
//! This crate provides:
//!
//! - Structuring elements ([`StructuringElement`]), the 3x3 cross by default
//! - Dilation, erosion, opening, closing and hit-or-miss on the gray
//!   projection of a raster ([`grayscale`])
//!
//! Opening and closing chain their two stages: the second stage reads the
//! output of the first.

mod error;
pub mod grayscale;
pub mod sel;

pub use error::{MorphError, MorphResult};
pub use sel::StructuringElement;

pub use grayscale::{close_gray, dilate_gray, erode_gray, hit_miss_gray, open_gray};

use netpix_core::Raster;
use tracing::debug;

/// Morphological operation selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MorphOp {
    /// Dilation
    Dilate,
    /// Erosion
    Erode,
    /// Erosion then dilation
    Open,
    /// Dilation then erosion
    Close,
    /// Hit-or-miss transform
    HitMiss,
}

/// Apply a morphological operation with a structuring element.
pub fn morph(raster: &Raster, op: MorphOp, sel: &StructuringElement) -> MorphResult<Raster> {
    debug!(?op, hits = sel.hit_count(), "morph");
    match op {
        MorphOp::Dilate => dilate_gray(raster, sel),
        MorphOp::Erode => erode_gray(raster, sel),
        MorphOp::Open => open_gray(raster, sel),
        MorphOp::Close => close_gray(raster, sel),
        MorphOp::HitMiss => hit_miss_gray(raster, sel),
    }
}
