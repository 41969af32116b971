//! Pointwise transforms
//!
//! Per-pixel operations that do not look at neighbors: gray conversion,
//! constant alpha replacement and per-channel RGB arithmetic.

use crate::{FilterError, FilterResult};
use netpix_core::{PixelLayout, Raster, color};

/// Gray conversion formula
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GrayMethod {
    /// `r/3 + g/3 + b/3`, each term truncated
    Average,
    /// Weighted luminance `0.299R + 0.587G + 0.114B`
    #[default]
    Weights,
}

/// Arithmetic applied by [`RgbOp`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RgbOperation {
    /// Saturating addition
    #[default]
    Add,
    /// Saturating subtraction
    Subtract,
    /// Saturating multiplication
    Multiply,
    /// Truncating division
    Divide,
}

/// Per-channel RGB arithmetic with one operand per channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RgbOp {
    /// Operation to apply
    pub op: RgbOperation,
    /// Red operand
    pub r: u8,
    /// Green operand
    pub g: u8,
    /// Blue operand
    pub b: u8,
}

impl RgbOp {
    /// Create an operation with the given operands.
    pub fn new(op: RgbOperation, r: u8, g: u8, b: u8) -> Self {
        Self { op, r, g, b }
    }

    /// Reject a zero divisor.
    pub fn validate(&self) -> FilterResult<()> {
        if self.op == RgbOperation::Divide && (self.r == 0 || self.g == 0 || self.b == 0) {
            return Err(FilterError::InvalidParameters(
                "division operands must be nonzero".into(),
            ));
        }
        Ok(())
    }

    #[inline]
    fn apply_channel(&self, v: u8, operand: u8) -> u8 {
        match self.op {
            RgbOperation::Add => v.saturating_add(operand),
            RgbOperation::Subtract => v.saturating_sub(operand),
            RgbOperation::Multiply => v.saturating_mul(operand),
            RgbOperation::Divide => v / operand,
        }
    }
}

/// Convert a raster to Gray8 with the given formula.
pub fn to_gray(raster: &Raster, method: GrayMethod) -> FilterResult<Raster> {
    match method {
        GrayMethod::Weights => Ok(raster.to_luminance()),
        GrayMethod::Average => {
            let layout = raster.layout();
            if layout == PixelLayout::Gray8 {
                return Ok(raster.clone());
            }
            let data = raster
                .data()
                .chunks_exact(layout.channels())
                .map(|px| px[0] / 3 + px[1] / 3 + px[2] / 3)
                .collect();
            Ok(Raster::from_data(
                raster.width(),
                raster.height(),
                PixelLayout::Gray8,
                data,
            )?)
        }
    }
}

/// Replace the alpha of every pixel with a constant.
///
/// The output is always Rgba8.
pub fn set_alpha(raster: &Raster, alpha: u8) -> FilterResult<Raster> {
    let mut out = raster.create_template_with_layout(PixelLayout::Rgba8);
    for y in 0..raster.height() {
        for x in 0..raster.width() {
            let (r, g, b, _) = raster.get_rgba_unchecked(x, y);
            out.set_rgba_unchecked(x, y, r, g, b, alpha);
        }
    }
    Ok(out.into())
}

/// Apply per-channel arithmetic to every pixel.
///
/// The operation is validated before any pixel is touched. Alpha is kept;
/// a Gray8 input produces an Rgb8 output.
pub fn apply_rgb_op(raster: &Raster, op: &RgbOp) -> FilterResult<Raster> {
    op.validate()?;
    let layout = match raster.layout() {
        PixelLayout::Gray8 => PixelLayout::Rgb8,
        other => other,
    };
    let mut out = raster.create_template_with_layout(layout);
    for y in 0..raster.height() {
        for x in 0..raster.width() {
            let (r, g, b, a) = raster.get_rgba_unchecked(x, y);
            out.set_rgba_unchecked(
                x,
                y,
                op.apply_channel(r, op.r),
                op.apply_channel(g, op.g),
                op.apply_channel(b, op.b),
                a,
            );
        }
    }
    Ok(out.into())
}

/// Gray value of a single pixel.
#[inline]
pub fn pixel_gray(r: u8, g: u8, b: u8, method: GrayMethod) -> u8 {
    match method {
        GrayMethod::Average => r / 3 + g / 3 + b / 3,
        GrayMethod::Weights => color::luminance(r, g, b),
    }
}
