//! Binary masks
//!
//! A [`BinaryMask`] is a boolean grid the same size as its source raster.
//! `true` marks foreground. Rendered as a raster, foreground is black (0)
//! and background is white (255).

use crate::error::{Error, Result};
use crate::raster::{PixelLayout, Raster, RasterMut};

/// Luminance below which a pixel counts as set when reading a bitmap.
pub const BITMAP_CUTOFF: u8 = 128;

/// Boolean foreground/background grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryMask {
    width: u32,
    height: u32,
    bits: Vec<bool>,
}

impl BinaryMask {
    /// Create an all-background mask.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if width or height is 0.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        Ok(BinaryMask {
            width,
            height,
            bits: vec![false; width as usize * height as usize],
        })
    }

    /// Build a mask by evaluating `f(x, y)` for every position.
    pub fn from_fn<F>(width: u32, height: u32, mut f: F) -> Result<Self>
    where
        F: FnMut(u32, u32) -> bool,
    {
        let mut mask = Self::new(width, height)?;
        for y in 0..height {
            for x in 0..width {
                let i = mask.index(x, y);
                mask.bits[i] = f(x, y);
            }
        }
        Ok(mask)
    }

    /// Read a two-tone raster: luminance below 128 is foreground.
    pub fn from_bitmap(raster: &Raster) -> Self {
        let bits = raster
            .luminance_values()
            .into_iter()
            .map(|v| v < BITMAP_CUTOFF)
            .collect();
        BinaryMask {
            width: raster.width(),
            height: raster.height(),
            bits,
        }
    }

    /// Get the mask width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the mask height.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the value at `(x, y)`, or `None` outside the mask.
    pub fn get(&self, x: u32, y: u32) -> Option<bool> {
        if x < self.width && y < self.height {
            Some(self.bits[self.index(x, y)])
        } else {
            None
        }
    }

    /// Set the value at `(x, y)`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`] outside the mask.
    pub fn set(&mut self, x: u32, y: u32, value: bool) -> Result<()> {
        if x >= self.width || y >= self.height {
            return Err(Error::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        let i = self.index(x, y);
        self.bits[i] = value;
        Ok(())
    }

    /// Row-major view of the bits.
    pub fn as_slice(&self) -> &[bool] {
        &self.bits
    }

    /// Number of foreground positions.
    pub fn count_foreground(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    /// Check that the mask matches a raster's size.
    pub fn check_size(&self, raster: &Raster) -> Result<()> {
        if self.width == raster.width() && self.height == raster.height() {
            Ok(())
        } else {
            Err(Error::DimensionMismatch {
                expected: (raster.width(), raster.height()),
                actual: (self.width, self.height),
            })
        }
    }

    /// Render as a Gray8 raster: foreground 0, background 255.
    pub fn to_raster(&self) -> Raster {
        let data = self.bits.iter().map(|&b| if b { 0 } else { 255 }).collect();
        Raster::from_validated(self.width, self.height, PixelLayout::Gray8, data)
    }

    /// Render into an existing mutable raster of the same size.
    pub fn paint_into(&self, out: &mut RasterMut) -> Result<()> {
        if out.width() != self.width || out.height() != self.height {
            return Err(Error::DimensionMismatch {
                expected: (out.width(), out.height()),
                actual: (self.width, self.height),
            });
        }
        for y in 0..self.height {
            for x in 0..self.width {
                let v = if self.bits[self.index(x, y)] { 0 } else { 255 };
                out.set_gray_unchecked(x, y, v);
            }
        }
        Ok(())
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}
