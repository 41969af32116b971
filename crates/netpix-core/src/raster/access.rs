//! Pixel access
//!
//! Checked accessors return `None` / `Err` outside the raster; the
//! `_unchecked` variants skip the coordinate test and panic on a bad
//! index instead of returning an error, for use in loops whose bounds
//! already come from the raster itself.

use super::{PixelLayout, Raster, RasterData, RasterMut};
use crate::color;
use crate::error::{Error, Result};

impl RasterData {
    #[inline]
    fn read_rgba(&self, x: u32, y: u32) -> (u8, u8, u8, u8) {
        let i = self.index(x, y);
        let d = &self.data;
        match self.layout {
            PixelLayout::Gray8 => (d[i], d[i], d[i], 255),
            PixelLayout::Rgb8 => (d[i], d[i + 1], d[i + 2], 255),
            PixelLayout::Rgba8 => (d[i], d[i + 1], d[i + 2], d[i + 3]),
        }
    }

    #[inline]
    fn read_gray(&self, x: u32, y: u32) -> u8 {
        match self.layout {
            PixelLayout::Gray8 => self.data[self.index(x, y)],
            _ => {
                let (r, g, b, _) = self.read_rgba(x, y);
                color::luminance(r, g, b)
            }
        }
    }

    #[inline]
    fn write_rgba(&mut self, x: u32, y: u32, r: u8, g: u8, b: u8, a: u8) {
        let i = self.index(x, y);
        match self.layout {
            PixelLayout::Gray8 => self.data[i] = color::luminance(r, g, b),
            PixelLayout::Rgb8 => self.data[i..i + 3].copy_from_slice(&[r, g, b]),
            PixelLayout::Rgba8 => self.data[i..i + 4].copy_from_slice(&[r, g, b, a]),
        }
    }

    #[inline]
    fn write_gray(&mut self, x: u32, y: u32, val: u8) {
        let i = self.index(x, y);
        match self.layout {
            PixelLayout::Gray8 => self.data[i] = val,
            PixelLayout::Rgb8 => self.data[i..i + 3].fill(val),
            PixelLayout::Rgba8 => {
                self.data[i..i + 3].fill(val);
                self.data[i + 3] = 255;
            }
        }
    }

    fn check(&self, x: u32, y: u32) -> Result<()> {
        if self.contains(x, y) {
            Ok(())
        } else {
            Err(Error::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            })
        }
    }
}

impl Raster {
    /// Get the RGBA value at `(x, y)`.
    ///
    /// Gray8 pixels expand to `(v, v, v, 255)`; Rgb8 pixels report alpha 255.
    pub fn get_rgba(&self, x: u32, y: u32) -> Option<(u8, u8, u8, u8)> {
        self.inner
            .contains(x, y)
            .then(|| self.inner.read_rgba(x, y))
    }

    /// Get the RGB value at `(x, y)`.
    pub fn get_rgb(&self, x: u32, y: u32) -> Option<(u8, u8, u8)> {
        self.get_rgba(x, y).map(|(r, g, b, _)| (r, g, b))
    }

    /// Get the gray value at `(x, y)`.
    ///
    /// For color layouts this is the weighted luminance.
    pub fn get_gray(&self, x: u32, y: u32) -> Option<u8> {
        self.inner
            .contains(x, y)
            .then(|| self.inner.read_gray(x, y))
    }

    /// Get the RGBA value at `(x, y)` without a coordinate test.
    ///
    /// # Panics
    ///
    /// May panic if `(x, y)` is outside the raster.
    #[inline]
    pub fn get_rgba_unchecked(&self, x: u32, y: u32) -> (u8, u8, u8, u8) {
        self.inner.read_rgba(x, y)
    }

    /// Get the gray value at `(x, y)` without a coordinate test.
    ///
    /// # Panics
    ///
    /// May panic if `(x, y)` is outside the raster.
    #[inline]
    pub fn get_gray_unchecked(&self, x: u32, y: u32) -> u8 {
        self.inner.read_gray(x, y)
    }
}

impl RasterMut {
    /// Get the RGBA value at `(x, y)`.
    pub fn get_rgba(&self, x: u32, y: u32) -> Option<(u8, u8, u8, u8)> {
        self.inner
            .contains(x, y)
            .then(|| self.inner.read_rgba(x, y))
    }

    /// Get the gray value at `(x, y)`.
    pub fn get_gray(&self, x: u32, y: u32) -> Option<u8> {
        self.inner
            .contains(x, y)
            .then(|| self.inner.read_gray(x, y))
    }

    /// Set the RGBA value at `(x, y)`.
    ///
    /// Gray8 rasters store the luminance; Rgb8 rasters drop alpha.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`] if `(x, y)` is outside the raster.
    pub fn set_rgba(&mut self, x: u32, y: u32, r: u8, g: u8, b: u8, a: u8) -> Result<()> {
        self.inner.check(x, y)?;
        self.inner.write_rgba(x, y, r, g, b, a);
        Ok(())
    }

    /// Set the RGB value at `(x, y)` (alpha becomes 255).
    pub fn set_rgb(&mut self, x: u32, y: u32, r: u8, g: u8, b: u8) -> Result<()> {
        self.set_rgba(x, y, r, g, b, 255)
    }

    /// Set a gray value at `(x, y)`, replicated to all color samples.
    pub fn set_gray(&mut self, x: u32, y: u32, val: u8) -> Result<()> {
        self.inner.check(x, y)?;
        self.inner.write_gray(x, y, val);
        Ok(())
    }

    /// Set the RGBA value at `(x, y)` without a coordinate test.
    ///
    /// # Panics
    ///
    /// May panic if `(x, y)` is outside the raster.
    #[inline]
    pub fn set_rgba_unchecked(&mut self, x: u32, y: u32, r: u8, g: u8, b: u8, a: u8) {
        self.inner.write_rgba(x, y, r, g, b, a);
    }

    /// Set a gray value at `(x, y)` without a coordinate test.
    ///
    /// # Panics
    ///
    /// May panic if `(x, y)` is outside the raster.
    #[inline]
    pub fn set_gray_unchecked(&mut self, x: u32, y: u32, val: u8) {
        self.inner.write_gray(x, y, val);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checked_access_out_of_bounds() {
        let raster = Raster::new(4, 3, PixelLayout::Rgb8).unwrap();
        assert!(raster.get_rgba(3, 2).is_some());
        assert_eq!(raster.get_rgba(4, 0), None);
        assert_eq!(raster.get_gray(0, 3), None);

        let mut raster = raster.to_mut();
        assert!(matches!(
            raster.set_rgb(4, 0, 1, 2, 3),
            Err(Error::OutOfBounds { x: 4, y: 0, .. })
        ));
    }

    #[test]
    fn test_gray_layout_stores_luminance() {
        let mut raster = RasterMut::new(1, 1, PixelLayout::Gray8).unwrap();
        raster.set_rgb(0, 0, 255, 0, 0).unwrap();
        // 0.299 * 255 = 76.245
        assert_eq!(raster.get_gray(0, 0), Some(76));
        assert_eq!(raster.get_rgba(0, 0), Some((76, 76, 76, 255)));
    }

    #[test]
    fn test_rgb_layout_drops_alpha() {
        let mut raster = RasterMut::new(1, 1, PixelLayout::Rgb8).unwrap();
        raster.set_rgba(0, 0, 10, 20, 30, 40).unwrap();
        assert_eq!(raster.get_rgba(0, 0), Some((10, 20, 30, 255)));
    }

    #[test]
    fn test_rgba_layout_keeps_alpha() {
        let mut raster = RasterMut::new(1, 1, PixelLayout::Rgba8).unwrap();
        raster.set_rgba(0, 0, 10, 20, 30, 40).unwrap();
        assert_eq!(raster.get_rgba(0, 0), Some((10, 20, 30, 40)));
    }

    #[test]
    fn test_set_gray_replicates() {
        let mut raster = RasterMut::new(1, 1, PixelLayout::Rgba8).unwrap();
        raster.set_gray(0, 0, 99).unwrap();
        assert_eq!(raster.get_rgba(0, 0), Some((99, 99, 99, 255)));
    }
}
