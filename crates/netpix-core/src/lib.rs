//! netpix Core - Basic data structures for image analysis
//!
//! This crate provides the data types shared by every netpix engine:
//!
//! - [`Raster`] / [`RasterMut`] - The main image container (immutable / mutable)
//! - [`PixelLayout`] - Gray8, Rgb8 or Rgba8 sample layout
//! - [`Histogram`] - 256-bin luminance histogram with Otsu's threshold
//! - [`BinaryMask`] - Foreground/background grid produced by binarization
//! - [`color`] - Luminance, gray projection and CMYK helpers

pub mod error;
pub mod histogram;
pub mod mask;
pub mod raster;

pub use error::{Error, Result};
pub use histogram::Histogram;
pub use mask::{BITMAP_CUTOFF, BinaryMask};
pub use raster::{PixelLayout, Raster, RasterMut};

/// Per-pixel color arithmetic.
///
/// Two gray conversions live here. [`luminance`](color::luminance) is the
/// weighted `0.299R + 0.587G + 0.114B` used by histograms, thresholds and
/// segmentation. [`gray_projection`](color::gray_projection) is a 16-bit
/// fixed-point projection used only by morphology.
pub mod color {
    /// Weighted luminance, rounded to the nearest integer.
    #[inline]
    pub fn luminance(r: u8, g: u8, b: u8) -> u8 {
        let y = 0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64;
        y.round().min(255.0) as u8
    }

    /// Fixed-point gray projection.
    ///
    /// Samples are widened to 16 bits (`v * 0x101`) and combined with the
    /// weights 19595/38470/7471 (summing to 65536), then reduced back to
    /// 8 bits.
    #[inline]
    pub fn gray_projection(r: u8, g: u8, b: u8) -> u8 {
        let r16 = r as u64 * 0x101;
        let g16 = g as u64 * 0x101;
        let b16 = b as u64 * 0x101;
        ((19595 * r16 + 38470 * g16 + 7471 * b16 + (1 << 15)) >> 24) as u8
    }

    /// Convert RGB to CMYK.
    ///
    /// Black is `(0, 0, 0, 255)`.
    pub fn rgb_to_cmyk(r: u8, g: u8, b: u8) -> (u8, u8, u8, u8) {
        let (r, g, b) = (r as u32, g as u32, b as u32);
        let w = r.max(g).max(b);
        if w == 0 {
            return (0, 0, 0, 255);
        }
        let c = (w - r) * 255 / w;
        let m = (w - g) * 255 / w;
        let y = (w - b) * 255 / w;
        (c as u8, m as u8, y as u8, (255 - w) as u8)
    }

    /// Convert CMYK to RGB.
    pub fn cmyk_to_rgb(c: u8, m: u8, y: u8, k: u8) -> (u8, u8, u8) {
        let w = 0xffff - k as u32 * 0x101;
        let channel = |v: u8| (((0xffff - v as u32 * 0x101) * w / 0xffff) >> 8) as u8;
        (channel(c), channel(m), channel(y))
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_luminance_bounds() {
            assert_eq!(luminance(0, 0, 0), 0);
            assert_eq!(luminance(255, 255, 255), 255);
            assert_eq!(luminance(127, 127, 127), 127);
        }

        #[test]
        fn test_gray_projection_bounds() {
            assert_eq!(gray_projection(0, 0, 0), 0);
            assert_eq!(gray_projection(255, 255, 255), 255);
            assert_eq!(gray_projection(100, 100, 100), 100);
        }

        #[test]
        fn test_cmyk_primaries() {
            assert_eq!(rgb_to_cmyk(0, 0, 0), (0, 0, 0, 255));
            assert_eq!(rgb_to_cmyk(255, 255, 255), (0, 0, 0, 0));
            assert_eq!(rgb_to_cmyk(255, 0, 0), (0, 255, 255, 0));
            assert_eq!(cmyk_to_rgb(0, 255, 255, 0), (255, 0, 0));
            assert_eq!(cmyk_to_rgb(0, 0, 0, 255), (0, 0, 0));
        }

        #[test]
        fn test_cmyk_round_trip_close() {
            for &(r, g, b) in &[(12u8, 200u8, 99u8), (250, 250, 1), (60, 70, 80)] {
                let (c, m, y, k) = rgb_to_cmyk(r, g, b);
                let (r2, g2, b2) = cmyk_to_rgb(c, m, y, k);
                assert!((r as i32 - r2 as i32).abs() <= 2);
                assert!((g as i32 - g2 as i32).abs() <= 2);
                assert!((b as i32 - b2 as i32).abs() <= 2);
            }
        }
    }
}
