//! 3x3 smoothing filters
//!
//! Two border policies are used and never mixed within one filter:
//!
//! - [`box_blur`] averages only the neighbors that lie inside the image,
//!   so border pixels average fewer samples
//! - [`gaussian_blur`] replicates the edge pixels (clamped indices)

use crate::FilterResult;
use crate::kernel::{Kernel3, clamp_coord, offsets};
use netpix_core::Raster;

/// In-bounds neighbors of `(x, y)` in a 3x3 window, center included.
pub(crate) fn neighbors_in_bounds(
    x: u32,
    y: u32,
    width: u32,
    height: u32,
) -> impl Iterator<Item = (u32, u32)> {
    offsets().filter_map(move |(dx, dy)| {
        let nx = x as i64 + dx as i64;
        let ny = y as i64 + dy as i64;
        (nx >= 0 && ny >= 0 && nx < width as i64 && ny < height as i64)
            .then_some((nx as u32, ny as u32))
    })
}

/// Average each color channel over the in-bounds 3x3 neighborhood.
///
/// Means are truncated. The alpha of each source pixel is kept and the
/// output has the layout of the input.
pub fn box_blur(raster: &Raster) -> FilterResult<Raster> {
    let (w, h) = (raster.width(), raster.height());
    let mut out = raster.create_template();

    for y in 0..h {
        for x in 0..w {
            let mut sum = [0u32; 3];
            let mut count = 0u32;
            for (nx, ny) in neighbors_in_bounds(x, y, w, h) {
                let (r, g, b, _) = raster.get_rgba_unchecked(nx, ny);
                sum[0] += r as u32;
                sum[1] += g as u32;
                sum[2] += b as u32;
                count += 1;
            }
            let (_, _, _, a) = raster.get_rgba_unchecked(x, y);
            out.set_rgba_unchecked(
                x,
                y,
                (sum[0] / count) as u8,
                (sum[1] / count) as u8,
                (sum[2] / count) as u8,
                a,
            );
        }
    }

    Ok(out.into())
}

/// Convolve each color channel with [`Kernel3::GAUSSIAN`].
///
/// Indices are clamped to the image bounds. Sums are divided by 16 and
/// truncated; output alpha is opaque.
pub fn gaussian_blur(raster: &Raster) -> FilterResult<Raster> {
    let kernel = Kernel3::GAUSSIAN;
    let norm = kernel.sum() as u32;
    let (w, h) = (raster.width(), raster.height());
    let mut out = raster.create_template();

    for y in 0..h {
        for x in 0..w {
            let mut sum = [0u32; 3];
            for (dx, dy) in offsets() {
                let nx = clamp_coord(x as i64 + dx as i64, w);
                let ny = clamp_coord(y as i64 + dy as i64, h);
                let weight = kernel.at(dx, dy) as u32;
                let (r, g, b, _) = raster.get_rgba_unchecked(nx, ny);
                sum[0] += r as u32 * weight;
                sum[1] += g as u32 * weight;
                sum[2] += b as u32 * weight;
            }
            out.set_rgba_unchecked(
                x,
                y,
                (sum[0] / norm) as u8,
                (sum[1] / norm) as u8,
                (sum[2] / norm) as u8,
                255,
            );
        }
    }

    Ok(out.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use netpix_core::{PixelLayout, RasterMut};

    fn gray_from_rows(rows: &[&[u8]]) -> Raster {
        let h = rows.len() as u32;
        let w = rows[0].len() as u32;
        let data = rows.concat();
        Raster::from_data(w, h, PixelLayout::Gray8, data).unwrap()
    }

    #[test]
    fn test_neighbors_in_bounds_corner() {
        let n: Vec<_> = neighbors_in_bounds(0, 0, 3, 3).collect();
        assert_eq!(n, vec![(0, 0), (1, 0), (0, 1), (1, 1)]);
        assert_eq!(neighbors_in_bounds(1, 1, 3, 3).count(), 9);
    }

    #[test]
    fn test_box_blur_uses_in_bounds_count() {
        // Corner (0,0) sees 4 samples: 0 + 90 + 90 + 0 = 180 -> 45
        let src = gray_from_rows(&[&[0, 90, 0], &[90, 0, 90], &[0, 90, 0]]);
        let out = box_blur(&src).unwrap();
        assert_eq!(out.get_gray(0, 0), Some(45));
        // Center sees all 9: 4 * 90 / 9 = 40
        assert_eq!(out.get_gray(1, 1), Some(40));
    }

    #[test]
    fn test_box_blur_keeps_alpha() {
        let mut m = RasterMut::new(2, 2, PixelLayout::Rgba8).unwrap();
        m.set_rgba(0, 0, 100, 100, 100, 10).unwrap();
        m.set_rgba(1, 0, 100, 100, 100, 20).unwrap();
        m.set_rgba(0, 1, 100, 100, 100, 30).unwrap();
        m.set_rgba(1, 1, 100, 100, 100, 40).unwrap();
        let out = box_blur(&m.into()).unwrap();
        assert_eq!(out.layout(), PixelLayout::Rgba8);
        assert_eq!(out.get_rgba(0, 0), Some((100, 100, 100, 10)));
        assert_eq!(out.get_rgba(1, 1), Some((100, 100, 100, 40)));
    }

    #[test]
    fn test_gaussian_uniform_is_unchanged() {
        let src = Raster::from_fn(4, 3, PixelLayout::Rgb8, |_, _| (30, 60, 90, 255)).unwrap();
        let out = gaussian_blur(&src).unwrap();
        for y in 0..3 {
            for x in 0..4 {
                assert_eq!(out.get_rgb(x, y), Some((30, 60, 90)));
            }
        }
    }

    #[test]
    fn test_gaussian_single_bright_pixel() {
        let src = gray_from_rows(&[&[0, 0, 0], &[0, 160, 0], &[0, 0, 0]]);
        let out = gaussian_blur(&src).unwrap();
        assert_eq!(out.get_gray(1, 1), Some(40));
        assert_eq!(out.get_gray(0, 1), Some(20));
        assert_eq!(out.get_gray(0, 0), Some(10));
    }

    #[test]
    fn test_gaussian_alpha_opaque() {
        let src = Raster::from_fn(2, 2, PixelLayout::Rgba8, |_, _| (1, 2, 3, 7)).unwrap();
        let out = gaussian_blur(&src).unwrap();
        assert_eq!(out.get_rgba(0, 0), Some((1, 2, 3, 255)));
    }
}
