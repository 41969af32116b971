//! Sobel edge magnitude

use crate::FilterResult;
use crate::kernel::{Kernel3, clamp_coord, offsets};
use netpix_core::Raster;

/// Compute the Sobel gradient magnitude.
///
/// The red channel is used as the intensity. Indices are clamped to the
/// image bounds. The magnitude `sqrt(gx^2 + gy^2)` is capped at 255,
/// truncated, and written to every color channel with opaque alpha.
pub fn sobel_edge(raster: &Raster) -> FilterResult<Raster> {
    let (w, h) = (raster.width(), raster.height());
    let mut out = raster.create_template();

    for y in 0..h {
        for x in 0..w {
            let mut gx = 0i32;
            let mut gy = 0i32;
            for (dx, dy) in offsets() {
                let nx = clamp_coord(x as i64 + dx as i64, w);
                let ny = clamp_coord(y as i64 + dy as i64, h);
                let (r, _, _, _) = raster.get_rgba_unchecked(nx, ny);
                gx += r as i32 * Kernel3::SOBEL_X.at(dx, dy);
                gy += r as i32 * Kernel3::SOBEL_Y.at(dx, dy);
            }
            let magnitude = ((gx * gx + gy * gy) as f64).sqrt().min(255.0) as u8;
            out.set_rgba_unchecked(x, y, magnitude, magnitude, magnitude, 255);
        }
    }

    Ok(out.into())
}
