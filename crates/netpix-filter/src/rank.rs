//! Rank (median) filtering

use crate::FilterResult;
use crate::convolve::neighbors_in_bounds;
use netpix_core::Raster;

/// Apply a 3x3 median filter.
///
/// Each color channel is sorted independently over the in-bounds
/// neighborhood and the sample at index `count / 2` is taken, so even
/// sample counts at the border pick the upper median. Output alpha is
/// opaque.
pub fn median_filter(raster: &Raster) -> FilterResult<Raster> {
    let (w, h) = (raster.width(), raster.height());
    let mut out = raster.create_template();

    let mut rs = Vec::with_capacity(9);
    let mut gs = Vec::with_capacity(9);
    let mut bs = Vec::with_capacity(9);

    for y in 0..h {
        for x in 0..w {
            rs.clear();
            gs.clear();
            bs.clear();
            for (nx, ny) in neighbors_in_bounds(x, y, w, h) {
                let (r, g, b, _) = raster.get_rgba_unchecked(nx, ny);
                rs.push(r);
                gs.push(g);
                bs.push(b);
            }
            rs.sort_unstable();
            gs.sort_unstable();
            bs.sort_unstable();
            let mid = rs.len() / 2;
            out.set_rgba_unchecked(x, y, rs[mid], gs[mid], bs[mid], 255);
        }
    }

    Ok(out.into())
}
