//! Grayscale morphological operations
//!
//! Every operation first projects its input to Gray8 with
//! [`Raster::to_gray_projection`] and produces a Gray8 raster.
//!
//! - **Dilation**: maximum over the in-bounds pixels under the element
//! - **Erosion**: minimum over the same set
//! - **Opening**: erosion, then dilation of the eroded image
//! - **Closing**: dilation, then erosion of the dilated image
//! - **Hit-or-miss**: erosion of the image and of the complement of that
//!   erosion, combined pixelwise
//!
//! A pixel whose element covers no in-bounds pixel keeps the identity of
//! the reduction: 0 for dilation, 255 for erosion.

use crate::{MorphResult, StructuringElement};
use netpix_core::{PixelLayout, Raster};

/// Reduce the neighborhood of every pixel with `pick`, starting at `init`.
fn rank_extreme(
    gray: &Raster,
    sel: &StructuringElement,
    init: u8,
    pick: fn(u8, u8) -> u8,
) -> MorphResult<Raster> {
    let (w, h) = (gray.width() as i64, gray.height() as i64);
    let offsets: Vec<(i32, i32)> = sel.hit_offsets().collect();
    let src = gray.data();
    let mut out = Vec::with_capacity(src.len());

    for y in 0..h {
        for x in 0..w {
            let mut acc = init;
            for &(dx, dy) in &offsets {
                let nx = x + dx as i64;
                let ny = y + dy as i64;
                if nx >= 0 && nx < w && ny >= 0 && ny < h {
                    acc = pick(acc, src[(ny * w + nx) as usize]);
                }
            }
            out.push(acc);
        }
    }

    Ok(Raster::from_data(
        gray.width(),
        gray.height(),
        PixelLayout::Gray8,
        out,
    )?)
}

/// Dilate with a structuring element.
///
/// Expands bright regions and shrinks dark ones.
pub fn dilate_gray(raster: &Raster, sel: &StructuringElement) -> MorphResult<Raster> {
    rank_extreme(&raster.to_gray_projection(), sel, 0, u8::max)
}

/// Erode with a structuring element.
///
/// Shrinks bright regions and expands dark ones.
pub fn erode_gray(raster: &Raster, sel: &StructuringElement) -> MorphResult<Raster> {
    rank_extreme(&raster.to_gray_projection(), sel, 255, u8::min)
}

/// Open: erosion followed by dilation of the eroded result.
///
/// Removes bright features smaller than the element.
pub fn open_gray(raster: &Raster, sel: &StructuringElement) -> MorphResult<Raster> {
    let eroded = erode_gray(raster, sel)?;
    dilate_gray(&eroded, sel)
}

/// Close: dilation followed by erosion of the dilated result.
///
/// Fills dark features smaller than the element.
pub fn close_gray(raster: &Raster, sel: &StructuringElement) -> MorphResult<Raster> {
    let dilated = dilate_gray(raster, sel)?;
    erode_gray(&dilated, sel)
}

/// Hit-or-miss transform.
///
/// `hit = erode(image)`, `miss = erode(255 - hit)`; the output is 255
/// where both `hit` and `miss` are 255 and 0 elsewhere.
///
/// With an element that contains its own origin `miss` can only be 255
/// where `hit` is 0, so the output is all zero.
pub fn hit_miss_gray(raster: &Raster, sel: &StructuringElement) -> MorphResult<Raster> {
    let hit = erode_gray(raster, sel)?;
    let complement: Vec<u8> = hit.data().iter().map(|&v| 255 - v).collect();
    let complement = Raster::from_data(hit.width(), hit.height(), PixelLayout::Gray8, complement)?;
    let miss = erode_gray(&complement, sel)?;

    let out = hit
        .data()
        .iter()
        .zip(miss.data())
        .map(|(&a, &b)| if a == 255 && b == 255 { 255 } else { 0 })
        .collect();
    Ok(Raster::from_data(
        hit.width(),
        hit.height(),
        PixelLayout::Gray8,
        out,
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gray(w: u32, h: u32, data: &[u8]) -> Raster {
        Raster::from_data(w, h, PixelLayout::Gray8, data.to_vec()).unwrap()
    }

    #[rustfmt::skip]
    const SPOT: [u8; 9] = [
        255, 255, 255,
        255,   0, 255,
        255, 255, 255,
    ];

    #[test]
    fn test_dilate_cross() {
        let src = gray(3, 3, &[0, 0, 0, 0, 9, 0, 0, 0, 0]);
        let out = dilate_gray(&src, &StructuringElement::cross()).unwrap();
        assert_eq!(out.data(), &[0, 9, 0, 9, 9, 9, 0, 9, 0]);
    }

    #[test]
    fn test_erode_cross() {
        let out = erode_gray(&gray(3, 3, &SPOT), &StructuringElement::cross()).unwrap();
        assert_eq!(out.data(), &[255, 0, 255, 0, 0, 0, 255, 0, 255]);
    }

    #[test]
    fn test_close_removes_dark_spot() {
        let out = close_gray(&gray(3, 3, &SPOT), &StructuringElement::cross()).unwrap();
        assert!(out.data().iter().all(|&v| v == 255));
    }

    #[test]
    fn test_open_is_chained() {
        // Erosion grows the spot into a plus; dilating that plus shrinks
        // it back to the single center pixel
        let sel = StructuringElement::cross();
        let src = gray(3, 3, &SPOT);
        let expected = dilate_gray(&erode_gray(&src, &sel).unwrap(), &sel).unwrap();
        let out = open_gray(&src, &sel).unwrap();
        assert_eq!(out.data(), expected.data());
        assert_eq!(out.data(), &SPOT);
    }

    #[test]
    fn test_color_input_uses_projection() {
        let src = Raster::from_fn(2, 1, PixelLayout::Rgb8, |_, _| (255, 0, 0, 255)).unwrap();
        let out = dilate_gray(&src, &StructuringElement::cross()).unwrap();
        assert_eq!(out.layout(), PixelLayout::Gray8);
        assert_eq!(out.get_gray(0, 0), Some(netpix_core::color::gray_projection(255, 0, 0)));
    }

    #[test]
    fn test_hit_miss_with_origin_is_empty() {
        let src = gray(3, 3, &[255; 9]);
        let out = hit_miss_gray(&src, &StructuringElement::cross()).unwrap();
        assert!(out.data().iter().all(|&v| v == 0));
    }

    #[test]
    fn test_hit_miss_offset_element() {
        // Single hit one pixel to the right of the origin
        let sel = StructuringElement::from_string("..x", 1, 0).unwrap();
        let out = hit_miss_gray(&gray(4, 1, &[255, 255, 0, 0]), &sel).unwrap();
        assert_eq!(out.data(), &[255, 0, 0, 255]);
    }
}
