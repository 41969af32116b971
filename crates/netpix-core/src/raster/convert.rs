//! Layout conversion and gray projections
//!
//! Two distinct gray conversions exist:
//!
//! - [`Raster::to_luminance`] uses the weighted luminance
//!   `0.299R + 0.587G + 0.114B` shared by histograms and thresholds
//! - [`Raster::to_gray_projection`] uses the 16-bit fixed-point
//!   projection consumed by the morphology engine

use super::{PixelLayout, Raster, RasterMut};
use crate::color;

impl Raster {
    /// Per-pixel luminance values in row-major order.
    pub fn luminance_values(&self) -> Vec<u8> {
        match self.layout() {
            PixelLayout::Gray8 => self.data().to_vec(),
            layout => self
                .data()
                .chunks_exact(layout.channels())
                .map(|px| color::luminance(px[0], px[1], px[2]))
                .collect(),
        }
    }

    /// Convert to a Gray8 raster holding the weighted luminance.
    ///
    /// Returns a shared handle to `self` if it is already Gray8.
    pub fn to_luminance(&self) -> Raster {
        if self.layout() == PixelLayout::Gray8 {
            return self.clone();
        }
        self.gray_from(self.luminance_values())
    }

    /// Convert to a Gray8 raster using the fixed-point gray projection.
    ///
    /// Returns a shared handle to `self` if it is already Gray8.
    pub fn to_gray_projection(&self) -> Raster {
        let layout = self.layout();
        if layout == PixelLayout::Gray8 {
            return self.clone();
        }
        let values = self
            .data()
            .chunks_exact(layout.channels())
            .map(|px| color::gray_projection(px[0], px[1], px[2]))
            .collect();
        self.gray_from(values)
    }

    /// Convert to another pixel layout.
    ///
    /// Gray to color replicates the sample; color to gray uses luminance;
    /// dropping alpha discards it; adding alpha makes every pixel opaque.
    pub fn convert_layout(&self, layout: PixelLayout) -> Raster {
        if layout == self.layout() {
            return self.clone();
        }
        if layout == PixelLayout::Gray8 {
            return self.to_luminance();
        }
        let mut out = self.create_template_with_layout(layout);
        for y in 0..self.height() {
            for x in 0..self.width() {
                let (r, g, b, a) = self.get_rgba_unchecked(x, y);
                out.set_rgba_unchecked(x, y, r, g, b, a);
            }
        }
        out.into()
    }

    fn gray_from(&self, values: Vec<u8>) -> Raster {
        let mut out: RasterMut = self.create_template_with_layout(PixelLayout::Gray8);
        out.data_mut().copy_from_slice(&values);
        out.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn color_pixel(r: u8, g: u8, b: u8) -> Raster {
        Raster::from_data(1, 1, PixelLayout::Rgb8, vec![r, g, b]).unwrap()
    }

    #[test]
    fn test_luminance_of_primaries() {
        assert_eq!(color_pixel(255, 0, 0).luminance_values(), vec![76]);
        assert_eq!(color_pixel(0, 255, 0).luminance_values(), vec![150]);
        assert_eq!(color_pixel(0, 0, 255).luminance_values(), vec![29]);
        assert_eq!(color_pixel(255, 255, 255).luminance_values(), vec![255]);
    }

    #[test]
    fn test_gray_projection_differs_from_luminance() {
        let raster = color_pixel(255, 0, 0);
        // 19595 * 65535 / 2^24 = 76.54 -> 76 with rounding bias
        assert_eq!(raster.to_gray_projection().get_gray(0, 0), Some(76));
        let raster = color_pixel(0, 0, 255);
        assert_eq!(raster.to_gray_projection().get_gray(0, 0), Some(29));
    }

    #[test]
    fn test_gray_input_is_shared() {
        let raster = Raster::new(2, 2, PixelLayout::Gray8).unwrap();
        assert!(raster.to_luminance().ptr_eq(&raster));
        assert!(raster.to_gray_projection().ptr_eq(&raster));
    }

    #[test]
    fn test_convert_layout_gray_to_rgba() {
        let raster = Raster::from_data(2, 1, PixelLayout::Gray8, vec![10, 200]).unwrap();
        let rgba = raster.convert_layout(PixelLayout::Rgba8);
        assert_eq!(rgba.layout(), PixelLayout::Rgba8);
        assert_eq!(rgba.get_rgba(1, 0), Some((200, 200, 200, 255)));
    }
}
