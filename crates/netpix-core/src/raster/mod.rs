//! Raster - The main image container
//!
//! A `Raster` owns a rectangular grid of 8-bit pixels in one of three
//! layouts: [`PixelLayout::Gray8`], [`PixelLayout::Rgb8`] or
//! [`PixelLayout::Rgba8`].
//!
//! # Pixel layout
//!
//! - Samples are stored interleaved, row-major, with no row padding
//! - Rgb8 pixels have an implicit alpha of 255
//! - Every accessor is checked against `[0, width) x [0, height)`
//!
//! # Ownership model
//!
//! `Raster` uses `Arc` for cheap cloning (shared ownership). To modify
//! pixel data, convert to `RasterMut` via [`Raster::try_into_mut`] or
//! [`Raster::to_mut`], then convert back with `Into<Raster>`. Engines never
//! mutate their input: each transformation builds a fresh `RasterMut` and
//! hands back a new `Raster`.

mod access;
pub mod convert;

use crate::error::{Error, Result};
use std::sync::Arc;

/// Pixel representation of a raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelLayout {
    /// One 8-bit gray sample per pixel
    Gray8,
    /// Three 8-bit samples (R, G, B); alpha is implicitly opaque
    Rgb8,
    /// Four 8-bit samples (R, G, B, A)
    Rgba8,
}

impl PixelLayout {
    /// Number of stored samples per pixel.
    pub fn channels(self) -> usize {
        match self {
            PixelLayout::Gray8 => 1,
            PixelLayout::Rgb8 => 3,
            PixelLayout::Rgba8 => 4,
        }
    }

    /// Whether the layout stores an explicit alpha sample.
    pub fn has_alpha(self) -> bool {
        self == PixelLayout::Rgba8
    }

    /// Whether the layout stores color samples.
    pub fn is_color(self) -> bool {
        self != PixelLayout::Gray8
    }
}

/// Internal raster data
#[derive(Debug)]
struct RasterData {
    width: u32,
    height: u32,
    layout: PixelLayout,
    data: Vec<u8>,
}

impl RasterData {
    fn blank(width: u32, height: u32, layout: PixelLayout) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        let len = buffer_len(width, height, layout);
        let mut data = vec![0u8; len];
        if layout == PixelLayout::Rgba8 {
            for px in data.chunks_exact_mut(4) {
                px[3] = 255;
            }
        }
        Ok(RasterData {
            width,
            height,
            layout,
            data,
        })
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        debug_assert!(x < self.width && y < self.height);
        ((y as usize) * (self.width as usize) + (x as usize)) * self.layout.channels()
    }

    #[inline]
    fn contains(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height
    }
}

fn buffer_len(width: u32, height: u32, layout: PixelLayout) -> usize {
    (width as usize) * (height as usize) * layout.channels()
}

/// Raster - Main image container
///
/// # Examples
///
/// ```
/// use netpix_core::{PixelLayout, Raster};
///
/// let raster = Raster::new(640, 480, PixelLayout::Gray8).unwrap();
/// assert_eq!(raster.width(), 640);
/// assert_eq!(raster.height(), 480);
/// ```
#[derive(Debug, Clone)]
pub struct Raster {
    inner: Arc<RasterData>,
}

impl Raster {
    /// Create a new raster with every sample zeroed (alpha opaque).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if width or height is 0.
    pub fn new(width: u32, height: u32, layout: PixelLayout) -> Result<Self> {
        Ok(RasterMut::new(width, height, layout)?.into())
    }

    /// Wrap an interleaved sample buffer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] for a zero dimension and
    /// [`Error::BufferLength`] if `data.len()` is not
    /// `width * height * layout.channels()`.
    pub fn from_data(width: u32, height: u32, layout: PixelLayout, data: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        let expected = buffer_len(width, height, layout);
        if data.len() != expected {
            return Err(Error::BufferLength {
                expected,
                actual: data.len(),
            });
        }
        Ok(Raster {
            inner: Arc::new(RasterData {
                width,
                height,
                layout,
                data,
            }),
        })
    }

    /// Wrap a buffer whose size the caller has already checked.
    pub(crate) fn from_validated(
        width: u32,
        height: u32,
        layout: PixelLayout,
        data: Vec<u8>,
    ) -> Self {
        debug_assert_eq!(data.len(), buffer_len(width, height, layout));
        Raster {
            inner: Arc::new(RasterData {
                width,
                height,
                layout,
                data,
            }),
        }
    }

    /// Build a raster by evaluating `f(x, y) -> (r, g, b, a)` for every pixel.
    ///
    /// Gray8 rasters store the luminance of the returned color; Rgb8
    /// rasters drop the alpha sample.
    pub fn from_fn<F>(width: u32, height: u32, layout: PixelLayout, mut f: F) -> Result<Self>
    where
        F: FnMut(u32, u32) -> (u8, u8, u8, u8),
    {
        let mut out = RasterMut::new(width, height, layout)?;
        for y in 0..height {
            for x in 0..width {
                let (r, g, b, a) = f(x, y);
                out.set_rgba_unchecked(x, y, r, g, b, a);
            }
        }
        Ok(out.into())
    }

    /// Get the image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Get the image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Get the pixel layout.
    #[inline]
    pub fn layout(&self) -> PixelLayout {
        self.inner.layout
    }

    /// Get the number of samples per pixel.
    #[inline]
    pub fn channels(&self) -> usize {
        self.inner.layout.channels()
    }

    /// Number of pixels (`width * height`).
    #[inline]
    pub fn pixel_count(&self) -> usize {
        (self.inner.width as usize) * (self.inner.height as usize)
    }

    /// Get raw access to the interleaved samples.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.inner.data
    }

    /// Get the samples of one row.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    pub fn row_data(&self, y: u32) -> &[u8] {
        assert!(y < self.inner.height, "row {y} out of bounds");
        let stride = self.inner.width as usize * self.channels();
        let start = y as usize * stride;
        &self.inner.data[start..start + stride]
    }

    /// Whether `(x, y)` lies inside the raster.
    #[inline]
    pub fn contains(&self, x: u32, y: u32) -> bool {
        self.inner.contains(x, y)
    }

    /// Check if two rasters have the same width and height.
    pub fn sizes_equal(&self, other: &Raster) -> bool {
        self.inner.width == other.inner.width && self.inner.height == other.inner.height
    }

    /// Create a blank mutable raster with the same size and layout.
    pub fn create_template(&self) -> RasterMut {
        self.create_template_with_layout(self.inner.layout)
    }

    /// Create a blank mutable raster with the same size and a new layout.
    pub fn create_template_with_layout(&self, layout: PixelLayout) -> RasterMut {
        // Dimensions were validated when `self` was built.
        let len = buffer_len(self.inner.width, self.inner.height, layout);
        let mut data = vec![0u8; len];
        if layout == PixelLayout::Rgba8 {
            for px in data.chunks_exact_mut(4) {
                px[3] = 255;
            }
        }
        RasterMut {
            inner: RasterData {
                width: self.inner.width,
                height: self.inner.height,
                layout,
                data,
            },
        }
    }

    /// Create a deep copy of this raster.
    ///
    /// Unlike `clone()` which shares data via Arc, this creates
    /// a completely independent copy.
    pub fn deep_clone(&self) -> Self {
        self.to_mut().into()
    }

    /// Try to get mutable access to the image data.
    ///
    /// Succeeds only if there is exactly one reference to the data.
    pub fn try_into_mut(self) -> std::result::Result<RasterMut, Self> {
        match Arc::try_unwrap(self.inner) {
            Ok(data) => Ok(RasterMut { inner: data }),
            Err(arc) => Err(Raster { inner: arc }),
        }
    }

    /// Create a mutable copy of this raster.
    pub fn to_mut(&self) -> RasterMut {
        RasterMut {
            inner: RasterData {
                width: self.inner.width,
                height: self.inner.height,
                layout: self.inner.layout,
                data: self.inner.data.clone(),
            },
        }
    }

    /// Check whether two handles share the same pixel buffer.
    pub fn ptr_eq(&self, other: &Raster) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

/// Mutable raster
///
/// Allows modification of image data. Convert back to an immutable
/// [`Raster`] using `Into<Raster>`.
#[derive(Debug)]
pub struct RasterMut {
    inner: RasterData,
}

impl RasterMut {
    /// Create a new mutable raster with every sample zeroed (alpha opaque).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if width or height is 0.
    pub fn new(width: u32, height: u32, layout: PixelLayout) -> Result<Self> {
        Ok(RasterMut {
            inner: RasterData::blank(width, height, layout)?,
        })
    }

    /// Get the image width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Get the image height.
    #[inline]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Get the pixel layout.
    #[inline]
    pub fn layout(&self) -> PixelLayout {
        self.inner.layout
    }

    /// Whether `(x, y)` lies inside the raster.
    #[inline]
    pub fn contains(&self, x: u32, y: u32) -> bool {
        self.inner.contains(x, y)
    }

    /// Get raw access to the interleaved samples.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.inner.data
    }

    /// Get mutable access to the interleaved samples.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.inner.data
    }
}

impl From<RasterMut> for Raster {
    fn from(raster: RasterMut) -> Self {
        Raster {
            inner: Arc::new(raster.inner),
        }
    }
}
