//! JPEG image format support
//!
//! Reads JPEG images using the `jpeg-decoder` crate and writes them using
//! `jpeg-encoder`. CMYK images are converted to RGB on read. JPEG has no
//! alpha, so Rgba8 rasters lose their alpha on write.

use crate::{IoError, IoResult};
use jpeg_decoder::{Decoder, PixelFormat};
use jpeg_encoder::{ColorType, Encoder};
use netpix_core::{PixelLayout, Raster, color};
use std::io::{Read, Write};

/// Default encoding quality (1-100).
pub const DEFAULT_QUALITY: u8 = 90;

/// Read a JPEG image from a reader.
///
/// Returns a Gray8 raster for grayscale images and Rgb8 otherwise.
pub fn read_jpeg<R: Read>(reader: R) -> IoResult<Raster> {
    let mut decoder = Decoder::new(reader);
    let pixels = decoder
        .decode()
        .map_err(|e| IoError::DecodeError(format!("JPEG decode error: {}", e)))?;
    let info = decoder
        .info()
        .ok_or_else(|| IoError::DecodeError("JPEG header missing".to_string()))?;
    let width = info.width as u32;
    let height = info.height as u32;

    match info.pixel_format {
        PixelFormat::L8 => Ok(Raster::from_data(width, height, PixelLayout::Gray8, pixels)?),
        PixelFormat::RGB24 => Ok(Raster::from_data(width, height, PixelLayout::Rgb8, pixels)?),
        PixelFormat::CMYK32 => {
            let rgb = pixels
                .chunks_exact(4)
                .flat_map(|p| {
                    let (r, g, b) = color::cmyk_to_rgb(p[0], p[1], p[2], p[3]);
                    [r, g, b]
                })
                .collect();
            Ok(Raster::from_data(width, height, PixelLayout::Rgb8, rgb)?)
        }
        other => Err(IoError::UnsupportedFormat(format!(
            "unsupported JPEG pixel format: {:?}",
            other
        ))),
    }
}

/// Write a JPEG image at [`DEFAULT_QUALITY`].
pub fn write_jpeg<W: Write>(raster: &Raster, writer: W) -> IoResult<()> {
    write_jpeg_with_quality(raster, writer, DEFAULT_QUALITY)
}

/// Write a JPEG image at the given quality (1-100).
pub fn write_jpeg_with_quality<W: Write>(raster: &Raster, writer: W, quality: u8) -> IoResult<()> {
    let width = u16::try_from(raster.width())
        .map_err(|_| IoError::EncodeError("JPEG width exceeds 65535".to_string()))?;
    let height = u16::try_from(raster.height())
        .map_err(|_| IoError::EncodeError("JPEG height exceeds 65535".to_string()))?;
    let color_type = match raster.layout() {
        PixelLayout::Gray8 => ColorType::Luma,
        PixelLayout::Rgb8 => ColorType::Rgb,
        PixelLayout::Rgba8 => ColorType::Rgba,
    };

    let encoder = Encoder::new(writer, quality.clamp(1, 100));
    encoder
        .encode(raster.data(), width, height, color_type)
        .map_err(|e| IoError::EncodeError(format!("JPEG encode error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_jpeg_roundtrip_dimensions() {
        let raster = Raster::from_fn(16, 8, PixelLayout::Rgb8, |_, _| (120, 130, 140, 255)).unwrap();
        let mut bytes = Vec::new();
        write_jpeg(&raster, &mut bytes).unwrap();
        let back = read_jpeg(Cursor::new(bytes)).unwrap();
        assert_eq!((back.width(), back.height()), (16, 8));
        assert_eq!(back.layout(), PixelLayout::Rgb8);
        let (r, g, b, _) = back.get_rgba(4, 4).unwrap();
        assert!((r as i32 - 120).abs() <= 4);
        assert!((g as i32 - 130).abs() <= 4);
        assert!((b as i32 - 140).abs() <= 4);
    }

    #[test]
    fn test_jpeg_gray() {
        let raster = Raster::from_fn(8, 8, PixelLayout::Gray8, |_, _| (90, 90, 90, 255)).unwrap();
        let mut bytes = Vec::new();
        write_jpeg(&raster, &mut bytes).unwrap();
        let back = read_jpeg(Cursor::new(bytes)).unwrap();
        assert_eq!(back.layout(), PixelLayout::Gray8);
    }
}
