//! WebP image format support
//!
//! Reading supports both lossy and lossless still images. Writing is
//! lossless only. Animated WebP images are rejected.

use crate::{IoError, IoResult};
use image_webp::{ColorType, WebPDecoder, WebPEncoder};
use netpix_core::{PixelLayout, Raster};
use std::io::{BufRead, Seek, Write};

/// Read a WebP image
///
/// Returns an Rgba8 raster if the image has alpha, Rgb8 otherwise.
pub fn read_webp<R: BufRead + Seek>(reader: R) -> IoResult<Raster> {
    let mut decoder = WebPDecoder::new(reader)
        .map_err(|e| IoError::DecodeError(format!("WebP decode error: {}", e)))?;

    if decoder.is_animated() {
        return Err(IoError::UnsupportedFormat(
            "animated WebP not supported".to_string(),
        ));
    }

    let (width, height) = decoder.dimensions();
    let layout = if decoder.has_alpha() {
        PixelLayout::Rgba8
    } else {
        PixelLayout::Rgb8
    };

    let buffer_size = decoder.output_buffer_size().ok_or_else(|| {
        IoError::DecodeError("failed to determine output buffer size".to_string())
    })?;
    let mut buffer = vec![0u8; buffer_size];
    decoder
        .read_image(&mut buffer)
        .map_err(|e| IoError::DecodeError(format!("WebP read error: {}", e)))?;

    Ok(Raster::from_data(width, height, layout, buffer)?)
}

/// Write a WebP image using lossless compression.
pub fn write_webp<W: Write>(raster: &Raster, writer: W) -> IoResult<()> {
    let color_type = match raster.layout() {
        PixelLayout::Gray8 => ColorType::L8,
        PixelLayout::Rgb8 => ColorType::Rgb8,
        PixelLayout::Rgba8 => ColorType::Rgba8,
    };
    WebPEncoder::new(writer)
        .encode(raster.data(), raster.width(), raster.height(), color_type)
        .map_err(|e| IoError::EncodeError(format!("WebP encode error: {}", e)))
}
