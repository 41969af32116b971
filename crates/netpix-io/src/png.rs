//! PNG image format support

use crate::{IoError, IoResult};
use netpix_core::{PixelLayout, Raster};
use png::{BitDepth, ColorType, Decoder, Encoder, Transformations};
use std::io::{BufRead, Seek, Write};

/// Read a PNG image
///
/// Palette and low bit-depth images are expanded to 8 bits per sample and
/// 16-bit samples are stripped to 8. Gray+alpha is widened to Rgba8.
pub fn read_png<R: BufRead + Seek>(reader: R) -> IoResult<Raster> {
    let mut decoder = Decoder::new(reader);
    decoder.set_transformations(Transformations::EXPAND | Transformations::STRIP_16);
    let mut reader = decoder
        .read_info()
        .map_err(|e| IoError::DecodeError(format!("PNG decode error: {}", e)))?;

    let buf_size = reader
        .output_buffer_size()
        .ok_or_else(|| IoError::DecodeError("failed to get output buffer size".to_string()))?;
    let mut buf = vec![0; buf_size];
    let output_info = reader
        .next_frame(&mut buf)
        .map_err(|e| IoError::DecodeError(format!("PNG frame error: {}", e)))?;

    let width = output_info.width;
    let height = output_info.height;
    let (color_type, _) = reader.output_color_type();
    let (layout, samples) = match color_type {
        ColorType::Grayscale => (PixelLayout::Gray8, 1),
        ColorType::GrayscaleAlpha => (PixelLayout::Rgba8, 2),
        ColorType::Rgb => (PixelLayout::Rgb8, 3),
        ColorType::Rgba => (PixelLayout::Rgba8, 4),
        other => {
            return Err(IoError::UnsupportedFormat(format!(
                "unsupported PNG output color type: {:?}",
                other
            )));
        }
    };

    let bytes_per_row = output_info.line_size;
    let data = &buf[..output_info.buffer_size()];
    let mut pixels = Vec::with_capacity(width as usize * height as usize * layout.channels());
    for row in data.chunks_exact(bytes_per_row).take(height as usize) {
        let row = &row[..width as usize * samples];
        if color_type == ColorType::GrayscaleAlpha {
            for px in row.chunks_exact(2) {
                pixels.extend_from_slice(&[px[0], px[0], px[0], px[1]]);
            }
        } else {
            pixels.extend_from_slice(row);
        }
    }

    Ok(Raster::from_data(width, height, layout, pixels)?)
}

/// Write a PNG image
pub fn write_png<W: Write>(raster: &Raster, writer: W) -> IoResult<()> {
    let color_type = match raster.layout() {
        PixelLayout::Gray8 => ColorType::Grayscale,
        PixelLayout::Rgb8 => ColorType::Rgb,
        PixelLayout::Rgba8 => ColorType::Rgba,
    };

    let mut encoder = Encoder::new(writer, raster.width(), raster.height());
    encoder.set_color(color_type);
    encoder.set_depth(BitDepth::Eight);

    let mut writer = encoder
        .write_header()
        .map_err(|e| IoError::EncodeError(format!("PNG header error: {}", e)))?;
    writer
        .write_image_data(raster.data())
        .map_err(|e| IoError::EncodeError(format!("PNG write error: {}", e)))?;
    writer
        .finish()
        .map_err(|e| IoError::EncodeError(format!("PNG finish error: {}", e)))?;
    Ok(())
}
