//! NetPBM encoding
//!
//! Any raster can be written in any sub-format. Bitmaps set a bit for
//! every pixel whose luminance is below 128; graymaps store luminance;
//! pixmaps store RGB and drop alpha. Comments are written as `#` lines
//! directly after the magic number.

use super::PnmFormat;
use crate::{IoError, IoResult};
use netpix_core::{BITMAP_CUTOFF, Raster};
use std::io::Write;

/// Longest line written in a plain body.
const MAX_LINE_LEN: usize = 70;

/// Encode a raster as NetPBM into a byte vector.
pub fn encode_pnm(raster: &Raster, format: PnmFormat, comments: &[String]) -> IoResult<Vec<u8>> {
    let mut out = Vec::new();
    write_pnm(raster, format, comments, &mut out)?;
    Ok(out)
}

/// Write a raster as NetPBM.
///
/// # Errors
///
/// Returns [`IoError::EncodeError`] if a comment contains a line break,
/// or [`IoError::Io`] if the writer fails.
pub fn write_pnm<W: Write>(
    raster: &Raster,
    format: PnmFormat,
    comments: &[String],
    mut writer: W,
) -> IoResult<()> {
    if let Some(bad) = comments.iter().find(|c| c.contains(['\n', '\r'])) {
        return Err(IoError::EncodeError(format!(
            "comment contains a line break: {bad:?}"
        )));
    }

    let mut header = format!("{}\n", format.magic());
    for comment in comments {
        header.push('#');
        header.push_str(comment);
        header.push('\n');
    }
    header.push_str(&format!("{} {}\n", raster.width(), raster.height()));
    if !format.is_bitmap() {
        header.push_str("255\n");
    }
    writer.write_all(header.as_bytes())?;

    let body = match format {
        PnmFormat::P1 => plain_body(raster, |r, x, y| {
            let set = r.get_gray_unchecked(x, y) < BITMAP_CUTOFF;
            vec![u16::from(set)]
        }),
        PnmFormat::P2 => plain_body(raster, |r, x, y| vec![r.get_gray_unchecked(x, y) as u16]),
        PnmFormat::P3 => plain_body(raster, |r, x, y| {
            let (red, green, blue, _) = r.get_rgba_unchecked(x, y);
            vec![red as u16, green as u16, blue as u16]
        }),
        PnmFormat::P4 => packed_bits(raster),
        PnmFormat::P5 => raster.luminance_values(),
        PnmFormat::P6 => {
            let mut body = Vec::with_capacity(raster.pixel_count() * 3);
            for y in 0..raster.height() {
                for x in 0..raster.width() {
                    let (r, g, b, _) = raster.get_rgba_unchecked(x, y);
                    body.extend_from_slice(&[r, g, b]);
                }
            }
            body
        }
    };
    writer.write_all(&body)?;
    writer.flush()?;
    Ok(())
}

/// Plain body, one or more lines per row, each at most 70 characters.
fn plain_body<F>(raster: &Raster, mut samples: F) -> Vec<u8>
where
    F: FnMut(&Raster, u32, u32) -> Vec<u16>,
{
    let mut out = Vec::new();
    for y in 0..raster.height() {
        let mut line_len = 0;
        for x in 0..raster.width() {
            for value in samples(raster, x, y) {
                let text = value.to_string();
                if line_len > 0 && line_len + 1 + text.len() > MAX_LINE_LEN {
                    out.push(b'\n');
                    line_len = 0;
                } else if line_len > 0 {
                    out.push(b' ');
                    line_len += 1;
                }
                out.extend_from_slice(text.as_bytes());
                line_len += text.len();
            }
        }
        out.push(b'\n');
    }
    out
}

fn packed_bits(raster: &Raster) -> Vec<u8> {
    let width = raster.width() as usize;
    let row_bytes = width.div_ceil(8);
    let mut out = vec![0u8; row_bytes * raster.height() as usize];
    for (y, row) in out.chunks_exact_mut(row_bytes).enumerate() {
        for x in 0..width {
            if raster.get_gray_unchecked(x as u32, y as u32) < BITMAP_CUTOFF {
                row[x / 8] |= 0x80 >> (x % 8);
            }
        }
    }
    out
}
