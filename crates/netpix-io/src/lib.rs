//! netpix-io - Image I/O for netpix
//!
//! The NetPBM family (P1-P6) is always available and is decoded by a
//! hand-written state machine that also returns header comments. PNG,
//! JPEG and WebP are bridged to their codec crates behind cargo features:
//!
//! | Feature | Formats |
//! |---|---|
//! | `png-format` (default) | PNG |
//! | `jpeg` (default) | JPEG |
//! | `webp-format` | WebP |
//!
//! [`DecodeQueue`] runs decodes one at a time on a worker thread and
//! reports per-job status.

mod error;
pub mod format;
pub mod pnm;
pub mod queue;

#[cfg(feature = "jpeg")]
pub mod jpeg;
#[cfg(feature = "png-format")]
pub mod png;
#[cfg(feature = "webp-format")]
pub mod webp;

pub use error::{IoError, IoResult};
pub use format::{ImageFormat, detect_format, detect_format_from_bytes};
pub use pnm::{
    CommentList, PnmFormat, PnmImage, decode_pnm, decode_pnm_as, encode_pnm, read_pnm, write_pnm,
};
pub use queue::{DecodeQueue, DecodedImage, JobEvent, JobId, JobStatus};

use netpix_core::Raster;
use std::fs;
use std::io::Cursor;
use std::path::Path;

/// Read an image file, detecting its format from the content.
pub fn read_image<P: AsRef<Path>>(path: P) -> IoResult<Raster> {
    let data = fs::read(path)?;
    read_image_mem(&data)
}

/// Decode an in-memory image, detecting its format from the content.
pub fn read_image_mem(data: &[u8]) -> IoResult<Raster> {
    let format = detect_format_from_bytes(data)?;
    read_image_format(data, format)
}

/// Decode an in-memory image of a known format.
///
/// NetPBM comments are discarded; use [`decode_pnm`] to keep them.
pub fn read_image_format(data: &[u8], format: ImageFormat) -> IoResult<Raster> {
    match format {
        ImageFormat::Pnm(f) => Ok(decode_pnm_as(data, f)?.raster),
        #[cfg(feature = "png-format")]
        ImageFormat::Png => png::read_png(Cursor::new(data)),
        #[cfg(feature = "jpeg")]
        ImageFormat::Jpeg => jpeg::read_jpeg(Cursor::new(data)),
        #[cfg(feature = "webp-format")]
        ImageFormat::WebP => webp::read_webp(Cursor::new(data)),
        #[allow(unreachable_patterns)]
        other => Err(unsupported(other)),
    }
}

/// Write an image file in the given format.
pub fn write_image<P: AsRef<Path>>(raster: &Raster, path: P, format: ImageFormat) -> IoResult<()> {
    let data = write_image_mem(raster, format)?;
    fs::write(path, data)?;
    Ok(())
}

/// Encode an image into memory in the given format.
pub fn write_image_mem(raster: &Raster, format: ImageFormat) -> IoResult<Vec<u8>> {
    let mut out = Vec::new();
    match format {
        ImageFormat::Pnm(f) => write_pnm(raster, f, &[], &mut out)?,
        #[cfg(feature = "png-format")]
        ImageFormat::Png => png::write_png(raster, &mut out)?,
        #[cfg(feature = "jpeg")]
        ImageFormat::Jpeg => jpeg::write_jpeg(raster, &mut out)?,
        #[cfg(feature = "webp-format")]
        ImageFormat::WebP => webp::write_webp(raster, &mut out)?,
        #[allow(unreachable_patterns)]
        other => return Err(unsupported(other)),
    }
    Ok(out)
}

fn unsupported(format: ImageFormat) -> IoError {
    IoError::UnsupportedFormat(format!(
        "{:?} support is not enabled in this build",
        format
    ))
}
