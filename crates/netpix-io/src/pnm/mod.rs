//! NetPBM (Portable Any Map) format support
//!
//! Reads and writes all six NetPBM sub-formats:
//!
//! | Magic | Kind | Body |
//! |---|---|---|
//! | `P1` | bitmap | ASCII `0`/`1`, `1` is black |
//! | `P2` | graymap | ASCII integers up to max value |
//! | `P3` | pixmap | ASCII R G B triples |
//! | `P4` | bitmap | packed bits, MSB first, rows padded to a byte |
//! | `P5` | graymap | raw bytes, max value 255 only |
//! | `P6` | pixmap | raw RGB bytes, max value 255 only |
//!
//! Decoding is driven by an explicit state machine ([`ParseState`]) over
//! whitespace-delimited tokens. `#` comments are collected in order into
//! a [`CommentList`].

mod decode;
mod encode;
mod token;

pub use decode::{Header, ParseState};
pub use encode::{encode_pnm, write_pnm};

use crate::{IoError, IoResult};
use netpix_core::{PixelLayout, Raster};
use std::io::{BufRead, Seek, SeekFrom};
use token::{Tokenizer, is_pnm_space};

/// Ordered comment strings from a NetPBM stream, without the leading `#`.
pub type CommentList = Vec<String>;

/// The six NetPBM sub-formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PnmFormat {
    /// ASCII bitmap
    P1,
    /// ASCII graymap
    P2,
    /// ASCII pixmap
    P3,
    /// Binary bitmap
    P4,
    /// Binary graymap
    P5,
    /// Binary pixmap
    P6,
}

impl PnmFormat {
    /// All sub-formats in magic-number order.
    pub const ALL: [PnmFormat; 6] = [
        PnmFormat::P1,
        PnmFormat::P2,
        PnmFormat::P3,
        PnmFormat::P4,
        PnmFormat::P5,
        PnmFormat::P6,
    ];

    /// The two-byte magic number.
    pub fn magic(self) -> &'static str {
        match self {
            PnmFormat::P1 => "P1",
            PnmFormat::P2 => "P2",
            PnmFormat::P3 => "P3",
            PnmFormat::P4 => "P4",
            PnmFormat::P5 => "P5",
            PnmFormat::P6 => "P6",
        }
    }

    /// Look up a sub-format by its magic token.
    pub fn from_magic(token: &[u8]) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|f| f.magic().as_bytes() == token)
    }

    /// Conventional file extension.
    pub fn extension(self) -> &'static str {
        match self {
            PnmFormat::P1 | PnmFormat::P4 => "pbm",
            PnmFormat::P2 | PnmFormat::P5 => "pgm",
            PnmFormat::P3 | PnmFormat::P6 => "ppm",
        }
    }

    /// Whether the body is ASCII text.
    pub fn is_plain(self) -> bool {
        matches!(self, PnmFormat::P1 | PnmFormat::P2 | PnmFormat::P3)
    }

    /// Whether this is a bitmap format (no max value in the header).
    pub fn is_bitmap(self) -> bool {
        matches!(self, PnmFormat::P1 | PnmFormat::P4)
    }

    /// Samples per pixel in the body.
    pub fn samples_per_pixel(self) -> usize {
        match self {
            PnmFormat::P3 | PnmFormat::P6 => 3,
            _ => 1,
        }
    }

    /// Layout of the decoded raster.
    pub fn layout(self) -> PixelLayout {
        match self {
            PnmFormat::P3 | PnmFormat::P6 => PixelLayout::Rgb8,
            _ => PixelLayout::Gray8,
        }
    }

    /// Binary format that stores a raster of `layout` without loss.
    pub fn for_layout(layout: PixelLayout) -> Self {
        match layout {
            PixelLayout::Gray8 => PnmFormat::P5,
            PixelLayout::Rgb8 | PixelLayout::Rgba8 => PnmFormat::P6,
        }
    }
}

impl std::fmt::Display for PnmFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.magic())
    }
}

/// A decoded NetPBM image
#[derive(Debug, Clone)]
pub struct PnmImage {
    /// Sub-format the stream declared
    pub format: PnmFormat,
    /// Decoded pixels: Gray8 for P1/P2/P4/P5, Rgb8 for P3/P6
    pub raster: Raster,
    /// Comments in stream order
    pub comments: CommentList,
}

/// Identify the sub-format from the first token of a stream.
///
/// # Errors
///
/// Returns [`IoError::UnknownFormat`] if the first token is not `P1`..`P6`.
pub fn sniff_format(data: &[u8]) -> IoResult<PnmFormat> {
    let mut tokens = Tokenizer::new(data);
    let first = tokens.next_token();
    match first {
        Some(tok) => {
            PnmFormat::from_magic(tok.bytes).ok_or_else(|| IoError::UnknownFormat(tok.text()))
        }
        None => Err(IoError::UnknownFormat(String::new())),
    }
}

/// Decode a NetPBM image from memory, choosing the sub-parser from the
/// magic number.
pub fn decode_pnm(data: &[u8]) -> IoResult<PnmImage> {
    let format = sniff_format(data)?;
    decode_pnm_as(data, format)
}

/// Decode a NetPBM image that must be of sub-format `format`.
///
/// The stream is read from its first byte, so the magic number itself is
/// checked against `format`.
///
/// # Errors
///
/// Returns [`IoError::Format`] if the stream declares another magic
/// number, or any other decode error.
pub fn decode_pnm_as(data: &[u8], format: PnmFormat) -> IoResult<PnmImage> {
    decode::decode(data, format)
}

/// Read a NetPBM image from a seekable reader.
///
/// The first token, ended by whitespace or a `#` comment, selects the
/// sub-format; the reader is then rewound so the chosen parser re-reads
/// the magic number.
pub fn read_pnm<R: BufRead + Seek>(mut reader: R) -> IoResult<PnmImage> {
    let start = reader.stream_position()?;
    let magic = read_first_token(&mut reader)?;
    let format = PnmFormat::from_magic(&magic)
        .ok_or_else(|| IoError::UnknownFormat(String::from_utf8_lossy(&magic).into_owned()))?;

    reader.seek(SeekFrom::Start(start))?;
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;
    decode_pnm_as(&data, format)
}

fn read_first_token<R: BufRead>(reader: &mut R) -> IoResult<Vec<u8>> {
    let mut token = Vec::new();
    let mut byte = [0u8; 1];
    loop {
        if reader.read(&mut byte)? == 0 {
            break;
        }
        if byte[0] == b'#' {
            if !token.is_empty() {
                break;
            }
            let mut comment = Vec::new();
            reader.read_until(b'\n', &mut comment)?;
            continue;
        }
        if is_pnm_space(byte[0]) {
            if token.is_empty() {
                continue;
            }
            break;
        }
        token.push(byte[0]);
        // Magic numbers are two bytes; stop early on binary junk.
        if token.len() > 2 {
            break;
        }
    }
    Ok(token)
}
