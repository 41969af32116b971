//! NetPBM decoding state machine
//!
//! Every sub-format walks the same states in the same order:
//!
//! ```text
//! MagicNumber -> Dimensions{width: None} -> Dimensions{width: Some(w)}
//!             -> MaxValue{..}   (P2, P3, P5, P6 only)
//!             -> Pixels(header)
//! ```
//!
//! Each header token is fed to [`ParseState::advance`], which either
//! returns the next state or rejects the token. Once the state reaches
//! [`ParseState::Pixels`] the body is decoded according to the header:
//! plain formats keep tokenizing, binary formats consume exactly one
//! whitespace byte and then read raw bytes. The body must hold exactly
//! the declared number of samples.

use super::token::{Token, Tokenizer};
use super::{PnmFormat, PnmImage};
use crate::{IoError, IoResult};
use netpix_core::Raster;
use tracing::{debug, warn};

/// Largest max value a plain header may declare.
const MAX_PLAIN_VALUE: u64 = 65535;

/// Decoded header fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Sub-format
    pub format: PnmFormat,
    /// Width in pixels (> 0)
    pub width: u32,
    /// Height in pixels (> 0)
    pub height: u32,
    /// Max sample value; 1 for bitmaps
    pub max_value: u32,
}

impl Header {
    /// Number of samples the body must contain.
    fn sample_count(&self) -> IoResult<usize> {
        (self.width as usize)
            .checked_mul(self.height as usize)
            .and_then(|n| n.checked_mul(self.format.samples_per_pixel()))
            .ok_or_else(|| {
                IoError::Dimension(format!("image {}x{} too large", self.width, self.height))
            })
    }
}

/// Header parsing state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseState {
    /// Waiting for `P1`..`P6`
    MagicNumber,
    /// Waiting for width, then height
    Dimensions { width: Option<u32> },
    /// Waiting for the max value
    MaxValue { width: u32, height: u32 },
    /// Header complete; the body follows
    Pixels(Header),
}

impl ParseState {
    /// Name of the token this state is waiting for.
    pub fn expects(&self) -> &'static str {
        match self {
            ParseState::MagicNumber => "magic number",
            ParseState::Dimensions { width: None } => "width",
            ParseState::Dimensions { width: Some(_) } => "height",
            ParseState::MaxValue { .. } => "max value",
            ParseState::Pixels(_) => "pixel data",
        }
    }

    /// Feed one header token for a stream of sub-format `format`.
    ///
    /// # Errors
    ///
    /// - [`IoError::Format`] for a wrong magic number, a non-numeric
    ///   header field, or any token fed once the header is complete
    /// - [`IoError::Dimension`] for a non-positive width/height or an
    ///   unsupported max value
    pub fn advance(self, format: PnmFormat, token: &[u8]) -> IoResult<ParseState> {
        let token = Token { bytes: token };
        match self {
            ParseState::MagicNumber => on_magic(format, token),
            ParseState::Dimensions { width } => on_dimension(format, width, token),
            ParseState::MaxValue { width, height } => on_max_value(format, width, height, token),
            ParseState::Pixels(_) => Err(IoError::format("end of header", token.text())),
        }
    }
}

fn on_magic(format: PnmFormat, token: Token<'_>) -> IoResult<ParseState> {
    if token.bytes != format.magic().as_bytes() {
        return Err(IoError::format(format.magic(), token.text()));
    }
    Ok(ParseState::Dimensions { width: None })
}

fn on_dimension(format: PnmFormat, width: Option<u32>, token: Token<'_>) -> IoResult<ParseState> {
    let field = if width.is_none() { "width" } else { "height" };
    let value = token
        .signed_number()
        .ok_or_else(|| IoError::format(field, token.text()))?;
    if value <= 0 {
        return Err(IoError::Dimension(format!(
            "{field} must be positive, got {value}"
        )));
    }
    let value = u32::try_from(value)
        .map_err(|_| IoError::Dimension(format!("{field} {value} too large")))?;

    Ok(match width {
        None => ParseState::Dimensions { width: Some(value) },
        Some(width) if format.is_bitmap() => ParseState::Pixels(Header {
            format,
            width,
            height: value,
            max_value: 1,
        }),
        Some(width) => ParseState::MaxValue {
            width,
            height: value,
        },
    })
}

fn on_max_value(
    format: PnmFormat,
    width: u32,
    height: u32,
    token: Token<'_>,
) -> IoResult<ParseState> {
    let value = token
        .number()
        .ok_or_else(|| IoError::format("max value", token.text()))?;
    if value == 0 || value > MAX_PLAIN_VALUE {
        return Err(IoError::Dimension(format!(
            "max value must be in 1..={MAX_PLAIN_VALUE}, got {value}"
        )));
    }
    if !format.is_plain() && value != 255 {
        return Err(IoError::Dimension(format!(
            "unsupported max value {value} for {format}; only 255 is supported"
        )));
    }
    Ok(ParseState::Pixels(Header {
        format,
        width,
        height,
        max_value: value as u32,
    }))
}

/// Decode a complete stream of sub-format `format`.
pub(super) fn decode(data: &[u8], format: PnmFormat) -> IoResult<PnmImage> {
    let mut tokens = Tokenizer::new(data);
    let header = read_header(&mut tokens, format)?;

    let samples = if format.is_plain() {
        decode_plain(&mut tokens, &header)?
    } else {
        let crlf = tokens.remaining().starts_with(b"\r\n");
        if !tokens.consume_header_terminator() {
            let found = match tokens.remaining().first() {
                Some(b) => format!("byte 0x{b:02x}"),
                None => "end of data".to_string(),
            };
            return Err(IoError::format("whitespace after header", found));
        }
        let body = tokens.remaining();
        if crlf && body.len() == header_body_len(&header)? + 1 {
            // The '\n' of a CRLF terminator would be read as the first sample.
            return Err(IoError::format(
                "single whitespace byte after header",
                "CRLF line ending",
            ));
        }
        decode_binary(body, &header)?
    };

    let raster = Raster::from_data(header.width, header.height, format.layout(), samples)?;
    let comments = tokens.into_comments();
    debug!(
        format = %format,
        width = header.width,
        height = header.height,
        comments = comments.len(),
        "decoded NetPBM image"
    );
    Ok(PnmImage {
        format,
        raster,
        comments,
    })
}

fn read_header(tokens: &mut Tokenizer<'_>, format: PnmFormat) -> IoResult<Header> {
    let mut state = ParseState::MagicNumber;
    loop {
        if let ParseState::Pixels(header) = state {
            return Ok(header);
        }
        let token = tokens
            .next_token()
            .ok_or_else(|| IoError::format(state.expects(), "end of data"))?;
        state = state.advance(format, token.bytes)?;
    }
}

/// Scale a sample from `0..=max` to `0..=255`, rounding to nearest.
#[inline]
fn scale_sample(value: u64, max: u32) -> u8 {
    if max == 255 {
        return value as u8;
    }
    let max = max as u64;
    ((value * 255 + max / 2) / max) as u8
}

fn decode_plain(tokens: &mut Tokenizer<'_>, header: &Header) -> IoResult<Vec<u8>> {
    let expected = header.sample_count()?;
    let max = header.max_value;
    if !header.format.is_bitmap() && max != 255 {
        warn!(
            max_value = max,
            format = %header.format,
            "scaling samples to 8 bits"
        );
    }

    let mut samples = Vec::new();
    while let Some(token) = tokens.next_token() {
        if header.format == PnmFormat::P1 {
            // Bitmap digits may be packed without separators.
            for &b in token.bytes {
                let bit = match b {
                    b'0' | b'1' => b - b'0',
                    b'2'..=b'9' => {
                        return Err(IoError::Range {
                            value: (b - b'0') as u64,
                            max: 1,
                        });
                    }
                    _ => return Err(IoError::format("bit 0 or 1", token.text())),
                };
                if samples.len() == expected {
                    return Err(IoError::format("end of data", token.text()));
                }
                samples.push(if bit == 1 { 0 } else { 255 });
            }
        } else {
            if samples.len() == expected {
                return Err(IoError::format("end of data", token.text()));
            }
            let value = token
                .number()
                .ok_or_else(|| IoError::format("pixel value", token.text()))?;
            if value > max as u64 {
                return Err(IoError::Range { value, max });
            }
            samples.push(scale_sample(value, max));
        }
    }

    if samples.len() < expected {
        return Err(IoError::TruncatedData {
            expected,
            found: samples.len(),
        });
    }
    Ok(samples)
}

/// Byte length of a binary body.
fn header_body_len(header: &Header) -> IoResult<usize> {
    let width = header.width as usize;
    let height = header.height as usize;
    match header.format {
        PnmFormat::P4 => width
            .div_ceil(8)
            .checked_mul(height)
            .ok_or_else(|| IoError::Dimension(format!("image {width}x{height} too large"))),
        _ => header.sample_count(),
    }
}

fn decode_binary(body: &[u8], header: &Header) -> IoResult<Vec<u8>> {
    let width = header.width as usize;
    let height = header.height as usize;
    let expected = header_body_len(header)?;

    if body.len() < expected {
        return Err(IoError::TruncatedData {
            expected,
            found: body.len(),
        });
    }
    if body.len() > expected {
        return Err(IoError::format(
            "end of data",
            format!("{} trailing bytes", body.len() - expected),
        ));
    }

    if header.format != PnmFormat::P4 {
        return Ok(body.to_vec());
    }

    // Each row starts on a fresh byte; padding bits are dropped.
    let row_bytes = width.div_ceil(8);
    let mut samples = Vec::with_capacity(width * height);
    for row in body.chunks_exact(row_bytes) {
        for x in 0..width {
            let bit = (row[x / 8] >> (7 - (x % 8))) & 1;
            samples.push(if bit == 1 { 0 } else { 255 });
        }
    }
    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pnm::decode_pnm;
    use netpix_core::PixelLayout;

    #[test]
    fn test_state_transitions_bitmap() {
        let s = ParseState::MagicNumber;
        let s = s.advance(PnmFormat::P1, b"P1").unwrap();
        assert_eq!(s, ParseState::Dimensions { width: None });
        let s = s.advance(PnmFormat::P1, b"4").unwrap();
        assert_eq!(s, ParseState::Dimensions { width: Some(4) });
        let s = s.advance(PnmFormat::P1, b"3").unwrap();
        assert_eq!(
            s,
            ParseState::Pixels(Header {
                format: PnmFormat::P1,
                width: 4,
                height: 3,
                max_value: 1,
            })
        );
        assert!(matches!(
            s.advance(PnmFormat::P1, b"1"),
            Err(IoError::Format { .. })
        ));
    }

    #[test]
    fn test_state_transitions_graymap() {
        let s = ParseState::MaxValue {
            width: 2,
            height: 2,
        };
        assert!(matches!(
            s.advance(PnmFormat::P2, b"15"),
            Ok(ParseState::Pixels(Header { max_value: 15, .. }))
        ));
        assert!(matches!(
            s.advance(PnmFormat::P5, b"15"),
            Err(IoError::Dimension(_))
        ));
        assert!(matches!(
            s.advance(PnmFormat::P2, b"0"),
            Err(IoError::Dimension(_))
        ));
        assert!(matches!(
            s.advance(PnmFormat::P2, b"70000"),
            Err(IoError::Dimension(_))
        ));
    }

    #[test]
    fn test_p1_example() {
        let image = decode_pnm(b"P1\n2 2\n0 1\n1 0\n").unwrap();
        let r = &image.raster;
        assert_eq!(image.format, PnmFormat::P1);
        assert_eq!(r.layout(), PixelLayout::Gray8);
        assert_eq!(r.get_gray(0, 0), Some(255));
        assert_eq!(r.get_gray(1, 0), Some(0));
        assert_eq!(r.get_gray(0, 1), Some(0));
        assert_eq!(r.get_gray(1, 1), Some(255));
        assert!(image.comments.is_empty());
    }

    #[test]
    fn test_p1_packed_digits_and_comments() {
        let image = decode_pnm(b"P1\n# made by hand\n3 1 # trailing\n010\n").unwrap();
        assert_eq!(image.comments, vec![" made by hand", " trailing"]);
        assert_eq!(image.raster.data(), &[255, 0, 255]);
    }

    #[test]
    fn test_p1_pixel_count_must_match() {
        assert!(matches!(
            decode_pnm(b"P1\n2 2\n0 1 1\n"),
            Err(IoError::TruncatedData {
                expected: 4,
                found: 3
            })
        ));
        assert!(matches!(
            decode_pnm(b"P1\n2 2\n0 1 1 0 1\n"),
            Err(IoError::Format { .. })
        ));
        assert!(matches!(
            decode_pnm(b"P1\n1 1\n2\n"),
            Err(IoError::Range { value: 2, max: 1 })
        ));
    }

    #[test]
    fn test_dimension_errors() {
        assert!(matches!(
            decode_pnm(b"P2\n0 2\n255\n"),
            Err(IoError::Dimension(_))
        ));
        assert!(matches!(
            decode_pnm(b"P2\n-4 2\n255\n"),
            Err(IoError::Dimension(_))
        ));
        assert!(matches!(
            decode_pnm(b"P2\nwide 2\n255\n"),
            Err(IoError::Format { expected, found }) if expected == "width" && found == "wide"
        ));
        assert!(matches!(
            decode_pnm(b"P2\n2"),
            Err(IoError::Format { expected, .. }) if expected == "height"
        ));
    }

    #[test]
    fn test_p2_scaling() {
        let image = decode_pnm(b"P2\n3 1\n15\n0 7 15\n").unwrap();
        // 7 * 255 / 15 = 119
        assert_eq!(image.raster.data(), &[0, 119, 255]);

        let image = decode_pnm(b"P2\n1 1\n2\n1\n").unwrap();
        // 127.5 rounds up
        assert_eq!(image.raster.data(), &[128]);
    }

    #[test]
    fn test_p2_value_above_max() {
        assert!(matches!(
            decode_pnm(b"P2\n2 1\n100\n50 101\n"),
            Err(IoError::Range {
                value: 101,
                max: 100
            })
        ));
    }

    #[test]
    fn test_p3_rgb() {
        let image = decode_pnm(b"P3\n2 1\n255\n255 0 0  0 0 255\n").unwrap();
        assert_eq!(image.raster.layout(), PixelLayout::Rgb8);
        assert_eq!(image.raster.get_rgba(0, 0), Some((255, 0, 0, 255)));
        assert_eq!(image.raster.get_rgba(1, 0), Some((0, 0, 255, 255)));
    }

    #[test]
    fn test_p4_row_padding() {
        // Width 10: two bytes per row, six padding bits ignored.
        let mut data = b"P4\n10 2\n".to_vec();
        data.extend_from_slice(&[0b1000_0000, 0b0111_1111, 0b0000_0000, 0b0100_0000]);
        let image = decode_pnm(&data).unwrap();
        let r = &image.raster;
        assert_eq!(r.get_gray(0, 0), Some(0));
        assert_eq!(r.get_gray(1, 0), Some(255));
        assert_eq!(r.get_gray(9, 0), Some(0));
        assert_eq!(r.get_gray(8, 0), Some(255));
        assert_eq!(r.get_gray(9, 1), Some(0));
        assert_eq!(r.get_gray(0, 1), Some(255));
    }

    #[test]
    fn test_p5_exact_length() {
        let mut data = b"P5\n2 2\n255\n".to_vec();
        data.extend_from_slice(&[1, 2, 3]);
        assert!(matches!(
            decode_pnm(&data),
            Err(IoError::TruncatedData {
                expected: 4,
                found: 3
            })
        ));
        data.push(4);
        let image = decode_pnm(&data).unwrap();
        assert_eq!(image.raster.data(), &[1, 2, 3, 4]);
        data.push(5);
        assert!(matches!(decode_pnm(&data), Err(IoError::Format { .. })));
    }

    #[test]
    fn test_p5_binary_body_may_look_like_whitespace() {
        // Body bytes equal to '\n' and ' ' are data, not separators.
        let mut data = b"P5 2 1 255\n".to_vec();
        data.extend_from_slice(b"\n ");
        let image = decode_pnm(&data).unwrap();
        assert_eq!(image.raster.data(), &[b'\n', b' ']);
    }

    #[test]
    fn test_p5_rejects_other_max_values() {
        assert!(matches!(
            decode_pnm(b"P5\n1 1\n65535\n\x00\x00"),
            Err(IoError::Dimension(_))
        ));
    }

    #[test]
    fn test_p6_rgb() {
        let mut data = b"P6\n1 2\n255\n".to_vec();
        data.extend_from_slice(&[10, 20, 30, 40, 50, 60]);
        let image = decode_pnm(&data).unwrap();
        assert_eq!(image.raster.get_rgba(0, 1), Some((40, 50, 60, 255)));
    }

    #[test]
    fn test_missing_header_terminator() {
        assert!(matches!(
            decode_pnm(b"P5\n1 1\n255"),
            Err(IoError::Format { expected, found }) if expected == "whitespace after header"
                && found == "end of data"
        ));
    }

    #[test]
    fn test_crlf_binary_header() {
        let mut data = b"P5\r\n2 1\r\n255\r\n".to_vec();
        data.extend_from_slice(&[1, 2]);
        assert!(matches!(
            decode_pnm(&data),
            Err(IoError::Format { found, .. }) if found == "CRLF line ending"
        ));

        // A lone '\r' terminator is still one whitespace byte.
        let mut data = b"P5\n2 1\n255\r".to_vec();
        data.extend_from_slice(&[1, 2]);
        assert_eq!(decode_pnm(&data).unwrap().raster.data(), &[1, 2]);
    }

    #[test]
    fn test_magic_mismatch() {
        assert!(matches!(
            decode(b"P2\n1 1\n255\n0\n", PnmFormat::P5),
            Err(IoError::Format { expected, found }) if expected == "P5" && found == "P2"
        ));
    }
}
