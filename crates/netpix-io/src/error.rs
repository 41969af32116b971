//! I/O error types
//!
//! Provides a unified error type for all image I/O operations. NetPBM
//! decoding failures carry the offending token so callers can report
//! exactly where a stream went wrong. Codec bridges map their
//! underlying library errors into `DecodeError` / `EncodeError`.

use thiserror::Error;

/// Error type for image I/O operations.
#[derive(Error, Debug)]
pub enum IoError {
    /// Standard I/O error (file not found, permission denied, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A header or pixel token is malformed or out of place
    #[error("format error: expected {expected}, found {found:?}")]
    Format { expected: String, found: String },

    /// The stream does not start with a known magic number
    #[error("unknown format: {0:?}")]
    UnknownFormat(String),

    /// Non-positive dimensions or an unsupported max value
    #[error("dimension error: {0}")]
    Dimension(String),

    /// Fewer pixel tokens or bytes than the header declares
    #[error("truncated data: expected {expected}, found {found}")]
    TruncatedData { expected: usize, found: usize },

    /// A pixel value exceeds the declared max value
    #[error("value {value} out of range (max {max})")]
    Range { value: u64, max: u32 },

    /// The image format is not supported or not enabled via features
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// A format-specific decoder returned an error
    #[error("decode error: {0}")]
    DecodeError(String),

    /// A format-specific encoder returned an error
    #[error("encode error: {0}")]
    EncodeError(String),

    /// The decode queue worker has shut down
    #[error("decode queue closed")]
    QueueClosed,

    /// The decode queue slot is occupied
    #[error("decode queue full")]
    QueueFull,

    /// An error from the core library
    #[error("core error: {0}")]
    Core(#[from] netpix_core::Error),
}

impl IoError {
    pub(crate) fn format(expected: impl Into<String>, found: impl Into<String>) -> Self {
        IoError::Format {
            expected: expected.into(),
            found: found.into(),
        }
    }
}

/// Convenience alias for I/O results.
pub type IoResult<T> = Result<T, IoError>;
