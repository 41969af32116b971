//! Error types for netpix-color

use thiserror::Error;

/// Errors that can occur during binarization
#[derive(Debug, Error)]
pub enum ColorError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] netpix_core::Error),

    /// Invalid parameters
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),
}

/// Result type for binarization operations
pub type ColorResult<T> = Result<T, ColorError>;
