//! Error types for netpix-region

use thiserror::Error;

/// Errors that can occur during region processing operations
#[derive(Debug, Error)]
pub enum RegionError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] netpix_core::Error),

    /// Invalid parameters
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    /// Point outside the raster
    #[error("point ({x}, {y}) outside {width}x{height} raster")]
    PointOutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
}

/// Result type for region operations
pub type RegionResult<T> = Result<T, RegionError>;
