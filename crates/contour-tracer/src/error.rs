//! Error types for contour tracing.
//!
//! Malformed pixel content never produces an error; it is absorbed while
//! tracing. These variants cover callers handing over inconsistent buffers or
//! configuration.

use thiserror::Error;

/// Errors raised by the tracer and label manager.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TracerError {
    /// Raster dimensions are unusable.
    #[error("invalid raster dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    /// The raster buffer does not match the stated dimensions.
    #[error("raster holds {actual} pixels but {width}x{height} needs {expected}")]
    RasterSizeMismatch {
        width: usize,
        height: usize,
        expected: usize,
        actual: usize,
    },

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl TracerError {
    /// Create a Config error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

/// Result type for tracer operations.
pub type Result<T> = std::result::Result<T, TracerError>;
