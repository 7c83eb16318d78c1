//! Error types for the report engine
//!
//! Decode failures are recovered inside the engine (the affected image becomes a
//! placeholder); everything else surfaces to the caller and means no document was produced.

use thiserror::Error;

/// Error type for report generation
#[derive(Error, Debug)]
pub enum ReportError {
    /// Image bytes could not be decoded or re-encoded.
    #[error("Image error: {0}")]
    Image(String),

    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("PDF serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ReportError {
    /// Fatal errors abort the whole document; image errors never do.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, ReportError::Image(_))
    }
}

/// Result type alias for engine operations
pub type ReportResult<T> = Result<T, ReportError>;

impl From<serde_json::Error> for ReportError {
    fn from(err: serde_json::Error) -> Self {
        ReportError::Config(err.to_string())
    }
}

impl From<image::ImageError> for ReportError {
    fn from(err: image::ImageError) -> Self {
        ReportError::Image(err.to_string())
    }
}

impl From<jpeg_decoder::Error> for ReportError {
    fn from(err: jpeg_decoder::Error) -> Self {
        ReportError::Image(err.to_string())
    }
}
