//! Error types for card preparation.

use polars::prelude::PolarsError;

/// Result type for card preparation operations
pub type PrepResult<T> = Result<T, PrepError>;

/// Error type for card preparation operations
///
/// A missing column is never an error here: column rules skip absent
/// columns. Only lookups, I/O and malformed inputs surface as errors.
#[derive(Debug, thiserror::Error)]
pub enum PrepError {
    #[error("DataFrame error: {0}")]
    Polars(#[from] PolarsError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Dataset not found: {0}")]
    DatasetNotFound(String),

    #[error("Card not found: {0}")]
    CardNotFound(String),

    #[error("Card has no image URI: {0}")]
    MissingImageUri(String),

    #[cfg(feature = "remote")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[cfg(feature = "remote")]
    #[error("Image decode error: {0}")]
    Decode(#[from] image::ImageError),
}

impl From<serde_json::Error> for PrepError {
    fn from(e: serde_json::Error) -> Self {
        PrepError::Json(e.to_string())
    }
}

impl From<serde_path_to_error::Error<serde_json::Error>> for PrepError {
    fn from(e: serde_path_to_error::Error<serde_json::Error>) -> Self {
        PrepError::Json(format!("{} at {}", e.inner(), e.path()))
    }
}
