//! Error types for the Cropdesk library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Cropdesk operations.
#[derive(Debug, Error)]
pub enum CropdeskError {
    /// Error reading, writing, or listing a path.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The metadata file could not be parsed or serialized.
    #[error("JSON error for '{path}': {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Image decode or encode failure.
    #[error("Image error for '{path}': {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Crop window too large to allocate as a canvas.
    #[error("Crop size {size} exceeds the maximum of {max}")]
    CropTooLarge { size: u32, max: u32 },

    /// A filename that does not name a single entry of the image directory.
    #[error("Invalid filename: {0}")]
    InvalidFilename(String),
}

impl CropdeskError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CropdeskError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        CropdeskError::Json {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn image(path: impl Into<PathBuf>, source: image::ImageError) -> Self {
        CropdeskError::Image {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for Cropdesk operations.
pub type Result<T> = std::result::Result<T, CropdeskError>;
