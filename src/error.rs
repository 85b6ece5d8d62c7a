//! Error types shared by all pipeline stages.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for harness operations
pub type HarnessResult<T> = Result<T, HarnessError>;

/// Errors that end a pipeline stage
#[derive(Error, Debug)]
pub enum HarnessError {
    /// A required input (video, frames directory, results file) does not exist
    #[error("{what} not found: {}", .path.display())]
    MissingInput { what: &'static str, path: PathBuf },

    /// The frames directory exists but holds no frame images
    #[error("No frame files found in {}", .path.display())]
    EmptyInput { path: PathBuf },

    /// The results document holds no analyses to summarize
    #[error("No analyses recorded in {}", .path.display())]
    EmptyReport { path: PathBuf },

    /// The video could not be opened or probed
    #[error("Could not open video: {0}")]
    VideoOpen(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

impl HarnessError {
    pub fn missing(what: &'static str, path: impl Into<PathBuf>) -> Self {
        HarnessError::MissingInput {
            what,
            path: path.into(),
        }
    }

    /// Whether this error is a precondition failure rather than a fault
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            HarnessError::MissingInput { .. }
                | HarnessError::EmptyInput { .. }
                | HarnessError::EmptyReport { .. }
        )
    }
}
