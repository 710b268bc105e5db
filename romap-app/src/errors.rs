//! Error types for the capture program.

use romap_capture::CaptureError;
use romap_data::{CloudError, PcdError};
use romap_viewer::ViewerError;
use thiserror::Error;

/// Errors that can end a capture run.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Capture error: {0}")]
    Capture(#[from] CaptureError),

    #[error("Point cloud error: {0}")]
    Cloud(#[from] CloudError),

    #[error("PCD error: {0}")]
    Pcd(#[from] PcdError),

    #[error("Viewer error: {0}")]
    Viewer(#[from] ViewerError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Config(err.to_string())
    }
}
