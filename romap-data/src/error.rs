//! Error types for point cloud conversion, filtering and storage.

use thiserror::Error;

/// Errors raised by the conversion and filter stages.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CloudError {
    #[error("vertex count {actual} does not match a {width}x{height} grid (expected {expected})")]
    InvalidInputShape {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error("invalid filter range [{low}, {high}]")]
    InvalidRange { low: f32, high: f32 },

    #[error("{count} points do not fit in a u32 cloud width")]
    TooManyPoints { count: usize },
}

/// Errors raised while reading or writing PCD files.
#[derive(Debug, Error)]
pub enum PcdError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PCD header is missing {0}")]
    MissingHeader(&'static str),

    #[error("invalid PCD header value for {key}: {value}")]
    InvalidHeader { key: &'static str, value: String },

    #[error("unsupported PCD feature: {0}")]
    Unsupported(String),

    #[error("invalid PCD data on line {line}: {reason}")]
    InvalidData { line: usize, reason: String },

    #[error("PCD header declares {declared} points but {actual} were read")]
    PointCountMismatch { declared: usize, actual: usize },

    #[error(transparent)]
    Cloud(#[from] CloudError),
}
