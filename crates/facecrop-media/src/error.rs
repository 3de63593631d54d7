//! Error types for media operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for media operations.
pub type MediaResult<T> = Result<T, MediaError>;

/// Errors that can occur during cropping, export and face labelling.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("Invalid aspect ratio: {0}")]
    InvalidAspect(f64),

    #[error("Image has zero width or height")]
    EmptyImage,

    #[error("Crop region is empty")]
    EmptyCrop,

    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("Failed to encode image: {0}")]
    Encode(String),

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Face detection failed: {0}")]
    DetectionFailed(String),

    #[error("No face detected in {0}")]
    NoReferenceFace(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

impl MediaError {
    /// Create a detection failure error.
    pub fn detection_failed(message: impl Into<String>) -> Self {
        Self::DetectionFailed(message.into())
    }
}
