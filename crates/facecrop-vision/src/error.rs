//! Vision service error types.

use thiserror::Error;

/// Result type for vision operations.
pub type VisionResult<T> = Result<T, VisionError>;

/// Errors that can occur while preparing or running cloud face detection.
#[derive(Debug, Error)]
pub enum VisionError {
    #[error("Vision service not configured, missing: {0}")]
    NotConfigured(String),

    #[error("Invalid image payload: {0}")]
    InvalidPayload(String),

    #[error("Failed to encode image for upload: {0}")]
    Encode(String),

    #[error("Face detection request failed: {0}")]
    RequestFailed(String),
}

impl VisionError {
    pub fn invalid_payload(msg: impl Into<String>) -> Self {
        Self::InvalidPayload(msg.into())
    }

    pub fn request_failed(msg: impl Into<String>) -> Self {
        Self::RequestFailed(msg.into())
    }
}
