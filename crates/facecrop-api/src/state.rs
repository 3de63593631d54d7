//! Application state.

use std::sync::Arc;

use facecrop_vision::{FaceDetectionService, RekognitionFaceService};

use crate::config::ApiConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub vision: Arc<dyn FaceDetectionService>,
}

impl AppState {
    /// Create application state with the Rekognition service from the environment.
    ///
    /// Never fails: missing cloud credentials are reported per request.
    pub fn new(config: ApiConfig) -> Self {
        Self::with_vision(config, Arc::new(RekognitionFaceService::from_env()))
    }

    /// Create application state around an existing detection service.
    pub fn with_vision(config: ApiConfig, vision: Arc<dyn FaceDetectionService>) -> Self {
        Self { config, vision }
    }
}
