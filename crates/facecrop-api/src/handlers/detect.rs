//! Face bounding-box detection handler.

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use facecrop_models::NormalizedRect;
use facecrop_vision::{decode_image_payload, detect_primary_face};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::state::AppState;

/// Detection request body.
#[derive(Debug, Deserialize)]
pub struct DetectFaceRequest {
    /// Data URL or bare base64 image.
    #[serde(default)]
    pub image: Option<String>,
}

/// Detection success response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectFaceResponse {
    pub success: bool,
    /// First face, normalized to the image size.
    pub face_bounding_box: NormalizedRect,
}

/// Detect the first face in a posted image.
///
/// The body is parsed by hand so that a missing or non-JSON content type
/// does not change the outcome.
pub async fn detect_face(State(state): State<AppState>, body: Bytes) -> ApiResult<Json<DetectFaceResponse>> {
    let result = run_detection(&state, &body).await;

    let outcome = match &result {
        Ok(_) => "found",
        Err(ApiError::BadRequest(_)) => "invalid",
        Err(ApiError::NotFound(_)) => "not_found",
        Err(e) => {
            error!(error = %e, "Error detecting face");
            "error"
        }
    };
    metrics::record_face_detection(outcome);

    result.map(Json)
}

async fn run_detection(state: &AppState, body: &[u8]) -> ApiResult<DetectFaceResponse> {
    let request: DetectFaceRequest = serde_json::from_slice(body)?;

    let image = match request.image {
        Some(image) if !image.is_empty() => image,
        _ => return Err(ApiError::bad_request("No image provided")),
    };

    let bytes = decode_image_payload(&image)?;
    let face = detect_primary_face(state.vision.as_ref(), &bytes)
        .await?
        .ok_or_else(|| ApiError::not_found("No faces detected"))?;

    info!(
        bytes = bytes.len(),
        x = face.x,
        y = face.y,
        width = face.width,
        height = face.height,
        "Face detected"
    );

    Ok(DetectFaceResponse {
        success: true,
        face_bounding_box: face,
    })
}
