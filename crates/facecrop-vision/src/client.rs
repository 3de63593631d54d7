//! AWS Rekognition client implementation.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_credential_types::Credentials;
use aws_sdk_rekognition::config::Builder;
use aws_sdk_rekognition::primitives::Blob;
use aws_sdk_rekognition::types::{Attribute, FaceDetail, Image};
use aws_sdk_rekognition::Client;
use aws_types::region::Region;
use facecrop_models::NormalizedRect;
use tracing::{debug, info, warn};

use crate::config::VisionConfig;
use crate::error::{VisionError, VisionResult};
use crate::service::FaceDetectionService;

/// Face detection backed by Rekognition `DetectFaces`.
#[derive(Clone)]
pub struct RekognitionFaceService {
    client: Option<Client>,
    missing: Vec<&'static str>,
}

impl RekognitionFaceService {
    /// Build the client when the configuration is complete.
    ///
    /// An incomplete configuration still yields a service; its requests fail
    /// with [`VisionError::NotConfigured`].
    pub fn new(config: VisionConfig) -> Self {
        let missing = config.missing_settings();
        let (Some(region), Some(access_key_id), Some(secret_access_key)) =
            (config.region, config.access_key_id, config.secret_access_key)
        else {
            warn!(missing = ?missing, "Rekognition not configured, face detection requests will fail");
            return Self { client: None, missing };
        };

        let credentials = Credentials::new(access_key_id, secret_access_key, config.session_token, None, "env");

        let mut builder = Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(region.clone()))
            .credentials_provider(credentials);
        builder.set_endpoint_url(config.endpoint_url);
        let sdk_config = builder.build();

        info!(region = %region, "Rekognition client ready");

        Self {
            client: Some(Client::from_conf(sdk_config)),
            missing,
        }
    }

    /// Create from environment variables.
    pub fn from_env() -> Self {
        Self::new(VisionConfig::from_env())
    }

    fn client(&self) -> VisionResult<&Client> {
        self.client
            .as_ref()
            .ok_or_else(|| VisionError::NotConfigured(self.missing.join(", ")))
    }
}

/// Normalized box of a face detail; absent components read as zero.
fn face_rect(detail: &FaceDetail) -> Option<NormalizedRect> {
    let bbox = detail.bounding_box()?;
    Some(NormalizedRect::new(
        bbox.left().unwrap_or_default(),
        bbox.top().unwrap_or_default(),
        bbox.width().unwrap_or_default(),
        bbox.height().unwrap_or_default(),
    ))
}

/// Boxes in detection order, up to the first face reported without one.
fn face_rects(details: &[FaceDetail]) -> Vec<NormalizedRect> {
    details.iter().map_while(face_rect).collect()
}

#[async_trait]
impl FaceDetectionService for RekognitionFaceService {
    async fn detect_faces(&self, image: &[u8]) -> VisionResult<Vec<NormalizedRect>> {
        let client = self.client()?;
        debug!(bytes = image.len(), "Sending DetectFaces request");

        let response = client
            .detect_faces()
            .image(Image::builder().bytes(Blob::new(image)).build())
            .attributes(Attribute::Default)
            .send()
            .await
            .map_err(|e| VisionError::request_failed(e.to_string()))?;

        let faces = face_rects(response.face_details());
        debug!(faces = faces.len(), "DetectFaces returned");
        Ok(faces)
    }

    fn missing_settings(&self) -> Vec<&'static str> {
        self.missing.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_rekognition::types::BoundingBox;

    #[tokio::test]
    async fn test_unconfigured_service_fails_at_request_time() {
        let service = RekognitionFaceService::new(VisionConfig {
            region: Some("us-east-1".into()),
            ..Default::default()
        });
        assert_eq!(
            service.missing_settings(),
            vec!["AWS_ACCESS_KEY_ID", "AWS_SECRET_ACCESS_KEY"]
        );

        let err = service.detect_faces(b"jpeg").await.unwrap_err();
        assert!(matches!(err, VisionError::NotConfigured(ref m) if m.contains("AWS_ACCESS_KEY_ID")));
    }

    #[tokio::test]
    async fn test_configured_service_builds_client() {
        let service = RekognitionFaceService::new(VisionConfig {
            region: Some("eu-west-1".into()),
            access_key_id: Some("AKIDEXAMPLE".into()),
            secret_access_key: Some("secret".into()),
            ..Default::default()
        });
        assert!(service.missing_settings().is_empty());
        assert!(service.client().is_ok());
    }

    #[test]
    fn test_face_rect_passes_coordinates_through() {
        let detail = FaceDetail::builder()
            .bounding_box(
                BoundingBox::builder()
                    .left(0.1)
                    .top(0.2)
                    .width(0.3)
                    .height(0.4)
                    .build(),
            )
            .build();
        assert_eq!(face_rect(&detail), Some(NormalizedRect::new(0.1, 0.2, 0.3, 0.4)));

        let partial = FaceDetail::builder()
            .bounding_box(BoundingBox::builder().width(0.5).height(0.5).build())
            .build();
        assert_eq!(face_rect(&partial), Some(NormalizedRect::new(0.0, 0.0, 0.5, 0.5)));

        assert_eq!(face_rect(&FaceDetail::builder().build()), None);
    }

    #[test]
    fn test_face_rects_stop_at_missing_box() {
        let boxed = || {
            FaceDetail::builder()
                .bounding_box(BoundingBox::builder().width(0.2).height(0.2).build())
                .build()
        };
        let bare = FaceDetail::builder().build();

        assert!(face_rects(&[bare.clone(), boxed()]).is_empty());
        assert_eq!(
            face_rects(&[boxed(), bare, boxed()]),
            vec![NormalizedRect::new(0.0, 0.0, 0.2, 0.2)]
        );
        assert!(face_rects(&[]).is_empty());
    }
}
