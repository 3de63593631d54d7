//! Face-detection service abstraction.

use std::io::Cursor;
use std::sync::Arc;

use async_trait::async_trait;
use facecrop_media::{dimensions_of, FaceDetector, MediaError, MediaResult};
use facecrop_models::{BoundingBox, NormalizedRect};
use image::{DynamicImage, ImageFormat};
use tracing::debug;

use crate::error::{VisionError, VisionResult};

/// A remote service that locates faces in encoded image bytes.
#[async_trait]
pub trait FaceDetectionService: Send + Sync {
    /// Face boxes in normalized coordinates, in the order the service reports them.
    async fn detect_faces(&self, image: &[u8]) -> VisionResult<Vec<NormalizedRect>>;

    /// Settings the service still needs before it can accept requests.
    fn missing_settings(&self) -> Vec<&'static str> {
        Vec::new()
    }
}

/// The first face the service reports, if any.
pub async fn detect_primary_face<S>(service: &S, image: &[u8]) -> VisionResult<Option<NormalizedRect>>
where
    S: FaceDetectionService + ?Sized,
{
    let faces = service.detect_faces(image).await?;
    debug!(faces = faces.len(), "Face detection completed");
    Ok(faces.into_iter().next())
}

/// Encode a decoded image as JPEG for upload.
pub fn encode_for_upload(image: &DynamicImage) -> VisionResult<Vec<u8>> {
    let rgb = DynamicImage::ImageRgb8(image.to_rgb8());
    let mut buffer = Cursor::new(Vec::new());
    rgb.write_to(&mut buffer, ImageFormat::Jpeg)
        .map_err(|e| VisionError::Encode(e.to_string()))?;
    Ok(buffer.into_inner())
}

/// Runs a [`FaceDetectionService`] as an in-process [`FaceDetector`],
/// translating normalized boxes to natural pixels.
#[derive(Clone)]
pub struct CloudFaceDetector {
    service: Arc<dyn FaceDetectionService>,
}

impl CloudFaceDetector {
    pub fn new(service: Arc<dyn FaceDetectionService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl FaceDetector for CloudFaceDetector {
    async fn detect_faces(&self, image: &DynamicImage) -> MediaResult<Vec<BoundingBox>> {
        let dims = dimensions_of(image);
        let bytes = encode_for_upload(image).map_err(|e| MediaError::detection_failed(e.to_string()))?;
        let faces = self
            .service
            .detect_faces(&bytes)
            .await
            .map_err(|e| MediaError::detection_failed(e.to_string()))?;
        Ok(faces.iter().map(|f| f.to_pixels(dims)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedService(Vec<NormalizedRect>);

    #[async_trait]
    impl FaceDetectionService for FixedService {
        async fn detect_faces(&self, _image: &[u8]) -> VisionResult<Vec<NormalizedRect>> {
            Ok(self.0.clone())
        }
    }

    struct DownService;

    #[async_trait]
    impl FaceDetectionService for DownService {
        async fn detect_faces(&self, _image: &[u8]) -> VisionResult<Vec<NormalizedRect>> {
            Err(VisionError::request_failed("throttled"))
        }
    }

    #[tokio::test]
    async fn test_primary_face_is_first() {
        let service = FixedService(vec![
            NormalizedRect::new(0.1, 0.2, 0.3, 0.4),
            NormalizedRect::new(0.5, 0.5, 0.1, 0.1),
        ]);
        let face = detect_primary_face(&service, b"img").await.unwrap();
        assert_eq!(face, Some(NormalizedRect::new(0.1, 0.2, 0.3, 0.4)));

        let empty = FixedService(Vec::new());
        assert_eq!(detect_primary_face(&empty, b"img").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_cloud_detector_maps_to_pixels() {
        let detector = CloudFaceDetector::new(Arc::new(FixedService(vec![NormalizedRect::new(
            0.25, 0.5, 0.5, 0.25,
        )])));
        let image = DynamicImage::new_rgb8(200, 100);
        let boxes = detector.detect_faces(&image).await.unwrap();
        assert_eq!(boxes.len(), 1);
        assert!((boxes[0].x - 50.0).abs() < 1e-4);
        assert!((boxes[0].y - 50.0).abs() < 1e-4);
        assert!((boxes[0].width - 100.0).abs() < 1e-4);
        assert!((boxes[0].height - 25.0).abs() < 1e-4);
    }

    #[tokio::test]
    async fn test_cloud_detector_wraps_errors() {
        let detector = CloudFaceDetector::new(Arc::new(DownService));
        let err = detector
            .detect_faces(&DynamicImage::new_rgb8(8, 8))
            .await
            .unwrap_err();
        assert!(matches!(err, MediaError::DetectionFailed(_)));
    }

    #[test]
    fn test_encode_for_upload_is_jpeg() {
        let bytes = encode_for_upload(&DynamicImage::new_rgba8(16, 16)).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
    }
}
