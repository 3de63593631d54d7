//! Seams to external face models.
//!
//! Detection, landmarking and descriptor extraction are owned by pretrained
//! models outside this crate. These traits are the contract this crate
//! relies on; implementations wrap whatever runtime hosts the models.

use std::sync::Arc;

use async_trait::async_trait;
use facecrop_models::{BoundingBox, Descriptor};
use image::DynamicImage;

use crate::error::MediaResult;

/// Locates faces in an image.
#[async_trait]
pub trait FaceDetector: Send + Sync {
    /// Face boxes in natural pixel coordinates, in detector order.
    async fn detect_faces(&self, image: &DynamicImage) -> MediaResult<Vec<BoundingBox>>;
}

/// A face with the descriptor computed from it.
#[derive(Debug, Clone, PartialEq)]
pub struct DescribedFace {
    pub bounding_box: BoundingBox,
    pub descriptor: Descriptor,
    /// Detector confidence in `[0, 1]`.
    pub score: f32,
}

/// Detects faces and computes a descriptor for each one.
#[async_trait]
pub trait FaceDescriber: Send + Sync {
    /// Every face in the image with its descriptor, in detector order.
    async fn describe_faces(&self, image: &DynamicImage) -> MediaResult<Vec<DescribedFace>>;

    /// The most confident face, if any. Ties go to the earliest.
    async fn describe_single_face(&self, image: &DynamicImage) -> MediaResult<Option<DescribedFace>> {
        let faces = self.describe_faces(image).await?;
        Ok(faces.into_iter().reduce(|best, face| {
            if face.score.total_cmp(&best.score).is_gt() {
                face
            } else {
                best
            }
        }))
    }
}

#[async_trait]
impl<T: FaceDetector + ?Sized> FaceDetector for Arc<T> {
    async fn detect_faces(&self, image: &DynamicImage) -> MediaResult<Vec<BoundingBox>> {
        (**self).detect_faces(image).await
    }
}

#[async_trait]
impl<T: FaceDescriber + ?Sized> FaceDescriber for Arc<T> {
    async fn describe_faces(&self, image: &DynamicImage) -> MediaResult<Vec<DescribedFace>> {
        (**self).describe_faces(image).await
    }

    async fn describe_single_face(&self, image: &DynamicImage) -> MediaResult<Option<DescribedFace>> {
        (**self).describe_single_face(image).await
    }
}

/// Any describer can act as a plain detector.
pub struct DescriberDetector<D>(pub D);

#[async_trait]
impl<D: FaceDescriber> FaceDetector for DescriberDetector<D> {
    async fn detect_faces(&self, image: &DynamicImage) -> MediaResult<Vec<BoundingBox>> {
        let faces = self.0.describe_faces(image).await?;
        Ok(faces.into_iter().map(|f| f.bounding_box).collect())
    }
}
