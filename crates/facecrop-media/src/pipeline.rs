//! Detect-then-crop pipeline.

use std::sync::Arc;

use facecrop_models::{AspectRatio, BoundingBox, CropRegion};
use image::DynamicImage;
use tracing::{debug, info};

use crate::crop::{derive_crop_region, CropPlacement};
use crate::detector::FaceDetector;
use crate::error::MediaResult;
use crate::export::dimensions_of;

/// Outcome of an automatic crop.
#[derive(Debug, Clone, PartialEq)]
pub struct AutoCrop {
    /// The face the region was built around.
    pub face: BoundingBox,
    /// Total faces reported by the detector.
    pub faces_detected: usize,
    pub region: CropRegion,
}

/// Proposes a crop around the primary face of an image.
#[derive(Clone)]
pub struct AutoCropper {
    detector: Arc<dyn FaceDetector>,
    placement: CropPlacement,
}

impl AutoCropper {
    pub fn new(detector: Arc<dyn FaceDetector>) -> Self {
        Self {
            detector,
            placement: CropPlacement::default(),
        }
    }

    pub fn with_placement(mut self, placement: CropPlacement) -> Self {
        self.placement = placement;
        self
    }

    pub fn placement(&self) -> CropPlacement {
        self.placement
    }

    /// Region for an already-known face box (natural pixels).
    pub fn region_for_face(
        &self,
        image: &DynamicImage,
        face: &BoundingBox,
        aspect: AspectRatio,
    ) -> MediaResult<CropRegion> {
        let region = derive_crop_region(face, aspect.as_f64(), dimensions_of(image))?;
        Ok(self.placement.apply(region))
    }

    /// Detect faces and derive a crop around the first one.
    ///
    /// Returns `Ok(None)` when no face is found, leaving the selection to the
    /// user.
    pub async fn auto_crop(&self, image: &DynamicImage, aspect: AspectRatio) -> MediaResult<Option<AutoCrop>> {
        let faces = self.detector.detect_faces(image).await?;
        let Some(face) = faces.first().copied() else {
            debug!("No faces detected, leaving crop to manual selection");
            return Ok(None);
        };

        let region = self.region_for_face(image, &face, aspect)?;
        info!(
            faces = faces.len(),
            aspect = %aspect,
            placement = %self.placement,
            x = region.x,
            y = region.y,
            width = region.width,
            height = region.height,
            "Derived crop region"
        );

        Ok(Some(AutoCrop {
            face,
            faces_detected: faces.len(),
            region,
        }))
    }
}
