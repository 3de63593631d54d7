//! Shared data models for FaceCrop.
//!
//! This crate provides Serde-serializable types for:
//! - Face bounding boxes in pixel and normalized units
//! - Crop regions expressed as percentages of the source image
//! - Target aspect ratios and their presets
//! - Face descriptors, reference identities and nearest-match labelling

pub mod aspect;
pub mod crop;
pub mod detection;
pub mod face;
pub mod geometry;

// Re-export common types
pub use aspect::{AspectRatio, AspectRatioParseError};
pub use crop::{CropRegion, CropUnit, PixelCrop};
pub use detection::{DetectionResult, LabeledFace};
pub use face::{Descriptor, FaceMatch, FaceMatcher, LabeledDescriptors, DEFAULT_DISTANCE_THRESHOLD, UNKNOWN_LABEL};
pub use geometry::{BoundingBox, DisplayScale, ImageDimensions};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A normalized rectangle (0.0 to 1.0) representing a relative region of an image.
///
/// Precision matches what the cloud vision service reports, so values pass
/// through to API responses unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct NormalizedRect {
    /// X coordinate of the top-left corner (0.0 = left, 1.0 = right)
    pub x: f32,
    /// Y coordinate of the top-left corner (0.0 = top, 1.0 = bottom)
    pub y: f32,
    /// Width of the rectangle (0.0 to 1.0)
    pub width: f32,
    /// Height of the rectangle (0.0 to 1.0)
    pub height: f32,
}

impl NormalizedRect {
    /// Create a new normalized rectangle.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Check if the rectangle is valid (within 0.0-1.0 range).
    pub fn is_valid(&self) -> bool {
        self.x >= 0.0
            && self.y >= 0.0
            && self.width > 0.0
            && self.height > 0.0
            && self.x + self.width <= 1.001 // Allow small epsilon for float precision
            && self.y + self.height <= 1.001
    }

    /// Map to pixel units of an image with the given dimensions.
    pub fn to_pixels(&self, dims: ImageDimensions) -> BoundingBox {
        let w = f64::from(dims.width);
        let h = f64::from(dims.height);
        BoundingBox::new(
            f64::from(self.x) * w,
            f64::from(self.y) * h,
            f64::from(self.width) * w,
            f64::from(self.height) * h,
        )
    }
}
