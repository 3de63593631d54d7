//! Labelled detection results.

use serde::{Deserialize, Serialize};

use crate::face::{Descriptor, FaceMatch};
use crate::geometry::BoundingBox;

/// One detected face with its descriptor and best identity match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabeledFace {
    pub bounding_box: BoundingBox,
    pub descriptor: Descriptor,
    pub matched_label: FaceMatch,
}

impl LabeledFace {
    /// Text shown next to the face box.
    pub fn display_label(&self) -> String {
        self.matched_label.to_string()
    }
}

/// All faces found in one image, in detector order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    pub faces: Vec<LabeledFace>,
}

impl DetectionResult {
    pub fn new(faces: Vec<LabeledFace>) -> Self {
        Self { faces }
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    pub fn len(&self) -> usize {
        self.faces.len()
    }

    /// The first detected face, used as the crop subject.
    pub fn primary(&self) -> Option<&LabeledFace> {
        self.faces.first()
    }

    /// Faces matched to a known identity.
    pub fn recognized(&self) -> impl Iterator<Item = &LabeledFace> {
        self.faces.iter().filter(|f| !f.matched_label.is_unknown())
    }
}
