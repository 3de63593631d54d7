//! Face descriptors and nearest-identity matching.
//!
//! Descriptors are opaque embeddings produced by an external recognition
//! model. The only operation defined on them here is Euclidean distance,
//! which is what the matcher ranks reference identities by.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Label reported when no reference identity is close enough.
pub const UNKNOWN_LABEL: &str = "unknown";

/// Distance at or above which a face is reported as unknown.
pub const DEFAULT_DISTANCE_THRESHOLD: f32 = 0.6;

/// Fixed-length face embedding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Descriptor(pub Vec<f32>);

impl Descriptor {
    pub fn new(values: Vec<f32>) -> Self {
        Self(values)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn values(&self) -> &[f32] {
        &self.0
    }

    /// Euclidean distance to another descriptor.
    pub fn euclidean_distance(&self, other: &Descriptor) -> f32 {
        self.0
            .iter()
            .zip(other.0.iter())
            .map(|(a, b)| (a - b).powi(2))
            .sum::<f32>()
            .sqrt()
    }
}

impl From<Vec<f32>> for Descriptor {
    fn from(values: Vec<f32>) -> Self {
        Self(values)
    }
}

/// Reference descriptors for one named identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledDescriptors {
    pub label: String,
    pub descriptors: Vec<Descriptor>,
}

impl LabeledDescriptors {
    pub fn new(label: impl Into<String>, descriptors: Vec<Descriptor>) -> Self {
        Self {
            label: label.into(),
            descriptors,
        }
    }

    /// Mean distance from `query` to this identity's descriptors.
    fn mean_distance(&self, query: &Descriptor) -> Option<f32> {
        if self.descriptors.is_empty() {
            return None;
        }
        let total: f32 = self
            .descriptors
            .iter()
            .map(|d| d.euclidean_distance(query))
            .sum();
        Some(total / self.descriptors.len() as f32)
    }
}

/// Best identity for a query descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceMatch {
    pub label: String,
    pub distance: f32,
}

impl FaceMatch {
    pub fn new(label: impl Into<String>, distance: f32) -> Self {
        Self {
            label: label.into(),
            distance,
        }
    }

    pub fn unknown(distance: f32) -> Self {
        Self::new(UNKNOWN_LABEL, distance)
    }

    pub fn is_unknown(&self) -> bool {
        self.label == UNKNOWN_LABEL
    }
}

/// Distance floored to two decimals, printed without padding.
fn display_distance(distance: f32) -> f64 {
    (f64::from(distance) * 100.0).floor() / 100.0
}

/// `"label (0.42)"`, e.g. `"captain-america (0.1)"` or `"unknown (0.72)"`.
///
/// A match without any reference identity to compare against prints the
/// bare label.
impl fmt::Display for FaceMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.distance.is_finite() {
            write!(f, "{} ({})", self.label, display_distance(self.distance))
        } else {
            f.write_str(&self.label)
        }
    }
}

/// Nearest-identity matcher over a fixed set of reference identities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceMatcher {
    labeled: Vec<LabeledDescriptors>,
    distance_threshold: f32,
}

impl FaceMatcher {
    pub fn new(labeled: Vec<LabeledDescriptors>) -> Self {
        Self::with_threshold(labeled, DEFAULT_DISTANCE_THRESHOLD)
    }

    pub fn with_threshold(labeled: Vec<LabeledDescriptors>, distance_threshold: f32) -> Self {
        Self {
            labeled,
            distance_threshold,
        }
    }

    pub fn identities(&self) -> &[LabeledDescriptors] {
        &self.labeled
    }

    pub fn distance_threshold(&self) -> f32 {
        self.distance_threshold
    }

    /// Closest identity regardless of threshold.
    pub fn nearest(&self, query: &Descriptor) -> Option<FaceMatch> {
        self.labeled
            .iter()
            .filter_map(|ld| ld.mean_distance(query).map(|d| FaceMatch::new(ld.label.clone(), d)))
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }

    /// Closest identity, or `unknown` when its distance is not below the threshold.
    pub fn find_best_match(&self, query: &Descriptor) -> FaceMatch {
        match self.nearest(query) {
            Some(best) if best.distance < self.distance_threshold => best,
            Some(best) => FaceMatch::unknown(best.distance),
            None => FaceMatch::unknown(f32::INFINITY),
        }
    }
}
