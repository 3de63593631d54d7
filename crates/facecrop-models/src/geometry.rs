//! Pixel-space geometry shared by detection and cropping.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::NormalizedRect;

/// Pixel dimensions of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

impl ImageDimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True when either side is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Axis-aligned face rectangle in pixel units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Center point `(cx, cy)`.
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn area(&self) -> f64 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    /// Scale both position and size.
    pub fn scale(&self, sx: f64, sy: f64) -> Self {
        Self::new(self.x * sx, self.y * sy, self.width * sx, self.height * sy)
    }

    /// Express this box as fractions of the given image dimensions.
    pub fn to_normalized(&self, dims: ImageDimensions) -> NormalizedRect {
        let w = f64::from(dims.width.max(1));
        let h = f64::from(dims.height.max(1));
        NormalizedRect::new(
            (self.x / w) as f32,
            (self.y / h) as f32,
            (self.width / w) as f32,
            (self.height / h) as f32,
        )
    }
}

/// Conversion between a displayed (possibly downscaled) copy of an image and
/// its natural, full-resolution pixels.
///
/// Crop derivation always runs in natural space. Detectors fed the displayed
/// copy report boxes that must go through [`DisplayScale::to_natural`] first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayScale {
    pub natural: ImageDimensions,
    pub displayed: ImageDimensions,
}

impl DisplayScale {
    pub fn new(natural: ImageDimensions, displayed: ImageDimensions) -> Self {
        Self { natural, displayed }
    }

    /// Identity scale for detectors that already see natural pixels.
    pub fn identity(natural: ImageDimensions) -> Self {
        Self::new(natural, natural)
    }

    /// `(natural_w / displayed_w, natural_h / displayed_h)`.
    pub fn factors(&self) -> (f64, f64) {
        let sx = f64::from(self.natural.width) / f64::from(self.displayed.width.max(1));
        let sy = f64::from(self.natural.height) / f64::from(self.displayed.height.max(1));
        (sx, sy)
    }

    pub fn to_natural(&self, bbox: &BoundingBox) -> BoundingBox {
        let (sx, sy) = self.factors();
        bbox.scale(sx, sy)
    }

    pub fn to_displayed(&self, bbox: &BoundingBox) -> BoundingBox {
        let (sx, sy) = self.factors();
        bbox.scale(1.0 / sx, 1.0 / sy)
    }
}
