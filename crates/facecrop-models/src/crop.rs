//! Crop regions.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::geometry::{BoundingBox, ImageDimensions};

/// Unit a crop region is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub enum CropUnit {
    #[default]
    #[serde(rename = "%")]
    Percent,
}

/// Rectangle to extract from a source image, in percentages (0-100) of the
/// image width and height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CropRegion {
    #[serde(default)]
    pub unit: CropUnit,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Target aspect ratio the region was derived for, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aspect: Option<f64>,
}

impl CropRegion {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            unit: CropUnit::Percent,
            x,
            y,
            width,
            height,
            aspect: None,
        }
    }

    /// The whole image.
    pub fn full() -> Self {
        Self::new(0.0, 0.0, 100.0, 100.0)
    }

    pub fn with_aspect(mut self, aspect: f64) -> Self {
        self.aspect = Some(aspect);
        self
    }

    /// Express a pixel rectangle as a percentage region of `dims`.
    pub fn from_pixels(rect: &BoundingBox, dims: ImageDimensions) -> Self {
        let w = f64::from(dims.width.max(1));
        let h = f64::from(dims.height.max(1));
        Self::new(
            rect.x / w * 100.0,
            rect.y / h * 100.0,
            rect.width / w * 100.0,
            rect.height / h * 100.0,
        )
    }

    /// Percentage region as fractional pixels of `dims`.
    pub fn to_pixel_rect(&self, dims: ImageDimensions) -> BoundingBox {
        let w = f64::from(dims.width);
        let h = f64::from(dims.height);
        BoundingBox::new(
            self.x / 100.0 * w,
            self.y / 100.0 * h,
            self.width / 100.0 * w,
            self.height / 100.0 * h,
        )
    }

    /// Integer pixel crop inside `dims`, rounded and clamped to the image.
    pub fn to_pixels(&self, dims: ImageDimensions) -> PixelCrop {
        let rect = self.to_pixel_rect(dims);
        let max_w = f64::from(dims.width);
        let max_h = f64::from(dims.height);

        let left = rect.x.round().clamp(0.0, max_w);
        let top = rect.y.round().clamp(0.0, max_h);
        let right = rect.right().round().clamp(left, max_w);
        let bottom = rect.bottom().round().clamp(top, max_h);

        PixelCrop {
            x: left as u32,
            y: top as u32,
            width: (right - left) as u32,
            height: (bottom - top) as u32,
        }
    }

    /// True when the region has no positive area.
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

/// Integer crop rectangle in natural image pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PixelCrop {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelCrop {
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}
