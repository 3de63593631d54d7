//! Crop-region derivation around a detected face.
//!
//! A region is grown around the face center so that its dominant side is
//! twice the face's, shaped to the target aspect ratio, then kept inside the
//! image. All pixel math happens in natural (full-resolution) image space;
//! the result is stored as percentages so it applies to any rendition of the
//! same image.

use std::fmt;
use std::str::FromStr;

use facecrop_models::{BoundingBox, CropRegion, ImageDimensions};
use tracing::debug;

use crate::error::{MediaError, MediaResult};

/// Crop side length relative to the matching face side.
pub const FACE_EXPANSION: f64 = 2.0;

/// Where the final region sits in the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CropPlacement {
    /// Keep the region centered on the face (clamped to the image).
    #[default]
    FaceCentered,
    /// Keep the derived size but move the region to the middle of the image.
    ImageCentered,
}

impl CropPlacement {
    pub fn apply(&self, region: CropRegion) -> CropRegion {
        match self {
            CropPlacement::FaceCentered => region,
            CropPlacement::ImageCentered => center_in_image(&region),
        }
    }
}

impl fmt::Display for CropPlacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CropPlacement::FaceCentered => write!(f, "face"),
            CropPlacement::ImageCentered => write!(f, "image"),
        }
    }
}

impl FromStr for CropPlacement {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "face" | "face_centered" => Ok(CropPlacement::FaceCentered),
            "image" | "image_centered" | "center" => Ok(CropPlacement::ImageCentered),
            _ => Err(format!("Unknown crop placement: {s}")),
        }
    }
}

fn validate_aspect(aspect: f64) -> MediaResult<()> {
    if aspect.is_finite() && aspect > 0.0 {
        Ok(())
    } else {
        Err(MediaError::InvalidAspect(aspect))
    }
}

/// Unclamped crop rectangle centered on `face`.
///
/// For `aspect >= 1` the width is twice the face width; otherwise the height
/// is twice the face height. The other side follows from the aspect ratio.
pub fn expand_around_face(face: &BoundingBox, aspect: f64) -> MediaResult<BoundingBox> {
    validate_aspect(aspect)?;

    let (cx, cy) = face.center();
    let (width, height) = if aspect >= 1.0 {
        let w = face.width * FACE_EXPANSION;
        (w, w / aspect)
    } else {
        let h = face.height * FACE_EXPANSION;
        (h * aspect, h)
    };

    Ok(BoundingBox::new(cx - width / 2.0, cy - height / 2.0, width, height))
}

/// Keep a rectangle inside the image.
///
/// Overflow past the left or top edge moves the rectangle inward; overflow
/// past the right or bottom edge trims it.
pub fn clamp_to_image(rect: &BoundingBox, dims: ImageDimensions) -> BoundingBox {
    let x = rect.x.max(0.0);
    let y = rect.y.max(0.0);
    let width = rect.width.min(f64::from(dims.width) - x);
    let height = rect.height.min(f64::from(dims.height) - y);
    BoundingBox::new(x, y, width, height)
}

/// Derive the percentage crop region for `face` in an image of size `dims`.
///
/// Falls back to the full image when clamping leaves no positive area.
pub fn derive_crop_region(
    face: &BoundingBox,
    aspect: f64,
    dims: ImageDimensions,
) -> MediaResult<CropRegion> {
    if dims.is_empty() {
        return Err(MediaError::EmptyImage);
    }

    let expanded = expand_around_face(face, aspect)?;
    let clamped = clamp_to_image(&expanded, dims);

    if !(clamped.width > 0.0 && clamped.height > 0.0) {
        debug!(
            face = ?face,
            width = dims.width,
            height = dims.height,
            "Crop collapsed after clamping, using full image"
        );
        return Ok(CropRegion::full().with_aspect(aspect));
    }

    Ok(CropRegion::from_pixels(&clamped, dims).with_aspect(aspect))
}

/// Move a region to the middle of the image, keeping its size.
pub fn center_in_image(region: &CropRegion) -> CropRegion {
    CropRegion {
        x: (100.0 - region.width) / 2.0,
        y: (100.0 - region.height) / 2.0,
        ..*region
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn dims() -> ImageDimensions {
        ImageDimensions::new(1000, 800)
    }

    #[test]
    fn test_landscape_expansion_uses_width() {
        let face = BoundingBox::new(400.0, 300.0, 100.0, 120.0);
        let aspect = 16.0 / 9.0;
        let rect = expand_around_face(&face, aspect).unwrap();
        assert!((rect.width - 200.0).abs() < EPS);
        assert!((rect.height - 200.0 / aspect).abs() < EPS);
    }

    #[test]
    fn test_portrait_expansion_uses_height() {
        let face = BoundingBox::new(400.0, 300.0, 100.0, 120.0);
        let rect = expand_around_face(&face, 0.8).unwrap();
        assert!((rect.height - 240.0).abs() < EPS);
        assert!((rect.width - 192.0).abs() < EPS);
    }

    #[test]
    fn test_square_aspect_expands_from_width() {
        // Tall face at exactly 1:1 still takes the width branch
        let face = BoundingBox::new(400.0, 300.0, 50.0, 70.0);
        let rect = expand_around_face(&face, 1.0).unwrap();
        assert!((rect.width - 100.0).abs() < EPS);
        assert!((rect.height - 100.0).abs() < EPS);
        assert!((rect.x - 375.0).abs() < EPS);
        assert!((rect.y - 285.0).abs() < EPS);

        let region = derive_crop_region(&face, 1.0, dims()).unwrap();
        assert!((region.width - 10.0).abs() < EPS);
        assert!((region.height - 12.5).abs() < EPS);
    }

    #[test]
    fn test_expansion_keeps_face_center() {
        let faces = [
            BoundingBox::new(0.0, 0.0, 50.0, 70.0),
            BoundingBox::new(900.0, 700.0, 90.0, 90.0),
            BoundingBox::new(123.4, 56.7, 8.9, 10.1),
        ];
        for face in faces {
            for aspect in [1.0, 0.8, 16.0 / 9.0, 0.25, 4.0] {
                let rect = expand_around_face(&face, aspect).unwrap();
                let (fx, fy) = face.center();
                let (rx, ry) = rect.center();
                assert!((fx - rx).abs() < 1e-6 && (fy - ry).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn test_clamped_region_stays_inside_image() {
        let faces = [
            BoundingBox::new(0.0, 0.0, 300.0, 300.0),
            BoundingBox::new(950.0, 780.0, 40.0, 15.0),
            BoundingBox::new(450.0, 350.0, 100.0, 100.0),
            BoundingBox::new(-40.0, 500.0, 120.0, 400.0),
        ];
        for face in faces {
            for aspect in [1.0, 0.8, 16.0 / 9.0] {
                let rect = clamp_to_image(&expand_around_face(&face, aspect).unwrap(), dims());
                assert!(rect.x >= 0.0);
                assert!(rect.y >= 0.0);
                assert!(rect.right() <= 1000.0 + EPS);
                assert!(rect.bottom() <= 800.0 + EPS);
            }
        }
    }

    #[test]
    fn test_left_overflow_translates_right_overflow_trims() {
        // Face near the top-left corner: origin is pushed to 0, size kept
        let rect = clamp_to_image(&BoundingBox::new(-50.0, -20.0, 200.0, 100.0), dims());
        assert_eq!(rect, BoundingBox::new(0.0, 0.0, 200.0, 100.0));

        // Near the bottom-right corner: size is trimmed
        let rect = clamp_to_image(&BoundingBox::new(900.0, 750.0, 200.0, 100.0), dims());
        assert_eq!(rect, BoundingBox::new(900.0, 750.0, 100.0, 50.0));
    }

    #[test]
    fn test_derive_region_in_percent() {
        let face = BoundingBox::new(450.0, 350.0, 100.0, 100.0);
        let region = derive_crop_region(&face, 1.0, dims()).unwrap();
        // 200x200 crop centered on (500, 400)
        assert!((region.x - 40.0).abs() < EPS);
        assert!((region.y - 37.5).abs() < EPS);
        assert!((region.width - 20.0).abs() < EPS);
        assert!((region.height - 25.0).abs() < EPS);
        assert_eq!(region.aspect, Some(1.0));
    }

    #[test]
    fn test_collapsed_region_falls_back_to_full_image() {
        let outside = BoundingBox::new(5000.0, 5000.0, 10.0, 10.0);
        let region = derive_crop_region(&outside, 1.0, dims()).unwrap();
        assert_eq!(region.x, 0.0);
        assert_eq!(region.width, 100.0);
        assert_eq!(region.height, 100.0);

        let degenerate = BoundingBox::new(10.0, 10.0, 0.0, 0.0);
        let region = derive_crop_region(&degenerate, 0.8, dims()).unwrap();
        assert_eq!(region.width, 100.0);
    }

    #[test]
    fn test_rejects_bad_input() {
        let face = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        assert!(matches!(
            derive_crop_region(&face, 0.0, dims()),
            Err(MediaError::InvalidAspect(_))
        ));
        assert!(matches!(
            derive_crop_region(&face, f64::NAN, dims()),
            Err(MediaError::InvalidAspect(_))
        ));
        assert!(matches!(
            derive_crop_region(&face, 1.0, ImageDimensions::new(0, 10)),
            Err(MediaError::EmptyImage)
        ));
    }

    #[test]
    fn test_center_in_image() {
        let region = CropRegion::new(5.0, 60.0, 20.0, 30.0).with_aspect(1.0);
        let centered = center_in_image(&region);
        assert_eq!(centered.x, 40.0);
        assert_eq!(centered.y, 35.0);
        assert_eq!(centered.width, 20.0);
        assert_eq!(centered.aspect, Some(1.0));

        assert_eq!(CropPlacement::FaceCentered.apply(region), region);
        assert_eq!(CropPlacement::ImageCentered.apply(region), centered);
    }

    #[test]
    fn test_placement_parse() {
        assert_eq!("face".parse::<CropPlacement>().unwrap(), CropPlacement::FaceCentered);
        assert_eq!("IMAGE".parse::<CropPlacement>().unwrap(), CropPlacement::ImageCentered);
        assert!("middle".parse::<CropPlacement>().is_err());
        assert_eq!(CropPlacement::default().to_string(), "face");
    }
}
