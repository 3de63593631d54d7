//! Labelling detected faces against reference identities.

use std::path::{Path, PathBuf};

use facecrop_models::{DetectionResult, DisplayScale, FaceMatcher, LabeledDescriptors, LabeledFace};
use futures::future::try_join_all;
use image::DynamicImage;
use tracing::{error, info};

use crate::detector::FaceDescriber;
use crate::error::{MediaError, MediaResult};
use crate::export::open_image;

/// A named reference photo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceIdentity {
    pub name: String,
    pub path: PathBuf,
}

impl ReferenceIdentity {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

/// The two identities the demo recognizes, resolved under `dir`.
pub fn default_references(dir: impl AsRef<Path>) -> Vec<ReferenceIdentity> {
    let dir = dir.as_ref();
    vec![
        ReferenceIdentity::new("black-widow", dir.join("black-widow.jpeg")),
        ReferenceIdentity::new("captain-america", dir.join("captain-america.jpeg")),
    ]
}

async fn describe_reference<D>(describer: &D, reference: &ReferenceIdentity) -> MediaResult<LabeledDescriptors>
where
    D: FaceDescriber + ?Sized,
{
    let image = open_image(&reference.path)?;
    let face = describer
        .describe_single_face(&image)
        .await?
        .ok_or_else(|| MediaError::NoReferenceFace(reference.name.clone()))?;
    Ok(LabeledDescriptors::new(reference.name.clone(), vec![face.descriptor]))
}

/// Compute descriptors for every reference and build a matcher.
///
/// All references are processed concurrently. Any reference without a
/// detectable face fails the whole load.
pub async fn load_reference_gallery<D>(
    describer: &D,
    references: &[ReferenceIdentity],
) -> MediaResult<FaceMatcher>
where
    D: FaceDescriber + ?Sized,
{
    let labeled = try_join_all(references.iter().map(|reference| async move {
        describe_reference(describer, reference).await.map_err(|e| {
            error!(name = %reference.name, error = %e, "Error processing reference identity");
            e
        })
    }))
    .await?;

    info!(identities = labeled.len(), "Reference gallery loaded");
    Ok(FaceMatcher::new(labeled))
}

/// Detect every face in `image` and label it with its best identity match.
pub async fn label_faces<D>(
    describer: &D,
    matcher: &FaceMatcher,
    image: &DynamicImage,
) -> MediaResult<DetectionResult>
where
    D: FaceDescriber + ?Sized,
{
    let faces = describer.describe_faces(image).await?;
    let labeled = faces
        .into_iter()
        .map(|face| {
            let matched_label = matcher.find_best_match(&face.descriptor);
            LabeledFace {
                bounding_box: face.bounding_box,
                descriptor: face.descriptor,
                matched_label,
            }
        })
        .collect();
    Ok(DetectionResult::new(labeled))
}

/// Rescale natural-space results to the displayed size for overlays.
pub fn resize_results(result: &DetectionResult, scale: DisplayScale) -> DetectionResult {
    DetectionResult::new(
        result
            .faces
            .iter()
            .map(|face| LabeledFace {
                bounding_box: scale.to_displayed(&face.bounding_box),
                ..face.clone()
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::testing::WhiteSquareModel;
    use crate::export::encode_png;
    use facecrop_models::{BoundingBox, ImageDimensions};
    use image::{Rgb, RgbImage};

    /// Solid image tinted by `red`, with a white "face" square.
    fn portrait(red: u8) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_fn(40, 40, |x, y| {
            if (10..30).contains(&x) && (10..30).contains(&y) {
                Rgb([255, 255, 255])
            } else {
                Rgb([red, 0, 0])
            }
        }))
    }

    fn write_fixture(dir: &Path, name: &str, image: &DynamicImage) {
        std::fs::write(dir.join(name), encode_png(image).unwrap()).unwrap();
    }

    #[tokio::test]
    async fn test_gallery_and_labelling() {
        let dir = tempfile::tempdir().unwrap();
        write_fixture(dir.path(), "a.png", &portrait(0));
        write_fixture(dir.path(), "b.png", &portrait(200));

        let references = vec![
            ReferenceIdentity::new("black-widow", dir.path().join("a.png")),
            ReferenceIdentity::new("captain-america", dir.path().join("b.png")),
        ];
        let matcher = load_reference_gallery(&WhiteSquareModel, &references).await.unwrap();
        assert_eq!(matcher.identities().len(), 2);

        let result = label_faces(&WhiteSquareModel, &matcher, &portrait(200)).await.unwrap();
        assert_eq!(result.len(), 1);
        let face = result.primary().unwrap();
        assert_eq!(face.bounding_box, BoundingBox::new(10.0, 10.0, 20.0, 20.0));
        assert_eq!(face.matched_label.label, "captain-america");
        assert_eq!(face.display_label(), "captain-america (0)");
    }

    #[tokio::test]
    async fn test_reference_without_face_fails_load() {
        let dir = tempfile::tempdir().unwrap();
        write_fixture(dir.path(), "blank.png", &DynamicImage::new_rgb8(16, 16));

        let references = vec![ReferenceIdentity::new("black-widow", dir.path().join("blank.png"))];
        let err = load_reference_gallery(&WhiteSquareModel, &references).await.unwrap_err();
        assert_eq!(err.to_string(), "No face detected in black-widow");
    }

    #[tokio::test]
    async fn test_missing_reference_file_fails_load() {
        let references = default_references("/nonexistent/labeled-images");
        assert_eq!(references[0].name, "black-widow");
        let err = load_reference_gallery(&WhiteSquareModel, &references).await.unwrap_err();
        assert!(matches!(err, MediaError::FileNotFound(_)));
    }

    #[tokio::test]
    async fn test_image_without_faces_yields_empty_result() {
        let matcher = FaceMatcher::new(Vec::new());
        let result = label_faces(&WhiteSquareModel, &matcher, &DynamicImage::new_rgb8(8, 8))
            .await
            .unwrap();
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_resize_results_to_display() {
        let matcher = FaceMatcher::new(Vec::new());
        let result = label_faces(&WhiteSquareModel, &matcher, &portrait(0)).await.unwrap();
        let scale = DisplayScale::new(ImageDimensions::new(40, 40), ImageDimensions::new(20, 20));
        let resized = resize_results(&result, scale);
        assert_eq!(resized.faces[0].bounding_box, BoundingBox::new(5.0, 5.0, 10.0, 10.0));
        assert!(resized.faces[0].matched_label.is_unknown());
    }
}
