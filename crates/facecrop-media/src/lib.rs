//! Image-side processing for FaceCrop.
//!
//! This crate provides:
//! - Crop-region derivation around a detected face
//! - Pixel extraction and PNG export at natural resolution
//! - Trait seams for external face detection / recognition models
//! - Reference-identity loading and face labelling
//! - Overlay rendering of labelled face boxes

pub mod crop;
pub mod detector;
pub mod error;
pub mod export;
pub mod overlay;
pub mod pipeline;
pub mod recognition;

pub use crop::{center_in_image, clamp_to_image, derive_crop_region, expand_around_face, CropPlacement};
pub use detector::{DescribedFace, DescriberDetector, FaceDescriber, FaceDetector};
pub use error::{MediaError, MediaResult};
pub use export::{
    crop_to_png, decode_image, dimensions_of, encode_png, export_png, extract_crop, open_image,
    DEFAULT_EXPORT_NAME,
};
pub use overlay::{draw_overlay, OverlayStyle};
pub use pipeline::{AutoCrop, AutoCropper};
pub use recognition::{default_references, label_faces, load_reference_gallery, resize_results, ReferenceIdentity};
