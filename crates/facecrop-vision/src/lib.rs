//! Cloud face detection for FaceCrop.
//!
//! This crate provides:
//! - Decoding of browser image payloads (data URLs or bare base64)
//! - A [`FaceDetectionService`] seam with an AWS Rekognition implementation
//! - [`CloudFaceDetector`], which plugs a service into the crop pipeline

pub mod client;
pub mod config;
pub mod error;
pub mod payload;
pub mod service;

pub use client::RekognitionFaceService;
pub use config::VisionConfig;
pub use error::{VisionError, VisionResult};
pub use payload::{decode_image_payload, encode_data_url, strip_data_url_prefix};
pub use service::{detect_primary_face, encode_for_upload, CloudFaceDetector, FaceDetectionService};
