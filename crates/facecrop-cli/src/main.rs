//! FaceCrop command-line front end.

mod args;

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use facecrop_media::{dimensions_of, export_png, open_image, AutoCropper, CropPlacement};
use facecrop_models::{AspectRatio, CropRegion};
use facecrop_vision::{CloudFaceDetector, FaceDetectionService, RekognitionFaceService};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::args::{Cli, Commands};

/// rustls 0.23 needs a process-wide crypto provider for the AWS client.
fn install_crypto_provider() {
    if rustls::crypto::ring::default_provider().install_default().is_err() {
        eprintln!("rustls crypto provider already installed");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    install_crypto_provider();

    let mut env_filter = EnvFilter::from_default_env();
    if let Ok(directive) = "facecrop=info".parse() {
        env_filter = env_filter.add_directive(directive);
    }
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Detect { image } => detect(&image).await,
        Commands::Crop {
            image,
            aspect,
            placement,
            region,
            output,
        } => crop(&image, aspect, placement, region, &output).await,
    }
}

async fn detect(path: &Path) -> Result<()> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let service = RekognitionFaceService::from_env();
    let faces = service.detect_faces(&bytes).await.context("Face detection failed")?;

    println!("{}", serde_json::to_string_pretty(&faces)?);
    Ok(())
}

async fn crop(
    path: &Path,
    aspect: AspectRatio,
    placement: CropPlacement,
    manual: Option<CropRegion>,
    output: &Path,
) -> Result<()> {
    let image = open_image(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let dims = dimensions_of(&image);
    info!(width = dims.width, height = dims.height, "Loaded image");

    let region = match manual {
        Some(region) => region,
        None => {
            let service = Arc::new(RekognitionFaceService::from_env());
            let cropper = AutoCropper::new(Arc::new(CloudFaceDetector::new(service))).with_placement(placement);

            match cropper.auto_crop(&image, aspect).await? {
                Some(auto) => {
                    info!(faces = auto.faces_detected, "Using primary face");
                    auto.region
                }
                None => bail!("No faces detected; pass --region x,y,width,height to crop manually"),
            }
        }
    };

    let crop = export_png(&image, &region, output).await?;
    println!(
        "{} ({}x{} at {},{})",
        output.display(),
        crop.width,
        crop.height,
        crop.x,
        crop.y
    );
    Ok(())
}
