//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use facecrop_media::{CropPlacement, DEFAULT_EXPORT_NAME};
use facecrop_models::{AspectRatio, CropRegion};

#[derive(Parser, Debug)]
#[command(name = "facecrop", version, about = "Face detection and auto-crop", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the faces the detection service finds, as normalized boxes
    Detect {
        /// Image file (png, jpeg or webp)
        image: PathBuf,
    },
    /// Crop an image around its primary face and export a PNG
    Crop {
        /// Image file (png, jpeg or webp)
        image: PathBuf,

        /// Target aspect ratio, "W:H" or a decimal
        #[arg(long, default_value = "1:1", value_name = "RATIO")]
        aspect: AspectRatio,

        /// Keep the region on the face, or move it to the image center
        #[arg(long, default_value = "face", value_name = "face|image")]
        placement: CropPlacement,

        /// Manual region in percent, "x,y,width,height"; skips detection
        #[arg(long, value_name = "X,Y,W,H", value_parser = parse_region)]
        region: Option<CropRegion>,

        /// Output PNG path
        #[arg(long, short, default_value = DEFAULT_EXPORT_NAME, value_name = "FILE")]
        output: PathBuf,
    },
}

/// Parse `x,y,width,height` percentages.
pub fn parse_region(s: &str) -> Result<CropRegion, String> {
    let values = s
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<f64>()
                .map_err(|_| format!("Invalid number in region: {part:?}"))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let [x, y, width, height] = values[..] else {
        return Err(format!("Region needs 4 values (x,y,width,height), got {}", values.len()));
    };

    if values.iter().any(|v| !v.is_finite() || *v < 0.0) {
        return Err("Region values must be non-negative percentages".to_string());
    }
    if width <= 0.0 || height <= 0.0 {
        return Err("Region width and height must be positive".to_string());
    }
    if x + width > 100.0 || y + height > 100.0 {
        return Err("Region must lie within the image (0-100%)".to_string());
    }

    Ok(CropRegion::new(x, y, width, height))
}
