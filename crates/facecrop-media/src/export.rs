//! Pixel extraction and PNG export.

use std::io::Cursor;
use std::path::Path;

use facecrop_models::{CropRegion, ImageDimensions, PixelCrop};
use image::{DynamicImage, GenericImageView, ImageFormat};
use tracing::{debug, info};

use crate::error::{MediaError, MediaResult};

/// File name used when the caller does not pick one.
pub const DEFAULT_EXPORT_NAME: &str = "cropped-image.png";

/// Natural pixel dimensions of a decoded image.
pub fn dimensions_of(image: &DynamicImage) -> ImageDimensions {
    let (width, height) = image.dimensions();
    ImageDimensions::new(width, height)
}

/// Decode image bytes in any enabled format.
pub fn decode_image(bytes: &[u8]) -> MediaResult<DynamicImage> {
    image::load_from_memory(bytes).map_err(|e| MediaError::Decode(e.to_string()))
}

/// Open an image file from disk.
pub fn open_image(path: impl AsRef<Path>) -> MediaResult<DynamicImage> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(MediaError::FileNotFound(path.to_path_buf()));
    }
    image::open(path).map_err(|e| MediaError::Decode(format!("{}: {}", path.display(), e)))
}

/// Resolve a percent region to the natural pixels it covers.
pub fn pixel_crop(image: &DynamicImage, region: &CropRegion) -> MediaResult<PixelCrop> {
    let dims = dimensions_of(image);
    if dims.is_empty() {
        return Err(MediaError::EmptyImage);
    }
    let crop = region.to_pixels(dims);
    if crop.is_empty() {
        return Err(MediaError::EmptyCrop);
    }
    Ok(crop)
}

/// Cut `region` out of the natural-resolution image.
pub fn extract_crop(image: &DynamicImage, region: &CropRegion) -> MediaResult<DynamicImage> {
    let crop = pixel_crop(image, region)?;
    debug!(
        x = crop.x,
        y = crop.y,
        width = crop.width,
        height = crop.height,
        "Extracting crop"
    );
    Ok(image.crop_imm(crop.x, crop.y, crop.width, crop.height))
}

/// Encode an image as PNG bytes.
pub fn encode_png(image: &DynamicImage) -> MediaResult<Vec<u8>> {
    let mut buffer = Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, ImageFormat::Png)
        .map_err(|e| MediaError::Encode(e.to_string()))?;
    Ok(buffer.into_inner())
}

/// Decode, crop and re-encode as PNG in one step.
pub fn crop_to_png(bytes: &[u8], region: &CropRegion) -> MediaResult<Vec<u8>> {
    let image = decode_image(bytes)?;
    let cropped = extract_crop(&image, region)?;
    encode_png(&cropped)
}

/// Write the cropped PNG to `path`.
pub async fn export_png(
    image: &DynamicImage,
    region: &CropRegion,
    path: impl AsRef<Path>,
) -> MediaResult<PixelCrop> {
    let path = path.as_ref();
    let crop = pixel_crop(image, region)?;
    let png = encode_png(&extract_crop(image, region)?)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, &png).await?;

    info!(
        path = %path.display(),
        width = crop.width,
        height = crop.height,
        bytes = png.len(),
        "Exported cropped image"
    );
    Ok(crop)
}
