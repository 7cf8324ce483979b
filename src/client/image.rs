use base64::{engine::general_purpose, Engine as _};
use thiserror::Error;

pub const IMAGE_MAX_WIDTH: u32 = 800;
pub const IMAGE_MAX_HEIGHT: u32 = 800;
/// JPEG quality handed to the host encoder
pub const IMAGE_JPEG_QUALITY: f32 = 0.7;

const JPEG_DATA_URI_PREFIX: &str = "data:image/jpeg;base64,";

#[derive(Error, Debug, PartialEq)]
pub enum ImageError {
    #[error("Not an image file: {0}")]
    NotAnImage(String),

    #[error("Image has no pixels")]
    Empty,

    #[error("Image encoding failed: {0}")]
    Encode(String),
}

/// A downscaled image ready to attach to a stone
#[derive(Debug, Clone, PartialEq)]
pub struct ImagePayload {
    pub width: u32,
    pub height: u32,
    pub data_uri: String,
}

/// Target size for an image so it fits the bounding box
///
/// Images already inside the box are kept as is. Larger images are scaled
/// on their dominant side, preserving the aspect ratio, and rounded.
pub fn fit_within(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    if width <= max_width && height <= max_height {
        return (width, height);
    }

    let ratio = f64::from(width) / f64::from(height);
    if width > height {
        let scaled_height = (f64::from(max_width) / ratio).round() as u32;
        (max_width, scaled_height.max(1))
    } else {
        let scaled_width = (f64::from(max_height) * ratio).round() as u32;
        (scaled_width.max(1), max_height)
    }
}

pub fn is_image_mime(mime: &str) -> bool {
    mime.trim().to_ascii_lowercase().starts_with("image/")
}

/// Wrap encoded JPEG bytes as a data URI
pub fn to_data_uri(jpeg_bytes: &[u8]) -> String {
    format!("{}{}", JPEG_DATA_URI_PREFIX, general_purpose::STANDARD.encode(jpeg_bytes))
}

/// Check, resize and encode a selected image
///
/// Pixel work is left to the host: `encode` receives the target size and
/// JPEG quality and returns the encoded bytes.
pub fn prepare_image<F>(mime: &str, width: u32, height: u32, encode: F) -> Result<ImagePayload, ImageError>
where
    F: FnOnce(u32, u32, f32) -> Result<Vec<u8>, String>,
{
    if !is_image_mime(mime) {
        return Err(ImageError::NotAnImage(mime.to_string()));
    }
    if width == 0 || height == 0 {
        return Err(ImageError::Empty);
    }

    let (target_width, target_height) = fit_within(width, height, IMAGE_MAX_WIDTH, IMAGE_MAX_HEIGHT);
    let bytes = encode(target_width, target_height, IMAGE_JPEG_QUALITY).map_err(ImageError::Encode)?;

    Ok(ImagePayload {
        width: target_width,
        height: target_height,
        data_uri: to_data_uri(&bytes),
    })
}
