//! Upload normalization into a canonical JPEG asset.
//!
//! Every non-RAW upload passes through here once, so the rest of the
//! pipeline never has to special-case input format or size: the output is
//! always a JPEG whose longest edge is bounded.

use super::{decode_image, resize_to_fit, DecodeError, FilterType, RasterImage};
use crate::encode::encode_jpeg;

/// Longest edge allowed for a canonical asset, in pixels.
pub const NORMALIZE_MAX_EDGE: u32 = 6000;

/// JPEG quality used when re-encoding the canonical asset.
pub const NORMALIZE_JPEG_QUALITY: u8 = 98;

/// A normalized upload: canonical JPEG bytes plus display metadata.
#[derive(Debug, Clone)]
pub struct NormalizedImage {
    /// Canonical file name, always `.jpg`-suffixed.
    pub file_name: String,
    /// Re-encoded JPEG bytes.
    pub jpeg: Vec<u8>,
    /// Width after any downscale.
    pub width: u32,
    /// Height after any downscale.
    pub height: u32,
}

/// Decode an uploaded image and re-encode it as a canonical JPEG.
///
/// Oversized images are downscaled so the longest edge equals
/// [`NORMALIZE_MAX_EDGE`], preserving aspect ratio. Output is always JPEG at
/// [`NORMALIZE_JPEG_QUALITY`], regardless of the input format.
///
/// # Errors
///
/// - `DecodeError::SourceDecode` when the bytes are not a decodable image
/// - `DecodeError::NormalizeEncode` when JPEG encoding fails
pub fn normalize(bytes: &[u8], file_name: &str) -> Result<NormalizedImage, DecodeError> {
    let decoded = decode_image(bytes)?;
    let bounded = bound_image(&decoded)?;

    let jpeg = encode_jpeg(
        &bounded.pixels,
        bounded.width,
        bounded.height,
        NORMALIZE_JPEG_QUALITY,
    )
    .map_err(|e| DecodeError::NormalizeEncode(e.to_string()))?;

    Ok(NormalizedImage {
        file_name: jpg_file_name(file_name),
        jpeg,
        width: bounded.width,
        height: bounded.height,
    })
}

/// Downscale an image so the longest edge fits the canonical ceiling.
fn bound_image(image: &RasterImage) -> Result<RasterImage, DecodeError> {
    resize_to_fit(image, NORMALIZE_MAX_EDGE, FilterType::Lanczos3)
}

/// Replace a file name's extension with `.jpg`.
pub(crate) fn jpg_file_name(file_name: &str) -> String {
    match file_name.rfind('.') {
        Some(dot) if dot > 0 => format!("{}.jpg", &file_name[..dot]),
        _ => format!("{}.jpg", file_name),
    }
}
