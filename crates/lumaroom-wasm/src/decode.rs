//! Decoding and normalization WASM bindings.

use lumaroom_core::decode::{self, FilterType};
use wasm_bindgen::prelude::*;

use crate::types::JsRasterImage;

/// Decode an uploaded image (JPEG or PNG) with EXIF orientation applied.
///
/// # Errors
///
/// Throws a string error when the bytes cannot be decoded.
#[wasm_bindgen]
pub fn decode_image(bytes: &[u8]) -> Result<JsRasterImage, JsValue> {
    decode::decode_image(bytes)
        .map(JsRasterImage::from_raster)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Resize an image to fit within a maximum edge length (aspect preserved).
///
/// `filter`: 0 = nearest, 1 = bilinear, 2 = lanczos3 (unknown values fall
/// back to bilinear).
#[wasm_bindgen]
pub fn resize_to_fit(
    image: &JsRasterImage,
    max_edge: u32,
    filter: u8,
) -> Result<JsRasterImage, JsValue> {
    decode::resize_to_fit(&image.to_raster(), max_edge, filter_from_u8(filter))
        .map(JsRasterImage::from_raster)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// A normalized upload: canonical JPEG bytes plus metadata.
#[wasm_bindgen]
pub struct JsNormalizedImage {
    file_name: String,
    jpeg: Vec<u8>,
    width: u32,
    height: u32,
}

#[wasm_bindgen]
impl JsNormalizedImage {
    /// Canonical `.jpg`-suffixed file name.
    #[wasm_bindgen(getter)]
    pub fn file_name(&self) -> String {
        self.file_name.clone()
    }

    /// Canonical JPEG bytes as a Uint8Array copy.
    pub fn jpeg(&self) -> Vec<u8> {
        self.jpeg.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }
}

/// Normalize an upload into a canonical JPEG asset (bounded long edge,
/// fixed high quality).
#[wasm_bindgen]
pub fn normalize_image(bytes: &[u8], file_name: &str) -> Result<JsNormalizedImage, JsValue> {
    let normalized =
        decode::normalize(bytes, file_name).map_err(|e| JsValue::from_str(&e.to_string()))?;

    Ok(JsNormalizedImage {
        file_name: normalized.file_name,
        jpeg: normalized.jpeg,
        width: normalized.width,
        height: normalized.height,
    })
}

/// Convert a u8 filter value to the core FilterType enum.
pub(crate) fn filter_from_u8(value: u8) -> FilterType {
    match value {
        0 => FilterType::Nearest,
        2 => FilterType::Lanczos3,
        _ => FilterType::Bilinear, // Default
    }
}
