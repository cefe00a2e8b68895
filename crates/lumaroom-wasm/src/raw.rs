//! RAW detection and preview extraction WASM bindings.

use lumaroom_core::raw;
use wasm_bindgen::prelude::*;

/// Check whether a file name has a known RAW camera extension.
#[wasm_bindgen]
pub fn is_raw_file(file_name: &str) -> bool {
    raw::is_raw_extension(file_name)
}

/// The winning RAW preview, materialized as a `.jpg` asset.
#[wasm_bindgen]
pub struct JsPreviewAsset {
    file_name: String,
    jpeg: Vec<u8>,
    width: u32,
    height: u32,
}

#[wasm_bindgen]
impl JsPreviewAsset {
    /// Canonical `.jpg`-suffixed file name.
    #[wasm_bindgen(getter)]
    pub fn file_name(&self) -> String {
        self.file_name.clone()
    }

    /// Preview JPEG bytes as a Uint8Array copy.
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

/// Extract the best displayable preview from a RAW file.
///
/// # Errors
///
/// Throws a string error naming the file when no embedded preview passes
/// validation.
#[wasm_bindgen]
pub fn extract_raw_preview(bytes: &[u8], file_name: &str) -> Result<JsPreviewAsset, JsValue> {
    let asset =
        raw::extract_preview(bytes, file_name).map_err(|e| JsValue::from_str(&e.to_string()))?;

    Ok(JsPreviewAsset {
        file_name: asset.file_name,
        jpeg: asset.jpeg,
        width: asset.width,
        height: asset.height,
    })
}
