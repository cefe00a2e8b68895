//! Edit/export pipeline WASM binding.
//!
//! Edit state and export options cross the boundary as JSON objects via
//! serde_wasm_bindgen; pixel buffers cross as Uint8Array.

use lumaroom_core::{EditDescriptor, ExportOptions};
use wasm_bindgen::prelude::*;

use crate::types::JsRasterImage;

/// The render engine, constructed once and reused for every render.
///
/// A watermark font (TTF/OTF bytes) can be loaded up front; renders with an
/// active watermark fail with an error until one is.
#[wasm_bindgen]
pub struct Renderer {
    inner: lumaroom_core::Renderer,
}

#[wasm_bindgen]
impl Renderer {
    /// Create a renderer without watermark support.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Renderer {
        Renderer {
            inner: lumaroom_core::Renderer::new(),
        }
    }

    /// Create a renderer with a watermark font.
    ///
    /// # Errors
    ///
    /// Throws a string error when the font bytes cannot be parsed.
    pub fn with_font(font_bytes: Vec<u8>) -> Result<Renderer, JsValue> {
        let inner = lumaroom_core::Renderer::with_font(font_bytes)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Renderer { inner })
    }

    /// Whether a watermark font is loaded.
    #[wasm_bindgen(getter)]
    pub fn has_font(&self) -> bool {
        self.inner.has_font()
    }

    /// Render a preview, returning the raw output image for display and
    /// histogram sampling.
    ///
    /// `edits` is an EditDescriptor JSON object, `options` an ExportOptions
    /// JSON object (missing fields take their defaults).
    pub fn render_preview(
        &self,
        image: &JsRasterImage,
        edits: JsValue,
        options: JsValue,
    ) -> Result<JsRasterImage, JsValue> {
        let (edits, options) = parse_inputs(edits, options)?;
        self.inner
            .render_image(&image.to_raster(), &edits, &options)
            .map(JsRasterImage::from_raster)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Render a full export, returning the encoded bytes (JPEG or PNG per
    /// the options).
    pub fn render_export(
        &self,
        image: &JsRasterImage,
        edits: JsValue,
        options: JsValue,
    ) -> Result<Vec<u8>, JsValue> {
        let (edits, options) = parse_inputs(edits, options)?;
        self.inner
            .render(&image.to_raster(), &edits, &options)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_inputs(
    edits: JsValue,
    options: JsValue,
) -> Result<(EditDescriptor, ExportOptions), JsValue> {
    let edits: EditDescriptor = serde_wasm_bindgen::from_value(edits)
        .map_err(|e| JsValue::from_str(&format!("Invalid edit descriptor: {}", e)))?;
    let options: ExportOptions = serde_wasm_bindgen::from_value(options)
        .map_err(|e| JsValue::from_str(&format!("Invalid export options: {}", e)))?;
    Ok((edits, options))
}

// Note: render bindings take JsValue inputs and are exercised by the
// browser integration tests; the pipeline itself is covered in
// lumaroom-core.
