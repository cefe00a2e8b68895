//! Histogram computation WASM bindings.

use lumaroom_core::histogram::compute_histogram as compute_histogram_core;
use wasm_bindgen::prelude::*;

use crate::types::JsRasterImage;

/// Histogram result accessible from JavaScript.
///
/// 256-bin histograms for red, green, blue, and luminance, plus helpers for
/// clipping detection and display normalization.
#[wasm_bindgen]
pub struct JsHistogram {
    red: Vec<u32>,
    green: Vec<u32>,
    blue: Vec<u32>,
    luminance: Vec<u32>,
    max_value: u32,
    has_highlight_clipping: bool,
    has_shadow_clipping: bool,
}

#[wasm_bindgen]
impl JsHistogram {
    /// Get red channel histogram (256 bins).
    pub fn red(&self) -> Vec<u32> {
        self.red.clone()
    }

    /// Get green channel histogram (256 bins).
    pub fn green(&self) -> Vec<u32> {
        self.green.clone()
    }

    /// Get blue channel histogram (256 bins).
    pub fn blue(&self) -> Vec<u32> {
        self.blue.clone()
    }

    /// Get luminance histogram (256 bins).
    pub fn luminance(&self) -> Vec<u32> {
        self.luminance.clone()
    }

    /// Get maximum bin value across all RGB channels, for display
    /// normalization.
    #[wasm_bindgen(getter)]
    pub fn max_value(&self) -> u32 {
        self.max_value
    }

    /// Check if any RGB channel has values at 255 (highlight clipping).
    #[wasm_bindgen(getter)]
    pub fn has_highlight_clipping(&self) -> bool {
        self.has_highlight_clipping
    }

    /// Check if any RGB channel has values at 0 (shadow clipping).
    #[wasm_bindgen(getter)]
    pub fn has_shadow_clipping(&self) -> bool {
        self.has_shadow_clipping
    }
}

/// Compute the histogram of an image.
///
/// Large images are sampled through a bounded downscale inside the core;
/// the caller just passes the image. Intended to run in a Web Worker, but
/// the result is identical when called on the main thread.
#[wasm_bindgen]
pub fn compute_histogram(image: &JsRasterImage) -> JsHistogram {
    let hist = compute_histogram_core(&image.to_raster());

    JsHistogram {
        red: hist.red.to_vec(),
        green: hist.green.to_vec(),
        blue: hist.blue.to_vec(),
        luminance: hist.luminance.to_vec(),
        max_value: hist.max_value(),
        has_highlight_clipping: hist.has_highlight_clipping(),
        has_shadow_clipping: hist.has_shadow_clipping(),
    }
}
