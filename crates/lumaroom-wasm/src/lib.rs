//! Lumaroom WASM - WebAssembly bindings for Lumaroom
//!
//! This crate exposes the lumaroom-core engine to JavaScript/TypeScript.
//! Heavy operations (decoding, RAW extraction, rendering, histograms) are
//! meant to be called from a Web Worker so the main thread stays responsive;
//! within WASM everything is synchronous, and results are identical wherever
//! the call runs.
//!
//! # Module Structure
//!
//! - `types` - WASM-compatible wrapper types for image data
//! - `decode` - Decoding, resizing, and upload normalization bindings
//! - `raw` - RAW detection and preview extraction bindings
//! - `render` - The edit/export pipeline binding
//! - `histogram` - Histogram computation bindings
//! - `session` - Edit session state (generation counter + debouncing)
//!
//! # Usage
//!
//! ```typescript
//! import init, { decode_image, Renderer } from '@lumaroom/wasm';
//!
//! await init();
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const image = decode_image(bytes);
//! const renderer = new Renderer();
//! const preview = renderer.render_preview(image, edits, { scale: 0.25 });
//! ```

use wasm_bindgen::prelude::*;

mod decode;
mod histogram;
mod raw;
mod render;
mod session;
mod types;

// Re-export public types
pub use decode::{decode_image, normalize_image, resize_to_fit, JsNormalizedImage};
pub use histogram::{compute_histogram, JsHistogram};
pub use raw::{extract_raw_preview, is_raw_file, JsPreviewAsset};
pub use render::Renderer;
pub use session::EditSession;
pub use types::JsRasterImage;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    // Future: Set up panic hook for better error messages in browser console
    // when console_error_panic_hook feature is added
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
