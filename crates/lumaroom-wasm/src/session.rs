//! Edit session WASM binding.
//!
//! Wraps the core session state (generation counter) together with the
//! preview debouncer. The caller drives time explicitly with
//! `performance.now()` so the coalescing window needs no clock inside WASM.
//!
//! The intended TypeScript flow:
//!
//! ```typescript
//! session.submit_edits(edits, performance.now());   // on every slider move
//! // on a timer or rAF:
//! if (session.poll_ready(performance.now())) {
//!   const gen = session.generation;
//!   const preview = renderer.render_preview(image, session.edits(), opts);
//!   if (session.is_current(gen)) display(preview);  // else: stale, drop it
//! }
//! ```

use lumaroom_core::{EditDebouncer, EditSession as CoreSession};
use wasm_bindgen::prelude::*;

use crate::types::JsRasterImage;

/// State for one image open in the editor.
#[wasm_bindgen]
pub struct EditSession {
    session: CoreSession,
    debouncer: EditDebouncer,
    // RenderGeneration is opaque in core; the binding tracks the u32 handles
    // it has handed out so is_current can compare across the boundary.
    generation: u32,
}

#[wasm_bindgen]
impl EditSession {
    /// Open a session on a decoded image with neutral edits.
    #[wasm_bindgen(constructor)]
    pub fn new(image: &JsRasterImage) -> EditSession {
        EditSession {
            session: CoreSession::new(image.to_raster()),
            debouncer: EditDebouncer::new(),
            generation: 0,
        }
    }

    /// Record an edit at the given time; coalesced until the quiet window
    /// elapses.
    ///
    /// `edits` is an EditDescriptor JSON object.
    pub fn submit_edits(&mut self, edits: JsValue, now_ms: f64) -> Result<(), JsValue> {
        let edits = serde_wasm_bindgen::from_value(edits)
            .map_err(|e| JsValue::from_str(&format!("Invalid edit descriptor: {}", e)))?;
        self.debouncer.submit(edits, now_ms);
        Ok(())
    }

    /// Apply the pending edit if its quiet window has elapsed.
    ///
    /// Returns true when a new render should start; capture `generation`
    /// before rendering and check `is_current` before displaying.
    pub fn poll_ready(&mut self, now_ms: f64) -> bool {
        match self.debouncer.poll(now_ms) {
            Some(edits) => {
                self.session.set_edits(edits);
                self.generation = self.generation.wrapping_add(1);
                true
            }
            None => false,
        }
    }

    /// The generation a render starting now should capture.
    #[wasm_bindgen(getter)]
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Whether a result computed under `generation` may still be displayed.
    pub fn is_current(&self, generation: u32) -> bool {
        generation == self.generation
    }

    /// The current edit state as a JSON object.
    pub fn edits(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(self.session.edits())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Switch the session to a different image: pending edits are dropped,
    /// the descriptor resets to defaults, and in-flight renders go stale.
    pub fn replace_image(&mut self, image: &JsRasterImage) {
        self.debouncer.flush();
        self.session.replace_image(image.to_raster());
        self.generation = self.generation.wrapping_add(1);
    }

    /// Whether nothing is waiting to render.
    #[wasm_bindgen(getter)]
    pub fn is_idle(&self) -> bool {
        self.debouncer.is_idle()
    }
}

// Note: submit_edits/edits take JsValue and are exercised by the browser
// integration tests; the generation and debounce logic is covered in
// lumaroom-core's session tests.
