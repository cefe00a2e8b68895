//! Edit session state and render scheduling discipline.
//!
//! One session owns one immutable original image and the mutable
//! [`EditDescriptor`] being applied to it. Two small mechanisms keep preview
//! rendering well-behaved without any shared mutable state in the engine:
//!
//! - a **generation counter**: every edit bumps it, a render captures it at
//!   start, and the result is published only if the counter is unchanged.
//!   Stale results are discarded, never displayed out of order.
//! - a **debouncer** that coalesces bursts of slider movement so only the
//!   latest descriptor at the end of a quiet window is rendered. Time is
//!   injected by the caller (the browser passes `performance.now()`), which
//!   keeps this logic deterministic and host-agnostic.
//!
//! Full-resolution export bypasses both: it is a one-shot call straight into
//! the renderer that runs to completion or fails.

use crate::decode::RasterImage;
use crate::EditDescriptor;

/// Default quiet window for preview debouncing, in milliseconds.
pub const DEBOUNCE_WINDOW_MS: f64 = 150.0;

/// Monotonically increasing marker for detecting stale render results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RenderGeneration(u64);

/// State for one image open in the editor.
#[derive(Debug)]
pub struct EditSession {
    original: RasterImage,
    edits: EditDescriptor,
    generation: u64,
}

impl EditSession {
    /// Open a session on an image with neutral edits.
    pub fn new(original: RasterImage) -> Self {
        Self {
            original,
            edits: EditDescriptor::default(),
            generation: 0,
        }
    }

    /// The immutable original. Renders read from here and never write back.
    pub fn original(&self) -> &RasterImage {
        &self.original
    }

    /// The current edit state.
    pub fn edits(&self) -> &EditDescriptor {
        &self.edits
    }

    /// Replace the edit state, invalidating any render in flight.
    ///
    /// Returns the new generation; a render started now should capture it
    /// and check [`EditSession::is_current`] before publishing.
    pub fn set_edits(&mut self, edits: EditDescriptor) -> RenderGeneration {
        self.edits = edits;
        self.bump()
    }

    /// Reset the edit state to defaults (same staleness semantics as
    /// [`EditSession::set_edits`]).
    pub fn reset_edits(&mut self) -> RenderGeneration {
        self.set_edits(EditDescriptor::default())
    }

    /// Switch the session to a different image.
    ///
    /// The descriptor resets to defaults and in-flight renders for the
    /// previous image become stale.
    pub fn replace_image(&mut self, original: RasterImage) -> RenderGeneration {
        self.original = original;
        self.edits = EditDescriptor::default();
        self.bump()
    }

    /// The generation a render starting now should capture.
    pub fn generation(&self) -> RenderGeneration {
        RenderGeneration(self.generation)
    }

    /// Whether a result computed under `generation` may still be published.
    pub fn is_current(&self, generation: RenderGeneration) -> bool {
        generation.0 == self.generation
    }

    fn bump(&mut self) -> RenderGeneration {
        self.generation += 1;
        RenderGeneration(self.generation)
    }
}

/// Coalesces edit bursts into single render requests.
///
/// The caller feeds every edit through [`EditDebouncer::submit`] with a
/// timestamp and polls with the current time; a descriptor is released only
/// once the quiet window has elapsed since the last submission, and only the
/// latest descriptor survives a burst.
#[derive(Debug)]
pub struct EditDebouncer {
    window_ms: f64,
    pending: Option<EditDescriptor>,
    last_submit_ms: f64,
}

impl Default for EditDebouncer {
    fn default() -> Self {
        Self::new()
    }
}

impl EditDebouncer {
    /// Debouncer with the standard preview window.
    pub fn new() -> Self {
        Self::with_window(DEBOUNCE_WINDOW_MS)
    }

    /// Debouncer with a custom quiet window.
    pub fn with_window(window_ms: f64) -> Self {
        Self {
            window_ms,
            pending: None,
            last_submit_ms: 0.0,
        }
    }

    /// Record an edit at the given time, replacing any pending one.
    pub fn submit(&mut self, edits: EditDescriptor, now_ms: f64) {
        self.pending = Some(edits);
        self.last_submit_ms = now_ms;
    }

    /// Release the pending descriptor if the quiet window has elapsed.
    pub fn poll(&mut self, now_ms: f64) -> Option<EditDescriptor> {
        if self.pending.is_some() && now_ms - self.last_submit_ms >= self.window_ms {
            self.pending.take()
        } else {
            None
        }
    }

    /// Release the pending descriptor immediately, window or not.
    pub fn flush(&mut self) -> Option<EditDescriptor> {
        self.pending.take()
    }

    /// Whether nothing is waiting to render.
    pub fn is_idle(&self) -> bool {
        self.pending.is_none()
    }
}
