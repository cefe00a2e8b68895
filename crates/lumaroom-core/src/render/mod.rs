//! The edit/export render pipeline.
//!
//! # Stage Order
//!
//! 1. Geometry: crop (or aspect-derived crop) and output scaling
//! 2. Tonal pass: exposure, contrast, shadows/highlights, saturation/vibrance
//! 3. Detail pass: noise reduction, sharpening, clarity
//! 4. Watermark compositing
//! 5. Encoding (JPEG or PNG)
//!
//! [`Renderer::render`] is a pure function of (source, edits, options): the
//! source image is never mutated, every call allocates a fresh output, and
//! identical inputs produce identical bytes. Stages whose sliders are at
//! their neutral defaults are skipped entirely, so a neutral render is
//! exactly a crop/scale/encode.

mod detail;
mod geometry;
mod tonal;
mod watermark;

pub use geometry::{output_dimensions, resolve_source_rect};

use ab_glyph::FontVec;
use thiserror::Error;

use crate::decode::RasterImage;
use crate::encode::{encode, EncodeError};
use crate::{EditDescriptor, ExportOptions};

/// Errors from the render pipeline.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The source image buffer is inconsistent with its dimensions.
    #[error("Invalid source image: {0}")]
    InvalidSource(String),

    /// A watermark was requested but no font has been loaded.
    #[error("Watermark font not loaded")]
    FontUnavailable,

    /// The supplied font bytes could not be parsed.
    #[error("Invalid watermark font: {0}")]
    InvalidFont(String),

    /// Encoding the final buffer failed.
    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// The render engine.
///
/// Holds only immutable configuration (the optional watermark font), so a
/// single instance can serve any number of renders; there is no shared
/// mutable state between calls.
#[derive(Default)]
pub struct Renderer {
    font: Option<FontVec>,
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("font", &self.font.as_ref().map(|_| "<font>"))
            .finish()
    }
}

impl Renderer {
    /// Create a renderer without watermark support.
    ///
    /// Renders requesting an active watermark will fail with
    /// [`RenderError::FontUnavailable`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a renderer with a watermark font from raw font bytes
    /// (TTF/OTF).
    pub fn with_font(font_bytes: Vec<u8>) -> Result<Self, RenderError> {
        let font = FontVec::try_from_vec(font_bytes)
            .map_err(|e| RenderError::InvalidFont(e.to_string()))?;
        Ok(Self { font: Some(font) })
    }

    /// Whether a watermark font is loaded.
    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// Render the pipeline and return the raw output image (not encoded).
    ///
    /// This is what preview display and histogram sampling consume; export
    /// goes through [`Renderer::render`] for the encoded bytes.
    pub fn render_image(
        &self,
        source: &RasterImage,
        edits: &EditDescriptor,
        options: &ExportOptions,
    ) -> Result<RasterImage, RenderError> {
        // Stage 1: geometry
        let rect = resolve_source_rect(source.width, source.height, edits);
        let (out_width, out_height) = output_dimensions(&rect, options.scale);
        let mut image = geometry::extract_region(source, &rect, out_width, out_height)?;

        // Stage 2: tonal pass (skipped when every slider is neutral)
        if edits.has_tonal_adjustments() {
            tonal::apply_tonal_pass(&mut image.pixels, edits);
        }

        // Stage 3: detail pass
        if edits.has_detail_adjustments() {
            image = detail::apply_detail_pass(image, edits);
        }

        // Stage 4: watermark
        if let Some(wm) = &edits.watermark {
            if wm.is_active() {
                let font = self.font.as_ref().ok_or(RenderError::FontUnavailable)?;
                watermark::composite_watermark(&mut image, wm, font);
            }
        }

        Ok(image)
    }

    /// Render the pipeline to encoded bytes.
    pub fn render(
        &self,
        source: &RasterImage,
        edits: &EditDescriptor,
        options: &ExportOptions,
    ) -> Result<Vec<u8>, RenderError> {
        let image = self.render_image(source, edits, options)?;
        let bytes = encode(&image.pixels, image.width, image.height, options)?;
        Ok(bytes)
    }
}
