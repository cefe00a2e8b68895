//! Geometry stage: source rectangle resolution and output sizing.
//!
//! The first render stage decides which region of the source is used and how
//! big the output is. An explicit crop always wins over an aspect-ratio
//! derivation; with neither, the full frame is used.

use crate::decode::{resize, FilterType, RasterImage};
use crate::{CropRect, EditDescriptor};

use super::RenderError;

/// Resolve the source rectangle for a render.
///
/// - An explicit `crop` is clamped so the rectangle stays inside the source.
/// - Otherwise a positive, finite `aspect_ratio` derives a centered
///   rectangle: when the source is wider than the target ratio the width is
///   reduced, otherwise the height.
/// - Otherwise the full source rectangle is returned.
///
/// Degenerate inputs (zero-sized crop, out-of-range origin, non-finite
/// ratio) fall back to the nearest safe rectangle rather than erroring; the
/// geometry stage never produces an empty region.
pub fn resolve_source_rect(src_width: u32, src_height: u32, edits: &EditDescriptor) -> CropRect {
    if let Some(crop) = &edits.crop {
        return clamp_crop(src_width, src_height, crop);
    }

    if let Some(ratio) = edits.aspect_ratio {
        if ratio.is_finite() && ratio > 0.0 {
            return centered_aspect_rect(src_width, src_height, ratio);
        }
    }

    CropRect::new(0, 0, src_width, src_height)
}

/// Clamp a crop rectangle into the source bounds, keeping at least one pixel.
fn clamp_crop(src_width: u32, src_height: u32, crop: &CropRect) -> CropRect {
    let x = crop.x.min(src_width.saturating_sub(1));
    let y = crop.y.min(src_height.saturating_sub(1));
    let width = crop.width.min(src_width - x).max(1);
    let height = crop.height.min(src_height - y).max(1);
    CropRect::new(x, y, width, height)
}

/// Derive a centered crop matching the target width/height ratio.
fn centered_aspect_rect(src_width: u32, src_height: u32, ratio: f32) -> CropRect {
    let src_ratio = src_width as f64 / src_height as f64;
    let target = ratio as f64;

    if src_ratio > target {
        // Source is wider than the target: shrink width, center horizontally
        let width = ((src_height as f64 * target).round() as u32).clamp(1, src_width);
        let x = (src_width - width) / 2;
        CropRect::new(x, 0, width, src_height)
    } else {
        // Source is taller (or equal): shrink height, center vertically
        let height = ((src_width as f64 / target).round() as u32).clamp(1, src_height);
        let y = (src_height - height) / 2;
        CropRect::new(0, y, src_width, height)
    }
}

/// Final output dimensions: the source rectangle scaled and floored.
///
/// A non-positive or non-finite scale is treated as 1.0; dimensions never
/// drop below 1x1.
pub fn output_dimensions(rect: &CropRect, scale: f32) -> (u32, u32) {
    let scale = if scale.is_finite() && scale > 0.0 {
        scale as f64
    } else {
        1.0
    };

    let width = (rect.width as f64 * scale).floor() as u32;
    let height = (rect.height as f64 * scale).floor() as u32;
    (width.max(1), height.max(1))
}

/// Extract the resolved rectangle from the source and scale it to the output
/// dimensions.
///
/// This is the whole of the neutral-edit render: crop plus resample, with no
/// pixel pass. Non-neutral renders run their pixel stages on the buffer this
/// returns.
pub fn extract_region(
    source: &RasterImage,
    rect: &CropRect,
    out_width: u32,
    out_height: u32,
) -> Result<RasterImage, RenderError> {
    let rgb = source
        .to_rgb_image()
        .ok_or_else(|| RenderError::InvalidSource("Inconsistent pixel buffer".to_string()))?;

    let cropped = image::imageops::crop_imm(&rgb, rect.x, rect.y, rect.width, rect.height).to_image();
    let cropped = RasterImage::from_rgb_image(cropped);

    if cropped.width == out_width && cropped.height == out_height {
        return Ok(cropped);
    }

    resize(&cropped, out_width, out_height, FilterType::Lanczos3)
        .map_err(|e| RenderError::InvalidSource(e.to_string()))
}


// ============================================================================
// Property-Based Tests
// ============================================================================
