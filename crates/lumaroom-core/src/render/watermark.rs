//! Text watermark compositing.
//!
//! The watermark text is rasterized into a grayscale coverage mask, placed
//! with the 6-position lookup (five fixed anchors plus a rotated tiled
//! mode), and alpha-blended over the rendered pixels. Compositing happens in
//! place and never changes the output dimensions.
//!
//! Glyph rasterization needs a font; the browser layer supplies the font
//! bytes once when it constructs the [`Renderer`](super::Renderer).

use ab_glyph::{FontVec, PxScale};
use image::{GrayImage, Luma};
use imageproc::drawing::{draw_text_mut, text_size};
use imageproc::geometric_transformations::{rotate_about_center, Interpolation};

use crate::decode::RasterImage;
use crate::{Watermark, WatermarkPosition};

/// Size-slider divisor: font pixels = image width * size / 300.
const SIZE_DIVISOR: f32 = 300.0;

/// Tiled-mode rotation, in radians (-45 degrees).
const TILE_ANGLE: f32 = -std::f32::consts::FRAC_PI_4;

/// Composite a watermark over the rendered buffer in place.
///
/// Callers gate this on [`Watermark::is_active`]. An unparseable color falls
/// back to white rather than failing the render.
pub fn composite_watermark(image: &mut RasterImage, watermark: &Watermark, font: &FontVec) {
    let font_px = (image.width as f32 * watermark.size / SIZE_DIVISOR).max(1.0);
    let alpha = (watermark.opacity / 100.0).clamp(0.0, 1.0);
    if alpha == 0.0 {
        return;
    }
    let color = parse_hex_color(&watermark.color).unwrap_or([255, 255, 255]);

    match watermark.position {
        WatermarkPosition::Tiled => {
            let mask = tiled_mask(
                image.width,
                image.height,
                &watermark.text,
                font,
                font_px,
            );
            // Center the rotated tile canvas over the image
            let x = (image.width as i64 - mask.width() as i64) / 2;
            let y = (image.height as i64 - mask.height() as i64) / 2;
            composite_mask(image, &mask, x, y, color, alpha);
        }
        position => {
            let scale = PxScale::from(font_px);
            let (text_w, text_h) = text_size(scale, font, &watermark.text);
            let mask = text_mask(&watermark.text, font, font_px);
            let (x, y) = anchor_origin(position, image.width, image.height, text_w, text_h, font_px);
            composite_mask(image, &mask, x, y, color, alpha);
        }
    }
}

/// Rasterize the text into a tight grayscale coverage mask.
fn text_mask(text: &str, font: &FontVec, font_px: f32) -> GrayImage {
    let scale = PxScale::from(font_px);
    let (w, h) = text_size(scale, font, text);
    let mut mask = GrayImage::new(w.max(1), h.max(1));
    draw_text_mut(&mut mask, Luma([255u8]), 0, 0, scale, font, text);
    mask
}

/// Build the tiled mask: text repeated over a diagonal-sized canvas, then
/// rotated about its center so the rows run at -45 degrees.
fn tiled_mask(img_w: u32, img_h: u32, text: &str, font: &FontVec, font_px: f32) -> GrayImage {
    let scale = PxScale::from(font_px);
    let (text_w, _) = text_size(scale, font, text);

    // The rotated canvas must cover the image corners
    let diag = ((img_w as f64).hypot(img_h as f64)).ceil() as u32;
    let mut tile = GrayImage::new(diag.max(1), diag.max(1));

    let step_x = (text_w + (font_px * 2.0) as u32).max(1);
    let step_y = ((font_px * 3.0) as u32).max(1);

    let mut y = 0u32;
    while y < diag {
        let mut x = 0u32;
        while x < diag {
            draw_text_mut(&mut tile, Luma([255u8]), x as i32, y as i32, scale, font, text);
            x += step_x;
        }
        y += step_y;
    }

    rotate_about_center(&tile, TILE_ANGLE, Interpolation::Bilinear, Luma([0u8]))
}

/// Top-left origin for one of the five fixed anchors.
///
/// Padding is half the font size; origins are clamped so the text stays
/// inside the canvas even when it is wider than the image.
pub(crate) fn anchor_origin(
    position: WatermarkPosition,
    img_w: u32,
    img_h: u32,
    text_w: u32,
    text_h: u32,
    font_px: f32,
) -> (i64, i64) {
    let pad = (font_px / 2.0).round() as i64;
    let (iw, ih) = (img_w as i64, img_h as i64);
    let (tw, th) = (text_w as i64, text_h as i64);

    let (x, y) = match position {
        WatermarkPosition::Center => ((iw - tw) / 2, (ih - th) / 2),
        WatermarkPosition::BottomRight => (iw - tw - pad, ih - th - pad),
        WatermarkPosition::BottomLeft => (pad, ih - th - pad),
        WatermarkPosition::TopRight => (iw - tw - pad, pad),
        WatermarkPosition::TopLeft => (pad, pad),
        // Tiled placement is computed from the rotated canvas, not an anchor
        WatermarkPosition::Tiled => (0, 0),
    };

    (x.max(0), y.max(0))
}

/// Alpha-blend a coverage mask over the image at the given origin.
///
/// Mask pixels scale the global alpha; areas of the mask outside the image
/// are skipped. Only pixel content changes, never dimensions.
pub(crate) fn composite_mask(
    image: &mut RasterImage,
    mask: &GrayImage,
    origin_x: i64,
    origin_y: i64,
    color: [u8; 3],
    alpha: f32,
) {
    let img_w = image.width as i64;
    let img_h = image.height as i64;

    for (mx, my, coverage) in mask.enumerate_pixels() {
        let coverage = coverage.0[0];
        if coverage == 0 {
            continue;
        }

        let x = origin_x + mx as i64;
        let y = origin_y + my as i64;
        if x < 0 || y < 0 || x >= img_w || y >= img_h {
            continue;
        }

        let a = alpha * coverage as f32 / 255.0;
        let idx = (y * img_w + x) as usize * 3;
        for c in 0..3 {
            let dst = image.pixels[idx + c] as f32;
            image.pixels[idx + c] = (dst * (1.0 - a) + color[c] as f32 * a).round() as u8;
        }
    }
}

/// Parse a `#rrggbb` hex color (leading `#` optional).
pub(crate) fn parse_hex_color(color: &str) -> Option<[u8; 3]> {
    let hex = color.strip_prefix('#').unwrap_or(color);
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some([r, g, b])
}
