//! Detail pass: noise reduction, sharpening, and clarity.
//!
//! Noise reduction is a plain uniform blur, not an edge-aware denoiser; real
//! denoising is out of scope for this engine. Sharpening and clarity share a
//! single discrete-Laplacian edge pass and differ only in weighting, with
//! clarity acting as a softer midtone-contrast variant.

use crate::decode::RasterImage;
use crate::EditDescriptor;

/// Laplacian magnitude below this is treated as flat noise and left alone.
const SHARPEN_THRESHOLD: f32 = 10.0;

/// Clarity contributes at this fraction of the sharpening strength.
const CLARITY_WEIGHT: f32 = 0.6;

/// Slider-to-sigma divisor for the noise reduction blur.
const BLUR_SIGMA_DIVISOR: f32 = 40.0;

/// Clarity slider divisor (sharpness uses the full 100 range).
const CLARITY_DIVISOR: f32 = 80.0;

/// Run the detail stages on a rendered buffer.
///
/// Callers gate this on [`EditDescriptor::has_detail_adjustments`]. Noise
/// reduction runs first so sharpening operates on the smoothed signal.
pub fn apply_detail_pass(image: RasterImage, edits: &EditDescriptor) -> RasterImage {
    let mut image = image;

    if edits.noise_reduction > 0.0 {
        image = apply_noise_reduction(&image, edits.noise_reduction);
    }

    if edits.sharpness > 0.0 || edits.clarity > 0.0 {
        image = apply_sharpen(&image, edits.sharpness, edits.clarity);
    }

    image
}

/// Replace the buffer with a blurred copy, radius proportional to the slider.
fn apply_noise_reduction(image: &RasterImage, amount: f32) -> RasterImage {
    let Some(rgb) = image.to_rgb_image() else {
        return image.clone();
    };

    let sigma = amount / BLUR_SIGMA_DIVISOR;
    let blurred = image::imageops::blur(&rgb, sigma);
    RasterImage::from_rgb_image(blurred)
}

/// Thresholded Laplacian sharpening over the interior pixels.
///
/// For each interior pixel and channel the 4-neighbor Laplacian
/// `4c - (up + down + left + right)` is measured against the source buffer;
/// responses above the threshold are added back scaled by the sharpness and
/// clarity sliders. The 1px border is copied through untouched.
fn apply_sharpen(image: &RasterImage, sharpness: f32, clarity: f32) -> RasterImage {
    let width = image.width as usize;
    let height = image.height as usize;
    if width < 3 || height < 3 {
        return image.clone();
    }

    let src = &image.pixels;
    let mut out = src.clone();

    let gain = sharpness / 100.0 + (clarity / CLARITY_DIVISOR) * CLARITY_WEIGHT;
    let stride = width * 3;

    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let idx = y * stride + x * 3;
            for c in 0..3 {
                let center = src[idx + c] as f32;
                let up = src[idx - stride + c] as f32;
                let down = src[idx + stride + c] as f32;
                let left = src[idx - 3 + c] as f32;
                let right = src[idx + 3 + c] as f32;

                let laplacian = 4.0 * center - (up + down + left + right);
                if laplacian.abs() > SHARPEN_THRESHOLD {
                    out[idx + c] = (center + laplacian * gain).clamp(0.0, 255.0) as u8;
                }
            }
        }
    }

    RasterImage::new(image.width, image.height, out)
}
