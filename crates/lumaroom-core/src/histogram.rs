//! Histogram computation for the edit view display.
//!
//! Computes 256-bin distributions for the red, green, and blue channels plus
//! BT.709 luminance. Large images are downsampled to a bounded long edge
//! first; that keeps live updates cheap and leaves the *shape* of the
//! distribution proportionally representative of the full image, which is
//! all the histogram widget needs. The bins are an approximation of the
//! full-resolution counts, not an exact tally.

use crate::decode::{resize_to_fit, FilterType, RasterImage};
use crate::luminance::luma_u8;
use crate::Histogram;

/// Long edge of the sampling downscale.
pub const HISTOGRAM_MAX_EDGE: u32 = 500;

/// Compute RGB and luminance histograms for an image.
///
/// Images whose long edge exceeds [`HISTOGRAM_MAX_EDGE`] are sampled through
/// a bilinear downscale; smaller images are binned directly. Every bin sum
/// equals the sampled pixel count.
pub fn compute_histogram(image: &RasterImage) -> Histogram {
    // A failed downscale (degenerate buffer) falls back to sampling the
    // image as-is; the distribution is still valid, just slower to compute.
    let sampled = resize_to_fit(image, HISTOGRAM_MAX_EDGE, FilterType::Bilinear)
        .unwrap_or_else(|_| image.clone());

    bin_pixels(&sampled.pixels)
}

/// Single-pass binning over an RGB buffer.
fn bin_pixels(pixels: &[u8]) -> Histogram {
    let mut hist = Histogram::new();

    for chunk in pixels.chunks_exact(3) {
        hist.red[chunk[0] as usize] += 1;
        hist.green[chunk[1] as usize] += 1;
        hist.blue[chunk[2] as usize] += 1;

        let lum = luma_u8(chunk[0], chunk[1], chunk[2]);
        hist.luminance[lum as usize] += 1;
    }

    hist
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sum(bins: &[u32; 256]) -> u64 {
        bins.iter().map(|&v| v as u64).sum()
    }

    #[test]
    fn test_empty_image() {
        let hist = compute_histogram(&RasterImage::new(0, 0, vec![]));
        assert_eq!(hist.max_value(), 0);
    }

    #[test]
    fn test_single_pixels() {
        let hist = compute_histogram(&RasterImage::new(1, 1, vec![255, 0, 0]));
        assert_eq!(hist.red[255], 1);
        assert_eq!(hist.green[0], 1);
        assert_eq!(hist.blue[0], 1);
        assert!(hist.has_highlight_clipping());
        assert!(hist.has_shadow_clipping());

        let hist = compute_histogram(&RasterImage::new(1, 1, vec![128, 128, 128]));
        assert_eq!(hist.red[128], 1);
        assert_eq!(hist.luminance[128], 1);
        assert!(!hist.has_highlight_clipping());
        assert!(!hist.has_shadow_clipping());
    }

    #[test]
    fn test_bin_sums_equal_pixel_count() {
        // Small image: no downscale, sums match exactly
        let mut pixels = Vec::new();
        for i in 0..(37 * 23) {
            pixels.push((i % 256) as u8);
            pixels.push(((i * 3) % 256) as u8);
            pixels.push(((i * 7) % 256) as u8);
        }
        let hist = compute_histogram(&RasterImage::new(37, 23, pixels));

        let count = 37 * 23;
        assert_eq!(sum(&hist.red), count);
        assert_eq!(sum(&hist.green), count);
        assert_eq!(sum(&hist.blue), count);
        assert_eq!(sum(&hist.luminance), count);
    }

    #[test]
    fn test_bin_sums_after_downscale() {
        // 1000x800 exceeds the sampling bound; the sums reflect the
        // 500x400 downscale
        let img = RasterImage::new(1000, 800, vec![100; 1000 * 800 * 3]);
        let hist = compute_histogram(&img);

        let sampled_count = 500 * 400;
        assert_eq!(sum(&hist.red), sampled_count);
        assert_eq!(sum(&hist.green), sampled_count);
        assert_eq!(sum(&hist.blue), sampled_count);
        assert_eq!(sum(&hist.luminance), sampled_count);
    }

    #[test]
    fn test_uniform_image_single_bin() {
        let img = RasterImage::new(100, 100, vec![100; 100 * 100 * 3]);
        let hist = compute_histogram(&img);

        assert_eq!(hist.red[100], 10_000);
        assert_eq!(hist.max_value(), 10_000);
        // Uniform gray lands in a single luminance bin too
        assert_eq!(hist.luminance[100], 10_000);
    }

    #[test]
    fn test_gradient_distribution() {
        let mut pixels = Vec::new();
        for i in 0..=255 {
            pixels.push(i as u8);
            pixels.push(i as u8);
            pixels.push(i as u8);
        }
        let hist = compute_histogram(&RasterImage::new(256, 1, pixels));

        for i in 0..256 {
            assert_eq!(hist.red[i], 1);
            assert_eq!(hist.green[i], 1);
            assert_eq!(hist.blue[i], 1);
        }
        assert_eq!(hist.max_value(), 1);
    }

    #[test]
    fn test_downscale_preserves_uniform_value() {
        // Downscaling a uniform image cannot shift its single peak
        let img = RasterImage::new(2000, 1500, vec![73; 2000 * 1500 * 3]);
        let hist = compute_histogram(&img);
        assert_eq!(hist.red[73] as u64, sum(&hist.red));
    }

    #[test]
    fn test_luminance_weighting() {
        // Pure green weighs far more than pure blue
        let hist = compute_histogram(&RasterImage::new(2, 1, vec![0, 255, 0, 0, 0, 255]));
        assert_eq!(hist.luminance[182], 1); // green
        assert_eq!(hist.luminance[18], 1); // blue
    }
}
