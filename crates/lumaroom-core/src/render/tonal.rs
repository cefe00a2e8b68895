//! Tonal and color pixel pass.
//!
//! Applies, per pixel and in order: exposure, contrast, shadow lift /
//! highlight recovery, then saturation and vibrance. All math happens in
//! 0-255 channel space; channels are clamped once after all stages.
//!
//! The constants here are product tuning carried over unchanged so that
//! exported pixels match the established output, not values derived from
//! first principles.

use crate::luminance::luma;
use crate::EditDescriptor;

/// Strength of the shadow-lift and highlight-recovery terms.
const TONE_REGION_FACTOR: f32 = 0.8;

/// Curve constant in the contrast remap.
const CONTRAST_K: f32 = 1.015;

/// Luma floor below which the contrast ratio scale is skipped.
const CONTRAST_LUMA_FLOOR: f32 = 1.0;

/// Apply the tonal pass to an RGB buffer in place.
///
/// Callers gate this on [`EditDescriptor::has_tonal_adjustments`]; running it
/// with all-neutral values is a numeric no-op but wastes a full pass.
pub fn apply_tonal_pass(pixels: &mut [u8], edits: &EditDescriptor) {
    for chunk in pixels.chunks_exact_mut(3) {
        let (r, g, b) = adjust_pixel(
            chunk[0] as f32,
            chunk[1] as f32,
            chunk[2] as f32,
            edits,
        );
        chunk[0] = r.clamp(0.0, 255.0) as u8;
        chunk[1] = g.clamp(0.0, 255.0) as u8;
        chunk[2] = b.clamp(0.0, 255.0) as u8;
    }
}

/// Run all tonal stages on one pixel (0-255 space, unclamped output).
fn adjust_pixel(r: f32, g: f32, b: f32, edits: &EditDescriptor) -> (f32, f32, f32) {
    let (r, g, b) = apply_exposure(r, g, b, edits.brightness);
    let (r, g, b) = apply_contrast(r, g, b, edits.contrast);
    let (r, g, b) = apply_tone_regions(r, g, b, edits.shadows, edits.highlights);
    apply_saturation_vibrance(r, g, b, edits.saturation, edits.vibrance)
}

/// Exposure: every channel scaled by `2^(brightness/100)`.
#[inline]
fn apply_exposure(r: f32, g: f32, b: f32, brightness: f32) -> (f32, f32, f32) {
    if brightness == 0.0 {
        return (r, g, b);
    }
    let multiplier = 2.0_f32.powf(brightness / 100.0);
    (r * multiplier, g * multiplier, b * multiplier)
}

/// Contrast: remap luma around the 128 midpoint, then scale the channels by
/// the luma ratio so hue and chroma ratios survive the remap.
#[inline]
fn apply_contrast(r: f32, g: f32, b: f32, contrast: f32) -> (f32, f32, f32) {
    if contrast == 0.0 {
        return (r, g, b);
    }

    let factor = contrast_factor(contrast);
    let l = luma(r, g, b);
    let new_l = 128.0 + factor * (l - 128.0);

    // Near-black pixels have no stable ratio to scale by
    if l <= CONTRAST_LUMA_FLOOR {
        return (r, g, b);
    }

    let ratio = new_l / l;
    (r * ratio, g * ratio, b * ratio)
}

/// The contrast curve gain for a slider value in [-100, 100].
#[inline]
fn contrast_factor(contrast: f32) -> f32 {
    CONTRAST_K * (contrast + 100.0) / (100.0 * (CONTRAST_K - contrast / 100.0))
}

/// Shadow lift and highlight recovery, weighted by where the pixel sits on
/// the luma axis: shadows fade in quadratically toward black, highlight
/// recovery toward white. Both terms add equally to all three channels.
#[inline]
fn apply_tone_regions(r: f32, g: f32, b: f32, shadows: f32, highlights: f32) -> (f32, f32, f32) {
    if shadows == 0.0 && highlights == 0.0 {
        return (r, g, b);
    }

    let nl = luma(r, g, b) / 255.0;

    let dark_weight = (1.0 - nl) * (1.0 - nl);
    let bright_weight = nl * nl;
    let shift =
        shadows * TONE_REGION_FACTOR * dark_weight - highlights * TONE_REGION_FACTOR * bright_weight;

    (r + shift, g + shift, b + shift)
}

/// Saturation and vibrance as a single luma-relative multiplier.
///
/// Vibrance attenuates as the pixel's existing saturation rises, so
/// already-vivid colors (and skin) move less than muted ones.
#[inline]
fn apply_saturation_vibrance(
    r: f32,
    g: f32,
    b: f32,
    saturation: f32,
    vibrance: f32,
) -> (f32, f32, f32) {
    if saturation == 0.0 && vibrance == 0.0 {
        return (r, g, b);
    }

    let l = luma(r, g, b);

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let current_sat = if max > 0.0 { (max - min) / max } else { 0.0 };

    let multiplier = (1.0 + saturation / 100.0) + (vibrance / 100.0) * (1.0 - current_sat);

    (
        l + (r - l) * multiplier,
        l + (g - l) * multiplier,
        l + (b - l) * multiplier,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edits() -> EditDescriptor {
        EditDescriptor::default()
    }

    /// Apply the pass to one pixel and return the resulting bytes.
    fn apply(px: [u8; 3], edits: &EditDescriptor) -> [u8; 3] {
        let mut pixels = px.to_vec();
        apply_tonal_pass(&mut pixels, edits);
        [pixels[0], pixels[1], pixels[2]]
    }

    // ===== Identity =====

    #[test]
    fn test_neutral_is_identity() {
        for px in [[0, 0, 0], [255, 255, 255], [128, 64, 192], [1, 2, 3]] {
            assert_eq!(apply(px, &edits()), px);
        }
    }

    // ===== Exposure =====

    #[test]
    fn test_exposure_full_slider_doubles() {
        // brightness 100 is one stop: 2^1
        let mut e = edits();
        e.brightness = 100.0;
        assert_eq!(apply([64, 64, 64], &e), [128, 128, 128]);
    }

    #[test]
    fn test_exposure_negative_halves() {
        let mut e = edits();
        e.brightness = -100.0;
        assert_eq!(apply([128, 128, 128], &e), [64, 64, 64]);
    }

    #[test]
    fn test_exposure_clips_at_white() {
        let mut e = edits();
        e.brightness = 100.0;
        assert_eq!(apply([200, 200, 200], &e), [255, 255, 255]);
    }

    // ===== Contrast =====

    #[test]
    fn test_contrast_factor_neutral_is_one() {
        assert!((contrast_factor(0.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_contrast_factor_full_negative_is_zero() {
        // Slider at -100 collapses everything to the midpoint
        assert!(contrast_factor(-100.0).abs() < 1e-6);
    }

    #[test]
    fn test_contrast_spreads_around_midpoint() {
        let mut e = edits();
        e.contrast = 50.0;
        let dark = apply([64, 64, 64], &e);
        let bright = apply([192, 192, 192], &e);
        assert!(dark[0] < 64, "dark pixels move darker, got {}", dark[0]);
        assert!(bright[0] > 192, "bright pixels move brighter, got {}", bright[0]);
    }

    #[test]
    fn test_contrast_negative_flattens() {
        let mut e = edits();
        e.contrast = -100.0;
        let dark = apply([30, 30, 30], &e);
        let bright = apply([220, 220, 220], &e);
        // Everything lands on the midpoint
        assert!((dark[0] as i32 - 128).abs() <= 1);
        assert!((bright[0] as i32 - 128).abs() <= 1);
    }

    #[test]
    fn test_contrast_preserves_hue_ratio() {
        let mut e = edits();
        e.contrast = 40.0;
        let out = apply([200, 100, 50], &e);
        // Channel ratios survive the luma remap (within u8 rounding)
        let r_over_g = out[0] as f32 / out[1] as f32;
        assert!((r_over_g - 2.0).abs() < 0.1, "got ratio {}", r_over_g);
    }

    #[test]
    fn test_contrast_skips_near_black() {
        let mut e = edits();
        e.contrast = 100.0;
        // Luma below the floor: no ratio scaling, pixel unchanged
        assert_eq!(apply([1, 0, 0], &e), [1, 0, 0]);
        assert_eq!(apply([0, 0, 0], &e), [0, 0, 0]);
    }

    // ===== Shadows / Highlights =====

    #[test]
    fn test_shadows_lift_dark_more_than_bright() {
        let mut e = edits();
        e.shadows = 50.0;
        let dark = apply([20, 20, 20], &e);
        let bright = apply([220, 220, 220], &e);
        let dark_delta = dark[0] as i32 - 20;
        let bright_delta = bright[0] as i32 - 220;
        assert!(dark_delta > 20, "dark lift was {}", dark_delta);
        assert!(bright_delta < 2, "bright lift was {}", bright_delta);
    }

    #[test]
    fn test_highlights_pull_bright_down() {
        let mut e = edits();
        e.highlights = 50.0;
        let bright = apply([230, 230, 230], &e);
        let dark = apply([30, 30, 30], &e);
        assert!(bright[0] < 230, "highlights should recover, got {}", bright[0]);
        assert!((dark[0] as i32 - 30).abs() <= 1, "dark pixels near-unchanged");
    }

    #[test]
    fn test_negative_shadows_deepen() {
        let mut e = edits();
        e.shadows = -50.0;
        let dark = apply([40, 40, 40], &e);
        assert!(dark[0] < 40);
    }

    #[test]
    fn test_tone_shift_is_channel_uniform() {
        let mut e = edits();
        e.shadows = 60.0;
        let out = apply([40, 20, 10], &e);
        // The same shift lands on every channel
        assert_eq!(out[0] as i32 - 40, out[1] as i32 - 20);
        assert_eq!(out[1] as i32 - 20, out[2] as i32 - 10);
    }

    // ===== Saturation / Vibrance =====

    #[test]
    fn test_saturation_spreads_channels() {
        let mut e = edits();
        e.saturation = 50.0;
        let out = apply([200, 128, 100], &e);
        let spread = out[0] as i32 - out[2] as i32;
        assert!(spread > 100, "spread should grow, got {}", spread);
    }

    #[test]
    fn test_full_desaturation_is_gray() {
        let mut e = edits();
        e.saturation = -100.0;
        let out = apply([200, 128, 100], &e);
        assert_eq!(out[0], out[1]);
        assert_eq!(out[1], out[2]);
    }

    #[test]
    fn test_vibrance_protects_saturated() {
        let mut e = edits();
        e.vibrance = 100.0;
        // Fully saturated red: current_sat = 1, multiplier stays 1
        assert_eq!(apply([255, 0, 0], &e), [255, 0, 0]);
    }

    #[test]
    fn test_vibrance_boosts_muted() {
        let mut e = edits();
        e.vibrance = 100.0;
        let out = apply([140, 130, 120], &e);
        let before = 140 - 120;
        let after = out[0] as i32 - out[2] as i32;
        assert!(after > before, "muted colors should gain, got {}", after);
    }

    #[test]
    fn test_vibrance_weaker_than_saturation_on_vivid() {
        let px = [220, 120, 40];
        let mut sat = edits();
        sat.saturation = 60.0;
        let mut vib = edits();
        vib.vibrance = 60.0;

        let sat_spread = {
            let o = apply(px, &sat);
            o[0] as i32 - o[2] as i32
        };
        let vib_spread = {
            let o = apply(px, &vib);
            o[0] as i32 - o[2] as i32
        };
        assert!(vib_spread < sat_spread);
    }

    #[test]
    fn test_saturation_black_pixel_no_division() {
        let mut e = edits();
        e.saturation = 100.0;
        e.vibrance = 100.0;
        // max = 0 branch: nothing to saturate, nothing to divide by
        assert_eq!(apply([0, 0, 0], &e), [0, 0, 0]);
    }

    // ===== Combined / extremes =====

    #[test]
    fn test_extreme_sliders_on_white_stay_in_range() {
        let mut e = edits();
        e.brightness = 100.0;
        e.contrast = 100.0;
        e.saturation = 100.0;
        let out = apply([255, 255, 255], &e);
        assert_eq!(out, [255, 255, 255]);
    }

    #[test]
    fn test_all_sliders_extreme_no_panic() {
        let mut e = edits();
        e.brightness = 100.0;
        e.contrast = 100.0;
        e.saturation = 100.0;
        e.vibrance = 100.0;
        e.shadows = 100.0;
        e.highlights = 100.0;
        for px in [[0, 0, 0], [255, 255, 255], [1, 254, 128]] {
            let _ = apply(px, &e);
        }

        e.brightness = -100.0;
        e.contrast = -100.0;
        e.saturation = -100.0;
        e.vibrance = -100.0;
        e.shadows = -100.0;
        e.highlights = -100.0;
        for px in [[0, 0, 0], [255, 255, 255], [1, 254, 128]] {
            let _ = apply(px, &e);
        }
    }

    #[test]
    fn test_pass_leaves_trailing_bytes() {
        // 1 pixel + 1 stray byte: the remainder is untouched
        let mut pixels = vec![64, 64, 64, 7];
        let mut e = edits();
        e.brightness = 100.0;
        apply_tonal_pass(&mut pixels, &e);
        assert_eq!(pixels, vec![128, 128, 128, 7]);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
