//! Shared luminance helpers using ITU-R BT.709 coefficients.
//!
//! The tonal pipeline and the histogram both weight channels the same way so
//! that what the histogram displays matches what the contrast and
//! shadow/highlight stages operate on.

/// ITU-R BT.709 coefficient for the red channel.
pub const LUMA_R: f32 = 0.2126;

/// ITU-R BT.709 coefficient for the green channel.
pub const LUMA_G: f32 = 0.7152;

/// ITU-R BT.709 coefficient for the blue channel.
pub const LUMA_B: f32 = 0.0722;

/// Weighted luma of a pixel whose channels are expressed in 0-255 space.
///
/// The result is in the same 0-255 space and is not rounded; the tonal
/// pipeline needs the fractional value for its ratio math.
#[inline]
pub fn luma(r: f32, g: f32, b: f32) -> f32 {
    LUMA_R * r + LUMA_G * g + LUMA_B * b
}

/// Weighted luma of a u8 RGB pixel, rounded to the nearest bucket (0-255).
#[inline]
pub fn luma_u8(r: u8, g: u8, b: u8) -> u8 {
    luma(r as f32, g as f32, b as f32)
        .clamp(0.0, 255.0)
        .round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coefficients_sum_to_one() {
        assert!((LUMA_R + LUMA_G + LUMA_B - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_gray_is_identity() {
        // Equal channels give back the channel value
        assert!((luma(128.0, 128.0, 128.0) - 128.0).abs() < 1e-3);
        assert_eq!(luma_u8(128, 128, 128), 128);
    }

    #[test]
    fn test_extremes() {
        assert_eq!(luma_u8(0, 0, 0), 0);
        assert_eq!(luma_u8(255, 255, 255), 255);
    }

    #[test]
    fn test_primaries() {
        // 0.2126 * 255 = 54.2, 0.7152 * 255 = 182.4, 0.0722 * 255 = 18.4
        assert_eq!(luma_u8(255, 0, 0), 54);
        assert_eq!(luma_u8(0, 255, 0), 182);
        assert_eq!(luma_u8(0, 0, 255), 18);
    }

    #[test]
    fn test_green_dominates() {
        assert!(luma(0.0, 200.0, 0.0) > luma(200.0, 0.0, 0.0));
        assert!(luma(200.0, 0.0, 0.0) > luma(0.0, 0.0, 200.0));
    }
}
