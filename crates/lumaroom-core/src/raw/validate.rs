//! Candidate validation for extracted preview streams.
//!
//! An extracted stream is only a *candidate* until it proves it decodes to a
//! real picture: embedded previews in the wild are sometimes truncated,
//! undersized, or solid-black placeholders written by the camera firmware.

use crate::decode::{decode_image, resize, FilterType, RasterImage};

/// Candidates with either dimension below this are rejected as too small to
/// be a usable preview.
pub const MIN_CANDIDATE_EDGE: u32 = 50;

/// Edge length of the downsample used for the content probe.
const PROBE_EDGE: u32 = 40;

/// Validate a candidate JPEG stream, returning its dimensions when it passes.
///
/// Checks, in order:
/// 1. the stream decodes at all;
/// 2. both dimensions are at least [`MIN_CANDIDATE_EDGE`];
/// 3. a small downsample of the image has non-zero total channel energy
///    (rejects solid-black placeholder frames).
///
/// The content probe is best-effort: if the downsample itself cannot be
/// produced the check is skipped and the candidate passes. Over-rejecting
/// real previews is worse than occasionally accepting an unverified one.
pub fn validate_candidate(jpeg: &[u8]) -> Option<(u32, u32)> {
    let image = decode_image(jpeg).ok()?;

    if image.width < MIN_CANDIDATE_EDGE || image.height < MIN_CANDIDATE_EDGE {
        return None;
    }

    if !probe_has_content(&image).unwrap_or(true) {
        return None;
    }

    Some((image.width, image.height))
}

/// Downsample the image and report whether any channel carries energy.
///
/// Returns `None` when the probe cannot run; the caller treats that as
/// "cannot verify, assume valid".
fn probe_has_content(image: &RasterImage) -> Option<bool> {
    let probe = resize(image, PROBE_EDGE, PROBE_EDGE, FilterType::Bilinear).ok()?;
    let energy: u64 = probe.pixels.iter().map(|&v| v as u64).sum();
    Some(energy > 0)
}
