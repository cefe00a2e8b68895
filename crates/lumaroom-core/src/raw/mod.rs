//! RAW preview extraction pipeline.
//!
//! Browsers cannot decode RAW sensor data, so the editor works from the JPEG
//! rendition every camera embeds in its RAW files. Extraction runs up to
//! three strategies over the same immutable bytes:
//!
//! 1. metadata **preview** stream (SubIFD / IFD0 of the TIFF container)
//! 2. metadata **thumbnail** stream (IFD1)
//! 3. **binary scan** for JPEG marker pairs, for containers the metadata
//!    walker does not understand
//!
//! Every stream found is validated ([`validate::validate_candidate`]) and the
//! surviving candidate with the largest pixel area wins. Metadata extraction
//! is fast and usually accurate; the scan is the slow, robust fallback and is
//! skipped when metadata already produced a high-resolution result.

mod metadata;
mod scan;
mod validate;

pub use metadata::{extract_preview_stream, extract_thumbnail_stream};
pub use scan::{
    scan_for_jpeg_spans, MATCH_SKIP_BYTES, MAX_SCAN_CANDIDATES, MAX_SEARCH_WINDOW, MIN_SPAN_BYTES,
};
pub use validate::{validate_candidate, MIN_CANDIDATE_EDGE};

use thiserror::Error;

use crate::decode::jpg_file_name;

/// File extensions treated as RAW camera formats (lowercase, no dot).
pub const RAW_EXTENSIONS: [&str; 9] = [
    "cr2", "cr3", "nef", "arw", "orf", "raf", "dng", "pef", "rw2",
];

/// A validated metadata candidate at least this many pixels skips the binary
/// scan entirely.
pub const METADATA_SHORT_CIRCUIT_PIXELS: u64 = 4_000_000;

/// Errors from the preview extraction pipeline.
#[derive(Debug, Error)]
pub enum PreviewError {
    /// Every strategy ran and no candidate survived validation.
    #[error("No valid preview found in {file_name}")]
    NoValidPreview { file_name: String },
}

/// Which strategy produced a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateSource {
    MetadataPreview,
    MetadataThumbnail,
    BinaryScan,
}

/// A provisionally extracted preview, pending ranking.
#[derive(Debug, Clone)]
pub struct PreviewCandidate {
    /// The extracted JPEG stream.
    pub jpeg: Vec<u8>,
    /// Decoded width in pixels.
    pub width: u32,
    /// Decoded height in pixels.
    pub height: u32,
    /// Strategy that found this candidate.
    pub source: CandidateSource,
}

impl PreviewCandidate {
    /// Pixel area used for ranking.
    pub fn resolution(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

/// The winning preview, materialized as a canonical `.jpg` asset.
#[derive(Debug, Clone)]
pub struct PreviewAsset {
    /// Original file name with its extension replaced by `.jpg`.
    pub file_name: String,
    /// JPEG bytes, kept verbatim from the winning candidate.
    pub jpeg: Vec<u8>,
    /// Preview width in pixels.
    pub width: u32,
    /// Preview height in pixels.
    pub height: u32,
    /// Strategy that produced the winner.
    pub source: CandidateSource,
}

/// Check a file name against the known RAW extensions (case-insensitive).
pub fn is_raw_extension(file_name: &str) -> bool {
    match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => {
            let ext = ext.to_ascii_lowercase();
            RAW_EXTENSIONS.contains(&ext.as_str())
        }
        _ => false,
    }
}

/// Extract the best displayable preview from a RAW file.
///
/// Runs the strategies described in the module docs, ranks the validated
/// candidates by pixel area (ties go to discovery order), and returns the
/// winner renamed to a `.jpg` asset. The input bytes are never modified.
///
/// # Errors
///
/// `PreviewError::NoValidPreview` naming the file when no strategy produced
/// a candidate that passed validation.
pub fn extract_preview(bytes: &[u8], file_name: &str) -> Result<PreviewAsset, PreviewError> {
    let mut candidates = Vec::new();

    // Metadata strategies are independent; either may fail without
    // affecting the other.
    if let Some(jpeg) = extract_preview_stream(bytes) {
        push_validated(&mut candidates, jpeg, CandidateSource::MetadataPreview);
    }
    if let Some(jpeg) = extract_thumbnail_stream(bytes) {
        push_validated(&mut candidates, jpeg, CandidateSource::MetadataThumbnail);
    }

    // The scan is expensive on big files; skip it when metadata already
    // found a high-resolution preview.
    let have_large = candidates
        .iter()
        .any(|c| c.resolution() > METADATA_SHORT_CIRCUIT_PIXELS);
    if !have_large {
        for span in scan_for_jpeg_spans(bytes) {
            push_validated(&mut candidates, span, CandidateSource::BinaryScan);
        }
    }

    let best = select_best(candidates).ok_or_else(|| PreviewError::NoValidPreview {
        file_name: file_name.to_string(),
    })?;

    Ok(PreviewAsset {
        file_name: jpg_file_name(file_name),
        jpeg: best.jpeg,
        width: best.width,
        height: best.height,
        source: best.source,
    })
}

/// Validate a stream and append it as a candidate if it passes.
fn push_validated(candidates: &mut Vec<PreviewCandidate>, jpeg: Vec<u8>, source: CandidateSource) {
    if let Some((width, height)) = validate_candidate(&jpeg) {
        candidates.push(PreviewCandidate {
            jpeg,
            width,
            height,
            source,
        });
    }
}

/// Pick the candidate with the largest pixel area; ties go to the earliest
/// discovered.
fn select_best(candidates: Vec<PreviewCandidate>) -> Option<PreviewCandidate> {
    let mut best: Option<PreviewCandidate> = None;
    for candidate in candidates {
        match &best {
            Some(current) if candidate.resolution() <= current.resolution() => {}
            _ => best = Some(candidate),
        }
    }
    best
}
