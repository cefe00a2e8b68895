//! Batch upload ingestion.
//!
//! Routes each uploaded file to the right pipeline by extension: RAW camera
//! files go through preview extraction, everything else through
//! normalization. Either way the result is a canonical JPEG asset.
//!
//! Failures are isolated per file: one corrupt upload never aborts its
//! siblings, and the report carries every failure alongside the successes so
//! the UI can present them in aggregate.

use thiserror::Error;

use crate::decode::{normalize, DecodeError};
use crate::raw::{extract_preview, is_raw_extension, PreviewError};

/// Error for a single file's ingestion.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Preview(#[from] PreviewError),
}

/// A canonical JPEG asset produced from one upload.
#[derive(Debug, Clone)]
pub struct CanonicalAsset {
    /// `.jpg`-suffixed canonical name.
    pub file_name: String,
    /// JPEG bytes.
    pub jpeg: Vec<u8>,
    /// Pixel width.
    pub width: u32,
    /// Pixel height.
    pub height: u32,
}

/// One failed upload, kept for aggregate reporting.
#[derive(Debug)]
pub struct IngestFailure {
    /// Name of the file as uploaded.
    pub file_name: String,
    /// Human-readable failure reason.
    pub reason: String,
}

/// Outcome of a batch ingestion.
#[derive(Debug, Default)]
pub struct IngestReport {
    /// Successfully ingested assets, in input order.
    pub assets: Vec<CanonicalAsset>,
    /// Failures, in input order.
    pub failures: Vec<IngestFailure>,
}

impl IngestReport {
    /// True when every file in the batch produced an asset.
    pub fn all_succeeded(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Ingest a single upload into a canonical asset.
///
/// RAW files (by extension) go through preview extraction; other files are
/// decoded and normalized.
pub fn ingest_file(bytes: &[u8], file_name: &str) -> Result<CanonicalAsset, IngestError> {
    if is_raw_extension(file_name) {
        let preview = extract_preview(bytes, file_name)?;
        Ok(CanonicalAsset {
            file_name: preview.file_name,
            jpeg: preview.jpeg,
            width: preview.width,
            height: preview.height,
        })
    } else {
        let normalized = normalize(bytes, file_name)?;
        Ok(CanonicalAsset {
            file_name: normalized.file_name,
            jpeg: normalized.jpeg,
            width: normalized.width,
            height: normalized.height,
        })
    }
}

/// Ingest a batch of uploads, isolating per-file failures.
pub fn ingest_files<'a, I>(files: I) -> IngestReport
where
    I: IntoIterator<Item = (&'a str, &'a [u8])>,
{
    let mut report = IngestReport::default();

    for (file_name, bytes) in files {
        match ingest_file(bytes, file_name) {
            Ok(asset) => report.assets.push(asset),
            Err(err) => report.failures.push(IngestFailure {
                file_name: file_name.to_string(),
                reason: err.to_string(),
            }),
        }
    }

    report
}
