//! Image encoding pipeline for Lumaroom.
//!
//! This module provides functionality for:
//! - Encoding images to JPEG format with configurable quality
//! - Encoding images to lossless PNG
//!
//! # Architecture
//!
//! The encoding pipeline is designed to be used from Web Workers via WASM
//! bindings. All operations are synchronous and single-threaded within WASM.

mod jpeg;
mod png;

pub use jpeg::encode_jpeg;
pub use png::encode_png;

use thiserror::Error;

use crate::{ExportFormat, ExportOptions};

/// Errors that can occur during image encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 3), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// The underlying encoder produced no output
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),
}

/// Validate dimensions and pixel buffer length before encoding.
pub(crate) fn check_buffer(pixels: &[u8], width: u32, height: u32) -> Result<(), EncodeError> {
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let expected_len = (width as usize) * (height as usize) * 3;
    if pixels.len() != expected_len {
        return Err(EncodeError::InvalidPixelData {
            expected: expected_len,
            actual: pixels.len(),
        });
    }

    Ok(())
}

/// Encode RGB pixel data according to export options.
///
/// Dispatches to the JPEG encoder (with the requested quality) or the
/// lossless PNG encoder.
pub fn encode(
    pixels: &[u8],
    width: u32,
    height: u32,
    options: &ExportOptions,
) -> Result<Vec<u8>, EncodeError> {
    match options.format {
        ExportFormat::Jpeg => encode_jpeg(pixels, width, height, options.quality),
        ExportFormat::Png => encode_png(pixels, width, height),
    }
}
