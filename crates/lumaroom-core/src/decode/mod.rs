//! Image decoding and ingestion pipeline for Lumaroom.
//!
//! This module provides functionality for:
//! - Decoding uploaded images (JPEG, PNG) with EXIF orientation applied
//! - Resizing for previews and bounded sampling
//! - Normalizing arbitrary uploads into a canonical JPEG asset
//!
//! # Architecture
//!
//! The decoding pipeline is designed to be used from Web Workers via WASM
//! bindings. All operations are synchronous and single-threaded within WASM.

mod image_file;
mod normalize;
mod resize;
mod types;

pub use image_file::{decode_image, get_orientation};
pub use normalize::{normalize, NormalizedImage, NORMALIZE_JPEG_QUALITY, NORMALIZE_MAX_EDGE};
pub(crate) use normalize::jpg_file_name;

#[cfg(test)]
pub(crate) use image_file::tests::MINIMAL_JPEG;
pub use resize::{resize, resize_to_fit};
pub use types::{DecodeError, FilterType, Orientation, RasterImage};
