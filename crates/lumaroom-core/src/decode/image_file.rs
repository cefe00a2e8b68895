//! Decoding of uploaded image files with EXIF orientation handling.
//!
//! Uploads arrive as opaque byte blobs; the format is sniffed from the
//! content rather than trusted from the file name. Orientation is read from
//! EXIF before decoding and baked into the pixel data so downstream stages
//! never have to reason about it.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::DynamicImage;
use image::ImageReader;

use super::{DecodeError, Orientation, RasterImage};

/// Decode an image from bytes, applying EXIF orientation correction.
///
/// # Arguments
///
/// * `bytes` - Raw file bytes (JPEG or PNG)
///
/// # Returns
///
/// A `RasterImage` with RGB pixel data and correct orientation applied.
///
/// # Errors
///
/// Returns `DecodeError::SourceDecode` if the bytes cannot be interpreted as
/// an image. No partial output is produced.
pub fn decode_image(bytes: &[u8]) -> Result<RasterImage, DecodeError> {
    // Orientation has to come from the untouched container bytes
    let orientation = extract_orientation(bytes);

    let cursor = Cursor::new(bytes);
    let reader = ImageReader::new(cursor)
        .with_guessed_format()
        .map_err(|e| DecodeError::SourceDecode(e.to_string()))?;

    let img = reader
        .decode()
        .map_err(|e| DecodeError::SourceDecode(e.to_string()))?;

    let oriented = apply_orientation(img, orientation);
    Ok(RasterImage::from_rgb_image(oriented.into_rgb8()))
}

/// Extract the EXIF orientation value from image bytes.
///
/// Returns `Orientation::Normal` if no EXIF data is found or orientation
/// cannot be determined.
pub fn get_orientation(bytes: &[u8]) -> Orientation {
    extract_orientation(bytes)
}

fn extract_orientation(bytes: &[u8]) -> Orientation {
    let exif_reader = Reader::new();
    let mut cursor = Cursor::new(bytes);

    match exif_reader.read_from_container(&mut cursor) {
        Ok(exif) => {
            if let Some(field) = exif.get_field(Tag::Orientation, In::PRIMARY) {
                if let Some(value) = field.value.get_uint(0) {
                    return Orientation::from(value);
                }
            }
            Orientation::Normal
        }
        Err(_) => Orientation::Normal,
    }
}

/// Apply an EXIF orientation transformation to a decoded image.
fn apply_orientation(img: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Normal => img,
        Orientation::FlipHorizontal => img.fliph(),
        Orientation::Rotate180 => img.rotate180(),
        Orientation::FlipVertical => img.flipv(),
        Orientation::Transpose => img.rotate90().fliph(),
        Orientation::Rotate90CW => img.rotate90(),
        Orientation::Transverse => img.rotate270().fliph(),
        Orientation::Rotate270CW => img.rotate270(),
    }
}
