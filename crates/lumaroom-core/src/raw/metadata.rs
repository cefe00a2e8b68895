//! Embedded preview extraction from TIFF-based RAW containers.
//!
//! Most RAW formats (ARW, NEF, CR2, DNG, ...) are TIFF containers that embed
//! one or more JPEG renditions of the frame: a large preview, usually hanging
//! off a SubIFD or IFD0 itself, and a small thumbnail in IFD1. This module
//! walks the IFD structure and pulls out those JPEG streams without touching
//! the sensor data.
//!
//! Vendors disagree on where exactly the streams live, so extraction is
//! deliberately lenient: anything that fails a bounds or magic check is
//! skipped rather than treated as a hard error. A missing stream is an
//! `Option::None`, never a panic.

// TIFF byte-order magic
const TIFF_MAGIC_LE: [u8; 4] = [0x49, 0x49, 0x2A, 0x00]; // II + 42
const TIFF_MAGIC_BE: [u8; 4] = [0x4D, 0x4D, 0x00, 0x2A]; // MM + 42

// TIFF tag IDs
const TAG_STRIP_OFFSETS: u16 = 0x0111;
const TAG_STRIP_BYTE_COUNTS: u16 = 0x0117;
const TAG_JPEG_OFFSET: u16 = 0x0201; // JpegInterchangeFormat
const TAG_JPEG_LENGTH: u16 = 0x0202; // JpegInterchangeFormatLength
const TAG_SUBIFD: u16 = 0x014A; // SubIFDs
const TAG_COMPRESSION: u16 = 0x0103;

// JPEG compression values for strip-based previews
const COMPRESSION_JPEG: u32 = 6;
const COMPRESSION_JPEG_OLD: u32 = 7;

const JPEG_SOI: [u8; 2] = [0xFF, 0xD8];

/// IFD entry count above this is treated as a corrupt file.
const MAX_IFD_ENTRIES: u16 = 1000;

/// SubIFD streams shorter than this are assumed to be tiny thumbnails, not
/// the full-size preview, and fall through to the other strategies.
const MIN_PREVIEW_STREAM_BYTES: usize = 10_000;

/// One parsed IFD entry. Only the fields the extractor needs.
struct IfdEntry {
    tag: u16,
    count: u32,
    value: u32,
}

/// Slice-backed TIFF walker with the container's byte order.
struct Tiff<'a> {
    data: &'a [u8],
    le: bool,
}

impl<'a> Tiff<'a> {
    /// Validate the TIFF header and return the walker plus the IFD0 offset.
    fn parse(data: &'a [u8]) -> Option<(Self, u32)> {
        if data.len() < 8 {
            return None;
        }
        let le = if data[..4] == TIFF_MAGIC_LE {
            true
        } else if data[..4] == TIFF_MAGIC_BE {
            false
        } else {
            return None;
        };

        let tiff = Self { data, le };
        let ifd0 = tiff.u32_at(4)?;
        Some((tiff, ifd0))
    }

    fn u16_at(&self, offset: usize) -> Option<u16> {
        let bytes: [u8; 2] = self.data.get(offset..offset + 2)?.try_into().ok()?;
        Some(if self.le {
            u16::from_le_bytes(bytes)
        } else {
            u16::from_be_bytes(bytes)
        })
    }

    fn u32_at(&self, offset: usize) -> Option<u32> {
        let bytes: [u8; 4] = self.data.get(offset..offset + 4)?.try_into().ok()?;
        Some(if self.le {
            u32::from_le_bytes(bytes)
        } else {
            u32::from_be_bytes(bytes)
        })
    }

    /// Parse the IFD at `offset`, returning its entries and the offset of the
    /// next IFD (0 when there is none). Entries whose value offset points
    /// past the end of the file are skipped.
    fn parse_ifd(&self, offset: u32) -> Option<(Vec<IfdEntry>, u32)> {
        let base = offset as usize;
        let entry_count = self.u16_at(base)?;
        if entry_count > MAX_IFD_ENTRIES {
            return None;
        }

        let mut entries = Vec::with_capacity(entry_count as usize);
        for i in 0..entry_count as usize {
            let entry_base = base + 2 + i * 12;
            let tag = self.u16_at(entry_base)?;
            let count = self.u32_at(entry_base + 4)?;
            let value = self.u32_at(entry_base + 8)?;

            if value as usize > self.data.len() {
                continue;
            }
            entries.push(IfdEntry { tag, count, value });
        }

        let next = self
            .u32_at(base + 2 + entry_count as usize * 12)
            .unwrap_or(0);
        Some((entries, next))
    }

    /// Pull a JPEG stream described by a set of IFD entries, trying the
    /// JPEGInterchangeFormat pair first and JPEG-compressed strips second.
    fn jpeg_from_entries(&self, entries: &[IfdEntry]) -> Option<Vec<u8>> {
        let find = |tag: u16| entries.iter().find(|e| e.tag == tag).map(|e| e.value);

        if let (Some(offset), Some(length)) = (find(TAG_JPEG_OFFSET), find(TAG_JPEG_LENGTH)) {
            if let Some(jpeg) = self.jpeg_slice(offset, length) {
                return Some(jpeg);
            }
        }

        let is_jpeg_strip = find(TAG_COMPRESSION)
            .map(|c| c == COMPRESSION_JPEG || c == COMPRESSION_JPEG_OLD)
            .unwrap_or(false);
        if is_jpeg_strip {
            if let (Some(offset), Some(length)) =
                (find(TAG_STRIP_OFFSETS), find(TAG_STRIP_BYTE_COUNTS))
            {
                if let Some(jpeg) = self.jpeg_slice(offset, length) {
                    return Some(jpeg);
                }
            }
        }

        None
    }

    /// Copy out `length` bytes at `offset` if in bounds and starting with the
    /// JPEG SOI marker.
    fn jpeg_slice(&self, offset: u32, length: u32) -> Option<Vec<u8>> {
        if length == 0 {
            return None;
        }
        let start = offset as usize;
        let end = start.checked_add(length as usize)?;
        let slice = self.data.get(start..end)?;
        if slice.len() >= 2 && slice[..2] == JPEG_SOI {
            Some(slice.to_vec())
        } else {
            None
        }
    }
}

/// Extract the large embedded preview stream from a TIFF-based RAW file.
///
/// Looks in the SubIFD first (where most vendors put the full-size preview),
/// then in IFD0's own entries. Returns `None` when the container is not TIFF
/// or carries no recognizable preview stream.
pub fn extract_preview_stream(bytes: &[u8]) -> Option<Vec<u8>> {
    let (tiff, ifd0_offset) = Tiff::parse(bytes)?;
    let (entries, _) = tiff.parse_ifd(ifd0_offset)?;

    if let Some(subifd) = entries
        .iter()
        .find(|e| e.tag == TAG_SUBIFD && e.count > 0)
    {
        if let Some((sub_entries, _)) = tiff.parse_ifd(subifd.value) {
            if let Some(jpeg) = tiff.jpeg_from_entries(&sub_entries) {
                if jpeg.len() > MIN_PREVIEW_STREAM_BYTES {
                    return Some(jpeg);
                }
            }
        }
    }

    tiff.jpeg_from_entries(&entries)
}

/// Extract the standard EXIF thumbnail stream (IFD1) from a TIFF-based RAW
/// file.
pub fn extract_thumbnail_stream(bytes: &[u8]) -> Option<Vec<u8>> {
    let (tiff, ifd0_offset) = Tiff::parse(bytes)?;
    let (_, next_ifd) = tiff.parse_ifd(ifd0_offset)?;
    if next_ifd == 0 {
        return None;
    }

    let (entries, _) = tiff.parse_ifd(next_ifd)?;
    tiff.jpeg_from_entries(&entries)
}
