//! Binary scan for embedded JPEG streams.
//!
//! Fallback strategy for RAW containers the metadata walker does not
//! understand: search the raw bytes for JPEG start-of-image markers and pair
//! each with the nearest end-of-image marker. The thresholds below are
//! tuning for common camera file sizes, not protocol law, and are kept as
//! named constants so they can be revisited in one place.

/// Start-of-image marker prefix. The third byte narrows matches to real JPEG
/// headers (`FF D8 FF` starts SOI + first segment marker).
pub const JPEG_SOI_PREFIX: [u8; 3] = [0xFF, 0xD8, 0xFF];

/// End-of-image marker.
pub const JPEG_EOI: [u8; 2] = [0xFF, 0xD9];

/// Spans shorter than this are assumed to be tiny thumbnails or stray marker
/// pairs, not a usable preview.
pub const MIN_SPAN_BYTES: usize = 100_000;

/// Maximum distance to search forward for the end marker from a given start.
pub const MAX_SEARCH_WINDOW: usize = 20_000_000;

/// After a start-marker match, the cursor skips this far ahead so the next
/// iteration does not re-match markers inside the same stream.
pub const MATCH_SKIP_BYTES: usize = 1_000;

/// At most this many spans are kept, largest first.
pub const MAX_SCAN_CANDIDATES: usize = 3;

/// Scan a buffer for plausible embedded JPEG streams.
///
/// Returns up to [`MAX_SCAN_CANDIDATES`] spans, ordered largest first. Each
/// span starts at an `FF D8 FF` sequence and ends just past the first
/// `FF D9` found within [`MAX_SEARCH_WINDOW`] bytes; spans of
/// [`MIN_SPAN_BYTES`] or less are dropped.
pub fn scan_for_jpeg_spans(bytes: &[u8]) -> Vec<Vec<u8>> {
    let mut spans: Vec<Vec<u8>> = Vec::new();

    let mut i = 0;
    while i + JPEG_SOI_PREFIX.len() <= bytes.len() {
        if bytes[i..i + 3] != JPEG_SOI_PREFIX {
            i += 1;
            continue;
        }

        if let Some(end) = find_eoi(bytes, i + 3) {
            let span = &bytes[i..end];
            if span.len() > MIN_SPAN_BYTES {
                insert_span(&mut spans, span);
            }
        }

        // Jump past the stream head before looking for the next marker
        i += MATCH_SKIP_BYTES;
    }

    spans
}

/// Find the exclusive end offset of the first EOI marker after `start`,
/// bounded by the search window.
fn find_eoi(bytes: &[u8], start: usize) -> Option<usize> {
    let limit = bytes.len().min(start.saturating_add(MAX_SEARCH_WINDOW));
    let mut j = start;
    while j + 2 <= limit {
        if bytes[j..j + 2] == JPEG_EOI {
            return Some(j + 2);
        }
        j += 1;
    }
    None
}

/// Keep the largest spans, bounded by [`MAX_SCAN_CANDIDATES`].
fn insert_span(spans: &mut Vec<Vec<u8>>, span: &[u8]) {
    let pos = spans
        .iter()
        .position(|s| s.len() < span.len())
        .unwrap_or(spans.len());
    if pos < MAX_SCAN_CANDIDATES {
        spans.insert(pos, span.to_vec());
        spans.truncate(MAX_SCAN_CANDIDATES);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Plant a start marker at `start` and an end marker so the span ends at
    /// `end` (exclusive).
    fn plant_jpeg(bytes: &mut [u8], start: usize, end: usize) {
        bytes[start] = 0xFF;
        bytes[start + 1] = 0xD8;
        bytes[start + 2] = 0xFF;
        bytes[end - 2] = 0xFF;
        bytes[end - 1] = 0xD9;
    }

    #[test]
    fn test_finds_large_span() {
        let mut bytes = vec![0u8; 300_000];
        plant_jpeg(&mut bytes, 10_000, 250_000);

        let spans = scan_for_jpeg_spans(&bytes);
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].len(), 240_000);
        assert_eq!(&spans[0][0..3], &JPEG_SOI_PREFIX);
        assert_eq!(&spans[0][spans[0].len() - 2..], &JPEG_EOI);
    }

    #[test]
    fn test_ignores_small_span() {
        let mut bytes = vec![0u8; 300_000];
        plant_jpeg(&mut bytes, 10_000, 60_000); // 50 KB, under the floor

        assert!(scan_for_jpeg_spans(&bytes).is_empty());
    }

    #[test]
    fn test_requires_three_byte_prefix() {
        // Bare FF D8 without a following FF is not a stream head
        let mut bytes = vec![0u8; 300_000];
        bytes[10_000] = 0xFF;
        bytes[10_001] = 0xD8;
        bytes[250_000] = 0xFF;
        bytes[250_001] = 0xD9;

        assert!(scan_for_jpeg_spans(&bytes).is_empty());
    }

    #[test]
    fn test_no_end_marker() {
        let mut bytes = vec![0u8; 300_000];
        bytes[10_000] = 0xFF;
        bytes[10_001] = 0xD8;
        bytes[10_002] = 0xFF;

        assert!(scan_for_jpeg_spans(&bytes).is_empty());
    }

    #[test]
    fn test_keeps_three_largest() {
        // Four streams of increasing size; the smallest qualifying one must
        // be dropped
        let mut bytes = vec![0u8; 2_000_000];
        let spans = [
            (0, 110_000),
            (200_000, 330_000), // 130 KB
            (400_000, 550_000), // 150 KB
            (600_000, 770_000), // 170 KB
        ];
        for &(start, end) in &spans {
            plant_jpeg(&mut bytes, start, end);
        }

        let found = scan_for_jpeg_spans(&bytes);
        assert_eq!(found.len(), MAX_SCAN_CANDIDATES);
        assert_eq!(found[0].len(), 170_000);
        assert_eq!(found[1].len(), 150_000);
        assert_eq!(found[2].len(), 130_000);
    }

    #[test]
    fn test_skip_margin_avoids_rematch_in_stream() {
        // A second SOI prefix planted just inside a stream head must not
        // produce a second candidate
        let mut bytes = vec![0u8; 400_000];
        plant_jpeg(&mut bytes, 10_000, 350_000);
        bytes[10_500] = 0xFF;
        bytes[10_501] = 0xD8;
        bytes[10_502] = 0xFF;

        let found = scan_for_jpeg_spans(&bytes);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].len(), 340_000);
    }

    #[test]
    fn test_empty_and_tiny_inputs() {
        assert!(scan_for_jpeg_spans(&[]).is_empty());
        assert!(scan_for_jpeg_spans(&[0xFF, 0xD8]).is_empty());
    }

    #[test]
    fn test_insert_span_ordering() {
        let mut spans = Vec::new();
        insert_span(&mut spans, &vec![0u8; 10]);
        insert_span(&mut spans, &vec![0u8; 30]);
        insert_span(&mut spans, &vec![0u8; 20]);
        insert_span(&mut spans, &vec![0u8; 5]); // dropped: list is full and smallest

        let lens: Vec<usize> = spans.iter().map(|s| s.len()).collect();
        assert_eq!(lens, vec![30, 20, 10]);
    }
}
