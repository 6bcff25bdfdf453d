//! `Range` request headers and the partial responses they turn into.

use std::io::Read;

use crate::utils::range_reader::RangeReader;
use crate::{CatalogError, Result};

/// A satisfiable byte range, clamped to the resource length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    pub length: u64,
}

fn invalid(value: &str) -> CatalogError {
    CatalogError::Config(format!("invalid range: {:?}", value))
}

/// Parse a `Range` header value for a resource of `total_len` bytes.
///
/// An empty value asks for no ranges. Ranges starting at or past the end are
/// dropped; if that leaves nothing the range is unsatisfiable.
pub fn parse_range_header(value: &str, total_len: u64) -> Result<Vec<ByteRange>> {
    if value.is_empty() {
        return Ok(Vec::new());
    }
    let parts = value.strip_prefix("bytes=").ok_or_else(|| invalid(value))?;

    let mut ranges = Vec::new();
    let mut no_overlap = false;

    for part in parts.split(',').map(str::trim) {
        if part.is_empty() {
            continue;
        }
        let (start, end) = part.split_once('-').ok_or_else(|| invalid(value))?;
        let (start, end) = (start.trim(), end.trim());

        if start.is_empty() {
            // Suffix range: the last `end` bytes.
            if end.is_empty() || end.starts_with('-') {
                return Err(invalid(value));
            }
            let suffix: u64 = end.parse().map_err(|_| invalid(value))?;
            let suffix = suffix.min(total_len);
            ranges.push(ByteRange {
                start: total_len - suffix,
                length: suffix,
            });
            continue;
        }

        let first: u64 = start.parse().map_err(|_| invalid(value))?;
        if first >= total_len {
            no_overlap = true;
            continue;
        }
        let length = if end.is_empty() {
            total_len - first
        } else {
            let last: u64 = end.parse().map_err(|_| invalid(value))?;
            if first > last {
                return Err(invalid(value));
            }
            last.min(total_len - 1) - first + 1
        };
        ranges.push(ByteRange { start: first, length });
    }

    if no_overlap && ranges.is_empty() {
        return Err(CatalogError::Config(format!(
            "range not satisfiable: {:?} for {} bytes",
            value, total_len
        )));
    }
    Ok(ranges)
}

/// The part of a resource actually sent back for a range request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServedRange {
    pub start: u64,
    pub length: u64,
    pub total_len: u64,
}

impl ServedRange {
    /// Only the first requested range is served, capped at `max_chunk` bytes.
    /// Clients ask again for the rest.
    pub fn first(ranges: &[ByteRange], total_len: u64, max_chunk: u64) -> Option<Self> {
        ranges.first().map(|range| Self {
            start: range.start,
            length: range.length.min(max_chunk),
            total_len,
        })
    }

    /// Value for the `Content-Range` response header.
    pub fn content_range(&self) -> String {
        format!(
            "bytes {}-{}/{}",
            self.start,
            (self.start + self.length).saturating_sub(1),
            self.total_len
        )
    }
}

/// Limit `reader` to the bytes of `served`.
pub fn open_range<R: Read>(reader: R, served: &ServedRange) -> RangeReader<R> {
    RangeReader::new(reader, served.start, served.length)
}

/// Value for the `Cache-Control` header sent with track data.
pub fn cache_control(max_age: u64) -> String {
    format!("max-age={}", max_age)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    fn r(start: u64, length: u64) -> ByteRange {
        ByteRange { start, length }
    }

    #[test]
    fn parses_ranges() {
        let cases: &[(&str, u64, Vec<ByteRange>)] = &[
            ("", 0, vec![]),
            ("", 1000, vec![]),
            ("bytes=0-4", 10, vec![r(0, 5)]),
            ("bytes=2-", 10, vec![r(2, 8)]),
            ("bytes=-2", 10, vec![r(8, 2)]),
            ("bytes=-20", 10, vec![r(0, 10)]),
            ("bytes=5-100", 10, vec![r(5, 5)]),
            ("bytes=0-0, -1", 10, vec![r(0, 1), r(9, 1)]),
            ("bytes=0-1,5-8", 10, vec![r(0, 2), r(5, 4)]),
            ("bytes=0-1,5-", 10, vec![r(0, 2), r(5, 5)]),
            ("bytes=5-1000", 10, vec![r(5, 5)]),
            ("bytes=0-9,20-30", 10, vec![r(0, 10)]),
            ("bytes=0-,1-,2-", 3, vec![r(0, 3), r(1, 2), r(2, 1)]),
            ("bytes= 1 - 2 ,", 10, vec![r(1, 2)]),
        ];
        for (value, total, want) in cases {
            assert_eq!(&parse_range_header(value, *total).unwrap(), want, "{:?}", value);
        }
    }

    #[test]
    fn rejects_bad_ranges() {
        let cases: &[(&str, u64)] = &[
            ("foo", 10),
            ("bytes", 10),
            ("bytes=7", 10),
            ("bytes=-", 10),
            ("bytes=--6", 10),
            ("bytes=6-3", 10),
            ("bytes=a-3", 10),
            ("bytes=1-b", 10),
            ("bytes=10-20", 10),
            ("bytes=0-", 0),
        ];
        for (value, total) in cases {
            let err = parse_range_header(value, *total);
            assert!(matches!(err, Err(CatalogError::Config(_))), "{:?} should fail", value);
        }
    }

    #[test]
    fn bare_bytes_prefix_has_no_ranges() {
        // "bytes=" with nothing after it is not an overlap failure.
        assert_eq!(parse_range_header("bytes=", 10).ok(), Some(vec![]));
    }

    #[test]
    fn serves_first_range_capped() {
        let ranges = vec![r(100, 5000), r(0, 1)];
        let served = ServedRange::first(&ranges, 10_000, 1024).unwrap();
        assert_eq!(served, ServedRange { start: 100, length: 1024, total_len: 10_000 });
        assert_eq!(served.content_range(), "bytes 100-1123/10000");

        assert_eq!(ServedRange::first(&[], 10, 1024), None);
    }

    #[test]
    fn open_range_yields_window() {
        let served = ServedRange { start: 4, length: 3, total_len: 11 };
        let mut out = String::new();
        open_range(Cursor::new(b"123_456_789".to_vec()), &served)
            .read_to_string(&mut out)
            .unwrap();
        assert_eq!(out, "456");
        assert_eq!(served.content_range(), "bytes 4-6/11");
    }

    #[test]
    fn cache_control_header() {
        assert_eq!(cache_control(3600), "max-age=3600");
    }
}
