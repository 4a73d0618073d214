//! Byte-range resolution for video streaming.

use std::ops::{Bound, RangeInclusive};

/// Resolves one satisfiable range against a body of `len` bytes.
///
/// `None` means the range cannot be served and the response is 416.
pub fn resolve_byte_range(
    (start, end): (Bound<u64>, Bound<u64>),
    len: u64,
) -> Option<RangeInclusive<u64>> {
    if len == 0 {
        return None;
    }
    let last = len - 1;

    let start = match start {
        Bound::Included(s) => s,
        Bound::Excluded(s) => s.checked_add(1)?,
        Bound::Unbounded => 0,
    };
    let end = match end {
        Bound::Included(e) => e.min(last),
        Bound::Excluded(0) => return None,
        Bound::Excluded(e) => (e - 1).min(last),
        Bound::Unbounded => last,
    };

    (start <= end).then_some(start..=end)
}

/// `Content-Range` value for a served slice.
pub fn content_range(range: &RangeInclusive<u64>, len: u64) -> String {
    format!("bytes {}-{}/{}", range.start(), range.end(), len)
}

/// `Content-Range` value sent with a 416.
pub fn unsatisfied_content_range(len: u64) -> String {
    format!("bytes */{}", len)
}
