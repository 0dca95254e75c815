//! Chunking helpers shared by tests, benchmarks and the fuzz target. Hidden
//! from the documented API.

use crate::InputMode;

/// Split `payload` into approximately equal-sized chunks, never splitting
/// where `M` could not represent the two halves (inside a UTF-8 code point
/// for [`Text`](crate::Text)).
///
/// # Panics
///
/// Panics if `parts` is zero.
#[must_use]
pub fn produce_chunks<M: InputMode>(payload: &M::Chunk, parts: usize) -> Vec<&M::Chunk> {
    assert!(parts > 0);
    let len = M::len(payload);
    let chunk_size = len.div_ceil(parts);
    let mut chunks = Vec::new();
    let mut start = 0;
    while start < len {
        let mut end = std::cmp::min(start + chunk_size, len);
        while end < len && !M::is_boundary(payload, end) {
            end += 1;
        }
        chunks.push(M::slice(payload, start, end));
        start = end;
    }
    chunks
}

/// Split `payload` at the given offsets, skipping offsets that are out of
/// order, out of range or not on a boundary.
#[must_use]
pub fn split_at_offsets<'p, M: InputMode>(payload: &'p M::Chunk, offsets: &[usize]) -> Vec<&'p M::Chunk> {
    let len = M::len(payload);
    let mut chunks = Vec::with_capacity(offsets.len() + 1);
    let mut start = 0;
    for &offset in offsets {
        if offset <= start || offset >= len || !M::is_boundary(payload, offset) {
            continue;
        }
        chunks.push(M::slice(payload, start, offset));
        start = offset;
    }
    chunks.push(M::slice(payload, start, len));
    chunks
}
