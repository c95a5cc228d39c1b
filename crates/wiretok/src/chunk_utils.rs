use alloc::vec::Vec;

/// Split `payload` into approximately equal-sized fragments, the way a socket
/// would deliver it.
///
/// # Panics
///
/// Panics if `parts` is zero.
#[must_use]
pub fn produce_chunks(payload: &[u8], parts: usize) -> Vec<&[u8]> {
    assert!(parts > 0);
    let chunk_size = payload.len().div_ceil(parts).max(1);
    payload.chunks(chunk_size).collect()
}

/// Return the growing buffers a caller would feed while receiving `payload`
/// in `parts` fragments. The last prefix is `payload` itself.
///
/// # Panics
///
/// Panics if `parts` is zero.
#[must_use]
pub fn produce_prefixes(payload: &[u8], parts: usize) -> Vec<&[u8]> {
    let chunks = produce_chunks(payload, parts);
    let mut prefixes = Vec::with_capacity(chunks.len());
    let mut end = 0;
    for chunk in chunks {
        end += chunk.len();
        prefixes.push(&payload[..end]);
    }
    prefixes
}
