/// Collapse every run of whitespace (newlines included) into one space and
/// trim both ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Best-effort UTF-8: invalid byte sequences are dropped, not replaced.
pub fn decode_utf8_dropping_invalid(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        out.push_str(chunk.valid());
    }
    out
}

/// First `max_bytes` of a raw upload, decoded the same forgiving way.
pub fn preview(bytes: &[u8], max_bytes: usize) -> String {
    decode_utf8_dropping_invalid(&bytes[..bytes.len().min(max_bytes)])
}
