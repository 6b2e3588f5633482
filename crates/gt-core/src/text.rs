//! Unicode-safe text helpers for terminal output.

/// Return a slice of `text` containing at most `max_chars` Unicode scalar values.
///
/// Uses `char_indices().nth(max_chars)`, which works on MSRV 1.85.
pub fn truncate_chars_slice(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// First line of `text`, without the line terminator.
pub fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or_default()
}
