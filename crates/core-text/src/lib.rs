//! Line-text helpers shared by the editor state and the renderer.
//!
//! All offsets are character offsets (not bytes) into a single edited line;
//! the input state keeps its buffer split at the cursor and converts at the
//! edges.

pub mod expand;
pub mod width;
pub mod word;

pub use expand::expand_vars;
pub use width::{char_width, str_width};
pub use word::WordSeparators;

/// Byte index of the `char_offset`-th character (or `s.len()` past the end).
pub fn byte_index(s: &str, char_offset: usize) -> usize {
    s.char_indices()
        .nth(char_offset)
        .map(|(b, _)| b)
        .unwrap_or(s.len())
}

/// Number of characters in `s`.
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Split `s` at a character offset.
pub fn split_at_char(s: &str, char_offset: usize) -> (&str, &str) {
    s.split_at(byte_index(s, char_offset))
}

/// Slice `s` by a half-open character range.
pub fn char_slice(s: &str, start: usize, end: usize) -> &str {
    let b0 = byte_index(s, start);
    let b1 = byte_index(s, end);
    &s[b0..b1.max(b0)]
}
