// Character offsets
// Carets and selections count user-perceived characters (grapheme clusters),
// so "é" written as e + combining accent is a single caret step.

use unicode_segmentation::UnicodeSegmentation;

/// Number of characters in `s`
pub fn char_len(s: &str) -> usize {
    s.graphemes(true).count()
}

/// Byte index of the character at `offset`, clamped to the end of `s`
pub fn byte_offset(s: &str, offset: usize) -> usize {
    s.grapheme_indices(true)
        .nth(offset)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

/// Split `s` at a character offset
pub fn split_at(s: &str, offset: usize) -> (&str, &str) {
    s.split_at(byte_offset(s, offset))
}

/// Insert `text` at a character offset
pub fn insert_at(s: &mut String, offset: usize, text: &str) {
    let at = byte_offset(s, offset);
    s.insert_str(at, text);
}
