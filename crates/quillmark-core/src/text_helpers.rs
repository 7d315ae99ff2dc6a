//! Character-offset helpers for block text.
//!
//! Block offsets are counted in chars; `str` indexing is in bytes. These
//! functions convert between the two and answer the small character-class
//! questions the trigger detectors ask.

use std::ops::Range;

/// Length of a string in chars.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Convert a char offset to a byte offset, clamped to the end of the text.
pub fn char_to_byte(text: &str, char_offset: usize) -> usize {
    text.char_indices()
        .nth(char_offset)
        .map(|(byte, _)| byte)
        .unwrap_or(text.len())
}

/// Convert a byte offset (on a char boundary) to a char offset.
pub fn byte_to_char(text: &str, byte_offset: usize) -> usize {
    text[..byte_offset.min(text.len())].chars().count()
}

/// Slice a string by char range. Out-of-range bounds are clamped.
pub fn slice_chars(text: &str, range: Range<usize>) -> &str {
    let start = char_to_byte(text, range.start);
    let end = char_to_byte(text, range.end.max(range.start));
    &text[start..end]
}

/// Characters that open or close inline emphasis.
pub fn is_marker_char(c: char) -> bool {
    matches!(c, '*' | '_' | '~' | '`')
}

/// Whether `c` may directly precede an opening emphasis marker.
///
/// Word characters and other markers may not, which keeps `snake_case_names`
/// and `2*3*4` from being read as emphasis.
pub fn is_opening_boundary(c: char) -> bool {
    c.is_whitespace() || (!c.is_alphanumeric() && !is_marker_char(c))
}

/// Count how many times `c` repeats at the end of `chars`.
pub fn trailing_run(chars: &[char], c: char) -> usize {
    chars.iter().rev().take_while(|&&x| x == c).count()
}
