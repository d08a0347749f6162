//! Utility functions for grapheme-indexed text

use unicode_segmentation::UnicodeSegmentation;

/// Character class used by word navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharType {
    /// Whitespace graphemes (including line breaks)
    Whitespace,
    /// Graphemes that end a word: `space \n . , ; ! ? -`
    Separator,
    /// Anything else
    WordChar,
}

/// Check if a grapheme is a line break (`\n`, `\r\n` or a lone `\r`)
pub fn is_line_break(grapheme: &str) -> bool {
    matches!(grapheme, "\n" | "\r\n" | "\r")
}

/// Check if a grapheme consists only of whitespace
pub fn is_whitespace(grapheme: &str) -> bool {
    !grapheme.is_empty() && grapheme.chars().all(char::is_whitespace)
}

/// Check if a grapheme stops a word scan
pub fn is_word_separator(grapheme: &str) -> bool {
    is_line_break(grapheme) || matches!(grapheme, " " | "." | "," | ";" | "!" | "?" | "-")
}

/// Get the character type of a grapheme for word navigation
pub fn char_type(grapheme: &str) -> CharType {
    if is_word_separator(grapheme) {
        CharType::Separator
    } else if is_whitespace(grapheme) {
        CharType::Whitespace
    } else {
        CharType::WordChar
    }
}

/// Split text into extended grapheme clusters
pub fn split_graphemes(text: &str) -> Vec<String> {
    text.graphemes(true).map(str::to_owned).collect()
}

/// Number of extended grapheme clusters in `text`
pub fn grapheme_count(text: &str) -> usize {
    text.graphemes(true).count()
}

/// Length of `text` in UTF-16 code units
pub fn utf16_len(text: &str) -> usize {
    text.encode_utf16().count()
}

/// Convert a UTF-16 offset into a byte offset, rounding down to a char boundary.
/// Offsets past the end clamp to `text.len()`.
pub fn utf16_to_byte(text: &str, offset16: usize) -> usize {
    let mut units = 0;
    for (byte, ch) in text.char_indices() {
        let next = units + ch.len_utf16();
        if next > offset16 {
            return byte;
        }
        units = next;
    }
    text.len()
}

/// Translate a UTF-16 selection of the host widget into grapheme offsets
pub fn utf16_selection_to_graphemes(text: &str, start16: usize, end16: usize) -> (usize, usize) {
    let start_byte = utf16_to_byte(text, start16);
    let start = grapheme_count(&text[..start_byte]);
    if start16 >= end16 {
        return (start, start);
    }
    let end_byte = utf16_to_byte(text, end16).max(start_byte);
    (start, start + grapheme_count(&text[start_byte..end_byte]))
}

/// Translate a grapheme selection into UTF-16 offsets for the host widget
pub fn graphemes_to_utf16_selection(
    graphemes: &[String],
    start: usize,
    end: usize,
) -> (usize, usize) {
    let start = start.min(graphemes.len());
    let end = end.clamp(start, graphemes.len());
    let before: usize = graphemes[..start].iter().map(|g| utf16_len(g)).sum();
    let inside: usize = graphemes[start..end].iter().map(|g| utf16_len(g)).sum();
    (before, before + inside)
}
