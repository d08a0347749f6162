//! Utility modules

pub mod text;

pub use text::{
    char_type, grapheme_count, graphemes_to_utf16_selection, is_line_break, is_whitespace,
    is_word_separator, split_graphemes, utf16_len, utf16_selection_to_graphemes, CharType,
};
