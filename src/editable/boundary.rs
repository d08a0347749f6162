//! Word and line boundary search over a grapheme buffer.
//!
//! Pure functions: they never touch selection state and are shared by edit
//! operations (delete word, delete to line start) and navigation (alt/cmd + arrow).

use crate::util::{char_type, is_line_break, is_whitespace, is_word_separator, CharType};

use super::buffer::TextBuffer;

/// Scan direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Backward,
    Forward,
}

fn is_word_char<B: TextBuffer + ?Sized>(buffer: &B, index: usize) -> bool {
    buffer
        .grapheme(index)
        .is_some_and(|g| char_type(g) == CharType::WordChar)
}

fn is_space_at<B: TextBuffer + ?Sized>(buffer: &B, index: usize) -> bool {
    buffer.grapheme(index).is_some_and(is_whitespace)
}

fn is_separator_at<B: TextBuffer + ?Sized>(buffer: &B, index: usize) -> bool {
    buffer.grapheme(index).is_some_and(is_word_separator)
}

/// Find the next word boundary from `index` in `direction`.
///
/// Skips contiguous whitespace first, then contiguous word characters, and
/// stops at a separator (`space \n . , ; ! ? -`) or the buffer edge. A cursor
/// sitting on a non-space separator stays where it is.
pub fn word_boundary<B: TextBuffer + ?Sized>(buffer: &B, index: usize, direction: Direction) -> usize {
    let len = buffer.len();
    let mut i = index.min(len);
    match direction {
        Direction::Backward => {
            while i > 0 && is_space_at(buffer, i - 1) {
                i -= 1;
            }
            while i > 0 && is_word_char(buffer, i - 1) {
                i -= 1;
            }
        }
        Direction::Forward => {
            while i < len && is_space_at(buffer, i) {
                i += 1;
            }
            while i < len && is_word_char(buffer, i) {
                i += 1;
            }
        }
    }
    i
}

/// Find the line boundary from `index` in `direction`: the nearest line break
/// or buffer edge.
pub fn line_boundary<B: TextBuffer + ?Sized>(buffer: &B, index: usize, direction: Direction) -> usize {
    let len = buffer.len();
    let mut i = index.min(len);
    match direction {
        Direction::Backward => {
            while i > 0 && !buffer.grapheme(i - 1).is_some_and(is_line_break) {
                i -= 1;
            }
        }
        Direction::Forward => {
            while i < len && !buffer.grapheme(i).is_some_and(is_line_break) {
                i += 1;
            }
        }
    }
    i
}

/// Word edge used by double-click selection.
///
/// A click landing on whitespace snaps one position back, so double-clicking
/// the space after a word selects that word; searching forward from a space
/// that directly follows a line break does not snap.
pub fn search_word_boundary<B: TextBuffer + ?Sized>(
    buffer: &B,
    index: usize,
    direction: Direction,
) -> usize {
    let len = buffer.len();
    let index = index.min(len);
    let snap_back = index > 0
        && is_space_at(buffer, index)
        && (direction == Direction::Backward
            || !buffer.grapheme(index - 1).is_some_and(is_line_break));
    let mut i = if snap_back { index - 1 } else { index };
    match direction {
        Direction::Forward => {
            while i < len && !is_separator_at(buffer, i) {
                i += 1;
            }
            i
        }
        Direction::Backward => {
            while i > 0 && !is_separator_at(buffer, i) {
                i -= 1;
            }
            if is_separator_at(buffer, i) {
                i + 1
            } else {
                i
            }
        }
    }
}

/// Bounds of the word around `index` (double click)
pub fn word_at<B: TextBuffer + ?Sized>(buffer: &B, index: usize) -> (usize, usize) {
    let start = search_word_boundary(buffer, index, Direction::Backward);
    let end = search_word_boundary(buffer, index, Direction::Forward);
    (start.min(end), start.max(end))
}

/// Bounds of the logical line around `index` (triple click)
pub fn line_at<B: TextBuffer + ?Sized>(buffer: &B, index: usize) -> (usize, usize) {
    (
        line_boundary(buffer, index, Direction::Backward),
        line_boundary(buffer, index, Direction::Forward),
    )
}
