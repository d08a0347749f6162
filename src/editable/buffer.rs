//! Grapheme text buffer for the editing engine.
//!
//! Provides the read-only `TextBuffer` trait used by navigation and boundary
//! search, and `GraphemeBuffer`, the owned buffer mutated by the edit engine.
//! All indices are grapheme indices, never bytes or code units.

use std::ops::Range;

use crate::util::{is_line_break, split_graphemes};

use super::location::LineSpan;

/// Read-only view of a grapheme sequence.
pub trait TextBuffer {
    /// Total length in graphemes
    fn len(&self) -> usize;

    /// Check if buffer is empty
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Grapheme at `index`, None if out of bounds
    fn grapheme(&self, index: usize) -> Option<&str>;

    /// Concatenate graphemes in `range` (clamped)
    fn slice(&self, range: Range<usize>) -> String;

    /// Logical lines split at line-break graphemes (always >= 1 line)
    fn logical_lines(&self) -> Vec<LineSpan> {
        let mut lines = Vec::new();
        let mut len = 0;
        for i in 0..self.len() {
            if self.grapheme(i).is_some_and(is_line_break) {
                lines.push(LineSpan::new(len, true));
                len = 0;
            } else {
                len += 1;
            }
        }
        lines.push(LineSpan::new(len, false));
        lines
    }

    /// Grapheme count of each logical line, excluding the break
    fn line_lengths(&self) -> Vec<usize> {
        self.logical_lines().iter().map(|l| l.len).collect()
    }

    /// Number of logical lines
    fn line_count(&self) -> usize {
        1 + (0..self.len())
            .filter(|&i| self.grapheme(i).is_some_and(is_line_break))
            .count()
    }
}

impl TextBuffer for [String] {
    fn len(&self) -> usize {
        <[String]>::len(self)
    }

    fn grapheme(&self, index: usize) -> Option<&str> {
        self.get(index).map(String::as_str)
    }

    fn slice(&self, range: Range<usize>) -> String {
        let end = range.end.min(<[String]>::len(self));
        let start = range.start.min(end);
        self[start..end].concat()
    }
}

/// Owned grapheme buffer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphemeBuffer {
    graphemes: Vec<String>,
}

impl GraphemeBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a buffer by splitting `text` into graphemes
    pub fn from_text(text: &str) -> Self {
        Self {
            graphemes: split_graphemes(text),
        }
    }

    pub fn graphemes(&self) -> &[String] {
        &self.graphemes
    }

    /// Full content as a String
    pub fn content(&self) -> String {
        self.graphemes.concat()
    }

    /// Splice graphemes in at `index` (clamped)
    pub fn insert(&mut self, index: usize, graphemes: &[String]) {
        let at = index.min(self.graphemes.len());
        self.graphemes.splice(at..at, graphemes.iter().cloned());
    }

    /// Remove graphemes in `range` (clamped), returning them
    pub fn remove(&mut self, range: Range<usize>) -> Vec<String> {
        let end = range.end.min(self.graphemes.len());
        let start = range.start.min(end);
        self.graphemes.drain(start..end).collect()
    }

    /// Overwrite the grapheme at `index`; out of range is ignored
    pub fn replace(&mut self, index: usize, grapheme: String) {
        if let Some(slot) = self.graphemes.get_mut(index) {
            *slot = grapheme;
        }
    }

    pub fn set_content(&mut self, text: &str) {
        self.graphemes = split_graphemes(text);
    }

    pub fn clear(&mut self) {
        self.graphemes.clear();
    }
}

impl TextBuffer for GraphemeBuffer {
    fn len(&self) -> usize {
        self.graphemes.len()
    }

    fn grapheme(&self, index: usize) -> Option<&str> {
        self.graphemes.get(index).map(String::as_str)
    }

    fn slice(&self, range: Range<usize>) -> String {
        self.graphemes.as_slice().slice(range)
    }
}
