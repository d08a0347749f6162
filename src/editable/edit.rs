//! Edit engine: grapheme buffer plus style overlay, kept consistent.
//!
//! Every structural edit rewrites the affected Style Map entries before the
//! buffer itself changes (positions are resolved against the old line layout),
//! then prunes. After `insert` or `remove` returns, every style entry addresses
//! an existing character.

use std::ops::Range;

use crate::style::{StyleChain, StyleDeclaration, StyleMap, StyleProperty};
use crate::util::{grapheme_count, is_line_break, split_graphemes};

use super::buffer::{GraphemeBuffer, TextBuffer};
use super::location::{locate, LineSpan, Position};

/// Text content of a shape: graphemes, per-character styles and the
/// instance's own attributes (the last fallback of style resolution).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RichText {
    buffer: GraphemeBuffer,
    styles: StyleMap,
    defaults: StyleDeclaration,
}

impl RichText {
    pub fn new(text: &str) -> Self {
        Self::with_styles(text, StyleMap::new(), StyleDeclaration::instance_defaults())
    }

    pub fn with_styles(text: &str, styles: StyleMap, defaults: StyleDeclaration) -> Self {
        let mut rich = Self {
            buffer: GraphemeBuffer::from_text(text),
            styles,
            defaults,
        };
        rich.styles.prune();
        rich
    }

    pub fn buffer(&self) -> &GraphemeBuffer {
        &self.buffer
    }

    pub fn graphemes(&self) -> &[String] {
        self.buffer.graphemes()
    }

    pub fn styles(&self) -> &StyleMap {
        &self.styles
    }

    /// Direct access to the overlay for callers that set styles by position
    pub fn styles_mut(&mut self) -> &mut StyleMap {
        &mut self.styles
    }

    pub fn defaults(&self) -> &StyleDeclaration {
        &self.defaults
    }

    pub fn defaults_mut(&mut self) -> &mut StyleDeclaration {
        &mut self.defaults
    }

    pub fn text(&self) -> String {
        self.buffer.content()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn logical_lines(&self) -> Vec<LineSpan> {
        self.buffer.logical_lines()
    }

    /// Logical (line, column) of a linear index
    pub fn locate(&self, index: usize) -> Position {
        locate(index, &self.logical_lines())
    }

    /// Replace the whole content, dropping all character styles
    pub fn set_text(&mut self, text: &str) {
        self.buffer.set_content(text);
        self.styles = StyleMap::new();
    }

    // =========================================================================
    // Structural edits
    // =========================================================================

    /// Insert `text` at `start`, replacing `[start, end)` first when non-empty.
    ///
    /// `styles[i]` is applied to the i-th inserted grapheme; entries for line
    /// breaks are ignored and missing or empty entries leave the character
    /// unstyled. Without `styles`, inserted characters copy the style of the
    /// character before the insertion point (or after it, at a line start).
    ///
    /// Graphemes that cluster with their neighbours across either end of the
    /// insertion (a combining mark typed after its base) are merged, keeping
    /// the style of the earlier one. Returns the number of graphemes the
    /// buffer grew by.
    #[cfg_attr(feature = "profile-tracing", tracing::instrument(skip_all))]
    pub fn insert(
        &mut self,
        text: &str,
        styles: Option<&[StyleDeclaration]>,
        start: usize,
        end: usize,
    ) -> usize {
        let start = start.min(self.len());
        let end = end.clamp(start, self.len());
        if end > start {
            self.remove_span(start, end);
        }

        let graphemes = split_graphemes(text);
        if graphemes.is_empty() {
            self.rejoin_at(start);
            return 0;
        }
        self.insert_styles(&graphemes, styles, start);
        self.buffer.insert(start, &graphemes);
        self.styles.prune();

        let mut count = graphemes.len();
        if self.rejoin_at(start) {
            count -= 1;
        }
        if self.rejoin_at(start + count) {
            count -= 1;
        }
        count
    }

    /// Merge the graphemes on either side of `index` when together they
    /// form a single cluster. Returns whether they were merged.
    fn rejoin_at(&mut self, index: usize) -> bool {
        if index == 0 {
            return false;
        }
        let joined = match (self.buffer.grapheme(index - 1), self.buffer.grapheme(index)) {
            (Some(prev), Some(next)) => format!("{prev}{next}"),
            _ => return false,
        };
        if grapheme_count(&joined) != 1 {
            return false;
        }
        self.remove_span(index, index + 1);
        self.buffer.replace(index - 1, joined);
        true
    }

    fn insert_styles(
        &mut self,
        graphemes: &[String],
        supplied: Option<&[StyleDeclaration]>,
        start: usize,
    ) {
        let Position { line, column } = self.locate(start);
        let breaks = graphemes.iter().filter(|g| is_line_break(g)).count();

        let inherited = if column > 0 {
            self.styles.get(line, column - 1)
        } else {
            self.styles.get(line, column)
        }
        .cloned();
        let line_default = self.styles.line_default_cloned(line);
        let base = StyleChain::new(None, Some(&line_default), Some(&self.defaults)).complete();

        let tail = self.styles.take_chars_from(line, column);
        self.styles.shift_lines_after(line, breaks as isize);

        let (mut cur_line, mut cur_col) = (line, column);
        for (i, grapheme) in graphemes.iter().enumerate() {
            if is_line_break(grapheme) {
                cur_line += 1;
                cur_col = 0;
                self.styles.set_line_default(cur_line, &line_default);
                continue;
            }
            let style = match supplied {
                Some(list) => list.get(i).map(|s| s.difference(&base)),
                None => inherited.clone(),
            };
            if let Some(style) = style {
                self.styles.replace(cur_line, cur_col, style);
            }
            cur_col += 1;
        }

        for (idx, style) in tail {
            self.styles.replace(cur_line, cur_col + (idx - column), style);
        }
    }

    /// Delete `[start, end)` and return the removed text.
    ///
    /// A removal within one line shifts the line's later char styles left. A
    /// removal spanning lines merges the end line's surviving tail onto the
    /// start line, drops the consumed lines and shifts later lines up.
    #[cfg_attr(feature = "profile-tracing", tracing::instrument(skip_all))]
    pub fn remove(&mut self, start: usize, end: usize) -> String {
        let removed = self.remove_span(start, end);
        if !removed.is_empty() {
            self.rejoin_at(start.min(self.len()));
        }
        removed
    }

    fn remove_span(&mut self, start: usize, end: usize) -> String {
        let end = end.min(self.len());
        let start = start.min(end);
        if start == end {
            return String::new();
        }

        let lines = self.logical_lines();
        let from = locate(start, &lines);
        let to = locate(end, &lines);

        if from.line == to.line {
            self.styles.remove_chars(from.line, from.column..to.column);
            self.styles
                .shift_chars(from.line, to.column, -((to.column - from.column) as isize));
        } else {
            self.styles.take_chars_from(from.line, from.column);
            let tail = self.styles.take_chars_from(to.line, to.column);
            for line in from.line + 1..=to.line {
                self.styles.remove_line(line);
            }
            for (idx, style) in tail {
                self.styles
                    .replace(from.line, from.column + (idx - to.column), style);
            }
            self.styles
                .shift_lines_after(to.line, -((to.line - from.line) as isize));
        }

        let removed = self.buffer.remove(start..end);
        self.styles.prune();
        removed.concat()
    }

    // =========================================================================
    // Style queries by linear index
    // =========================================================================

    /// Style at a linear index: the raw char style, or the fully resolved one
    pub fn style_at(&self, index: usize, complete: bool) -> StyleDeclaration {
        let Position { line, column } = self.locate(index);
        if complete {
            self.styles.get_complete(line, column, &self.defaults)
        } else {
            self.styles.get(line, column).cloned().unwrap_or_default()
        }
    }

    /// One declaration per grapheme of `[start, end)`
    pub fn selection_styles(&self, start: usize, end: usize, complete: bool) -> Vec<StyleDeclaration> {
        let end = end.min(self.len());
        (start.min(end)..end)
            .map(|i| self.style_at(i, complete))
            .collect()
    }

    /// Merge `partial` into every character of `[start, end)`
    pub fn set_selection_styles(&mut self, partial: &StyleDeclaration, range: Range<usize>) {
        let lines = self.logical_lines();
        let end = range.end.min(self.len());
        for i in range.start.min(end)..end {
            if self.buffer.grapheme(i).is_some_and(is_line_break) {
                continue;
            }
            let Position { line, column } = locate(i, &lines);
            self.styles.set(line, column, partial);
        }
        self.styles.prune();
    }

    /// Strip `prop` from every character, promoting it to the instance
    /// attributes first when all characters agreed on one value
    pub fn remove_style_property(&mut self, prop: StyleProperty) -> bool {
        let count = self.char_count();
        let promoted = self.styles.clean_property(prop, &mut self.defaults, count);
        self.styles.remove_property(prop);
        promoted
    }

    /// Number of graphemes that are not line breaks
    pub fn char_count(&self) -> usize {
        self.graphemes().iter().filter(|g| !is_line_break(g)).count()
    }

    /// Check the Style Map against the current buffer lines
    pub fn styles_consistent(&self) -> bool {
        self.styles.is_consistent_with(&self.buffer.line_lengths())
    }
}
