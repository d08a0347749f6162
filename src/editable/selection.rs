//! Selection state for the editing engine.

use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Which end of the selection was most recently extended.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionDirection {
    Left,
    Right,
    #[default]
    None,
}

/// A grapheme selection `[start, end)` with direction.
///
/// Invariant: `start <= end`. Clamping to the buffer length is done by the
/// owner through [`Selection::clamp`] and the clamped setters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
    pub direction: SelectionDirection,
}

impl Selection {
    /// Create a selection, ordering the bounds
    pub fn new(a: usize, b: usize) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
            direction: SelectionDirection::None,
        }
    }

    /// Create a collapsed selection (cursor with no selection)
    pub fn collapsed(index: usize) -> Self {
        Self::new(index, index)
    }

    /// Check if selection is empty (start == end)
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// The end that moves when the selection is extended
    pub fn head(&self) -> usize {
        match self.direction {
            SelectionDirection::Left => self.start,
            _ => self.end,
        }
    }

    /// Check if an index is within this selection (end exclusive)
    pub fn contains(&self, index: usize) -> bool {
        index >= self.start && index < self.end
    }

    /// Set the start, clamped to `[0, len]`; pulls `end` along if needed
    pub fn set_start(&mut self, index: usize, len: usize) {
        self.start = index.min(len);
        if self.end < self.start {
            self.end = self.start;
        }
    }

    /// Set the end, clamped to `[0, len]`; pulls `start` along if needed
    pub fn set_end(&mut self, index: usize, len: usize) {
        self.end = index.min(len);
        if self.start > self.end {
            self.start = self.end;
        }
    }

    /// Clamp both bounds to `[0, len]`
    pub fn clamp(&mut self, len: usize) {
        self.end = self.end.min(len);
        self.start = self.start.min(self.end);
    }

    /// Move the selection's moving end to `index`.
    ///
    /// A collapsed selection grows towards `index` and takes its direction.
    /// A selection extended past its fixed end flips: the old head becomes the
    /// anchor and the direction reverses.
    pub fn extend_to(&mut self, index: usize) {
        let (mut start, mut end) = (self.start, self.end);
        if index <= start {
            if end == start {
                self.direction = SelectionDirection::Left;
            } else if self.direction == SelectionDirection::Right {
                self.direction = SelectionDirection::Left;
                end = start;
            }
            start = index;
        } else if index < end {
            if self.direction == SelectionDirection::Right {
                end = index;
            } else {
                start = index;
            }
        } else {
            if end == start {
                self.direction = SelectionDirection::Right;
            } else if self.direction == SelectionDirection::Left {
                self.direction = SelectionDirection::Right;
                start = end;
            }
            end = index;
        }
        self.start = start;
        self.end = end;
    }

    /// Collapse selection to start position
    pub fn collapse_to_start(&mut self) {
        self.end = self.start;
    }

    /// Collapse selection to end position
    pub fn collapse_to_end(&mut self) {
        self.start = self.end;
    }
}
