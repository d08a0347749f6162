//! Composition bridge between the engine and the host text-input widget.
//!
//! The host widget speaks UTF-16 offsets into its own string value; the engine
//! speaks grapheme indices. While an IME composition is active the committed
//! buffer is left alone and only the composition range is tracked; the host's
//! final value is reconciled when the composition ends.

use serde::{Deserialize, Serialize};

use crate::util::{graphemes_to_utf16_selection, split_graphemes, utf16_selection_to_graphemes};

use super::selection::Selection;

/// Value and selection of the hidden host input widget (UTF-16 offsets)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostInputState {
    pub value: String,
    pub selection_start: usize,
    pub selection_end: usize,
}

impl HostInputState {
    pub fn new(value: impl Into<String>, selection_start: usize, selection_end: usize) -> Self {
        Self {
            value: value.into(),
            selection_start,
            selection_end,
        }
    }

    /// Mirror of an engine buffer and selection
    pub fn from_graphemes(graphemes: &[String], selection: Selection) -> Self {
        let (start, end) = graphemes_to_utf16_selection(graphemes, selection.start, selection.end);
        Self::new(graphemes.concat(), start, end)
    }

    /// The host selection translated to grapheme offsets of `value`
    pub fn grapheme_selection(&self) -> (usize, usize) {
        utf16_selection_to_graphemes(&self.value, self.selection_start, self.selection_end)
    }
}

/// Grapheme range covered by the text being composed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Composition {
    pub start: usize,
    pub end: usize,
}

/// Replacement of `[start, end)` by `text` that turns the engine buffer into
/// the host value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostEdit {
    pub start: usize,
    pub end: usize,
    pub text: String,
}

/// Diff the engine buffer against a new host value.
///
/// The common prefix may not extend past the old selection start and the
/// common suffix may not extend into the old selection, so typing repeated
/// characters lands at the cursor rather than at an arbitrary matching spot.
pub fn diff_host_value(old: &[String], selection: Selection, value: &str) -> Option<HostEdit> {
    let new = split_graphemes(value);
    let shared = old.len().min(new.len());

    let prefix_cap = selection.start.min(shared);
    let prefix = old
        .iter()
        .zip(&new)
        .take(prefix_cap)
        .take_while(|(a, b)| a == b)
        .count();

    let suffix_cap = old
        .len()
        .saturating_sub(selection.end)
        .min(shared - prefix);
    let suffix = old
        .iter()
        .rev()
        .zip(new.iter().rev())
        .take(suffix_cap)
        .take_while(|(a, b)| a == b)
        .count();

    let end = old.len() - suffix;
    let inserted = &new[prefix..new.len() - suffix];
    if prefix == end && inserted.is_empty() {
        return None;
    }
    Some(HostEdit {
        start: prefix,
        end,
        text: inserted.concat(),
    })
}

/// Composition state of one editable instance
#[derive(Debug, Clone, Default)]
pub struct CompositionBridge {
    composition: Option<Composition>,
    /// Latest host state received while composing
    pending: Option<HostInputState>,
}

impl CompositionBridge {
    pub fn is_composing(&self) -> bool {
        self.composition.is_some()
    }

    pub fn composition(&self) -> Option<Composition> {
        self.composition
    }

    /// Begin composing over the committed selection
    pub fn start(&mut self, selection: Selection) {
        self.composition = Some(Composition {
            start: selection.start,
            end: selection.end,
        });
        self.pending = None;
    }

    /// Track the range reported by the host; the host selection marks the
    /// composed text within its value
    pub fn update(&mut self, host: HostInputState) {
        let (start, end) = host.grapheme_selection();
        self.composition = Some(Composition { start, end });
        self.pending = Some(host);
    }

    /// Hold a host value change until the composition ends.
    /// Returns false when not composing.
    pub fn defer(&mut self, host: HostInputState) -> bool {
        if !self.is_composing() {
            return false;
        }
        self.pending = Some(host);
        true
    }

    /// Leave composition mode, returning the host state to reconcile
    pub fn finish(&mut self) -> Option<HostInputState> {
        self.composition = None;
        self.pending.take()
    }

    pub fn reset(&mut self) {
        self.composition = None;
        self.pending = None;
    }
}

/// What the painter should draw for the selection of an instance
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SelectionPaint {
    Hidden,
    /// Collapsed selection drawn as a caret
    Cursor { index: usize, opacity: f32 },
    Highlight { start: usize, end: usize },
    /// Composition underline, replaces the highlight while composing
    Composition { start: usize, end: usize },
}

impl SelectionPaint {
    pub fn resolve(
        is_editing: bool,
        selection: Selection,
        composition: Option<Composition>,
        cursor_opacity: f32,
    ) -> Self {
        if !is_editing {
            return SelectionPaint::Hidden;
        }
        if let Some(Composition { start, end }) = composition {
            return SelectionPaint::Composition { start, end };
        }
        if selection.is_empty() {
            SelectionPaint::Cursor {
                index: selection.start,
                opacity: cursor_opacity,
            }
        } else {
            SelectionPaint::Highlight {
                start: selection.start,
                end: selection.end,
            }
        }
    }
}
