//! EditableText - one editable text instance: styled buffer, selection,
//! composition, drag state and cursor blink, measured by its own layout.

use std::time::Instant;

use tracing::{debug, trace, warn};

use crate::config::EngineConfig;
use crate::style::{StyleDeclaration, StyleProperty};

use super::blink::CursorBlink;
use super::boundary::{line_at, line_boundary, word_at, word_boundary, Direction};
use super::composition::{diff_host_value, Composition, CompositionBridge, HostInputState, SelectionPaint};
use super::edit::RichText;
use super::layout::TextLayout;
use super::location::{linearize, Position};
use super::messages::{MoveTarget, TextEditMsg};
use super::navigation::{self, Rect, Vertical};
use super::selection::{Selection, SelectionDirection};
use super::transfer::{
    adjust_for_source, pointer_over_selection, receive, styles_for, trim_trailing_break, DataTransfer,
    DragSession, DragState, DropEffect, EffectAllowed, TransferPayload,
};

/// What a finished drag did to its source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragEndOutcome {
    /// No session to finish (e.g. it was dropped back onto its own instance)
    Noop,
    /// Drop was cancelled; the original selection is back
    Restored,
    /// The dragged range was copied elsewhere
    Copied,
    /// The dragged range was moved elsewhere and removed here
    Moved,
}

#[derive(Debug)]
pub struct EditableText {
    text: RichText,
    /// Whether the instance accepts editing at all
    pub editable: bool,
    is_editing: bool,
    selection: Selection,
    composition: CompositionBridge,
    drag: DragState,
    mouse_down: bool,
    /// Selection start when the pointer went down, anchor of drag-selecting
    selection_on_mouse_down: Option<usize>,
    blink: CursorBlink,
    text_before_edit: Option<String>,
    layout: Box<dyn TextLayout>,
    style_copy_paste: bool,
    effect_allowed: EffectAllowed,
}

impl EditableText {
    pub fn new(text: RichText, mut layout: Box<dyn TextLayout>, config: &EngineConfig) -> Self {
        layout.reflow(&text);
        Self {
            text,
            editable: true,
            is_editing: false,
            selection: Selection::default(),
            composition: CompositionBridge::default(),
            drag: DragState::default(),
            mouse_down: false,
            selection_on_mouse_down: None,
            blink: CursorBlink::new(config.cursor_delay(), config.cursor_duration(), Instant::now()),
            text_before_edit: None,
            layout,
            style_copy_paste: config.style_copy_paste,
            effect_allowed: config.drop_effect_allowed,
        }
    }

    pub fn rich(&self) -> &RichText {
        &self.text
    }

    pub fn text(&self) -> String {
        self.text.text()
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn selected_text(&self) -> String {
        self.text.graphemes()[self.selection.range()].concat()
    }

    pub fn is_editing(&self) -> bool {
        self.is_editing
    }

    pub fn is_composing(&self) -> bool {
        self.composition.is_composing()
    }

    pub fn composition(&self) -> Option<Composition> {
        self.composition.composition()
    }

    pub fn drag(&self) -> &DragState {
        &self.drag
    }

    pub fn is_mouse_down(&self) -> bool {
        self.mouse_down
    }

    pub fn layout(&self) -> &dyn TextLayout {
        self.layout.as_ref()
    }

    /// Replace the whole content, dropping styles and collapsing the selection
    pub fn set_text(&mut self, text: &str) {
        self.text.set_text(text);
        self.reflow();
    }

    /// Set the selection, clamping both bounds to the buffer
    pub fn set_selection(&mut self, start: usize, end: usize) {
        let len = self.len();
        if start.max(end) > len {
            trace!(start, end, len, "Clamping selection");
        }
        self.selection = Selection::new(start.min(len), end.min(len));
    }

    fn reflow(&mut self) {
        self.layout.reflow(&self.text);
        self.selection.clamp(self.text.len());
    }

    fn restart_blink(&mut self) {
        if self.is_editing {
            self.blink.start(Instant::now());
        }
    }

    // =========================================================================
    // Edit mode lifecycle
    // =========================================================================

    /// Enter edit mode. Returns false if not editable or already editing.
    pub fn enter_editing(&mut self) -> bool {
        if !self.editable || self.is_editing {
            return false;
        }
        self.is_editing = true;
        self.text_before_edit = Some(self.text.text());
        self.blink.start(Instant::now());
        debug!(len = self.len(), "Entered edit mode");
        true
    }

    /// Leave edit mode. Returns whether the text changed since entering, or
    /// None when the instance was not editing.
    pub fn exit_editing(&mut self) -> Option<bool> {
        if !self.is_editing {
            return None;
        }
        self.is_editing = false;
        self.selection.collapse_to_start();
        self.selection.direction = SelectionDirection::None;
        self.composition.reset();
        self.blink.cancel();
        self.mouse_down = false;
        self.selection_on_mouse_down = None;
        if !self.drag.is_dragging() {
            self.drag.clear();
        }
        let modified = self.text_before_edit.take().is_some_and(|before| before != self.text.text());
        debug!(modified, "Exited edit mode");
        Some(modified)
    }

    /// Advance the cursor blink. Returns true when a repaint is needed.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.is_editing && self.blink.tick(now)
    }

    /// What to paint for the selection right now
    pub fn paint(&self) -> SelectionPaint {
        SelectionPaint::resolve(
            self.is_editing,
            self.selection,
            self.composition.composition(),
            self.blink.opacity(),
        )
    }

    pub fn cursor_rect(&self) -> Rect {
        navigation::cursor_rect(self.layout(), self.selection.head())
    }

    pub fn selection_rects(&self) -> Vec<Rect> {
        navigation::selection_rects(self.layout(), self.selection.start, self.selection.end)
    }

    /// Complete style at a display (wrapped) line and column
    pub fn style_at_display(&self, line: usize, column: usize) -> StyleDeclaration {
        let index = linearize(Position::new(line, column), self.layout.display_lines());
        self.text.style_at(index, true)
    }

    // =========================================================================
    // Keyboard messages
    // =========================================================================

    /// Apply a keyboard-level message. Returns true if buffer, selection or
    /// styles changed.
    pub fn handle(&mut self, msg: TextEditMsg) -> bool {
        if !self.is_editing {
            return false;
        }
        let changed = match msg {
            TextEditMsg::Move(target) => self.move_cursor(target, false),
            TextEditMsg::MoveWithSelection(target) => self.move_cursor(target, true),
            TextEditMsg::InsertText(text) => self.insert_text(&text),
            TextEditMsg::InsertNewline => self.insert_text("\n"),
            TextEditMsg::DeleteBackward => self.delete_backward(),
            TextEditMsg::DeleteForward => self.delete_forward(),
            TextEditMsg::DeleteWordBackward => self.delete_word_backward(),
            TextEditMsg::DeleteWordForward => self.delete_word_forward(),
            TextEditMsg::DeleteToLineStart => self.delete_to_line_start(),
            TextEditMsg::SelectAll => self.select_all(),
            TextEditMsg::SelectWord => self.select_word(self.selection.head()),
            TextEditMsg::SelectLine => self.select_line(self.selection.head()),
            TextEditMsg::CollapseSelection => self.collapse_selection(),
            TextEditMsg::Copy => false,
            TextEditMsg::Cut => self.cut().is_some(),
            TextEditMsg::Paste(data) => self.paste(&data),
            TextEditMsg::ApplyStyle(style) => self.apply_style(&style),
            TextEditMsg::RemoveStyleProperty(prop) => self.remove_style_property(prop),
        };
        if changed {
            self.restart_blink();
        }
        changed
    }

    // =========================================================================
    // Movement
    // =========================================================================

    fn target_index(&self, target: MoveTarget, origin: usize) -> usize {
        let buffer = self.text.buffer();
        match target {
            MoveTarget::Left => origin.saturating_sub(1),
            MoveTarget::Right => (origin + 1).min(self.len()),
            MoveTarget::WordLeft => self.word_target(origin, Direction::Backward),
            MoveTarget::WordRight => self.word_target(origin, Direction::Forward),
            MoveTarget::LineStart => line_boundary(buffer, origin, Direction::Backward),
            MoveTarget::LineEnd => line_boundary(buffer, origin, Direction::Forward),
            MoveTarget::Up => navigation::vertical_target(self.layout(), origin, Vertical::Up),
            MoveTarget::Down => navigation::vertical_target(self.layout(), origin, Vertical::Down),
            MoveTarget::DocumentStart => 0,
            MoveTarget::DocumentEnd => self.len(),
        }
    }

    /// Word boundary for word-wise movement and deletion. On a separator
    /// the boundary is the cursor itself, so step one grapheme instead.
    fn word_target(&self, origin: usize, direction: Direction) -> usize {
        let boundary = word_boundary(self.text.buffer(), origin, direction);
        match direction {
            _ if boundary != origin => boundary,
            Direction::Backward => origin.saturating_sub(1),
            Direction::Forward => (origin + 1).min(self.len()),
        }
    }

    fn is_leftward(target: MoveTarget) -> bool {
        matches!(
            target,
            MoveTarget::Left
                | MoveTarget::WordLeft
                | MoveTarget::LineStart
                | MoveTarget::Up
                | MoveTarget::DocumentStart
        )
    }

    /// Move the cursor. With `extend`, the moving end of the selection
    /// travels and the selection flips when it crosses its anchor.
    pub fn move_cursor(&mut self, target: MoveTarget, extend: bool) -> bool {
        let before = self.selection;
        let leftward = Self::is_leftward(target);

        if extend {
            let head = self.selection.head();
            let index = self.target_index(target, head);
            self.selection.extend_to(index);
            return self.selection.range() != before.range();
        }

        let origin = match self.selection.direction {
            _ if self.selection.is_empty() => self.selection.start,
            SelectionDirection::None if leftward => self.selection.start,
            SelectionDirection::None => self.selection.end,
            _ => self.selection.head(),
        };
        let index = match target {
            // A plain arrow on a selection only collapses it
            MoveTarget::Left if !self.selection.is_empty() => self.selection.start,
            MoveTarget::Right if !self.selection.is_empty() => self.selection.end,
            _ => self.target_index(target, origin),
        };
        self.selection = Selection::collapsed(index);
        self.selection.direction = if leftward {
            SelectionDirection::Left
        } else {
            SelectionDirection::Right
        };
        self.selection.range() != before.range()
    }

    pub fn select_all(&mut self) -> bool {
        let before = self.selection;
        self.selection = Selection::new(0, self.len());
        self.selection != before
    }

    /// Select the word around `index` (double click)
    pub fn select_word(&mut self, index: usize) -> bool {
        let before = self.selection;
        let (start, end) = word_at(self.text.buffer(), index);
        self.selection = Selection::new(start, end);
        self.selection != before
    }

    /// Select the logical line around `index` (triple click)
    pub fn select_line(&mut self, index: usize) -> bool {
        let before = self.selection;
        let (start, end) = line_at(self.text.buffer(), index);
        self.selection = Selection::new(start, end);
        self.selection != before
    }

    pub fn collapse_selection(&mut self) -> bool {
        if self.selection.is_empty() {
            return false;
        }
        let head = self.selection.head();
        self.selection = Selection::collapsed(head);
        true
    }

    // =========================================================================
    // Editing
    // =========================================================================

    /// Replace the selection with `text`; the cursor lands after it
    pub fn insert_text(&mut self, text: &str) -> bool {
        self.insert_styled(text, None)
    }

    fn insert_styled(&mut self, text: &str, styles: Option<&[StyleDeclaration]>) -> bool {
        let Selection { start, end, .. } = self.selection;
        if text.is_empty() && start == end {
            return false;
        }
        let inserted = self.text.insert(text, styles, start, end);
        self.selection = Selection::collapsed(start + inserted);
        self.reflow();
        true
    }

    fn remove_range(&mut self, start: usize, end: usize) -> bool {
        if start >= end {
            return false;
        }
        self.text.remove(start, end);
        self.selection = Selection::collapsed(start);
        self.reflow();
        true
    }

    fn remove_selection(&mut self) -> bool {
        self.remove_range(self.selection.start, self.selection.end)
    }

    pub fn delete_backward(&mut self) -> bool {
        if !self.selection.is_empty() {
            return self.remove_selection();
        }
        let cursor = self.selection.start;
        self.remove_range(cursor.saturating_sub(1), cursor)
    }

    pub fn delete_forward(&mut self) -> bool {
        if !self.selection.is_empty() {
            return self.remove_selection();
        }
        let cursor = self.selection.start;
        self.remove_range(cursor, (cursor + 1).min(self.len()))
    }

    pub fn delete_word_backward(&mut self) -> bool {
        if !self.selection.is_empty() {
            return self.remove_selection();
        }
        let cursor = self.selection.start;
        let boundary = self.word_target(cursor, Direction::Backward);
        self.remove_range(boundary, cursor)
    }

    pub fn delete_word_forward(&mut self) -> bool {
        if !self.selection.is_empty() {
            return self.remove_selection();
        }
        let cursor = self.selection.start;
        let boundary = self.word_target(cursor, Direction::Forward);
        self.remove_range(cursor, boundary)
    }

    /// Delete back to the start of the logical line; at a line start the
    /// preceding line break goes instead
    pub fn delete_to_line_start(&mut self) -> bool {
        if !self.selection.is_empty() {
            return self.remove_selection();
        }
        let cursor = self.selection.start;
        let boundary = line_boundary(self.text.buffer(), cursor, Direction::Backward);
        if boundary == cursor {
            return self.delete_backward();
        }
        self.remove_range(boundary, cursor)
    }

    // =========================================================================
    // Clipboard and styles
    // =========================================================================

    /// Clipboard payload for the selection, None when nothing is selected
    pub fn copy(&self) -> Option<DataTransfer> {
        if self.selection.is_empty() {
            return None;
        }
        let Selection { start, end, .. } = self.selection;
        TransferPayload::capture(&self.text, start, end, self.style_copy_paste)
            .to_transfer()
            .map_err(|err| warn!("Copy failed: {err:#}"))
            .ok()
    }

    pub fn cut(&mut self) -> Option<DataTransfer> {
        let data = self.copy()?;
        self.remove_selection();
        Some(data)
    }

    /// Insert clipboard content at the selection
    pub fn paste(&mut self, data: &DataTransfer) -> bool {
        let Some(received) = receive(data) else {
            return false;
        };
        let styles = self
            .style_copy_paste
            .then(|| styles_for(&received, &received.value))
            .flatten();
        self.insert_styled(&received.value, styles.as_deref())
    }

    /// Merge `style` into every selected grapheme
    pub fn apply_style(&mut self, style: &StyleDeclaration) -> bool {
        if self.selection.is_empty() || style.is_empty() {
            return false;
        }
        self.text.set_selection_styles(style, self.selection.range());
        self.reflow();
        true
    }

    pub fn remove_style_property(&mut self, prop: StyleProperty) -> bool {
        let had = self.text.styles().has(None) || self.text.defaults().contains(prop);
        self.text.remove_style_property(prop);
        self.reflow();
        had
    }

    // =========================================================================
    // Pointer
    // =========================================================================

    /// Grapheme index under a point in layout coordinates
    pub fn index_at(&self, x: f32, y: f32) -> usize {
        navigation::index_at_point(self.layout(), x, y)
    }

    /// Pointer pressed. Returns true if the selection changed.
    ///
    /// A single press inside a non-empty selection arms a drag instead of
    /// moving the cursor; the cursor moves on release if no drag started.
    pub fn pointer_down(&mut self, x: f32, y: f32, click_count: u8, shift: bool) -> bool {
        if !self.editable {
            return false;
        }
        self.mouse_down = true;
        if !self.is_editing {
            return false;
        }
        let index = self.index_at(x, y);
        if click_count <= 1 && !shift && pointer_over_selection(self.selection, index) {
            self.drag.arm();
            return false;
        }

        let before = self.selection;
        self.composition.reset();
        match click_count {
            2 => {
                self.select_word(index);
            }
            n if n >= 3 => {
                self.select_line(index);
            }
            _ if shift => self.selection.extend_to(index),
            _ => self.selection = Selection::collapsed(index),
        }
        self.selection_on_mouse_down = Some(self.selection.start);
        self.restart_blink();
        self.selection != before
    }

    /// Pointer moved while pressed: drag-select from the press anchor
    pub fn pointer_move(&mut self, x: f32, y: f32) -> bool {
        if !self.mouse_down || !self.is_editing || self.drag.is_armed() || self.drag.is_dragging() {
            return false;
        }
        let Some(anchor) = self.selection_on_mouse_down else {
            return false;
        };
        let index = self.index_at(x, y);
        let before = self.selection;
        self.selection = Selection::new(anchor, index);
        self.selection.direction = if index > anchor {
            SelectionDirection::Right
        } else {
            SelectionDirection::Left
        };
        self.selection != before
    }

    /// Pointer released over this instance
    pub fn pointer_up(&mut self, x: f32, y: f32) -> bool {
        self.mouse_down = false;
        self.selection_on_mouse_down = None;
        if self.drag.is_armed() {
            self.drag.clear();
            return self.set_cursor_at(x, y);
        }
        false
    }

    /// Collapse the selection at a point
    pub fn set_cursor_at(&mut self, x: f32, y: f32) -> bool {
        let before = self.selection;
        self.selection = Selection::collapsed(self.index_at(x, y));
        self.restart_blink();
        self.selection != before
    }

    /// Clear the pressed flag (pointer released anywhere on the surface)
    pub fn release_pointer(&mut self) {
        self.mouse_down = false;
        self.selection_on_mouse_down = None;
    }

    // =========================================================================
    // Drag and drop
    // =========================================================================

    /// Begin dragging the selection out. Only possible after a press inside
    /// a non-empty selection.
    pub fn drag_start(&mut self) -> Option<DataTransfer> {
        if !self.drag.is_armed() || self.selection.is_empty() {
            return None;
        }
        let DragSession { start, end } = self.drag.begin(self.selection);
        let mut data = TransferPayload::capture(&self.text, start, end, true)
            .to_transfer()
            .map_err(|err| warn!("Drag start failed: {err:#}"))
            .ok()?;
        data.effect_allowed = self.effect_allowed;
        self.mouse_down = false;
        debug!(start, end, "Drag started");
        Some(data)
    }

    /// Something is dragged over this instance. Returns whether a drop at the
    /// pointer would be accepted.
    pub fn drag_over(&mut self, x: f32, y: f32) -> bool {
        let index = self.index_at(x, y);
        let accepted = self.editable && self.drag.can_drop(index);
        self.drag.drop_index = accepted.then_some(index);
        accepted
    }

    pub fn drag_leave(&mut self) -> bool {
        self.drag.drop_index.take().is_some()
    }

    /// Drop `data` at a point. Returns the inserted range.
    pub fn drop(&mut self, x: f32, y: f32, data: &DataTransfer) -> Option<(usize, usize)> {
        self.drag.drop_index = None;
        let index = self.index_at(x, y);
        if !self.editable || !self.drag.can_drop(index) {
            return None;
        }
        let received = receive(data)?;

        let mut insert_at = index;
        if let Some(session) = self.drag.take_session() {
            insert_at = adjust_for_source(index, session);
            self.text.remove(session.start, session.end);
        }

        let value = trim_trailing_break(&received.value, self.text.graphemes(), insert_at).to_owned();
        let styles = styles_for(&received, &value);
        let inserted = self.text.insert(&value, styles.as_deref(), insert_at, insert_at);
        self.selection = Selection::new(insert_at, insert_at + inserted);
        self.reflow();
        debug!(insert_at, inserted, "Dropped text");
        Some((insert_at, insert_at + inserted))
    }

    /// The drag this instance started has finished with `effect`
    pub fn drag_end(&mut self, effect: DropEffect) -> DragEndOutcome {
        let session = self.drag.take_session();
        self.drag.clear();
        let Some(DragSession { start, end }) = session else {
            return DragEndOutcome::Noop;
        };
        debug!(?effect, start, end, "Drag ended");
        match effect {
            DropEffect::None => {
                self.selection = Selection::new(start, end);
                self.selection.clamp(self.len());
                DragEndOutcome::Restored
            }
            DropEffect::Move => {
                self.remove_range(start, end);
                DragEndOutcome::Moved
            }
            DropEffect::Copy | DropEffect::Link => DragEndOutcome::Copied,
        }
    }

    // =========================================================================
    // Host input and composition
    // =========================================================================

    /// Value and UTF-16 selection to write into the host widget; None while
    /// composing
    pub fn host_state(&self) -> Option<HostInputState> {
        if self.composition.is_composing() {
            return None;
        }
        Some(HostInputState::from_graphemes(self.text.graphemes(), self.selection))
    }

    pub fn composition_start(&mut self) -> bool {
        if !self.is_editing {
            return false;
        }
        self.composition.start(self.selection);
        debug!(start = self.selection.start, end = self.selection.end, "Composition started");
        true
    }

    pub fn composition_update(&mut self, host: HostInputState) -> bool {
        if !self.is_editing {
            return false;
        }
        let before = self.composition.composition();
        self.composition.update(host);
        before != self.composition.composition()
    }

    /// Commit the composition, reconciling with the host's final value
    pub fn composition_end(&mut self, host: Option<HostInputState>) -> bool {
        let pending = self.composition.finish();
        debug!("Composition ended");
        match host.or(pending) {
            Some(host) if self.is_editing => self.reconcile(&host),
            _ => false,
        }
    }

    /// Take a host widget change (typing, native paste, deletion). Deferred
    /// while composing.
    pub fn sync_from_host(&mut self, host: HostInputState) -> bool {
        if !self.is_editing {
            return false;
        }
        if self.composition.defer(host.clone()) {
            trace!("Deferring host input until composition ends");
            return false;
        }
        self.reconcile(&host)
    }

    fn reconcile(&mut self, host: &HostInputState) -> bool {
        let before_selection = self.selection;
        let edit = diff_host_value(self.text.graphemes(), self.selection, &host.value);
        if let Some(edit) = &edit {
            self.text.insert(&edit.text, None, edit.start, edit.end);
            self.reflow();
        }
        let (start, end) = host.grapheme_selection();
        self.set_selection(start, end);
        let changed = edit.is_some() || self.selection != before_selection;
        if changed {
            self.restart_blink();
        }
        changed
    }
}
