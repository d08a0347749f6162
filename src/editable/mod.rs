//! Editable rich text.
//!
//! This module holds everything one text instance needs while it is being
//! edited on the drawing surface.
//!
//! # Architecture
//!
//! The core components are:
//!
//! - [`TextBuffer`] / [`GraphemeBuffer`]: grapheme-indexed text storage
//! - [`RichText`]: the edit engine, keeping the Style Map consistent with the buffer
//! - [`Selection`]: `[start, end)` with a direction for shift-extension
//! - [`locate`] / [`linearize`]: 2D location mapping over logical or wrapped lines
//! - [`TextLayout`]: measurements supplied by the layout collaborator
//! - [`CompositionBridge`] / [`HostInputState`]: IME and hidden input widget sync
//! - [`DataTransfer`] / [`DragState`]: clipboard and drag-and-drop payloads
//! - [`EditableText`]: one instance tying the above together
//!
//! # Example
//!
//! ```ignore
//! use caret::editable::{EditableText, FixedWidthLayout, RichText, TextEditMsg};
//!
//! let mut text = EditableText::new(
//!     RichText::new("ab"),
//!     Box::new(FixedWidthLayout::new(10.0, 20.0)),
//!     &caret::EngineConfig::default(),
//! );
//! text.enter_editing();
//! text.set_selection(1, 1);
//! text.handle(TextEditMsg::InsertText("X".into()));
//!
//! assert_eq!(text.text(), "aXb");
//! ```

mod blink;
mod boundary;
mod buffer;
mod composition;
mod edit;
mod layout;
mod location;
mod messages;
mod navigation;
mod selection;
mod state;
mod transfer;

// Re-export main types
pub use blink::{BlinkHandle, BlinkPhase, CursorBlink};
pub use boundary::{line_at, line_boundary, search_word_boundary, word_at, word_boundary, Direction};
pub use buffer::{GraphemeBuffer, TextBuffer};
pub use composition::{
    diff_host_value, Composition, CompositionBridge, HostEdit, HostInputState, SelectionPaint,
};
pub use edit::RichText;
pub use layout::{FixedWidthLayout, TextAlign, TextLayout};
pub use location::{line_start, linearize, locate, LineSpan, Position};
pub use messages::{MoveTarget, TextEditMsg};
pub use navigation::{
    column_at_offset, cursor_rect, horizontal_offset, index_at_point, selection_rects,
    vertical_target, Rect, Vertical,
};
pub use selection::{Selection, SelectionDirection};
pub use state::{DragEndOutcome, EditableText};
pub use transfer::{
    receive, DataTransfer, DragPhase, DragSession, DragState, DropEffect, EffectAllowed,
    ReceivedText, TransferPayload, RICH_TEXT, TEXT_PLAIN,
};
