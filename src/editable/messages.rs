//! Keyboard-level messages for an editable text instance.

use serde::Deserialize;

use crate::style::{StyleDeclaration, StyleProperty};

use super::transfer::DataTransfer;

/// Target for cursor movement operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MoveTarget {
    /// Move one grapheme left
    Left,
    /// Move one grapheme right
    Right,
    /// Move one display line up
    Up,
    /// Move one display line down
    Down,
    /// Move to start of the logical line
    LineStart,
    /// Move to end of the logical line
    LineEnd,
    /// Move one word left
    WordLeft,
    /// Move one word right
    WordRight,
    /// Move to start of document
    DocumentStart,
    /// Move to end of document
    DocumentEnd,
}

/// Editing operations on the focused instance.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TextEditMsg {
    // === Movement ===
    /// Move cursor, collapsing the selection
    Move(MoveTarget),
    /// Move cursor and extend selection
    MoveWithSelection(MoveTarget),

    // === Insertion ===
    /// Insert a string at the selection (typed text)
    InsertText(String),
    InsertNewline,

    // === Deletion ===
    /// Delete grapheme before cursor (Backspace)
    DeleteBackward,
    /// Delete grapheme after cursor (Delete)
    DeleteForward,
    DeleteWordBackward,
    DeleteWordForward,
    /// Delete from the line start to the cursor (Cmd+Backspace)
    DeleteToLineStart,

    // === Selection ===
    SelectAll,
    /// Select the word around the cursor
    SelectWord,
    /// Select the logical line around the cursor
    SelectLine,
    /// Collapse selection to cursor position
    CollapseSelection,

    // === Clipboard ===
    Copy,
    Cut,
    /// Paste a clipboard transfer (plain and optionally styled text)
    #[serde(skip)]
    Paste(DataTransfer),

    // === Styling ===
    /// Merge a declaration into every selected grapheme
    ApplyStyle(StyleDeclaration),
    /// Coalesce then strip one property from every grapheme
    RemoveStyleProperty(StyleProperty),
}

impl TextEditMsg {
    /// Check if this message modifies the buffer
    pub fn is_editing(&self) -> bool {
        matches!(
            self,
            TextEditMsg::InsertText(_)
                | TextEditMsg::InsertNewline
                | TextEditMsg::DeleteBackward
                | TextEditMsg::DeleteForward
                | TextEditMsg::DeleteWordBackward
                | TextEditMsg::DeleteWordForward
                | TextEditMsg::DeleteToLineStart
                | TextEditMsg::Cut
                | TextEditMsg::Paste(_)
        )
    }

    /// Check if this message is a movement operation
    pub fn is_movement(&self) -> bool {
        matches!(
            self,
            TextEditMsg::Move(_) | TextEditMsg::MoveWithSelection(_)
        )
    }

    /// Check if this message is a selection operation
    pub fn is_selection(&self) -> bool {
        matches!(
            self,
            TextEditMsg::MoveWithSelection(_)
                | TextEditMsg::SelectAll
                | TextEditMsg::SelectWord
                | TextEditMsg::SelectLine
        )
    }

    /// Check if this message changes styles without touching the buffer
    pub fn is_styling(&self) -> bool {
        matches!(
            self,
            TextEditMsg::ApplyStyle(_) | TextEditMsg::RemoveStyleProperty(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_editing() {
        assert!(TextEditMsg::InsertText("a".into()).is_editing());
        assert!(TextEditMsg::DeleteBackward.is_editing());
        assert!(TextEditMsg::Paste(DataTransfer::plain("x")).is_editing());
        assert!(!TextEditMsg::Move(MoveTarget::Left).is_editing());
        assert!(!TextEditMsg::Copy.is_editing());
        assert!(!TextEditMsg::ApplyStyle(StyleDeclaration::new()).is_editing());
    }

    #[test]
    fn test_is_movement() {
        assert!(TextEditMsg::Move(MoveTarget::Left).is_movement());
        assert!(TextEditMsg::MoveWithSelection(MoveTarget::Right).is_movement());
        assert!(!TextEditMsg::InsertNewline.is_movement());
    }

    #[test]
    fn test_is_selection() {
        assert!(TextEditMsg::SelectAll.is_selection());
        assert!(TextEditMsg::MoveWithSelection(MoveTarget::Up).is_selection());
        assert!(!TextEditMsg::Move(MoveTarget::Up).is_selection());
        assert!(!TextEditMsg::CollapseSelection.is_selection());
    }

    #[test]
    fn test_deserialize_from_script() {
        use serde_yaml::with::singleton_map_recursive;

        let parse = |source: &str| -> TextEditMsg {
            singleton_map_recursive::deserialize(serde_yaml::Deserializer::from_str(source)).unwrap()
        };
        assert_eq!(
            parse("moveWithSelection: wordLeft"),
            TextEditMsg::MoveWithSelection(MoveTarget::WordLeft)
        );
        assert_eq!(parse("insertText: hi"), TextEditMsg::InsertText("hi".into()));
        assert_eq!(parse("selectAll"), TextEditMsg::SelectAll);
    }
}
