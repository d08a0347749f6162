//! Message types for the Elm-style architecture
//!
//! All state changes flow through these message types. Pointer coordinates
//! are in the target instance's layout space.

use std::time::Instant;

use serde::Deserialize;

use crate::editable::{DataTransfer, DropEffect, HostInputState, TextEditMsg};
use crate::surface::TextId;

fn single_click() -> u8 {
    1
}

/// Pointer events over text instances
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PointerMsg {
    /// Button pressed over an instance (`click_count` 2 = double, 3 = triple)
    Down {
        id: TextId,
        x: f32,
        y: f32,
        #[serde(default = "single_click")]
        click_count: u8,
        #[serde(default)]
        shift: bool,
    },
    /// Pointer moved over an instance
    Move { id: TextId, x: f32, y: f32 },
    /// Button released over an instance
    Up { id: TextId, x: f32, y: f32 },
    /// Button released anywhere on the surface (shared listener)
    Released,
}

/// Platform drag-and-drop events
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DragMsg {
    /// A native drag started from an instance
    Start { id: TextId },
    Over { id: TextId, x: f32, y: f32 },
    Leave { id: TextId },
    Drop {
        id: TextId,
        x: f32,
        y: f32,
        data: DataTransfer,
    },
    /// The drag started by this surface finished
    End { effect: DropEffect },
}

/// IME composition events from the host input widget
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CompositionMsg {
    Start,
    /// Host value with the selection marking the composed text
    Update(HostInputState),
    /// Composition committed, optionally with the host's final state
    End(Option<HostInputState>),
}

/// Surface-level messages (editing exclusivity, registration, timers)
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SurfaceMsg {
    EnterEditing(TextId),
    ExitEditing(TextId),
    ExitAll,
    RegisterInteractive(TextId),
    Unregister(TextId),
    RemoveText(TextId),
    Teardown,
    /// Periodic tick driving the cursor blink
    #[serde(skip)]
    Tick(Instant),
}

/// Top-level message type
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Msg {
    /// Keyboard-level editing of the current editor
    TextEdit(TextEditMsg),
    Pointer(PointerMsg),
    Drag(DragMsg),
    Composition(CompositionMsg),
    /// The host input widget's value or selection changed
    HostInput(HostInputState),
    Surface(SurfaceMsg),
}

// Convenience constructors for common messages
impl Msg {
    pub fn text_edit(msg: TextEditMsg) -> Self {
        Msg::TextEdit(msg)
    }

    pub fn insert_text(text: impl Into<String>) -> Self {
        Msg::TextEdit(TextEditMsg::InsertText(text.into()))
    }

    pub fn enter_editing(id: TextId) -> Self {
        Msg::Surface(SurfaceMsg::EnterEditing(id))
    }

    pub fn click(id: TextId, x: f32, y: f32) -> Self {
        Msg::Pointer(PointerMsg::Down {
            id,
            x,
            y,
            click_count: 1,
            shift: false,
        })
    }

    /// Parse one script step written as a single-key map
    /// (`textEdit: { move: wordRight }`), the form session scripts use
    pub fn from_yaml(source: &str) -> serde_yaml::Result<Self> {
        serde_yaml::with::singleton_map_recursive::deserialize(serde_yaml::Deserializer::from_str(
            source,
        ))
    }

    /// Check if this message fires periodically and should not be logged
    pub fn is_noisy(&self) -> bool {
        matches!(self, Msg::Surface(SurfaceMsg::Tick(_)) | Msg::Pointer(PointerMsg::Move { .. }))
    }
}
