//! Command types for the Elm-style architecture
//!
//! Commands represent side effects the host performs after an update:
//! repainting the surface, writing the hidden input widget, touching the
//! clipboard or the platform drag session.

use crate::editable::{DataTransfer, HostInputState};
use crate::surface::TextId;

/// Notifications about editing lifecycle changes, forwarded to host listeners
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextEvent {
    /// An instance entered edit mode
    EditingEntered(TextId),
    /// An instance left edit mode; `modified` if its text differs from entry
    EditingExited { id: TextId, modified: bool },
    /// The buffer changed
    Changed(TextId),
    /// The selection changed without a buffer change
    SelectionChanged(TextId),
    /// Styled text was dropped onto an instance
    Dropped(TextId),
    /// Answer to a drag hovering an instance: whether a drop there would be
    /// taken (hosts map this to the platform drop effect)
    DropTarget { id: TextId, accepted: bool },
}

/// Commands returned by update functions
#[derive(Debug, Clone, Default)]
pub enum Cmd {
    /// No command - do nothing
    #[default]
    None,
    /// Request a repaint of the drawing surface
    Redraw,
    /// Write value and UTF-16 selection into an instance's hidden input widget
    SyncHostInput { id: TextId, state: HostInputState },
    /// Give keyboard focus back to an instance's hidden input widget
    FocusHostInput(TextId),
    /// Put the payload on the system clipboard
    WriteClipboard(DataTransfer),
    /// Hand a filled transfer to the platform drag session
    BeginDrag { id: TextId, data: DataTransfer },
    /// Install the shared pointer-release listener on the surface
    InstallPointerListener,
    /// Remove the shared pointer-release listener
    RemovePointerListener,
    /// Notify listeners
    Emit(TextEvent),
    /// Execute multiple commands
    Batch(Vec<Cmd>),
}

impl Cmd {
    /// Create a batch of commands, dropping `Cmd::None` entries
    pub fn batch(cmds: Vec<Cmd>) -> Self {
        let mut cmds: Vec<Cmd> = cmds
            .into_iter()
            .filter(|c| !matches!(c, Cmd::None))
            .collect();
        match cmds.len() {
            0 => Cmd::None,
            1 => cmds.remove(0),
            _ => Cmd::Batch(cmds),
        }
    }

    /// Turn `Cmd::None` into `None` for update return values
    pub fn into_option(self) -> Option<Cmd> {
        match self {
            Cmd::None => None,
            cmd => Some(cmd),
        }
    }

    /// Check if this command requires a repaint
    pub fn needs_redraw(&self) -> bool {
        match self {
            Cmd::Redraw => true,
            Cmd::Batch(cmds) => cmds.iter().any(|c| c.needs_redraw()),
            _ => false,
        }
    }

    /// Flatten nested batches into a list of leaf commands
    pub fn flatten(self) -> Vec<Cmd> {
        match self {
            Cmd::None => Vec::new(),
            Cmd::Batch(cmds) => cmds.into_iter().flat_map(Cmd::flatten).collect(),
            cmd => vec![cmd],
        }
    }

    /// Events carried by this command tree
    pub fn events(&self) -> Vec<&TextEvent> {
        match self {
            Cmd::Emit(event) => vec![event],
            Cmd::Batch(cmds) => cmds.iter().flat_map(|c| c.events()).collect(),
            _ => Vec::new(),
        }
    }
}
