//! Drawing surface: owns every text instance and enforces that at most one of
//! them is in edit mode at a time.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::commands::{Cmd, TextEvent};
use crate::config::EngineConfig;
use crate::editable::{
    DataTransfer, DragEndOutcome, DropEffect, EditableText, HostInputState, RichText, TextEditMsg,
    TextLayout,
};

/// Identifier of a text instance on a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TextId(pub u32);

impl fmt::Display for TextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "text#{}", self.0)
    }
}

/// Editing exclusivity bookkeeping for one surface
#[derive(Debug, Default)]
pub struct EditingRegistry {
    current: Option<TextId>,
    /// Instances that get pointer-release broadcasts
    interactive: Vec<TextId>,
    listener_installed: bool,
}

impl EditingRegistry {
    /// The instance currently in edit mode
    pub fn current(&self) -> Option<TextId> {
        self.current
    }

    pub fn interactive(&self) -> &[TextId] {
        &self.interactive
    }

    pub fn is_registered(&self, id: TextId) -> bool {
        self.interactive.contains(&id)
    }

    pub fn has_listener(&self) -> bool {
        self.listener_installed
    }

    /// Add an instance to the broadcast list; the shared listener is
    /// installed with the first registration
    pub fn register(&mut self, id: TextId) -> Cmd {
        if self.is_registered(id) {
            return Cmd::None;
        }
        self.interactive.push(id);
        if self.listener_installed {
            return Cmd::None;
        }
        self.listener_installed = true;
        Cmd::InstallPointerListener
    }

    /// Remove an instance; the listener goes away with the last one
    pub fn unregister(&mut self, id: TextId) -> Cmd {
        let before = self.interactive.len();
        self.interactive.retain(|other| *other != id);
        if self.interactive.len() == before || !self.interactive.is_empty() || !self.listener_installed {
            return Cmd::None;
        }
        self.listener_installed = false;
        Cmd::RemovePointerListener
    }
}

#[derive(Debug)]
pub struct Surface {
    texts: BTreeMap<TextId, EditableText>,
    registry: EditingRegistry,
    next_id: u32,
    config: EngineConfig,
    /// Instance that started the active drag
    drag_source: Option<TextId>,
}

impl Surface {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            texts: BTreeMap::new(),
            registry: EditingRegistry::default(),
            next_id: 1,
            config,
            drag_source: None,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn registry(&self) -> &EditingRegistry {
        &self.registry
    }

    /// The instance in edit mode, if any
    pub fn current_editor(&self) -> Option<TextId> {
        self.registry.current
    }

    pub fn add_text(&mut self, text: RichText, layout: Box<dyn TextLayout>) -> TextId {
        let id = TextId(self.next_id);
        self.next_id += 1;
        self.texts.insert(id, EditableText::new(text, layout, &self.config));
        id
    }

    pub fn get(&self, id: TextId) -> Option<&EditableText> {
        self.texts.get(&id)
    }

    pub fn get_mut(&mut self, id: TextId) -> Option<&mut EditableText> {
        self.texts.get_mut(&id)
    }

    pub fn ids(&self) -> impl Iterator<Item = TextId> + '_ {
        self.texts.keys().copied()
    }

    fn sync(&self, id: TextId) -> Cmd {
        match self.get(id).and_then(EditableText::host_state) {
            Some(state) => Cmd::SyncHostInput { id, state },
            None => Cmd::None,
        }
    }

    // =========================================================================
    // Exclusivity
    // =========================================================================

    /// Put `id` in edit mode, force-exiting the current editor first.
    /// No-op when the target is unknown, not editable or already editing.
    pub fn enter_editing(&mut self, id: TextId) -> Cmd {
        match self.get(id) {
            Some(text) if text.editable && !text.is_editing() => {}
            _ => return Cmd::None,
        }

        let mut cmds = Vec::new();
        if let Some(current) = self.registry.current.filter(|current| *current != id) {
            debug!(%current, target = %id, "Force-exiting editor");
            cmds.push(self.exit_editing(current));
        }

        let Some(text) = self.get_mut(id) else {
            return Cmd::batch(cmds);
        };
        if !text.enter_editing() {
            return Cmd::batch(cmds);
        }
        self.registry.current = Some(id);
        cmds.push(self.registry.register(id));
        cmds.push(Cmd::Emit(TextEvent::EditingEntered(id)));
        cmds.push(self.sync(id));
        cmds.push(Cmd::FocusHostInput(id));
        cmds.push(Cmd::Redraw);
        Cmd::batch(cmds)
    }

    pub fn exit_editing(&mut self, id: TextId) -> Cmd {
        let Some(modified) = self.get_mut(id).and_then(EditableText::exit_editing) else {
            return Cmd::None;
        };
        if self.registry.current == Some(id) {
            self.registry.current = None;
        }
        Cmd::batch(vec![
            Cmd::Emit(TextEvent::EditingExited { id, modified }),
            Cmd::Redraw,
        ])
    }

    /// Exit edit mode on every instance
    pub fn exit_all(&mut self) -> Cmd {
        let editing: Vec<TextId> = self
            .texts
            .iter()
            .filter(|(_, text)| text.is_editing())
            .map(|(id, _)| *id)
            .collect();
        Cmd::batch(editing.into_iter().map(|id| self.exit_editing(id)).collect())
    }

    pub fn register_interactive(&mut self, id: TextId) -> Cmd {
        if !self.texts.contains_key(&id) {
            return Cmd::None;
        }
        self.registry.register(id)
    }

    pub fn unregister(&mut self, id: TextId) -> Cmd {
        self.registry.unregister(id)
    }

    /// Remove an instance from the surface
    pub fn remove_text(&mut self, id: TextId) -> Cmd {
        let exit = self.exit_editing(id);
        let unregister = self.unregister(id);
        if self.drag_source == Some(id) {
            self.drag_source = None;
        }
        self.texts.remove(&id);
        Cmd::batch(vec![exit, unregister])
    }

    /// Pointer released anywhere: clear every registered instance's pressed flag
    pub fn pointer_released(&mut self) {
        for id in &self.registry.interactive {
            if let Some(text) = self.texts.get_mut(id) {
                text.release_pointer();
            }
        }
    }

    /// Detach from the surface: exit editing everywhere and drop the listener
    pub fn teardown(&mut self) -> Cmd {
        let exit = self.exit_all();
        let ids: Vec<TextId> = self.registry.interactive.clone();
        let unregister: Vec<Cmd> = ids.into_iter().map(|id| self.unregister(id)).collect();
        self.drag_source = None;
        Cmd::batch(vec![exit, Cmd::batch(unregister)])
    }

    // =========================================================================
    // Keyboard, host input and ticks
    // =========================================================================

    /// Route a keyboard message to the current editor
    pub fn text_edit(&mut self, msg: TextEditMsg) -> Cmd {
        let Some(id) = self.registry.current else {
            return Cmd::None;
        };
        let Some(text) = self.get_mut(id) else {
            return Cmd::None;
        };

        let modifies = msg.is_editing() || msg.is_styling();
        let clipboard = match msg {
            TextEditMsg::Copy => return text.copy().map_or(Cmd::None, Cmd::WriteClipboard),
            TextEditMsg::Cut => text.cut(),
            _ => None,
        };
        let changed = clipboard.is_some() || text.handle(msg);
        if !changed {
            return Cmd::None;
        }

        let event = if modifies {
            TextEvent::Changed(id)
        } else {
            TextEvent::SelectionChanged(id)
        };
        Cmd::batch(vec![
            clipboard.map_or(Cmd::None, Cmd::WriteClipboard),
            Cmd::Emit(event),
            self.sync(id),
            Cmd::Redraw,
        ])
    }

    /// Host widget reported a new value/selection for the current editor
    pub fn host_input(&mut self, state: HostInputState) -> Cmd {
        self.with_current(|text| text.sync_from_host(state), true)
    }

    pub fn composition_start(&mut self) -> Cmd {
        self.with_current(EditableText::composition_start, false)
    }

    pub fn composition_update(&mut self, state: HostInputState) -> Cmd {
        self.with_current(|text| text.composition_update(state), false)
    }

    pub fn composition_end(&mut self, state: Option<HostInputState>) -> Cmd {
        self.with_current(|text| text.composition_end(state), true)
    }

    fn with_current(&mut self, f: impl FnOnce(&mut EditableText) -> bool, edits: bool) -> Cmd {
        let Some(id) = self.registry.current else {
            return Cmd::None;
        };
        let Some(text) = self.get_mut(id) else {
            return Cmd::None;
        };
        let before = text.text();
        if !f(&mut *text) {
            return Cmd::None;
        }
        let changed = edits && text.text() != before;
        Cmd::batch(vec![
            if changed {
                Cmd::Emit(TextEvent::Changed(id))
            } else {
                Cmd::None
            },
            self.sync(id),
            Cmd::Redraw,
        ])
    }

    /// Advance cursor blinking
    pub fn tick(&mut self, now: Instant) -> Cmd {
        let repaint = self
            .texts
            .values_mut()
            .fold(false, |repaint, text| text.tick(now) || repaint);
        if repaint {
            Cmd::Redraw
        } else {
            Cmd::None
        }
    }

    // =========================================================================
    // Pointer
    // =========================================================================

    pub fn pointer_down(&mut self, id: TextId, x: f32, y: f32, click_count: u8, shift: bool) -> Cmd {
        let register = self.register_interactive(id);
        let Some(text) = self.get_mut(id) else {
            return Cmd::None;
        };
        let changed = text.pointer_down(x, y, click_count, shift);
        let selection = if changed {
            Cmd::batch(vec![
                Cmd::Emit(TextEvent::SelectionChanged(id)),
                self.sync(id),
                Cmd::Redraw,
            ])
        } else {
            Cmd::None
        };
        Cmd::batch(vec![register, selection])
    }

    pub fn pointer_move(&mut self, id: TextId, x: f32, y: f32) -> Cmd {
        let Some(text) = self.get_mut(id) else {
            return Cmd::None;
        };
        if !text.pointer_move(x, y) {
            return Cmd::None;
        }
        Cmd::batch(vec![self.sync(id), Cmd::Redraw])
    }

    /// Pointer released over `id`. A press and release on an editable
    /// instance that is not editing enters edit mode with the cursor there.
    pub fn pointer_up(&mut self, id: TextId, x: f32, y: f32) -> Cmd {
        let Some(text) = self.get_mut(id) else {
            return Cmd::None;
        };
        let was_down = text.is_mouse_down();
        if !text.is_editing() && was_down && text.editable {
            text.release_pointer();
            let enter = self.enter_editing(id);
            if let Some(text) = self.get_mut(id) {
                text.set_cursor_at(x, y);
            }
            return Cmd::batch(vec![enter, self.sync(id)]);
        }
        if !text.pointer_up(x, y) {
            return Cmd::None;
        }
        Cmd::batch(vec![
            Cmd::Emit(TextEvent::SelectionChanged(id)),
            self.sync(id),
            Cmd::Redraw,
        ])
    }

    // =========================================================================
    // Drag and drop
    // =========================================================================

    /// Native drag started from `id`
    pub fn drag_start(&mut self, id: TextId) -> Cmd {
        let Some(data) = self.get_mut(id).and_then(EditableText::drag_start) else {
            return Cmd::None;
        };
        self.drag_source = Some(id);
        Cmd::BeginDrag { id, data }
    }

    /// Something is dragged over `id`; returns whether a drop would be accepted
    pub fn drag_over(&mut self, id: TextId, x: f32, y: f32) -> bool {
        self.get_mut(id).is_some_and(|text| text.drag_over(x, y))
    }

    pub fn drag_leave(&mut self, id: TextId) -> Cmd {
        if self.get_mut(id).is_some_and(EditableText::drag_leave) {
            Cmd::Redraw
        } else {
            Cmd::None
        }
    }

    pub fn drop(&mut self, id: TextId, x: f32, y: f32, data: &DataTransfer) -> Cmd {
        let Some(text) = self.get_mut(id) else {
            return Cmd::None;
        };
        if text.drop(x, y, data).is_none() {
            return Cmd::None;
        }
        Cmd::batch(vec![
            Cmd::Emit(TextEvent::Dropped(id)),
            Cmd::Emit(TextEvent::Changed(id)),
            self.sync(id),
            Cmd::Redraw,
        ])
    }

    /// The active drag finished with `effect`
    pub fn drag_end(&mut self, effect: DropEffect) -> Cmd {
        let Some(id) = self.drag_source.take() else {
            return Cmd::None;
        };
        let Some(text) = self.get_mut(id) else {
            return Cmd::None;
        };
        match text.drag_end(effect) {
            DragEndOutcome::Noop => Cmd::Redraw,
            DragEndOutcome::Restored => Cmd::batch(vec![
                self.sync(id),
                Cmd::FocusHostInput(id),
                Cmd::Redraw,
            ]),
            DragEndOutcome::Moved => Cmd::batch(vec![
                Cmd::Emit(TextEvent::Changed(id)),
                self.exit_editing(id),
            ]),
            DragEndOutcome::Copied => self.exit_editing(id),
        }
    }
}

impl Default for Surface {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
