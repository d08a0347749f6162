//! Update functions for the Elm-style architecture
//!
//! All state transformations flow through these functions.

use crate::commands::{Cmd, TextEvent};
use crate::messages::{CompositionMsg, DragMsg, Msg, PointerMsg, SurfaceMsg};
use crate::surface::Surface;

#[cfg(debug_assertions)]
use crate::tracing::SelectionSnapshot;
#[cfg(debug_assertions)]
use tracing::{debug, span, Level};

/// Main update function - dispatches to sub-handlers
///
/// In debug builds, this wraps with tracing instrumentation.
/// In release builds, it's a direct dispatch with zero overhead.
#[inline]
pub fn update(surface: &mut Surface, msg: Msg) -> Option<Cmd> {
    #[cfg(debug_assertions)]
    {
        update_traced(surface, msg)
    }
    #[cfg(not(debug_assertions))]
    {
        update_inner(surface, msg)
    }
}

/// Inner update logic (no tracing)
fn update_inner(surface: &mut Surface, msg: Msg) -> Option<Cmd> {
    let cmd = match msg {
        Msg::TextEdit(m) => surface.text_edit(m),
        Msg::Pointer(m) => update_pointer(surface, m),
        Msg::Drag(m) => update_drag(surface, m),
        Msg::Composition(m) => update_composition(surface, m),
        Msg::HostInput(state) => surface.host_input(state),
        Msg::Surface(m) => update_surface(surface, m),
    };
    cmd.into_option()
}

pub fn update_pointer(surface: &mut Surface, msg: PointerMsg) -> Cmd {
    match msg {
        PointerMsg::Down {
            id,
            x,
            y,
            click_count,
            shift,
        } => surface.pointer_down(id, x, y, click_count, shift),
        PointerMsg::Move { id, x, y } => surface.pointer_move(id, x, y),
        PointerMsg::Up { id, x, y } => surface.pointer_up(id, x, y),
        PointerMsg::Released => {
            surface.pointer_released();
            Cmd::None
        }
    }
}

pub fn update_drag(surface: &mut Surface, msg: DragMsg) -> Cmd {
    match msg {
        DragMsg::Start { id } => surface.drag_start(id),
        DragMsg::Over { id, x, y } => {
            let accepted = surface.drag_over(id, x, y);
            Cmd::batch(vec![
                Cmd::Emit(TextEvent::DropTarget { id, accepted }),
                Cmd::Redraw,
            ])
        }
        DragMsg::Leave { id } => surface.drag_leave(id),
        DragMsg::Drop { id, x, y, data } => surface.drop(id, x, y, &data),
        DragMsg::End { effect } => surface.drag_end(effect),
    }
}

pub fn update_composition(surface: &mut Surface, msg: CompositionMsg) -> Cmd {
    match msg {
        CompositionMsg::Start => surface.composition_start(),
        CompositionMsg::Update(state) => surface.composition_update(state),
        CompositionMsg::End(state) => surface.composition_end(state),
    }
}

pub fn update_surface(surface: &mut Surface, msg: SurfaceMsg) -> Cmd {
    match msg {
        SurfaceMsg::EnterEditing(id) => surface.enter_editing(id),
        SurfaceMsg::ExitEditing(id) => surface.exit_editing(id),
        SurfaceMsg::ExitAll => surface.exit_all(),
        SurfaceMsg::RegisterInteractive(id) => surface.register_interactive(id),
        SurfaceMsg::Unregister(id) => surface.unregister(id),
        SurfaceMsg::RemoveText(id) => surface.remove_text(id),
        SurfaceMsg::Teardown => surface.teardown(),
        SurfaceMsg::Tick(now) => surface.tick(now),
    }
}

/// Update with tracing instrumentation (debug builds only)
#[cfg(debug_assertions)]
fn update_traced(surface: &mut Surface, msg: Msg) -> Option<Cmd> {
    // Skip logging for noisy periodic messages
    let is_noisy = msg.is_noisy();

    let msg_name = msg_type_name(&msg);
    let _span = if is_noisy {
        None
    } else {
        Some(span!(Level::DEBUG, "update", msg = %msg_name).entered())
    };

    let before = SelectionSnapshot::from_surface(surface);

    if !is_noisy {
        debug!(target: "message", msg = %msg_name, "processing");
    }

    let result = update_inner(surface, msg);

    let after = SelectionSnapshot::from_surface(surface);
    if let Some(diff) = before.diff(&after) {
        debug!(target: "selection", %diff, "state changed");
    }

    result
}

/// Get a display name for a message type
///
/// Uses Debug formatting to include variant names and arguments.
/// Example outputs:
/// - `TextEdit::Move(WordLeft)`
/// - `Pointer::Down { id: TextId(1), .. }`
#[cfg(debug_assertions)]
fn msg_type_name(msg: &Msg) -> String {
    match msg {
        Msg::TextEdit(m) => format!("TextEdit::{:?}", m),
        Msg::Pointer(m) => format!("Pointer::{:?}", m),
        Msg::Drag(DragMsg::Drop { id, x, y, .. }) => format!("Drag::Drop({id}, {x}, {y})"),
        Msg::Drag(m) => format!("Drag::{:?}", m),
        Msg::Composition(m) => format!("Composition::{:?}", m),
        Msg::HostInput(state) => format!("HostInput({:?})", state),
        Msg::Surface(m) => format!("Surface::{:?}", m),
    }
}
