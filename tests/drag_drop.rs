//! Drag and drop tests - arming, moving between instances, self-drops and
//! cancelled drags

mod common;

use caret::commands::TextEvent;
use caret::editable::{DataTransfer, DropEffect, EffectAllowed, RichText, RICH_TEXT, TEXT_PLAIN};
use caret::messages::{DragMsg, Msg, PointerMsg};
use caret::style::{StyleDeclaration, StyleMap};
use caret::update::update;
use caret::{Cmd, EngineConfig, Surface, TextId};
use common::{drag_data, events, fill, fill_at, is_editing, layout, point, selection_of, text_of};

/// Instance A ("hello world", "llo" red) editing with `[2, 5)` selected and a
/// drag armed inside the selection, plus a plain instance B
fn armed_pair(b_text: &str) -> (Surface, TextId, TextId) {
    let mut surface = Surface::new(EngineConfig::default());
    let mut styles = StyleMap::new();
    for ch in 2..5 {
        styles.set(0, ch, &fill("red"));
    }
    let a = surface.add_text(
        RichText::with_styles("hello world", styles, StyleDeclaration::instance_defaults()),
        layout(),
    );
    let b = surface.add_text(RichText::new(b_text), layout());

    update(&mut surface, Msg::enter_editing(a));
    surface.get_mut(a).unwrap().set_selection(2, 5);
    let (x, y) = point(0, 3);
    update(&mut surface, Msg::click(a, x, y));
    (surface, a, b)
}

fn start_drag(surface: &mut Surface, id: TextId) -> DataTransfer {
    drag_data(update(surface, Msg::Drag(DragMsg::Start { id }))).expect("drag should start")
}

fn drop_at(surface: &mut Surface, id: TextId, column: usize, data: DataTransfer) -> Option<Cmd> {
    let (x, y) = point(0, column);
    update(surface, Msg::Drag(DragMsg::Drop { id, x, y, data }))
}

fn end_drag(surface: &mut Surface, effect: DropEffect) -> Option<Cmd> {
    update(surface, Msg::Drag(DragMsg::End { effect }))
}

// ========================================================================
// Starting a drag
// ========================================================================

#[test]
fn test_drag_start_fills_both_representations() {
    let (mut surface, a, _) = armed_pair("xyz");
    let data = start_drag(&mut surface, a);

    assert_eq!(data.get_data(TEXT_PLAIN), Some("llo"));
    let rich = data.get_data(RICH_TEXT).unwrap();
    let payload: serde_json::Value = serde_json::from_str(rich).unwrap();
    assert_eq!(payload["value"], "llo");
    assert_eq!(payload["styles"].as_array().unwrap().len(), 3);
    assert_eq!(payload["styles"][0]["fill"], "red");
    assert_eq!(data.effect_allowed, EffectAllowed::CopyMove);
    assert!(surface.get(a).unwrap().drag().is_dragging());
}

#[test]
fn test_drag_start_uses_configured_effect_allowed() {
    let config = EngineConfig {
        drop_effect_allowed: EffectAllowed::Copy,
        ..EngineConfig::default()
    };
    let mut surface = Surface::new(config);
    let a = surface.add_text(RichText::new("hello"), layout());
    update(&mut surface, Msg::enter_editing(a));
    surface.get_mut(a).unwrap().set_selection(0, 5);
    let (x, y) = point(0, 2);
    update(&mut surface, Msg::click(a, x, y));

    let data = start_drag(&mut surface, a);
    assert_eq!(data.effect_allowed, EffectAllowed::Copy);
}

#[test]
fn test_drag_start_requires_press_inside_selection() {
    let (mut surface, ids) = common::surface_with_texts(&["hello"]);
    let a = ids[0];
    update(&mut surface, Msg::enter_editing(a));
    surface.get_mut(a).unwrap().set_selection(0, 2);
    let (x, y) = point(0, 4);
    update(&mut surface, Msg::click(a, x, y));

    let cmd = update(&mut surface, Msg::Drag(DragMsg::Start { id: a }));
    assert!(drag_data(cmd).is_none());
}

// ========================================================================
// Moving between instances
// ========================================================================

#[test]
fn test_move_drop_onto_other_instance() {
    let (mut surface, a, b) = armed_pair("xyz");
    let data = start_drag(&mut surface, a);

    let cmd = drop_at(&mut surface, b, 0, data);
    let emitted = events(&cmd);
    assert!(emitted.contains(&TextEvent::Dropped(b)));
    assert!(emitted.contains(&TextEvent::Changed(b)));

    assert_eq!(text_of(&surface, b), "lloxyz");
    assert_eq!(selection_of(&surface, b), (0, 3));
    for ch in 0..3 {
        assert_eq!(fill_at(&surface, b, 0, ch).as_deref(), Some("red"));
    }
    assert_eq!(fill_at(&surface, b, 0, 3), None);
    assert!(!is_editing(&surface, b));

    let cmd = end_drag(&mut surface, DropEffect::Move);
    assert!(events(&cmd).contains(&TextEvent::EditingExited { id: a, modified: true }));
    assert_eq!(text_of(&surface, a), "he world");
    assert!(!is_editing(&surface, a));
    assert!(surface.get(a).unwrap().rich().styles().is_empty());
}

#[test]
fn test_copy_drop_keeps_source_text() {
    let (mut surface, a, b) = armed_pair("xyz");
    let data = start_drag(&mut surface, a);
    drop_at(&mut surface, b, 3, data);
    end_drag(&mut surface, DropEffect::Copy);

    assert_eq!(text_of(&surface, b), "xyzllo");
    assert_eq!(text_of(&surface, a), "hello world");
    assert!(!is_editing(&surface, a));
}

#[test]
fn test_cancelled_drag_restores_selection_and_focus() {
    let (mut surface, a, _) = armed_pair("xyz");
    start_drag(&mut surface, a);

    let cmd = end_drag(&mut surface, DropEffect::None).unwrap();
    let flat = cmd.flatten();
    assert!(flat.iter().any(|cmd| matches!(cmd, Cmd::FocusHostInput(id) if *id == a)));
    assert_eq!(selection_of(&surface, a), (2, 5));
    assert!(is_editing(&surface, a));
    assert_eq!(text_of(&surface, a), "hello world");
}

#[test]
fn test_drop_of_foreign_plain_text() {
    let (mut surface, ids) = common::surface_with_texts(&["ab"]);
    let cmd = drop_at(&mut surface, ids[0], 1, DataTransfer::plain("XY"));

    assert!(events(&cmd).contains(&TextEvent::Dropped(ids[0])));
    assert_eq!(text_of(&surface, ids[0]), "aXYb");
}

#[test]
fn test_drop_trims_trailing_break_at_line_end() {
    let (mut surface, ids) = common::surface_with_texts(&["ab\ncd"]);
    drop_at(&mut surface, ids[0], 2, DataTransfer::plain("X\n"));
    assert_eq!(text_of(&surface, ids[0]), "abX\ncd");
}

#[test]
fn test_drop_of_empty_text_is_ignored() {
    let (mut surface, ids) = common::surface_with_texts(&["ab"]);
    let cmd = drop_at(&mut surface, ids[0], 1, DataTransfer::plain(""));
    assert!(cmd.is_none());
    assert_eq!(text_of(&surface, ids[0]), "ab");
}

#[test]
fn test_drop_on_non_editable_instance_is_refused() {
    let (mut surface, ids) = common::surface_with_texts(&["ab"]);
    surface.get_mut(ids[0]).unwrap().editable = false;
    let (x, y) = point(0, 1);
    let accepted = surface.drag_over(ids[0], x, y);
    assert!(!accepted);

    let cmd = drop_at(&mut surface, ids[0], 1, DataTransfer::plain("X"));
    assert!(cmd.is_none());
}

// ========================================================================
// Dropping onto the source instance
// ========================================================================

#[test]
fn test_self_drop_after_selection_moves_text() {
    let (mut surface, a, _) = armed_pair("xyz");
    let data = start_drag(&mut surface, a);

    // "hello world" with "llo" dragged to the end
    drop_at(&mut surface, a, 11, data);
    assert_eq!(text_of(&surface, a), "he worldllo");
    assert_eq!(selection_of(&surface, a), (8, 11));
    assert_eq!(fill_at(&surface, a, 0, 8).as_deref(), Some("red"));
    assert_eq!(fill_at(&surface, a, 0, 2), None);

    // The source already handled the move
    end_drag(&mut surface, DropEffect::Move);
    assert_eq!(text_of(&surface, a), "he worldllo");
}

#[test]
fn test_self_drop_before_selection_moves_text() {
    let (mut surface, a, _) = armed_pair("xyz");
    let data = start_drag(&mut surface, a);

    drop_at(&mut surface, a, 0, data);
    assert_eq!(text_of(&surface, a), "llohe world");
    assert_eq!(selection_of(&surface, a), (0, 3));
}

#[test]
fn test_self_drop_inside_selection_is_refused() {
    let (mut surface, a, _) = armed_pair("xyz");
    let data = start_drag(&mut surface, a);

    let (x, y) = point(0, 4);
    assert!(!surface.drag_over(a, x, y));
    let cmd = drop_at(&mut surface, a, 4, data.clone());
    assert!(cmd.is_none());

    // Selection bounds are refused too
    assert!(drop_at(&mut surface, a, 5, data).is_none());
    assert_eq!(text_of(&surface, a), "hello world");
}

// ========================================================================
// Hover feedback
// ========================================================================

#[test]
fn test_drag_over_tracks_drop_index_until_leave() {
    let (mut surface, ids) = common::surface_with_texts(&["abc"]);
    let id = ids[0];
    let (x, y) = point(0, 2);
    let cmd = update(&mut surface, Msg::Drag(DragMsg::Over { id, x, y }));

    assert_eq!(events(&cmd), vec![TextEvent::DropTarget { id, accepted: true }]);
    assert!(cmd.unwrap().needs_redraw());
    assert_eq!(surface.get(id).unwrap().drag().drop_index, Some(2));

    update(&mut surface, Msg::Drag(DragMsg::Leave { id }));
    assert_eq!(surface.get(id).unwrap().drag().drop_index, None);
}

#[test]
fn test_drag_over_own_selection_is_rejected() {
    let (mut surface, a, b) = armed_pair("xyz");
    start_drag(&mut surface, a);

    let (x, y) = point(0, 4);
    let cmd = update(&mut surface, Msg::Drag(DragMsg::Over { id: a, x, y }));
    assert_eq!(events(&cmd), vec![TextEvent::DropTarget { id: a, accepted: false }]);
    assert_eq!(surface.get(a).unwrap().drag().drop_index, None);

    let (x, y) = point(0, 1);
    let cmd = update(&mut surface, Msg::Drag(DragMsg::Over { id: b, x, y }));
    assert_eq!(events(&cmd), vec![TextEvent::DropTarget { id: b, accepted: true }]);
}

#[test]
fn test_drag_end_without_drag_is_noop() {
    let (mut surface, _) = common::test_surface("abc", 0, 0);
    assert!(end_drag(&mut surface, DropEffect::Move).is_none());
}

#[test]
fn test_pointer_release_after_armed_press_does_not_drag() {
    let (mut surface, a, _) = armed_pair("xyz");
    let (x, y) = point(0, 3);
    update(&mut surface, Msg::Pointer(PointerMsg::Up { id: a, x, y }));

    let cmd = update(&mut surface, Msg::Drag(DragMsg::Start { id: a }));
    assert!(drag_data(cmd).is_none());
    assert_eq!(selection_of(&surface, a), (3, 3));
}
