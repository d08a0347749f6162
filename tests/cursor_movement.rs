//! Cursor movement tests - arrows, word and line jumps, vertical navigation

mod common;

use caret::editable::{
    word_boundary, Direction, FixedWidthLayout, GraphemeBuffer, MoveTarget, RichText, TextEditMsg,
};
use caret::messages::{Msg, SurfaceMsg};
use caret::style::{StyleDeclaration, StyleMap, StyleProperty};
use caret::update::update;
use caret::{EngineConfig, Surface, TextId};
use common::{selection_of, test_surface, test_surface_rich};

fn move_to(surface: &mut Surface, target: MoveTarget) {
    update(surface, Msg::text_edit(TextEditMsg::Move(target)));
}

/// Editing surface whose single instance soft-wraps after `columns`
fn wrapped_surface(text: &str, columns: usize, cursor: usize) -> (Surface, TextId) {
    let mut surface = Surface::new(EngineConfig::default());
    let layout = FixedWidthLayout::new(10.0, 20.0).with_wrap(columns);
    let id = surface.add_text(RichText::new(text), Box::new(layout));
    update(&mut surface, Msg::Surface(SurfaceMsg::EnterEditing(id)));
    surface.get_mut(id).unwrap().set_selection(cursor, cursor);
    (surface, id)
}

// ========================================================================
// Left / Right
// ========================================================================

#[test]
fn test_move_right_and_left() {
    let (mut surface, id) = test_surface("hello", 2, 2);
    move_to(&mut surface, MoveTarget::Right);
    assert_eq!(selection_of(&surface, id), (3, 3));

    move_to(&mut surface, MoveTarget::Left);
    move_to(&mut surface, MoveTarget::Left);
    assert_eq!(selection_of(&surface, id), (1, 1));
}

#[test]
fn test_move_right_at_end_is_noop() {
    let (mut surface, id) = test_surface("hello", 5, 5);
    let cmd = update(&mut surface, Msg::text_edit(TextEditMsg::Move(MoveTarget::Right)));
    assert!(cmd.is_none());
    assert_eq!(selection_of(&surface, id), (5, 5));
}

#[test]
fn test_move_left_at_start_is_noop() {
    let (mut surface, id) = test_surface("hello", 0, 0);
    move_to(&mut surface, MoveTarget::Left);
    assert_eq!(selection_of(&surface, id), (0, 0));
}

#[test]
fn test_left_with_selection_collapses_to_start() {
    let (mut surface, id) = test_surface("hello", 1, 4);
    move_to(&mut surface, MoveTarget::Left);
    assert_eq!(selection_of(&surface, id), (1, 1));
}

#[test]
fn test_right_with_selection_collapses_to_end() {
    let (mut surface, id) = test_surface("hello", 1, 4);
    move_to(&mut surface, MoveTarget::Right);
    assert_eq!(selection_of(&surface, id), (4, 4));
}

#[test]
fn test_right_steps_over_whole_grapheme() {
    let (mut surface, id) = test_surface("a👍🏽b", 1, 1);
    move_to(&mut surface, MoveTarget::Right);
    assert_eq!(selection_of(&surface, id), (2, 2));
    assert_eq!(surface.get(id).unwrap().len(), 3);
}

// ========================================================================
// Word movement
// ========================================================================

#[test]
fn test_word_boundary_from_middle_of_text() {
    let buffer = GraphemeBuffer::from_text("hello world");
    assert_eq!(word_boundary(&buffer, 6, Direction::Backward), 0);
    assert_eq!(word_boundary(&buffer, 6, Direction::Forward), 11);
}

#[test]
fn test_word_right_jumps_word_by_word() {
    let (mut surface, id) = test_surface("hello world", 0, 0);
    move_to(&mut surface, MoveTarget::WordRight);
    assert_eq!(selection_of(&surface, id), (5, 5));

    move_to(&mut surface, MoveTarget::WordRight);
    assert_eq!(selection_of(&surface, id), (11, 11));
}

#[test]
fn test_word_left_jumps_word_by_word() {
    let (mut surface, id) = test_surface("hello world", 11, 11);
    move_to(&mut surface, MoveTarget::WordLeft);
    assert_eq!(selection_of(&surface, id), (6, 6));

    move_to(&mut surface, MoveTarget::WordLeft);
    assert_eq!(selection_of(&surface, id), (0, 0));
}

#[test]
fn test_word_right_stops_at_punctuation() {
    let (mut surface, id) = test_surface("foo.bar", 0, 0);
    move_to(&mut surface, MoveTarget::WordRight);
    assert_eq!(selection_of(&surface, id), (3, 3));

    // Sitting on the separator still makes progress
    move_to(&mut surface, MoveTarget::WordRight);
    assert_eq!(selection_of(&surface, id), (4, 4));

    move_to(&mut surface, MoveTarget::WordRight);
    assert_eq!(selection_of(&surface, id), (7, 7));
}

#[test]
fn test_word_right_crosses_line_break() {
    let (mut surface, id) = test_surface("ab\ncd", 2, 2);
    move_to(&mut surface, MoveTarget::WordRight);
    assert_eq!(selection_of(&surface, id), (5, 5));
}

// ========================================================================
// Line and document movement
// ========================================================================

#[test]
fn test_line_start_and_end() {
    let (mut surface, id) = test_surface("ab\ncde\nf", 4, 4);
    move_to(&mut surface, MoveTarget::LineStart);
    assert_eq!(selection_of(&surface, id), (3, 3));

    move_to(&mut surface, MoveTarget::LineEnd);
    assert_eq!(selection_of(&surface, id), (6, 6));
}

#[test]
fn test_document_start_and_end() {
    let (mut surface, id) = test_surface("ab\ncd", 2, 2);
    move_to(&mut surface, MoveTarget::DocumentEnd);
    assert_eq!(selection_of(&surface, id), (5, 5));

    move_to(&mut surface, MoveTarget::DocumentStart);
    assert_eq!(selection_of(&surface, id), (0, 0));
}

// ========================================================================
// Vertical movement
// ========================================================================

#[test]
fn test_move_down_keeps_column() {
    let (mut surface, id) = test_surface("hello\nworld", 2, 2);
    move_to(&mut surface, MoveTarget::Down);
    assert_eq!(selection_of(&surface, id), (8, 8));

    move_to(&mut surface, MoveTarget::Up);
    assert_eq!(selection_of(&surface, id), (2, 2));
}

#[test]
fn test_move_down_to_shorter_line_clamps() {
    let (mut surface, id) = test_surface("hello\nhi", 4, 4);
    move_to(&mut surface, MoveTarget::Down);
    assert_eq!(selection_of(&surface, id), (8, 8));
}

#[test]
fn test_move_up_on_first_line_goes_to_start() {
    let (mut surface, id) = test_surface("hello\nworld", 3, 3);
    move_to(&mut surface, MoveTarget::Up);
    assert_eq!(selection_of(&surface, id), (0, 0));
}

#[test]
fn test_move_down_on_last_line_goes_to_end() {
    let (mut surface, id) = test_surface("hello\nworld", 8, 8);
    move_to(&mut surface, MoveTarget::Down);
    assert_eq!(selection_of(&surface, id), (11, 11));
}

#[test]
fn test_move_down_through_empty_line() {
    let (mut surface, id) = test_surface("abc\n\nabc", 2, 2);
    move_to(&mut surface, MoveTarget::Down);
    assert_eq!(selection_of(&surface, id), (4, 4));

    move_to(&mut surface, MoveTarget::Down);
    assert_eq!(selection_of(&surface, id), (5, 5));
}

#[test]
fn test_move_down_follows_wrapped_display_lines() {
    let (mut surface, id) = wrapped_surface("abcdef", 3, 1);
    move_to(&mut surface, MoveTarget::Down);
    assert_eq!(selection_of(&surface, id), (4, 4));

    move_to(&mut surface, MoveTarget::Up);
    assert_eq!(selection_of(&surface, id), (1, 1));
}

#[test]
fn test_move_down_uses_measured_widths() {
    // Double-size glyphs on the first line: column 1 sits at x = 20
    let mut styles = StyleMap::new();
    let big = StyleDeclaration::new().with(StyleProperty::FontSize, 80.0);
    styles.set(0, 0, &big);
    styles.set(0, 1, &big);
    let rich = RichText::with_styles("ab\nwxyz", styles, StyleDeclaration::instance_defaults());
    let (mut surface, id) = test_surface_rich(rich, 1, 1);

    move_to(&mut surface, MoveTarget::Down);
    assert_eq!(selection_of(&surface, id), (5, 5));
}

#[test]
fn test_move_without_editing_does_nothing() {
    let (mut surface, id) = test_surface("hello", 2, 2);
    update(&mut surface, Msg::Surface(SurfaceMsg::ExitAll));
    move_to(&mut surface, MoveTarget::Right);
    assert!(!surface.get(id).unwrap().is_editing());
    assert_eq!(selection_of(&surface, id), (2, 2));
}
