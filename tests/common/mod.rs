//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use caret::commands::{Cmd, TextEvent};
use caret::editable::{DataTransfer, FixedWidthLayout, RichText, TEXT_PLAIN};
use caret::messages::{Msg, SurfaceMsg};
use caret::style::{StyleDeclaration, StyleProperty};
use caret::update::update;
use caret::{EngineConfig, Surface, TextId};

/// Advance width of one grapheme in test layouts
pub const ADVANCE: f32 = 10.0;
pub const LINE_HEIGHT: f32 = 20.0;

pub fn layout() -> Box<FixedWidthLayout> {
    Box::new(FixedWidthLayout::new(ADVANCE, LINE_HEIGHT))
}

/// Surface with one instance in edit mode and the given selection
pub fn test_surface(text: &str, start: usize, end: usize) -> (Surface, TextId) {
    test_surface_rich(RichText::new(text), start, end)
}

pub fn test_surface_rich(text: RichText, start: usize, end: usize) -> (Surface, TextId) {
    let mut surface = Surface::new(EngineConfig::default());
    let id = surface.add_text(text, layout());
    update(&mut surface, Msg::Surface(SurfaceMsg::EnterEditing(id)));
    surface
        .get_mut(id)
        .expect("instance was just added")
        .set_selection(start, end);
    (surface, id)
}

/// Surface with several instances, none editing
pub fn surface_with_texts(texts: &[&str]) -> (Surface, Vec<TextId>) {
    let mut surface = Surface::new(EngineConfig::default());
    let ids = texts
        .iter()
        .map(|text| surface.add_text(RichText::new(text), layout()))
        .collect();
    (surface, ids)
}

pub fn text_of(surface: &Surface, id: TextId) -> String {
    surface.get(id).expect("unknown instance").text()
}

/// Selection as (start, end)
pub fn selection_of(surface: &Surface, id: TextId) -> (usize, usize) {
    let selection = surface.get(id).expect("unknown instance").selection();
    (selection.start, selection.end)
}

pub fn is_editing(surface: &Surface, id: TextId) -> bool {
    surface.get(id).is_some_and(|text| text.is_editing())
}

/// Pointer coordinates of the left edge of (line, column) in a test layout
pub fn point(line: usize, column: usize) -> (f32, f32) {
    (
        column as f32 * ADVANCE,
        line as f32 * LINE_HEIGHT + LINE_HEIGHT / 2.0,
    )
}

pub fn style(prop: StyleProperty, value: &str) -> StyleDeclaration {
    StyleDeclaration::new().with(prop, value)
}

pub fn fill(color: &str) -> StyleDeclaration {
    style(StyleProperty::Fill, color)
}

/// `fill` of the raw char style at (line, char), if any
pub fn fill_at(surface: &Surface, id: TextId, line: usize, ch: usize) -> Option<String> {
    surface
        .get(id)?
        .rich()
        .styles()
        .get(line, ch)?
        .get(StyleProperty::Fill)?
        .as_str()
        .map(str::to_owned)
}

/// Events carried by an update result
pub fn events(cmd: &Option<Cmd>) -> Vec<TextEvent> {
    cmd.as_ref()
        .map(|cmd| cmd.events().into_iter().cloned().collect())
        .unwrap_or_default()
}

/// Plain text of the first clipboard write in an update result
pub fn clipboard_text(cmd: Option<Cmd>) -> Option<String> {
    cmd?.flatten().into_iter().find_map(|cmd| match cmd {
        Cmd::WriteClipboard(data) => data.get_data(TEXT_PLAIN).map(str::to_owned),
        _ => None,
    })
}

/// The transfer handed to the platform when a drag starts
pub fn drag_data(cmd: Option<Cmd>) -> Option<DataTransfer> {
    cmd?.flatten().into_iter().find_map(|cmd| match cmd {
        Cmd::BeginDrag { data, .. } => Some(data),
        _ => None,
    })
}
