//! Vertical navigation and pointer hit-testing over display lines.
//!
//! Horizontal positions are measured in layout units: the line's alignment
//! offset plus the advance widths of the graphemes before a column.

use serde::Serialize;

use super::layout::TextLayout;
use super::location::{line_start, locate, LineSpan, Position};

/// Axis-aligned rectangle in layout coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Vertical movement direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vertical {
    Up,
    Down,
}

fn total_len(lines: &[LineSpan]) -> usize {
    lines.iter().map(LineSpan::consumed).sum()
}

/// Horizontal offset of the cursor at `pos`
pub fn horizontal_offset(layout: &dyn TextLayout, pos: Position) -> f32 {
    let widths: f32 = (0..pos.column)
        .map(|col| layout.char_width(pos.line, col))
        .sum();
    layout.line_left_offset(pos.line) + widths
}

/// Column of `line` closest to horizontal offset `x`.
///
/// Walks the line until a grapheme's right edge passes `x`, then picks the
/// nearer edge of that grapheme; a tie keeps the left edge. Offsets past the
/// last grapheme land at the line end.
pub fn column_at_offset(layout: &dyn TextLayout, line: usize, x: f32) -> usize {
    let len = layout.display_lines().get(line).map_or(0, |l| l.len);
    let mut left = layout.line_left_offset(line);
    for col in 0..len {
        let right = left + layout.char_width(line, col);
        if right > x {
            return if right - x < x - left { col + 1 } else { col };
        }
        left = right;
    }
    len
}

/// Target index when moving the cursor at `index` one display line.
///
/// Moving up from the first line goes to the start of the text; moving down
/// from the last line goes to its end.
pub fn vertical_target(layout: &dyn TextLayout, index: usize, direction: Vertical) -> usize {
    let lines = layout.display_lines();
    let pos = locate(index, lines);
    let target = match direction {
        Vertical::Up if pos.line == 0 => return 0,
        Vertical::Down if pos.line + 1 >= lines.len() => return total_len(lines),
        Vertical::Up => pos.line - 1,
        Vertical::Down => pos.line + 1,
    };
    let x = horizontal_offset(layout, pos);
    line_start(target, lines) + column_at_offset(layout, target, x)
}

/// Display line containing vertical offset `y`, clamped to the first and last line
pub fn line_at_offset(layout: &dyn TextLayout, y: f32) -> usize {
    let count = layout.display_lines().len();
    let mut top = 0.0;
    for line in 0..count {
        top += layout.line_height(line);
        if y < top {
            return line;
        }
    }
    count.saturating_sub(1)
}

/// Grapheme index under a pointer at (x, y) in layout coordinates
pub fn index_at_point(layout: &dyn TextLayout, x: f32, y: f32) -> usize {
    let line = line_at_offset(layout, y);
    line_start(line, layout.display_lines()) + column_at_offset(layout, line, x)
}

fn line_top(layout: &dyn TextLayout, line: usize) -> f32 {
    (0..line).map(|l| layout.line_height(l)).sum()
}

/// Caret rectangle for a collapsed selection at `index`
pub fn cursor_rect(layout: &dyn TextLayout, index: usize) -> Rect {
    let pos = locate(index, layout.display_lines());
    Rect {
        x: horizontal_offset(layout, pos),
        y: line_top(layout, pos.line),
        width: 0.0,
        height: layout.line_height(pos.line),
    }
}

/// Highlight rectangles for `[start, end)`, one per display line touched
pub fn selection_rects(layout: &dyn TextLayout, start: usize, end: usize) -> Vec<Rect> {
    if start >= end {
        return Vec::new();
    }
    let lines = layout.display_lines();
    let from = locate(start, lines);
    let to = locate(end, lines);

    (from.line..=to.line)
        .filter_map(|line| {
            let span = lines.get(line)?;
            let first = if line == from.line { from.column } else { 0 };
            let last = if line == to.line { to.column } else { span.len };
            if first == last && line != from.line {
                return None;
            }
            let x = horizontal_offset(layout, Position::new(line, first));
            let right = horizontal_offset(layout, Position::new(line, last));
            Some(Rect {
                x,
                y: line_top(layout, line),
                width: right - x,
                height: layout.line_height(line),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editable::edit::RichText;
    use crate::editable::layout::FixedWidthLayout;
    use crate::style::{StyleDeclaration, StyleProperty};

    fn layout_for(text: &RichText) -> FixedWidthLayout {
        let mut layout = FixedWidthLayout::new(10.0, 20.0);
        layout.reflow(text);
        layout
    }

    #[test]
    fn test_down_keeps_column() {
        let text = RichText::new("hello\nworld");
        let layout = layout_for(&text);
        assert_eq!(vertical_target(&layout, 2, Vertical::Down), 8);
        assert_eq!(vertical_target(&layout, 8, Vertical::Up), 2);
    }

    #[test]
    fn test_down_to_shorter_line_clamps_to_end() {
        let text = RichText::new("hello\nhi");
        let layout = layout_for(&text);
        assert_eq!(vertical_target(&layout, 4, Vertical::Down), 8);
    }

    #[test]
    fn test_edges() {
        let text = RichText::new("ab\ncd");
        let layout = layout_for(&text);
        assert_eq!(vertical_target(&layout, 1, Vertical::Up), 0);
        assert_eq!(vertical_target(&layout, 4, Vertical::Down), 5);
    }

    #[test]
    fn test_proportional_widths_pick_nearest_edge() {
        // Second line's first grapheme is twice as wide
        let mut text = RichText::new("abc\nxyz");
        let wide = StyleDeclaration::new().with(StyleProperty::FontSize, 80.0);
        text.styles_mut().set(1, 0, &wide);
        let layout = layout_for(&text);

        // From column 1 (x = 10): "x" spans 0..20, tie keeps left edge
        assert_eq!(vertical_target(&layout, 1, Vertical::Down), 4);
        // From column 2 (x = 20): right edge of "x" is exact, "y" spans 20..30
        assert_eq!(vertical_target(&layout, 2, Vertical::Down), 5);
    }

    #[test]
    fn test_column_at_offset_rounds_to_closer_edge() {
        let text = RichText::new("abcd");
        let layout = layout_for(&text);
        assert_eq!(column_at_offset(&layout, 0, 14.0), 1);
        assert_eq!(column_at_offset(&layout, 0, 16.0), 2);
        assert_eq!(column_at_offset(&layout, 0, 15.0), 1);
        assert_eq!(column_at_offset(&layout, 0, -5.0), 0);
        assert_eq!(column_at_offset(&layout, 0, 500.0), 4);
    }

    #[test]
    fn test_wrapped_lines_navigate_by_display_line() {
        let text = RichText::new("abcdef");
        let mut layout = FixedWidthLayout::new(10.0, 20.0).with_wrap(3);
        layout.reflow(&text);
        assert_eq!(vertical_target(&layout, 1, Vertical::Down), 4);
        assert_eq!(vertical_target(&layout, 5, Vertical::Up), 2);
    }

    #[test]
    fn test_index_at_point() {
        let text = RichText::new("hello\nworld");
        let layout = layout_for(&text);
        assert_eq!(index_at_point(&layout, 21.0, 5.0), 2);
        assert_eq!(index_at_point(&layout, 21.0, 25.0), 8);
        // Below the last line clamps to it
        assert_eq!(index_at_point(&layout, 1000.0, 500.0), 11);
    }

    #[test]
    fn test_cursor_and_selection_rects() {
        let text = RichText::new("hello\nworld");
        let layout = layout_for(&text);
        let caret = cursor_rect(&layout, 8);
        assert_eq!((caret.x, caret.y, caret.height), (20.0, 20.0, 20.0));

        let rects = selection_rects(&layout, 3, 8);
        assert_eq!(rects.len(), 2);
        assert_eq!((rects[0].x, rects[0].width), (30.0, 20.0));
        assert_eq!((rects[1].x, rects[1].width), (0.0, 20.0));
        assert!(selection_rects(&layout, 4, 4).is_empty());
    }
}
