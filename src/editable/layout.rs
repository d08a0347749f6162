//! Layout collaborator interface.
//!
//! The engine never measures glyphs itself. Display lines (logical lines after
//! wrapping), per-character advance widths, line heights and alignment offsets
//! come from a [`TextLayout`] owned by each editable instance.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::style::{StyleDeclaration, StyleProperty};

use super::edit::RichText;
use super::location::LineSpan;

/// Measurements the navigation and hit-testing code relies on
pub trait TextLayout: fmt::Debug {
    /// Recompute wrapping and metrics after the text or its styles changed
    fn reflow(&mut self, text: &RichText);

    /// Display lines, at least one
    fn display_lines(&self) -> &[LineSpan];

    fn line_height(&self, line: usize) -> f32;

    /// Horizontal offset of a display line produced by alignment
    fn line_left_offset(&self, line: usize) -> f32;

    /// Advance width of the grapheme at (display line, column)
    fn char_width(&self, line: usize, column: usize) -> f32;

    /// Font size at (display line, column); an explicit `style` wins
    fn font_size(&self, line: usize, column: usize, style: Option<&StyleDeclaration>) -> f32;
}

/// Horizontal alignment of display lines inside the layout box
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Instance font size assumed when the text doesn't carry a usable one
const REFERENCE_FONT_SIZE: f32 = 40.0;

/// Monospace layout: every grapheme advances by the same width, scaled by its
/// font size relative to the instance font size.
#[derive(Debug, Clone)]
pub struct FixedWidthLayout {
    advance: f32,
    line_height: f32,
    wrap_columns: Option<usize>,
    align: TextAlign,
    box_width: f32,
    reference_size: f32,
    lines: Vec<LineSpan>,
    /// Font size of each grapheme, per display line
    sizes: Vec<Vec<f32>>,
}

impl FixedWidthLayout {
    pub fn new(advance: f32, line_height: f32) -> Self {
        Self {
            advance,
            line_height,
            wrap_columns: None,
            align: TextAlign::Left,
            box_width: 0.0,
            reference_size: REFERENCE_FONT_SIZE,
            lines: vec![LineSpan::default()],
            sizes: vec![Vec::new()],
        }
    }

    /// Soft-wrap display lines after `columns` graphemes
    pub fn with_wrap(mut self, columns: usize) -> Self {
        self.wrap_columns = (columns > 0).then_some(columns);
        self
    }

    /// Align lines inside a box of `width`
    pub fn with_alignment(mut self, align: TextAlign, width: f32) -> Self {
        self.align = align;
        self.box_width = width;
        self
    }

    fn line_width(&self, line: usize) -> f32 {
        (0..self.lines.get(line).map_or(0, |l| l.len))
            .map(|col| self.char_width(line, col))
            .sum()
    }

    fn push_line(&mut self, sizes: &[f32], hard_break: bool) {
        self.lines.push(LineSpan::new(sizes.len(), hard_break));
        self.sizes.push(sizes.to_vec());
    }
}

impl TextLayout for FixedWidthLayout {
    fn reflow(&mut self, text: &RichText) {
        self.reference_size = text
            .defaults()
            .get(StyleProperty::FontSize)
            .and_then(|v| v.as_f64())
            .map(|size| size as f32)
            .filter(|size| size.is_finite() && *size > 0.0)
            .unwrap_or(REFERENCE_FONT_SIZE);
        self.lines.clear();
        self.sizes.clear();

        for (line, span) in text.logical_lines().into_iter().enumerate() {
            let sizes: Vec<f32> = (0..span.len)
                .map(|col| {
                    text.styles()
                        .chain(line, col, text.defaults())
                        .resolve(StyleProperty::FontSize)
                        .and_then(|v| v.as_f64())
                        .map_or(self.reference_size, |s| (s as f32).max(0.0))
                })
                .collect();

            match self.wrap_columns {
                Some(columns) if sizes.len() > columns => {
                    let chunks: Vec<&[f32]> = sizes.chunks(columns).collect();
                    let last = chunks.len() - 1;
                    for (i, chunk) in chunks.into_iter().enumerate() {
                        self.push_line(chunk, i == last && span.hard_break);
                    }
                }
                _ => self.push_line(&sizes, span.hard_break),
            }
        }
    }

    fn display_lines(&self) -> &[LineSpan] {
        &self.lines
    }

    fn line_height(&self, _line: usize) -> f32 {
        self.line_height
    }

    fn line_left_offset(&self, line: usize) -> f32 {
        let slack = (self.box_width - self.line_width(line)).max(0.0);
        match self.align {
            TextAlign::Left => 0.0,
            TextAlign::Center => slack / 2.0,
            TextAlign::Right => slack,
        }
    }

    fn char_width(&self, line: usize, column: usize) -> f32 {
        let size = self
            .sizes
            .get(line)
            .and_then(|l| l.get(column))
            .copied()
            .unwrap_or(self.reference_size);
        self.advance * size / self.reference_size
    }

    fn font_size(&self, line: usize, column: usize, style: Option<&StyleDeclaration>) -> f32 {
        if let Some(size) = style
            .and_then(|s| s.get(StyleProperty::FontSize))
            .and_then(|v| v.as_f64())
        {
            return size as f32;
        }
        let sizes = self.sizes.get(line);
        sizes
            .and_then(|l| l.get(column).or_else(|| l.last()))
            .copied()
            .unwrap_or(self.reference_size)
    }
}
