//! 2D location mapping between linear grapheme indices and (line, column).
//!
//! Lines are described by [`LineSpan`]s. Logical spans come from splitting the
//! buffer at line breaks; wrapped spans come from the layout collaborator, where
//! a display line only consumes a break grapheme if it ends at a real line break.

/// One line of text as seen by the mapping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineSpan {
    /// Grapheme count, excluding the line break
    pub len: usize,
    /// Whether a line-break grapheme follows this line in the buffer
    pub hard_break: bool,
}

impl LineSpan {
    pub const fn new(len: usize, hard_break: bool) -> Self {
        Self { len, hard_break }
    }

    /// Graphemes this line consumes in the buffer, break included
    pub const fn consumed(&self) -> usize {
        self.len + self.hard_break as usize
    }
}

/// A position in the text (line and column, both 0-indexed).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    pub const fn zero() -> Self {
        Self { line: 0, column: 0 }
    }
}

/// Convert a linear index into a (line, column) position.
///
/// An index equal to a line's length maps to the end of that line rather than
/// the start of the next one, so text typed at the end of a line stays on it.
/// Indices past the end resolve to the end of the last line.
pub fn locate(index: usize, lines: &[LineSpan]) -> Position {
    let mut remaining = index;
    for (line, span) in lines.iter().enumerate() {
        if remaining <= span.len {
            return Position::new(line, remaining);
        }
        remaining -= span.consumed();
    }
    match lines.last() {
        Some(last) => Position::new(lines.len() - 1, last.len),
        None => Position::zero(),
    }
}

/// Convert a (line, column) position back into a linear index.
///
/// Columns past the line end clamp to it; lines past the end clamp to the
/// buffer end.
pub fn linearize(pos: Position, lines: &[LineSpan]) -> usize {
    let Some(span) = lines.get(pos.line) else {
        return lines.iter().map(LineSpan::consumed).sum();
    };
    line_start(pos.line, lines) + pos.column.min(span.len)
}

/// Linear index of the first grapheme of `line`
pub fn line_start(line: usize, lines: &[LineSpan]) -> usize {
    lines.iter().take(line).map(LineSpan::consumed).sum()
}
