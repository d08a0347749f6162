//! Debug tracing infrastructure for development diagnostics
//!
//! Provides structured logging with scoped filtering for debugging
//! selection, composition and drag state transitions.
//!
//! # Usage
//!
//! Configure via RUST_LOG environment variable:
//! - `RUST_LOG=debug` - all debug logs
//! - `RUST_LOG=selection=debug` - only selection diffs
//! - `RUST_LOG=caret::surface=debug` - module-level filtering
//!
//! # Log Files
//!
//! Logs are written to `~/.config/caret/logs/caret.log` with daily rotation.
//! File logging uses debug level by default for more verbose troubleshooting.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::editable::DragPhase;
use crate::surface::{Surface, TextId};

/// Initialize tracing subscriber with console and file logging
///
/// Console output respects RUST_LOG env var and defaults to `warn`.
/// File logging writes to `~/.config/caret/logs/caret.log` with daily rotation.
pub fn init() {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    // Console layer - respects RUST_LOG
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_filter(console_filter);

    // File layer - always debug level for troubleshooting
    let file_layer = match crate::config_paths::ensure_logs_dir() {
        Ok(logs_dir) => {
            let file_appender = tracing_appender::rolling::daily(logs_dir, "caret.log");
            Some(
                fmt::layer()
                    .with_writer(file_appender)
                    .with_ansi(false)
                    .with_target(true)
                    .with_line_number(true)
                    .with_filter(EnvFilter::new("debug")),
            )
        }
        Err(e) => {
            eprintln!("Warning: Could not initialize file logging: {e:#}");
            None
        }
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
}

/// Lightweight snapshot of the editing state of a surface for diffing
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionSnapshot {
    pub editor: Option<TextId>,
    pub len: usize,
    pub selection: (usize, usize),
    pub composition: Option<(usize, usize)>,
    pub drag: DragPhase,
}

impl SelectionSnapshot {
    pub fn from_surface(surface: &Surface) -> Self {
        let editor = surface.current_editor();
        let text = editor.and_then(|id| surface.get(id));
        Self {
            editor,
            len: text.map_or(0, |t| t.len()),
            selection: text.map_or((0, 0), |t| (t.selection().start, t.selection().end)),
            composition: text
                .and_then(|t| t.composition())
                .map(|c| (c.start, c.end)),
            drag: text.map_or(DragPhase::Idle, |t| t.drag().phase),
        }
    }

    /// Generate a diff description between two snapshots
    pub fn diff(&self, other: &SelectionSnapshot) -> Option<String> {
        if self.editor != other.editor {
            let name = |id: Option<TextId>| id.map_or("none".to_string(), |id| id.to_string());
            return Some(format!("editor: {} → {}", name(self.editor), name(other.editor)));
        }

        let mut changes = Vec::new();
        if self.len != other.len {
            changes.push(format!("len: {} → {}", self.len, other.len));
        }
        if self.selection != other.selection {
            changes.push(format!(
                "selection: [{},{}) → [{},{})",
                self.selection.0, self.selection.1, other.selection.0, other.selection.1
            ));
        }
        if self.composition != other.composition {
            let status = match other.composition {
                Some((start, end)) => format!("[{start},{end})"),
                None => "ended".to_string(),
            };
            changes.push(format!("composition {status}"));
        }
        if self.drag != other.drag {
            changes.push(format!("drag: {:?} → {:?}", self.drag, other.drag));
        }

        if changes.is_empty() {
            None
        } else {
            Some(changes.join("; "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(selection: (usize, usize)) -> SelectionSnapshot {
        SelectionSnapshot {
            editor: Some(TextId(1)),
            len: 5,
            selection,
            composition: None,
            drag: DragPhase::Idle,
        }
    }

    #[test]
    fn test_diff_reports_selection_change() {
        let before = snapshot((0, 0));
        let after = snapshot((1, 3));
        assert_eq!(before.diff(&after).as_deref(), Some("selection: [0,0) → [1,3)"));
        assert!(before.diff(&before).is_none());
    }

    #[test]
    fn test_diff_reports_editor_switch_first() {
        let before = snapshot((0, 0));
        let mut after = snapshot((2, 2));
        after.editor = None;
        assert_eq!(before.diff(&after).as_deref(), Some("editor: text#1 → none"));
    }
}
