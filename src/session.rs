//! Scripted editing sessions
//!
//! A session is a YAML document listing the text instances to put on a
//! surface and the messages to feed through [`update`]. Instances get ids in
//! declaration order starting at 1.
//!
//! ```yaml
//! texts:
//!   - text: "Hello world"
//!     styles:
//!       0: { chars: { 0: { fill: red } } }
//! steps:
//!   - surface: { enterEditing: 1 }
//!   - textEdit: { moveWithSelection: wordRight }
//! ```
//!
//! After replay the surface is dumped as a [`SessionDump`].

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::commands::{Cmd, TextEvent};
use crate::config::EngineConfig;
use crate::editable::{
    FixedWidthLayout, RichText, Selection, SelectionPaint, TextAlign, TEXT_PLAIN,
};
use crate::messages::Msg;
use crate::style::{StyleDeclaration, StyleMap};
use crate::surface::{Surface, TextId};
use crate::update::update;

/// Advance width of one grapheme at the reference font size
pub const CHAR_ADVANCE: f32 = 10.0;
pub const LINE_HEIGHT: f32 = 20.0;

/// One text instance declared by a session script
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextSpec {
    pub text: String,
    pub styles: StyleMap,
    /// Instance-level defaults (fontSize, fill, ...)
    pub defaults: StyleDeclaration,
    /// Soft-wrap after this many graphemes
    pub wrap: Option<usize>,
    pub align: TextAlign,
    /// Layout box width used for alignment
    pub width: Option<f32>,
    #[serde(default = "editable_by_default")]
    pub editable: bool,
}

fn editable_by_default() -> bool {
    true
}

impl TextSpec {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            editable: true,
            ..Self::default()
        }
    }

    fn layout(&self, wrap: Option<usize>) -> FixedWidthLayout {
        let mut layout = FixedWidthLayout::new(CHAR_ADVANCE, LINE_HEIGHT);
        if let Some(columns) = self.wrap.or(wrap) {
            layout = layout.with_wrap(columns);
        }
        if let Some(width) = self.width {
            layout = layout.with_alignment(self.align, width);
        }
        layout
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Session {
    pub texts: Vec<TextSpec>,
    /// Steps are written as single-key maps (`textEdit: { move: right }`)
    #[serde(with = "serde_yaml::with::singleton_map_recursive")]
    pub steps: Vec<Msg>,
}

impl Session {
    /// A session with a single text and no steps
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            texts: vec![TextSpec::plain(text)],
            steps: Vec::new(),
        }
    }

    pub fn from_yaml(source: &str) -> Result<Self> {
        serde_yaml::from_str(source).context("Invalid session script")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read script {}", path.display()))?;
        Self::from_yaml(&source).with_context(|| format!("In {}", path.display()))
    }

    /// Build the surface, replay every step and dump the result.
    /// `wrap` applies to texts that don't set their own.
    pub fn run(self, config: EngineConfig, wrap: Option<usize>) -> Result<SessionDump> {
        let mut surface = Surface::new(config);
        for spec in &self.texts {
            let rich = RichText::with_styles(&spec.text, spec.styles.clone(), spec.defaults.clone());
            let id = surface.add_text(rich, Box::new(spec.layout(wrap)));
            if let Some(text) = surface.get_mut(id) {
                text.editable = spec.editable;
            }
        }
        info!(texts = self.texts.len(), steps = self.steps.len(), "Replaying session");

        let mut log = CommandLog::default();
        for (step, msg) in self.steps.into_iter().enumerate() {
            if let Some(cmd) = update(&mut surface, msg) {
                debug!(step, ?cmd, "Step produced commands");
                log.record(cmd);
            }
        }

        Ok(SessionDump::capture(&surface, log))
    }
}

/// Side effects a replay asked the host to perform
#[derive(Debug, Default, Serialize)]
pub struct CommandLog {
    pub redraws: usize,
    pub host_syncs: usize,
    pub clipboard: Vec<String>,
    pub drags_started: usize,
    pub events: Vec<String>,
}

impl CommandLog {
    fn record(&mut self, cmd: Cmd) {
        for cmd in cmd.flatten() {
            match cmd {
                Cmd::Redraw => self.redraws += 1,
                Cmd::SyncHostInput { .. } => self.host_syncs += 1,
                Cmd::WriteClipboard(data) => self
                    .clipboard
                    .push(data.get_data(TEXT_PLAIN).unwrap_or_default().to_string()),
                Cmd::BeginDrag { .. } => self.drags_started += 1,
                Cmd::Emit(event) => self.events.push(describe(&event)),
                _ => {}
            }
        }
    }
}

fn describe(event: &TextEvent) -> String {
    match event {
        TextEvent::EditingEntered(id) => format!("editing entered {id}"),
        TextEvent::EditingExited { id, modified } => {
            format!("editing exited {id} (modified: {modified})")
        }
        TextEvent::Changed(id) => format!("changed {id}"),
        TextEvent::SelectionChanged(id) => format!("selection changed {id}"),
        TextEvent::Dropped(id) => format!("dropped onto {id}"),
        TextEvent::DropTarget { id, accepted } => {
            format!("drop target {id} (accepted: {accepted})")
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TextDump {
    pub id: TextId,
    pub text: String,
    pub selection: Selection,
    pub editing: bool,
    pub paint: SelectionPaint,
    pub styles: StyleMap,
}

/// Snapshot of a surface after replay
#[derive(Debug, Serialize)]
pub struct SessionDump {
    pub editor: Option<TextId>,
    pub texts: Vec<TextDump>,
    pub commands: CommandLog,
}

impl SessionDump {
    pub fn capture(surface: &Surface, commands: CommandLog) -> Self {
        let texts = surface
            .ids()
            .filter_map(|id| {
                let text = surface.get(id)?;
                Some(TextDump {
                    id,
                    text: text.text(),
                    selection: text.selection(),
                    editing: text.is_editing(),
                    paint: text.paint(),
                    styles: text.rich().styles().clone(),
                })
            })
            .collect();
        Self {
            editor: surface.current_editor(),
            texts,
            commands,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize session dump")
    }

    /// Human-readable summary
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for text in &self.texts {
            let marker = if text.editing { " (editing)" } else { "" };
            out.push_str(&format!("{}{}\n", text.id, marker));
            for line in text.text.split('\n') {
                out.push_str(&format!("  | {line}\n"));
            }
            out.push_str(&format!(
                "  selection [{}, {})\n",
                text.selection.start, text.selection.end
            ));
            if !text.styles.is_empty() {
                let styles = serde_json::to_string(&text.styles).unwrap_or_default();
                out.push_str(&format!("  styles {styles}\n"));
            }
        }
        if !self.commands.clipboard.is_empty() {
            out.push_str(&format!("clipboard {:?}\n", self.commands.clipboard));
        }
        for event in &self.commands.events {
            out.push_str(&format!("event: {event}\n"));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replay_selects_word() {
        let session = Session::from_yaml(
            r#"
texts:
  - text: "Hello world"
steps:
  - surface: { enterEditing: 1 }
  - textEdit: { moveWithSelection: wordRight }
"#,
        )
        .unwrap();

        let dump = session.run(EngineConfig::default(), None).unwrap();
        assert_eq!(dump.editor, Some(TextId(1)));
        assert_eq!(dump.texts[0].selection.range(), 0..5);
        assert!(dump.commands.events.contains(&"editing entered text#1".to_string()));
    }

    #[test]
    fn test_non_editable_text_ignores_enter() {
        let session = Session::from_yaml(
            r#"
texts:
  - text: "fixed"
    editable: false
steps:
  - surface: { enterEditing: 1 }
"#,
        )
        .unwrap();

        let dump = session.run(EngineConfig::default(), None).unwrap();
        assert_eq!(dump.editor, None);
        assert!(dump.commands.events.is_empty());
    }

    #[test]
    fn test_text_summary_lists_lines() {
        let dump = Session::from_text("ab\ncd").run(EngineConfig::default(), None).unwrap();
        let summary = dump.to_text();
        assert!(summary.contains("  | ab\n  | cd\n"));
        assert!(summary.contains("selection [0, 0)"));
    }
}
