//! Drag transfer protocol and the styled-text transfer payload.
//!
//! A drag carries two representations: `text/plain` and a JSON document
//! `{"value": .., "styles": [..]}` holding one complete declaration per
//! grapheme. The same payload is used for clipboard copy and paste.

use std::collections::BTreeMap;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::style::StyleDeclaration;
use crate::util::{grapheme_count, is_line_break, split_graphemes};

use super::edit::RichText;
use super::selection::Selection;

/// Plain text representation
pub const TEXT_PLAIN: &str = "text/plain";
/// Styled payload representation
pub const RICH_TEXT: &str = "application/x-caret-text";

/// Outcome of a drag as reported by the host
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DropEffect {
    #[default]
    None,
    Copy,
    Move,
    Link,
}

/// Operations a drag source permits
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EffectAllowed {
    Copy,
    Move,
    #[default]
    CopyMove,
    All,
}

/// Typed data carried by a drag or clipboard operation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataTransfer {
    items: BTreeMap<String, String>,
    #[serde(default)]
    pub drop_effect: DropEffect,
    #[serde(default)]
    pub effect_allowed: EffectAllowed,
}

impl DataTransfer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Transfer holding only plain text
    pub fn plain(text: impl Into<String>) -> Self {
        let mut data = Self::new();
        data.set_data(TEXT_PLAIN, text);
        data
    }

    pub fn set_data(&mut self, format: &str, data: impl Into<String>) {
        self.items.insert(format.to_owned(), data.into());
    }

    pub fn get_data(&self, format: &str) -> Option<&str> {
        self.items.get(format).map(String::as_str)
    }

    pub fn types(&self) -> impl Iterator<Item = &str> {
        self.items.keys().map(String::as_str)
    }
}

/// Styled text as carried in the rich representation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransferPayload {
    pub value: String,
    #[serde(default)]
    pub styles: Vec<StyleDeclaration>,
}

impl TransferPayload {
    /// Capture `[start, end)` of `text`, with complete styles when requested
    pub fn capture(text: &RichText, start: usize, end: usize, with_styles: bool) -> Self {
        let end = end.min(text.len());
        let start = start.min(end);
        Self {
            value: text.graphemes()[start..end].concat(),
            styles: if with_styles {
                text.selection_styles(start, end, true)
            } else {
                Vec::new()
            },
        }
    }

    /// Fill a transfer with both representations
    pub fn to_transfer(&self) -> Result<DataTransfer> {
        let mut data = DataTransfer::plain(self.value.clone());
        if !self.styles.is_empty() {
            let json = serde_json::to_string(self).context("encoding transfer payload")?;
            data.set_data(RICH_TEXT, json);
        }
        data.effect_allowed = EffectAllowed::CopyMove;
        Ok(data)
    }

    /// Lenient decoding: entries that are not objects become empty declarations
    /// and unknown properties are dropped
    pub fn decode(json: &str) -> Result<Self> {
        let doc: Value = serde_json::from_str(json).context("parsing transfer payload")?;
        let value = doc
            .get("value")
            .and_then(Value::as_str)
            .ok_or_else(|| anyhow!("transfer payload has no string `value`"))?
            .to_owned();
        let styles = match doc.get("styles") {
            Some(Value::Array(entries)) => entries.iter().map(StyleDeclaration::from_json_lossy).collect(),
            _ => Vec::new(),
        };
        Ok(Self { value, styles })
    }
}

/// Text read back out of a transfer
#[derive(Debug, Clone, PartialEq)]
pub struct ReceivedText {
    pub value: String,
    /// Per-grapheme styles when the rich representation was usable
    pub styles: Option<Vec<StyleDeclaration>>,
}

/// Read the best representation out of `data`.
///
/// The rich payload only contributes styles when its value matches the plain
/// text; a malformed payload degrades to plain text.
pub fn receive(data: &DataTransfer) -> Option<ReceivedText> {
    let rich = data.get_data(RICH_TEXT).and_then(|json| {
        TransferPayload::decode(json)
            .map_err(|err| tracing::warn!("Ignoring malformed styled payload: {err:#}"))
            .ok()
    });
    let plain = data.get_data(TEXT_PLAIN);

    match (plain, rich) {
        (Some(plain), Some(rich)) if rich.value == plain => Some(ReceivedText {
            value: rich.value,
            styles: Some(rich.styles),
        }),
        (Some(plain), _) => Some(ReceivedText {
            value: plain.to_owned(),
            styles: None,
        }),
        (None, Some(rich)) => Some(ReceivedText {
            value: rich.value,
            styles: Some(rich.styles),
        }),
        (None, None) => None,
    }
    .filter(|received| !received.value.is_empty())
}

// =============================================================================
// Drag state
// =============================================================================

/// Where an instance is in the drag lifecycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DragPhase {
    #[default]
    Idle,
    /// Pointer went down inside the selection; a native drag may follow
    Armed,
    /// This instance is the source of an active drag
    Dragging,
}

/// Selection bounds captured when a drag starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DragSession {
    pub start: usize,
    pub end: usize,
}

impl DragSession {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

#[derive(Debug, Clone, Default)]
pub struct DragState {
    pub phase: DragPhase,
    pub session: Option<DragSession>,
    /// Index where a drop would land while something is dragged over this instance
    pub drop_index: Option<usize>,
}

impl DragState {
    pub fn arm(&mut self) {
        self.phase = DragPhase::Armed;
    }

    pub fn is_armed(&self) -> bool {
        self.phase == DragPhase::Armed
    }

    pub fn is_dragging(&self) -> bool {
        self.phase == DragPhase::Dragging
    }

    pub fn is_drop_target(&self) -> bool {
        self.drop_index.is_some()
    }

    pub fn begin(&mut self, selection: Selection) -> DragSession {
        let session = DragSession {
            start: selection.start,
            end: selection.end,
        };
        self.phase = DragPhase::Dragging;
        self.session = Some(session);
        session
    }

    /// A drop at `index` is refused only when it lands inside the range this
    /// instance is dragging
    pub fn can_drop(&self, index: usize) -> bool {
        match self.session {
            Some(session) => index < session.start || index > session.end,
            None => true,
        }
    }

    pub fn take_session(&mut self) -> Option<DragSession> {
        self.session.take()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Pointer at `index` is over a non-empty selection (bounds included)
pub fn pointer_over_selection(selection: Selection, index: usize) -> bool {
    !selection.is_empty() && index >= selection.start && index <= selection.end
}

/// Insertion index after the dragged range is removed from the same instance
pub fn adjust_for_source(insert_at: usize, session: DragSession) -> usize {
    if insert_at > session.start && insert_at <= session.end {
        session.start
    } else if insert_at > session.end {
        insert_at - session.len()
    } else {
        insert_at
    }
}

/// Drop one trailing line break when the destination already breaks there
pub fn trim_trailing_break<'a>(value: &'a str, destination: &[String], insert_at: usize) -> &'a str {
    let graphemes = split_graphemes(value);
    let Some(last) = graphemes.last().filter(|g| is_line_break(g)) else {
        return value;
    };
    let at_break = destination.get(insert_at).is_some_and(|g| is_line_break(g));
    if at_break || insert_at >= destination.len() {
        &value[..value.len() - last.len()]
    } else {
        value
    }
}

/// Styles to insert for a received value, aligned to its graphemes
pub fn styles_for(received: &ReceivedText, value: &str) -> Option<Vec<StyleDeclaration>> {
    let count = grapheme_count(value);
    received
        .styles
        .as_ref()
        .map(|styles| styles.iter().take(count).cloned().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{StyleProperty, StyleValue};

    #[test]
    fn test_capture_and_receive() {
        let mut text = RichText::new("hello world");
        text.set_selection_styles(&StyleDeclaration::new().with(StyleProperty::Fill, "red"), 0..5);
        let payload = TransferPayload::capture(&text, 0, 5, true);
        let data = payload.to_transfer().unwrap();

        assert_eq!(data.get_data(TEXT_PLAIN), Some("hello"));
        assert_eq!(data.effect_allowed, EffectAllowed::CopyMove);

        let received = receive(&data).unwrap();
        let styles = received.styles.unwrap();
        assert_eq!(styles.len(), 5);
        assert_eq!(styles[0].get(StyleProperty::Fill), Some(&StyleValue::from("red")));
        // Complete declarations carry every property
        assert_eq!(styles[0].len(), StyleProperty::ALL.len());
    }

    #[test]
    fn test_receive_malformed_payload_falls_back_to_plain() {
        let mut data = DataTransfer::plain("abc");
        data.set_data(RICH_TEXT, "{not json");
        let received = receive(&data).unwrap();
        assert_eq!(received.value, "abc");
        assert!(received.styles.is_none());
    }

    #[test]
    fn test_receive_ignores_mismatched_rich_value() {
        let mut data = DataTransfer::plain("abc");
        data.set_data(RICH_TEXT, r#"{"value":"xyz","styles":[]}"#);
        assert!(receive(&data).unwrap().styles.is_none());
    }

    #[test]
    fn test_decode_tolerates_bad_entries() {
        let payload = TransferPayload::decode(r#"{"value":"ab","styles":[{"fill":"red","bogus":1},42]}"#).unwrap();
        assert_eq!(payload.styles.len(), 2);
        assert_eq!(payload.styles[0].len(), 1);
        assert!(payload.styles[1].is_empty());
        assert!(TransferPayload::decode(r#"{"styles":[]}"#).is_err());
    }

    #[test]
    fn test_pointer_over_selection() {
        let sel = Selection::new(2, 5);
        assert!(pointer_over_selection(sel, 2));
        assert!(pointer_over_selection(sel, 5));
        assert!(!pointer_over_selection(sel, 6));
        assert!(!pointer_over_selection(Selection::collapsed(3), 3));
    }

    #[test]
    fn test_can_drop_outside_own_range() {
        let mut drag = DragState::default();
        assert!(drag.can_drop(3));
        drag.begin(Selection::new(2, 5));
        assert!(!drag.can_drop(2));
        assert!(!drag.can_drop(5));
        assert!(drag.can_drop(1));
        assert!(drag.can_drop(6));
    }

    #[test]
    fn test_adjust_for_source() {
        let session = DragSession { start: 2, end: 5 };
        assert_eq!(adjust_for_source(1, session), 1);
        assert_eq!(adjust_for_source(2, session), 2);
        assert_eq!(adjust_for_source(4, session), 2);
        assert_eq!(adjust_for_source(9, session), 6);
    }

    #[test]
    fn test_trim_trailing_break() {
        let dest = split_graphemes("ab\ncd");
        assert_eq!(trim_trailing_break("x\n", &dest, 2), "x");
        assert_eq!(trim_trailing_break("x\n", &dest, 5), "x");
        assert_eq!(trim_trailing_break("x\n", &dest, 1), "x\n");
        assert_eq!(trim_trailing_break("x\n\n", &dest, 5), "x\n");
        assert_eq!(trim_trailing_break("x", &dest, 5), "x");
    }
}
