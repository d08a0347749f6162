//! Style declarations: partial records of font and paint attributes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A font/paint attribute that can be attached to a single character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StyleProperty {
    FontFamily,
    FontSize,
    FontWeight,
    FontStyle,
    Fill,
    Stroke,
    StrokeWidth,
    Underline,
    Overline,
    Linethrough,
    TextBackgroundColor,
}

impl StyleProperty {
    /// Every recognized property, in resolution order
    pub const ALL: [StyleProperty; 11] = [
        StyleProperty::FontFamily,
        StyleProperty::FontSize,
        StyleProperty::FontWeight,
        StyleProperty::FontStyle,
        StyleProperty::Fill,
        StyleProperty::Stroke,
        StyleProperty::StrokeWidth,
        StyleProperty::Underline,
        StyleProperty::Overline,
        StyleProperty::Linethrough,
        StyleProperty::TextBackgroundColor,
    ];

    /// Wire name (camelCase, as used in transfer payloads)
    pub fn name(self) -> &'static str {
        match self {
            StyleProperty::FontFamily => "fontFamily",
            StyleProperty::FontSize => "fontSize",
            StyleProperty::FontWeight => "fontWeight",
            StyleProperty::FontStyle => "fontStyle",
            StyleProperty::Fill => "fill",
            StyleProperty::Stroke => "stroke",
            StyleProperty::StrokeWidth => "strokeWidth",
            StyleProperty::Underline => "underline",
            StyleProperty::Overline => "overline",
            StyleProperty::Linethrough => "linethrough",
            StyleProperty::TextBackgroundColor => "textBackgroundColor",
        }
    }

    /// Look a property up by its wire name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }
}

/// Value of a single style property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StyleValue {
    Flag(bool),
    Number(f64),
    Text(String),
}

impl StyleValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            StyleValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            StyleValue::Text(s) => Some(s),
            _ => None,
        }
    }

    fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Bool(b) => Some(StyleValue::Flag(*b)),
            serde_json::Value::Number(n) => n.as_f64().map(StyleValue::Number),
            serde_json::Value::String(s) => Some(StyleValue::Text(s.clone())),
            _ => None,
        }
    }
}

impl From<&str> for StyleValue {
    fn from(value: &str) -> Self {
        StyleValue::Text(value.to_string())
    }
}

impl From<f64> for StyleValue {
    fn from(value: f64) -> Self {
        StyleValue::Number(value)
    }
}

impl From<bool> for StyleValue {
    fn from(value: bool) -> Self {
        StyleValue::Flag(value)
    }
}

/// A partial record of style properties. Absent properties inherit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StyleDeclaration {
    props: BTreeMap<StyleProperty, StyleValue>,
}

impl StyleDeclaration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter
    pub fn with(mut self, prop: StyleProperty, value: impl Into<StyleValue>) -> Self {
        self.props.insert(prop, value.into());
        self
    }

    /// Attributes a text instance starts with when nothing else is configured
    pub fn instance_defaults() -> Self {
        Self::new()
            .with(StyleProperty::FontFamily, "Times New Roman")
            .with(StyleProperty::FontSize, 40.0)
            .with(StyleProperty::FontWeight, "normal")
            .with(StyleProperty::FontStyle, "normal")
            .with(StyleProperty::Fill, "rgb(0,0,0)")
            .with(StyleProperty::Stroke, "transparent")
            .with(StyleProperty::StrokeWidth, 1.0)
            .with(StyleProperty::Underline, false)
            .with(StyleProperty::Overline, false)
            .with(StyleProperty::Linethrough, false)
            .with(StyleProperty::TextBackgroundColor, "transparent")
    }

    pub fn is_empty(&self) -> bool {
        self.props.is_empty()
    }

    pub fn len(&self) -> usize {
        self.props.len()
    }

    pub fn get(&self, prop: StyleProperty) -> Option<&StyleValue> {
        self.props.get(&prop)
    }

    pub fn contains(&self, prop: StyleProperty) -> bool {
        self.props.contains_key(&prop)
    }

    pub fn set(&mut self, prop: StyleProperty, value: impl Into<StyleValue>) {
        self.props.insert(prop, value.into());
    }

    pub fn remove(&mut self, prop: StyleProperty) -> Option<StyleValue> {
        self.props.remove(&prop)
    }

    /// Copy every property of `other` over this declaration
    pub fn merge(&mut self, other: &StyleDeclaration) {
        for (prop, value) in &other.props {
            self.props.insert(*prop, value.clone());
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (StyleProperty, &StyleValue)> {
        self.props.iter().map(|(p, v)| (*p, v))
    }

    /// Keep only the properties that differ from `base`
    pub fn difference(&self, base: &StyleDeclaration) -> StyleDeclaration {
        let props = self
            .props
            .iter()
            .filter(|(p, v)| base.get(**p) != Some(*v))
            .map(|(p, v)| (*p, v.clone()))
            .collect();
        Self { props }
    }

    /// Best-effort conversion from an untrusted JSON object.
    ///
    /// Unknown keys and values of unsupported types are skipped, so a payload
    /// written by a newer or foreign producer still yields its usable part.
    pub fn from_json_lossy(value: &serde_json::Value) -> StyleDeclaration {
        let Some(object) = value.as_object() else {
            return StyleDeclaration::new();
        };
        let props = object
            .iter()
            .filter_map(|(key, value)| {
                let prop = StyleProperty::from_name(key)?;
                Some((prop, StyleValue::from_json(value)?))
            })
            .collect();
        Self { props }
    }
}

/// Ordered list of places a property can come from.
///
/// Resolution walks the sources front to back and returns the first hit:
/// character style, then the line default, then the instance attributes.
#[derive(Debug, Clone, Copy, Default)]
pub struct StyleChain<'a> {
    sources: [Option<&'a StyleDeclaration>; 3],
}

impl<'a> StyleChain<'a> {
    pub fn new(
        char_style: Option<&'a StyleDeclaration>,
        line_default: Option<&'a StyleDeclaration>,
        instance: Option<&'a StyleDeclaration>,
    ) -> Self {
        Self {
            sources: [char_style, line_default, instance],
        }
    }

    pub fn resolve(&self, prop: StyleProperty) -> Option<&'a StyleValue> {
        self.sources.iter().flatten().find_map(|s| s.get(prop))
    }

    /// Resolve every recognized property into a fresh declaration
    pub fn complete(&self) -> StyleDeclaration {
        let mut out = StyleDeclaration::new();
        for prop in StyleProperty::ALL {
            if let Some(value) = self.resolve(prop) {
                out.set(prop, value.clone());
            }
        }
        out
    }
}
