//! Sparse per-line, per-character style overlay.
//!
//! Lines and characters are addressed in buffer coordinates: a line is a run of
//! graphemes between line breaks, a char index counts graphemes within it.
//! Storage is an ordered arena of small per-line maps. Empty entries are removed
//! by [`StyleMap::prune`], which every structural edit runs before returning.

use std::collections::BTreeMap;
use std::ops::Range;

use serde::{Deserialize, Serialize};

use super::declaration::{StyleChain, StyleDeclaration, StyleProperty, StyleValue};

/// Styles of one buffer line.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineStyles {
    /// Applies to every character of the line that does not override it
    #[serde(default, skip_serializing_if = "StyleDeclaration::is_empty")]
    pub default: StyleDeclaration,
    #[serde(default)]
    pub chars: BTreeMap<usize, StyleDeclaration>,
}

impl LineStyles {
    pub fn is_empty(&self) -> bool {
        self.default.is_empty() && self.chars.values().all(StyleDeclaration::is_empty)
    }
}

/// line index → (char index → declaration)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StyleMap {
    lines: BTreeMap<usize, LineStyles>,
}

impl StyleMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Style attached to a single character, if any
    pub fn get(&self, line: usize, ch: usize) -> Option<&StyleDeclaration> {
        self.lines.get(&line)?.chars.get(&ch)
    }

    pub fn line(&self, line: usize) -> Option<&LineStyles> {
        self.lines.get(&line)
    }

    /// Line default declaration, if one is set
    pub fn line_default(&self, line: usize) -> Option<&StyleDeclaration> {
        self.lines
            .get(&line)
            .map(|l| &l.default)
            .filter(|d| !d.is_empty())
    }

    /// Lookup chain for one character: char style, line default, instance attributes
    pub fn chain<'a>(
        &'a self,
        line: usize,
        ch: usize,
        defaults: &'a StyleDeclaration,
    ) -> StyleChain<'a> {
        StyleChain::new(self.get(line, ch), self.line_default(line), Some(defaults))
    }

    /// Every recognized property resolved through the lookup chain
    pub fn get_complete(
        &self,
        line: usize,
        ch: usize,
        defaults: &StyleDeclaration,
    ) -> StyleDeclaration {
        self.chain(line, ch, defaults).complete()
    }

    /// Merge `partial` into the style of one character
    pub fn set(&mut self, line: usize, ch: usize, partial: &StyleDeclaration) {
        if partial.is_empty() {
            return;
        }
        self.lines
            .entry(line)
            .or_default()
            .chars
            .entry(ch)
            .or_default()
            .merge(partial);
    }

    /// Replace the style of one character outright
    pub fn replace(&mut self, line: usize, ch: usize, style: StyleDeclaration) {
        if style.is_empty() {
            self.remove_char(line, ch);
            return;
        }
        self.lines.entry(line).or_default().chars.insert(ch, style);
    }

    pub fn remove_char(&mut self, line: usize, ch: usize) -> Option<StyleDeclaration> {
        self.lines.get_mut(&line)?.chars.remove(&ch)
    }

    /// Merge `partial` into a line's default
    pub fn set_line_default(&mut self, line: usize, partial: &StyleDeclaration) {
        if partial.is_empty() {
            return;
        }
        self.lines.entry(line).or_default().default.merge(partial);
    }

    /// True if any non-empty style exists, globally or on `line`
    pub fn has(&self, line: Option<usize>) -> bool {
        match line {
            Some(line) => self.lines.get(&line).is_some_and(|l| !l.is_empty()),
            None => self.lines.values().any(|l| !l.is_empty()),
        }
    }

    pub fn is_empty(&self) -> bool {
        !self.has(None)
    }

    /// Indices of lines that carry any entry
    pub fn line_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.lines.keys().copied()
    }

    /// Strip one property from every character and line default
    pub fn remove_property(&mut self, prop: StyleProperty) {
        for line in self.lines.values_mut() {
            line.default.remove(prop);
            for style in line.chars.values_mut() {
                style.remove(prop);
            }
        }
        self.prune();
    }

    /// Coalesce one property against the instance attributes.
    ///
    /// Values equal to the instance default are dropped. If every one of the
    /// `grapheme_count` characters carries the same value, that value becomes
    /// the instance default and the property is stripped everywhere. Returns
    /// true when the value was promoted.
    pub fn clean_property(
        &mut self,
        prop: StyleProperty,
        defaults: &mut StyleDeclaration,
        grapheme_count: usize,
    ) -> bool {
        let mut shared: Option<StyleValue> = None;
        let mut all_match = true;
        let mut styled = 0;

        for line in self.lines.values() {
            for style in line.chars.values() {
                styled += 1;
                match (style.get(prop), &shared) {
                    (None, _) => all_match = false,
                    (Some(v), None) => shared = Some(v.clone()),
                    (Some(v), Some(s)) if v != s => all_match = false,
                    _ => {}
                }
            }
        }

        let instance_value = defaults.get(prop).cloned();
        for line in self.lines.values_mut() {
            for style in line.chars.values_mut() {
                if style.get(prop).is_some() && style.get(prop) == instance_value.as_ref() {
                    style.remove(prop);
                }
            }
        }

        let promoted = match shared {
            Some(value) if all_match && styled == grapheme_count && grapheme_count > 0 => {
                defaults.set(prop, value);
                self.remove_property(prop);
                true
            }
            _ => false,
        };
        self.prune();
        promoted
    }

    /// Remove empty character and line entries
    pub fn prune(&mut self) {
        self.lines.retain(|_, line| {
            line.chars.retain(|_, style| !style.is_empty());
            !line.is_empty()
        });
    }

    /// Check that every entry addresses an existing character.
    ///
    /// `line_lengths` holds the grapheme count of each buffer line, excluding
    /// the break. Empty entries count as inconsistent.
    pub fn is_consistent_with(&self, line_lengths: &[usize]) -> bool {
        self.lines.iter().all(|(line, styles)| {
            let Some(&len) = line_lengths.get(*line) else {
                return false;
            };
            !styles.is_empty()
                && styles
                    .chars
                    .iter()
                    .all(|(ch, style)| *ch < len && !style.is_empty())
        })
    }

    // =========================================================================
    // Structural helpers used by the edit engine
    // =========================================================================

    /// Move every line after `line` by `delta` lines.
    ///
    /// Callers shifting upwards must clear the lines that get overwritten first.
    pub(crate) fn shift_lines_after(&mut self, line: usize, delta: isize) {
        if delta == 0 {
            return;
        }
        let moved = self.lines.split_off(&(line + 1));
        for (idx, styles) in moved {
            let target = idx.saturating_add_signed(delta);
            self.lines.insert(target, styles);
        }
    }

    /// Move every char at or after `from` on `line` by `delta` positions
    pub(crate) fn shift_chars(&mut self, line: usize, from: usize, delta: isize) {
        if delta == 0 {
            return;
        }
        let Some(styles) = self.lines.get_mut(&line) else {
            return;
        };
        let moved = styles.chars.split_off(&from);
        for (idx, style) in moved {
            styles.chars.insert(idx.saturating_add_signed(delta), style);
        }
    }

    /// Detach every char style at or after `from` on `line`
    pub(crate) fn take_chars_from(
        &mut self,
        line: usize,
        from: usize,
    ) -> BTreeMap<usize, StyleDeclaration> {
        self.lines
            .get_mut(&line)
            .map(|styles| styles.chars.split_off(&from))
            .unwrap_or_default()
    }

    /// Delete char styles in `range` on `line`
    pub(crate) fn remove_chars(&mut self, line: usize, range: Range<usize>) {
        if let Some(styles) = self.lines.get_mut(&line) {
            styles.chars.retain(|idx, _| !range.contains(idx));
        }
    }

    pub(crate) fn remove_line(&mut self, line: usize) -> Option<LineStyles> {
        self.lines.remove(&line)
    }

    pub(crate) fn line_default_cloned(&self, line: usize) -> StyleDeclaration {
        self.lines
            .get(&line)
            .map(|l| l.default.clone())
            .unwrap_or_default()
    }
}
