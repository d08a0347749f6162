//! Per-character text styling.
//!
//! A [`StyleDeclaration`] is a partial record of font/paint attributes.
//! [`StyleMap`] attaches declarations to (line, char) positions of a buffer and
//! resolves missing properties through a [`StyleChain`]:
//! char style, then line default, then the instance's own attributes.

mod declaration;
mod map;

pub use declaration::{StyleChain, StyleDeclaration, StyleProperty, StyleValue};
pub use map::{LineStyles, StyleMap};
