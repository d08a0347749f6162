//! Caret - rich-text editing engine for text shapes on a drawing surface
//!
//! This crate provides styled text buffers, selection, keyboard and pointer
//! editing, IME composition and drag-and-drop, implementing the Elm
//! Architecture pattern: hosts feed [`Msg`]s through [`update::update`] and
//! perform the returned [`Cmd`]s.

pub mod cli;
pub mod commands;
pub mod config;
pub mod config_paths;
pub mod editable;
pub mod messages;
pub mod session;
pub mod style;
pub mod surface;
pub mod tracing;
pub mod update;
pub mod util;

// Re-export commonly used types
pub use commands::{Cmd, TextEvent};
pub use config::EngineConfig;
pub use messages::Msg;
pub use surface::{Surface, TextId};
