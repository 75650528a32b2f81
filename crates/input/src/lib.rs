//! Terminal input module.
//!
//! Independent of any renderer: it only maps `crossterm` key events into
//! [`crate::types::GameCommand`]. How a command is interpreted (a direction may
//! slide tiles or move the delete cursor) is up to the caller.

pub mod map;

pub use quantum2048_types as types;

pub use map::{handle_key_event, should_quit};
