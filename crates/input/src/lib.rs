//! Terminal input module (engine-facing).
//!
//! Maps `crossterm` key events into [`crate::types::Command`]s. The mapping
//! depends on the phase on screen: arrow keys steer the piece while it is
//! live and move the option cursor while a menu is open. Whether a command
//! actually does anything is decided by the session.

pub mod map;

pub use tetris_quest_types as types;

pub use map::{handle_key_event, should_quit};
