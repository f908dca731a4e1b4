//! Tetris Quest (workspace facade crate).
//!
//! Re-exports the workspace crates under one name so the binary, the
//! integration tests and the benchmarks share a single import path:
//! `tetris_quest::{core, input, term, types}`.

pub use tetris_quest_core as core;
pub use tetris_quest_input as input;
pub use tetris_quest_term as term;
pub use tetris_quest_types as types;
