//! Terminal "game renderer" module.
//!
//! A small, game-oriented rendering layer: a [`GameView`] paints a
//! `SessionSnapshot` into a [`FrameBuffer`], and a [`Screen`] drives that
//! from a live session, sending `crossterm` output only for what changed.
//! No widget or layout library is involved, which keeps precise control over
//! the aspect ratio (two columns per board cell).

pub mod fb;
pub mod game_view;
pub mod screen;

pub use tetris_quest_core as core;
pub use tetris_quest_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{AnchorY, GameView, Viewport};
pub use screen::{paint_all, paint_changes, Screen};
