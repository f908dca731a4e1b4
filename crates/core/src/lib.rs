//! Core game logic module - pure, deterministic, and testable
//!
//! This crate contains every rule of the falling-block adventure: the piece
//! engine, the hero's progression, the enemy roster, the auto-battle
//! resolver and the phase controller that ties them together. It has **no
//! dependencies** on terminal, input or file I/O, so a run can be driven
//! headless from tests with a scripted random source.
//!
//! # Module Structure
//!
//! - [`board`]: 8x22 grid with a hidden spawn buffer, row removal and garbage injection
//! - [`pieces`]: Shape tables, simplified rotation with an eight-step kick list
//! - [`playfield`]: Active piece, lock delay, line-clear animation and special placements
//! - [`hero`]: Level, experience, permanent stats and the walk towards the next enemy
//! - [`enemy`]: Enemy roster, zone scaling and encounter selection
//! - [`battle`]: One auto-battle round, spending the attacks earned in puzzle combat
//! - [`events`]: Road events, choice events and level-up upgrades
//! - [`session`]: The phase controller; the only owner of run state
//! - [`snapshot`]: Pull-only render data
//! - [`ranking`]: Top-N runs of the process
//! - [`balance`]: Every tunable number, loadable from JSON
//!
//! # Example
//!
//! ```
//! use tetris_quest_core::{Balance, Session};
//! use tetris_quest_types::{Command, Phase};
//!
//! let mut session = Session::with_seed(Balance::default(), 12345);
//! assert_eq!(session.phase(), Phase::Title);
//!
//! session.command(Command::Confirm);
//! assert_eq!(session.phase(), Phase::Exploration);
//!
//! session.command(Command::MoveRight);
//! session.command(Command::HardDrop);
//! session.update(16);
//!
//! let snapshot = session.snapshot();
//! assert!(snapshot.board.iter().flatten().any(|&c| c != 0));
//! ```
//!
//! # Timing
//!
//! Nothing reads a clock. [`Session::update`](session::Session::update) takes
//! the elapsed milliseconds since the previous call and advances every timer
//! of the current phase by that amount.

pub mod balance;
pub mod battle;
pub mod board;
pub mod enemy;
pub mod events;
pub mod hero;
pub mod pieces;
pub mod playfield;
pub mod ranking;
pub mod rng;
pub mod scoring;
pub mod session;
pub mod snapshot;

pub use tetris_quest_types as types;

// Re-export commonly used types for convenience
pub use balance::{Balance, BalanceError};
pub use battle::{BattleRound, BattleState, BattleTick};
pub use board::Board;
pub use enemy::{Enemy, EnemyKind};
pub use events::{ChoiceEvent, RoadEvent, Upgrade};
pub use hero::{Hero, VictoryReport};
pub use pieces::{get_shape, try_rotate};
pub use playfield::{ActivePiece, Playfield, PuzzleReport, PuzzleRules};
pub use ranking::{RankEntry, Ranking};
pub use rng::{PieceQueue, RandomSource, SequenceRng, SimpleRng};
pub use session::Session;
pub use snapshot::{ActiveSnapshot, SessionSnapshot};
