//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are pure data structures with no external dependencies, so the
//! rule engine, the terminal renderer and the input mapper can share them.
//!
//! # Board Dimensions
//!
//! The playfield is narrow and tall, with a hidden spawn buffer on top:
//!
//! - **Width**: 8 columns (indexed 0-7)
//! - **Height**: 22 rows (indexed 0-21), of which rows 0-3 are the hidden buffer
//! - **Visible rows**: 18 (indexed 4-21)
//!
//! Any occupied cell left in the hidden buffer after a lock ends the run.
//!
//! # Timing
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Fixed timestep interval (~60 FPS) |
//! | `NEXT_QUEUE_LEN` | 3 | Pieces visible in the look-ahead queue |
//!
//! Every other tunable number lives in the core crate's `Balance` table.
//!
//! # Examples
//!
//! ```
//! use tetris_quest_types::{Command, PieceKind, RotationDir, BOARD_HEIGHT, BOARD_WIDTH};
//!
//! assert_eq!(PieceKind::T.rotation_states(), 4);
//! assert_eq!(PieceKind::O.rotation_states(), 1);
//!
//! // Rotation indices wrap within the piece's own state count
//! assert_eq!(RotationDir::Ccw.apply(0, 4), 3);
//! assert_eq!(RotationDir::Cw.apply(1, 2), 0);
//!
//! assert_eq!(Command::HardDrop.as_str(), "hardDrop");
//! assert_eq!(BOARD_WIDTH, 8);
//! assert_eq!(BOARD_HEIGHT, 22);
//! ```

/// Board width in cells (8 columns)
pub const BOARD_WIDTH: u8 = 8;

/// Rows shown to the player (18)
pub const VISIBLE_ROWS: u8 = 18;

/// Rows of spawn buffer above the visible playfield (4)
pub const HIDDEN_ROWS: u8 = 4;

/// Total board height including the hidden buffer (22)
pub const BOARD_HEIGHT: u8 = VISIBLE_ROWS + HIDDEN_ROWS;

/// Fixed timestep interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Number of upcoming pieces kept in the look-ahead queue
pub const NEXT_QUEUE_LEN: usize = 3;

/// The seven piece kinds
///
/// Rotation state counts differ per kind: I, S and Z have two states,
/// O has one, and T, J, L have four.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl PieceKind {
    /// All kinds, in table order.
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Upper-case letter shown in the hold and next panels.
    pub fn letter(&self) -> &'static str {
        match self {
            PieceKind::I => "I",
            PieceKind::O => "O",
            PieceKind::T => "T",
            PieceKind::S => "S",
            PieceKind::Z => "Z",
            PieceKind::J => "J",
            PieceKind::L => "L",
        }
    }

    /// Number of distinct rotation states for this kind.
    pub fn rotation_states(&self) -> u8 {
        match self {
            PieceKind::O => 1,
            PieceKind::I | PieceKind::S | PieceKind::Z => 2,
            PieceKind::T | PieceKind::J | PieceKind::L => 4,
        }
    }
}

/// Direction of a rotation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RotationDir {
    Cw,
    Ccw,
}

impl RotationDir {
    /// Apply this direction to a rotation index, wrapping within `states`.
    ///
    /// # Examples
    ///
    /// ```
    /// use tetris_quest_types::RotationDir;
    ///
    /// assert_eq!(RotationDir::Cw.apply(3, 4), 0);
    /// assert_eq!(RotationDir::Ccw.apply(0, 2), 1);
    /// assert_eq!(RotationDir::Cw.apply(0, 1), 0);
    /// ```
    pub fn apply(self, rotation: u8, states: u8) -> u8 {
        let states = states.max(1);
        let rotation = rotation % states;
        match self {
            RotationDir::Cw => (rotation + 1) % states,
            RotationDir::Ccw => (rotation + states - 1) % states,
        }
    }
}

/// What occupies a board cell.
///
/// Locked pieces keep their kind so the renderer can color them; injected
/// rows are tagged separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellTag {
    Piece(PieceKind),
    Garbage,
}

/// A cell on the game board
///
/// - `None`: Empty cell
/// - `Some(CellTag)`: Occupied cell with its color/metadata tag
pub type Cell = Option<CellTag>;

/// Top-level phase of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Title,
    Exploration,
    NarrativeEvent,
    ChoiceEvent,
    LevelUpChoice,
    Encounter,
    PuzzleCombat,
    AutoBattle,
    BattleResult,
    Paused,
    GameOver,
    Ranking,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Title => "title",
            Phase::Exploration => "exploration",
            Phase::NarrativeEvent => "narrativeEvent",
            Phase::ChoiceEvent => "choiceEvent",
            Phase::LevelUpChoice => "levelUpChoice",
            Phase::Encounter => "encounter",
            Phase::PuzzleCombat => "puzzleCombat",
            Phase::AutoBattle => "autoBattle",
            Phase::BattleResult => "battleResult",
            Phase::Paused => "paused",
            Phase::GameOver => "gameOver",
            Phase::Ranking => "ranking",
        }
    }

    /// Phases in which the falling piece is live and accepts input.
    pub fn runs_puzzle(&self) -> bool {
        matches!(self, Phase::Exploration | Phase::PuzzleCombat)
    }
}

/// Discrete commands produced by the input layer.
///
/// Piece commands are routed to the playfield; the rest drive the phase
/// controller. A command that the current phase does not accept is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Move piece one cell left
    MoveLeft,
    /// Move piece one cell right
    MoveRight,
    /// Move piece one cell down
    SoftDrop,
    /// Drop piece to its landing row and lock it
    HardDrop,
    /// Rotate clockwise
    RotateCw,
    /// Rotate counter-clockwise
    RotateCcw,
    /// Swap with the held piece (once per piece)
    Hold,
    /// Toggle pause
    Pause,
    /// Confirm the highlighted option / advance a screen
    Confirm,
    /// Move the option cursor up
    CursorUp,
    /// Move the option cursor down
    CursorDown,
    /// Pick an option directly by index
    Choose(u8),
    /// Open the ranking board from the title screen
    ShowRanking,
}

impl Command {
    /// Name used in log lines.
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::MoveLeft => "moveLeft",
            Command::MoveRight => "moveRight",
            Command::SoftDrop => "softDrop",
            Command::HardDrop => "hardDrop",
            Command::RotateCw => "rotateCw",
            Command::RotateCcw => "rotateCcw",
            Command::Hold => "hold",
            Command::Pause => "pause",
            Command::Confirm => "confirm",
            Command::CursorUp => "cursorUp",
            Command::CursorDown => "cursorDown",
            Command::Choose(_) => "choose",
            Command::ShowRanking => "showRanking",
        }
    }
}

/// Notifications emitted by the core for one-way sinks (audio, logging,
/// persistence). Sinks never feed anything back into the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// A piece committed into the board. `special` marks a qualifying
    /// rotation-into-corner placement.
    PieceLocked { full_rows: u8, special: bool },
    /// The clear animation finished and rows were removed.
    LinesCleared { lines: u8, score: u32, special_bonus: u32 },
    /// Adversarial rows were pushed up from the bottom.
    GarbageAdded { rows: u8 },
    PhaseChanged { from: Phase, to: Phase },
    EnemySpawned { boss: bool, zone: u32 },
    /// The hero hit the enemy.
    HeroStrike { damage: u32, critical: bool },
    SpecialCharging,
    SpecialStrike { damage: u32 },
    /// The enemy restored health from the damage it just received.
    EnemyHealed { amount: u32 },
    /// The enemy hit the hero (zero means fully blocked).
    EnemyStrike { damage: u32, magic: bool },
    /// Extra rows were queued for the next puzzle-combat phase.
    BreathQueued { rows: u8 },
    AttacksExhausted { garbage: u8 },
    Victory { boss: bool, fast_kill: bool },
    LevelUp { level: u32 },
    GameOver { score: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn board_dimensions_include_hidden_buffer() {
        assert_eq!(BOARD_HEIGHT, 22);
        assert_eq!(BOARD_HEIGHT - HIDDEN_ROWS, VISIBLE_ROWS);
    }

    #[test]
    fn rotation_wraps_per_piece_state_count() {
        for kind in PieceKind::ALL {
            let states = kind.rotation_states();
            let mut r = 0;
            for _ in 0..states {
                r = RotationDir::Cw.apply(r, states);
            }
            assert_eq!(r, 0, "{:?} should cycle back after {} turns", kind, states);
            assert_eq!(RotationDir::Ccw.apply(RotationDir::Cw.apply(0, states), states), 0);
        }
    }

    #[test]
    fn piece_letters_are_distinct() {
        for (i, a) in PieceKind::ALL.iter().enumerate() {
            for b in &PieceKind::ALL[i + 1..] {
                assert_ne!(a.letter(), b.letter());
            }
        }
    }

    #[test]
    fn only_puzzle_phases_run_the_piece() {
        assert!(Phase::Exploration.runs_puzzle());
        assert!(Phase::PuzzleCombat.runs_puzzle());
        assert!(!Phase::AutoBattle.runs_puzzle());
        assert!(!Phase::Paused.runs_puzzle());
    }
}
