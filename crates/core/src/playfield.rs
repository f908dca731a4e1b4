//! Playfield module - the falling-piece engine
//!
//! Owns the board and the single active piece, and runs three pipelines on it:
//!
//! - **Piece engine**: spawn, move, rotate with kicks, hold, hard drop, and the
//!   lock-delay state machine (`Falling -> Grounded -> Locked`).
//! - **Line clear**: after a lock, full rows are flagged and the board freezes
//!   for a fixed animation window; on expiry the rows are removed, score is
//!   awarded, and the next piece spawns.
//! - **Garbage injection**: rows pushed up from the bottom, one hole each.
//!
//! Outcomes are queued as [`PuzzleReport`]s for the phase controller to drain.
//! Game over is only ever decided at lock time.

use log::debug;

use crate::balance::Balance;
use crate::board::{Board, RowSet};
use crate::pieces::{get_shape, spawn_width, t_pivot, try_rotate, PieceShape};
use crate::rng::{PieceQueue, RandomSource};
use crate::scoring::{line_clear_score, special_bonus};
use crate::types::*;

/// Active falling piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActivePiece {
    pub kind: PieceKind,
    pub rotation: u8,
    pub x: i8,
    pub y: i8,
}

impl ActivePiece {
    /// A piece in its spawn orientation, centered, two rows above the visible field.
    pub fn spawn(kind: PieceKind) -> Self {
        Self {
            kind,
            rotation: 0,
            x: (BOARD_WIDTH as i8 - spawn_width(kind)) / 2,
            y: HIDDEN_ROWS as i8 - 2,
        }
    }

    pub fn shape(&self) -> PieceShape {
        get_shape(self.kind, self.rotation)
    }

    /// Absolute board cells.
    pub fn cells(&self) -> [(i8, i8); 4] {
        self.shape().map(|(dx, dy)| (self.x + dx, self.y + dy))
    }

    /// True when the piece shifted by (dx, dy) collides with nothing.
    pub fn fits(&self, board: &Board, dx: i8, dy: i8) -> bool {
        self.shape()
            .iter()
            .all(|&(mx, my)| !board.is_blocked(self.x + mx + dx, self.y + my + dy))
    }
}

/// Lock-delay bookkeeping for the active piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LockState {
    /// Set once the piece has been observed grounded during a tick.
    pub active: bool,
    /// Time grounded since the last reset.
    pub timer_ms: u32,
    /// Resets spent by moves and rotations.
    pub resets: u8,
    /// Total grounded time for this piece; never reset by moves.
    pub grounded_ms: u32,
}

/// Rows waiting out the clear animation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClearState {
    pub rows: RowSet,
    pub timer_ms: u32,
    /// The lock that produced these rows was a special placement.
    pub special: bool,
}

/// Timing and score tables the playfield needs from the balance table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PuzzleRules {
    pub lock_delay_ms: u32,
    pub lock_max_resets: u8,
    pub lock_total_max_ms: u32,
    pub line_clear_ms: u32,
    pub score_per_line: [u32; 5],
    pub special_bonus: [u32; 3],
}

impl From<&Balance> for PuzzleRules {
    fn from(b: &Balance) -> Self {
        Self {
            lock_delay_ms: b.lock_delay_ms,
            lock_max_resets: b.lock_max_resets,
            lock_total_max_ms: b.lock_total_max_ms,
            line_clear_ms: b.line_clear_ms,
            score_per_line: b.score_per_line,
            special_bonus: b.special_bonus,
        }
    }
}

impl Default for PuzzleRules {
    fn default() -> Self {
        Self::from(&Balance::default())
    }
}

/// Something the phase controller should react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PuzzleReport {
    /// A piece committed. `full_rows` rows are now animating.
    Locked { full_rows: u8, special: bool },
    /// The clear animation finished.
    Cleared {
        lines: u8,
        score: u32,
        special_bonus: u32,
    },
    GarbageAdded { rows: u8 },
    /// A lock left cells in the hidden buffer.
    ToppedOut,
}

#[derive(Debug, Clone)]
pub struct Playfield {
    board: Board,
    active: Option<ActivePiece>,
    hold: Option<PieceKind>,
    can_hold: bool,
    queue: PieceQueue,
    rules: PuzzleRules,
    lock: LockState,
    clear: Option<ClearState>,
    drop_timer_ms: u32,
    last_move_was_rotation: bool,
    score: u32,
    lines: u32,
    topped_out: bool,
    reports: Vec<PuzzleReport>,
}

impl Playfield {
    /// Empty board with a randomly filled queue. Call [`start`](Self::start) to spawn.
    pub fn new(rules: PuzzleRules, rng: &mut dyn RandomSource) -> Self {
        Self::with_queue(rules, PieceQueue::new(rng))
    }

    pub fn with_queue(rules: PuzzleRules, queue: PieceQueue) -> Self {
        Self {
            board: Board::new(),
            active: None,
            hold: None,
            can_hold: true,
            queue,
            rules,
            lock: LockState::default(),
            clear: None,
            drop_timer_ms: 0,
            last_move_was_rotation: false,
            score: 0,
            lines: 0,
            topped_out: false,
            reports: Vec::with_capacity(8),
        }
    }

    /// Spawn the first piece.
    pub fn start(&mut self, rng: &mut dyn RandomSource) {
        if self.active.is_none() && self.clear.is_none() && !self.topped_out {
            self.spawn(rng);
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Direct board access for setting up positions.
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn active(&self) -> Option<ActivePiece> {
        self.active
    }

    pub fn hold_piece(&self) -> Option<PieceKind> {
        self.hold
    }

    pub fn can_hold(&self) -> bool {
        self.can_hold
    }

    pub fn next_queue(&self) -> &[PieceKind; NEXT_QUEUE_LEN] {
        self.queue.peek()
    }

    pub fn rules(&self) -> &PuzzleRules {
        &self.rules
    }

    pub fn lock_state(&self) -> LockState {
        self.lock
    }

    pub fn clear_state(&self) -> Option<&ClearState> {
        self.clear.as_ref()
    }

    pub fn is_clearing(&self) -> bool {
        self.clear.is_some()
    }

    pub fn topped_out(&self) -> bool {
        self.topped_out
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn last_move_was_rotation(&self) -> bool {
        self.last_move_was_rotation
    }

    /// Drain outcomes queued since the last call.
    pub fn drain_reports(&mut self) -> std::vec::Drain<'_, PuzzleReport> {
        self.reports.drain(..)
    }

    fn accepts_input(&self) -> bool {
        !self.topped_out && self.clear.is_none() && self.active.is_some()
    }

    fn spawn(&mut self, rng: &mut dyn RandomSource) {
        let kind = self.queue.draw(rng);
        self.place_new(kind);
        self.can_hold = true;
    }

    /// Put `kind` at the spawn position, lifting it one row if that collides.
    fn place_new(&mut self, kind: PieceKind) {
        let mut piece = ActivePiece::spawn(kind);
        if !piece.fits(&self.board, 0, 0) {
            piece.y -= 1;
        }
        self.active = Some(piece);
        self.lock = LockState::default();
        self.drop_timer_ms = 0;
        self.last_move_was_rotation = false;
    }

    /// A piece is grounded iff one row lower would collide.
    pub fn is_grounded(&self) -> bool {
        match self.active {
            Some(piece) => !piece.fits(&self.board, 0, 1),
            None => false,
        }
    }

    /// Lock-timer bookkeeping after a successful move or rotation.
    fn after_shift(&mut self) {
        if !self.lock.active {
            return;
        }
        if !self.is_grounded() {
            self.lock.timer_ms = 0;
            self.lock.active = false;
        } else if self.lock.resets < self.rules.lock_max_resets {
            self.lock.timer_ms = 0;
            self.lock.resets += 1;
        }
    }

    /// Translate the active piece; false (and no change) if blocked.
    pub fn try_move(&mut self, dx: i8, dy: i8) -> bool {
        if !self.accepts_input() {
            return false;
        }
        let Some(mut piece) = self.active else {
            return false;
        };
        if !piece.fits(&self.board, dx, dy) {
            return false;
        }
        piece.x += dx;
        piece.y += dy;
        self.active = Some(piece);
        self.last_move_was_rotation = false;
        self.after_shift();
        true
    }

    /// Rotate through the kick list; false (and no change) if every kick collides.
    pub fn try_rotate(&mut self, dir: RotationDir) -> bool {
        if !self.accepts_input() {
            return false;
        }
        let Some(mut piece) = self.active else {
            return false;
        };
        let board = &self.board;
        let Some((rotation, (dx, dy))) = try_rotate(
            piece.kind,
            piece.rotation,
            piece.x,
            piece.y,
            dir,
            |x, y| board.is_blocked(x, y),
        ) else {
            return false;
        };
        piece.rotation = rotation;
        piece.x += dx;
        piece.y += dy;
        self.active = Some(piece);
        self.last_move_was_rotation = true;
        self.after_shift();
        true
    }

    /// Drop to the landing row and lock immediately.
    ///
    /// The rotation flag is left as it was before the drop.
    pub fn hard_drop(&mut self, rng: &mut dyn RandomSource) -> bool {
        if !self.accepts_input() {
            return false;
        }
        let Some(mut piece) = self.active else {
            return false;
        };
        while piece.fits(&self.board, 0, 1) {
            piece.y += 1;
        }
        self.active = Some(piece);
        self.lock_piece(rng);
        true
    }

    /// Swap with the held piece (or the queue front if nothing is held).
    ///
    /// Allowed once per piece; the swapped-in piece starts at the spawn
    /// position with a fresh lock state.
    pub fn hold(&mut self, rng: &mut dyn RandomSource) -> bool {
        if !self.can_hold || !self.accepts_input() {
            return false;
        }
        let Some(piece) = self.active else {
            return false;
        };
        let next = match self.hold.replace(piece.kind) {
            Some(kind) => kind,
            None => self.queue.draw(rng),
        };
        self.place_new(next);
        self.can_hold = false;
        true
    }

    /// Route a piece command. Non-piece commands are rejected.
    pub fn apply_command(&mut self, command: Command, rng: &mut dyn RandomSource) -> bool {
        match command {
            Command::MoveLeft => self.try_move(-1, 0),
            Command::MoveRight => self.try_move(1, 0),
            Command::SoftDrop => {
                let moved = self.try_move(0, 1);
                if moved {
                    self.drop_timer_ms = 0;
                }
                moved
            }
            Command::HardDrop => self.hard_drop(rng),
            Command::RotateCw => self.try_rotate(RotationDir::Cw),
            Command::RotateCcw => self.try_rotate(RotationDir::Ccw),
            Command::Hold => self.hold(rng),
            _ => false,
        }
    }

    /// Special placement: a T whose last successful action was a rotation,
    /// with at least three of the four diagonal neighbours of its pivot solid.
    fn is_special_placement(&self, piece: &ActivePiece) -> bool {
        if !self.last_move_was_rotation {
            return false;
        }
        let Some((px, py)) = t_pivot(piece.kind, piece.rotation) else {
            return false;
        };
        let (cx, cy) = (piece.x + px, piece.y + py);
        [(-1, -1), (1, -1), (-1, 1), (1, 1)]
            .iter()
            .filter(|&&(dx, dy)| self.board.is_solid(cx + dx, cy + dy))
            .count()
            >= 3
    }

    /// Commit the active piece and start the clear pipeline.
    fn lock_piece(&mut self, rng: &mut dyn RandomSource) {
        let Some(piece) = self.active.take() else {
            return;
        };
        let special = self.is_special_placement(&piece);
        let clipped = self
            .board
            .place(&piece.cells(), CellTag::Piece(piece.kind));
        self.lock = LockState::default();

        if clipped || self.board.hidden_buffer_occupied() {
            debug!("{:?} locked into the hidden buffer", piece.kind);
            self.topped_out = true;
            self.reports.push(PuzzleReport::Locked {
                full_rows: 0,
                special,
            });
            self.reports.push(PuzzleReport::ToppedOut);
            return;
        }

        let rows = self.board.full_rows();
        debug!(
            "{:?} locked at ({}, {}) r{}, {} full rows, special={}",
            piece.kind,
            piece.x,
            piece.y,
            piece.rotation,
            rows.len(),
            special
        );
        self.reports.push(PuzzleReport::Locked {
            full_rows: rows.len() as u8,
            special,
        });

        if rows.is_empty() {
            self.spawn(rng);
        } else {
            self.clear = Some(ClearState {
                rows,
                timer_ms: 0,
                special,
            });
        }
    }

    fn finish_clear(&mut self, rng: &mut dyn RandomSource) {
        let Some(clear) = self.clear.take() else {
            return;
        };
        let lines = self.board.remove_rows(&clear.rows);
        let base = line_clear_score(&self.rules.score_per_line, lines);
        let bonus = if clear.special {
            special_bonus(&self.rules.special_bonus, lines)
        } else {
            0
        };
        self.score = self.score.saturating_add(base + bonus);
        self.lines += lines as u32;
        debug!("cleared {} rows for {} (+{} special)", lines, base, bonus);
        self.reports.push(PuzzleReport::Cleared {
            lines: lines as u8,
            score: base + bonus,
            special_bonus: bonus,
        });
        self.spawn(rng);
    }

    /// Push `rows` garbage rows in from the bottom.
    ///
    /// Refused (returns false) when `rows` is zero or a clear animation is
    /// running. The active piece is lifted by the same amount, but not above
    /// the board top, and is never destroyed here.
    pub fn add_garbage(&mut self, rows: u32, rng: &mut dyn RandomSource) -> bool {
        if rows == 0 || self.clear.is_some() {
            return false;
        }
        let rows = rows.min(BOARD_HEIGHT as u32) as u8;
        for _ in 0..rows {
            let hole = rng.next_range(BOARD_WIDTH as u32) as u8;
            self.board.push_garbage_row(hole);
        }
        if let Some(piece) = self.active.as_mut() {
            let floor = piece.y.min(0);
            piece.y = (piece.y - rows as i8).max(floor);
        }
        debug!("pushed {} garbage rows", rows);
        self.reports.push(PuzzleReport::GarbageAdded { rows });
        true
    }

    /// Advance timers by `elapsed_ms`.
    ///
    /// While a clear animates nothing else moves. Otherwise a grounded piece
    /// accrues lock time and locks when the per-attempt delay or the total
    /// ceiling is reached; an airborne piece falls one row per `drop_interval_ms`.
    pub fn tick(&mut self, elapsed_ms: u32, drop_interval_ms: u32, rng: &mut dyn RandomSource) {
        if self.topped_out {
            return;
        }

        if let Some(clear) = self.clear.as_mut() {
            clear.timer_ms = clear.timer_ms.saturating_add(elapsed_ms);
            if clear.timer_ms >= self.rules.line_clear_ms {
                self.finish_clear(rng);
            }
            return;
        }

        if self.active.is_none() {
            return;
        }

        if self.is_grounded() {
            self.lock.active = true;
            self.lock.timer_ms = self.lock.timer_ms.saturating_add(elapsed_ms);
            self.lock.grounded_ms = self.lock.grounded_ms.saturating_add(elapsed_ms);
            if self.lock.timer_ms >= self.rules.lock_delay_ms
                || self.lock.grounded_ms >= self.rules.lock_total_max_ms
            {
                self.lock_piece(rng);
            }
        } else {
            self.drop_timer_ms = self.drop_timer_ms.saturating_add(elapsed_ms);
            if self.drop_timer_ms >= drop_interval_ms {
                self.drop_timer_ms = 0;
                self.try_move(0, 1);
            }
        }
    }

    /// Row the active piece would land on.
    pub fn ghost_y(&self) -> Option<i8> {
        let piece = self.active?;
        let mut drop = 0;
        while piece.fits(&self.board, 0, drop + 1) {
            drop += 1;
        }
        Some(piece.y + drop)
    }

    /// Lock progress in permille of the per-attempt delay.
    pub fn lock_progress(&self) -> u16 {
        if !self.lock.active || self.rules.lock_delay_ms == 0 {
            return 0;
        }
        ((self.lock.timer_ms.min(self.rules.lock_delay_ms) as u64 * 1000)
            / self.rules.lock_delay_ms as u64) as u16
    }
}
