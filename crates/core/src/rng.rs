//! RNG module - injectable randomness and the look-ahead piece queue
//!
//! Every random decision in a session (piece choice, garbage holes, enemy
//! choice, critical rolls, trait checks, event draws) goes through one
//! [`RandomSource`]. [`SimpleRng`] is the default; tests can substitute a
//! [`SequenceRng`] to script exact outcomes.

use crate::types::{PieceKind, NEXT_QUEUE_LEN};

/// A uniform random source.
pub trait RandomSource {
    /// Next raw 32-bit value.
    fn next_u32(&mut self) -> u32;

    /// Random value in range [0, max); 0 when `max` is 0.
    fn next_range(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        self.next_u32() % max
    }

    /// Random value in range [lo, hi]; `lo` when the range is empty.
    fn range_inclusive(&mut self, lo: u32, hi: u32) -> u32 {
        if hi <= lo {
            return lo;
        }
        lo + self.next_range(hi - lo + 1)
    }

    /// True with probability `pct` percent.
    fn chance_percent(&mut self, pct: u32) -> bool {
        self.next_range(100) < pct
    }
}

/// Shuffle a slice using Fisher-Yates
pub fn shuffle<T>(rng: &mut dyn RandomSource, slice: &mut [T]) {
    for i in (1..slice.len()).rev() {
        let j = rng.next_range((i + 1) as u32) as usize;
        slice.swap(i, j);
    }
}

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    pub fn state(&self) -> u32 {
        self.state
    }
}

impl RandomSource for SimpleRng {
    fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        // Low bits of a power-of-two LCG cycle quickly; hand out the high half.
        self.state >> 16
    }
}

impl Default for SimpleRng {
    fn default() -> Self {
        Self::new(1)
    }
}

/// Replays a fixed list of raw values, cycling when exhausted.
///
/// With `next_range(n)` computing `value % n`, a script of small integers
/// picks exact outcomes: `0` always passes a `chance_percent` roll with a
/// non-zero chance, `99` always fails one below 100.
#[derive(Debug, Clone)]
pub struct SequenceRng {
    values: Vec<u32>,
    pos: usize,
}

impl SequenceRng {
    pub fn new(values: impl Into<Vec<u32>>) -> Self {
        let mut values = values.into();
        if values.is_empty() {
            values.push(0);
        }
        Self { values, pos: 0 }
    }
}

impl RandomSource for SequenceRng {
    fn next_u32(&mut self) -> u32 {
        let v = self.values[self.pos % self.values.len()];
        self.pos = self.pos.wrapping_add(1);
        v
    }
}

/// Fixed-size look-ahead queue, refilled uniformly at random.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieceQueue {
    next: [PieceKind; NEXT_QUEUE_LEN],
}

impl PieceQueue {
    /// Create a queue filled from `rng`.
    pub fn new(rng: &mut dyn RandomSource) -> Self {
        let mut next = [PieceKind::I; NEXT_QUEUE_LEN];
        for slot in next.iter_mut() {
            *slot = random_kind(rng);
        }
        Self { next }
    }

    /// Build a queue with known contents.
    pub fn from_pieces(next: [PieceKind; NEXT_QUEUE_LEN]) -> Self {
        Self { next }
    }

    /// Take the front piece and append a fresh random one.
    pub fn draw(&mut self, rng: &mut dyn RandomSource) -> PieceKind {
        let front = self.next[0];
        self.next.rotate_left(1);
        self.next[NEXT_QUEUE_LEN - 1] = random_kind(rng);
        front
    }

    /// Peek at the upcoming pieces, front first.
    pub fn peek(&self) -> &[PieceKind; NEXT_QUEUE_LEN] {
        &self.next
    }
}

/// Uniform choice among the seven kinds.
pub fn random_kind(rng: &mut dyn RandomSource) -> PieceKind {
    PieceKind::ALL[rng.next_range(PieceKind::ALL.len() as u32) as usize]
}
