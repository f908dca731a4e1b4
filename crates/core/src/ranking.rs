//! In-memory ranking board

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankEntry {
    pub score: u32,
    pub zone: u32,
    pub kills: u32,
    pub level: u32,
}

/// Top-N runs, best first: score descending, then zone descending.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Ranking {
    entries: Vec<RankEntry>,
    capacity: usize,
}

impl Ranking {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity + 1),
            capacity,
        }
    }

    pub fn entries(&self) -> &[RankEntry] {
        &self.entries
    }

    /// Insert a run. Returns its 1-based rank, or 0 if it did not make the board.
    ///
    /// Ties keep earlier entries ahead.
    pub fn add(&mut self, entry: RankEntry) -> usize {
        let rank = self.would_rank(entry.score, entry.zone);
        if rank == 0 {
            return 0;
        }
        self.entries.insert(rank - 1, entry);
        self.entries.truncate(self.capacity);
        rank
    }

    /// Rank a score would get without inserting it.
    pub fn would_rank(&self, score: u32, zone: u32) -> usize {
        let pos = self
            .entries
            .iter()
            .position(|e| (score, zone) > (e.score, e.zone))
            .unwrap_or(self.entries.len());
        if pos >= self.capacity {
            0
        } else {
            pos + 1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(score: u32, zone: u32) -> RankEntry {
        RankEntry {
            score,
            zone,
            kills: 0,
            level: 1,
        }
    }

    #[test]
    fn test_sorted_by_score_then_zone() {
        let mut ranking = Ranking::new(10);
        assert_eq!(ranking.add(entry(500, 1)), 1);
        assert_eq!(ranking.add(entry(900, 1)), 1);
        assert_eq!(ranking.add(entry(500, 3)), 2);
        let scores: Vec<_> = ranking.entries().iter().map(|e| (e.score, e.zone)).collect();
        assert_eq!(scores, vec![(900, 1), (500, 3), (500, 1)]);
    }

    #[test]
    fn test_capacity_drops_the_tail() {
        let mut ranking = Ranking::new(3);
        for score in [100, 200, 300] {
            ranking.add(entry(score, 1));
        }
        assert_eq!(ranking.would_rank(50, 1), 0);
        assert_eq!(ranking.add(entry(50, 1)), 0);
        assert_eq!(ranking.add(entry(250, 1)), 2);
        assert_eq!(ranking.entries().len(), 3);
        assert_eq!(ranking.entries()[2].score, 200);
    }

    #[test]
    fn test_equal_entry_ranks_after_existing() {
        let mut ranking = Ranking::new(10);
        ranking.add(entry(100, 1));
        assert_eq!(ranking.add(entry(100, 1)), 2);
    }
}
