//! Scoring module - pure functions over the balance table
//!
//! Score buffers and carry-over garbage are recomputed from their inputs on
//! demand rather than cached, so each is a plain function that is easy to test.

use crate::balance::Balance;

/// Base points for clearing `lines` rows at once.
///
/// Counts past the end of the table use its last entry.
pub fn line_clear_score(table: &[u32; 5], lines: usize) -> u32 {
    table[lines.min(table.len() - 1)]
}

/// Extra points for a special placement; zero when nothing cleared.
pub fn special_bonus(table: &[u32; 3], lines: usize) -> u32 {
    match lines {
        0 => 0,
        1 => table[0],
        2 => table[1],
        _ => table[2],
    }
}

/// Score after the hero's score multiplier (percent, 100 = 1.0).
pub fn adjusted_score(score: u32, score_pct: u32) -> u32 {
    ((score as u64 * score_pct as u64) / 100).min(u32::MAX as u64) as u32
}

/// Attack and defense buffers derived from an adjusted score.
///
/// Each is floor-divided by its per-point cost and capped independently.
pub fn stat_buffers(balance: &Balance, adjusted: u32) -> (u32, u32) {
    let atk = (adjusted / balance.buff_atk_per_score.max(1)).min(balance.max_buff_atk);
    let def = (adjusted / balance.buff_def_per_score.max(1)).min(balance.max_buff_def);
    (atk, def)
}

/// Garbage rows queued for the next puzzle-combat phase.
///
/// `min(total_cap, min(damage_cap, damage / cost) + extra)`
pub fn next_round_garbage(balance: &Balance, damage_taken: u32, extra: u32) -> u32 {
    let base = (damage_taken / balance.damage_per_garbage.max(1)).min(balance.max_garbage);
    (base + extra).min(balance.max_total_garbage)
}

/// Drop interval after `debuff` stacks of speed-up.
///
/// Each stack scales the interval by `drop_debuff_pct / 100`, floored at every
/// step in integer arithmetic, never below 1ms.
pub fn drop_interval(balance: &Balance, base_ms: u32, debuff: u32) -> u32 {
    let mut interval = base_ms as u64;
    for _ in 0..debuff {
        interval = interval * balance.drop_debuff_pct as u64 / 100;
        if interval <= 1 {
            break;
        }
    }
    (interval as u32).max(1)
}

/// Experience granted by one puzzle report.
pub fn exp_for(balance: &Balance, locked: bool, lines: usize) -> u32 {
    let mut exp = 0;
    if locked {
        exp += balance.exp_per_lock;
    }
    if lines > 0 {
        let table = &balance.exp_per_line;
        exp += table[lines.min(table.len() - 1)];
    }
    exp
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_clear_table() {
        let table = Balance::default().score_per_line;
        assert_eq!(line_clear_score(&table, 0), 0);
        assert_eq!(line_clear_score(&table, 1), 100);
        assert_eq!(line_clear_score(&table, 4), 800);
        assert_eq!(line_clear_score(&table, 6), 800);
    }

    #[test]
    fn test_special_bonus_tiers() {
        let table = Balance::default().special_bonus;
        assert_eq!(special_bonus(&table, 0), 0);
        assert_eq!(special_bonus(&table, 1), 200);
        assert_eq!(special_bonus(&table, 2), 400);
        assert_eq!(special_bonus(&table, 3), 800);
        assert_eq!(special_bonus(&table, 4), 800);
    }

    #[test]
    fn test_buffers_cap_independently() {
        let b = Balance::default();
        assert_eq!(stat_buffers(&b, 0), (0, 0));
        assert_eq!(stat_buffers(&b, 399), (1, 0));
        assert_eq!(stat_buffers(&b, 1000), (5, 2));
        assert_eq!(stat_buffers(&b, 2400), (10, 5));
        assert_eq!(stat_buffers(&b, 100_000), (10, 5));
    }

    #[test]
    fn test_adjusted_score_floors() {
        assert_eq!(adjusted_score(999, 125), 1248);
        assert_eq!(adjusted_score(10, 100), 10);
        assert_eq!(adjusted_score(u32::MAX, 200), u32::MAX);
    }

    #[test]
    fn test_next_round_garbage_caps() {
        let b = Balance::default();
        assert_eq!(next_round_garbage(&b, 0, 0), 0);
        assert_eq!(next_round_garbage(&b, 25, 0), 2);
        assert_eq!(next_round_garbage(&b, 500, 0), 8);
        assert_eq!(next_round_garbage(&b, 500, 8), 12);
        assert_eq!(next_round_garbage(&b, 11, 3), 3);
    }

    #[test]
    fn test_drop_interval_debuff() {
        let b = Balance::default();
        assert_eq!(drop_interval(&b, 800, 0), 800);
        assert_eq!(drop_interval(&b, 800, 1), 680);
        assert_eq!(drop_interval(&b, 800, 2), 578);
    }

    #[test]
    fn test_exp_per_report() {
        let b = Balance::default();
        assert_eq!(exp_for(&b, true, 0), 1);
        assert_eq!(exp_for(&b, false, 2), 12);
        assert_eq!(exp_for(&b, false, 0), 0);
    }
}
