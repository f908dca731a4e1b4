//! Balance table - every tunable number in one serde-loadable struct
//!
//! `Balance::default()` is the shipped tuning. A JSON file may override any
//! subset of fields; missing fields keep their defaults.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rejected balance values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BalanceError {
    #[error("`{0}` must be greater than zero")]
    Zero(&'static str),
    #[error("`{field}` is a percentage and must be at most 100 (got {value})")]
    Percent { field: &'static str, value: u32 },
    #[error("`{field}` range is empty ({min} > {max})")]
    EmptyRange {
        field: &'static str,
        min: u32,
        max: u32,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Balance {
    // Piece engine
    pub lock_delay_ms: u32,
    pub lock_max_resets: u8,
    pub lock_total_max_ms: u32,
    pub line_clear_ms: u32,
    /// Points per clear, indexed by row count (0..=4).
    pub score_per_line: [u32; 5],
    /// Extra points for a special placement clearing 1, 2, or 3+ rows.
    pub special_bonus: [u32; 3],

    // Drop speed
    pub explore_drop_interval_ms: u32,
    pub battle_drop_interval_ms: u32,
    /// Each debuff stack multiplies the drop interval by this percentage.
    pub drop_debuff_pct: u32,

    // Hero progression
    pub exp_per_lock: u32,
    pub exp_per_line: [u32; 5],
    pub base_exp: u32,
    pub exp_per_level: u32,
    pub hero_base_atk: u32,
    pub hero_attack_interval_ms: u32,
    pub hero_min_attack_interval_ms: u32,

    // Battle round
    pub battle_time_ms: u32,
    pub buff_atk_per_score: u32,
    pub max_buff_atk: u32,
    pub buff_def_per_score: u32,
    pub max_buff_def: u32,
    pub special_threshold: u32,
    pub special_charge_ms: u32,
    pub special_base_dmg: u32,
    pub special_level_bonus: u32,
    pub special_buff_bonus: u32,
    pub crit_chance_pct: u32,
    pub enemy_first_attack_delay_ms: u32,
    pub magic_chance_pct: u32,
    pub breath_chance_pct: u32,
    pub breath_min_rows: u32,
    pub breath_max_rows: u32,
    pub max_breath_rows: u32,
    pub lifesteal_pct: u32,
    pub lifesteal_min: u32,
    pub lifesteal_max: u32,

    // Carry-over and rewards
    pub damage_per_garbage: u32,
    pub max_garbage: u32,
    pub max_total_garbage: u32,
    pub victory_perm_atk: u32,
    pub victory_perm_def: u32,
    pub fast_victory_bonus_atk: u32,
    pub fast_victory_bonus_def: u32,
    pub boss_bonus_atk: u32,
    pub boss_bonus_def: u32,
    pub boss_every: u32,

    // Enemy scaling per zone step
    pub zone_hp_step: u32,
    pub level_hp_step: u32,
    pub zone_atk_step: u32,
    pub zone_def_step: u32,
    pub zone_interval_step_ms: u32,
    pub enemy_min_interval_ms: u32,

    // Exploration
    /// Meters per second.
    pub walk_speed: u32,
    pub encounter_distance: u32,
    pub event_check_distance: u32,
    pub event_chance_pct: u32,
    pub choice_event_pct: u32,

    // Phase durations
    pub event_duration_ms: u32,
    pub encounter_duration_ms: u32,
    pub victory_wait_ms: u32,
    pub battle_result_ms: u32,

    pub ranking_size: usize,
}

impl Default for Balance {
    fn default() -> Self {
        Self {
            lock_delay_ms: 500,
            lock_max_resets: 15,
            lock_total_max_ms: 3000,
            line_clear_ms: 300,
            score_per_line: [0, 100, 300, 500, 800],
            special_bonus: [200, 400, 800],

            explore_drop_interval_ms: 800,
            battle_drop_interval_ms: 500,
            drop_debuff_pct: 85,

            exp_per_lock: 1,
            exp_per_line: [0, 5, 12, 20, 30],
            base_exp: 50,
            exp_per_level: 25,
            hero_base_atk: 5,
            hero_attack_interval_ms: 800,
            hero_min_attack_interval_ms: 300,

            battle_time_ms: 30_000,
            buff_atk_per_score: 200,
            max_buff_atk: 10,
            buff_def_per_score: 400,
            max_buff_def: 5,
            special_threshold: 1500,
            special_charge_ms: 1500,
            special_base_dmg: 30,
            special_level_bonus: 5,
            special_buff_bonus: 3,
            crit_chance_pct: 15,
            enemy_first_attack_delay_ms: 800,
            magic_chance_pct: 20,
            breath_chance_pct: 15,
            breath_min_rows: 2,
            breath_max_rows: 4,
            max_breath_rows: 8,
            lifesteal_pct: 20,
            lifesteal_min: 1,
            lifesteal_max: 5,

            damage_per_garbage: 12,
            max_garbage: 8,
            max_total_garbage: 12,
            victory_perm_atk: 1,
            victory_perm_def: 0,
            fast_victory_bonus_atk: 1,
            fast_victory_bonus_def: 1,
            boss_bonus_atk: 2,
            boss_bonus_def: 1,
            boss_every: 5,

            zone_hp_step: 25,
            level_hp_step: 4,
            zone_atk_step: 3,
            zone_def_step: 3,
            zone_interval_step_ms: 150,
            enemy_min_interval_ms: 400,

            walk_speed: 20,
            encounter_distance: 300,
            event_check_distance: 50,
            event_chance_pct: 30,
            choice_event_pct: 20,

            event_duration_ms: 2000,
            encounter_duration_ms: 1500,
            victory_wait_ms: 1500,
            battle_result_ms: 3000,

            ranking_size: 10,
        }
    }
}

impl Balance {
    /// Reject values that would stall timers or divide by zero.
    pub fn validate(&self) -> Result<(), BalanceError> {
        let nonzero: [(&'static str, u32); 13] = [
            ("lock_delay_ms", self.lock_delay_ms),
            ("lock_total_max_ms", self.lock_total_max_ms),
            ("explore_drop_interval_ms", self.explore_drop_interval_ms),
            ("battle_drop_interval_ms", self.battle_drop_interval_ms),
            ("hero_min_attack_interval_ms", self.hero_min_attack_interval_ms),
            ("battle_time_ms", self.battle_time_ms),
            ("buff_atk_per_score", self.buff_atk_per_score),
            ("buff_def_per_score", self.buff_def_per_score),
            ("damage_per_garbage", self.damage_per_garbage),
            ("boss_every", self.boss_every),
            ("walk_speed", self.walk_speed),
            ("event_check_distance", self.event_check_distance),
            ("enemy_min_interval_ms", self.enemy_min_interval_ms),
        ];
        for (field, value) in nonzero {
            if value == 0 {
                return Err(BalanceError::Zero(field));
            }
        }
        if self.ranking_size == 0 {
            return Err(BalanceError::Zero("ranking_size"));
        }

        let percents: [(&'static str, u32); 7] = [
            ("drop_debuff_pct", self.drop_debuff_pct),
            ("crit_chance_pct", self.crit_chance_pct),
            ("magic_chance_pct", self.magic_chance_pct),
            ("breath_chance_pct", self.breath_chance_pct),
            ("lifesteal_pct", self.lifesteal_pct),
            ("event_chance_pct", self.event_chance_pct),
            ("choice_event_pct", self.choice_event_pct),
        ];
        for (field, value) in percents {
            if value > 100 {
                return Err(BalanceError::Percent { field, value });
            }
        }

        if self.breath_min_rows > self.breath_max_rows {
            return Err(BalanceError::EmptyRange {
                field: "breath_rows",
                min: self.breath_min_rows,
                max: self.breath_max_rows,
            });
        }
        if self.lifesteal_min > self.lifesteal_max {
            return Err(BalanceError::EmptyRange {
                field: "lifesteal",
                min: self.lifesteal_min,
                max: self.lifesteal_max,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(Balance::default().validate(), Ok(()));
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let balance: Balance =
            serde_json::from_str(r#"{ "lock_delay_ms": 250, "battle_time_ms": 10000 }"#).unwrap();
        assert_eq!(balance.lock_delay_ms, 250);
        assert_eq!(balance.battle_time_ms, 10_000);
        assert_eq!(balance.line_clear_ms, Balance::default().line_clear_ms);
    }

    #[test]
    fn zero_divisor_is_rejected() {
        let balance = Balance {
            damage_per_garbage: 0,
            ..Balance::default()
        };
        assert_eq!(
            balance.validate(),
            Err(BalanceError::Zero("damage_per_garbage"))
        );
    }

    #[test]
    fn oversized_percent_is_rejected() {
        let balance = Balance {
            crit_chance_pct: 150,
            ..Balance::default()
        };
        assert!(matches!(
            balance.validate(),
            Err(BalanceError::Percent {
                field: "crit_chance_pct",
                value: 150
            })
        ));
    }

    #[test]
    fn inverted_breath_range_is_rejected() {
        let balance = Balance {
            breath_min_rows: 5,
            breath_max_rows: 2,
            ..Balance::default()
        };
        assert!(matches!(
            balance.validate(),
            Err(BalanceError::EmptyRange { .. })
        ));
    }
}
