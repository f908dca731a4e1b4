//! Hero module - persistent progression across the whole run
//!
//! Multipliers are stored as integer percentages (100 = x1.0) so every
//! derived value floors the same way on every platform.

use crate::balance::Balance;
use crate::enemy::{select_enemy, Enemy, EnemyKind};
use crate::rng::RandomSource;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hero {
    pub level: u32,
    pub exp: u32,
    pub perm_atk: u32,
    pub perm_def: u32,
    /// Experience multiplier, percent.
    pub exp_pct: u32,
    /// Battle score multiplier, percent.
    pub score_pct: u32,
    /// Flat damage added to the special attack.
    pub special_bonus: u32,
    /// Milliseconds shaved off the attack interval.
    pub haste_ms: u32,
    /// Stacks of drop-speed debuff.
    pub drop_debuff: u32,
    /// Meters walked since the last encounter.
    pub distance_m: u32,
    /// Fractional meters carried between updates, in meter-milliseconds.
    walk_remainder: u32,
    /// Last event checkpoint index already rolled.
    pub last_event_check: u32,
    pub kills: u32,
    pub zone: u32,
    /// Encounters spawned so far.
    pub encounters: u32,
    pub last_enemy: Option<EnemyKind>,
    /// Zone increase earned by a boss kill, applied at the next spawn.
    pub pending_zone_up: bool,
    /// Battle rounds fought against the current enemy.
    pub battle_round: u32,
}

/// Outcome of a won battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VictoryReport {
    pub enemy: EnemyKind,
    pub rounds: u32,
    pub reward_atk: u32,
    pub reward_def: u32,
    pub fast_kill: bool,
    pub is_boss: bool,
    /// A zone increase is pending for the next encounter.
    pub zone_up: bool,
    /// Zone the next encounter will use.
    pub next_zone: u32,
}

impl Default for Hero {
    fn default() -> Self {
        Self::new()
    }
}

impl Hero {
    pub fn new() -> Self {
        Self {
            level: 1,
            exp: 0,
            perm_atk: 0,
            perm_def: 0,
            exp_pct: 100,
            score_pct: 100,
            special_bonus: 0,
            haste_ms: 0,
            drop_debuff: 0,
            distance_m: 0,
            walk_remainder: 0,
            last_event_check: 0,
            kills: 0,
            zone: 1,
            encounters: 0,
            last_enemy: None,
            pending_zone_up: false,
            battle_round: 0,
        }
    }

    pub fn required_exp(&self, balance: &Balance) -> u32 {
        balance.base_exp + balance.exp_per_level * (self.level - 1)
    }

    /// Add experience scaled by the multiplier.
    ///
    /// Returns true when the level-up threshold has been reached.
    pub fn add_exp(&mut self, amount: u32, balance: &Balance) -> bool {
        let scaled = (amount as u64 * self.exp_pct as u64 / 100) as u32;
        self.exp = self.exp.saturating_add(scaled);
        self.exp >= self.required_exp(balance)
    }

    pub fn level_up(&mut self, balance: &Balance) {
        self.exp = self.exp.saturating_sub(self.required_exp(balance));
        self.level += 1;
    }

    pub fn atk(&self, buff_atk: u32, balance: &Balance) -> u32 {
        balance.hero_base_atk + self.level + self.perm_atk + buff_atk
    }

    pub fn def(&self, buff_def: u32) -> u32 {
        self.level / 2 + self.perm_def + buff_def
    }

    pub fn attack_interval(&self, balance: &Balance) -> u32 {
        balance
            .hero_attack_interval_ms
            .saturating_sub(self.haste_ms)
            .max(balance.hero_min_attack_interval_ms)
    }

    /// Advance the walk by `elapsed_ms`.
    ///
    /// Returns the checkpoint indices (`distance / check_distance`) crossed
    /// that have not been rolled yet, and whether the encounter distance was
    /// reached.
    pub fn walk(&mut self, elapsed_ms: u32, balance: &Balance) -> (Option<u32>, bool) {
        let prev_check = self.distance_m / balance.event_check_distance.max(1);
        let travelled = self.walk_remainder + balance.walk_speed * elapsed_ms;
        self.distance_m += travelled / 1000;
        self.walk_remainder = travelled % 1000;

        let arrived = self.distance_m >= balance.encounter_distance;
        let check = self.distance_m / balance.event_check_distance.max(1);
        let checkpoint = if check > prev_check && self.last_event_check < check {
            self.last_event_check = check;
            Some(check)
        } else {
            None
        };
        (checkpoint, arrived)
    }

    /// Restart the walk towards the next encounter.
    pub fn reset_walk(&mut self) {
        self.distance_m = 0;
        self.walk_remainder = 0;
        self.last_event_check = 0;
    }

    /// Spawn the next enemy.
    ///
    /// Counts the encounter first, then applies any pending zone increase,
    /// so a boss kill only raises the zone of the fight after it.
    pub fn spawn_enemy(&mut self, balance: &Balance, rng: &mut dyn RandomSource) -> Enemy {
        self.encounters += 1;
        if self.pending_zone_up {
            self.zone += 1;
            self.pending_zone_up = false;
        }
        let kind = select_enemy(self.encounters, self.last_enemy, balance, rng);
        if !kind.base().traits.boss {
            self.last_enemy = Some(kind);
        }
        self.battle_round = 0;
        Enemy::new(kind, self.zone, self.level, balance)
    }

    /// Grant victory rewards for `enemy`.
    ///
    /// Base, boss, and fast-kill rewards add independently.
    pub fn defeat_enemy(&mut self, enemy: &Enemy, balance: &Balance) -> VictoryReport {
        let rounds = self.battle_round;
        let is_boss = enemy.is_boss();
        let fast_kill = rounds <= 1;
        self.kills += 1;

        let mut reward_atk = balance.victory_perm_atk;
        let mut reward_def = balance.victory_perm_def;
        if is_boss {
            reward_atk += balance.boss_bonus_atk;
            reward_def += balance.boss_bonus_def;
            self.pending_zone_up = true;
        }
        if fast_kill {
            reward_atk += balance.fast_victory_bonus_atk;
            reward_def += balance.fast_victory_bonus_def;
        }
        self.perm_atk += reward_atk;
        self.perm_def += reward_def;
        self.battle_round = 0;

        VictoryReport {
            enemy: enemy.kind,
            rounds,
            reward_atk,
            reward_def,
            fast_kill,
            is_boss,
            zone_up: is_boss,
            next_zone: if is_boss { self.zone + 1 } else { self.zone },
        }
    }
}
