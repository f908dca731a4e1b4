//! Battle resolver - the automatic exchange after a puzzle-combat phase
//!
//! A [`BattleRound`] is created from the just-finished puzzle phase (lines
//! cleared become the attack budget, score becomes stat buffers and special
//! readiness) and advanced by elapsed time. Three independent countdowns run
//! in every tick, in this order:
//!
//! 1. the special-attack charge, when one is in progress
//! 2. the hero's turn: start the special, spend one attack, or report that
//!    nothing is left to do
//! 3. the enemy's turn, with its trait modifiers
//!
//! Each countdown fires at most once per tick.

use log::debug;

use crate::balance::Balance;
use crate::enemy::Enemy;
use crate::hero::Hero;
use crate::rng::RandomSource;
use crate::scoring::{adjusted_score, next_round_garbage, stat_buffers};
use crate::types::GameEvent;

/// Result of advancing a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleTick {
    Ongoing,
    /// Enemy health reached zero.
    Victory,
    /// The attack budget is spent and no special attack is pending.
    Exhausted,
}

/// Coarse state for renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleState {
    Waiting,
    Charging,
    Exhausted,
    Victory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BattleRound {
    /// 1-based round number against the current enemy.
    pub round: u32,
    pub budget: u32,
    pub buff_atk: u32,
    pub buff_def: u32,
    pub special_ready: bool,
    pub special_used: bool,
    pub charging: bool,
    pub charge_ms: u32,
    pub damage_taken: u32,
    /// Extra garbage rows queued by breath attacks this round.
    pub breath_rows: u32,
    hero_interval_ms: u32,
    hero_cooldown_ms: u32,
    enemy_cooldown_ms: u32,
    outcome: Option<BattleTick>,
}

impl BattleRound {
    /// Open a round from the puzzle phase's score and cleared lines.
    pub fn start(
        round: u32,
        score: u32,
        lines: u32,
        hero: &Hero,
        enemy: &Enemy,
        balance: &Balance,
    ) -> Self {
        let adjusted = adjusted_score(score, hero.score_pct);
        let (buff_atk, buff_def) = stat_buffers(balance, adjusted);
        let hero_interval_ms = hero.attack_interval(balance);
        debug!(
            "round {}: {} attacks, buffs +{}/+{}, adjusted score {}",
            round, lines, buff_atk, buff_def, adjusted
        );
        Self {
            round,
            budget: lines,
            buff_atk,
            buff_def,
            special_ready: adjusted >= balance.special_threshold,
            special_used: false,
            charging: false,
            charge_ms: 0,
            damage_taken: 0,
            breath_rows: 0,
            hero_interval_ms,
            hero_cooldown_ms: hero_interval_ms,
            enemy_cooldown_ms: enemy.interval_ms + balance.enemy_first_attack_delay_ms,
            outcome: None,
        }
    }

    pub fn state(&self) -> BattleState {
        match self.outcome {
            Some(BattleTick::Victory) => BattleState::Victory,
            Some(BattleTick::Exhausted) => BattleState::Exhausted,
            _ if self.charging => BattleState::Charging,
            _ => BattleState::Waiting,
        }
    }

    /// A special attack is still going to happen this round.
    pub fn special_pending(&self) -> bool {
        self.charging || (self.special_ready && !self.special_used)
    }

    /// Charge progress in permille.
    pub fn charge_progress(&self, balance: &Balance) -> u16 {
        if !self.charging || balance.special_charge_ms == 0 {
            return 0;
        }
        (self.charge_ms.min(balance.special_charge_ms) as u64 * 1000
            / balance.special_charge_ms as u64) as u16
    }

    /// Garbage rows this round hands to the next puzzle-combat phase.
    pub fn carry_over_garbage(&self, balance: &Balance) -> u32 {
        next_round_garbage(balance, self.damage_taken, self.breath_rows)
    }

    /// Advance the round by `elapsed_ms`.
    ///
    /// Once the round has finished, further ticks return the same outcome
    /// without side effects.
    pub fn tick(
        &mut self,
        elapsed_ms: u32,
        hero: &Hero,
        enemy: &mut Enemy,
        balance: &Balance,
        rng: &mut dyn RandomSource,
        events: &mut Vec<GameEvent>,
    ) -> BattleTick {
        if let Some(outcome) = self.outcome {
            return outcome;
        }
        if enemy.is_defeated() {
            return self.finish(BattleTick::Victory);
        }

        // The hero's turn restarts when a special lands.
        let mut hero_turn = true;
        if self.charging {
            self.charge_ms = self.charge_ms.saturating_add(elapsed_ms);
            if self.charge_ms >= balance.special_charge_ms {
                self.release_special(hero, enemy, balance, events);
                if enemy.is_defeated() {
                    return self.finish(BattleTick::Victory);
                }
                hero_turn = false;
            }
        }

        if hero_turn {
            self.hero_cooldown_ms = self.hero_cooldown_ms.saturating_sub(elapsed_ms);
        }
        if hero_turn && self.hero_cooldown_ms == 0 {
            self.hero_cooldown_ms = self.hero_interval_ms;
            if self.special_ready && !self.special_used && !self.charging {
                self.charging = true;
                self.charge_ms = 0;
                debug!("special attack charging");
                events.push(GameEvent::SpecialCharging);
            } else if self.budget > 0 {
                self.budget -= 1;
                self.hero_strike(hero, enemy, balance, rng, events);
                if enemy.is_defeated() {
                    return self.finish(BattleTick::Victory);
                }
            } else if !self.charging {
                let garbage = self.carry_over_garbage(balance);
                events.push(GameEvent::AttacksExhausted {
                    garbage: garbage as u8,
                });
                return self.finish(BattleTick::Exhausted);
            }
        }

        self.enemy_cooldown_ms = self.enemy_cooldown_ms.saturating_sub(elapsed_ms);
        if self.enemy_cooldown_ms == 0 {
            self.enemy_cooldown_ms = enemy.interval_ms;
            self.enemy_strike(hero, enemy, balance, rng, events);
        }

        BattleTick::Ongoing
    }

    fn finish(&mut self, outcome: BattleTick) -> BattleTick {
        self.outcome = Some(outcome);
        self.charging = false;
        outcome
    }

    fn release_special(
        &mut self,
        hero: &Hero,
        enemy: &mut Enemy,
        balance: &Balance,
        events: &mut Vec<GameEvent>,
    ) {
        self.charging = false;
        self.charge_ms = 0;
        self.special_used = true;
        self.hero_cooldown_ms = self.hero_interval_ms;

        let damage = balance.special_base_dmg
            + balance.special_level_bonus * hero.level
            + balance.special_buff_bonus * self.buff_atk
            + hero.special_bonus;
        debug!("special attack for {}", damage);
        apply_lifesteal(enemy, damage, balance, events);
        enemy.take_damage(damage);
        events.push(GameEvent::SpecialStrike { damage });
    }

    fn hero_strike(
        &mut self,
        hero: &Hero,
        enemy: &mut Enemy,
        balance: &Balance,
        rng: &mut dyn RandomSource,
        events: &mut Vec<GameEvent>,
    ) {
        let mut damage = hero
            .atk(self.buff_atk, balance)
            .saturating_sub(enemy.def)
            .max(1);
        let critical = rng.chance_percent(balance.crit_chance_pct);
        if critical {
            damage = damage * 3 / 2;
        }
        apply_lifesteal(enemy, damage, balance, events);
        enemy.take_damage(damage);
        debug!(
            "hero hits for {}{} ({} attacks left)",
            damage,
            if critical { " (critical)" } else { "" },
            self.budget
        );
        events.push(GameEvent::HeroStrike { damage, critical });
    }

    fn enemy_strike(
        &mut self,
        hero: &Hero,
        enemy: &Enemy,
        balance: &Balance,
        rng: &mut dyn RandomSource,
        events: &mut Vec<GameEvent>,
    ) {
        let mut damage = enemy.atk.saturating_sub(hero.def(self.buff_def));
        let mut magic = false;
        if enemy.traits.magic && rng.chance_percent(balance.magic_chance_pct) {
            damage = enemy.atk * 3 / 2;
            magic = true;
        }
        if enemy.traits.breath && rng.chance_percent(balance.breath_chance_pct) {
            let rows = rng.range_inclusive(balance.breath_min_rows, balance.breath_max_rows);
            self.breath_rows = (self.breath_rows + rows).min(balance.max_breath_rows);
            debug!("breath queues {} rows (total {})", rows, self.breath_rows);
            events.push(GameEvent::BreathQueued { rows: rows as u8 });
        }
        self.damage_taken = self.damage_taken.saturating_add(damage);
        events.push(GameEvent::EnemyStrike { damage, magic });
    }
}

/// Heal a lifesteal enemy by a clamped share of the damage it is about to take.
fn apply_lifesteal(enemy: &mut Enemy, damage: u32, balance: &Balance, events: &mut Vec<GameEvent>) {
    if !enemy.traits.lifesteal {
        return;
    }
    let heal = (damage * balance.lifesteal_pct / 100).clamp(balance.lifesteal_min, balance.lifesteal_max);
    let amount = enemy.heal(heal);
    events.push(GameEvent::EnemyHealed { amount });
}
