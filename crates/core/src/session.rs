//! Session module - the phase controller
//!
//! A [`Session`] owns every piece of run state and is the only channel
//! through which the playfield and the battle resolver exchange values:
//! puzzle reports become experience, attack budget, and battle score; battle
//! outcomes become queued garbage rows.
//!
//! ```text
//! Title --confirm--> Exploration --distance--> Encounter --delay--> PuzzleCombat
//!   ^                 |  ^    ^                                      |      ^
//!   |        checkpoint  |    +--------- BattleResult <-- victory    timer  | exhausted
//!   |                 v  |                                   ^       v      |
//!   |      NarrativeEvent/ChoiceEvent                        +---- AutoBattle
//! Ranking <--confirm-- GameOver <-- top-out (Exploration, PuzzleCombat)
//! ```
//!
//! Exploration and PuzzleCombat can be paused. LevelUpChoice interrupts
//! Exploration when experience crosses the threshold.
//!
//! All timers advance only inside [`Session::update`]; commands outside the
//! phase that accepts them are rejected with `false`.

use log::{debug, info, warn};

use crate::balance::Balance;
use crate::battle::{BattleRound, BattleTick};
use crate::enemy::Enemy;
use crate::events::{draw_upgrades, roll_checkpoint, ChoiceEvent, RoadEvent, TriggeredEvent, Upgrade};
use crate::hero::{Hero, VictoryReport};
use crate::playfield::{Playfield, PuzzleReport, PuzzleRules};
use crate::ranking::{RankEntry, Ranking};
use crate::rng::{RandomSource, SimpleRng};
use crate::scoring::{drop_interval, exp_for};
use crate::snapshot::{ActiveSnapshot, BattleSnapshot, EnemySnapshot, HeroSnapshot, SessionSnapshot};
use crate::types::{Command, GameEvent, Phase};

/// Puzzle reports folded for one update.
#[derive(Debug, Default, Clone, Copy)]
struct PuzzleSummary {
    exp: u32,
    lines: u32,
    topped_out: bool,
}

pub struct Session<R: RandomSource = SimpleRng> {
    balance: Balance,
    rng: R,
    playfield: Playfield,
    hero: Hero,
    enemy: Option<Enemy>,
    round: Option<BattleRound>,

    phase: Phase,
    phase_timer_ms: u32,
    /// Phase to return to when unpausing.
    paused_from: Phase,

    pending_garbage: u32,
    battle_start_score: u32,
    battle_score: u32,
    battle_lines: u32,
    battle_time_left_ms: u32,
    victory_wait_ms: Option<u32>,
    last_victory: Option<VictoryReport>,

    upgrades: [Upgrade; 3],
    road_event: Option<RoadEvent>,
    choice_event: Option<ChoiceEvent>,
    cursor: u8,

    ranking: Ranking,
    last_rank: usize,
    events: Vec<GameEvent>,
}

impl Session<SimpleRng> {
    /// Session driven by the default generator.
    pub fn with_seed(balance: Balance, seed: u32) -> Self {
        Self::new(balance, SimpleRng::new(seed))
    }
}

impl<R: RandomSource> Session<R> {
    /// A session sitting on the title screen.
    pub fn new(balance: Balance, mut rng: R) -> Self {
        let playfield = Playfield::new(PuzzleRules::from(&balance), &mut rng);
        let ranking = Ranking::new(balance.ranking_size);
        Self {
            balance,
            rng,
            playfield,
            hero: Hero::new(),
            enemy: None,
            round: None,
            phase: Phase::Title,
            phase_timer_ms: 0,
            paused_from: Phase::Exploration,
            pending_garbage: 0,
            battle_start_score: 0,
            battle_score: 0,
            battle_lines: 0,
            battle_time_left_ms: 0,
            victory_wait_ms: None,
            last_victory: None,
            upgrades: [Upgrade::Attack, Upgrade::Defense, Upgrade::ExpRate],
            road_event: None,
            choice_event: None,
            cursor: 0,
            ranking,
            last_rank: 0,
            events: Vec::with_capacity(32),
        }
    }

    pub fn balance(&self) -> &Balance {
        &self.balance
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn phase_timer_ms(&self) -> u32 {
        self.phase_timer_ms
    }

    pub fn playfield(&self) -> &Playfield {
        &self.playfield
    }

    /// Mutable playfield access for setting up positions.
    pub fn playfield_mut(&mut self) -> &mut Playfield {
        &mut self.playfield
    }

    pub fn hero(&self) -> &Hero {
        &self.hero
    }

    /// Mutable hero access for setting up positions.
    pub fn hero_mut(&mut self) -> &mut Hero {
        &mut self.hero
    }

    pub fn enemy(&self) -> Option<&Enemy> {
        self.enemy.as_ref()
    }

    pub fn enemy_mut(&mut self) -> Option<&mut Enemy> {
        self.enemy.as_mut()
    }

    pub fn round(&self) -> Option<&BattleRound> {
        self.round.as_ref()
    }

    pub fn pending_garbage(&self) -> u32 {
        self.pending_garbage
    }

    pub fn battle_lines(&self) -> u32 {
        self.battle_lines
    }

    pub fn battle_score(&self) -> u32 {
        self.battle_score
    }

    pub fn battle_time_left_ms(&self) -> u32 {
        self.battle_time_left_ms
    }

    pub fn last_victory(&self) -> Option<&VictoryReport> {
        self.last_victory.as_ref()
    }

    pub fn upgrades(&self) -> &[Upgrade; 3] {
        &self.upgrades
    }

    pub fn choice_event(&self) -> Option<ChoiceEvent> {
        self.choice_event
    }

    pub fn road_event(&self) -> Option<RoadEvent> {
        self.road_event
    }

    pub fn cursor(&self) -> u8 {
        self.cursor
    }

    pub fn ranking(&self) -> &Ranking {
        &self.ranking
    }

    pub fn last_rank(&self) -> usize {
        self.last_rank
    }

    /// Drain notifications queued since the last call.
    pub fn drain_events(&mut self) -> std::vec::Drain<'_, GameEvent> {
        self.events.drain(..)
    }

    /// Phase change without setup.
    fn switch(&mut self, to: Phase) {
        let from = self.phase;
        self.phase = to;
        self.phase_timer_ms = 0;
        if from != to {
            debug!("phase {} -> {}", from.as_str(), to.as_str());
            self.events.push(GameEvent::PhaseChanged { from, to });
        }
    }

    /// Phase change with the target phase's setup.
    fn enter(&mut self, to: Phase) {
        match to {
            Phase::Exploration => {
                self.hero.reset_walk();
                self.last_victory = None;
            }
            Phase::Encounter => {
                let enemy = self.hero.spawn_enemy(&self.balance, &mut self.rng);
                info!(
                    "encounter {}: {} (zone {}, hp {})",
                    self.hero.encounters,
                    enemy.kind.as_str(),
                    self.hero.zone,
                    enemy.max_hp
                );
                self.events.push(GameEvent::EnemySpawned {
                    boss: enemy.is_boss(),
                    zone: self.hero.zone,
                });
                self.enemy = Some(enemy);
            }
            Phase::PuzzleCombat => {
                self.round = None;
                self.battle_time_left_ms = self.balance.battle_time_ms;
                self.battle_start_score = self.playfield.score();
                self.battle_lines = 0;
            }
            Phase::AutoBattle => {
                self.hero.battle_round += 1;
                if let Some(enemy) = self.enemy.as_ref() {
                    self.round = Some(BattleRound::start(
                        self.hero.battle_round,
                        self.battle_score,
                        self.battle_lines,
                        &self.hero,
                        enemy,
                        &self.balance,
                    ));
                }
                self.victory_wait_ms = None;
            }
            _ => {}
        }
        self.switch(to);
        if to == Phase::PuzzleCombat {
            self.flush_garbage();
        }
    }

    /// Start a fresh run from the title screen.
    fn start_run(&mut self) {
        self.playfield = Playfield::new(PuzzleRules::from(&self.balance), &mut self.rng);
        self.playfield.start(&mut self.rng);
        self.hero = Hero::new();
        self.enemy = None;
        self.round = None;
        self.pending_garbage = 0;
        self.battle_start_score = 0;
        self.battle_score = 0;
        self.battle_lines = 0;
        self.battle_time_left_ms = 0;
        self.victory_wait_ms = None;
        self.road_event = None;
        self.choice_event = None;
        self.last_rank = 0;
        info!("run started");
        self.enter(Phase::Exploration);
    }

    /// Push queued garbage into the playfield; keeps it queued if refused.
    fn flush_garbage(&mut self) {
        if self.pending_garbage == 0 {
            return;
        }
        if self.playfield.add_garbage(self.pending_garbage, &mut self.rng) {
            self.pending_garbage = 0;
        } else {
            warn!(
                "{} garbage rows deferred while rows are clearing",
                self.pending_garbage
            );
        }
    }

    /// Turn playfield reports into events and totals.
    fn collect_reports(&mut self) -> PuzzleSummary {
        let mut summary = PuzzleSummary::default();
        for report in self.playfield.drain_reports() {
            match report {
                PuzzleReport::Locked { full_rows, special } => {
                    summary.exp += exp_for(&self.balance, true, 0);
                    self.events.push(GameEvent::PieceLocked { full_rows, special });
                }
                PuzzleReport::Cleared {
                    lines,
                    score,
                    special_bonus,
                } => {
                    summary.exp += exp_for(&self.balance, false, lines as usize);
                    summary.lines += lines as u32;
                    self.events.push(GameEvent::LinesCleared {
                        lines,
                        score,
                        special_bonus,
                    });
                }
                PuzzleReport::GarbageAdded { rows } => {
                    self.events.push(GameEvent::GarbageAdded { rows });
                }
                PuzzleReport::ToppedOut => summary.topped_out = true,
            }
        }
        summary
    }

    fn game_over(&mut self) {
        let score = self.playfield.score();
        info!(
            "game over: score {}, zone {}, kills {}, level {}",
            score, self.hero.zone, self.hero.kills, self.hero.level
        );
        self.events.push(GameEvent::GameOver { score });
        self.switch(Phase::GameOver);
    }

    /// Advance the session by `elapsed_ms` of real time.
    pub fn update(&mut self, elapsed_ms: u32) {
        match self.phase {
            Phase::Exploration => self.update_exploration(elapsed_ms),
            Phase::NarrativeEvent => {
                self.phase_timer_ms = self.phase_timer_ms.saturating_add(elapsed_ms);
                if self.phase_timer_ms >= self.balance.event_duration_ms {
                    self.road_event = None;
                    self.switch(Phase::Exploration);
                }
            }
            Phase::Encounter => {
                self.phase_timer_ms = self.phase_timer_ms.saturating_add(elapsed_ms);
                if self.phase_timer_ms >= self.balance.encounter_duration_ms {
                    self.enter(Phase::PuzzleCombat);
                }
            }
            Phase::PuzzleCombat => self.update_puzzle_combat(elapsed_ms),
            Phase::AutoBattle => self.update_auto_battle(elapsed_ms),
            Phase::BattleResult => {
                self.phase_timer_ms = self.phase_timer_ms.saturating_add(elapsed_ms);
                if self.phase_timer_ms >= self.balance.battle_result_ms {
                    self.enter(Phase::Exploration);
                }
            }
            Phase::Title
            | Phase::Paused
            | Phase::GameOver
            | Phase::LevelUpChoice
            | Phase::ChoiceEvent
            | Phase::Ranking => {}
        }
    }

    fn update_exploration(&mut self, elapsed_ms: u32) {
        self.phase_timer_ms = self.phase_timer_ms.saturating_add(elapsed_ms);
        self.flush_garbage();

        let interval = drop_interval(
            &self.balance,
            self.balance.explore_drop_interval_ms,
            self.hero.drop_debuff,
        );
        self.playfield.tick(elapsed_ms, interval, &mut self.rng);
        let summary = self.collect_reports();

        if summary.topped_out || self.playfield.topped_out() {
            self.game_over();
            return;
        }
        if summary.exp > 0 && self.hero.add_exp(summary.exp, &self.balance) {
            self.offer_upgrades();
            return;
        }

        let (checkpoint, arrived) = self.hero.walk(elapsed_ms, &self.balance);
        if arrived {
            self.enter(Phase::Encounter);
            return;
        }
        if checkpoint.is_some() {
            match roll_checkpoint(&self.balance, &mut self.rng) {
                Some(TriggeredEvent::Road(event)) => {
                    let rows = event.apply(&mut self.hero);
                    self.pending_garbage += rows;
                    info!("road event: {} ({})", event.name(), event.effect());
                    self.road_event = Some(event);
                    self.switch(Phase::NarrativeEvent);
                }
                Some(TriggeredEvent::Choice(event)) => {
                    info!("choice event: {}", event.name());
                    self.choice_event = Some(event);
                    self.cursor = 0;
                    self.switch(Phase::ChoiceEvent);
                }
                None => {}
            }
        }
    }

    fn offer_upgrades(&mut self) {
        self.upgrades = draw_upgrades(&mut self.rng);
        self.cursor = 0;
        self.switch(Phase::LevelUpChoice);
    }

    fn update_puzzle_combat(&mut self, elapsed_ms: u32) {
        self.phase_timer_ms = self.phase_timer_ms.saturating_add(elapsed_ms);

        // Locks from commands since the last update settle before the clock.
        let summary = self.collect_reports();
        self.battle_lines += summary.lines;
        if summary.topped_out || self.playfield.topped_out() {
            self.game_over();
            return;
        }

        self.battle_time_left_ms = self.battle_time_left_ms.saturating_sub(elapsed_ms);
        if self.battle_time_left_ms == 0 {
            self.battle_score = self.playfield.score().saturating_sub(self.battle_start_score);
            info!(
                "puzzle combat over: {} lines, {} points",
                self.battle_lines, self.battle_score
            );
            self.enter(Phase::AutoBattle);
            return;
        }

        self.flush_garbage();
        let interval = drop_interval(
            &self.balance,
            self.balance.battle_drop_interval_ms,
            self.hero.drop_debuff,
        );
        self.playfield.tick(elapsed_ms, interval, &mut self.rng);
        let summary = self.collect_reports();
        self.battle_lines += summary.lines;

        if summary.topped_out || self.playfield.topped_out() {
            self.game_over();
        }
    }

    fn update_auto_battle(&mut self, elapsed_ms: u32) {
        self.phase_timer_ms = self.phase_timer_ms.saturating_add(elapsed_ms);

        if let Some(waited) = self.victory_wait_ms.as_mut() {
            *waited = waited.saturating_add(elapsed_ms);
            if *waited >= self.balance.victory_wait_ms {
                self.victory_wait_ms = None;
                if let Some(enemy) = self.enemy.take() {
                    let report = self.hero.defeat_enemy(&enemy, &self.balance);
                    info!(
                        "{} defeated in {} rounds, ATK +{} DEF +{}",
                        enemy.kind.as_str(),
                        report.rounds,
                        report.reward_atk,
                        report.reward_def
                    );
                    self.last_victory = Some(report);
                }
                self.round = None;
                self.enter(Phase::BattleResult);
            }
            return;
        }

        let (Some(round), Some(enemy)) = (self.round.as_mut(), self.enemy.as_mut()) else {
            return;
        };
        let outcome = round.tick(
            elapsed_ms,
            &self.hero,
            enemy,
            &self.balance,
            &mut self.rng,
            &mut self.events,
        );
        match outcome {
            BattleTick::Ongoing => {}
            BattleTick::Victory => {
                let boss = enemy.is_boss();
                let fast_kill = self.hero.battle_round <= 1;
                self.events.push(GameEvent::Victory { boss, fast_kill });
                self.victory_wait_ms = Some(0);
            }
            BattleTick::Exhausted => {
                let garbage = round.carry_over_garbage(&self.balance);
                self.pending_garbage = self.pending_garbage.saturating_add(garbage);
                debug!(
                    "attacks exhausted after {} damage taken, {} garbage rows queued",
                    round.damage_taken, garbage
                );
                self.enter(Phase::PuzzleCombat);
            }
        }
    }

    /// Apply a discrete command. Returns false when the current phase
    /// rejects it or the playfield refuses the action.
    pub fn command(&mut self, command: Command) -> bool {
        match (self.phase, command) {
            (Phase::Title, Command::Confirm) => {
                self.start_run();
                true
            }
            (Phase::Title, Command::ShowRanking) => {
                self.last_rank = 0;
                self.switch(Phase::Ranking);
                true
            }
            (Phase::Ranking, Command::Confirm | Command::ShowRanking) => {
                self.switch(Phase::Title);
                true
            }
            (Phase::GameOver, Command::Confirm) => {
                self.last_rank = self.ranking.add(RankEntry {
                    score: self.playfield.score(),
                    zone: self.hero.zone,
                    kills: self.hero.kills,
                    level: self.hero.level,
                });
                self.switch(Phase::Ranking);
                true
            }
            (Phase::LevelUpChoice, Command::CursorUp) => {
                self.cursor = (self.cursor + self.upgrades.len() as u8 - 1) % self.upgrades.len() as u8;
                true
            }
            (Phase::LevelUpChoice, Command::CursorDown) => {
                self.cursor = (self.cursor + 1) % self.upgrades.len() as u8;
                true
            }
            (Phase::LevelUpChoice, Command::Confirm) => {
                self.pick_upgrade(self.cursor as usize);
                true
            }
            (Phase::LevelUpChoice, Command::Choose(i)) if (i as usize) < self.upgrades.len() => {
                self.pick_upgrade(i as usize);
                true
            }
            (Phase::ChoiceEvent, Command::CursorUp) => {
                self.cursor = 0;
                true
            }
            (Phase::ChoiceEvent, Command::CursorDown) => {
                self.cursor = 1;
                true
            }
            (Phase::ChoiceEvent, Command::Confirm) => {
                self.pick_choice(self.cursor as usize);
                true
            }
            (Phase::ChoiceEvent, Command::Choose(i)) if i < 2 => {
                self.pick_choice(i as usize);
                true
            }
            (Phase::NarrativeEvent, Command::Confirm) => {
                self.road_event = None;
                self.switch(Phase::Exploration);
                true
            }
            (Phase::Paused, Command::Pause) => {
                self.switch(self.paused_from);
                true
            }
            (Phase::Exploration | Phase::PuzzleCombat, Command::Pause) => {
                self.paused_from = self.phase;
                self.switch(Phase::Paused);
                true
            }
            (Phase::Exploration | Phase::PuzzleCombat, cmd) => {
                self.playfield.apply_command(cmd, &mut self.rng)
            }
            _ => false,
        }
    }

    fn pick_upgrade(&mut self, index: usize) {
        let upgrade = self.upgrades[index];
        upgrade.apply(&mut self.hero);
        self.hero.level_up(&self.balance);
        info!("level {}: {}", self.hero.level, upgrade.label());
        self.events.push(GameEvent::LevelUp {
            level: self.hero.level,
        });
        if self.hero.exp >= self.hero.required_exp(&self.balance) {
            self.offer_upgrades();
        } else {
            self.switch(Phase::Exploration);
        }
    }

    fn pick_choice(&mut self, option: usize) {
        if let Some(event) = self.choice_event.take() {
            event.apply(option, &mut self.hero, &mut self.rng);
            debug!("{}: picked {}", event.name(), event.options()[option.min(1)]);
        }
        self.switch(Phase::Exploration);
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let mut snapshot = SessionSnapshot::default();
        self.snapshot_into(&mut snapshot);
        snapshot
    }

    /// Refresh `out` in place, reusing its buffers.
    pub fn snapshot_into(&self, out: &mut SessionSnapshot) {
        let pf = &self.playfield;
        pf.board().write_u8_grid(&mut out.board);
        out.active = pf.active().map(|piece| ActiveSnapshot {
            kind: piece.kind,
            rotation: piece.rotation,
            x: piece.x,
            y: piece.y,
            shape: piece.shape(),
        });
        out.ghost_y = pf.ghost_y();
        out.lock_progress = pf.lock_progress();
        out.clearing_rows.clear();
        if let Some(clear) = pf.clear_state() {
            out.clearing_rows.extend_from_slice(&clear.rows);
        }
        out.hold = pf.hold_piece();
        out.can_hold = pf.can_hold();
        out.next_queue = *pf.next_queue();
        out.score = pf.score();
        out.lines = pf.lines();

        out.phase = self.phase;
        out.phase_timer_ms = self.phase_timer_ms;
        out.battle_time_left_ms = self.battle_time_left_ms;
        out.battle_lines = self.battle_lines;
        out.pending_garbage = self.pending_garbage;

        out.battle = self.round.as_ref().map(|round| {
            let mut battle = BattleSnapshot {
                round: round.round,
                budget: round.budget,
                buff_atk: round.buff_atk,
                buff_def: round.buff_def,
                special_ready: round.special_ready,
                special_used: round.special_used,
                charge: round.charge_progress(&self.balance),
                damage_taken: round.damage_taken,
                ..BattleSnapshot::default()
            };
            battle.set_state(round.state());
            battle
        });
        out.enemy = self.enemy.as_ref().map(|enemy| EnemySnapshot {
            name: enemy.kind.as_str(),
            hp: enemy.hp,
            max_hp: enemy.max_hp,
            atk: enemy.atk,
            def: enemy.def,
            boss: enemy.is_boss(),
        });
        let (buff_atk, buff_def) = self
            .round
            .as_ref()
            .map(|r| (r.buff_atk, r.buff_def))
            .unwrap_or((0, 0));
        out.hero = HeroSnapshot {
            level: self.hero.level,
            exp: self.hero.exp,
            required_exp: self.hero.required_exp(&self.balance),
            atk: self.hero.atk(buff_atk, &self.balance),
            def: self.hero.def(buff_def),
            zone: self.hero.zone,
            kills: self.hero.kills,
            distance_m: self.hero.distance_m,
            encounter_distance_m: self.balance.encounter_distance,
            drop_debuff: self.hero.drop_debuff,
        };

        out.prompt = None;
        out.detail = None;
        out.options.clear();
        out.cursor = self.cursor;
        match self.phase {
            Phase::LevelUpChoice => {
                out.prompt = Some("Level up! Choose an upgrade");
                out.options.extend(self.upgrades.iter().map(|u| u.label()));
            }
            Phase::ChoiceEvent => {
                if let Some(event) = self.choice_event {
                    out.prompt = Some(event.name());
                    out.options.extend(event.options());
                }
            }
            Phase::NarrativeEvent => {
                if let Some(event) = self.road_event {
                    out.prompt = Some(event.name());
                    out.detail = Some(event.effect());
                }
            }
            _ => {}
        }

        out.victory = self.last_victory;
        out.ranking.clear();
        out.ranking.extend_from_slice(self.ranking.entries());
        out.last_rank = self.last_rank;
    }
}
