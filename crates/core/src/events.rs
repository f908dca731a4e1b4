//! Exploration events and level-up upgrades
//!
//! Fixed tables of effects on the [`Hero`]. Effects that push garbage into
//! the puzzle report the row count instead of touching the board, so the
//! phase controller stays the only owner of the queue.

use crate::balance::Balance;
use crate::hero::Hero;
use crate::rng::{shuffle, RandomSource};

/// Number of upgrades offered on level-up.
pub const UPGRADE_CHOICES: usize = 3;

/// Permanent upgrade picked on level-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Upgrade {
    Attack,
    Defense,
    ExpRate,
    ScoreRate,
    Special,
    Haste,
}

impl Upgrade {
    pub const ALL: [Upgrade; 6] = [
        Upgrade::Attack,
        Upgrade::Defense,
        Upgrade::ExpRate,
        Upgrade::ScoreRate,
        Upgrade::Special,
        Upgrade::Haste,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Upgrade::Attack => "ATK +2",
            Upgrade::Defense => "DEF +2",
            Upgrade::ExpRate => "EXP gain +30%",
            Upgrade::ScoreRate => "Battle score +25%",
            Upgrade::Special => "Special damage +20",
            Upgrade::Haste => "Attack interval -0.1s",
        }
    }

    pub fn apply(&self, hero: &mut Hero) {
        match self {
            Upgrade::Attack => hero.perm_atk += 2,
            Upgrade::Defense => hero.perm_def += 2,
            Upgrade::ExpRate => hero.exp_pct += 30,
            Upgrade::ScoreRate => hero.score_pct += 25,
            Upgrade::Special => hero.special_bonus += 20,
            Upgrade::Haste => hero.haste_ms += 100,
        }
    }
}

/// Three distinct upgrades, shuffled from the full table.
pub fn draw_upgrades(rng: &mut dyn RandomSource) -> [Upgrade; UPGRADE_CHOICES] {
    let mut all = Upgrade::ALL;
    shuffle(rng, &mut all);
    [all[0], all[1], all[2]]
}

/// One-shot narrative event, applied as soon as it triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoadEvent {
    Treasure,
    Spring,
    Sword,
    Tome,
    Merchant,
    Sage,
    Smith,
    Pitfall,
    Fog,
    Earthquake,
    Gravity,
}

impl RoadEvent {
    pub const ALL: [RoadEvent; 11] = [
        RoadEvent::Treasure,
        RoadEvent::Spring,
        RoadEvent::Sword,
        RoadEvent::Tome,
        RoadEvent::Merchant,
        RoadEvent::Sage,
        RoadEvent::Smith,
        RoadEvent::Pitfall,
        RoadEvent::Fog,
        RoadEvent::Earthquake,
        RoadEvent::Gravity,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            RoadEvent::Treasure => "Treasure chest",
            RoadEvent::Spring => "Healing spring",
            RoadEvent::Sword => "Abandoned sword",
            RoadEvent::Tome => "Tome of experience",
            RoadEvent::Merchant => "Travelling merchant",
            RoadEvent::Sage => "Old sage",
            RoadEvent::Smith => "Blacksmith",
            RoadEvent::Pitfall => "Pitfall!",
            RoadEvent::Fog => "Cursed fog",
            RoadEvent::Earthquake => "Earthquake!",
            RoadEvent::Gravity => "Gravity anomaly",
        }
    }

    pub fn effect(&self) -> &'static str {
        match self {
            RoadEvent::Treasure => "ATK +1",
            RoadEvent::Spring => "DEF +1",
            RoadEvent::Sword => "ATK +2",
            RoadEvent::Tome => "EXP +30",
            RoadEvent::Merchant => "Score rate +10%",
            RoadEvent::Sage => "EXP rate +15%",
            RoadEvent::Smith => "Special +10",
            RoadEvent::Pitfall => "ATK -1",
            RoadEvent::Fog | RoadEvent::Gravity => "Drop speed up",
            RoadEvent::Earthquake => "Garbage +2",
        }
    }

    /// Apply the effect. Returns garbage rows to queue.
    ///
    /// Experience from the tome is added unscaled and does not trigger a
    /// level-up by itself; the next puzzle reward checks the threshold.
    pub fn apply(&self, hero: &mut Hero) -> u32 {
        match self {
            RoadEvent::Treasure => hero.perm_atk += 1,
            RoadEvent::Spring => hero.perm_def += 1,
            RoadEvent::Sword => hero.perm_atk += 2,
            RoadEvent::Tome => hero.exp += 30,
            RoadEvent::Merchant => hero.score_pct += 10,
            RoadEvent::Sage => hero.exp_pct += 15,
            RoadEvent::Smith => hero.special_bonus += 10,
            RoadEvent::Pitfall => hero.perm_atk = hero.perm_atk.saturating_sub(1),
            RoadEvent::Fog | RoadEvent::Gravity => hero.drop_debuff += 1,
            RoadEvent::Earthquake => return 2,
        }
        0
    }
}

/// Two-option event; the player picks one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChoiceEvent {
    Fork,
    Altar,
    WoundedAdventurer,
}

impl ChoiceEvent {
    pub const ALL: [ChoiceEvent; 3] = [
        ChoiceEvent::Fork,
        ChoiceEvent::Altar,
        ChoiceEvent::WoundedAdventurer,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ChoiceEvent::Fork => "A fork in the road",
            ChoiceEvent::Altar => "A mysterious altar",
            ChoiceEvent::WoundedAdventurer => "A wounded adventurer",
        }
    }

    pub fn options(&self) -> [&'static str; 2] {
        match self {
            ChoiceEvent::Fork => ["Safe path: EXP +20", "Risky path: ATK +2 or ATK -1"],
            ChoiceEvent::Altar => ["Pray: DEF +2, drop speed up", "Ignore it"],
            ChoiceEvent::WoundedAdventurer => ["Help: EXP +40, ATK +1", "Leave: score rate +50%"],
        }
    }

    /// Apply option 0 or 1; anything past the last option picks the last.
    pub fn apply(&self, option: usize, hero: &mut Hero, rng: &mut dyn RandomSource) {
        match (self, option.min(1)) {
            (ChoiceEvent::Fork, 0) => hero.exp += 20,
            (ChoiceEvent::Fork, _) => {
                if rng.chance_percent(70) {
                    hero.perm_atk += 2;
                } else {
                    hero.perm_atk = hero.perm_atk.saturating_sub(1);
                }
            }
            (ChoiceEvent::Altar, 0) => {
                hero.perm_def += 2;
                hero.drop_debuff += 1;
            }
            (ChoiceEvent::Altar, _) => {}
            (ChoiceEvent::WoundedAdventurer, 0) => {
                hero.exp += 40;
                hero.perm_atk += 1;
            }
            (ChoiceEvent::WoundedAdventurer, _) => hero.score_pct += 50,
        }
    }
}

/// What a checkpoint roll produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggeredEvent {
    Road(RoadEvent),
    Choice(ChoiceEvent),
}

/// Roll an exploration checkpoint.
pub fn roll_checkpoint(balance: &Balance, rng: &mut dyn RandomSource) -> Option<TriggeredEvent> {
    if !rng.chance_percent(balance.event_chance_pct) {
        return None;
    }
    if rng.chance_percent(balance.choice_event_pct) {
        let idx = rng.next_range(ChoiceEvent::ALL.len() as u32) as usize;
        Some(TriggeredEvent::Choice(ChoiceEvent::ALL[idx]))
    } else {
        let idx = rng.next_range(RoadEvent::ALL.len() as u32) as usize;
        Some(TriggeredEvent::Road(RoadEvent::ALL[idx]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{SequenceRng, SimpleRng};

    #[test]
    fn test_upgrades_are_distinct() {
        let mut rng = SimpleRng::new(8);
        for _ in 0..50 {
            let picks = draw_upgrades(&mut rng);
            assert_ne!(picks[0], picks[1]);
            assert_ne!(picks[1], picks[2]);
            assert_ne!(picks[0], picks[2]);
        }
    }

    #[test]
    fn test_upgrade_effects() {
        let mut hero = Hero::new();
        for upgrade in Upgrade::ALL {
            upgrade.apply(&mut hero);
        }
        assert_eq!((hero.perm_atk, hero.perm_def), (2, 2));
        assert_eq!((hero.exp_pct, hero.score_pct), (130, 125));
        assert_eq!((hero.special_bonus, hero.haste_ms), (20, 100));
    }

    #[test]
    fn test_pitfall_floors_attack() {
        let mut hero = Hero::new();
        assert_eq!(RoadEvent::Pitfall.apply(&mut hero), 0);
        assert_eq!(hero.perm_atk, 0);
    }

    #[test]
    fn test_earthquake_queues_garbage() {
        let mut hero = Hero::new();
        assert_eq!(RoadEvent::Earthquake.apply(&mut hero), 2);
        assert_eq!(hero, Hero::new());
    }

    #[test]
    fn test_risky_fork_outcomes() {
        let mut hero = Hero::new();
        ChoiceEvent::Fork.apply(1, &mut hero, &mut SequenceRng::new(vec![10]));
        assert_eq!(hero.perm_atk, 2);
        ChoiceEvent::Fork.apply(1, &mut hero, &mut SequenceRng::new(vec![85]));
        assert_eq!(hero.perm_atk, 1);
    }

    #[test]
    fn test_checkpoint_roll_split() {
        let b = Balance::default();
        // pass the 30% roll, fail the 20% choice roll, pick road event 3
        let mut rng = SequenceRng::new(vec![0, 50, 3]);
        assert_eq!(
            roll_checkpoint(&b, &mut rng),
            Some(TriggeredEvent::Road(RoadEvent::Tome))
        );
        let mut rng = SequenceRng::new(vec![0, 0, 1]);
        assert_eq!(
            roll_checkpoint(&b, &mut rng),
            Some(TriggeredEvent::Choice(ChoiceEvent::Altar))
        );
        let mut rng = SequenceRng::new(vec![30]);
        assert_eq!(roll_checkpoint(&b, &mut rng), None);
    }
}
