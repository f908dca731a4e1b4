//! Enemy roster - base stats, behaviour flags, and encounter selection
//!
//! Behaviour is a fixed table of orthogonal flags per kind; the battle
//! resolver checks flags, never names.

use crate::balance::Balance;
use crate::rng::RandomSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnemyKind {
    Slime,
    Goblin,
    Skeleton,
    Zombie,
    DarkMage,
    Dragon,
}

/// Behaviour flags carried by an enemy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EnemyTraits {
    /// Short attack interval. Informational; the interval itself encodes it.
    pub fast: bool,
    /// High base defense. Informational.
    pub high_def: bool,
    /// Heals from damage it receives.
    pub lifesteal: bool,
    /// Occasionally ignores defense with a stronger hit.
    pub magic: bool,
    /// Occasionally queues extra garbage for the next puzzle-combat phase.
    pub breath: bool,
    pub boss: bool,
}

impl EnemyTraits {
    const NONE: EnemyTraits = EnemyTraits {
        fast: false,
        high_def: false,
        lifesteal: false,
        magic: false,
        breath: false,
        boss: false,
    };
}

/// Unscaled stats for one kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnemyBase {
    pub hp: u32,
    pub atk: u32,
    pub def: u32,
    pub interval_ms: u32,
    pub traits: EnemyTraits,
}

/// Encounters 1-2.
const EARLY_POOL: [EnemyKind; 2] = [EnemyKind::Slime, EnemyKind::Goblin];
/// Encounter 3.
const MID_POOL: [EnemyKind; 3] = [EnemyKind::Slime, EnemyKind::Goblin, EnemyKind::Skeleton];
/// Encounter 4 onwards.
const LATE_POOL: [EnemyKind; 5] = [
    EnemyKind::Slime,
    EnemyKind::Goblin,
    EnemyKind::Skeleton,
    EnemyKind::Zombie,
    EnemyKind::DarkMage,
];

impl EnemyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnemyKind::Slime => "slime",
            EnemyKind::Goblin => "goblin",
            EnemyKind::Skeleton => "skeleton",
            EnemyKind::Zombie => "zombie",
            EnemyKind::DarkMage => "dark mage",
            EnemyKind::Dragon => "dragon",
        }
    }

    pub fn base(&self) -> EnemyBase {
        let none = EnemyTraits::NONE;
        match self {
            EnemyKind::Slime => EnemyBase {
                hp: 60,
                atk: 6,
                def: 0,
                interval_ms: 1500,
                traits: none,
            },
            EnemyKind::Goblin => EnemyBase {
                hp: 80,
                atk: 5,
                def: 0,
                interval_ms: 700,
                traits: EnemyTraits { fast: true, ..none },
            },
            EnemyKind::Skeleton => EnemyBase {
                hp: 120,
                atk: 6,
                def: 4,
                interval_ms: 1500,
                traits: EnemyTraits {
                    high_def: true,
                    ..none
                },
            },
            EnemyKind::Zombie => EnemyBase {
                hp: 150,
                atk: 7,
                def: 1,
                interval_ms: 1800,
                traits: EnemyTraits {
                    lifesteal: true,
                    ..none
                },
            },
            EnemyKind::DarkMage => EnemyBase {
                hp: 180,
                atk: 5,
                def: 0,
                interval_ms: 2000,
                traits: EnemyTraits { magic: true, ..none },
            },
            EnemyKind::Dragon => EnemyBase {
                hp: 500,
                atk: 10,
                def: 3,
                interval_ms: 1200,
                traits: EnemyTraits {
                    breath: true,
                    boss: true,
                    ..none
                },
            },
        }
    }

    /// Regular (non-boss) kinds eligible for the given 1-based encounter number.
    pub fn pool(encounter: u32) -> &'static [EnemyKind] {
        match encounter {
            0..=2 => &EARLY_POOL,
            3 => &MID_POOL,
            _ => &LATE_POOL,
        }
    }
}

/// A live enemy with zone-scaled stats.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enemy {
    pub kind: EnemyKind,
    pub hp: u32,
    pub max_hp: u32,
    pub atk: u32,
    pub def: u32,
    pub interval_ms: u32,
    pub traits: EnemyTraits,
}

impl Enemy {
    /// Scale a kind's base stats for a zone and hero level.
    ///
    /// With `zb = zone - 1`: HP gains a per-zone and a per-level step, ATK and
    /// DEF a per-zone step, and the interval shrinks per zone down to a floor.
    pub fn new(kind: EnemyKind, zone: u32, hero_level: u32, balance: &Balance) -> Self {
        let base = kind.base();
        let zb = zone.saturating_sub(1);
        let max_hp = base.hp
            + balance.zone_hp_step * zb
            + balance.level_hp_step * hero_level.saturating_sub(1);
        let interval_ms = base
            .interval_ms
            .saturating_sub(balance.zone_interval_step_ms * zb)
            .max(balance.enemy_min_interval_ms);
        Self {
            kind,
            hp: max_hp,
            max_hp,
            atk: base.atk + balance.zone_atk_step * zb,
            def: base.def + balance.zone_def_step * zb,
            interval_ms,
            traits: base.traits,
        }
    }

    pub fn is_boss(&self) -> bool {
        self.traits.boss
    }

    pub fn is_defeated(&self) -> bool {
        self.hp == 0
    }

    /// Restore health, never above max. Returns the amount actually restored.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let before = self.hp;
        self.hp = self.hp.saturating_add(amount).min(self.max_hp);
        self.hp - before
    }

    /// Apply damage, flooring health at zero.
    pub fn take_damage(&mut self, amount: u32) {
        self.hp = self.hp.saturating_sub(amount);
    }
}

/// Choose the kind for a 1-based encounter number.
///
/// Every `boss_every`-th encounter is the boss. Otherwise a uniform pick from
/// the encounter's pool, skipping `last` when another candidate exists.
pub fn select_enemy(
    encounter: u32,
    last: Option<EnemyKind>,
    balance: &Balance,
    rng: &mut dyn RandomSource,
) -> EnemyKind {
    if balance.boss_every > 0 && encounter > 0 && encounter % balance.boss_every == 0 {
        return EnemyKind::Dragon;
    }
    let pool = EnemyKind::pool(encounter);
    let mut candidates: Vec<EnemyKind> = pool.iter().copied().filter(|&k| Some(k) != last).collect();
    if candidates.is_empty() {
        candidates = pool.to_vec();
    }
    candidates[rng.next_range(candidates.len() as u32) as usize]
}
