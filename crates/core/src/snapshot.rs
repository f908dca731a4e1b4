use crate::battle::BattleState;
use crate::hero::VictoryReport;
use crate::pieces::PieceShape;
use crate::ranking::RankEntry;
use crate::types::{PieceKind, Phase, BOARD_HEIGHT, BOARD_WIDTH, NEXT_QUEUE_LEN};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActiveSnapshot {
    pub kind: PieceKind,
    pub rotation: u8,
    pub x: i8,
    pub y: i8,
    pub shape: PieceShape,
}

impl ActiveSnapshot {
    /// Absolute board cells of the piece.
    pub fn cells(&self) -> [(i8, i8); 4] {
        self.shape.map(|(dx, dy)| (self.x + dx, self.y + dy))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BattleSnapshot {
    pub round: u32,
    pub budget: u32,
    pub buff_atk: u32,
    pub buff_def: u32,
    pub special_ready: bool,
    pub special_used: bool,
    /// Permille of the special charge.
    pub charge: u16,
    pub damage_taken: u32,
    pub charging: bool,
    pub victory: bool,
}

impl BattleSnapshot {
    pub(crate) fn set_state(&mut self, state: BattleState) {
        self.charging = state == BattleState::Charging;
        self.victory = state == BattleState::Victory;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnemySnapshot {
    pub name: &'static str,
    pub hp: u32,
    pub max_hp: u32,
    pub atk: u32,
    pub def: u32,
    pub boss: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HeroSnapshot {
    pub level: u32,
    pub exp: u32,
    pub required_exp: u32,
    pub atk: u32,
    pub def: u32,
    pub zone: u32,
    pub kills: u32,
    pub distance_m: u32,
    pub encounter_distance_m: u32,
    pub drop_debuff: u32,
}

/// Everything a renderer needs for one frame. Pull-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    /// Cell codes, hidden rows included (0 = empty, 1..=7 kinds, 8 = garbage).
    pub board: [[u8; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize],
    pub active: Option<ActiveSnapshot>,
    pub ghost_y: Option<i8>,
    /// Permille of the lock delay.
    pub lock_progress: u16,
    /// Rows currently animating out.
    pub clearing_rows: Vec<usize>,
    pub hold: Option<PieceKind>,
    pub can_hold: bool,
    pub next_queue: [PieceKind; NEXT_QUEUE_LEN],
    pub score: u32,
    pub lines: u32,

    pub phase: Phase,
    pub phase_timer_ms: u32,
    /// Remaining puzzle-combat time.
    pub battle_time_left_ms: u32,
    pub battle_lines: u32,
    pub pending_garbage: u32,

    pub battle: Option<BattleSnapshot>,
    pub enemy: Option<EnemySnapshot>,
    pub hero: HeroSnapshot,

    /// Title of the event or menu on screen, if any.
    pub prompt: Option<&'static str>,
    /// Detail line under the prompt (road event effect).
    pub detail: Option<&'static str>,
    pub options: Vec<&'static str>,
    pub cursor: u8,

    pub victory: Option<VictoryReport>,
    pub ranking: Vec<RankEntry>,
    /// 1-based rank of the run just recorded, 0 when none.
    pub last_rank: usize,
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self {
            board: [[0u8; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize],
            active: None,
            ghost_y: None,
            lock_progress: 0,
            clearing_rows: Vec::new(),
            hold: None,
            can_hold: true,
            next_queue: [PieceKind::I; NEXT_QUEUE_LEN],
            score: 0,
            lines: 0,
            phase: Phase::Title,
            phase_timer_ms: 0,
            battle_time_left_ms: 0,
            battle_lines: 0,
            pending_garbage: 0,
            battle: None,
            enemy: None,
            hero: HeroSnapshot::default(),
            prompt: None,
            detail: None,
            options: Vec::new(),
            cursor: 0,
            victory: None,
            ranking: Vec::new(),
            last_rank: 0,
        }
    }
}

impl SessionSnapshot {
    /// The piece accepts input in this frame.
    pub fn playable(&self) -> bool {
        self.phase.runs_puzzle() && self.active.is_some()
    }
}
