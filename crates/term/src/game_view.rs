//! GameView: maps a `SessionSnapshot` into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.
//!
//! Only the visible rows of the board are drawn; the hidden spawn buffer is
//! off screen. The side panel carries the puzzle stats, the hero, and during
//! a fight the enemy and the current battle round.

use crate::core::SessionSnapshot;
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{PieceKind, Phase, BOARD_WIDTH, HIDDEN_ROWS, VISIBLE_ROWS};

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorY {
    Center,
    Top,
}

const PLAY_BG: Rgb = Rgb::new(30, 30, 40);
const LABEL: CellStyle = CellStyle::fg(Rgb::new(220, 220, 220)).bold();
const VALUE: CellStyle = CellStyle::fg(Rgb::new(200, 200, 200));
const BORDER: CellStyle = CellStyle::fg(Rgb::new(200, 200, 200));
const HP_FILL: CellStyle = CellStyle::fg(Rgb::new(220, 70, 70));
const GAUGE_FILL: CellStyle = CellStyle::fg(Rgb::new(90, 180, 240));
const GAUGE_EMPTY: CellStyle = CellStyle::fg(Rgb::new(70, 70, 80));
const HIGHLIGHT: CellStyle = CellStyle::fg(Rgb::new(255, 220, 100)).bold();

/// Terminal renderer for a session.
pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: u16,
    /// Board cell height in terminal rows.
    cell_h: u16,
    anchor_y: AnchorY,
}

impl Default for GameView {
    fn default() -> Self {
        // 2x1 helps compensate for typical terminal glyph aspect ratio.
        Self {
            cell_w: 2,
            cell_h: 1,
            anchor_y: AnchorY::Center,
        }
    }
}

/// Where the board frame landed on screen.
#[derive(Debug, Clone, Copy)]
struct Frame {
    x: u16,
    y: u16,
    w: u16,
    h: u16,
}

impl GameView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w,
            cell_h,
            anchor_y: AnchorY::Center,
        }
    }

    pub fn with_anchor_y(mut self, anchor_y: AnchorY) -> Self {
        self.anchor_y = anchor_y;
        self
    }

    /// Size of the bordered board frame in terminal cells.
    pub fn frame_size(&self) -> (u16, u16) {
        (
            BOARD_WIDTH as u16 * self.cell_w + 2,
            VISIBLE_ROWS as u16 * self.cell_h + 2,
        )
    }

    /// Render into an existing framebuffer.
    ///
    /// Callers can reuse a framebuffer across frames and only resize when
    /// the terminal size changes.
    pub fn render_into(&self, snap: &SessionSnapshot, viewport: Viewport, fb: &mut FrameBuffer) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().cell(' '));

        match snap.phase {
            Phase::Title => {
                self.draw_title(fb, viewport);
                return;
            }
            Phase::Ranking => {
                self.draw_ranking(fb, snap, viewport);
                return;
            }
            _ => {}
        }

        let (w, h) = self.frame_size();
        let frame = Frame {
            x: viewport.width.saturating_sub(w) / 2,
            y: match self.anchor_y {
                AnchorY::Center => viewport.height.saturating_sub(h) / 2,
                AnchorY::Top => 0,
            },
            w,
            h,
        };

        self.draw_board(fb, snap, frame);
        self.draw_side_panel(fb, snap, viewport, frame);
        self.draw_overlay(fb, snap, frame);
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &SessionSnapshot, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, viewport, &mut fb);
        fb
    }

    fn draw_board(&self, fb: &mut FrameBuffer, snap: &SessionSnapshot, frame: Frame) {
        let bg = CellStyle {
            fg: Rgb::new(80, 80, 90),
            bg: PLAY_BG,
            bold: false,
            dim: false,
        };
        fb.fill_rect(frame.x + 1, frame.y + 1, frame.w - 2, frame.h - 2, ' ', bg);
        self.draw_border(fb, frame, BORDER);

        for y in HIDDEN_ROWS as usize..snap.board.len() {
            let clearing = snap.clearing_rows.contains(&y);
            for x in 0..BOARD_WIDTH as usize {
                match snap.board[y][x] {
                    0 => self.draw_empty_cell(fb, frame, x as i8, y as i8),
                    _ if clearing => {
                        let flash = CellStyle {
                            fg: Rgb::new(255, 255, 255),
                            bg: PLAY_BG,
                            bold: true,
                            dim: false,
                        };
                        self.fill_cell_rect(fb, frame, x as i8, y as i8, '▓', flash);
                    }
                    code => self.draw_board_cell(fb, frame, x as i8, y as i8, code),
                }
            }
        }

        let Some(active) = snap.active else {
            return;
        };
        // The ghost only shows while the piece takes input.
        if let Some(ghost_y) = snap.ghost_y.filter(|_| snap.playable()) {
            let ghost = CellStyle {
                fg: Rgb::new(140, 140, 140),
                bg: PLAY_BG,
                bold: false,
                dim: true,
            };
            for &(dx, dy) in active.shape.iter() {
                self.fill_cell_rect(fb, frame, active.x + dx, ghost_y + dy, '░', ghost);
            }
        }
        let code = piece_code(active.kind);
        for (x, y) in active.cells() {
            self.draw_board_cell(fb, frame, x, y, code);
        }
    }

    fn draw_border(&self, fb: &mut FrameBuffer, frame: Frame, style: CellStyle) {
        let Frame { x, y, w, h } = frame;
        if w < 2 || h < 2 {
            return;
        }

        fb.put_char(x, y, '┌', style);
        fb.put_char(x + w - 1, y, '┐', style);
        fb.put_char(x, y + h - 1, '└', style);
        fb.put_char(x + w - 1, y + h - 1, '┘', style);

        for dx in 1..w - 1 {
            fb.put_char(x + dx, y, '─', style);
            fb.put_char(x + dx, y + h - 1, '─', style);
        }
        for dy in 1..h - 1 {
            fb.put_char(x, y + dy, '│', style);
            fb.put_char(x + w - 1, y + dy, '│', style);
        }
    }

    fn draw_empty_cell(&self, fb: &mut FrameBuffer, frame: Frame, x: i8, y: i8) {
        let style = CellStyle {
            fg: Rgb::new(90, 90, 100),
            bg: PLAY_BG,
            bold: false,
            dim: true,
        };
        self.fill_cell_rect(fb, frame, x, y, '·', style);
    }

    fn draw_board_cell(&self, fb: &mut FrameBuffer, frame: Frame, x: i8, y: i8, code: u8) {
        let style = CellStyle {
            fg: cell_color(code),
            bg: PLAY_BG,
            bold: true,
            dim: false,
        };
        let ch = if code == GARBAGE_CODE { '▒' } else { '█' };
        self.fill_cell_rect(fb, frame, x, y, ch, style);
    }

    /// Fill one board cell given in board coordinates; hidden rows are skipped.
    fn fill_cell_rect(&self, fb: &mut FrameBuffer, frame: Frame, x: i8, y: i8, ch: char, style: CellStyle) {
        if x < 0 || x >= BOARD_WIDTH as i8 || y < HIDDEN_ROWS as i8 {
            return;
        }
        let row = (y - HIDDEN_ROWS as i8) as u16;
        if row >= VISIBLE_ROWS as u16 {
            return;
        }
        let px = frame.x + 1 + x as u16 * self.cell_w;
        let py = frame.y + 1 + row * self.cell_h;
        fb.fill_rect(px, py, self.cell_w, self.cell_h, ch, style);
    }

    fn draw_side_panel(&self, fb: &mut FrameBuffer, snap: &SessionSnapshot, viewport: Viewport, frame: Frame) {
        let panel_x = frame.x.saturating_add(frame.w).saturating_add(2);
        if panel_x >= viewport.width {
            return;
        }
        let panel_w = viewport.width - panel_x;
        if panel_w < 14 {
            return;
        }
        let gauge_w = (panel_w - 2).min(16);
        let hero = &snap.hero;

        let mut y = frame.y;
        let stat = |fb: &mut FrameBuffer, y: &mut u16, label: &str, value: u32| {
            let x = fb.put_str(panel_x, *y, label, LABEL);
            fb.put_u32(x + 1, *y, value, VALUE);
            *y = y.saturating_add(1);
        };

        stat(fb, &mut y, "SCORE", snap.score);
        stat(fb, &mut y, "LINES", snap.lines);
        let x = fb.put_str(panel_x, y, "HOLD", LABEL);
        let hold_style = if snap.can_hold { VALUE } else { VALUE.dim() };
        fb.put_str(x + 1, y, snap.hold.map(|k| k.letter()).unwrap_or("-"), hold_style);
        y += 1;
        let mut x = fb.put_str(panel_x, y, "NEXT", LABEL) + 1;
        for kind in snap.next_queue {
            x = fb.put_str(x, y, kind.letter(), VALUE) + 1;
        }
        y += 2;

        stat(fb, &mut y, "LV", hero.level);
        let x = fb.put_str(panel_x, y, "EXP", LABEL);
        let x = fb.put_u32(x + 1, y, hero.exp, VALUE);
        let x = fb.put_str(x, y, "/", VALUE);
        fb.put_u32(x, y, hero.required_exp, VALUE);
        y += 1;
        let x = fb.put_str(panel_x, y, "ATK", LABEL);
        let x = fb.put_u32(x + 1, y, hero.atk, VALUE);
        let x = fb.put_str(x + 1, y, "DEF", LABEL);
        fb.put_u32(x + 1, y, hero.def, VALUE);
        y += 1;
        let x = fb.put_str(panel_x, y, "ZONE", LABEL);
        let x = fb.put_u32(x + 1, y, hero.zone, VALUE);
        let x = fb.put_str(x + 1, y, "KILLS", LABEL);
        fb.put_u32(x + 1, y, hero.kills, VALUE);
        y += 1;
        if hero.drop_debuff > 0 {
            let x = fb.put_str(panel_x, y, "SPEED+", HP_FILL);
            fb.put_u32(x, y, hero.drop_debuff, HP_FILL);
            y += 1;
        }
        y += 1;

        match snap.phase {
            Phase::Exploration => {
                fb.put_str(panel_x, y, "WALKING", LABEL);
                y += 1;
                let permille = (hero.distance_m.min(hero.encounter_distance_m) as u64 * 1000
                    / hero.encounter_distance_m.max(1) as u64) as u16;
                fb.put_bar(panel_x, y, gauge_w, permille, GAUGE_FILL, GAUGE_EMPTY);
                y += 1;
                let x = fb.put_u32(panel_x, y, hero.distance_m, VALUE);
                let x = fb.put_str(x, y, "m / ", VALUE);
                let x = fb.put_u32(x, y, hero.encounter_distance_m, VALUE);
                fb.put_str(x, y, "m", VALUE);
                y += 1;
            }
            Phase::PuzzleCombat => {
                let x = fb.put_str(panel_x, y, "TIME", LABEL);
                fb.put_u32(x + 1, y, snap.battle_time_left_ms.div_ceil(1000), VALUE);
                y += 1;
                let x = fb.put_str(panel_x, y, "ATTACKS", LABEL);
                fb.put_u32(x + 1, y, snap.battle_lines, VALUE);
                y += 1;
            }
            _ => {}
        }
        if snap.pending_garbage > 0 {
            let x = fb.put_str(panel_x, y, "GARBAGE", HP_FILL);
            fb.put_u32(x + 1, y, snap.pending_garbage, HP_FILL);
            y += 1;
        }

        if let Some(enemy) = snap.enemy {
            y += 1;
            let style = if enemy.boss { HIGHLIGHT } else { LABEL };
            fb.put_str(panel_x, y, enemy.name, style);
            y += 1;
            let permille = (enemy.hp as u64 * 1000 / enemy.max_hp.max(1) as u64) as u16;
            fb.put_bar(panel_x, y, gauge_w, permille, HP_FILL, GAUGE_EMPTY);
            y += 1;
            let x = fb.put_u32(panel_x, y, enemy.hp, VALUE);
            let x = fb.put_str(x, y, "/", VALUE);
            fb.put_u32(x, y, enemy.max_hp, VALUE);
            y += 1;
        }

        if let Some(battle) = snap.battle {
            let x = fb.put_str(panel_x, y, "ROUND", LABEL);
            fb.put_u32(x + 1, y, battle.round, VALUE);
            y += 1;
            let x = fb.put_str(panel_x, y, "ATTACKS", LABEL);
            fb.put_u32(x + 1, y, battle.budget, VALUE);
            y += 1;
            let x = fb.put_str(panel_x, y, "BUFF +", LABEL);
            let x = fb.put_u32(x, y, battle.buff_atk, VALUE);
            let x = fb.put_str(x, y, "/+", VALUE);
            fb.put_u32(x, y, battle.buff_def, VALUE);
            y += 1;
            if battle.charging {
                fb.put_str(panel_x, y, "CHARGING", HIGHLIGHT);
                y += 1;
                fb.put_bar(panel_x, y, gauge_w, battle.charge, HIGHLIGHT, GAUGE_EMPTY);
            } else if battle.special_ready && !battle.special_used {
                fb.put_str(panel_x, y, "SPECIAL READY", HIGHLIGHT);
            }
        }
    }

    fn draw_overlay(&self, fb: &mut FrameBuffer, snap: &SessionSnapshot, frame: Frame) {
        let mid = frame.y.saturating_add(frame.h / 2);
        match snap.phase {
            Phase::Paused => self.draw_centered(fb, frame, mid, "PAUSED", HIGHLIGHT),
            Phase::GameOver => {
                self.draw_centered(fb, frame, mid.saturating_sub(1), "GAME OVER", HIGHLIGHT);
                self.draw_centered(fb, frame, mid + 1, "Enter", VALUE);
            }
            Phase::Encounter => {
                let name = snap.enemy.map(|e| e.name).unwrap_or("?");
                self.draw_centered(fb, frame, mid.saturating_sub(1), name, HIGHLIGHT);
                self.draw_centered(fb, frame, mid, "appears!", LABEL);
            }
            Phase::AutoBattle => {
                let text = match snap.battle {
                    Some(b) if b.victory => "VICTORY",
                    _ => "AUTO BATTLE",
                };
                self.draw_centered(fb, frame, frame.y + 1, text, HIGHLIGHT);
            }
            Phase::BattleResult => {
                self.draw_centered(fb, frame, mid.saturating_sub(2), "VICTORY", HIGHLIGHT);
                if let Some(v) = snap.victory {
                    let cx = frame.x + 3;
                    let x = fb.put_str(cx, mid, "ATK +", VALUE);
                    let x = fb.put_u32(x, mid, v.reward_atk, VALUE);
                    let x = fb.put_str(x + 1, mid, "DEF +", VALUE);
                    fb.put_u32(x, mid, v.reward_def, VALUE);
                    if v.fast_kill {
                        self.draw_centered(fb, frame, mid + 1, "fast kill", LABEL);
                    }
                    if v.zone_up {
                        self.draw_centered(fb, frame, mid + 2, "next zone!", HIGHLIGHT);
                    }
                }
            }
            Phase::LevelUpChoice | Phase::ChoiceEvent | Phase::NarrativeEvent => {
                self.draw_menu(fb, snap, frame)
            }
            _ => {}
        }
    }

    fn draw_menu(&self, fb: &mut FrameBuffer, snap: &SessionSnapshot, frame: Frame) {
        let top = frame.y + 2;
        let box_style = CellStyle {
            fg: Rgb::new(220, 220, 220),
            bg: Rgb::new(10, 10, 20),
            bold: false,
            dim: false,
        };
        let rows = 4 + 2 * snap.options.len() as u16;
        fb.fill_rect(frame.x + 1, top, frame.w - 2, rows, ' ', box_style);
        if let Some(prompt) = snap.prompt {
            fb.put_str(frame.x + 2, top + 1, prompt, HIGHLIGHT);
        }
        if let Some(detail) = snap.detail {
            fb.put_str(frame.x + 2, top + 2, detail, LABEL);
        }
        for (i, option) in snap.options.iter().enumerate() {
            let y = top + 3 + 2 * i as u16;
            let selected = i as u8 == snap.cursor;
            let marker = if selected { '>' } else { ' ' };
            let style = if selected { HIGHLIGHT } else { VALUE };
            fb.put_char(frame.x + 2, y, marker, style);
            fb.put_u32(frame.x + 3, y, i as u32 + 1, style);
            fb.put_str(frame.x + 5, y, option, style);
        }
    }

    fn draw_centered(&self, fb: &mut FrameBuffer, frame: Frame, y: u16, text: &str, style: CellStyle) {
        let text_w = text.chars().count() as u16;
        let x = frame.x.saturating_add(frame.w.saturating_sub(text_w) / 2);
        fb.put_str(x, y, text, style);
    }

    fn draw_title(&self, fb: &mut FrameBuffer, viewport: Viewport) {
        let lines: [(&str, CellStyle); 4] = [
            ("TETRIS QUEST", HIGHLIGHT),
            ("", VALUE),
            ("Enter  start", VALUE),
            ("R  ranking   Q  quit", VALUE),
        ];
        let y0 = viewport.height.saturating_sub(lines.len() as u16) / 2;
        for (i, (text, style)) in lines.iter().enumerate() {
            let x = viewport.width.saturating_sub(text.chars().count() as u16) / 2;
            fb.put_str(x, y0 + i as u16, text, *style);
        }
    }

    fn draw_ranking(&self, fb: &mut FrameBuffer, snap: &SessionSnapshot, viewport: Viewport) {
        let x0 = viewport.width.saturating_sub(32) / 2;
        let y0 = viewport.height.saturating_sub(snap.ranking.len() as u16 + 4) / 2;
        fb.put_str(x0, y0, "RANKING", HIGHLIGHT);
        fb.put_str(x0, y0 + 1, "#   SCORE   ZONE KILLS LV", LABEL);
        if snap.ranking.is_empty() {
            fb.put_str(x0, y0 + 2, "no runs yet", VALUE.dim());
        }
        for (i, entry) in snap.ranking.iter().enumerate() {
            let y = y0 + 2 + i as u16;
            let style = if i + 1 == snap.last_rank { HIGHLIGHT } else { VALUE };
            fb.put_u32(x0, y, i as u32 + 1, style);
            fb.put_u32(x0 + 4, y, entry.score, style);
            fb.put_u32(x0 + 12, y, entry.zone, style);
            fb.put_u32(x0 + 17, y, entry.kills, style);
            fb.put_u32(x0 + 23, y, entry.level, style);
        }
        let y = y0 + 3 + snap.ranking.len().max(1) as u16;
        fb.put_str(x0, y, "Enter  back", VALUE.dim());
    }
}

const GARBAGE_CODE: u8 = 8;

fn piece_code(kind: PieceKind) -> u8 {
    match kind {
        PieceKind::I => 1,
        PieceKind::O => 2,
        PieceKind::T => 3,
        PieceKind::S => 4,
        PieceKind::Z => 5,
        PieceKind::J => 6,
        PieceKind::L => 7,
    }
}

fn cell_color(code: u8) -> Rgb {
    match code {
        1 => Rgb::new(80, 220, 220),
        2 => Rgb::new(240, 220, 80),
        3 => Rgb::new(200, 120, 220),
        4 => Rgb::new(100, 220, 120),
        5 => Rgb::new(220, 80, 80),
        6 => Rgb::new(80, 120, 220),
        7 => Rgb::new(255, 165, 0),
        _ => Rgb::new(120, 120, 120),
    }
}
