//! Pieces module - shape tables and kick resolution
//!
//! Shapes are listed per rotation state as cell offsets from the piece's
//! top-left anchor. Kinds have one, two, or four states; rotation indices
//! wrap within that count.
//!
//! Every kind shares one ordered kick list: no offset, one-cell side kicks,
//! an upward kick, upward side kicks, then two-cell side kicks.

use crate::types::{PieceKind, RotationDir};

/// Offset of a single cell relative to piece anchor
pub type MinoOffset = (i8, i8);

/// Shape of a piece - 4 cell offsets from piece anchor
pub type PieceShape = [MinoOffset; 4];

/// Kick offsets in the order they are tried.
pub const KICKS: [(i8, i8); 8] = [
    (0, 0),
    (-1, 0),
    (1, 0),
    (0, -1),
    (-1, -1),
    (1, -1),
    (-2, 0),
    (2, 0),
];

const I_SHAPES: [PieceShape; 2] = [
    [(0, 0), (1, 0), (2, 0), (3, 0)],
    [(0, 0), (0, 1), (0, 2), (0, 3)],
];

const O_SHAPES: [PieceShape; 1] = [[(0, 0), (1, 0), (0, 1), (1, 1)]];

const T_SHAPES: [PieceShape; 4] = [
    [(1, 0), (0, 1), (1, 1), (2, 1)],
    [(0, 0), (0, 1), (1, 1), (0, 2)],
    [(0, 0), (1, 0), (2, 0), (1, 1)],
    [(1, 0), (0, 1), (1, 1), (1, 2)],
];

const S_SHAPES: [PieceShape; 2] = [
    [(1, 0), (2, 0), (0, 1), (1, 1)],
    [(0, 0), (0, 1), (1, 1), (1, 2)],
];

const Z_SHAPES: [PieceShape; 2] = [
    [(0, 0), (1, 0), (1, 1), (2, 1)],
    [(1, 0), (0, 1), (1, 1), (0, 2)],
];

const J_SHAPES: [PieceShape; 4] = [
    [(0, 0), (0, 1), (1, 1), (2, 1)],
    [(0, 0), (1, 0), (0, 1), (0, 2)],
    [(0, 0), (1, 0), (2, 0), (2, 1)],
    [(1, 0), (1, 1), (0, 2), (1, 2)],
];

const L_SHAPES: [PieceShape; 4] = [
    [(2, 0), (0, 1), (1, 1), (2, 1)],
    [(0, 0), (0, 1), (0, 2), (1, 2)],
    [(0, 0), (1, 0), (2, 0), (0, 1)],
    [(0, 0), (1, 0), (1, 1), (1, 2)],
];

/// T pivot cell per rotation state (the centre of the T's three-wide bar).
const T_PIVOTS: [(i8, i8); 4] = [(1, 1), (0, 1), (1, 0), (1, 1)];

fn shapes(kind: PieceKind) -> &'static [PieceShape] {
    match kind {
        PieceKind::I => &I_SHAPES,
        PieceKind::O => &O_SHAPES,
        PieceKind::T => &T_SHAPES,
        PieceKind::S => &S_SHAPES,
        PieceKind::Z => &Z_SHAPES,
        PieceKind::J => &J_SHAPES,
        PieceKind::L => &L_SHAPES,
    }
}

/// Get the cell offsets for a piece kind and rotation index.
///
/// The index wraps, so any `u8` is accepted.
pub fn get_shape(kind: PieceKind, rotation: u8) -> PieceShape {
    let table = shapes(kind);
    table[rotation as usize % table.len()]
}

/// Width in cells of the spawn orientation.
pub fn spawn_width(kind: PieceKind) -> i8 {
    get_shape(kind, 0)
        .iter()
        .map(|&(dx, _)| dx)
        .max()
        .unwrap_or(0)
        + 1
}

/// Pivot cell of the T piece for a rotation state; `None` for other kinds.
pub fn t_pivot(kind: PieceKind, rotation: u8) -> Option<(i8, i8)> {
    if kind != PieceKind::T {
        return None;
    }
    Some(T_PIVOTS[rotation as usize % T_PIVOTS.len()])
}

/// Try to rotate a piece through the kick list.
///
/// `is_blocked` answers the collision query for an absolute cell.
/// Returns the new rotation index and the kick offset that fit, or `None`
/// when every offset collides. Single-state kinds never rotate.
pub fn try_rotate(
    kind: PieceKind,
    rotation: u8,
    x: i8,
    y: i8,
    dir: RotationDir,
    is_blocked: impl Fn(i8, i8) -> bool,
) -> Option<(u8, (i8, i8))> {
    let states = kind.rotation_states();
    if states < 2 {
        return None;
    }
    let new_rotation = dir.apply(rotation, states);
    let new_shape = get_shape(kind, new_rotation);

    KICKS
        .iter()
        .copied()
        .find(|&(dx, dy)| {
            new_shape
                .iter()
                .all(|&(mx, my)| !is_blocked(x + dx + mx, y + dy + my))
        })
        .map(|kick| (new_rotation, kick))
}
