//! Pieces tests - shape tables and kick resolution

use tetris_quest::core::pieces::{get_shape, spawn_width, KICKS};
use tetris_quest::core::try_rotate;
use tetris_quest::types::{PieceKind, RotationDir};

#[test]
fn test_every_shape_has_four_distinct_cells() {
    for kind in PieceKind::ALL {
        for rotation in 0..kind.rotation_states() {
            let shape = get_shape(kind, rotation);
            for i in 0..4 {
                for j in i + 1..4 {
                    assert_ne!(shape[i], shape[j], "{:?} r{}", kind, rotation);
                }
            }
        }
    }
}

#[test]
fn test_rotation_index_wraps() {
    assert_eq!(get_shape(PieceKind::I, 2), get_shape(PieceKind::I, 0));
    assert_eq!(get_shape(PieceKind::T, 5), get_shape(PieceKind::T, 1));
    assert_eq!(get_shape(PieceKind::O, 3), get_shape(PieceKind::O, 0));
}

#[test]
fn test_spawn_widths() {
    assert_eq!(spawn_width(PieceKind::I), 4);
    assert_eq!(spawn_width(PieceKind::O), 2);
    assert_eq!(spawn_width(PieceKind::T), 3);
}

#[test]
fn test_o_never_rotates() {
    assert_eq!(
        try_rotate(PieceKind::O, 0, 3, 5, RotationDir::Cw, |_, _| false),
        None
    );
}

#[test]
fn test_open_rotation_uses_no_kick() {
    assert_eq!(
        try_rotate(PieceKind::T, 0, 3, 5, RotationDir::Cw, |_, _| false),
        Some((1, (0, 0)))
    );
    assert_eq!(
        try_rotate(PieceKind::J, 0, 3, 5, RotationDir::Ccw, |_, _| false),
        Some((3, (0, 0)))
    );
}

#[test]
fn test_kicks_are_tried_in_order() {
    // Block column 3 so the vertical I must shift; left is tried before right.
    let blocked = |x: i8, _y: i8| x == 3;
    assert_eq!(
        try_rotate(PieceKind::I, 0, 3, 5, RotationDir::Cw, blocked),
        Some((1, KICKS[1]))
    );
}

#[test]
fn test_wall_kick_off_right_edge() {
    // A vertical I against the right wall turning flat must move left twice.
    let blocked = |x: i8, _y: i8| !(0..8).contains(&x);
    assert_eq!(
        try_rotate(PieceKind::I, 1, 6, 5, RotationDir::Cw, blocked),
        Some((0, (-2, 0)))
    );
}

#[test]
fn test_fully_blocked_rotation_fails() {
    assert_eq!(
        try_rotate(PieceKind::T, 0, 3, 5, RotationDir::Cw, |_, _| true),
        None
    );
}
