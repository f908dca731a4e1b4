//! Board tests - grid access, row removal, garbage injection

use tetris_quest::core::board::cell_code;
use tetris_quest::core::Board;
use tetris_quest::types::{CellTag, PieceKind, BOARD_HEIGHT, BOARD_WIDTH, HIDDEN_ROWS};

fn fill_row(board: &mut Board, y: i8, holes: &[i8]) {
    for x in 0..BOARD_WIDTH as i8 {
        if !holes.contains(&x) {
            board.set(x, y, Some(CellTag::Piece(PieceKind::O)));
        }
    }
}

#[test]
fn test_board_new_empty() {
    let board = Board::new();
    assert_eq!(board.width(), BOARD_WIDTH);
    assert_eq!(board.height(), BOARD_HEIGHT);

    for y in 0..BOARD_HEIGHT as i8 {
        for x in 0..BOARD_WIDTH as i8 {
            assert_eq!(board.get(x, y), Some(None), "cell ({}, {})", x, y);
        }
    }
    assert_eq!(board.occupied_count(), 0);
    assert_eq!(board.stack_height(), 0);
}

#[test]
fn test_board_get_out_of_bounds() {
    let board = Board::new();
    assert_eq!(board.get(-1, 0), None);
    assert_eq!(board.get(0, -1), None);
    assert_eq!(board.get(BOARD_WIDTH as i8, 0), None);
    assert_eq!(board.get(0, BOARD_HEIGHT as i8), None);
}

#[test]
fn test_collision_edges() {
    let board = Board::new();
    assert!(board.is_blocked(-1, 5));
    assert!(board.is_blocked(BOARD_WIDTH as i8, 5));
    assert!(board.is_blocked(3, BOARD_HEIGHT as i8));
    // Above the board is open for movement but solid for corner checks.
    assert!(!board.is_blocked(3, -1));
    assert!(board.is_solid(3, -1));
}

#[test]
fn test_full_rows_listed_top_to_bottom() {
    let mut board = Board::new();
    fill_row(&mut board, 21, &[]);
    fill_row(&mut board, 19, &[]);
    fill_row(&mut board, 20, &[4]);
    assert_eq!(board.full_rows().as_slice(), &[19, 21]);
}

#[test]
fn test_remove_rows_shifts_down() {
    let mut board = Board::new();
    fill_row(&mut board, 21, &[]);
    fill_row(&mut board, 20, &[0]);
    fill_row(&mut board, 19, &[]);
    board.set(5, 18, Some(CellTag::Garbage));

    assert_eq!(board.remove_rows(&[19, 21]), 2);
    // Row 20 drops to 21, the lone cell at 18 drops to 20.
    assert!(!board.is_occupied(0, 21));
    assert!(board.is_occupied(1, 21));
    assert!(board.is_occupied(5, 20));
    assert_eq!(board.occupied_count(), 8);
    assert!(board.full_rows().is_empty());
}

#[test]
fn test_garbage_row_pushes_from_bottom() {
    let mut board = Board::new();
    board.set(2, 21, Some(CellTag::Piece(PieceKind::T)));
    board.push_garbage_row(6);

    assert_eq!(board.get(2, 20), Some(Some(CellTag::Piece(PieceKind::T))));
    for x in 0..BOARD_WIDTH as i8 {
        let expected = if x == 6 { None } else { Some(CellTag::Garbage) };
        assert_eq!(board.get(x, 21), Some(expected));
    }
}

#[test]
fn test_hidden_buffer_detection() {
    let mut board = Board::new();
    board.set(0, HIDDEN_ROWS as i8, Some(CellTag::Garbage));
    assert!(!board.hidden_buffer_occupied());
    board.set(0, HIDDEN_ROWS as i8 - 1, Some(CellTag::Garbage));
    assert!(board.hidden_buffer_occupied());
}

#[test]
fn test_place_reports_clipping() {
    let mut board = Board::new();
    let clipped = board.place(&[(0, -1), (0, 0), (1, 0), (2, 0)], CellTag::Piece(PieceKind::L));
    assert!(clipped);
    assert_eq!(board.occupied_count(), 3);
}

#[test]
fn test_u8_grid_codes() {
    let mut board = Board::new();
    board.set(0, 21, Some(CellTag::Piece(PieceKind::I)));
    board.set(1, 21, Some(CellTag::Garbage));
    let mut grid = [[0u8; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize];
    board.write_u8_grid(&mut grid);
    assert_eq!(grid[21][0], cell_code(Some(CellTag::Piece(PieceKind::I))));
    assert_eq!(grid[21][1], 8);
    assert_eq!(grid[21][2], 0);
}
