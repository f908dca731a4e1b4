//! Playfield integration tests - lock, clear and garbage pipelines

use tetris_quest::core::rng::{RandomSource, SequenceRng, SimpleRng};
use tetris_quest::core::{Board, PieceQueue, Playfield, PuzzleReport, PuzzleRules};
use tetris_quest::types::{CellTag, Command, PieceKind, RotationDir, BOARD_HEIGHT, BOARD_WIDTH};

fn playfield(first: [PieceKind; 3]) -> (Playfield, SequenceRng) {
    let mut rng = SequenceRng::new(vec![2]);
    let mut pf = Playfield::with_queue(PuzzleRules::default(), PieceQueue::from_pieces(first));
    pf.start(&mut rng);
    (pf, rng)
}

fn fill_row(board: &mut Board, y: i8, holes: &[i8]) {
    for x in 0..BOARD_WIDTH as i8 {
        if !holes.contains(&x) {
            board.set(x, y, Some(CellTag::Garbage));
        }
    }
}

#[test]
fn test_four_row_well_clears_with_vertical_i() {
    let (mut pf, mut rng) = playfield([PieceKind::I, PieceKind::O, PieceKind::T]);
    for y in 18..22 {
        fill_row(pf.board_mut(), y, &[0]);
    }
    let height_before = 0;

    assert!(pf.apply_command(Command::RotateCw, &mut rng));
    while pf.apply_command(Command::MoveLeft, &mut rng) {}
    assert_eq!(pf.active().map(|p| p.x), Some(0));
    assert!(pf.apply_command(Command::HardDrop, &mut rng));

    assert!(pf.is_clearing());
    assert_eq!(
        pf.drain_reports().collect::<Vec<_>>(),
        vec![PuzzleReport::Locked {
            full_rows: 4,
            special: false
        }]
    );

    // Nothing spawns and input is ignored while rows animate out.
    assert!(pf.active().is_none());
    assert!(!pf.apply_command(Command::MoveLeft, &mut rng));

    pf.tick(300, 800, &mut rng);
    assert!(!pf.is_clearing());
    assert_eq!(pf.score(), 800);
    assert_eq!(pf.lines(), 4);
    assert_eq!(pf.board().stack_height(), height_before);
    assert!(pf.active().is_some());
    assert_eq!(
        pf.drain_reports().collect::<Vec<_>>(),
        vec![PuzzleReport::Cleared {
            lines: 4,
            score: 800,
            special_bonus: 0
        }]
    );
}

#[test]
fn test_garbage_lifts_piece_instead_of_destroying_it() {
    let (mut pf, mut rng) = playfield([PieceKind::O, PieceKind::O, PieceKind::O]);
    let before = pf.active().unwrap();

    assert!(pf.add_garbage(20, &mut rng));
    let after = pf.active().unwrap();
    assert_eq!(after.kind, before.kind);
    assert_eq!(after.y, 0);
    assert!(!pf.topped_out());

    // The overlap is only judged when the piece next locks.
    pf.apply_command(Command::HardDrop, &mut rng);
    assert!(pf.topped_out());
    let reports: Vec<_> = pf.drain_reports().collect();
    assert_eq!(reports.last(), Some(&PuzzleReport::ToppedOut));
}

#[test]
fn test_garbage_rows_are_capped_at_board_height() {
    let (mut pf, mut rng) = playfield([PieceKind::I, PieceKind::I, PieceKind::I]);
    assert!(pf.add_garbage(100, &mut rng));
    assert_eq!(
        pf.drain_reports().collect::<Vec<_>>(),
        vec![PuzzleReport::GarbageAdded {
            rows: BOARD_HEIGHT
        }]
    );
    assert!(!pf.add_garbage(0, &mut rng));
}

#[test]
fn test_rotation_round_trip_in_open_space() {
    for kind in PieceKind::ALL {
        let (mut pf, _) = playfield([kind, kind, kind]);
        // Clear of the spawn buffer and both walls.
        assert!(pf.try_move(0, 6));
        let start = pf.active().unwrap();
        for dir in [RotationDir::Cw, RotationDir::Ccw] {
            let opposite = match dir {
                RotationDir::Cw => RotationDir::Ccw,
                RotationDir::Ccw => RotationDir::Cw,
            };
            let rotated = pf.try_rotate(dir);
            assert_eq!(rotated, kind != PieceKind::O, "{:?}", kind);
            if rotated {
                assert!(pf.try_rotate(opposite));
            }
            let back = pf.active().unwrap();
            assert_eq!((back.x, back.y, back.rotation), (start.x, start.y, start.rotation));
        }
    }
}

#[test]
fn test_line_clear_keeps_cell_count_consistent() {
    let mut rng = SimpleRng::new(2024);
    for _ in 0..200 {
        let mut board = Board::new();
        for y in 8..BOARD_HEIGHT as i8 {
            let full = rng.chance_percent(40);
            let hole = rng.next_range(BOARD_WIDTH as u32) as i8;
            let holes: &[i8] = if full { &[] } else { &[hole] };
            fill_row(&mut board, y, holes);
        }
        let before = board.occupied_count();
        let rows = board.full_rows();
        let removed = board.remove_rows(&rows);

        assert_eq!(removed, rows.len());
        assert_eq!(board.occupied_count(), before - removed * BOARD_WIDTH as usize);
        assert!(board.full_rows().is_empty());
        for y in 0..removed {
            for x in 0..BOARD_WIDTH as i8 {
                assert!(!board.is_occupied(x, y as i8));
            }
        }
    }
}

#[test]
fn test_soft_drop_and_gravity_share_the_timer() {
    let (mut pf, mut rng) = playfield([PieceKind::T, PieceKind::T, PieceKind::T]);
    let y0 = pf.active().unwrap().y;
    pf.tick(700, 800, &mut rng);
    assert!(pf.apply_command(Command::SoftDrop, &mut rng));
    // The soft drop restarted the gravity timer.
    pf.tick(700, 800, &mut rng);
    assert_eq!(pf.active().unwrap().y, y0 + 1);
    pf.tick(100, 800, &mut rng);
    assert_eq!(pf.active().unwrap().y, y0 + 2);
}
