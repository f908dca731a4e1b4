use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tetris_quest::core::{
    Balance, BattleRound, BattleTick, Board, Enemy, EnemyKind, Hero, Session, SessionSnapshot, SimpleRng,
};
use tetris_quest::term::{FrameBuffer, GameView, Viewport};
use tetris_quest::types::{CellTag, Command, PieceKind};

fn started() -> Session {
    let mut session = Session::with_seed(Balance::default(), 12345);
    session.command(Command::Confirm);
    session
}

fn bench_update(c: &mut Criterion) {
    let mut session = started();

    c.bench_function("session_update_16ms", |b| {
        b.iter(|| {
            session.update(black_box(16));
            session.drain_events().for_each(drop);
        })
    });
}

fn bench_commands(c: &mut Criterion) {
    let mut session = started();

    c.bench_function("move_and_rotate", |b| {
        b.iter(|| {
            session.command(black_box(Command::MoveLeft));
            session.command(black_box(Command::RotateCw));
            session.command(black_box(Command::MoveRight));
        })
    });
}

fn bench_line_clear(c: &mut Criterion) {
    c.bench_function("remove_4_rows", |b| {
        b.iter(|| {
            let mut board = Board::new();
            for y in 18..22 {
                for x in 0..8 {
                    board.set(x, y, Some(CellTag::Piece(PieceKind::I)));
                }
            }
            let rows = board.full_rows();
            board.remove_rows(&rows)
        })
    });
}

fn bench_snapshot(c: &mut Criterion) {
    let session = started();
    let mut snap = SessionSnapshot::default();

    c.bench_function("snapshot_into", |b| {
        b.iter(|| {
            session.snapshot_into(&mut snap);
            black_box(&snap);
        })
    });
}

fn bench_render(c: &mut Criterion) {
    let session = started();
    let snap = session.snapshot();
    let view = GameView::default();
    let viewport = Viewport::new(80, 24);
    let mut fb = FrameBuffer::new(80, 24);

    c.bench_function("render_into_80x24", |b| {
        b.iter(|| {
            view.render_into(black_box(&snap), viewport, &mut fb);
        })
    });
}

fn bench_battle_round(c: &mut Criterion) {
    let balance = Balance::default();
    let hero = Hero::new();

    c.bench_function("battle_round_to_end", |b| {
        b.iter(|| {
            let mut rng = SimpleRng::new(7);
            let mut enemy = Enemy::new(EnemyKind::Goblin, 1, 1, &balance);
            let mut round = BattleRound::start(1, 800, 4, &hero, &enemy, &balance);
            let mut events = Vec::new();
            for _ in 0..1000 {
                let outcome = round.tick(50, &hero, &mut enemy, &balance, &mut rng, &mut events);
                if outcome != BattleTick::Ongoing {
                    break;
                }
            }
            black_box(events.len())
        })
    });
}

criterion_group!(
    benches,
    bench_update,
    bench_commands,
    bench_line_clear,
    bench_snapshot,
    bench_render,
    bench_battle_round
);
criterion_main!(benches);
