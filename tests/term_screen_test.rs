use tetris_quest::core::{Balance, Session};
use tetris_quest::term::{GameView, Screen, Viewport};
use tetris_quest::types::{Command, Phase};

const CLEAR_ALL: &str = "\x1b[2J";

fn compose(screen: &mut Screen, session: &Session, viewport: Viewport) -> String {
    String::from_utf8_lossy(screen.compose(session, viewport).unwrap()).into_owned()
}

#[test]
fn first_frame_is_a_full_paint() {
    let session = Session::with_seed(Balance::default(), 1);
    let mut screen = Screen::new(GameView::default());

    let out = compose(&mut screen, &session, Viewport::new(40, 12));
    assert!(out.starts_with(CLEAR_ALL));
    assert!(out.contains("TETRIS QUEST"));
}

#[test]
fn idle_session_sends_nothing_after_the_first_frame() {
    let session = Session::with_seed(Balance::default(), 1);
    let mut screen = Screen::new(GameView::default());
    let viewport = Viewport::new(40, 12);

    compose(&mut screen, &session, viewport);
    assert!(compose(&mut screen, &session, viewport).is_empty());
}

#[test]
fn phase_change_sends_only_changed_spans() {
    let mut session = Session::with_seed(Balance::default(), 1);
    let mut screen = Screen::new(GameView::default());
    let viewport = Viewport::new(60, 22);

    let full = compose(&mut screen, &session, viewport).len();
    assert!(session.command(Command::Confirm));
    assert_eq!(session.phase(), Phase::Exploration);
    let start = compose(&mut screen, &session, viewport);
    assert!(!start.contains(CLEAR_ALL));
    assert!(start.contains("SCORE"));

    // One step sideways only touches the piece cells.
    assert!(session.command(Command::MoveLeft) || session.command(Command::MoveRight));
    let step = compose(&mut screen, &session, viewport);
    assert!(!step.is_empty());
    assert!(step.len() < full);
}

#[test]
fn resize_and_invalidate_force_a_full_paint() {
    let session = Session::with_seed(Balance::default(), 1);
    let mut screen = Screen::new(GameView::default());

    compose(&mut screen, &session, Viewport::new(40, 12));
    assert!(compose(&mut screen, &session, Viewport::new(50, 12)).starts_with(CLEAR_ALL));
    assert!(compose(&mut screen, &session, Viewport::new(50, 12)).is_empty());

    screen.invalidate();
    assert!(compose(&mut screen, &session, Viewport::new(50, 12)).starts_with(CLEAR_ALL));
}
