//! Frame production must not touch the heap once buffers are sized.

use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use tetris_quest::core::{Balance, Session, SessionSnapshot};
use tetris_quest::term::{FrameBuffer, GameView, Screen, Viewport};
use tetris_quest::types::Command;

/// System allocator that counts heap requests while `WATCHING` is set.
struct Tally;

static WATCHING: AtomicBool = AtomicBool::new(false);
static REQUESTS: AtomicUsize = AtomicUsize::new(0);

#[global_allocator]
static HEAP: Tally = Tally;

impl Tally {
    fn note(&self) {
        if WATCHING.load(Ordering::Relaxed) {
            REQUESTS.fetch_add(1, Ordering::Relaxed);
        }
    }
}

unsafe impl GlobalAlloc for Tally {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        self.note();
        System.alloc(layout)
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        self.note();
        System.realloc(ptr, layout, new_size)
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout)
    }
}

/// Heap requests made while `work` runs.
fn heap_requests(work: impl FnOnce()) -> usize {
    REQUESTS.store(0, Ordering::Relaxed);
    WATCHING.store(true, Ordering::Relaxed);
    work();
    WATCHING.store(false, Ordering::Relaxed);
    REQUESTS.load(Ordering::Relaxed)
}

fn exploring() -> Session {
    let mut session = Session::with_seed(Balance::default(), 1);
    session.command(Command::Confirm);
    session
}

#[test]
fn snapshot_and_render_reuse_their_buffers() {
    let view = GameView::default();
    let viewport = Viewport::new(80, 24);
    let mut fb = FrameBuffer::new(viewport.width, viewport.height);
    let session = exploring();

    let mut snap = SessionSnapshot::default();
    session.snapshot_into(&mut snap);
    view.render_into(&snap, viewport, &mut fb);

    let requests = heap_requests(|| {
        for _ in 0..200 {
            session.snapshot_into(&mut snap);
            view.render_into(&snap, viewport, &mut fb);
        }
    });
    assert_eq!(requests, 0);
}

#[test]
fn unchanged_frames_compose_without_allocating() {
    let mut screen = Screen::new(GameView::default());
    let viewport = Viewport::new(80, 24);
    let session = exploring();

    // Both internal frames get sized by the first two passes.
    screen.compose(&session, viewport).unwrap();
    screen.compose(&session, viewport).unwrap();

    let requests = heap_requests(|| {
        for _ in 0..200 {
            assert!(screen.compose(&session, viewport).unwrap().is_empty());
        }
    });
    assert_eq!(requests, 0);
}
