//! Screen: keeps a terminal in step with a running [`Session`].
//!
//! Each frame the session is snapshotted, painted by the [`GameView`] into a
//! back buffer and compared with what the terminal already shows. Only the
//! changed spans of each row are written, and a frame with no visible change
//! writes nothing at all. After [`Screen::open`], a resize or
//! [`Screen::invalidate`] the whole screen is repainted once.

use std::io::{self, Write};
use std::ops::Range;

use anyhow::{Context, Result};
use crossterm::{
    cursor,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal, QueueableCommand,
};

use crate::core::{RandomSource, Session, SessionSnapshot};
use crate::fb::{Cell, CellStyle, FrameBuffer, Rgb};
use crate::game_view::{GameView, Viewport};

pub struct Screen {
    out: io::Stdout,
    view: GameView,
    snap: SessionSnapshot,
    /// What the terminal currently shows.
    shown: FrameBuffer,
    /// Frame being composed.
    next: FrameBuffer,
    /// Terminal content is unknown; repaint everything.
    stale: bool,
    bytes: Vec<u8>,
}

impl Screen {
    pub fn new(view: GameView) -> Self {
        Self {
            out: io::stdout(),
            view,
            snap: SessionSnapshot::default(),
            shown: FrameBuffer::new(0, 0),
            next: FrameBuffer::new(0, 0),
            stale: true,
            bytes: Vec::with_capacity(32 * 1024),
        }
    }

    /// Raw mode, alternate screen, hidden cursor.
    pub fn open(&mut self) -> Result<()> {
        terminal::enable_raw_mode().context("enable raw mode")?;
        self.bytes.clear();
        self.bytes.queue(terminal::EnterAlternateScreen)?;
        self.bytes.queue(cursor::Hide)?;
        self.bytes.queue(terminal::DisableLineWrap)?;
        self.write_out()?;
        self.stale = true;
        Ok(())
    }

    /// Undo [`Screen::open`].
    pub fn close(&mut self) -> Result<()> {
        self.bytes.clear();
        self.bytes.queue(SetAttribute(Attribute::Reset))?;
        self.bytes.queue(ResetColor)?;
        self.bytes.queue(terminal::EnableLineWrap)?;
        self.bytes.queue(cursor::Show)?;
        self.bytes.queue(terminal::LeaveAlternateScreen)?;
        self.write_out()?;
        terminal::disable_raw_mode().context("disable raw mode")
    }

    /// Repaint everything on the next frame.
    pub fn invalidate(&mut self) {
        self.stale = true;
    }

    /// Bring the terminal up to date with `session`.
    pub fn present<R: RandomSource>(&mut self, session: &Session<R>) -> Result<()> {
        let (width, height) = terminal::size().context("query terminal size")?;
        self.compose(session, Viewport::new(width, height))?;
        if !self.bytes.is_empty() {
            self.write_out()?;
        }
        Ok(())
    }

    /// Paint `session` and return the bytes that would bring a terminal of
    /// `viewport` size up to date, without writing them.
    pub fn compose<R: RandomSource>(&mut self, session: &Session<R>, viewport: Viewport) -> Result<&[u8]> {
        session.snapshot_into(&mut self.snap);
        self.view.render_into(&self.snap, viewport, &mut self.next);

        self.bytes.clear();
        let resized = self.shown.width() != self.next.width() || self.shown.height() != self.next.height();
        if self.stale || resized {
            paint_all(&self.next, &mut self.bytes)?;
            self.stale = false;
        } else {
            paint_changes(&self.shown, &self.next, &mut self.bytes)?;
        }
        std::mem::swap(&mut self.shown, &mut self.next);
        Ok(&self.bytes)
    }

    fn write_out(&mut self) -> Result<()> {
        self.out.write_all(&self.bytes).context("write to terminal")?;
        self.out.flush().context("flush terminal")
    }
}

/// Tracks the terminal's current style so escapes are only sent on change.
#[derive(Debug, Default)]
struct Pen {
    style: Option<CellStyle>,
}

impl Pen {
    fn ink(&mut self, out: &mut Vec<u8>, style: CellStyle) -> io::Result<()> {
        let prev = self.style.replace(style);
        // Bold and dim can only be switched off by a full reset, which also drops colors.
        let reset = match prev {
            Some(p) => (p.bold && !style.bold) || (p.dim && !style.dim),
            None => true,
        };
        let kept = prev.filter(|_| !reset);

        if reset {
            out.queue(SetAttribute(Attribute::Reset))?;
        }
        if kept.map(|p| p.fg) != Some(style.fg) {
            out.queue(SetForegroundColor(color(style.fg)))?;
        }
        if kept.map(|p| p.bg) != Some(style.bg) {
            out.queue(SetBackgroundColor(color(style.bg)))?;
        }
        if style.bold && !kept.is_some_and(|p| p.bold) {
            out.queue(SetAttribute(Attribute::Bold))?;
        }
        if style.dim && !kept.is_some_and(|p| p.dim) {
            out.queue(SetAttribute(Attribute::Dim))?;
        }
        Ok(())
    }

    fn print(&mut self, out: &mut Vec<u8>, cells: &[Cell]) -> io::Result<()> {
        for cell in cells {
            self.ink(out, cell.style)?;
            out.queue(Print(cell.ch))?;
        }
        Ok(())
    }
}

fn color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

fn rows(fb: &FrameBuffer) -> impl Iterator<Item = &[Cell]> {
    fb.cells().chunks(fb.width().max(1) as usize)
}

/// Clear the terminal and print every cell of `fb`.
pub fn paint_all(fb: &FrameBuffer, out: &mut Vec<u8>) -> io::Result<()> {
    let mut pen = Pen::default();
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    for (y, row) in rows(fb).enumerate() {
        out.queue(cursor::MoveTo(0, y as u16))?;
        pen.print(out, row)?;
    }
    Ok(())
}

/// Print the cells of `next` that differ from `shown`. Both frames must
/// have the same size. Writes nothing when they are equal.
pub fn paint_changes(shown: &FrameBuffer, next: &FrameBuffer, out: &mut Vec<u8>) -> io::Result<()> {
    let mut pen = Pen::default();
    for (y, (old, new)) in rows(shown).zip(rows(next)).enumerate() {
        for span in changed_spans(old, new) {
            out.queue(cursor::MoveTo(span.start as u16, y as u16))?;
            pen.print(out, &new[span])?;
        }
    }
    Ok(())
}

/// Maximal runs of columns where the two rows differ, left to right.
fn changed_spans<'a>(old: &'a [Cell], new: &'a [Cell]) -> impl Iterator<Item = Range<usize>> + 'a {
    let mut x = 0;
    std::iter::from_fn(move || {
        let start = x + old[x..].iter().zip(&new[x..]).position(|(a, b)| a != b)?;
        let len = old[start..]
            .iter()
            .zip(&new[start..])
            .take_while(|(a, b)| a != b)
            .count();
        x = start + len;
        Some(start..x)
    })
}
