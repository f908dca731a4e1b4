//! Terminal runner (default binary).
//!
//! Drives a [`Session`] from crossterm key events and a wall-clock frame
//! loop, and draws it with the framebuffer renderer.

mod logger;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event, KeyEventKind};
use log::{info, trace, LevelFilter};

use tetris_quest::core::{Balance, Session};
use tetris_quest::input::{handle_key_event, should_quit};
use tetris_quest::term::{GameView, Screen};
use tetris_quest::types::TICK_MS;

/// Largest step fed to the session in one frame; longer stalls are dropped.
const MAX_FRAME_MS: u32 = 100;

/// Falling-block puzzle driving an auto-battle adventure.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Seed for pieces, enemies and events. Defaults to the clock.
    #[arg(short, long)]
    seed: Option<u32>,

    /// JSON file overriding balance values.
    #[arg(short, long)]
    balance: Option<PathBuf>,

    /// Write a log to this file.
    #[arg(long)]
    log: Option<PathBuf>,

    /// Log debug detail (locks, clears, attacks).
    #[arg(short, long)]
    verbose: bool,
}

fn load_balance(path: &Path) -> Result<Balance> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("read balance file {}", path.display()))?;
    let balance: Balance = serde_json::from_str(&text)
        .with_context(|| format!("parse balance file {}", path.display()))?;
    balance
        .validate()
        .with_context(|| format!("invalid balance in {}", path.display()))?;
    Ok(balance)
}

fn clock_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u32)
        .unwrap_or(1)
}

fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(path) = &args.log {
        let level = if args.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        };
        logger::init(path, level)?;
    }

    let balance = match &args.balance {
        Some(path) => load_balance(path)?,
        None => Balance::default(),
    };
    let seed = args.seed.unwrap_or_else(clock_seed);
    info!("seed {}", seed);

    let mut screen = Screen::new(GameView::default());
    screen.open()?;

    let result = run(&mut screen, Session::with_seed(balance, seed));

    // Always try to restore terminal state.
    let _ = screen.close();
    log::logger().flush();
    result
}

fn run(screen: &mut Screen, mut session: Session) -> Result<()> {
    let tick_duration = Duration::from_millis(TICK_MS as u64);
    let mut last_tick = Instant::now();

    loop {
        screen.present(&session)?;

        // Input with timeout until next tick.
        let timeout = tick_duration.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind != KeyEventKind::Release => {
                    if should_quit(key) {
                        info!("quit");
                        return Ok(());
                    }
                    if let Some(command) = handle_key_event(key, session.phase()) {
                        let accepted = session.command(command);
                        trace!("{} -> {}", command.as_str(), accepted);
                    }
                }
                Event::Resize(_, _) => screen.invalidate(),
                _ => {}
            }
        }

        // Tick.
        let elapsed = last_tick.elapsed();
        if elapsed >= tick_duration {
            last_tick = Instant::now();
            let dt = (elapsed.as_millis() as u32).min(MAX_FRAME_MS);
            session.update(dt);
            for event in session.drain_events() {
                trace!("{:?}", event);
            }
        }
    }
}
