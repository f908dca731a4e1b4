//! Minimal file logger for the terminal binary.
//!
//! The terminal is in raw mode on the alternate screen, so log lines go to
//! a file instead.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;
use std::time::Instant;

use anyhow::{Context, Result};
use log::{LevelFilter, Log, Metadata, Record};

struct FileLogger {
    out: Mutex<BufWriter<File>>,
    started: Instant,
    level: LevelFilter,
}

impl Log for FileLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let elapsed = self.started.elapsed();
        if let Ok(mut out) = self.out.lock() {
            // Write errors are dropped.
            let _ = writeln!(
                out,
                "{:>6}.{:03} {:<5} {}: {}",
                elapsed.as_secs(),
                elapsed.subsec_millis(),
                record.level(),
                record.target(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        if let Ok(mut out) = self.out.lock() {
            let _ = out.flush();
        }
    }
}

/// Install a logger writing to `path`, truncating it.
pub fn init(path: &Path, level: LevelFilter) -> Result<()> {
    let file = File::create(path).with_context(|| format!("create log file {}", path.display()))?;
    let logger = FileLogger {
        out: Mutex::new(BufWriter::new(file)),
        started: Instant::now(),
        level,
    };
    log::set_boxed_logger(Box::new(logger)).context("install logger")?;
    log::set_max_level(level);
    Ok(())
}
