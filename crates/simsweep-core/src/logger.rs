//! Timestamped progress lines for humans.
//!
//! Every line is prefixed with the local wall-clock time as `[HH:MM:SS]`.
//! Logging never fails: a timestamp that cannot be formatted degrades to the
//! bare message, and write errors on the sink are dropped.

use chrono::{Local, NaiveTime, Timelike};
use std::fmt::Write as _;
use std::io::Write as _;
use std::sync::Mutex;

/// Sink for batch progress lines.
pub trait BatchLogger: Send + Sync {
    /// Emit one message prefixed with the current time.
    fn log(&self, message: &str);

    /// Emit an empty separator line.
    fn blank(&self);
}

/// Render `message` with a `[HH:MM:SS] ` prefix for the given time.
pub fn format_line<T: Timelike>(time: &T, message: &str) -> String {
    let mut line = String::with_capacity(message.len() + 11);
    if write!(
        line,
        "[{:02}:{:02}:{:02}] ",
        time.hour(),
        time.minute(),
        time.second()
    )
    .is_err()
    {
        line.clear();
    }
    line.push_str(message);
    line
}

fn stamp(message: &str) -> String {
    let now: NaiveTime = Local::now().time();
    format_line(&now, message)
}

/// Writes progress lines to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleLogger;

impl BatchLogger for ConsoleLogger {
    fn log(&self, message: &str) {
        let mut out = std::io::stdout().lock();
        let _ = writeln!(out, "{}", stamp(message));
    }

    fn blank(&self) {
        let mut out = std::io::stdout().lock();
        let _ = writeln!(out);
    }
}

/// Keeps progress lines in memory, unprefixed, for inspection.
#[derive(Debug, Default)]
pub struct MemoryLogger {
    lines: Mutex<Vec<String>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// All lines logged so far; separators appear as empty strings.
    pub fn lines(&self) -> Vec<String> {
        match self.lines.lock() {
            Ok(lines) => lines.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Lines containing `needle`.
    pub fn matching(&self, needle: &str) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter(|l| l.contains(needle))
            .collect()
    }

    fn push(&self, line: String) {
        match self.lines.lock() {
            Ok(mut lines) => lines.push(line),
            Err(poisoned) => poisoned.into_inner().push(line),
        }
    }
}

impl BatchLogger for MemoryLogger {
    fn log(&self, message: &str) {
        self.push(message.to_string());
    }

    fn blank(&self) {
        self.push(String::new());
    }
}
