//! Console `log` backend for the host binary.
//!
//! Writes `LEVEL target: message` lines to stderr so that stdout carries
//! only the serial protocol (telemetry and command replies).  The level
//! comes from `TRAFFICLIGHT_LOG` (`error`..`trace`, default `info`).

use std::io::Write as _;

use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};

/// Environment variable that selects the log level.
pub const LOG_ENV: &str = "TRAFFICLIGHT_LOG";

pub struct ConsoleLogger {
    level: LevelFilter,
}

impl ConsoleLogger {
    pub const fn new(level: LevelFilter) -> Self {
        Self { level }
    }
}

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let mut err = std::io::stderr().lock();
        let _ = writeln!(err, "{:<5} {}: {}", record.level(), record.target(), record.args());
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

/// Parse a level name; unknown or missing names fall back to `Info`.
pub fn level_from(value: Option<&str>) -> LevelFilter {
    value
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(LevelFilter::Info)
}

/// Install the console logger as the global `log` backend.
pub fn init() -> Result<(), SetLoggerError> {
    let level = level_from(std::env::var(LOG_ENV).ok().as_deref());
    log::set_logger(Box::leak(Box::new(ConsoleLogger::new(level))))?;
    log::set_max_level(level);
    Ok(())
}
