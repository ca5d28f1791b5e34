//! Console logging backend for the `log` facade.
//!
//! Two streams:
//!
//! ```text
//! log::*!(target: "parsed", ..)  -> stdout, bare message (user-facing progress)
//! log::*!(..)                    -> stderr, "[HH:MM:SS.mmm] [LEVEL] message"
//! ```
//!
//! The progress stream is what a user watching a run reads; the diagnostic
//! stream is for `-v` troubleshooting.

use chrono::Local;
use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;

/// Target used for user-facing progress lines
pub const PARSED_TARGET: &str = "parsed";

/// A single rendered log line
#[derive(Clone, Debug)]
pub struct LogLine {
    /// The actual log message
    pub message: String,
    /// Log type: "full" or "parsed"
    pub log_type: String,
    /// Timestamp of when the log was created
    pub timestamp: String,
    pub level: log::Level,
}

impl LogLine {
    pub fn new(level: log::Level, message: String) -> Self {
        LogLine {
            message,
            log_type: "full".to_string(),
            timestamp: Local::now().format("%H:%M:%S%.3f").to_string(),
            level,
        }
    }

    pub fn parsed(message: String) -> Self {
        LogLine {
            message,
            log_type: "parsed".to_string(),
            timestamp: Local::now().format("%H:%M:%S%.3f").to_string(),
            level: log::Level::Info,
        }
    }

    pub fn is_parsed(&self) -> bool {
        self.log_type == "parsed"
    }

    /// Text written to the terminal for this line
    pub fn render(&self) -> String {
        if self.is_parsed() {
            self.message.clone()
        } else {
            format!("[{}] [{}] {}", self.timestamp, self.level, self.message)
        }
    }
}

/// Logger writing progress to stdout and diagnostics to stderr
pub struct ConsoleLogger {
    level: LevelFilter,
}

impl ConsoleLogger {
    pub fn new(level: LevelFilter) -> Self {
        ConsoleLogger { level }
    }

    /// Register as the global logger for the `log` crate.
    ///
    /// The global maximum never drops below `Info` so progress lines reach
    /// `enabled()`; diagnostics are filtered there against `self.level`.
    pub fn install(self) -> Result<(), SetLoggerError> {
        let max_level = self.level.max(LevelFilter::Info);
        log::set_boxed_logger(Box::new(self)).map(|()| log::set_max_level(max_level))
    }

    fn line_for(record: &Record) -> LogLine {
        let message = record.args().to_string();
        if record.target() == PARSED_TARGET {
            LogLine::parsed(message)
        } else {
            LogLine::new(record.level(), message)
        }
    }
}

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        // Progress lines are always shown
        metadata.target() == PARSED_TARGET || metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = Self::line_for(record);
        if line.is_parsed() {
            let mut out = std::io::stdout().lock();
            let _ = writeln!(out, "{}", line.render());
        } else {
            let mut err = std::io::stderr().lock();
            let _ = writeln!(err, "{}", line.render());
        }
    }

    fn flush(&self) {
        let _ = std::io::stdout().flush();
        let _ = std::io::stderr().flush();
    }
}

/// Map the CLI verbosity onto a level filter
pub fn level_for(verbose: bool, explicit: Option<LevelFilter>) -> LevelFilter {
    match (explicit, verbose) {
        (Some(level), _) => level,
        (None, true) => LevelFilter::Debug,
        (None, false) => LevelFilter::Info,
    }
}

/// Logging macros for convenient access
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {{
        $crate::log::info!($($arg)*);
    }}
}

#[macro_export]
macro_rules! log_parsed {
    ($($arg:tt)*) => {{
        // Use target="parsed" for user-facing progress
        $crate::log::info!(target: "parsed", $($arg)*);
    }}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parsed_line_renders_bare() {
        let line = LogLine::parsed("downloading linux-4.9.24.tar.xz".to_string());
        assert!(line.is_parsed());
        assert_eq!(line.render(), "downloading linux-4.9.24.tar.xz");
    }

    #[test]
    fn test_full_line_carries_level_and_timestamp() {
        let line = LogLine::new(log::Level::Warn, "slow mirror".to_string());
        let rendered = line.render();
        assert!(rendered.starts_with('['));
        assert!(rendered.contains("[WARN] slow mirror"));
    }

    #[test]
    fn test_enabled_respects_level_except_parsed() {
        let logger = ConsoleLogger::new(LevelFilter::Warn);
        let info = Metadata::builder().level(log::Level::Info).target("kernel").build();
        let parsed = Metadata::builder()
            .level(log::Level::Info)
            .target(PARSED_TARGET)
            .build();
        assert!(!logger.enabled(&info));
        assert!(logger.enabled(&parsed));
    }

    #[test]
    fn test_level_for() {
        assert_eq!(level_for(false, None), LevelFilter::Info);
        assert_eq!(level_for(true, None), LevelFilter::Debug);
        assert_eq!(level_for(true, Some(LevelFilter::Error)), LevelFilter::Error);
    }
}
