//! Global logger installation
//!
//! Kept in its own test binary: the `log` crate accepts one logger per process.

use kernel_patch_fetch::log_collector::{ConsoleLogger, PARSED_TARGET};
use log::{Level, LevelFilter};

#[test]
fn test_quiet_level_keeps_progress_lines() {
    ConsoleLogger::new(LevelFilter::Warn)
        .install()
        .expect("Failed to install console logger");

    assert!(log::log_enabled!(target: PARSED_TARGET, Level::Info));
    assert!(log::log_enabled!(target: "kernel_patch_fetch", Level::Warn));
    assert!(!log::log_enabled!(target: "kernel_patch_fetch", Level::Info));
    assert!(!log::log_enabled!(target: "kernel_patch_fetch", Level::Debug));
}
