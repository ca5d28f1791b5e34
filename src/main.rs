use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use log::LevelFilter;

use kernel_patch_fetch::config;
use kernel_patch_fetch::log_collector::{level_for, ConsoleLogger};
use kernel_patch_fetch::{fetch_release, log_parsed, ReleaseSource};

/// Fetch a linux security kernel patch
#[derive(Parser, Debug)]
#[command(name = "fetch-security-patches", version)]
struct Cli {
    /// The patch type to download
    #[arg(short = 'p', long = "patch", value_enum, default_value_t = ReleaseSource::default())]
    patch: ReleaseSource,

    /// JSON settings file (defaults to ~/.config/kernel-patch-fetch/settings.json if present)
    #[arg(short = 'c', long = "config", value_name = "PATH")]
    config: Option<PathBuf>,

    /// Show debug diagnostics on stderr
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,

    /// Explicit diagnostic level (off, error, warn, info, debug, trace)
    #[arg(long = "log-level", value_name = "LEVEL", value_parser = parse_level)]
    log_level: Option<LevelFilter>,
}

fn parse_level(s: &str) -> Result<LevelFilter, String> {
    s.parse::<LevelFilter>()
        .map_err(|_| format!("unknown log level '{}'", s))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // =========================================================================
    // LOGGING INITIALIZATION - MUST BE FIRST
    // =========================================================================
    let level = level_for(cli.verbose, cli.log_level);
    if let Err(e) = ConsoleLogger::new(level).install() {
        eprintln!("[Main] WARNING: Failed to set console logger: {}", e);
    }

    let config = config::load_or_default(cli.config.as_deref()).context("loading settings")?;
    log::debug!("[Main] Effective config: {:?}", config);

    // One client for the whole run, dropped once every transfer is done
    let client = config.build_client()?;

    log::info!("[Main] Fetching latest {} patch", cli.patch);
    let report = fetch_release(&client, &config, cli.patch)
        .await
        .with_context(|| format!("fetching latest {} patch", cli.patch))?;

    // Artifact failures were already reported; they never change the exit status
    log_parsed!(
        "Done: {} of {} files saved in {}",
        report.successes().count(),
        report.results.len(),
        report.work_dir().display()
    );

    Ok(())
}
