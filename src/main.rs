//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `cdn_cache_check` library that handles:
//! - Command-line argument parsing
//! - Logger initialization
//! - Loading targets and writing the report
//! - Ctrl-C handling
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;
use tokio_util::sync::CancellationToken;

use cdn_cache_check::config::cli::Opt;
use cdn_cache_check::export::write_report;
use cdn_cache_check::initialization::{init_client, init_logger_with};
use cdn_cache_check::input::load_targets;
use cdn_cache_check::run_check_with_cancel;

#[tokio::main]
async fn main() -> Result<()> {
    let opt = Opt::parse();

    // Initialize logger based on CLI options
    let log_level = opt.log_level.clone();
    let log_format = opt.log_format.clone();
    init_logger_with(log_level.into(), log_format).context("Failed to initialize logger")?;

    if let Err(e) = run(opt).await {
        log::error!("{e:#}");
        eprintln!("cdn_cache_check error: {:#}", e);
        process::exit(1);
    }
    Ok(())
}

async fn run(opt: Opt) -> Result<()> {
    let settings = opt
        .into_settings()
        .context("Failed to load configuration")?;
    let input = settings
        .input
        .as_deref()
        .context("No input configured (set `input` in config.toml or pass --input)")?;

    let client = init_client(&settings.config).context("Failed to initialize HTTP client")?;
    let targets = load_targets(input, &settings.columns, &client)
        .await
        .context("Failed to load targets")?;

    let cancel = CancellationToken::new();
    let cancel_on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::warn!("Interrupted, finishing targets in flight");
            cancel_on_signal.cancel();
        }
    });

    let check = run_check_with_cancel(settings.config, targets, cancel).await?;

    let rows = write_report(&check.report, settings.output.as_deref())
        .context("Failed to write report")?;
    if let Some(output) = &settings.output {
        log::info!("Wrote {} row{} to {}", rows, if rows == 1 { "" } else { "s" }, output.display());
    }
    Ok(())
}
