//! Check resources and state management.
//!
//! This module defines the `CheckResources` struct which holds all initialized
//! resources needed for a check run, and its initialization.

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use log::info;

use crate::aggregate::ResultAggregator;
use crate::config::Config;
use crate::probe::ProcessingContext;

/// All resources initialized for a check run.
pub struct CheckResources {
    /// Shared processing context: HTTP clients, config and failure counters
    pub ctx: Arc<ProcessingContext>,
    /// Outcome collector shared by every task
    pub aggregator: Arc<ResultAggregator>,
    /// Number of targets handed to the run
    pub total_targets: usize,
    /// Start time for elapsed time calculations
    pub start_time: Instant,
}

/// Initialize all resources needed for a check run.
///
/// Validates the configuration, then builds the HTTP clients and the shared
/// processing context.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or a client cannot be
/// built.
pub fn init_check_resources(config: Config, total_targets: usize) -> Result<CheckResources> {
    config
        .validate()
        .context("Configuration validation failed")?;

    let ctx = ProcessingContext::from_config(Arc::new(config))
        .context("Failed to initialize HTTP clients")?;

    info!(
        "Checking {} target{} with up to {} in flight",
        total_targets,
        if total_targets == 1 { "" } else { "s" },
        ctx.config.max_concurrent
    );

    Ok(CheckResources {
        ctx: Arc::new(ctx),
        aggregator: Arc::new(ResultAggregator::new()),
        total_targets,
        start_time: Instant::now(),
    })
}
