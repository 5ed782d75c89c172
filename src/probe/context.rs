//! Processing context shared by every target of a run.
//!
//! Groups the shared resources each task needs so that the probe, warm and
//! purge functions take one argument instead of five.

use std::sync::Arc;

use crate::config::Config;
use crate::error_handling::{InitializationError, ProcessingStats};
use crate::initialization::{init_client, init_download_client};

/// Context containing all shared resources needed for checking targets.
///
/// Everything in here is read-only or internally synchronized, so one
/// instance is shared by all tasks behind an `Arc`.
#[derive(Clone)]
pub struct ProcessingContext {
    /// HTTP client for probes and the purge request (short timeout)
    pub client: Arc<reqwest::Client>,
    /// HTTP client for warm downloads (long timeout)
    pub download_client: Arc<reqwest::Client>,
    /// Immutable run configuration
    pub config: Arc<Config>,
    /// Failure statistics tracker
    pub error_stats: Arc<ProcessingStats>,
}

impl ProcessingContext {
    /// Creates a new `ProcessingContext` with the given resources.
    pub fn new(
        client: Arc<reqwest::Client>,
        download_client: Arc<reqwest::Client>,
        config: Arc<Config>,
        error_stats: Arc<ProcessingStats>,
    ) -> Self {
        Self {
            client,
            download_client,
            config,
            error_stats,
        }
    }

    /// Builds both HTTP clients from `config` and a fresh statistics tracker.
    pub fn from_config(config: Arc<Config>) -> Result<Self, InitializationError> {
        let client = init_client(&config)?;
        let download_client = init_download_client(&config)?;
        Ok(Self::new(
            client,
            download_client,
            config,
            Arc::new(ProcessingStats::new()),
        ))
    }
}
