//! HTTP client initialization.
//!
//! Two clients are built per run: one with the short probe timeout (also used
//! for the purge request, which sets its own timeout) and one with the long
//! timeout needed to stream whole files during warm downloads. Both are shared
//! read-only by every task and own their connection pools.

use std::sync::Arc;
use std::time::Duration;

use reqwest::ClientBuilder;

use crate::config::{Config, TCP_CONNECT_TIMEOUT_SECS};

/// Initializes the HTTP client used for probes.
///
/// Creates a `reqwest::Client` configured with:
/// - User-Agent header from the configuration
/// - `probe_timeout_seconds` as the whole-request timeout
/// - `TCP_CONNECT_TIMEOUT_SECS` as the connect timeout
/// - Redirect following enabled (reqwest default, up to 10 hops)
///
/// # Errors
///
/// Returns a `reqwest::Error` if client creation fails.
pub fn init_client(config: &Config) -> Result<Arc<reqwest::Client>, reqwest::Error> {
    build(config, Duration::from_secs(config.probe_timeout_seconds))
}

/// Initializes the HTTP client used for warm downloads.
///
/// Same settings as [`init_client`] but with `download_timeout_seconds` as the
/// whole-request timeout.
///
/// # Errors
///
/// Returns a `reqwest::Error` if client creation fails.
pub fn init_download_client(config: &Config) -> Result<Arc<reqwest::Client>, reqwest::Error> {
    build(config, Duration::from_secs(config.download_timeout_seconds))
}

fn build(config: &Config, timeout: Duration) -> Result<Arc<reqwest::Client>, reqwest::Error> {
    let client = ClientBuilder::new()
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(TCP_CONNECT_TIMEOUT_SECS))
        .user_agent(config.user_agent.clone())
        .build()?;
    Ok(Arc::new(client))
}
