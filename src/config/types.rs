//! Configuration types.
//!
//! This module defines the run configuration and the enums used for
//! command-line argument parsing and configuration files.

use std::path::PathBuf;
use std::time::Duration;

use clap::ValueEnum;
use serde::Deserialize;
use tokio::sync::Semaphore;

use crate::config::constants::*;
use crate::error_handling::ConfigError;
use crate::models::ProbeStatus;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Which probe outcome triggers a warm download.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum WarmPolicy {
    /// Warm only when the edge reported a cache MISS
    #[default]
    Miss,
    /// Warm only when every probe attempt failed
    Error,
    /// Warm on either MISS or ERROR
    Any,
}

impl WarmPolicy {
    /// Returns true if an outcome with `status` should be warmed.
    pub fn matches(self, status: ProbeStatus) -> bool {
        match (self, status) {
            (_, ProbeStatus::Success) => false,
            (WarmPolicy::Miss, ProbeStatus::Miss) => true,
            (WarmPolicy::Error, ProbeStatus::Error) => true,
            (WarmPolicy::Any, _) => true,
            _ => false,
        }
    }
}

/// Run configuration.
///
/// Built once at startup and shared read-only (behind an `Arc`) by every
/// component for the duration of a run.
///
/// # Examples
///
/// ```no_run
/// use cdn_cache_check::Config;
///
/// let config = Config {
///     max_concurrent: 10,
///     retry_times: 3,
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of targets in flight at once
    pub max_concurrent: usize,

    /// Extra probe attempts beyond the first
    pub retry_times: u32,

    /// Fixed delay between probe attempts, in milliseconds
    pub retry_delay_ms: u64,

    /// Enables the warm download step
    pub download_if_miss: bool,

    /// Which outcome triggers the warm download
    pub warm_on: WarmPolicy,

    /// Re-probe once after the settle delay of a warm download
    pub reprobe_after_warm: bool,

    /// Keep warmed downloads under `download_dir` instead of a temp file
    pub keep_downloaded_file: bool,

    /// Directory for persisted warm downloads
    pub download_dir: PathBuf,

    /// Settle delay after a warm download, in seconds
    pub head_wait_seconds: f64,

    /// Purge still-failing URLs at the end of the run
    pub auto_purge: bool,

    /// Purge API base URL, e.g. `https://api.cloudflare.com/client/v4`
    pub purge_endpoint: Option<String>,

    /// Bearer token for the purge API
    pub purge_token: Option<String>,

    /// Zone identifier for the purge API
    pub purge_zone_id: Option<String>,

    /// Name of the vendor cache-status response header
    pub cache_status_header: String,

    /// Probe request timeout in seconds
    pub probe_timeout_seconds: u64,

    /// Warm download timeout in seconds
    pub download_timeout_seconds: u64,

    /// Number of body bytes inspected by the content validator
    pub body_prefix_bytes: usize,

    /// Ask for only the body prefix with a `Range` header
    pub use_range_request: bool,

    /// HTTP User-Agent header value
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            retry_times: DEFAULT_RETRY_TIMES,
            retry_delay_ms: DEFAULT_RETRY_DELAY_MS,
            download_if_miss: true,
            warm_on: WarmPolicy::Miss,
            reprobe_after_warm: true,
            keep_downloaded_file: false,
            download_dir: PathBuf::from(DEFAULT_DOWNLOAD_DIR),
            head_wait_seconds: DEFAULT_HEAD_WAIT_SECONDS,
            auto_purge: false,
            purge_endpoint: None,
            purge_token: None,
            purge_zone_id: None,
            cache_status_header: DEFAULT_CACHE_STATUS_HEADER.to_string(),
            probe_timeout_seconds: DEFAULT_PROBE_TIMEOUT_SECS,
            download_timeout_seconds: DEFAULT_DOWNLOAD_TIMEOUT_SECS,
            body_prefix_bytes: DEFAULT_BODY_PREFIX_BYTES,
            use_range_request: false,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl Config {
    /// Checks the invariants every component relies on.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_concurrent == 0 {
            return Err(ConfigError::invalid("max_concurrent", "must be greater than 0"));
        }
        if self.max_concurrent > Semaphore::MAX_PERMITS {
            return Err(ConfigError::invalid(
                "max_concurrent",
                format!("must be at most {}", Semaphore::MAX_PERMITS),
            ));
        }
        if self.head_wait_seconds < 0.0
            || Duration::try_from_secs_f64(self.head_wait_seconds).is_err()
        {
            return Err(ConfigError::invalid(
                "head_wait_seconds",
                "must be a finite number of seconds >= 0",
            ));
        }
        if self.body_prefix_bytes == 0 || self.body_prefix_bytes > MAX_BODY_PREFIX_BYTES {
            return Err(ConfigError::invalid(
                "body_prefix_bytes",
                format!("must be between 1 and {MAX_BODY_PREFIX_BYTES}"),
            ));
        }
        if self.probe_timeout_seconds == 0 {
            return Err(ConfigError::invalid("probe_timeout_seconds", "must be greater than 0"));
        }
        if self.download_timeout_seconds == 0 {
            return Err(ConfigError::invalid(
                "download_timeout_seconds",
                "must be greater than 0",
            ));
        }
        if self.cache_status_header.trim().is_empty() {
            return Err(ConfigError::invalid("cache_status_header", "must not be empty"));
        }
        if let Some(endpoint) = &self.purge_endpoint {
            match url::Url::parse(endpoint) {
                Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {}
                _ => {
                    return Err(ConfigError::invalid(
                        "purge_endpoint",
                        format!("'{endpoint}' is not an http(s) URL"),
                    ))
                }
            }
        }
        Ok(())
    }

    /// Delay between probe attempts.
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    /// Settle delay after a warm download.
    pub fn head_wait(&self) -> Duration {
        // Unvalidated values fall back to no delay
        Duration::try_from_secs_f64(self.head_wait_seconds).unwrap_or(Duration::ZERO)
    }

    /// Whether an outcome with `status` should be warmed under this config.
    pub fn should_warm(&self, status: ProbeStatus) -> bool {
        self.download_if_miss && self.warm_on.matches(status)
    }
}
