//! TOML configuration files.
//!
//! A run is configured from a base file (`config.toml`) optionally overlaid by
//! a local file (`config_local.toml`) that is usually kept out of version
//! control and carries purge credentials. Keys present in the overlay replace
//! keys of the base file; absent keys fall through.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::config::types::{Config, WarmPolicy};
use crate::config::DEFAULT_COLUMNS;
use crate::error_handling::ConfigError;

/// One configuration file as written on disk. Every key is optional; keys
/// without a comment mirror the `Config` field of the same name.
#[allow(missing_docs)]
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Input table: local path or http(s) URL
    #[serde(alias = "csv_url")]
    pub input: Option<String>,
    /// Columns of the input table that hold URLs
    pub columns: Option<Vec<String>>,
    /// Report destination
    pub output: Option<PathBuf>,
    pub max_concurrent: Option<usize>,
    pub retry_times: Option<u32>,
    pub retry_delay_ms: Option<u64>,
    pub download_if_miss: Option<bool>,
    pub warm_on: Option<WarmPolicy>,
    pub reprobe_after_warm: Option<bool>,
    pub keep_downloaded_file: Option<bool>,
    pub download_dir: Option<PathBuf>,
    pub head_wait_seconds: Option<f64>,
    #[serde(alias = "auto_purge_cf_cache")]
    pub auto_purge: Option<bool>,
    pub purge_endpoint: Option<String>,
    pub purge_token: Option<String>,
    pub purge_zone_id: Option<String>,
    pub cache_status_header: Option<String>,
    pub probe_timeout_seconds: Option<u64>,
    pub download_timeout_seconds: Option<u64>,
    pub body_prefix_bytes: Option<usize>,
    pub use_range_request: Option<bool>,
    pub user_agent: Option<String>,
}

/// Everything a CLI run needs: the core `Config` plus Source/Sink settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Core run configuration
    pub config: Config,
    /// Input table: local path or http(s) URL
    pub input: Option<String>,
    /// Columns of the input table that hold URLs
    pub columns: Vec<String>,
    /// Report destination (stdout when unset)
    pub output: Option<PathBuf>,
}

impl FileConfig {
    /// Parses a configuration from TOML text.
    pub fn from_toml(text: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Reads and parses a configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text, path)
    }

    /// Reads `path` if it exists, returning `None` otherwise.
    pub fn load_optional(path: &Path) -> Result<Option<Self>, ConfigError> {
        if path.exists() {
            Self::load(path).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Returns `self` with every key set in `local` replaced by its value.
    pub fn overlay(self, local: FileConfig) -> FileConfig {
        FileConfig {
            input: local.input.or(self.input),
            columns: local.columns.or(self.columns),
            output: local.output.or(self.output),
            max_concurrent: local.max_concurrent.or(self.max_concurrent),
            retry_times: local.retry_times.or(self.retry_times),
            retry_delay_ms: local.retry_delay_ms.or(self.retry_delay_ms),
            download_if_miss: local.download_if_miss.or(self.download_if_miss),
            warm_on: local.warm_on.or(self.warm_on),
            reprobe_after_warm: local.reprobe_after_warm.or(self.reprobe_after_warm),
            keep_downloaded_file: local.keep_downloaded_file.or(self.keep_downloaded_file),
            download_dir: local.download_dir.or(self.download_dir),
            head_wait_seconds: local.head_wait_seconds.or(self.head_wait_seconds),
            auto_purge: local.auto_purge.or(self.auto_purge),
            purge_endpoint: local.purge_endpoint.or(self.purge_endpoint),
            purge_token: local.purge_token.or(self.purge_token),
            purge_zone_id: local.purge_zone_id.or(self.purge_zone_id),
            cache_status_header: local.cache_status_header.or(self.cache_status_header),
            probe_timeout_seconds: local.probe_timeout_seconds.or(self.probe_timeout_seconds),
            download_timeout_seconds: local
                .download_timeout_seconds
                .or(self.download_timeout_seconds),
            body_prefix_bytes: local.body_prefix_bytes.or(self.body_prefix_bytes),
            use_range_request: local.use_range_request.or(self.use_range_request),
            user_agent: local.user_agent.or(self.user_agent),
        }
    }

    /// Resolves missing keys to defaults and validates the result.
    pub fn into_settings(self) -> Result<Settings, ConfigError> {
        let defaults = Config::default();
        let config = Config {
            max_concurrent: self.max_concurrent.unwrap_or(defaults.max_concurrent),
            retry_times: self.retry_times.unwrap_or(defaults.retry_times),
            retry_delay_ms: self.retry_delay_ms.unwrap_or(defaults.retry_delay_ms),
            download_if_miss: self.download_if_miss.unwrap_or(defaults.download_if_miss),
            warm_on: self.warm_on.unwrap_or(defaults.warm_on),
            reprobe_after_warm: self.reprobe_after_warm.unwrap_or(defaults.reprobe_after_warm),
            keep_downloaded_file: self
                .keep_downloaded_file
                .unwrap_or(defaults.keep_downloaded_file),
            download_dir: self.download_dir.unwrap_or(defaults.download_dir),
            head_wait_seconds: self.head_wait_seconds.unwrap_or(defaults.head_wait_seconds),
            auto_purge: self.auto_purge.unwrap_or(defaults.auto_purge),
            purge_endpoint: non_empty(self.purge_endpoint),
            purge_token: non_empty(self.purge_token),
            purge_zone_id: non_empty(self.purge_zone_id),
            cache_status_header: self
                .cache_status_header
                .unwrap_or(defaults.cache_status_header),
            probe_timeout_seconds: self
                .probe_timeout_seconds
                .unwrap_or(defaults.probe_timeout_seconds),
            download_timeout_seconds: self
                .download_timeout_seconds
                .unwrap_or(defaults.download_timeout_seconds),
            body_prefix_bytes: self.body_prefix_bytes.unwrap_or(defaults.body_prefix_bytes),
            use_range_request: self.use_range_request.unwrap_or(defaults.use_range_request),
            user_agent: self.user_agent.unwrap_or(defaults.user_agent),
        };
        config.validate()?;

        let columns = self
            .columns
            .unwrap_or_else(|| DEFAULT_COLUMNS.iter().map(|c| c.to_string()).collect());
        if columns.is_empty() {
            return Err(ConfigError::invalid("columns", "must name at least one column"));
        }

        Ok(Settings {
            config,
            input: non_empty(self.input),
            columns,
            output: self.output,
        })
    }
}

// Empty strings in TOML mean "unset" for credentials and sources.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
