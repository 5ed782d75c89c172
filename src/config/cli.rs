//! Command-line options.
//!
//! CLI values take precedence over configuration files, which take precedence
//! over built-in defaults.

use std::path::PathBuf;

use clap::Parser;

use crate::config::{FileConfig, LogFormat, LogLevel, Settings, WarmPolicy};
use crate::error_handling::ConfigError;

/// Command-line options.
///
/// # Examples
///
/// ```bash
/// # Use config.toml (and config_local.toml if present)
/// cdn_cache_check
///
/// # Override the input and write a JSON report
/// cdn_cache_check --input songs.csv --output report.json
///
/// # Purge failures, token from the environment
/// CDN_PURGE_TOKEN=... cdn_cache_check --auto-purge
/// ```
#[derive(Debug, Parser)]
#[command(
    name = "cdn_cache_check",
    version,
    about = "Checks whether URLs are served from CDN edge cache, warms misses and purges failures."
)]
pub struct Opt {
    /// Base configuration file (TOML)
    #[arg(long, value_parser, default_value = "config.toml")]
    pub config: PathBuf,

    /// Local overlay configuration file, applied when present
    #[arg(long, value_parser, default_value = "config_local.toml")]
    pub local_config: PathBuf,

    /// Input table (CSV or JSON), local path or http(s) URL
    #[arg(long)]
    pub input: Option<String>,

    /// Report destination (.csv or .json); stdout as CSV if omitted
    #[arg(long, value_parser)]
    pub output: Option<PathBuf>,

    /// Comma-separated columns holding URLs
    #[arg(long, value_delimiter = ',')]
    pub columns: Option<Vec<String>>,

    /// Maximum number of targets checked concurrently
    #[arg(long)]
    pub max_concurrent: Option<usize>,

    /// Extra probe attempts beyond the first
    #[arg(long)]
    pub retry_times: Option<u32>,

    /// Disable warm downloads
    #[arg(long)]
    pub no_download: bool,

    /// Which outcome triggers a warm download: miss|error|any
    #[arg(long, value_enum)]
    pub warm_on: Option<WarmPolicy>,

    /// Purge still-failing URLs at the end of the run
    #[arg(long)]
    pub auto_purge: bool,

    /// Bearer token for the purge API
    #[arg(long, env = "CDN_PURGE_TOKEN", hide_env_values = true)]
    pub purge_token: Option<String>,

    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,
}

impl Opt {
    /// Loads the configuration files and applies CLI overrides.
    ///
    /// The base file is optional when left at its default name; an explicitly
    /// named base file that does not exist is an error.
    pub fn into_settings(self) -> Result<Settings, ConfigError> {
        let base = if self.config.exists() || self.config != PathBuf::from("config.toml") {
            FileConfig::load(&self.config)?
        } else {
            log::info!(
                "No {} found, using built-in defaults",
                self.config.display()
            );
            FileConfig::default()
        };
        let merged = match FileConfig::load_optional(&self.local_config)? {
            Some(local) => {
                log::debug!("Applying local overlay {}", self.local_config.display());
                base.overlay(local)
            }
            None => base,
        };

        self.apply(merged).into_settings()
    }

    fn apply(self, file: FileConfig) -> FileConfig {
        FileConfig {
            input: self.input.or(file.input),
            output: self.output.or(file.output),
            columns: self.columns.or(file.columns),
            max_concurrent: self.max_concurrent.or(file.max_concurrent),
            retry_times: self.retry_times.or(file.retry_times),
            download_if_miss: if self.no_download {
                Some(false)
            } else {
                file.download_if_miss
            },
            warm_on: self.warm_on.or(file.warm_on),
            auto_purge: if self.auto_purge {
                Some(true)
            } else {
                file.auto_purge
            },
            purge_token: self.purge_token.or(file.purge_token),
            ..file
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let opt = Opt::try_parse_from(["cdn_cache_check"]).unwrap();
        assert_eq!(opt.config, PathBuf::from("config.toml"));
        assert_eq!(opt.local_config, PathBuf::from("config_local.toml"));
        assert!(!opt.no_download);
        assert!(!opt.auto_purge);
        assert!(opt.columns.is_none());
    }

    #[test]
    fn test_cli_overrides_file_values() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("config.toml");
        std::fs::write(
            &base,
            "input = \"a.csv\"\nmax_concurrent = 3\ndownload_if_miss = true\n",
        )
        .unwrap();

        let opt = Opt::try_parse_from([
            "cdn_cache_check",
            "--config",
            base.to_str().unwrap(),
            "--local-config",
            dir.path().join("absent.toml").to_str().unwrap(),
            "--max-concurrent",
            "9",
            "--columns",
            "url,cover",
            "--no-download",
            "--auto-purge",
        ])
        .unwrap();

        let settings = opt.into_settings().unwrap();
        assert_eq!(settings.input.as_deref(), Some("a.csv"));
        assert_eq!(settings.config.max_concurrent, 9);
        assert!(!settings.config.download_if_miss);
        assert!(settings.config.auto_purge);
        assert_eq!(settings.columns, vec!["url", "cover"]);
    }

    #[test]
    fn test_local_overlay_is_applied() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("config.toml");
        let local = dir.path().join("config_local.toml");
        std::fs::write(&base, "retry_times = 1\n").unwrap();
        std::fs::write(&local, "retry_times = 4\npurge_zone_id = \"z1\"\n").unwrap();

        let opt = Opt::try_parse_from([
            "cdn_cache_check",
            "--config",
            base.to_str().unwrap(),
            "--local-config",
            local.to_str().unwrap(),
        ])
        .unwrap();
        let settings = opt.into_settings().unwrap();
        assert_eq!(settings.config.retry_times, 4);
        assert_eq!(settings.config.purge_zone_id.as_deref(), Some("z1"));
    }

    #[test]
    fn test_explicit_missing_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let opt = Opt::try_parse_from([
            "cdn_cache_check",
            "--config",
            dir.path().join("nope.toml").to_str().unwrap(),
        ])
        .unwrap();
        assert!(matches!(
            opt.into_settings(),
            Err(ConfigError::Read { .. })
        ));
    }
}
