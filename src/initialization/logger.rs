//! Logger initialization.
//!
//! This module provides functions to initialize the logger with custom formatting.

use std::io::Write;

use crate::config::LogFormat;
use crate::error_handling::InitializationError;
use colored::*;
use log::LevelFilter;

/// Initializes the logger with the specified level and format.
///
/// Configures `env_logger` with custom formatting. Supports both plain text
/// (with colors and emojis) and JSON formats for structured logging.
///
/// The logger reads from the `RUST_LOG` environment variable first; the
/// provided `level` overrides it for this crate and as the global default.
///
/// # Errors
///
/// Returns `InitializationError::LoggerError` if a logger is already installed.
///
/// # Examples
///
/// ```bash
/// # Per-module filtering via RUST_LOG
/// RUST_LOG=reqwest=debug cdn_cache_check --log-level debug
/// ```
pub fn init_logger_with(level: LevelFilter, format: LogFormat) -> Result<(), InitializationError> {
    let mut builder = env_logger::Builder::from_default_env();

    builder.filter_level(level);
    builder.filter_module("reqwest", LevelFilter::Info);
    builder.filter_module("hyper", LevelFilter::Info);
    builder.filter_module("hyper_util", LevelFilter::Info);
    builder.filter_module("cdn_cache_check", level);

    match format {
        LogFormat::Json => {
            builder.format(|buf, record| {
                let line = json_line(
                    chrono::Utc::now().timestamp_millis(),
                    record.level(),
                    record.module_path().unwrap_or(record.target()),
                    &record.args().to_string(),
                );
                writeln!(buf, "{line}")
            });
        }
        LogFormat::Plain => {
            colored::control::set_override(true);
            builder.format(|buf, record| {
                let level = record.level();
                let colored_level = match level {
                    log::Level::Error => level.to_string().red(),
                    log::Level::Warn => level.to_string().yellow(),
                    log::Level::Info => level.to_string().green(),
                    log::Level::Debug => level.to_string().blue(),
                    log::Level::Trace => level.to_string().purple(),
                };

                let emoji = match level {
                    log::Level::Error => "❌",
                    log::Level::Warn => "⚠️",
                    log::Level::Info => "✔️",
                    log::Level::Debug => "🔍",
                    log::Level::Trace => "🔬",
                };

                writeln!(
                    buf,
                    "{} {} [{}] {}",
                    emoji,
                    record.target().cyan(),
                    colored_level,
                    record.args()
                )
            });
        }
    }

    // try_init so that tests initializing twice get an error instead of a panic
    builder.try_init().map_err(InitializationError::from)?;

    Ok(())
}

/// Renders one JSON log line.
///
/// Messages about a target carry its URL; it is lifted into a `url` field so
/// log pipelines can group lines per target.
fn json_line(ts_millis: i64, level: log::Level, module: &str, msg: &str) -> String {
    let mut line = serde_json::json!({
        "ts": ts_millis,
        "level": level.to_string(),
        "module": module,
        "msg": msg,
    });
    if let Some(url) = message_url(msg) {
        line["url"] = url.into();
    }
    line.to_string()
}

fn message_url(msg: &str) -> Option<&str> {
    msg.split_whitespace()
        .map(|word| word.trim_start_matches(['(', '\'', '"']))
        .find(|word| word.starts_with("http://") || word.starts_with("https://"))
        .map(|word| word.trim_end_matches([':', ',', ')', '\'', '"']))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_line_lifts_target_url() {
        let line = json_line(
            1_700_000_000_000,
            log::Level::Warn,
            "cdn_cache_check::warm",
            "Warm download of https://cdn.example.com/a.mp3: timed out",
        );
        let parsed: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed["ts"], 1_700_000_000_000i64);
        assert_eq!(parsed["level"], "WARN");
        assert_eq!(parsed["module"], "cdn_cache_check::warm");
        assert_eq!(parsed["url"], "https://cdn.example.com/a.mp3");
    }

    #[test]
    fn test_json_line_without_url() {
        let line = json_line(0, log::Level::Info, "cdn_cache_check", "Purged 3 \"URL(s)\"");
        let parsed: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed["msg"], "Purged 3 \"URL(s)\"");
        assert!(parsed.get("url").is_none());
    }

    #[test]
    fn test_init_logger_twice_does_not_panic() {
        // env_logger can only be installed once per process; the second call
        // must report an error rather than panic.
        let first = init_logger_with(LevelFilter::Info, LogFormat::Plain);
        let second = init_logger_with(LevelFilter::Debug, LogFormat::Json);
        assert!(first.is_ok() || second.is_err());
        assert!(second.is_err());
    }
}
