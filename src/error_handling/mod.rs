//! Error handling and processing statistics.
//!
//! This module provides:
//! - Error type definitions for each concern (config, input, probe, warm, purge)
//! - Failure categories and their thread-safe counters
//! - Retry strategy configuration
//!
//! Per-target failures never escape their target: they end up in the target's
//! outcome and in `ProcessingStats`. Configuration, input and report errors are
//! fatal to the run.

mod categorization;
mod stats;
mod types;

// Re-export public API
pub use categorization::{categorize_reqwest_error, get_retry_strategy, probe_error_from_reqwest};
pub use stats::ProcessingStats;
pub use types::{
    ConfigError, ErrorType, InitializationError, InputError, ProbeError, PurgeError, TargetError,
    WarmError,
};
