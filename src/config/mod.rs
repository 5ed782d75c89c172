//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (timeouts, limits, defaults)
//! - The run `Config` and its validation
//! - TOML configuration files with a local overlay
//! - CLI option types and parsing

mod constants;
mod file;
mod types;

pub mod cli;

// Re-export all constants
pub use constants::*;
pub use file::{FileConfig, Settings};
pub use types::{Config, LogFormat, LogLevel, WarmPolicy};
