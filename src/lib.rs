//! cdn_cache_check library: CDN edge cache verification
//!
//! This library checks whether a list of URLs is served from a CDN edge cache.
//! Each URL is probed (with retries) and classified as SUCCESS, MISS or ERROR,
//! where "successful" responses that are really error pages count as ERROR.
//! Misses can be warmed by downloading the full resource and re-probed, and
//! URLs that still fail can be purged from the edge in one batched request.
//!
//! # Example
//!
//! ```no_run
//! use cdn_cache_check::{run_check, Config, Target};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     max_concurrent: 10,
//!     retry_times: 1,
//!     ..Default::default()
//! };
//! let targets = vec![Target::new("https://cdn.example.com/song.mp3", "url")?];
//!
//! let check = run_check(config, targets).await?;
//! for outcome in check.report.outcomes() {
//!     println!("{} {}", outcome.status(), outcome.target().url());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

#![warn(missing_docs)]

pub mod aggregate;
mod app;
pub mod config;
pub mod error_handling;
pub mod export;
pub mod initialization;
pub mod input;
mod models;
pub mod probe;
pub mod purge;
mod run;
pub mod validate;
pub mod warm;

// Re-export public API
pub use config::{Config, LogFormat, LogLevel, Settings, WarmPolicy};
pub use error_handling::{ErrorType, ProcessingStats};
pub use models::{ProbeOutcome, ProbeStatus, PurgeBatch, Report, Target};
pub use run::{dispatch, process_target, run_check, run_check_with_cancel, CheckReport};
