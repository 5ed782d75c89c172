//! Run presentation helpers.
//!
//! This module provides progress logging, background task shutdown and the
//! end-of-run statistics used by the check loop.

pub mod logging;
pub mod shutdown;
pub mod statistics;

// Re-export public API
pub use logging::{log_progress, spawn_progress_logger};
pub use shutdown::shutdown_gracefully;
pub use statistics::{print_error_statistics, print_summary, status_badge};
