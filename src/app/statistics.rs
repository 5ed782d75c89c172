//! Statistics printing.

use colored::{ColoredString, Colorize};
use log::info;

use crate::error_handling::ProcessingStats;
use crate::models::{ProbeStatus, Report};

/// Console badge of a status: emoji plus coloured name.
pub fn status_badge(status: ProbeStatus) -> ColoredString {
    match status {
        ProbeStatus::Success => format!("✅ {status}").green(),
        ProbeStatus::Miss => format!("⚠️ {status}").yellow(),
        ProbeStatus::Error => format!("❌ {status}").red(),
    }
}

/// Prints a one-line summary of the run.
///
/// Works with both plain and JSON log formats (log::info! handles formatting).
pub fn print_summary(report: &Report, purged: Option<bool>, elapsed_seconds: f64) {
    let total = report.len();
    info!(
        "Checked {} target{} in {:.1}s: {} success, {} miss, {} error",
        total,
        if total == 1 { "" } else { "s" },
        elapsed_seconds,
        report.count(ProbeStatus::Success),
        report.count(ProbeStatus::Miss),
        report.count(ProbeStatus::Error),
    );
    match purged {
        Some(true) => info!("Edge cache purged for failing URLs"),
        Some(false) => info!("Edge cache purge was requested but did not succeed"),
        None => {}
    }
}

/// Prints failure counts per category to the log.
///
/// Only non-zero categories are printed.
pub fn print_error_statistics(error_stats: &ProcessingStats) {
    let total_errors = error_stats.total_errors();
    if total_errors > 0 {
        info!("Failure Counts ({} total):", total_errors);
        for (error_type, count) in error_stats.non_zero() {
            info!("   {}: {}", error_type.as_str(), count);
        }
    }
}
