//! Check finalization.
//!
//! This module contains the `finalize_check` function which handles the purge
//! decision and statistics after every task has finished.

use crate::app::{print_error_statistics, print_summary};
use crate::purge::purge;

use super::{CheckReport, CheckResources};

/// Finalize a check run and produce the final report.
///
/// This function performs the following finalization steps:
/// 1. Collect outcomes in input order
/// 2. Purge the failing URLs, if enabled and there are any
/// 3. Print failure statistics and the summary line
pub async fn finalize_check(resources: CheckResources) -> CheckReport {
    let CheckResources {
        ctx,
        aggregator,
        start_time,
        ..
    } = resources;

    let report = aggregator.take_report();
    let batch = report.purge_batch();

    let purged = if !ctx.config.auto_purge {
        None
    } else if batch.is_empty() {
        log::info!("No failing URLs, nothing to purge");
        None
    } else {
        Some(purge(&ctx, &batch).await)
    };

    print_error_statistics(&ctx.error_stats);

    let elapsed_seconds = start_time.elapsed().as_secs_f64();
    print_summary(&report, purged, elapsed_seconds);

    CheckReport {
        report,
        purged,
        elapsed_seconds,
    }
}
