//! Progress logging utilities.

use std::sync::Arc;
use std::time::{Duration, Instant};

use log::info;
use tokio_util::sync::CancellationToken;

use crate::aggregate::ResultAggregator;
use crate::config::LOGGING_INTERVAL;

/// Logs progress information about target processing.
///
/// # Arguments
///
/// * `start_time` - The start time of processing
/// * `completed` - Number of targets with a recorded outcome
/// * `total` - Number of targets in the run
pub fn log_progress(start_time: Instant, completed: usize, total: usize) {
    let elapsed_secs = start_time.elapsed().as_secs_f64();
    let rate = if elapsed_secs > 0.0 {
        completed as f64 / elapsed_secs
    } else {
        0.0
    };
    info!(
        "Checked {}/{} targets in {:.2} seconds (~{:.2} targets/sec)",
        completed, total, elapsed_secs, rate
    );
}

/// Spawns a task logging progress every `LOGGING_INTERVAL` seconds until
/// `cancel` fires.
pub fn spawn_progress_logger(
    start_time: Instant,
    aggregator: Arc<ResultAggregator>,
    total: usize,
    cancel: CancellationToken,
) -> tokio::task::JoinHandle<()> {
    tokio::task::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(LOGGING_INTERVAL));
        // The first tick completes immediately
        interval.tick().await;
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    log_progress(start_time, aggregator.completed(), total);
                }
                _ = cancel.cancelled() => {
                    break;
                }
            }
        }
    })
}
