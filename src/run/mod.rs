//! Check orchestration.
//!
//! One Tokio task is spawned per target. Each task holds a permit of a
//! `max_concurrent`-sized semaphore for its whole lifetime, so at most that
//! many targets are in flight. Targets waiting for a permit are not polled.
//! Cancelling the token stops dispatch of new targets; targets already in
//! flight run to completion (bounded by their request timeouts).

mod finalize;
mod resources;
mod task;

use std::future::Future;
use std::sync::Arc;

use anyhow::Result;
use futures::stream::{FuturesUnordered, StreamExt};
use tokio_util::sync::CancellationToken;

use crate::aggregate::ResultAggregator;
use crate::app::{log_progress, shutdown_gracefully, spawn_progress_logger};
use crate::config::{Config, DEFAULT_AGE};
use crate::error_handling::{ErrorType, ProcessingStats};
use crate::initialization::init_semaphore;
use crate::models::{ProbeOutcome, Report, Target};

pub use finalize::finalize_check;
pub use resources::{init_check_resources, CheckResources};
pub use task::process_target;

/// Result of a check run.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckReport {
    /// One outcome per processed target, in input order
    pub report: Report,
    /// `None` when no purge was attempted, otherwise whether it succeeded
    pub purged: Option<bool>,
    /// Wall-clock duration of the run
    pub elapsed_seconds: f64,
}

/// Checks every target under `config`.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the HTTP clients cannot
/// be built. Per-target failures never fail the run; they are reported as
/// ERROR outcomes.
pub async fn run_check(config: Config, targets: Vec<Target>) -> Result<CheckReport> {
    run_check_with_cancel(config, targets, CancellationToken::new()).await
}

/// Like [`run_check`], stopping dispatch of new targets once `cancel` fires.
///
/// Targets not dispatched before cancellation have no outcome in the report.
///
/// # Errors
///
/// Same as [`run_check`].
pub async fn run_check_with_cancel(
    config: Config,
    targets: Vec<Target>,
    cancel: CancellationToken,
) -> Result<CheckReport> {
    let resources = init_check_resources(config, targets.len())?;

    let logging_cancel = CancellationToken::new();
    let logging_task = spawn_progress_logger(
        resources.start_time,
        Arc::clone(&resources.aggregator),
        resources.total_targets,
        logging_cancel.clone(),
    );

    let ctx = Arc::clone(&resources.ctx);
    dispatch(
        targets,
        resources.ctx.config.max_concurrent,
        &cancel,
        &resources.aggregator,
        &resources.ctx.error_stats,
        move |target| {
            let ctx = Arc::clone(&ctx);
            async move { process_target(&ctx, target).await }
        },
    )
    .await;

    shutdown_gracefully(logging_cancel, Some(logging_task)).await;
    log_progress(
        resources.start_time,
        resources.aggregator.completed(),
        resources.total_targets,
    );

    Ok(finalize_check(resources).await)
}

/// Runs `process` for every target with at most `max_concurrent` in flight.
///
/// Outcomes are recorded in `aggregator` under the target's input index. A
/// task that panics is recorded as an ERROR outcome with one attempt.
pub async fn dispatch<F, Fut>(
    targets: Vec<Target>,
    max_concurrent: usize,
    cancel: &CancellationToken,
    aggregator: &Arc<ResultAggregator>,
    error_stats: &ProcessingStats,
    process: F,
) where
    F: Fn(Target) -> Fut,
    Fut: Future<Output = ProbeOutcome> + Send + 'static,
{
    let semaphore = init_semaphore(max_concurrent);
    let total = targets.len();
    let mut tasks = FuturesUnordered::new();

    for (index, target) in targets.into_iter().enumerate() {
        let permit = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                log::warn!(
                    "Cancelled: {} of {} targets not dispatched",
                    total - index,
                    total
                );
                break;
            }
            permit = Arc::clone(&semaphore).acquire_owned() => match permit {
                Ok(permit) => permit,
                Err(e) => {
                    log::error!("Concurrency semaphore closed: {e}");
                    break;
                }
            },
        };

        let work = process(target.clone());
        let task_aggregator = Arc::clone(aggregator);
        let handle = tokio::task::spawn(async move {
            let _permit = permit; // Hold permit until task completes
            let outcome = work.await;
            task_aggregator.record(index, outcome);
        });
        tasks.push(async move { (index, target, handle.await) });
    }

    while let Some((index, target, result)) = tasks.next().await {
        if let Err(join_error) = result {
            log::warn!("Task for {} panicked: {join_error}", target.url());
            error_stats.increment_error(ErrorType::TaskPanicked);
            let detail = format!("task failed: {join_error}");
            aggregator.record(
                index,
                ProbeOutcome::error(target, String::new(), DEFAULT_AGE.to_string(), detail, 1),
            );
        }
    }
}
