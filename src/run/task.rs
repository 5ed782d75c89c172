//! Per-target task processing.
//!
//! This module contains the logic for processing a single target: the probe
//! retry loop, then warming and re-probing when the policy asks for it.

use crate::app::status_badge;
use crate::models::{ProbeOutcome, Target};
use crate::probe::{resolve, ProcessingContext};
use crate::warm::warm_and_refresh;

/// Process a single target.
///
/// Spawned as a Tokio task per target, holding its semaphore permit for the
/// whole sequence (probe, retries, warm, re-probe).
pub async fn process_target(ctx: &ProcessingContext, target: Target) -> ProbeOutcome {
    let mut outcome = resolve(ctx, &target).await;

    if ctx.config.should_warm(outcome.status()) {
        outcome = warm_and_refresh(ctx, outcome).await;
    }

    log_outcome(&outcome);
    outcome
}

fn log_outcome(outcome: &ProbeOutcome) {
    let target = outcome.target();
    match outcome.error_detail() {
        Some(detail) => log::info!(
            "{} {} [{}] cache={} age={} attempts={}: {}",
            status_badge(outcome.status()),
            target.url(),
            target.label(),
            outcome.cache_status(),
            outcome.age(),
            outcome.attempts_used(),
            detail
        ),
        None => log::info!(
            "{} {} [{}] cache={} age={} attempts={}",
            status_badge(outcome.status()),
            target.url(),
            target.label(),
            outcome.cache_status(),
            outcome.age(),
            outcome.attempts_used()
        ),
    }
}
