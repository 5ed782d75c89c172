//! Probe retry loop and outcome classification.

use std::sync::atomic::{AtomicU32, Ordering};

use crate::error_handling::get_retry_strategy;
use crate::models::{ProbeOutcome, Target};

use super::{probe, ProcessingContext, RawProbeResult};

/// Probes `target` until an attempt passes or the attempts run out.
///
/// Transport failures and content classification failures are both retried,
/// with `retry_delay_ms` between attempts and at most `retry_times + 1`
/// attempts in total. A passing attempt is terminal: a `MISS` cache status
/// gives a MISS outcome (a cold edge is not a reason to retry), anything else
/// gives SUCCESS. When every attempt fails the outcome is ERROR with the last
/// attempt's failure and cache fields.
///
/// Attempts are strictly sequential; the only suspension points are the
/// requests themselves and the delay between attempts.
pub async fn resolve(ctx: &ProcessingContext, target: &Target) -> ProbeOutcome {
    log::debug!("Starting probe for {} ({})", target.url(), target.label());

    let retry_strategy = get_retry_strategy(&ctx.config);
    // Counts every call of the action: the initial attempt plus retries
    let attempt_count = AtomicU32::new(0);

    let result = tokio_retry::Retry::spawn(retry_strategy, || {
        let attempt = attempt_count.fetch_add(1, Ordering::SeqCst) + 1;
        async move {
            let raw = probe(ctx, target.url()).await;
            match raw.failure() {
                None => Ok(raw),
                Some(error) => {
                    ctx.error_stats.increment_error(error.error_type());
                    log::debug!("Attempt {attempt} for {} failed: {error}", target.url());
                    Err(raw)
                }
            }
        }
    })
    .await;

    let attempts_used = attempt_count.load(Ordering::SeqCst);
    classify(target.clone(), result, attempts_used)
}

/// Maps the final attempt of the retry loop to an outcome.
pub fn classify(
    target: Target,
    result: Result<RawProbeResult, RawProbeResult>,
    attempts_used: u32,
) -> ProbeOutcome {
    match result {
        Ok(raw) if raw.is_miss() => {
            ProbeOutcome::miss(target, raw.cache_status, raw.age, attempts_used)
        }
        Ok(raw) => ProbeOutcome::success(target, raw.cache_status, raw.age, attempts_used),
        Err(raw) => {
            let detail = raw
                .failure()
                .map(ToString::to_string)
                .unwrap_or_else(|| "probe failed".to_string());
            log::warn!(
                "{} failed after {} attempt{}: {}",
                target.url(),
                attempts_used,
                if attempts_used == 1 { "" } else { "s" },
                detail
            );
            ProbeOutcome::error(target, raw.cache_status, raw.age, detail, attempts_used)
        }
    }
}
