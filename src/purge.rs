//! Batched edge-cache purge.
//!
//! At the end of a run the URLs that are still failing are purged in one
//! request so that the next fetch goes back to origin. The API shape is
//! Cloudflare's `POST /zones/{zone_id}/purge_cache` with `{"files": [...]}`.
//!
//! Purging is best-effort: every failure is logged and counted, none is fatal.

use serde::Serialize;

use crate::config::{Config, PURGE_TIMEOUT};
use crate::error_handling::{ErrorType, PurgeError};
use crate::models::PurgeBatch;
use crate::probe::ProcessingContext;

#[derive(Serialize)]
struct PurgeRequest<'a> {
    files: Vec<&'a str>,
}

/// Purge credentials taken from the configuration.
#[derive(Debug, PartialEq, Eq)]
struct Credentials<'a> {
    endpoint: &'a str,
    token: &'a str,
    zone_id: &'a str,
}

impl<'a> Credentials<'a> {
    fn from_config(config: &'a Config) -> Result<Self, PurgeError> {
        let endpoint = non_empty(config.purge_endpoint.as_deref());
        let token = non_empty(config.purge_token.as_deref());
        let zone_id = non_empty(config.purge_zone_id.as_deref());
        match (endpoint, token, zone_id) {
            (Some(endpoint), Some(token), Some(zone_id)) => Ok(Credentials {
                endpoint,
                token,
                zone_id,
            }),
            _ => {
                let mut missing = Vec::new();
                if endpoint.is_none() {
                    missing.push("purge_endpoint");
                }
                if token.is_none() {
                    missing.push("purge_token");
                }
                if zone_id.is_none() {
                    missing.push("purge_zone_id");
                }
                Err(PurgeError::MissingCredentials(missing))
            }
        }
    }

    fn url(&self) -> String {
        format!(
            "{}/zones/{}/purge_cache",
            self.endpoint.trim_end_matches('/'),
            self.zone_id
        )
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Requests a purge of `urls`, returning true iff the API answered 200.
///
/// Sends nothing and returns false when the endpoint, token or zone id is
/// missing.
pub async fn purge(ctx: &ProcessingContext, urls: &PurgeBatch) -> bool {
    match try_purge(ctx, urls).await {
        Ok(()) => {
            log::info!("Purged {} URL(s) from the edge cache", urls.len());
            true
        }
        Err(e) => {
            let error_type = match &e {
                PurgeError::MissingCredentials(_) => ErrorType::PurgeSkipped,
                PurgeError::Request(_) => ErrorType::PurgeRequestError,
                PurgeError::Rejected { .. } => ErrorType::PurgeRejected,
            };
            ctx.error_stats.increment_error(error_type);
            log::warn!("Purge of {} URL(s) not done: {e}", urls.len());
            false
        }
    }
}

/// Sends the purge request.
///
/// # Errors
///
/// `PurgeError::MissingCredentials` when credentials are incomplete,
/// `PurgeError::Request` when the request cannot be sent or times out and
/// `PurgeError::Rejected` for any status other than 200.
pub async fn try_purge(ctx: &ProcessingContext, urls: &PurgeBatch) -> Result<(), PurgeError> {
    let credentials = Credentials::from_config(&ctx.config)?;
    let body = PurgeRequest {
        files: urls.iter().map(String::as_str).collect(),
    };

    log::debug!("Purging {} URL(s) via {}", urls.len(), credentials.url());
    let response = ctx
        .client
        .post(credentials.url())
        .bearer_auth(credentials.token)
        .timeout(PURGE_TIMEOUT)
        .json(&body)
        .send()
        .await?;

    let status = response.status();
    if status == reqwest::StatusCode::OK {
        return Ok(());
    }
    let body = response.text().await.unwrap_or_default();
    Err(PurgeError::Rejected {
        status: status.as_u16(),
        body,
    })
}
