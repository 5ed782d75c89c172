//! Cache warming by full download.
//!
//! Downloading the whole resource through the edge makes the CDN fetch it
//! from origin and store it. The body is streamed to disk, either under
//! `download_dir` (kept) or into a temporary file (deleted afterwards), and is
//! never held in memory as a whole.
//!
//! Warming never changes a target's classification by itself. Only the
//! optional re-probe after the settle delay can refresh or upgrade it.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

use tokio::io::{AsyncWriteExt, BufWriter};

use crate::config::DOWNLOAD_CHUNK_SIZE;
use crate::error_handling::WarmError;
use crate::models::{ProbeOutcome, Target};
use crate::probe::{probe, ProcessingContext, RawProbeResult};

/// A completed warm download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WarmedFile {
    /// Where the body was kept; `None` when it went to a deleted temp file
    pub path: Option<PathBuf>,
    /// Number of body bytes written
    pub bytes: u64,
}

/// Downloads the full body of `target` through the edge.
///
/// # Errors
///
/// `WarmError::Transport` for request, non-2xx or stream failures and
/// `WarmError::Persistence` when the destination cannot be created, written
/// or (for temp files) deleted.
pub async fn warm(ctx: &ProcessingContext, target: &Target) -> Result<WarmedFile, WarmError> {
    let config = &ctx.config;
    let response = ctx
        .download_client
        .get(target.url())
        .send()
        .await?
        .error_for_status()?;

    if config.keep_downloaded_file {
        tokio::fs::create_dir_all(&config.download_dir)
            .await
            .map_err(|e| WarmError::persistence("create", &config.download_dir, e))?;
        let path = download_path(&config.download_dir, target);
        let file = tokio::fs::File::create(&path)
            .await
            .map_err(|e| WarmError::persistence("create", &path, e))?;
        let bytes = stream_to_file(response, file, &path).await?;
        Ok(WarmedFile {
            path: Some(path),
            bytes,
        })
    } else {
        let bytes = stream_to_temp_file(response, std::env::temp_dir()).await?;
        Ok(WarmedFile { path: None, bytes })
    }
}

/// Streams `response` into a new file under `dir`, then deletes the file.
async fn stream_to_temp_file(
    response: reqwest::Response,
    dir: PathBuf,
) -> Result<u64, WarmError> {
    let temp_dir = dir.clone();
    let created = tokio::task::spawn_blocking(move || {
        let temp = tempfile::Builder::new()
            .prefix("warm-")
            .tempfile_in(&temp_dir)?;
        let (file, temp_path) = temp.into_parts();
        // Deleted below with tokio::fs instead of on drop
        let path = temp_path.keep().map_err(|e| e.error)?;
        Ok::<_, std::io::Error>((file, path))
    })
    .await
    .map_err(|e| WarmError::persistence("create", &dir, std::io::Error::other(e)))?;
    let (file, path) = created.map_err(|e| WarmError::persistence("create", &dir, e))?;

    let written = stream_to_file(response, tokio::fs::File::from_std(file), &path).await;
    // Delete even when the stream failed half-way
    let deleted = tokio::fs::remove_file(&path)
        .await
        .map_err(|e| WarmError::persistence("delete", &path, e));
    let bytes = written?;
    deleted?;
    Ok(bytes)
}

async fn stream_to_file(
    mut response: reqwest::Response,
    file: tokio::fs::File,
    path: &Path,
) -> Result<u64, WarmError> {
    let mut writer = BufWriter::with_capacity(DOWNLOAD_CHUNK_SIZE, file);
    let mut bytes = 0u64;
    while let Some(chunk) = response.chunk().await? {
        writer
            .write_all(&chunk)
            .await
            .map_err(|e| WarmError::persistence("write", path, e))?;
        bytes += chunk.len() as u64;
    }
    writer
        .flush()
        .await
        .map_err(|e| WarmError::persistence("write", path, e))?;
    Ok(bytes)
}

/// Destination of a kept download: `<label>_<url-hash>_<basename>`.
///
/// The hash keeps paths unique per URL, so concurrent targets with the same
/// basename never share a file.
pub fn download_path(dir: &Path, target: &Target) -> PathBuf {
    let mut hasher = DefaultHasher::new();
    target.url().hash(&mut hasher);
    let basename = url::Url::parse(target.url())
        .ok()
        .and_then(|u| {
            u.path_segments()
                .and_then(|segments| segments.last().map(str::to_string))
        })
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "download".to_string());
    dir.join(format!(
        "{}_{:016x}_{}",
        sanitize(target.label()),
        hasher.finish(),
        sanitize(&basename)
    ))
}

fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Warms the target of `outcome`, waits, then optionally re-probes.
///
/// Download failures are logged and counted; the re-probe still runs since a
/// partial download may already have populated the edge.
pub async fn warm_and_refresh(ctx: &ProcessingContext, outcome: ProbeOutcome) -> ProbeOutcome {
    let url = outcome.target().url().to_string();
    log::info!("Warming {url} ({})", outcome.status());

    match warm(ctx, outcome.target()).await {
        Ok(WarmedFile {
            path: Some(path),
            bytes,
        }) => log::debug!("Warmed {url}: {bytes} bytes kept at {}", path.display()),
        Ok(WarmedFile { path: None, bytes }) => log::debug!("Warmed {url}: {bytes} bytes"),
        Err(e) => {
            ctx.error_stats.increment_error(e.error_type());
            log::warn!("Warm download of {url} failed: {e}");
        }
    }

    tokio::time::sleep(ctx.config.head_wait()).await;

    if !ctx.config.reprobe_after_warm {
        return outcome;
    }

    let raw = probe(ctx, &url).await;
    if let Some(error) = raw.failure() {
        ctx.error_stats.increment_error(error.error_type());
    }
    apply_reprobe(outcome, raw)
}

/// Folds a re-probe into an outcome.
///
/// A failing re-probe changes nothing. A passing `MISS` refreshes the cache
/// fields only; any other passing status upgrades the outcome to SUCCESS.
pub fn apply_reprobe(outcome: ProbeOutcome, raw: RawProbeResult) -> ProbeOutcome {
    if let Some(error) = raw.failure() {
        log::debug!(
            "Re-probe of {} failed, keeping {}: {error}",
            outcome.target().url(),
            outcome.status()
        );
        return outcome;
    }
    if raw.is_miss() {
        outcome.refreshed(raw.cache_status, raw.age)
    } else {
        log::info!(
            "{} now served with cache status {}",
            outcome.target().url(),
            raw.cache_status
        );
        outcome.upgraded(raw.cache_status, raw.age)
    }
}
