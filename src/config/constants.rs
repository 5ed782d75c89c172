//! Configuration constants.
//!
//! Defaults and fixed operational parameters used throughout the crate.

use std::time::Duration;

/// Interval in seconds between progress log lines.
pub const LOGGING_INTERVAL: u64 = 5;

// Defaults for `Config`
/// Default concurrency ceiling
pub const DEFAULT_MAX_CONCURRENT: usize = 5;
/// Default number of extra attempts beyond the first
pub const DEFAULT_RETRY_TIMES: u32 = 2;
/// Default fixed delay between probe attempts in milliseconds
pub const DEFAULT_RETRY_DELAY_MS: u64 = 500;
/// Default settle delay after a warm download, in seconds
pub const DEFAULT_HEAD_WAIT_SECONDS: f64 = 1.0;
/// Default directory for persisted warm downloads
pub const DEFAULT_DOWNLOAD_DIR: &str = "downloads";
/// Default vendor cache-status header (Cloudflare)
pub const DEFAULT_CACHE_STATUS_HEADER: &str = "cf-cache-status";
/// Default columns holding URLs in the input table
pub const DEFAULT_COLUMNS: &[&str] = &["url", "cover", "lrc"];

// Network operation timeouts
/// Probe request timeout in seconds
pub const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 15;
/// Warm download timeout in seconds
pub const DEFAULT_DOWNLOAD_TIMEOUT_SECS: u64 = 60;
/// TCP connection timeout in seconds
pub const TCP_CONNECT_TIMEOUT_SECS: u64 = 5;
/// Purge request timeout
pub const PURGE_TIMEOUT: Duration = Duration::from_secs(30);

/// Default User-Agent string for HTTP requests.
///
/// Mimics a modern Chrome browser on Windows. Some CDNs serve challenge pages
/// to obvious bot user agents, which would show up as false ERROR outcomes.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

// Body handling
/// Default number of body bytes handed to the content validator
pub const DEFAULT_BODY_PREFIX_BYTES: usize = 64;
/// Upper bound for `body_prefix_bytes`
pub const MAX_BODY_PREFIX_BYTES: usize = 64 * 1024;
/// Write buffer size for streamed warm downloads (1 MiB)
pub const DOWNLOAD_CHUNK_SIZE: usize = 1024 * 1024;

// Header names
/// `Age` response header
pub const HEADER_AGE: &str = "age";
/// Value reported for `age` when the header is absent
pub const DEFAULT_AGE: &str = "0";
/// Cache status value that marks a cold edge
pub const CACHE_STATUS_MISS: &str = "MISS";
