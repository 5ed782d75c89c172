//! Cache probing.
//!
//! A probe is one GET request against a target. It records the cache signals
//! of the response (vendor cache-status header, `age`, `content-type`) and
//! decides whether the response is real content:
//!
//! 1. transport failure or non-2xx: transport error
//! 2. HTML or JSON `content-type`: content error, whatever the cache status
//! 3. otherwise the first `body_prefix_bytes` of the body go through
//!    [`crate::validate::is_error_content`]
//!
//! Classification into SUCCESS/MISS/ERROR is left to [`retry::resolve`],
//! which decides whether another attempt is worth it.

mod context;
pub mod retry;

pub use context::ProcessingContext;
pub use retry::resolve;

use reqwest::header::{HeaderMap, CONTENT_TYPE, RANGE};

use crate::config::{CACHE_STATUS_MISS, DEFAULT_AGE, HEADER_AGE, MAX_BODY_PREFIX_BYTES};
use crate::error_handling::{probe_error_from_reqwest, ProbeError};
use crate::validate::is_error_content;

/// What a single probe observed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawProbeResult {
    /// A response arrived with a 2xx status
    pub http_ok: bool,
    /// Response status, if a response arrived
    pub status_code: Option<u16>,
    /// Cache-status header, upper-cased; empty when absent
    pub cache_status: String,
    /// `age` header; `"0"` when absent
    pub age: String,
    /// `content-type` header; empty when absent
    pub content_type: String,
    /// Inspected body prefix (empty if the body was not read)
    pub body_prefix: Vec<u8>,
    /// Connection, timeout, status or body read failure
    pub transport_error: Option<ProbeError>,
    /// Content-type or body heuristic failure
    pub content_error: Option<ProbeError>,
}

impl RawProbeResult {
    fn transport_failure(error: ProbeError) -> Self {
        RawProbeResult {
            age: DEFAULT_AGE.to_string(),
            transport_error: Some(error),
            ..Default::default()
        }
    }

    /// The reason this probe did not pass, transport errors first.
    pub fn failure(&self) -> Option<&ProbeError> {
        self.transport_error.as_ref().or(self.content_error.as_ref())
    }

    /// True when the response arrived and looks like real content.
    pub fn passed(&self) -> bool {
        self.failure().is_none()
    }

    /// True when the edge reported a cache MISS.
    pub fn is_miss(&self) -> bool {
        self.cache_status == CACHE_STATUS_MISS
    }
}

/// Issues one GET request for `url` and inspects the response.
///
/// Never fails: every problem is recorded in the returned result. The body is
/// read only up to `body_prefix_bytes`; the response is dropped afterwards.
pub async fn probe(ctx: &ProcessingContext, url: &str) -> RawProbeResult {
    let config = &ctx.config;
    let mut request = ctx.client.get(url);
    if config.use_range_request {
        let last_byte = config.body_prefix_bytes.saturating_sub(1);
        request = request.header(RANGE, format!("bytes=0-{last_byte}"));
    }

    let mut response = match request.send().await {
        Ok(response) => response,
        Err(e) => {
            log::debug!("Probe of {url} failed: {e}");
            return RawProbeResult::transport_failure(probe_error_from_reqwest(&e));
        }
    };

    let status = response.status();
    let headers = response.headers();
    let age = header_value(headers, HEADER_AGE);
    let mut result = RawProbeResult {
        http_ok: status.is_success(),
        status_code: Some(status.as_u16()),
        cache_status: header_value(headers, &config.cache_status_header.to_ascii_lowercase())
            .trim()
            .to_ascii_uppercase(),
        age: if age.is_empty() {
            DEFAULT_AGE.to_string()
        } else {
            age
        },
        content_type: header_value(headers, CONTENT_TYPE.as_str()),
        ..Default::default()
    };

    if !status.is_success() {
        result.transport_error = Some(ProbeError::HttpStatus(status.as_u16()));
        return result;
    }

    if let Some(error) = classify_content_type(&result.content_type) {
        result.content_error = Some(error);
        return result;
    }

    match read_prefix(&mut response, config.body_prefix_bytes).await {
        Ok(prefix) => {
            if is_error_content(&prefix) {
                result.content_error = Some(ProbeError::ErrorPageBody);
            }
            result.body_prefix = prefix;
        }
        Err(e) => {
            result.transport_error = Some(probe_error_from_reqwest(&e));
        }
    }

    result
}

/// HTML and JSON responses for an asset URL are almost always error pages.
pub fn classify_content_type(content_type: &str) -> Option<ProbeError> {
    let lowered = content_type.to_ascii_lowercase();
    if lowered.contains("html") {
        Some(ProbeError::HtmlContent(content_type.to_string()))
    } else if lowered.contains("json") {
        Some(ProbeError::JsonContent(content_type.to_string()))
    } else {
        None
    }
}

fn header_value(headers: &HeaderMap, name: &str) -> String {
    headers
        .get(name)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
        .unwrap_or_default()
}

async fn read_prefix(
    response: &mut reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, reqwest::Error> {
    let mut prefix = Vec::with_capacity(limit.min(MAX_BODY_PREFIX_BYTES));
    while prefix.len() < limit {
        match response.chunk().await? {
            Some(chunk) => {
                let take = (limit - prefix.len()).min(chunk.len());
                prefix.extend_from_slice(&chunk[..take]);
            }
            None => break,
        }
    }
    Ok(prefix)
}
