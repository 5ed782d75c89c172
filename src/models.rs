//! Core data model: targets, outcomes and the report.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;
use url::Url;

use crate::error_handling::TargetError;

/// A URL to check, with the input column it came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Target {
    url: String,
    label: String,
}

impl Target {
    /// Creates a target, rejecting anything that is not an absolute http(s) URL.
    pub fn new(url: impl Into<String>, label: impl Into<String>) -> Result<Self, TargetError> {
        let url = url.into().trim().to_string();
        let parsed = Url::parse(&url).map_err(|e| TargetError::InvalidUrl {
            url: url.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(TargetError::UnsupportedScheme {
                scheme: parsed.scheme().to_string(),
                url,
            });
        }
        Ok(Target {
            url,
            label: label.into(),
        })
    }

    /// The URL as given (trimmed).
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The input column this URL came from.
    pub fn label(&self) -> &str {
        &self.label
    }
}

/// Canonical classification of a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProbeStatus {
    /// Content was served and passed validation.
    Success,
    /// Content passed validation but the edge reported a cache MISS.
    Miss,
    /// Every attempt failed (transport or content validation).
    Error,
}

impl ProbeStatus {
    /// Upper-case name used in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProbeStatus::Success => "SUCCESS",
            ProbeStatus::Miss => "MISS",
            ProbeStatus::Error => "ERROR",
        }
    }
}

impl fmt::Display for ProbeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Final result for one target.
///
/// Only constructible through [`ProbeOutcome::success`], [`ProbeOutcome::miss`]
/// and [`ProbeOutcome::error`], so `error_detail` is set exactly when the
/// status is `Error`, and `attempts_used` is at least 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOutcome {
    target: Target,
    status: ProbeStatus,
    cache_status: String,
    age: String,
    error_detail: Option<String>,
    attempts_used: u32,
}

impl ProbeOutcome {
    /// Content served and validated.
    pub fn success(target: Target, cache_status: String, age: String, attempts_used: u32) -> Self {
        Self::build(target, ProbeStatus::Success, cache_status, age, None, attempts_used)
    }

    /// Content validated but the edge reported MISS.
    pub fn miss(target: Target, cache_status: String, age: String, attempts_used: u32) -> Self {
        Self::build(target, ProbeStatus::Miss, cache_status, age, None, attempts_used)
    }

    /// All attempts failed; `detail` describes the last failure.
    pub fn error(
        target: Target,
        cache_status: String,
        age: String,
        detail: impl Into<String>,
        attempts_used: u32,
    ) -> Self {
        Self::build(
            target,
            ProbeStatus::Error,
            cache_status,
            age,
            Some(detail.into()),
            attempts_used,
        )
    }

    fn build(
        target: Target,
        status: ProbeStatus,
        cache_status: String,
        age: String,
        error_detail: Option<String>,
        attempts_used: u32,
    ) -> Self {
        ProbeOutcome {
            target,
            status,
            cache_status,
            age,
            error_detail,
            attempts_used: attempts_used.max(1),
        }
    }

    /// Same classification with cache fields from a later probe.
    pub fn refreshed(self, cache_status: String, age: String) -> Self {
        ProbeOutcome {
            cache_status,
            age,
            ..self
        }
    }

    /// Upgraded to SUCCESS after a passing re-probe. `attempts_used` is kept.
    pub fn upgraded(self, cache_status: String, age: String) -> Self {
        let attempts_used = self.attempts_used;
        Self::success(self.target, cache_status, age, attempts_used)
    }

    /// The checked target.
    pub fn target(&self) -> &Target {
        &self.target
    }

    /// Classification.
    pub fn status(&self) -> ProbeStatus {
        self.status
    }

    /// Value of the cache-status header of the most recent probe (upper-cased).
    pub fn cache_status(&self) -> &str {
        &self.cache_status
    }

    /// Value of the `age` header of the most recent probe.
    pub fn age(&self) -> &str {
        &self.age
    }

    /// Last failure description, set only for `Error`.
    pub fn error_detail(&self) -> Option<&str> {
        self.error_detail.as_deref()
    }

    /// Number of probe attempts made by the retry loop.
    pub fn attempts_used(&self) -> u32 {
        self.attempts_used
    }
}

/// Distinct URLs submitted in the single purge request of a run.
pub type PurgeBatch = BTreeSet<String>;

/// One outcome per processed target, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    outcomes: Vec<ProbeOutcome>,
}

impl Report {
    /// Wraps outcomes that are already in input order.
    pub fn new(outcomes: Vec<ProbeOutcome>) -> Self {
        Report { outcomes }
    }

    /// Outcomes in input order.
    pub fn outcomes(&self) -> &[ProbeOutcome] {
        &self.outcomes
    }

    /// Number of outcomes.
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    /// True when no target was processed.
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Number of outcomes with `status`.
    pub fn count(&self, status: ProbeStatus) -> usize {
        self.outcomes.iter().filter(|o| o.status() == status).count()
    }

    /// Distinct URLs of ERROR outcomes.
    pub fn purge_batch(&self) -> PurgeBatch {
        self.outcomes
            .iter()
            .filter(|o| o.status() == ProbeStatus::Error)
            .map(|o| o.target().url().to_string())
            .collect()
    }
}
