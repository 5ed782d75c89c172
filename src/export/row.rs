//! Shared export row.

use serde::Serialize;

use crate::models::{ProbeOutcome, ProbeStatus};

/// One report row, shared by the CSV and JSON exporters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow<'a> {
    /// Checked URL
    pub url: &'a str,
    /// Input column the URL came from
    pub label: &'a str,
    /// SUCCESS, MISS or ERROR
    pub status: ProbeStatus,
    /// Cache-status header of the last probe
    pub cache_status: &'a str,
    /// `age` header of the last probe
    pub age: &'a str,
    /// Last failure, for ERROR rows
    pub error_detail: Option<&'a str>,
    /// Probe attempts made
    pub attempts_used: u32,
}

impl<'a> From<&'a ProbeOutcome> for ReportRow<'a> {
    fn from(outcome: &'a ProbeOutcome) -> Self {
        ReportRow {
            url: outcome.target().url(),
            label: outcome.target().label(),
            status: outcome.status(),
            cache_status: outcome.cache_status(),
            age: outcome.age(),
            error_detail: outcome.error_detail(),
            attempts_used: outcome.attempts_used(),
        }
    }
}
