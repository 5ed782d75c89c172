//! Report export.
//!
//! This module writes the final report of a run as CSV (default) or JSON,
//! to a file or to stdout. One row per target with the columns
//! `url, label, status, cache_status, age, error_detail, attempts_used`.

mod csv;
mod json;
mod row;
mod types;

use std::path::Path;

use anyhow::Result;

use crate::models::Report;

pub use csv::export_csv;
pub use json::export_json;
pub use row::ReportRow;
pub use types::ExportFormat;

/// Writes `report` to `output` (stdout if `None`) in the format implied by the
/// output extension.
///
/// Returns the number of rows written.
///
/// # Errors
///
/// Returns an error if the output cannot be created or written.
pub fn write_report(report: &Report, output: Option<&Path>) -> Result<usize> {
    match ExportFormat::for_output(output) {
        ExportFormat::Csv => export_csv(report, output),
        ExportFormat::Json => export_json(report, output),
    }
}
