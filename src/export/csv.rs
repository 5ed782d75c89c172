//! CSV export functionality.

use anyhow::{Context, Result};
use csv::Writer;
use std::io::{self, Write};
use std::path::Path;

use crate::models::Report;

use super::ReportRow;

/// Exports the report to CSV.
///
/// # Arguments
///
/// * `report` - Outcomes to write, in order
/// * `output` - Output file path (or stdout if None)
///
/// # Returns
///
/// Returns the number of rows written, or an error if export fails.
pub fn export_csv(report: &Report, output: Option<&Path>) -> Result<usize> {
    // Use trait object to handle both File and Stdout
    let mut writer: Writer<Box<dyn Write>> = if let Some(output_path) = output {
        let file = std::fs::File::create(output_path).context(format!(
            "Failed to create output file: {}",
            output_path.display()
        ))?;
        Writer::from_writer(Box::new(file) as Box<dyn Write>)
    } else {
        Writer::from_writer(Box::new(io::stdout()) as Box<dyn Write>)
    };

    if report.is_empty() {
        // serialize() writes the header with the first row only
        writer.write_record([
            "url",
            "label",
            "status",
            "cache_status",
            "age",
            "error_detail",
            "attempts_used",
        ])?;
    }

    for outcome in report.outcomes() {
        writer
            .serialize(ReportRow::from(outcome))
            .context("Failed to write CSV row")?;
    }
    writer.flush().context("Failed to flush CSV output")?;

    Ok(report.len())
}
