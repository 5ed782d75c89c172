//! JSON export functionality.

use anyhow::{Context, Result};
use std::io::{self, Write};
use std::path::Path;

use crate::models::Report;

use super::ReportRow;

/// Exports the report as a pretty-printed JSON array of rows.
///
/// # Arguments
///
/// * `report` - Outcomes to write, in order
/// * `output` - Output file path (or stdout if None)
///
/// # Returns
///
/// Returns the number of rows written, or an error if export fails.
pub fn export_json(report: &Report, output: Option<&Path>) -> Result<usize> {
    let mut writer: Box<dyn Write> = if let Some(output_path) = output {
        let file = std::fs::File::create(output_path).context(format!(
            "Failed to create output file: {}",
            output_path.display()
        ))?;
        Box::new(io::BufWriter::new(file))
    } else {
        Box::new(io::stdout())
    };

    let rows: Vec<ReportRow<'_>> = report.outcomes().iter().map(ReportRow::from).collect();
    serde_json::to_writer_pretty(&mut writer, &rows).context("Failed to write JSON report")?;
    writeln!(writer).context("Failed to write JSON report")?;
    writer.flush().context("Failed to flush JSON output")?;

    Ok(rows.len())
}
