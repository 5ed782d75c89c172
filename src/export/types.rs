//! Export format selection.

use std::path::Path;

/// Report output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// CSV with a header row
    #[default]
    Csv,
    /// Pretty-printed JSON array of rows
    Json,
}

impl ExportFormat {
    /// JSON for a `.json` output path, CSV otherwise (including stdout).
    pub fn for_output(output: Option<&Path>) -> Self {
        match output
            .and_then(Path::extension)
            .and_then(|ext| ext.to_str())
        {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ExportFormat::Json,
            _ => ExportFormat::Csv,
        }
    }
}
