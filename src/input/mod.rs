//! Target loading.
//!
//! Targets come from a CSV or JSON table, read from a local file or fetched
//! over http(s). Each configured column holds URLs; every cell becomes one
//! target labelled with its column. Targets are produced column by column,
//! row by row. Empty cells are skipped and cells that are not http(s) URLs
//! are skipped with a warning. A configured column missing from the input is
//! an error.

mod csv;
mod json;

use std::path::Path;

use crate::error_handling::InputError;
use crate::models::Target;

/// Cells of the configured columns, column-major.
type Columns = Vec<Vec<Option<String>>>;

/// Input table format, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// Comma-separated values with a header row (default)
    Csv,
    /// JSON array of objects
    Json,
}

impl InputFormat {
    /// `.json` (any case) is JSON; anything else is CSV.
    pub fn detect(source: &str) -> Self {
        let path = match url::Url::parse(source) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => url.path().to_string(),
            _ => source.to_string(),
        };
        if path.to_ascii_lowercase().ends_with(".json") {
            InputFormat::Json
        } else {
            InputFormat::Csv
        }
    }
}

fn is_remote(source: &str) -> bool {
    let lowered = source.to_ascii_lowercase();
    lowered.starts_with("http://") || lowered.starts_with("https://")
}

/// Reads the raw input text from a local path or an http(s) URL.
///
/// # Errors
///
/// `InputError::Fetch` when a remote input cannot be fetched or answers
/// non-2xx, `InputError::NotFound` when a local path does not exist and
/// `InputError::Read` when it cannot be read.
pub async fn read_source(source: &str, client: &reqwest::Client) -> Result<String, InputError> {
    if is_remote(source) {
        log::info!("Fetching input from {source}");
        let fetch_error = |e| InputError::Fetch {
            url: source.to_string(),
            source: e,
        };
        let response = client
            .get(source)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(fetch_error)?;
        return response.text().await.map_err(fetch_error);
    }

    let path = Path::new(source);
    if !path.exists() {
        return Err(InputError::NotFound(source.to_string()));
    }
    log::info!("Reading input from {}", path.display());
    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| InputError::Read {
            path: path.to_path_buf(),
            source: e,
        })
}

/// Parses input text into targets.
///
/// # Errors
///
/// Malformed CSV/JSON, a JSON document that is not an array of objects, or a
/// configured column that does not exist.
pub fn parse_targets(
    text: &str,
    format: InputFormat,
    columns: &[String],
) -> Result<Vec<Target>, InputError> {
    let cells = match format {
        InputFormat::Csv => csv::read_columns(text, columns)?,
        InputFormat::Json => json::read_columns(text, columns)?,
    };
    Ok(targets_from_columns(columns, cells))
}

/// Loads targets from `source` (local path or http(s) URL).
///
/// # Errors
///
/// See [`read_source`] and [`parse_targets`].
pub async fn load_targets(
    source: &str,
    columns: &[String],
    client: &reqwest::Client,
) -> Result<Vec<Target>, InputError> {
    let text = read_source(source, client).await?;
    let targets = parse_targets(&text, InputFormat::detect(source), columns)?;
    log::info!(
        "Loaded {} target{} from {} column{}",
        targets.len(),
        if targets.len() == 1 { "" } else { "s" },
        columns.len(),
        if columns.len() == 1 { "" } else { "s" }
    );
    Ok(targets)
}

fn targets_from_columns(columns: &[String], cells: Columns) -> Vec<Target> {
    let mut targets = Vec::new();
    for (column, values) in columns.iter().zip(cells) {
        for value in values.into_iter().flatten() {
            if value.trim().is_empty() {
                continue;
            }
            match Target::new(value, column.as_str()) {
                Ok(target) => targets.push(target),
                Err(e) => log::warn!("Skipping cell in column '{column}': {e}"),
            }
        }
    }
    targets
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_detect_format() {
        assert_eq!(InputFormat::detect("songs.json"), InputFormat::Json);
        assert_eq!(InputFormat::detect("songs.JSON"), InputFormat::Json);
        assert_eq!(InputFormat::detect("songs.csv"), InputFormat::Csv);
        assert_eq!(InputFormat::detect("songs"), InputFormat::Csv);
        assert_eq!(
            InputFormat::detect("https://example.com/list.json?token=1"),
            InputFormat::Json
        );
        assert_eq!(
            InputFormat::detect("https://example.com/export?fmt=.json"),
            InputFormat::Csv
        );
    }

    #[test]
    fn test_targets_are_column_major() {
        let text = "url,cover\nhttps://e.com/1.mp3,https://e.com/1.jpg\nhttps://e.com/2.mp3,https://e.com/2.jpg\n";
        let targets = parse_targets(text, InputFormat::Csv, &columns(&["url", "cover"])).unwrap();
        let got: Vec<_> = targets.iter().map(|t| (t.label(), t.url())).collect();
        assert_eq!(
            got,
            vec![
                ("url", "https://e.com/1.mp3"),
                ("url", "https://e.com/2.mp3"),
                ("cover", "https://e.com/1.jpg"),
                ("cover", "https://e.com/2.jpg"),
            ]
        );
    }

    #[test]
    fn test_empty_and_invalid_cells_are_skipped() {
        let text = "url\nhttps://e.com/a\n\"\"\nnot a url\nftp://e.com/b\n  https://e.com/c  \n";
        let targets = parse_targets(text, InputFormat::Csv, &columns(&["url"])).unwrap();
        let urls: Vec<_> = targets.iter().map(Target::url).collect();
        assert_eq!(urls, vec!["https://e.com/a", "https://e.com/c"]);
    }

    #[test]
    fn test_missing_column_is_error() {
        let err = parse_targets("url\nhttps://e.com/a\n", InputFormat::Csv, &columns(&["url", "lrc"]))
            .unwrap_err();
        assert!(matches!(err, InputError::MissingColumn(ref c) if c == "lrc"));
    }

    #[tokio::test]
    async fn test_read_source_missing_file() {
        let client = reqwest::Client::new();
        let err = read_source("/definitely/not/here.csv", &client)
            .await
            .unwrap_err();
        assert!(matches!(err, InputError::NotFound(_)));
    }
}
