//! Tests for writing reports in the format chosen by the output path.

use cdn_cache_check::export::write_report;
use cdn_cache_check::{ProbeOutcome, Report, Target};

fn sample_report() -> Report {
    Report::new(vec![
        ProbeOutcome::success(
            Target::new("https://cdn.example.com/1.mp3", "url").unwrap(),
            "HIT".into(),
            "30".into(),
            1,
        ),
        ProbeOutcome::miss(
            Target::new("https://cdn.example.com/1.jpg", "cover").unwrap(),
            "MISS".into(),
            "0".into(),
            1,
        ),
        ProbeOutcome::error(
            Target::new("https://cdn.example.com/1.lrc", "lrc").unwrap(),
            String::new(),
            "0".into(),
            "URL returned HTML (content-type: text/html), probably an error page",
            3,
        ),
    ])
}

#[test]
fn test_csv_report_by_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.csv");
    assert_eq!(write_report(&sample_report(), Some(&path)).unwrap(), 3);

    let mut reader = csv::Reader::from_path(&path).unwrap();
    let headers = reader.headers().unwrap().clone();
    assert_eq!(
        headers.iter().collect::<Vec<_>>(),
        vec![
            "url",
            "label",
            "status",
            "cache_status",
            "age",
            "error_detail",
            "attempts_used"
        ]
    );
    let rows: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
    assert_eq!(rows.len(), 3);
    assert_eq!(&rows[1][2], "MISS");
    // Commas in the detail are quoted, not split
    assert_eq!(
        &rows[2][5],
        "URL returned HTML (content-type: text/html), probably an error page"
    );
    assert_eq!(&rows[2][6], "3");
}

#[test]
fn test_json_report_by_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.json");
    assert_eq!(write_report(&sample_report(), Some(&path)).unwrap(), 3);

    let rows: Vec<serde_json::Value> =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["status"], "SUCCESS");
    assert_eq!(rows[0]["error_detail"], serde_json::Value::Null);
    assert_eq!(rows[2]["label"], "lrc");
    assert_eq!(rows[2]["attempts_used"], 3);
}

#[test]
fn test_unwritable_output_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("no_such_dir").join("report.json");
    assert!(write_report(&sample_report(), Some(&path)).is_err());
}
