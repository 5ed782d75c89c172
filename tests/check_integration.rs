//! Integration tests for run_check
//!
//! These tests run the whole check against a mock CDN edge:
//! - Classification of hits, misses and error pages
//! - Retry accounting
//! - Warming and re-probing of misses
//! - Purging of failing URLs

mod helpers;

use cdn_cache_check::{run_check, Config, ProbeStatus};
use helpers::{asset_response, html_error_response, target, test_config};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn purge_config(server_uri: &str) -> Config {
    Config {
        auto_purge: true,
        purge_endpoint: Some(format!("{server_uri}/client/v4")),
        purge_token: Some("secret-token".to_string()),
        purge_zone_id: Some("zone123".to_string()),
        ..test_config()
    }
}

#[tokio::test]
async fn test_hit_is_success_on_first_attempt() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/song.mp3"))
        .respond_with(asset_response("HIT", "120", b"ID3\x04\x00binary audio"))
        .expect(1)
        .mount(&server)
        .await;

    let check = run_check(test_config(), vec![target(&server.uri(), "/song.mp3", "url")])
        .await
        .expect("run_check should succeed");

    assert_eq!(check.report.len(), 1);
    let outcome = &check.report.outcomes()[0];
    assert_eq!(outcome.status(), ProbeStatus::Success);
    assert_eq!(outcome.cache_status(), "HIT");
    assert_eq!(outcome.age(), "120");
    assert_eq!(outcome.attempts_used(), 1);
    assert!(outcome.error_detail().is_none());
    assert_eq!(check.purged, None);
}

#[tokio::test]
async fn test_html_on_every_attempt_is_error_after_all_retries() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cover.jpg"))
        .respond_with(html_error_response("HIT"))
        .expect(3)
        .mount(&server)
        .await;

    let check = run_check(test_config(), vec![target(&server.uri(), "/cover.jpg", "cover")])
        .await
        .unwrap();

    let outcome = &check.report.outcomes()[0];
    assert_eq!(outcome.status(), ProbeStatus::Error);
    assert_eq!(outcome.attempts_used(), 3);
    assert!(
        outcome.error_detail().unwrap().contains("HTML"),
        "detail should mention HTML, got {:?}",
        outcome.error_detail()
    );
}

#[tokio::test]
async fn test_error_page_body_is_caught_without_content_type() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/lyrics.lrc"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            br#"{"code": 404, "msg": "file not found"}"#.to_vec(),
            "application/octet-stream",
        ))
        .expect(2)
        .mount(&server)
        .await;

    let config = Config {
        retry_times: 1,
        ..test_config()
    };
    let check = run_check(config, vec![target(&server.uri(), "/lyrics.lrc", "lrc")])
        .await
        .unwrap();

    let outcome = &check.report.outcomes()[0];
    assert_eq!(outcome.status(), ProbeStatus::Error);
    assert_eq!(outcome.attempts_used(), 2);
    // No cache-status header and no age header
    assert_eq!(outcome.cache_status(), "");
    assert_eq!(outcome.age(), "0");
}

#[tokio::test]
async fn test_transient_failure_recovers_on_retry() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/song.mp3"))
        .respond_with(ResponseTemplate::new(502))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/song.mp3"))
        .respond_with(asset_response("HIT", "5", b"ID3 audio"))
        .mount(&server)
        .await;

    let check = run_check(test_config(), vec![target(&server.uri(), "/song.mp3", "url")])
        .await
        .unwrap();

    let outcome = &check.report.outcomes()[0];
    assert_eq!(outcome.status(), ProbeStatus::Success);
    assert_eq!(outcome.attempts_used(), 2);
}

#[tokio::test]
async fn test_miss_without_warming_stays_miss() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/song.mp3"))
        .respond_with(asset_response("MISS", "0", b"ID3 audio"))
        .expect(1)
        .mount(&server)
        .await;

    let check = run_check(test_config(), vec![target(&server.uri(), "/song.mp3", "url")])
        .await
        .unwrap();

    let outcome = &check.report.outcomes()[0];
    assert_eq!(outcome.status(), ProbeStatus::Miss);
    assert_eq!(outcome.attempts_used(), 1);
}

#[tokio::test]
async fn test_miss_is_warmed_and_upgraded() {
    let server = MockServer::start().await;
    // Probe sees MISS, the warm download and the re-probe see HIT
    Mock::given(method("GET"))
        .and(path("/song.mp3"))
        .respond_with(asset_response("MISS", "0", b"ID3 audio"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/song.mp3"))
        .respond_with(asset_response("HIT", "1", b"ID3 audio"))
        .expect(2)
        .mount(&server)
        .await;

    let config = Config {
        download_if_miss: true,
        ..test_config()
    };
    let check = run_check(config, vec![target(&server.uri(), "/song.mp3", "url")])
        .await
        .unwrap();

    let outcome = &check.report.outcomes()[0];
    assert_eq!(outcome.status(), ProbeStatus::Success);
    assert_eq!(outcome.cache_status(), "HIT");
    assert_eq!(outcome.age(), "1");
    assert_eq!(outcome.attempts_used(), 1);
}

#[tokio::test]
async fn test_warmed_file_is_kept_when_configured() {
    let server = MockServer::start().await;
    let body = vec![0x42u8; 4096];
    Mock::given(method("GET"))
        .and(path("/img/cover.jpg"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("cf-cache-status", "MISS")
                .set_body_raw(body.clone(), "image/jpeg"),
        )
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        download_if_miss: true,
        keep_downloaded_file: true,
        download_dir: dir.path().join("downloads"),
        ..test_config()
    };
    let check = run_check(config, vec![target(&server.uri(), "/img/cover.jpg", "cover")])
        .await
        .unwrap();

    // Still a miss: the re-probe only refreshes the cache fields
    assert_eq!(check.report.outcomes()[0].status(), ProbeStatus::Miss);

    let files: Vec<_> = std::fs::read_dir(dir.path().join("downloads"))
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect();
    assert_eq!(files.len(), 1);
    let name = files[0].file_name().unwrap().to_str().unwrap().to_string();
    assert!(name.starts_with("cover_"), "unexpected file name {name}");
    assert!(name.ends_with("_cover.jpg"), "unexpected file name {name}");
    assert_eq!(std::fs::read(&files[0]).unwrap(), body);
}

#[tokio::test]
async fn test_failed_warm_download_keeps_miss() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/song.mp3"))
        .respond_with(asset_response("MISS", "0", b"ID3 audio"))
        .mount(&server)
        .await;

    // A regular file where the download directory should be created
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, b"not a directory").unwrap();

    let config = Config {
        download_if_miss: true,
        keep_downloaded_file: true,
        reprobe_after_warm: false,
        download_dir: blocker.join("downloads"),
        ..test_config()
    };
    let check = run_check(config, vec![target(&server.uri(), "/song.mp3", "url")])
        .await
        .unwrap();

    let outcome = &check.report.outcomes()[0];
    assert_eq!(outcome.status(), ProbeStatus::Miss);
    assert_eq!(outcome.error_detail(), None);
    assert_eq!(outcome.attempts_used(), 1);
    assert!(check.report.purge_batch().is_empty());
}

#[tokio::test]
async fn test_one_outcome_per_target_in_input_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(asset_response("HIT", "0", b"ID3 audio"))
        .mount(&server)
        .await;

    let targets: Vec<_> = (0..25)
        .map(|i| target(&server.uri(), &format!("/{i}.mp3"), "url"))
        .collect();
    let expected: Vec<String> = targets.iter().map(|t| t.url().to_string()).collect();

    let check = run_check(test_config(), targets).await.unwrap();

    let urls: Vec<String> = check
        .report
        .outcomes()
        .iter()
        .map(|o| o.target().url().to_string())
        .collect();
    assert_eq!(urls, expected);
    assert_eq!(check.report.count(ProbeStatus::Success), 25);
}

#[tokio::test]
async fn test_failing_url_is_purged_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/lyrics.lrc"))
        .respond_with(html_error_response("HIT"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/song.mp3"))
        .respond_with(asset_response("HIT", "3", b"ID3 audio"))
        .mount(&server)
        .await;

    let failing_url = format!("{}/lyrics.lrc", server.uri());
    Mock::given(method("POST"))
        .and(path("/client/v4/zones/zone123/purge_cache"))
        .and(header("authorization", "Bearer secret-token"))
        .and(body_json(json!({ "files": [failing_url] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    let check = run_check(
        purge_config(&server.uri()),
        vec![
            target(&server.uri(), "/song.mp3", "url"),
            target(&server.uri(), "/lyrics.lrc", "lrc"),
        ],
    )
    .await
    .unwrap();

    assert_eq!(check.report.count(ProbeStatus::Error), 1);
    assert_eq!(check.purged, Some(true));
}

#[tokio::test]
async fn test_no_purge_without_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(asset_response("HIT", "3", b"ID3 audio"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let check = run_check(
        purge_config(&server.uri()),
        vec![target(&server.uri(), "/song.mp3", "url")],
    )
    .await
    .unwrap();

    assert_eq!(check.purged, None);
}

#[tokio::test]
async fn test_rejected_purge_is_reported_not_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(403).set_body_string("invalid token"))
        .expect(1)
        .mount(&server)
        .await;

    let check = run_check(
        Config {
            retry_times: 0,
            ..purge_config(&server.uri())
        },
        vec![target(&server.uri(), "/gone.mp3", "url")],
    )
    .await
    .unwrap();

    let outcome = &check.report.outcomes()[0];
    assert_eq!(outcome.status(), ProbeStatus::Error);
    assert_eq!(outcome.error_detail(), Some("HTTP status 404"));
    assert_eq!(check.purged, Some(false));
}

#[tokio::test]
async fn test_purge_skipped_without_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(html_error_response("MISS"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let config = Config {
        purge_token: None,
        retry_times: 0,
        ..purge_config(&server.uri())
    };
    let check = run_check(config, vec![target(&server.uri(), "/a.mp3", "url")])
        .await
        .unwrap();

    assert_eq!(check.purged, Some(false));
}

#[tokio::test]
async fn test_invalid_config_is_rejected() {
    let config = Config {
        max_concurrent: 0,
        ..test_config()
    };
    assert!(run_check(config, Vec::new()).await.is_err());
}

#[tokio::test]
async fn test_out_of_range_config_is_rejected_without_panicking() {
    let config = Config {
        max_concurrent: i64::MAX as usize,
        ..test_config()
    };
    assert!(run_check(config, Vec::new()).await.is_err());

    let config = Config {
        download_if_miss: true,
        head_wait_seconds: 1e20,
        ..test_config()
    };
    assert!(run_check(config, Vec::new()).await.is_err());
}
