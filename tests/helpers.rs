// Shared test helpers for mock CDN setup and test configuration.
//
// This module provides common utilities used across multiple test files to reduce duplication.

use cdn_cache_check::{Config, Target};
use wiremock::ResponseTemplate;

/// Config with short delays and no warming or purging, for fast tests.
#[allow(dead_code)] // Used by other test files
pub fn test_config() -> Config {
    Config {
        max_concurrent: 4,
        retry_times: 2,
        retry_delay_ms: 10,
        download_if_miss: false,
        head_wait_seconds: 0.0,
        probe_timeout_seconds: 5,
        download_timeout_seconds: 5,
        user_agent: "cdn_cache_check_test/1.0".to_string(),
        ..Config::default()
    }
}

/// Response of a cached asset: binary body with a cache-status header.
#[allow(dead_code)]
pub fn asset_response(cache_status: &str, age: &str, body: &[u8]) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("cf-cache-status", cache_status)
        .insert_header("age", age)
        .set_body_raw(body.to_vec(), "audio/mpeg")
}

/// Error page served with a 200 status, as some origins do.
#[allow(dead_code)]
pub fn html_error_response(cache_status: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("cf-cache-status", cache_status)
        .set_body_raw(
            b"<!DOCTYPE html><html><body>Not found</body></html>".to_vec(),
            "text/html; charset=utf-8",
        )
}

/// Target for `path` on the mock server.
#[allow(dead_code)]
pub fn target(server_uri: &str, path: &str, label: &str) -> Target {
    Target::new(format!("{server_uri}{path}"), label).expect("valid mock URL")
}
