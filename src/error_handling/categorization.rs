//! Error categorization and retry strategy.

use std::time::Duration;
use tokio_retry::strategy::FixedInterval;

use super::types::{ErrorType, ProbeError};
use crate::config::Config;

/// Creates the delay schedule between probe attempts.
///
/// Yields `retry_times` delays of `retry_delay_ms` each, so a target gets at
/// most `retry_times + 1` attempts when used with `tokio_retry::Retry`.
pub fn get_retry_strategy(config: &Config) -> impl Iterator<Item = Duration> {
    FixedInterval::new(config.retry_delay()).take(config.retry_times as usize)
}

/// Categorizes a `reqwest::Error` into an `ErrorType`.
///
/// Status codes are checked first, then the kind of client error.
pub fn categorize_reqwest_error(error: &reqwest::Error) -> ErrorType {
    if let Some(status) = error.status() {
        return ErrorType::from_status(status.as_u16());
    }

    if error.is_builder() {
        ErrorType::HttpRequestBuilderError
    } else if error.is_redirect() {
        ErrorType::HttpRequestRedirectError
    } else if error.is_timeout() {
        ErrorType::HttpRequestTimeoutError
    } else if error.is_connect() {
        ErrorType::HttpRequestConnectError
    } else if error.is_body() || error.is_decode() {
        ErrorType::HttpRequestBodyError
    } else if error.is_request() {
        ErrorType::HttpRequestRequestError
    } else {
        ErrorType::HttpRequestOtherError
    }
}

/// Wraps a `reqwest::Error` as a transport `ProbeError`.
pub fn probe_error_from_reqwest(error: &reqwest::Error) -> ProbeError {
    if let Some(status) = error.status() {
        return ProbeError::HttpStatus(status.as_u16());
    }
    ProbeError::Transport {
        kind: categorize_reqwest_error(error),
        message: error.to_string(),
    }
}
