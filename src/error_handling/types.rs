//! Error type definitions.
//!
//! This module defines the error enums of each concern and the `ErrorType`
//! categories counted by `ProcessingStats`.

use std::path::PathBuf;

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),
}

/// Errors raised while loading or validating configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("Failed to read config file {}: {source}", path.display())]
    Read {
        /// File that was being read
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for this crate.
    #[error("Failed to parse config file {}: {source}", path.display())]
    Parse {
        /// File that was being parsed
        path: PathBuf,
        /// Underlying TOML error
        source: toml::de::Error,
    },

    /// A value is out of range.
    #[error("Invalid configuration value for {field}: {reason}")]
    Invalid {
        /// Offending key
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// A string that cannot become a `Target`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TargetError {
    /// The URL does not parse.
    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl {
        /// Input string
        url: String,
        /// Parser message
        reason: String,
    },

    /// The URL parses but is not http(s).
    #[error("unsupported scheme '{scheme}' in '{url}' (only http and https are checked)")]
    UnsupportedScheme {
        /// Input string
        url: String,
        /// Scheme found
        scheme: String,
    },
}

/// Why a single probe attempt did not pass.
///
/// `Transport` and `HttpStatus` are transport failures; the remaining
/// variants are content classification failures (a 2xx response that looks
/// like an error page). Both classes are retried the same way.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProbeError {
    /// Connection, timeout or body read failure.
    #[error("{kind}: {message}")]
    Transport {
        /// Category of the failure
        kind: ErrorType,
        /// Message of the underlying client error
        message: String,
    },

    /// Non-2xx response.
    #[error("HTTP status {0}")]
    HttpStatus(u16),

    /// `content-type` says HTML.
    #[error("URL returned HTML (content-type: {0}), probably an error page")]
    HtmlContent(String),

    /// `content-type` says JSON.
    #[error("URL returned JSON (content-type: {0}), probably an error envelope")]
    JsonContent(String),

    /// The body prefix matched the error-page heuristic.
    #[error("response body looks like an error page")]
    ErrorPageBody,
}

impl ProbeError {
    /// True for connection/timeout/status failures, false for content
    /// classification failures.
    pub fn is_transport(&self) -> bool {
        matches!(self, ProbeError::Transport { .. } | ProbeError::HttpStatus(_))
    }

    /// Statistics category of this failure.
    pub fn error_type(&self) -> ErrorType {
        match self {
            ProbeError::Transport { kind, .. } => *kind,
            ProbeError::HttpStatus(code) => ErrorType::from_status(*code),
            ProbeError::HtmlContent(_) => ErrorType::HtmlContentType,
            ProbeError::JsonContent(_) => ErrorType::JsonContentType,
            ProbeError::ErrorPageBody => ErrorType::ErrorPageBody,
        }
    }
}

/// Failure of a warm download. Never changes a target's status.
#[derive(Error, Debug)]
pub enum WarmError {
    /// The download request or body stream failed.
    #[error("download failed: {0}")]
    Transport(#[from] ReqwestError),

    /// Writing or deleting the downloaded file failed.
    #[error("failed to {action} {}: {source}", path.display())]
    Persistence {
        /// What was being done (`create`, `write`, `delete`)
        action: &'static str,
        /// File involved
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

impl WarmError {
    pub(crate) fn persistence(
        action: &'static str,
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        WarmError::Persistence {
            action,
            path: path.into(),
            source,
        }
    }

    /// Statistics category of this failure.
    pub fn error_type(&self) -> ErrorType {
        match self {
            WarmError::Transport(_) => ErrorType::WarmDownloadError,
            WarmError::Persistence { .. } => ErrorType::WarmPersistenceError,
        }
    }
}

/// Failure of the batch purge. Always non-fatal.
#[derive(Error, Debug)]
pub enum PurgeError {
    /// Endpoint, token or zone id is not configured.
    #[error("purge credentials incomplete, missing: {}", .0.join(", "))]
    MissingCredentials(Vec<&'static str>),

    /// The request could not be sent or timed out.
    #[error("purge request failed: {0}")]
    Request(#[from] ReqwestError),

    /// The API answered with something other than 200.
    #[error("purge rejected with HTTP {status}: {body}")]
    Rejected {
        /// Response status
        status: u16,
        /// Response body, for diagnosis
        body: String,
    },
}

/// Errors raised while loading targets from the input source.
#[derive(Error, Debug)]
pub enum InputError {
    /// Local file could not be read.
    #[error("Failed to read input {}: {source}", path.display())]
    Read {
        /// Input file
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Remote input could not be fetched.
    #[error("Failed to fetch input {url}: {source}")]
    Fetch {
        /// Input URL
        url: String,
        /// Underlying client error
        source: ReqwestError,
    },

    /// The input path does not exist and is not a URL.
    #[error("Input '{0}' is neither an http(s) URL nor an existing file")]
    NotFound(String),

    /// Malformed CSV.
    #[error("Invalid CSV input: {0}")]
    Csv(#[from] csv::Error),

    /// Malformed JSON.
    #[error("Invalid JSON input: {0}")]
    Json(#[from] serde_json::Error),

    /// JSON input is not an array of objects.
    #[error("JSON input must be an array of objects")]
    NotAnArray,

    /// A configured column is absent from the input.
    #[error("Column '{0}' does not exist in the input")]
    MissingColumn(String),
}

/// Categories of failures counted during a run.
///
/// Every failed probe attempt, warm download and purge problem is counted
/// under one of these and printed at the end of the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ErrorType {
    // HTTP/Network errors
    HttpRequestBuilderError,
    HttpRequestRedirectError,
    HttpRequestTimeoutError,
    HttpRequestConnectError,
    HttpRequestRequestError,
    HttpRequestBodyError,
    HttpRequestOtherError,
    // Status codes
    HttpRequestBotDetectionError, // 403 Forbidden
    HttpRequestNotFound,          // 404 Not Found
    HttpRequestTooManyRequests,   // 429 Too Many Requests
    HttpRequestServerError,       // 5xx
    HttpRequestOtherStatus,
    // Content classification
    HtmlContentType,
    JsonContentType,
    ErrorPageBody,
    // Warm downloads
    WarmDownloadError,
    WarmPersistenceError,
    // Purge
    PurgeSkipped,
    PurgeRequestError,
    PurgeRejected,
    // Scheduling
    TaskPanicked,
}

impl std::fmt::Display for ErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ErrorType {
    /// Human-readable description.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::HttpRequestBuilderError => "HTTP request builder error",
            ErrorType::HttpRequestRedirectError => "HTTP request redirect error",
            ErrorType::HttpRequestTimeoutError => "HTTP request timeout error",
            ErrorType::HttpRequestConnectError => "HTTP request connect error",
            ErrorType::HttpRequestRequestError => "HTTP request error",
            ErrorType::HttpRequestBodyError => "HTTP request body error",
            ErrorType::HttpRequestOtherError => "HTTP request other error",
            ErrorType::HttpRequestBotDetectionError => "Bot detection (403 Forbidden)",
            ErrorType::HttpRequestNotFound => "Not Found (404)",
            ErrorType::HttpRequestTooManyRequests => "Too many requests (429)",
            ErrorType::HttpRequestServerError => "Server error (5xx)",
            ErrorType::HttpRequestOtherStatus => "Other non-2xx status",
            ErrorType::HtmlContentType => "HTML content-type",
            ErrorType::JsonContentType => "JSON content-type",
            ErrorType::ErrorPageBody => "Error page body",
            ErrorType::WarmDownloadError => "Warm download error",
            ErrorType::WarmPersistenceError => "Warm file persistence error",
            ErrorType::PurgeSkipped => "Purge skipped (incomplete credentials)",
            ErrorType::PurgeRequestError => "Purge request error",
            ErrorType::PurgeRejected => "Purge rejected",
            ErrorType::TaskPanicked => "Task panicked",
        }
    }

    /// Category of a non-2xx status code.
    pub fn from_status(code: u16) -> Self {
        match code {
            403 => ErrorType::HttpRequestBotDetectionError,
            404 => ErrorType::HttpRequestNotFound,
            429 => ErrorType::HttpRequestTooManyRequests,
            500..=599 => ErrorType::HttpRequestServerError,
            _ => ErrorType::HttpRequestOtherStatus,
        }
    }
}
