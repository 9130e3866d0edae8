//! Error types for card-transactions
//!
//! This module defines the error hierarchy for the whole crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.
//!
//! Errors fall into four groups that drive the retry decisions of the
//! page fetcher:
//!
//! - transport failures (connection, timeout, non-2xx status): retryable
//! - malformed responses (2xx with a body that is not JSON): retryable
//! - schema mismatches (JSON without `total` / `rows`): never retried
//! - configuration and local I/O problems: never retried

use thiserror::Error;

/// The main error type for card-transactions
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Transport Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    // ============================================================================
    // Response Errors
    // ============================================================================
    #[error("Malformed response (HTTP {status}): {message}")]
    MalformedResponse {
        status: u16,
        message: String,
        body_preview: String,
    },

    #[error("Page {page} is missing the '{field}' field")]
    Schema { page: u32, field: String },

    #[error("Page {page} failed after {attempts} attempts: {source}")]
    PageExhausted {
        page: u32,
        attempts: u32,
        #[source]
        source: Box<Error>,
    },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Output error: {message}")]
    Output { message: String },

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid config value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create a malformed response error
    pub fn malformed(
        status: u16,
        message: impl Into<String>,
        body_preview: impl Into<String>,
    ) -> Self {
        Self::MalformedResponse {
            status,
            message: message.into(),
            body_preview: body_preview.into(),
        }
    }

    /// Create a schema error for a missing field
    pub fn schema(page: u32, field: impl Into<String>) -> Self {
        Self::Schema {
            page,
            field: field.into(),
        }
    }

    /// Create an output error
    pub fn output(message: impl Into<String>) -> Self {
        Self::Output {
            message: message.into(),
        }
    }

    /// Check if this error is retryable
    ///
    /// Any non-2xx status counts: the report endpoint answers expired
    /// sessions and outages with the same generic failures.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Http(e) => !e.is_builder(),
            Error::HttpStatus { .. } | Error::Timeout { .. } | Error::MalformedResponse { .. } => {
                true
            }
            _ => false,
        }
    }

    /// HTTP status attached to this error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::HttpStatus { status, .. } | Error::MalformedResponse { status, .. } => {
                Some(*status)
            }
            Error::Http(e) => e.status().map(|s| s.as_u16()),
            Error::PageExhausted { source, .. } => source.status(),
            _ => None,
        }
    }
}

/// Result type alias for card-transactions
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }
}
