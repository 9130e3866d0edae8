//! Transport types and trait
//!
//! Defines the request/response values exchanged with the report endpoint
//! and the capability every transport implements.

use crate::error::Result;
use crate::types::{Credentials, QueryWindow, DATE_FORMAT};
use async_trait::async_trait;

/// Number of body characters kept for diagnostics
pub const BODY_PREVIEW_CHARS: usize = 500;

/// A single page request: the form fields plus the session credentials
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page number
    pub page: u32,
    /// Form-encoded body fields, in wire order
    pub form: Vec<(&'static str, String)>,
    /// Credentials sent as cookies
    pub credentials: Credentials,
}

impl PageRequest {
    /// Build the request for `page` of `window`
    ///
    /// `edate` is resolved here, so an unpinned window always asks up to
    /// the day the request is sent.
    pub fn new(credentials: &Credentials, window: &QueryWindow, page: u32) -> Self {
        let form = vec![
            ("sdate", window.start_date().format(DATE_FORMAT).to_string()),
            ("edate", window.end_date().format(DATE_FORMAT).to_string()),
            ("account", window.account().to_string()),
            ("page", page.to_string()),
            ("rows", window.page_size().to_string()),
        ];

        Self {
            page,
            form,
            credentials: credentials.clone(),
        }
    }

    /// Look up a form field
    pub fn param(&self, key: &str) -> Option<&str> {
        self.form
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// A response as received, before any classification
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawResponse {
    /// HTTP status code
    pub status: u16,
    /// Response headers in arrival order
    pub headers: Vec<(String, String)>,
    /// Response body as text
    pub body: String,
}

impl RawResponse {
    /// Create a response with a status and body and no headers
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    /// Add a header
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// 2xx status
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Case-insensitive header lookup
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// First [`BODY_PREVIEW_CHARS`] characters of the body
    pub fn body_preview(&self) -> String {
        preview(&self.body)
    }

    /// Headers rendered one per line, for logs
    pub fn headers_text(&self) -> String {
        self.headers
            .iter()
            .map(|(k, v)| format!("{k}: {v}"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Truncate text to [`BODY_PREVIEW_CHARS`] characters on a char boundary
pub fn preview(text: &str) -> String {
    text.chars().take(BODY_PREVIEW_CHARS).collect()
}

/// Sends one request and returns whatever came back.
///
/// Implementations report connection-level problems (refused, DNS,
/// timeout) as errors and every received response, whatever its status,
/// as `Ok`. Classification is left to the caller.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a single page request
    async fn send(&self, request: &PageRequest) -> Result<RawResponse>;
}
