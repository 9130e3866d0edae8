//! Single-page fetch with bounded retries
//!
//! Every attempt ends in one of three outcomes:
//! - the page decoded (success)
//! - a transient failure that another attempt may cure
//! - a failure no retry can cure (the request could not even be built)
//!
//! Transient failures are retried after `base_delay * (attempt + 2)`.

use super::page::Page;
use crate::error::{Error, Result};
use crate::http::{preview, PageRequest, RawResponse, Transport};
use crate::types::{Credentials, QueryWindow};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

// ============================================================================
// Sleeping
// ============================================================================

/// Pauses execution between requests
#[async_trait]
pub trait Sleeper: Send + Sync {
    /// Pause for `duration`
    async fn sleep(&self, duration: Duration);
}

/// Sleeper backed by the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
    }
}

/// Pause before retrying after the 0-based `attempt` failed
pub fn retry_delay(base_delay: Duration, attempt: u32) -> Duration {
    base_delay.saturating_mul(attempt.saturating_add(2))
}

// ============================================================================
// Attempt classification
// ============================================================================

/// Outcome of one request attempt
#[derive(Debug)]
pub enum AttemptOutcome {
    /// 2xx with a JSON body
    Success(Page),
    /// Worth another attempt
    Retryable(Error),
    /// Retrying cannot help
    Terminal(Error),
}

impl AttemptOutcome {
    /// Classify what the transport returned
    pub fn classify(result: Result<RawResponse>) -> Self {
        let response = match result {
            Ok(response) => response,
            Err(e) if e.is_retryable() => return Self::Retryable(e),
            Err(e) => return Self::Terminal(e),
        };

        if !response.is_success() {
            return Self::Retryable(Error::http_status(
                response.status,
                response.body_preview(),
            ));
        }

        match Page::parse(&response.body) {
            Ok(page) => Self::Success(page),
            Err(e) => Self::Retryable(Error::malformed(
                response.status,
                e.to_string(),
                response.body_preview(),
            )),
        }
    }
}

// ============================================================================
// Page Fetcher
// ============================================================================

/// Fetches one page of the report with bounded retries
#[derive(Clone)]
pub struct PageFetcher {
    transport: Arc<dyn Transport>,
    sleeper: Arc<dyn Sleeper>,
}

impl PageFetcher {
    /// Create a fetcher sleeping on the tokio timer
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            sleeper: Arc::new(TokioSleeper),
        }
    }

    /// Replace the sleeper
    #[must_use]
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Fetch `page` (1-based), trying at most `max_attempts` times.
    ///
    /// Pages after the first wait `base_delay` before their first request.
    /// When every attempt fails the last error is returned inside
    /// [`Error::PageExhausted`].
    pub async fn fetch(
        &self,
        credentials: &Credentials,
        window: &QueryWindow,
        page: u32,
        base_delay: Duration,
        max_attempts: u32,
    ) -> Result<Page> {
        let max_attempts = max_attempts.max(1);

        if page > 1 {
            self.sleeper.sleep(base_delay).await;
        }

        let request = PageRequest::new(credentials, window, page);
        let mut attempt = 0;

        loop {
            let result = self.transport.send(&request).await;
            let headers = result
                .as_ref()
                .map(RawResponse::headers_text)
                .unwrap_or_default();

            let error = match AttemptOutcome::classify(result) {
                AttemptOutcome::Success(page_data) => {
                    debug!("Fetched page {page} (attempt {}/{max_attempts})", attempt + 1);
                    return Ok(page_data);
                }
                AttemptOutcome::Retryable(e) => e,
                AttemptOutcome::Terminal(e) => {
                    log_failure(&request, &e, &headers, attempt, max_attempts);
                    return Err(e);
                }
            };

            log_failure(&request, &error, &headers, attempt, max_attempts);

            if attempt + 1 >= max_attempts {
                return Err(Error::PageExhausted {
                    page,
                    attempts: max_attempts,
                    source: Box::new(error),
                });
            }

            let delay = retry_delay(base_delay, attempt);
            warn!("Retrying page {page} in {:.1} seconds...", delay.as_secs_f64());
            self.sleeper.sleep(delay).await;
            attempt += 1;
        }
    }
}

impl std::fmt::Debug for PageFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageFetcher").finish_non_exhaustive()
    }
}

/// Log everything an operator needs to tell an outage from an expired session
fn log_failure(
    request: &PageRequest,
    error: &Error,
    headers: &str,
    attempt: u32,
    max_attempts: u32,
) {
    let attempt = attempt + 1;
    match error {
        Error::HttpStatus { status, body } => warn!(
            page = request.page,
            status,
            "Request failed with status code {status} (attempt {attempt}/{max_attempts})\n\
             Response headers:\n{headers}\nResponse content:\n{}",
            preview(body)
        ),
        Error::MalformedResponse {
            status,
            message,
            body_preview,
        } => warn!(
            page = request.page,
            status,
            "Failed to parse JSON response (attempt {attempt}/{max_attempts}): {message}\n\
             Response headers:\n{headers}\nResponse content:\n{body_preview}"
        ),
        other => {
            let params = request
                .form
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>()
                .join("&");
            let status = other
                .status()
                .map(|s| format!("\nResponse status code: {s}"))
                .unwrap_or_default();
            warn!(
                page = request.page,
                "Error occurred while fetching page (attempt {attempt}/{max_attempts}): \
                 {other}\nRequest parameters: {params}{status}"
            );
        }
    }
}
