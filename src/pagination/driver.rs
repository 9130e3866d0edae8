//! Pagination driver
//!
//! Fetches page 1, derives the page count from its `total` and walks the
//! remaining pages in ascending order.

use super::types::{FetchResult, FetchStatus};
use crate::config::FetchConfig;
use crate::error::{Error, Result};
use crate::fetch::PageFetcher;
use crate::http::HttpClient;
use crate::types::{Credentials, QueryWindow};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

/// Drives a [`PageFetcher`] across every page of the report
#[derive(Debug, Clone)]
pub struct PaginationDriver {
    fetcher: PageFetcher,
    max_attempts: u32,
}

impl PaginationDriver {
    /// Attempts per page unless configured otherwise
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

    /// Create a driver around a fetcher
    pub fn new(fetcher: PageFetcher) -> Self {
        Self {
            fetcher,
            max_attempts: Self::DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Create a driver talking HTTP as described by `config`
    pub fn from_config(config: &FetchConfig) -> Result<Self> {
        let client = HttpClient::with_config(config.http_client_config())?;
        Ok(Self::new(PageFetcher::new(Arc::new(client))).with_max_attempts(config.max_attempts))
    }

    /// Set the attempt budget of every page
    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Fetch every page of `window`.
    ///
    /// Never fails outright: a failure on page 1 yields an empty result,
    /// a failure later yields the pages gathered so far. `total` from page
    /// 1 is trusted for the whole run.
    pub async fn fetch_all(
        &self,
        credentials: &Credentials,
        window: &QueryWindow,
        base_delay: Duration,
    ) -> FetchResult {
        let first = match self
            .fetcher
            .fetch(credentials, window, 1, base_delay, self.max_attempts)
            .await
        {
            Ok(page) => page,
            Err(e) => {
                error!("Failed to fetch initial data: {e}");
                return FetchResult::aborted(FetchStatus::InitialFetchFailed(e));
            }
        };

        let Some(total) = first.total() else {
            let preview = first.preview();
            error!("Unexpected response format:\n{preview}");
            return FetchResult::aborted(FetchStatus::UnexpectedFormat { preview });
        };

        let total_pages = window.total_pages(total);
        info!(
            "Found {total} transactions across {total_pages} pages ({} items per page)",
            window.page_size()
        );

        let mut result = FetchResult {
            records: first.into_rows().unwrap_or_default(),
            total: Some(total),
            total_pages,
            pages_fetched: 1,
            status: FetchStatus::Complete,
        };

        let last_page = u32::try_from(total_pages).unwrap_or(u32::MAX);
        for page in 2..=last_page {
            info!(
                "Fetching page {page}/{total_pages}... (waiting {:.1}s)",
                base_delay.as_secs_f64()
            );

            let data = match self
                .fetcher
                .fetch(credentials, window, page, base_delay, self.max_attempts)
                .await
            {
                Ok(data) => data,
                Err(reason) => {
                    let status = reason
                        .status()
                        .map(|s| format!(" (last status {s})"))
                        .unwrap_or_default();
                    error!("Failed to fetch page {page} after all retries{status}: {reason}");
                    result.status = FetchStatus::Partial {
                        failed_page: page,
                        reason,
                    };
                    break;
                }
            };

            if data.rows().is_none() {
                error!("Page {page} has no 'rows' field:\n{}", data.preview());
                result.status = FetchStatus::Partial {
                    failed_page: page,
                    reason: Error::schema(page, "rows"),
                };
                break;
            }
            result.records.extend(data.into_rows().unwrap_or_default());
            result.pages_fetched += 1;
        }

        info!(
            "Fetched {} of {total} transactions from {} pages",
            result.records.len(),
            result.pages_fetched
        );
        result
    }
}
