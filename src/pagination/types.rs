//! Pagination result types
//!
//! Defines what a run hands back to its caller.

use crate::error::Error;
use crate::types::TransactionRecord;

/// How a run ended
#[derive(Debug)]
pub enum FetchStatus {
    /// Every page was fetched
    Complete,
    /// A page after the first failed; earlier pages are kept
    Partial {
        /// Page that could not be fetched
        failed_page: u32,
        /// Why it failed
        reason: Error,
    },
    /// The first page could not be fetched at all
    InitialFetchFailed(Error),
    /// The first page came back without a `total`
    UnexpectedFormat {
        /// Truncated, pretty-printed body of the first page
        preview: String,
    },
}

impl FetchStatus {
    /// Check if every page was fetched
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete)
    }

    /// Check if the run stopped before gathering anything
    pub fn is_aborted(&self) -> bool {
        matches!(
            self,
            Self::InitialFetchFailed(_) | Self::UnexpectedFormat { .. }
        )
    }

    /// Operator hint for the way the run ended
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::Complete => None,
            Self::Partial { .. } => Some("Stopping pagination due to error"),
            Self::InitialFetchFailed(_) => Some(
                "Failed to fetch initial data. Please check your session credentials. \
                 Make sure your ASP.NETSessionId and hallticket are valid and not expired.",
            ),
            Self::UnexpectedFormat { .. } => Some("Unexpected response format"),
        }
    }
}

/// Records gathered by one run
#[derive(Debug)]
pub struct FetchResult {
    /// Rows of pages 1..k in page order
    pub records: Vec<TransactionRecord>,
    /// `total` as reported by the first page
    pub total: Option<u64>,
    /// Pages derived from `total`
    pub total_pages: u64,
    /// Pages whose rows made it into `records`
    pub pages_fetched: u32,
    /// How the run ended
    pub status: FetchStatus,
}

impl FetchResult {
    /// An empty result for a run that stopped at the first page
    pub fn aborted(status: FetchStatus) -> Self {
        Self {
            records: Vec::new(),
            total: None,
            total_pages: 0,
            pages_fetched: 0,
            status,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Check if every page was fetched
    pub fn is_complete(&self) -> bool {
        self.status.is_complete()
    }

    /// Page that ended a partial run
    pub fn failed_page(&self) -> Option<u32> {
        match self.status {
            FetchStatus::Partial { failed_page, .. } => Some(failed_page),
            _ => None,
        }
    }
}
