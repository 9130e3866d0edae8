//! Common types used throughout card-transactions
//!
//! This module contains the inputs of a fetch run: the session
//! credentials and the query window. Both are built once and read-only
//! for the rest of the run.

use crate::error::{Error, Result};
use chrono::{Local, NaiveDate};
use std::fmt;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// A single transaction row as returned by the report endpoint.
///
/// Rows are passed through untouched; their fields are never inspected.
pub type TransactionRecord = JsonValue;

/// Date format used on the wire (`sdate` / `edate`)
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Default number of rows requested per page
pub const DEFAULT_PAGE_SIZE: u32 = 50;

// ============================================================================
// Credentials
// ============================================================================

/// Session credentials of the card portal.
///
/// Both values are opaque. They are attached to every request as cookies
/// and never written anywhere else.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    session_id: String,
    hall_ticket: String,
}

impl Credentials {
    /// Create credentials from an already-resolved pair
    pub fn new(session_id: impl Into<String>, hall_ticket: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            hall_ticket: hall_ticket.into(),
        }
    }

    /// Session identifier (`ASP.NETSessionId` cookie)
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Ticket token (`hallticket` cookie)
    pub fn hall_ticket(&self) -> &str {
        &self.hall_ticket
    }

    /// Both values are non-blank
    pub fn is_complete(&self) -> bool {
        !self.session_id.trim().is_empty() && !self.hall_ticket.trim().is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("session_id", &"[REDACTED]")
            .field("hall_ticket", &"[REDACTED]")
            .finish()
    }
}

// ============================================================================
// Query Window
// ============================================================================

/// What to ask the report endpoint for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryWindow {
    account: String,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
    page_size: u32,
}

impl QueryWindow {
    /// Create a window from `start_date` until today with the default page size
    pub fn new(account: impl Into<String>, start_date: NaiveDate) -> Self {
        Self {
            account: account.into(),
            start_date,
            end_date: None,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Set the page size; zero is rejected
    pub fn with_page_size(mut self, page_size: u32) -> Result<Self> {
        if page_size == 0 {
            return Err(Error::invalid_value("page_size", "must be positive"));
        }
        self.page_size = page_size;
        Ok(self)
    }

    /// Pin the end date instead of resolving it at request time
    #[must_use]
    pub fn with_end_date(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }

    pub fn account(&self) -> &str {
        &self.account
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// End date of the window: the pinned date, or today
    pub fn end_date(&self) -> NaiveDate {
        self.end_date.unwrap_or_else(|| Local::now().date_naive())
    }

    /// Number of pages needed for `total` records
    pub fn total_pages(&self, total: u64) -> u64 {
        total.div_ceil(u64::from(self.page_size))
    }
}

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| {
        Error::invalid_value(
            "date",
            format!("Invalid date format: {value}. Use YYYY-MM-DD"),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_credentials_debug_is_redacted() {
        let creds = Credentials::new("abc-session", "secret-ticket");
        let debug = format!("{creds:?}");
        assert!(!debug.contains("abc-session"));
        assert!(!debug.contains("secret-ticket"));
        assert!(debug.contains("REDACTED"));
    }

    #[test]
    fn test_credentials_complete() {
        assert!(Credentials::new("a", "b").is_complete());
        assert!(!Credentials::new("", "b").is_complete());
        assert!(!Credentials::new("a", "   ").is_complete());
    }

    #[test]
    fn test_query_window_defaults() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let window = QueryWindow::new("122579", start);
        assert_eq!(window.account(), "122579");
        assert_eq!(window.start_date(), start);
        assert_eq!(window.page_size(), DEFAULT_PAGE_SIZE);
        assert_eq!(window.end_date(), Local::now().date_naive());
    }

    #[test]
    fn test_query_window_pinned_end_date() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let window = QueryWindow::new("1", start).with_end_date(end);
        assert_eq!(window.end_date(), end);
    }

    #[test]
    fn test_query_window_rejects_zero_page_size() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let err = QueryWindow::new("1", start).with_page_size(0).unwrap_err();
        assert!(matches!(err, Error::InvalidConfigValue { .. }));
    }

    #[test_case(0, 50 => 0; "no records")]
    #[test_case(1, 50 => 1; "single record")]
    #[test_case(50, 50 => 1; "exactly one page")]
    #[test_case(51, 50 => 2; "one over")]
    #[test_case(120, 50 => 3; "partial last page")]
    #[test_case(7, 1 => 7; "page size one")]
    fn test_total_pages(total: u64, page_size: u32) -> u64 {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        QueryWindow::new("1", start)
            .with_page_size(page_size)
            .unwrap()
            .total_pages(total)
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2024-02-29").unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
        assert!(parse_date("2024/02/29").is_err());
        assert!(parse_date("yesterday").is_err());
    }
}
