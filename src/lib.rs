// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::needless_pass_by_value)]

//! # card-transactions
//!
//! Downloads the full transaction history of a campus card account from
//! the card portal's paginated report endpoint and stores it as one JSON
//! array.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use card_transactions::{Credentials, FetchConfig, PaginationDriver, QueryWindow};
//!
//! #[tokio::main]
//! async fn main() -> card_transactions::Result<()> {
//!     let config = FetchConfig::default();
//!     let driver = PaginationDriver::from_config(&config)?;
//!
//!     let credentials = Credentials::new("session-id", "hall-ticket");
//!     let start = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//!     let window = QueryWindow::new("122579", start);
//!
//!     let result = driver.fetch_all(&credentials, &window, config.delay()?).await;
//!     println!("{} records", result.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                      CLI (Runner)                         │
//! │   flags + config → credentials → fetch_all → JSON file    │
//! └───────────────────────────────────────────────────────────┘
//!                              │
//! ┌──────────────┬─────────────┴──────┬──────────────┬────────┐
//! │  Pagination  │       Fetch        │     HTTP     │ Output │
//! ├──────────────┼────────────────────┼──────────────┼────────┤
//! │ total → pages│ retry + backoff    │ form POST    │ JSON   │
//! │ page order   │ pacing             │ cookies      │ latest │
//! │ partial stop │ outcome classifier │ Transport    │        │
//! └──────────────┴────────────────────┴──────────────┴────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Run configuration
pub mod config;

/// HTTP transport for the report endpoint
pub mod http;

/// Single-page fetch with retry
pub mod fetch;

/// Walking every page of a query
pub mod pagination;

/// JSON export files
pub mod output;

/// Command-line interface
pub mod cli;

#[cfg(test)]
pub(crate) mod testing;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::FetchConfig;
pub use error::{Error, Result};
pub use fetch::{PageFetcher, Sleeper, TokioSleeper};
pub use http::{HttpClient, Transport};
pub use pagination::{FetchResult, FetchStatus, PaginationDriver};
pub use types::{Credentials, QueryWindow, TransactionRecord};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
