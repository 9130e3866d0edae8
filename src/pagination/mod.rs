//! Pagination module
//!
//! Drives the page fetcher across the whole report.
//!
//! # Overview
//!
//! The first page tells how many records exist. From that count the driver
//! derives the number of pages and fetches them strictly in order, one at a
//! time. A page that cannot be fetched ends the run early and the records
//! gathered so far are returned as a partial result.

mod driver;
mod types;

pub use driver::PaginationDriver;
pub use types::{FetchResult, FetchStatus};
