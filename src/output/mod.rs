//! Output module
//!
//! Writes the fetched transactions to disk.
//!
//! # Overview
//!
//! This module provides utilities for:
//! - Naming output files `card_transactions_<YYYYMMDD_HHMMSS>.json`
//! - Writing records as a pretty-printed JSON array
//! - Finding the newest output file in a directory

mod writer;

pub use writer::{
    find_latest_transaction_file, is_transaction_file, output_file_name, write_transactions,
    FILE_PREFIX, FILE_SUFFIX, TIMESTAMP_FORMAT,
};
