//! CLI module
//!
//! Command-line interface for fetching transaction history.
//!
//! One invocation performs one run: resolve credentials, fetch every page
//! of the query window and write the records to a timestamped JSON file.
//! `--latest` instead prints the newest export and exits.

mod commands;
mod prompt;
mod runner;

pub use commands::Cli;
pub use prompt::{resolve_credentials, Prompt, Terminal};
pub use runner::Runner;
