//! Page fetching
//!
//! One page, bounded retries.
//!
//! # Overview
//!
//! [`PageFetcher`] sends a page request through a [`Transport`], classifies
//! what comes back and retries transient failures with a linearly growing
//! pause. Pages after the first are preceded by a fixed pacing pause.
//!
//! [`Transport`]: crate::http::Transport

mod fetcher;
mod page;

pub use fetcher::{retry_delay, AttemptOutcome, PageFetcher, Sleeper, TokioSleeper};
pub use page::Page;
