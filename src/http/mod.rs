//! HTTP module
//!
//! Provides the transport used by the page fetcher.
//!
//! # Features
//!
//! - **Transport trait**: one request in, one raw response out, so retry and
//!   pagination logic can run against a scripted fake
//! - **HttpClient**: reqwest implementation posting the report form with the
//!   session cookies attached
//! - **No pooling**: every attempt opens and closes its own connection

mod client;
mod types;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder};
pub use types::{preview, PageRequest, RawResponse, Transport, BODY_PREVIEW_CHARS};
