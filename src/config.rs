//! Configuration for a fetch run
//!
//! Every field has a default, so an empty YAML document (or no file at
//! all) is a valid configuration. Command-line flags override file values.

use crate::error::{Error, Result};
use crate::http::HttpClientConfig;
use crate::types::DEFAULT_PAGE_SIZE;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Report endpoint of the card portal
pub const DEFAULT_ENDPOINT: &str = "https://card.pku.edu.cn/Report/GetPersonTrjn";

// ============================================================================
// Fetch Config
// ============================================================================

/// Settings for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Report endpoint receiving the form POST
    pub endpoint: String,

    /// Rows requested per page
    pub page_size: u32,

    /// Attempts per page, first try included
    pub max_attempts: u32,

    /// Base delay in seconds: pacing before pages > 1 and backoff unit
    pub delay_secs: f64,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// Days before today used when no start date is given
    pub lookback_days: i64,

    /// Directory receiving `card_transactions_*.json`
    pub output_dir: PathBuf,

    /// Cookie names carrying the credentials
    pub cookies: CookieNames,

    /// User-Agent sent with every request (client default when unset)
    pub user_agent: Option<String>,

    /// Extra headers sent with every request
    pub headers: BTreeMap<String, String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            max_attempts: 3,
            delay_secs: 1.0,
            timeout_secs: 30,
            lookback_days: 60,
            output_dir: PathBuf::from("."),
            cookies: CookieNames::default(),
            user_agent: None,
            headers: BTreeMap::new(),
        }
    }
}

/// Cookie names of the session credentials
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CookieNames {
    pub session: String,
    pub ticket: String,
}

impl Default for CookieNames {
    fn default() -> Self {
        Self {
            session: "ASP.NETSessionId".to_string(),
            ticket: "hallticket".to_string(),
        }
    }
}

impl FetchConfig {
    /// Load a config file (YAML)
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read config '{}': {e}", path.display()))
        })?;
        Self::from_yaml_str(&content)
    }

    /// Parse a YAML document; blank input yields the defaults
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(Error::invalid_value("page_size", "must be positive"));
        }
        if self.max_attempts == 0 {
            return Err(Error::invalid_value("max_attempts", "must be at least 1"));
        }
        if self.lookback_days < 0 {
            return Err(Error::invalid_value("lookback_days", "must not be negative"));
        }
        url::Url::parse(&self.endpoint)?;
        self.delay()?;
        Ok(())
    }

    /// Base delay as a duration; negative or non-finite values are rejected
    pub fn delay(&self) -> Result<Duration> {
        Duration::try_from_secs_f64(self.delay_secs).map_err(|_| {
            Error::invalid_value(
                "delay",
                format!("{} is not a non-negative number of seconds", self.delay_secs),
            )
        })
    }

    /// HTTP client settings derived from this config
    pub fn http_client_config(&self) -> HttpClientConfig {
        let mut builder = HttpClientConfig::builder()
            .endpoint(&self.endpoint)
            .timeout(Duration::from_secs(self.timeout_secs))
            .cookie_names(&self.cookies.session, &self.cookies.ticket);
        if let Some(agent) = &self.user_agent {
            builder = builder.user_agent(agent);
        }
        for (name, value) in &self.headers {
            builder = builder.header(name, value);
        }
        builder.build()
    }
}
