//! CLI arguments

use crate::config::FetchConfig;
use crate::types::parse_date;
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;

/// Fetch campus card transactions
#[derive(Parser, Debug)]
#[command(name = "card-transactions")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Account number to query
    #[arg(required_unless_present = "latest")]
    pub account: Option<String>,

    /// Start date in YYYY-MM-DD format (default: 60 days ago)
    #[arg(long, value_parser = parse_start_date)]
    pub start_date: Option<NaiveDate>,

    /// Delay between requests in seconds (default: 1.0)
    #[arg(long, allow_negative_numbers = true)]
    pub delay: Option<f64>,

    /// Configuration file (YAML)
    #[arg(short = 'C', long)]
    pub config: Option<PathBuf>,

    /// Directory receiving the JSON export
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Rows per page
    #[arg(long)]
    pub page_size: Option<u32>,

    /// Attempts per page, first try included
    #[arg(long)]
    pub max_attempts: Option<u32>,

    /// Report endpoint URL
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// ASP.NETSessionId cookie value (prompted for when absent)
    #[arg(long, env = "CARD_SESSION_ID", hide_env_values = true)]
    pub session_id: Option<String>,

    /// hallticket cookie value (prompted for when absent)
    #[arg(long, env = "CARD_HALL_TICKET", hide_env_values = true)]
    pub hall_ticket: Option<String>,

    /// Print the newest export in the output directory and exit
    #[arg(long)]
    pub latest: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Overwrite config values with the flags that were given
    pub fn apply_overrides(&self, config: &mut FetchConfig) {
        if let Some(delay) = self.delay {
            config.delay_secs = delay;
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir.clone_from(dir);
        }
        if let Some(page_size) = self.page_size {
            config.page_size = page_size;
        }
        if let Some(max_attempts) = self.max_attempts {
            config.max_attempts = max_attempts;
        }
        if let Some(endpoint) = &self.endpoint {
            config.endpoint.clone_from(endpoint);
        }
        if let Some(timeout) = self.timeout_secs {
            config.timeout_secs = timeout;
        }
    }
}

fn parse_start_date(value: &str) -> std::result::Result<NaiveDate, String> {
    parse_date(value).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["card-transactions"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_minimal_args() {
        let cli = parse(&["122579"]);
        assert_eq!(cli.account.as_deref(), Some("122579"));
        assert!(cli.start_date.is_none());
        assert!(cli.delay.is_none());
        assert!(!cli.latest);
        assert!(!cli.verbose);
    }

    #[test]
    fn test_all_args() {
        let cli = parse(&[
            "122579",
            "--start-date",
            "2024-01-15",
            "--delay",
            "2.5",
            "--output-dir",
            "exports",
            "--page-size",
            "20",
            "--max-attempts",
            "5",
            "--endpoint",
            "http://localhost:8080/report",
            "--timeout-secs",
            "10",
            "--session-id",
            "sid",
            "--hall-ticket",
            "tkt",
            "-v",
        ]);

        assert_eq!(cli.start_date, NaiveDate::from_ymd_opt(2024, 1, 15));
        assert_eq!(cli.session_id.as_deref(), Some("sid"));
        assert_eq!(cli.hall_ticket.as_deref(), Some("tkt"));
        assert!(cli.verbose);

        let mut config = FetchConfig::default();
        cli.apply_overrides(&mut config);
        assert!((config.delay_secs - 2.5).abs() < f64::EPSILON);
        assert_eq!(config.output_dir, PathBuf::from("exports"));
        assert_eq!(config.page_size, 20);
        assert_eq!(config.max_attempts, 5);
        assert_eq!(config.endpoint, "http://localhost:8080/report");
        assert_eq!(config.timeout_secs, 10);
    }

    #[test]
    fn test_no_overrides_keep_config() {
        let cli = parse(&["122579"]);
        let mut config = FetchConfig {
            page_size: 15,
            ..Default::default()
        };
        cli.apply_overrides(&mut config);
        assert_eq!(config.page_size, 15);
        assert!((config.delay_secs - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_negative_delay_reaches_validation() {
        let cli = parse(&["122579", "--delay", "-1"]);
        let mut config = FetchConfig::default();
        cli.apply_overrides(&mut config);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_start_date() {
        let result =
            Cli::try_parse_from(["card-transactions", "122579", "--start-date", "01/15/2024"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_account_required_unless_latest() {
        assert!(Cli::try_parse_from(["card-transactions"]).is_err());
        let cli = parse(&["--latest"]);
        assert!(cli.latest);
        assert!(cli.account.is_none());
    }
}
