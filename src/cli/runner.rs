//! CLI runner - executes a fetch run

use crate::cli::commands::Cli;
use crate::cli::prompt::{resolve_credentials, Prompt, Terminal};
use crate::config::FetchConfig;
use crate::error::{Error, Result};
use crate::output::{find_latest_transaction_file, write_transactions};
use crate::pagination::{FetchResult, FetchStatus, PaginationDriver};
use crate::types::{Credentials, QueryWindow, DATE_FORMAT};
use chrono::{Days, Local, NaiveDate};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::debug;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the command line on the terminal
    pub async fn run(&self) -> Result<()> {
        self.run_with(&mut Terminal).await.map(|_| ())
    }

    /// Run with credential prompts answered by `prompt`.
    ///
    /// Returns the export path when one was written. A run that stopped at
    /// the first page is an error; a partial run is not.
    pub async fn run_with(&self, prompt: &mut impl Prompt) -> Result<Option<PathBuf>> {
        let config = self.load_config()?;

        if self.cli.latest {
            return self.latest(&config);
        }

        let account = self
            .cli
            .account
            .clone()
            .ok_or_else(|| Error::config("Account number is required"))?;
        let start_date = self.start_date(&config)?;
        let window = QueryWindow::new(account, start_date).with_page_size(config.page_size)?;
        let delay = config.delay()?;

        let credentials = resolve_credentials(
            self.cli.session_id.clone(),
            self.cli.hall_ticket.clone(),
            prompt,
        )?;

        println!(
            "\nFetching transactions from {} to {}",
            window.start_date().format(DATE_FORMAT),
            window.end_date().format(DATE_FORMAT)
        );
        println!("Using account: {}", window.account());
        println!("{}", delay_banner(config.delay_secs));

        let result = self.fetch(&config, &credentials, &window, delay).await?;
        self.finish(&config, result)
    }

    /// Config file (or defaults) with flags applied
    fn load_config(&self) -> Result<FetchConfig> {
        let mut config = match &self.cli.config {
            Some(path) => FetchConfig::load(path)?,
            None => FetchConfig::default(),
        };
        self.cli.apply_overrides(&mut config);
        config.validate()?;
        debug!("Effective config: {config:?}");
        Ok(config)
    }

    fn start_date(&self, config: &FetchConfig) -> Result<NaiveDate> {
        if let Some(date) = self.cli.start_date {
            return Ok(date);
        }
        let lookback = u64::try_from(config.lookback_days)
            .map_err(|_| Error::invalid_value("lookback_days", "must not be negative"))?;
        Local::now()
            .date_naive()
            .checked_sub_days(Days::new(lookback))
            .ok_or_else(|| Error::invalid_value("lookback_days", "reaches before the calendar"))
    }

    async fn fetch(
        &self,
        config: &FetchConfig,
        credentials: &Credentials,
        window: &QueryWindow,
        delay: Duration,
    ) -> Result<FetchResult> {
        let driver = PaginationDriver::from_config(config)?;
        let started = Instant::now();
        let result = driver.fetch_all(credentials, window, delay).await;
        debug!(
            "Run finished in {:.1}s with {} records",
            started.elapsed().as_secs_f64(),
            result.len()
        );
        Ok(result)
    }

    fn finish(&self, config: &FetchConfig, result: FetchResult) -> Result<Option<PathBuf>> {
        if let Some(hint) = result.status.hint() {
            println!("\n{hint}");
        }

        let path = if result.is_empty() {
            println!("\nNo transactions were retrieved. Please check the error messages above.");
            None
        } else {
            let path = write_transactions(&config.output_dir, &result.records, &Local::now())?;
            println!("\nTransactions saved to {}", path.display());
            println!("Total transactions fetched: {}", result.len());
            Some(path)
        };

        if result.status.is_aborted() {
            return Err(match result.status {
                FetchStatus::InitialFetchFailed(e) => e,
                _ => Error::Other("Unexpected response format".to_string()),
            });
        }
        Ok(path)
    }

    fn latest(&self, config: &FetchConfig) -> Result<Option<PathBuf>> {
        let latest = find_latest_transaction_file(&config.output_dir)?;
        match &latest {
            Some(path) => println!("{}", path.display()),
            None => println!(
                "No transaction exports found in {}",
                config.output_dir.display()
            ),
        }
        Ok(latest)
    }
}

/// Seconds always carry a fractional part: `1.0s`, `2.5s`, `0.25s`
fn delay_banner(delay_secs: f64) -> String {
    format!("Using {delay_secs:?}s delay between requests...")
}
