//! JSON file writer
//!
//! The file name format is relied upon by the reporting side, which picks
//! the newest export by comparing names. Keep it exact.

use crate::error::{Error, Result};
use crate::types::TransactionRecord;
use chrono::{DateTime, TimeZone};
use std::fmt::Display;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Prefix of every export file
pub const FILE_PREFIX: &str = "card_transactions_";

/// Suffix of every export file
pub const FILE_SUFFIX: &str = ".json";

/// Timestamp embedded in the file name
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// File name for an export taken at `at`
pub fn output_file_name<Tz>(at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    format!("{FILE_PREFIX}{}{FILE_SUFFIX}", at.format(TIMESTAMP_FORMAT))
}

/// Check if a file name looks like an export
pub fn is_transaction_file(name: &str) -> bool {
    name.starts_with(FILE_PREFIX) && name.ends_with(FILE_SUFFIX)
}

/// Write `records` as a JSON array into `dir`, returning the file path.
///
/// The array is indented by two spaces and non-ASCII text is written as
/// UTF-8, not escaped.
pub fn write_transactions<Tz>(
    dir: impl AsRef<Path>,
    records: &[TransactionRecord],
    at: &DateTime<Tz>,
) -> Result<PathBuf>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let dir = dir.as_ref();
    fs::create_dir_all(dir).map_err(|e| {
        Error::output(format!(
            "Failed to create output directory '{}': {e}",
            dir.display()
        ))
    })?;

    let path = dir.join(output_file_name(at));
    let file = File::create(&path).map_err(|e| {
        Error::output(format!("Failed to create file '{}': {e}", path.display()))
    })?;

    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, records)?;
    writer.flush()?;

    debug!("Wrote {} records to {}", records.len(), path.display());
    Ok(path)
}

/// Newest export in `dir`, by file name.
///
/// Names embed a sortable timestamp, so the lexicographic maximum is the
/// most recent one.
pub fn find_latest_transaction_file(dir: impl AsRef<Path>) -> Result<Option<PathBuf>> {
    let dir = dir.as_ref();
    let mut latest: Option<String> = None;

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };
        if is_transaction_file(&name) && latest.as_ref().map_or(true, |l| name > *l) {
            latest = Some(name);
        }
    }

    Ok(latest.map(|name| dir.join(name)))
}
