//! Decoded report page

use crate::http::preview;
use crate::types::{JsonValue, TransactionRecord};

/// A page of the report as decoded from JSON.
///
/// The body is kept whole; `total` and `rows` are looked up on demand so a
/// body missing either can still be shown in diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    body: JsonValue,
}

impl Page {
    /// Parse a response body
    pub fn parse(body: &str) -> serde_json::Result<Self> {
        serde_json::from_str(body).map(Self::from_value)
    }

    /// Wrap an already decoded body
    pub fn from_value(body: JsonValue) -> Self {
        Self { body }
    }

    /// Total record count across all pages.
    ///
    /// Accepts an unsigned integer or a numeric string.
    pub fn total(&self) -> Option<u64> {
        match self.body.get("total")? {
            JsonValue::Number(n) => n.as_u64(),
            JsonValue::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Rows of this page, if the body carries a `rows` array
    pub fn rows(&self) -> Option<&[TransactionRecord]> {
        self.body.get("rows")?.as_array().map(Vec::as_slice)
    }

    /// Take the rows out of the page
    pub fn into_rows(self) -> Option<Vec<TransactionRecord>> {
        match self.body {
            JsonValue::Object(mut map) => match map.remove("rows") {
                Some(JsonValue::Array(rows)) => Some(rows),
                _ => None,
            },
            _ => None,
        }
    }

    /// Pretty-printed body, truncated for logs
    pub fn preview(&self) -> String {
        let pretty =
            serde_json::to_string_pretty(&self.body).unwrap_or_else(|_| self.body.to_string());
        preview(&pretty)
    }
}
