/*!
Loaders turning raw ROA payloads into trie inserts.

Two source shapes are understood:

- JSON export feeds (`{"roas": [{"asn": .., "prefix": .., "maxLength": ..,
  "ta": ..}, ..]}`), the shape published by validated-cache exports such as
  rpki.gin.ntt.net;
- per-registry CSV archives (`uri,asn,prefix,maxLength,startTime,endTime`
  with a header row), the shape of the RIPE historical RPKI repository.

The error policy is skip-and-continue: a malformed row or object is logged,
counted in [`LoadStats`], and never aborts the rest of its file. Only an
unrecognized file format rejects a file as a whole.
*/
mod csv;
mod json;

pub use csv::parse_csv;
pub use json::parse_json;

use crate::error::RovError;
use chrono::{DateTime, NaiveDateTime, Utc};
use log::warn;
use serde::Serialize;

/// Counters for one load batch.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LoadStats {
    /// Records inserted into the trie.
    pub inserted: usize,
    /// Rows or objects skipped as malformed or rejected.
    pub skipped: usize,
    /// Whole files that could not be read or recognized.
    pub failed_sources: usize,
}

impl LoadStats {
    pub fn merge(&mut self, other: LoadStats) {
        self.inserted += other.inserted;
        self.skipped += other.skipped;
        self.failed_sources += other.failed_sources;
    }
}

/// Payload format of a source file, detected from its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Json,
    Csv,
}

impl SourceFormat {
    /// Detect the format from a file name or URL, looking through trailing
    /// compression suffixes (`roas.csv.gz`, `export.json.bz2`).
    pub fn detect(source: &str) -> Result<SourceFormat, RovError> {
        let name = source.rsplit('/').next().unwrap_or(source);
        let mut parts: Vec<&str> = name.split('.').collect();
        while matches!(parts.last(), Some(&"gz") | Some(&"bz2") | Some(&"xz")) {
            parts.pop();
        }
        match parts.last() {
            Some(&"json") => Ok(SourceFormat::Json),
            Some(&"csv") => Ok(SourceFormat::Csv),
            _ => Err(RovError::UnsupportedFormat(source.to_string())),
        }
    }
}

/// Parse a ROA validity timestamp. Archive CSVs use `%Y-%m-%d %H:%M:%S`,
/// JSON feeds RFC 3339. An unparseable stamp degrades to `None` with a
/// warning instead of rejecting the row.
pub(crate) fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt.and_utc());
        }
    }
    warn!("dropping unparseable ROA timestamp '{value}'");
    None
}
