use crate::error::RovError;
use crate::loader::{parse_timestamp, LoadStats};
use crate::models::{Asn, IpPrefix, RoaRecord, TrustAnchor};
use crate::trie::PrefixTrie;
use log::warn;
use serde::Deserialize;
use std::io::Read;

/// Top-level shape of a JSON export feed. Entries stay opaque JSON values
/// here so a single malformed object can be skipped on its own.
#[derive(Deserialize)]
struct RoaDocument {
    roas: Vec<serde_json::Value>,
}

/// One entry of a JSON ROA export feed.
#[derive(Deserialize)]
struct RawRoa {
    asn: Asn,
    prefix: String,
    #[serde(rename = "maxLength")]
    max_length: Option<u8>,
    ta: Option<String>,
    #[serde(rename = "startTime")]
    start_time: Option<String>,
    #[serde(rename = "endTime")]
    end_time: Option<String>,
    uri: Option<String>,
}

/// Load a JSON export document into `trie`.
///
/// Fails only when the document itself is not valid JSON or lacks the
/// `roas` array; individual malformed entries are skipped and counted.
pub fn parse_json<R: Read>(reader: R, trie: &mut PrefixTrie) -> Result<LoadStats, RovError> {
    let document: RoaDocument = serde_json::from_reader(reader)?;

    let mut stats = LoadStats::default();
    for value in document.roas {
        let raw: RawRoa = match serde_json::from_value(value) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("skipping malformed ROA object: {e}");
                stats.skipped += 1;
                continue;
            }
        };
        match insert_entry(trie, raw) {
            Ok(()) => stats.inserted += 1,
            Err(e) => {
                warn!("skipping ROA: {e}");
                stats.skipped += 1;
            }
        }
    }
    Ok(stats)
}

fn insert_entry(trie: &mut PrefixTrie, raw: RawRoa) -> Result<(), RovError> {
    let prefix: IpPrefix = raw.prefix.parse()?;
    let max_length = raw.max_length.unwrap_or_else(|| prefix.prefix_len());
    let trust_anchor = raw
        .ta
        .as_deref()
        .map(TrustAnchor::from_ta_field)
        .unwrap_or(TrustAnchor::Unknown);

    let mut record = RoaRecord::new(max_length, trust_anchor);
    record.valid_from = raw.start_time.as_deref().and_then(parse_timestamp);
    record.valid_until = raw.end_time.as_deref().and_then(parse_timestamp);
    record.source_uri = raw.uri;

    trie.insert(prefix, raw.asn, record)
}
