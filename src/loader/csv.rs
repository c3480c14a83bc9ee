use crate::error::RovError;
use crate::loader::{parse_timestamp, LoadStats};
use crate::models::{Asn, IpPrefix, RoaRecord, TrustAnchor};
use crate::trie::PrefixTrie;
use log::warn;
use std::io::{BufRead, BufReader, Read};

/// Load a registry CSV archive into `trie`.
///
/// Expects the RIPE historical repository layout: a header row followed by
/// `uri,asn,prefix,maxLength,startTime,endTime` rows, where `maxLength` may
/// be empty (defaulting to the prefix's own length). The trust anchor is
/// inferred from `source_name` (file name or URL).
pub fn parse_csv<R: Read>(
    reader: R,
    source_name: &str,
    trie: &mut PrefixTrie,
) -> Result<LoadStats, RovError> {
    let trust_anchor = TrustAnchor::from_source_name(source_name);

    let mut stats = LoadStats::default();
    for (line_no, line) in BufReader::new(reader).lines().enumerate() {
        let line = line?;
        if line_no == 0 || line.trim().is_empty() {
            continue;
        }
        match insert_row(trie, &line, &trust_anchor) {
            Ok(()) => stats.inserted += 1,
            Err(e) => {
                warn!("{source_name}:{}: skipping row: {e}", line_no + 1);
                stats.skipped += 1;
            }
        }
    }
    Ok(stats)
}

fn insert_row(trie: &mut PrefixTrie, line: &str, trust_anchor: &TrustAnchor) -> Result<(), RovError> {
    let fields: Vec<&str> = line.split(',').collect();
    let &[uri, asn, prefix, max_length, start_time, end_time] = fields.as_slice() else {
        return Err(RovError::ParseError(format!(
            "expected 6 columns, got {}",
            fields.len()
        )));
    };

    let origin: Asn = asn.parse()?;
    let prefix: IpPrefix = prefix.parse()?;
    let max_length = match max_length.trim() {
        "" => prefix.prefix_len(),
        value => value
            .parse::<u8>()
            .map_err(|_| RovError::ParseError(format!("invalid maxLength '{value}'")))?,
    };

    let mut record = RoaRecord::new(max_length, trust_anchor.clone())
        .with_validity(parse_timestamp(start_time), parse_timestamp(end_time));
    if !uri.trim().is_empty() {
        record.source_uri = Some(uri.trim().to_string());
    }

    trie.insert(prefix, origin, record)
}
