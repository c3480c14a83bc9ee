/*!
Aggregates named ROA trust sources and answers validation queries over them.

A [`Rov`] maps source names (a live feed, one or more dated historical
archives) to immutable [`PrefixTrie`] snapshots. Reloading a source builds a
complete replacement trie and swaps the handle, so concurrent readers
holding a snapshot never observe a partially populated index.
*/
use crate::error::RovError;
use crate::loader::{self, LoadStats, SourceFormat};
use crate::models::{Asn, IpPrefix, RoaRecord, RoaValidation};
use crate::trie::PrefixTrie;
use crate::validator::validate;
use chrono::NaiveDate;
use itertools::Itertools;
use log::{error, info};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// The live JSON export feed used when no explicit source is configured.
pub const DEFAULT_RPKI_URL: &str = "https://rpki.gin.ntt.net/api/export.json";

/// Source name used by [`Rov::check`] and [`Rov::load_default`].
pub const DEFAULT_SOURCE: &str = "rpki";

/// TAL directories of the RIPE historical RPKI repository
/// (<https://ftp.ripe.net/ripe/rpki/>).
pub const RPKI_ARCHIVE_TALS: [&str; 5] = [
    "afrinic.tal",
    "apnic.tal",
    "arin.tal",
    "lacnic.tal",
    "ripencc.tal",
];

/// URLs of the five per-TAL dumps for one day of the RIPE historical
/// archive. Data starts 2018-04-04.
pub fn archive_urls(date: NaiveDate) -> Vec<String> {
    RPKI_ARCHIVE_TALS
        .iter()
        .map(|tal| {
            format!(
                "https://ftp.ripe.net/ripe/rpki/{tal}/{}/roas.csv",
                date.format("%Y/%m/%d")
            )
        })
        .collect()
}

/// Route origin validator over one or more named ROA sources.
///
/// ```
/// use rov::{Rov, RoaRecord, RoaValidity, TrustAnchor};
///
/// let mut rov = Rov::new();
/// rov.insert(
///     "rpki",
///     "10.0.0.0/8".parse()?,
///     64000.into(),
///     RoaRecord::new(16, TrustAnchor::RipeNcc),
/// )?;
///
/// assert_eq!(rov.check("10.0.0.0/16", 64000)?.status, RoaValidity::Valid);
/// assert_eq!(
///     rov.check("10.0.0.0/24", 64000)?.status,
///     RoaValidity::InvalidMoreSpecific
/// );
/// # Ok::<(), rov::RovError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Rov {
    sources: HashMap<String, Arc<PrefixTrie>>,
}

impl Rov {
    pub fn new() -> Rov {
        Rov::default()
    }

    /// Build the named source from the given files or URLs and swap it in,
    /// replacing any previous snapshot under the same name. Loading the same
    /// payloads twice therefore yields the same index, not a doubled one.
    ///
    /// Sources are read through oneio, so plain files, URLs, and gzip/bzip2
    /// compressed payloads all work. A file that cannot be read or whose
    /// format is not recognized is counted in
    /// [`failed_sources`](LoadStats::failed_sources) and skipped; the
    /// remaining files still load.
    pub fn load<S: AsRef<str>>(&mut self, name: &str, sources: &[S]) -> Result<LoadStats, RovError> {
        info!(
            "loading source '{name}' from: {}",
            sources.iter().map(|s| s.as_ref()).join(", ")
        );

        let mut trie = PrefixTrie::new();
        let mut stats = LoadStats::default();
        for source in sources {
            let source = source.as_ref();
            match load_one(source, &mut trie) {
                Ok(file_stats) => {
                    info!(
                        "loaded {source}: {} records, {} skipped",
                        file_stats.inserted, file_stats.skipped
                    );
                    stats.merge(file_stats);
                }
                Err(e) => {
                    error!("failed to load {source}: {e}");
                    stats.failed_sources += 1;
                }
            }
        }

        self.sources.insert(name.to_string(), Arc::new(trie));
        Ok(stats)
    }

    /// Populate the default source from the public live feed.
    pub fn load_default(&mut self) -> Result<LoadStats, RovError> {
        self.load(DEFAULT_SOURCE, &[DEFAULT_RPKI_URL])
    }

    /// Insert a single record into the named source, creating the source if
    /// absent. Bulk loads should go through [`Rov::load`]; this entry point
    /// exists for programmatic population and tests. When readers still hold
    /// the previous snapshot it is cloned, preserving their view.
    pub fn insert(
        &mut self,
        name: &str,
        prefix: IpPrefix,
        origin: Asn,
        record: RoaRecord,
    ) -> Result<(), RovError> {
        let trie = self.sources.entry(name.to_string()).or_default();
        Arc::make_mut(trie).insert(prefix, origin, record)
    }

    /// A shareable snapshot of one source's index, safe for concurrent
    /// lookups while this `Rov` keeps loading.
    pub fn trie(&self, name: &str) -> Option<Arc<PrefixTrie>> {
        self.sources.get(name).cloned()
    }

    pub fn source_names(&self) -> impl Iterator<Item = &str> {
        self.sources.keys().map(String::as_str)
    }

    /// Validate an announcement against the default `"rpki"` source.
    ///
    /// A malformed CIDR string is surfaced as an error; an absent or empty
    /// source yields a `NotFound` verdict, never an error.
    pub fn check(&self, prefix: &str, origin: impl Into<Asn>) -> Result<RoaValidation, RovError> {
        self.check_source(DEFAULT_SOURCE, prefix, origin)
    }

    /// Validate an announcement against one named source.
    pub fn check_source(
        &self,
        name: &str,
        prefix: &str,
        origin: impl Into<Asn>,
    ) -> Result<RoaValidation, RovError> {
        let prefix: IpPrefix = prefix.parse()?;
        let origin = origin.into();
        Ok(match self.sources.get(name) {
            Some(trie) => validate(trie, &prefix, origin),
            None if origin.is_reserved() => RoaValidation::reserved_asn(),
            None => RoaValidation::not_found(),
        })
    }

    /// One verdict per source, tagged by source name. How to combine
    /// disagreeing sources (e.g. "any Valid wins") is the caller's policy.
    pub fn query_all(
        &self,
        prefix: &str,
        origin: impl Into<Asn>,
    ) -> Result<BTreeMap<String, RoaValidation>, RovError> {
        let prefix: IpPrefix = prefix.parse()?;
        let origin = origin.into();
        Ok(self
            .sources
            .iter()
            .map(|(name, trie)| (name.clone(), validate(trie, &prefix, origin)))
            .collect())
    }
}

fn load_one(source: &str, trie: &mut PrefixTrie) -> Result<LoadStats, RovError> {
    let format = SourceFormat::detect(source)?;
    let reader = oneio::get_reader(source)?;
    match format {
        SourceFormat::Json => loader::parse_json(reader, trie),
        SourceFormat::Csv => loader::parse_csv(reader, source, trie),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RoaValidity, TrustAnchor};

    fn populated() -> Rov {
        let mut rov = Rov::new();
        rov.insert(
            DEFAULT_SOURCE,
            "10.0.0.0/8".parse().unwrap(),
            Asn::new(64000),
            RoaRecord::new(16, TrustAnchor::RipeNcc),
        )
        .unwrap();
        rov
    }

    #[test]
    fn test_check_default_source() {
        let rov = populated();
        assert_eq!(rov.check("10.0.0.0/16", 64000).unwrap().status, RoaValidity::Valid);
        assert_eq!(
            rov.check("10.0.0.0/24", 64000).unwrap().status,
            RoaValidity::InvalidMoreSpecific
        );
        assert_eq!(
            rov.check("10.0.0.0/16", 64001).unwrap().status,
            RoaValidity::Invalid
        );
        assert_eq!(
            rov.check("11.0.0.0/8", 64000).unwrap().status,
            RoaValidity::NotFound
        );
    }

    #[test]
    fn test_bad_query_prefix_is_an_error() {
        let rov = populated();
        assert!(rov.check("10.0.0.0/40", 64000).is_err());
        assert!(rov.check("banana", 64000).is_err());
        assert!(rov.query_all("banana", 64000).is_err());
    }

    #[test]
    fn test_missing_source_behaves_as_empty() {
        let rov = Rov::new();
        assert_eq!(
            rov.check("10.0.0.0/8", 64000).unwrap().status,
            RoaValidity::NotFound
        );
        assert_eq!(
            rov.check("10.0.0.0/8", 65000).unwrap().status,
            RoaValidity::ReservedAsn
        );
        assert!(rov.trie("rpki").is_none());
    }

    #[test]
    fn test_query_all_reports_each_source_verbatim() {
        let mut rov = populated();
        // an archive that authorizes a different origin for the same prefix
        rov.insert(
            "archive-2019-01-01",
            "10.0.0.0/8".parse().unwrap(),
            Asn::new(64001),
            RoaRecord::new(16, TrustAnchor::Arin),
        )
        .unwrap();

        let verdicts = rov.query_all("10.0.0.0/16", 64000).unwrap();
        assert_eq!(verdicts.len(), 2);
        assert_eq!(verdicts["rpki"].status, RoaValidity::Valid);
        assert_eq!(verdicts["archive-2019-01-01"].status, RoaValidity::Invalid);
    }

    #[test]
    fn test_insert_rejected_record_surfaces_error() {
        let mut rov = Rov::new();
        let result = rov.insert(
            DEFAULT_SOURCE,
            "10.0.0.0/16".parse().unwrap(),
            Asn::new(64000),
            RoaRecord::new(8, TrustAnchor::Unknown),
        );
        assert!(matches!(result, Err(RovError::RejectedRecord { .. })));
    }

    #[test]
    fn test_snapshot_survives_reload() {
        let mut rov = populated();
        let snapshot = rov.trie(DEFAULT_SOURCE).unwrap();
        assert_eq!(snapshot.record_count(), 1);

        // mutating the aggregator must not disturb the held snapshot
        rov.insert(
            DEFAULT_SOURCE,
            "192.0.2.0/24".parse().unwrap(),
            Asn::new(64001),
            RoaRecord::new(24, TrustAnchor::Apnic),
        )
        .unwrap();
        assert_eq!(snapshot.record_count(), 1);
        assert_eq!(rov.trie(DEFAULT_SOURCE).unwrap().record_count(), 2);
    }

    #[test]
    fn test_archive_urls() {
        let urls = archive_urls(NaiveDate::from_ymd_opt(2019, 1, 4).unwrap());
        assert_eq!(urls.len(), 5);
        assert_eq!(
            urls[4],
            "https://ftp.ripe.net/ripe/rpki/ripencc.tal/2019/01/04/roas.csv"
        );
        assert!(urls[0].contains("afrinic.tal"));
    }
}
