/*!
Route origin classification over a built [`PrefixTrie`].

Given an announced `(prefix, origin)` pair and the ROA index, [`validate`]
produces one of:

- `NotFound`: no ROA covers the prefix;
- `Valid`: a covering ROA authorizes the origin at the announced length
  (or matches the announced prefix exactly);
- `Invalid,more-specific`: the origin is authorized for a covering prefix
  but the announcement is more specific than its ROAs allow;
- `Invalid`: covering ROAs exist but none mentions the origin;
- `ReservedAsn`: the origin is in a reserved/private range and is rejected
  before any trie lookup.

This mirrors route-origin-validation semantics for origin checks; AS-path
validation and BGPsec are out of scope.
*/
use crate::models::{Asn, IpPrefix, RoaValidation, RoaValidity};
use crate::trie::{PrefixTrie, TrieNode};

/// Classify one announcement against the ROAs stored in `trie`.
///
/// Covering nodes are scanned from least to most specific. Within the bucket
/// for the queried origin, records are tried in insertion order and the
/// first one satisfying `max_length >= prefix_len` (or an exact prefix
/// match) settles the verdict as `Valid` and stops the scan. Without such a
/// record the best verdict seen so far stands: `Invalid,more-specific` when
/// some bucket matched the origin, plain `Invalid` otherwise.
pub fn validate(trie: &PrefixTrie, prefix: &IpPrefix, origin: Asn) -> RoaValidation {
    if origin.is_reserved() {
        return RoaValidation::reserved_asn();
    }

    let covering: Vec<&TrieNode> = trie.covering_nodes(prefix).collect();
    let Some(most_specific) = covering.last() else {
        return RoaValidation::not_found();
    };

    // A covering ROA exists, so the announcement is invalid until a record
    // for this origin proves otherwise. The most specific node only supplies
    // illustrative evidence for that default.
    let mut verdict = RoaValidation::new(
        RoaValidity::Invalid,
        *most_specific.prefix(),
        most_specific.first_record().cloned(),
    );

    for node in &covering {
        let Some(records) = node.records(origin) else {
            continue;
        };
        for roa in records {
            verdict = RoaValidation::new(
                RoaValidity::InvalidMoreSpecific,
                *node.prefix(),
                Some(roa.clone()),
            );
            if roa.max_length >= prefix.prefix_len() || node.prefix() == prefix {
                verdict.status = RoaValidity::Valid;
                return verdict;
            }
        }
    }

    verdict
}
