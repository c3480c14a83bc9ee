/*!
`rov` is a library for RPKI Route Origin Validation (ROV): it indexes Route
Origin Authorizations (ROAs) from heterogeneous sources and classifies
announced `(prefix, origin ASN)` pairs as `Valid`, `Invalid`,
`Invalid,more-specific`, or `NotFound` using longest-covering-prefix
semantics.

ROA payloads come in two shapes:

- JSON export feeds such as <https://rpki.gin.ntt.net/api/export.json>;
- per-registry CSV archives from <https://ftp.ripe.net/ripe/rpki/>.

Both are normalized into one canonical record type and indexed in a binary
prefix trie, so a point query costs one bit-path walk regardless of how
many ROAs are loaded.

# Examples

Populate a source programmatically and validate announcements:

```
use rov::{Asn, Rov, RoaRecord, RoaValidity, TrustAnchor};

let mut rov = Rov::new();
rov.insert(
    "rpki",
    "10.0.0.0/8".parse()?,
    Asn::new(64000),
    RoaRecord::new(16, TrustAnchor::RipeNcc),
)?;

assert_eq!(rov.check("10.0.0.0/16", 64000)?.status, RoaValidity::Valid);
assert_eq!(rov.check("10.0.0.0/16", 64001)?.status, RoaValidity::Invalid);
assert_eq!(rov.check("11.0.0.0/8", 64000)?.status, RoaValidity::NotFound);
# Ok::<(), rov::RovError>(())
```

Load files or URLs (JSON feeds, registry CSV archives, optionally
gzip-compressed) and query every configured source at once:

```no_run
use rov::Rov;

let mut rov = Rov::new();
rov.load("rpki", &["https://rpki.gin.ntt.net/api/export.json"])?;
rov.load(
    "archive-2019-01-04",
    &rov::archive_urls(chrono::NaiveDate::from_ymd_opt(2019, 1, 4).unwrap()),
)?;

for (source, verdict) in rov.query_all("1.1.1.0/24", 13335)? {
    println!("{source}: {}", verdict.status);
}
# Ok::<(), rov::RovError>(())
```

Loading and querying are separable phases: a trie snapshot obtained from
[`Rov::trie`] is immutable and lock-free to share across threads, and
reloading a source swaps in a freshly built index instead of mutating the
one being read.
*/
pub mod error;
pub mod loader;
pub mod models;
pub mod rov;
pub mod trie;
pub mod validator;

pub use crate::error::RovError;
pub use crate::loader::{LoadStats, SourceFormat};
pub use crate::models::{Asn, IpPrefix, RoaRecord, RoaValidation, RoaValidity, TrustAnchor};
pub use crate::rov::{archive_urls, Rov, DEFAULT_RPKI_URL, DEFAULT_SOURCE, RPKI_ARCHIVE_TALS};
pub use crate::trie::{CoveringNodes, PrefixTrie, TrieNode};
pub use crate::validator::validate;
