use chrono::{DateTime, Utc};
use std::fmt::{Display, Formatter};

/// The five registries whose archives carry per-TAL ROA dumps.
const KNOWN_RIRS: [(&str, TrustAnchor); 5] = [
    ("afrinic", TrustAnchor::Afrinic),
    ("apnic", TrustAnchor::Apnic),
    ("arin", TrustAnchor::Arin),
    ("lacnic", TrustAnchor::Lacnic),
    ("ripencc", TrustAnchor::RipeNcc),
];

/// The issuing registry/authority of a ROA.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TrustAnchor {
    Afrinic,
    Apnic,
    Arin,
    Lacnic,
    RipeNcc,
    /// A free-form trust anchor name from a JSON feed's `ta` field.
    Other(String),
    Unknown,
}

impl TrustAnchor {
    /// Infer the registry from a file name or URL, following the RIPE
    /// archive naming scheme (`.../ripencc.tal/.../roas.csv` or a dump
    /// renamed to `ripencc.csv`). Falls back to [`TrustAnchor::Unknown`].
    pub fn from_source_name(name: &str) -> TrustAnchor {
        for (rir, ta) in KNOWN_RIRS {
            if name.contains(&format!("{rir}.tal")) || name.contains(&format!("{rir}.csv")) {
                return ta;
            }
        }
        TrustAnchor::Unknown
    }

    /// Normalize a `ta` field value; registry names map onto their variants,
    /// anything else is carried through verbatim.
    pub fn from_ta_field(value: &str) -> TrustAnchor {
        let lower = value.trim().to_ascii_lowercase();
        match lower.as_str() {
            "afrinic" => TrustAnchor::Afrinic,
            "apnic" => TrustAnchor::Apnic,
            "arin" => TrustAnchor::Arin,
            "lacnic" => TrustAnchor::Lacnic,
            "ripencc" | "ripe ncc" | "ripe" => TrustAnchor::RipeNcc,
            "" => TrustAnchor::Unknown,
            _ => TrustAnchor::Other(value.trim().to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            TrustAnchor::Afrinic => "afrinic",
            TrustAnchor::Apnic => "apnic",
            TrustAnchor::Arin => "arin",
            TrustAnchor::Lacnic => "lacnic",
            TrustAnchor::RipeNcc => "ripencc",
            TrustAnchor::Other(name) => name,
            TrustAnchor::Unknown => "unknown",
        }
    }
}

impl Display for TrustAnchor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One Route Origin Authorization statement attached to a prefix.
///
/// The authorized origin is not part of the record itself: the trie buckets
/// records per `(prefix, origin)` pair, and the same record shape may appear
/// under several origins (legitimate multi-origin authorization) or several
/// times under one origin (time-varying duplicates from archives).
/// Immutable after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoaRecord {
    /// Longest announcement length this authorization allows. Never shorter
    /// than the owning prefix; violating records are rejected at load time.
    pub max_length: u8,
    pub trust_anchor: TrustAnchor,
    pub valid_from: Option<DateTime<Utc>>,
    pub valid_until: Option<DateTime<Utc>>,
    pub source_uri: Option<String>,
}

impl RoaRecord {
    pub fn new(max_length: u8, trust_anchor: TrustAnchor) -> RoaRecord {
        RoaRecord {
            max_length,
            trust_anchor,
            valid_from: None,
            valid_until: None,
            source_uri: None,
        }
    }

    pub fn with_validity(
        mut self,
        from: Option<DateTime<Utc>>,
        until: Option<DateTime<Utc>>,
    ) -> RoaRecord {
        self.valid_from = from;
        self.valid_until = until;
        self
    }

    pub fn with_source_uri(mut self, uri: impl Into<String>) -> RoaRecord {
        self.source_uri = Some(uri.into());
        self
    }
}

mod serde_impl {
    use super::*;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    impl Serialize for TrustAnchor {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            serializer.collect_str(self)
        }
    }

    impl<'de> Deserialize<'de> for TrustAnchor {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: Deserializer<'de>,
        {
            let s = String::deserialize(deserializer)?;
            Ok(TrustAnchor::from_ta_field(&s))
        }
    }

    impl Serialize for RoaRecord {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            use serde::ser::SerializeStruct;
            let mut s = serializer.serialize_struct("RoaRecord", 5)?;
            s.serialize_field("maxLength", &self.max_length)?;
            s.serialize_field("ta", &self.trust_anchor)?;
            s.serialize_field("startTime", &self.valid_from)?;
            s.serialize_field("endTime", &self.valid_until)?;
            s.serialize_field("uri", &self.source_uri)?;
            s.end()
        }
    }
}
