use crate::models::{IpPrefix, RoaRecord};
use std::fmt::{Display, Formatter};

/// Route origin validation outcome for one `(prefix, origin)` query against
/// one ROA source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoaValidity {
    /// No ROA covers the queried prefix at all.
    NotFound,
    /// A covering ROA authorizes this origin at the queried prefix length.
    Valid,
    /// Covering ROAs exist but none mentions the queried origin.
    Invalid,
    /// The origin is authorized for a covering prefix, but the announcement
    /// is more specific than any of its ROAs allow.
    InvalidMoreSpecific,
    /// The queried origin falls in a reserved or private ASN range; no ROA
    /// lookup was performed.
    ReservedAsn,
}

impl RoaValidity {
    /// Numeric status code used by the JSON verdict output. `ReservedAsn`
    /// has no code: the classification never assigns it from ROA data.
    pub const fn status_code(&self) -> Option<u8> {
        match self {
            RoaValidity::NotFound => Some(0),
            RoaValidity::Valid => Some(1),
            RoaValidity::Invalid => Some(2),
            RoaValidity::InvalidMoreSpecific => Some(3),
            RoaValidity::ReservedAsn => None,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            RoaValidity::NotFound => "NotFound",
            RoaValidity::Valid => "Valid",
            RoaValidity::Invalid => "Invalid",
            RoaValidity::InvalidMoreSpecific => "Invalid,more-specific",
            RoaValidity::ReservedAsn => "ReservedAsn",
        }
    }

    pub const fn is_valid(&self) -> bool {
        matches!(self, RoaValidity::Valid)
    }
}

impl Display for RoaValidity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Full verdict for one query: the classification, the covering prefix that
/// produced it, and the ROA used as evidence (when any covering ROA exists).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoaValidation {
    pub status: RoaValidity,
    pub matched_prefix: Option<IpPrefix>,
    pub roa: Option<RoaRecord>,
}

impl RoaValidation {
    pub(crate) fn new(status: RoaValidity, matched_prefix: IpPrefix, roa: Option<RoaRecord>) -> Self {
        RoaValidation {
            status,
            matched_prefix: Some(matched_prefix),
            roa,
        }
    }

    pub fn not_found() -> Self {
        RoaValidation {
            status: RoaValidity::NotFound,
            matched_prefix: None,
            roa: None,
        }
    }

    pub fn reserved_asn() -> Self {
        RoaValidation {
            status: RoaValidity::ReservedAsn,
            matched_prefix: None,
            roa: None,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.status.is_valid()
    }
}

mod serde_impl {
    use super::*;
    use serde::ser::SerializeStruct;
    use serde::{Serialize, Serializer};

    /// Verdicts serialize flat, with the evidence ROA's attributes hoisted
    /// to the top level next to the status fields.
    impl Serialize for RoaValidation {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            let roa = self.roa.as_ref();
            let mut s = serializer.serialize_struct("RoaValidation", 7)?;
            s.serialize_field("status", self.status.as_str())?;
            s.serialize_field("status_code", &self.status.status_code())?;
            s.serialize_field("matched_prefix", &self.matched_prefix)?;
            s.serialize_field("trust_anchor", &roa.map(|r| &r.trust_anchor))?;
            s.serialize_field("max_length", &roa.map(|r| r.max_length))?;
            s.serialize_field("valid_from", &roa.and_then(|r| r.valid_from))?;
            s.serialize_field("valid_until", &roa.and_then(|r| r.valid_until))?;
            s.end()
        }
    }
}
