use crate::error::RovError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// ASN -- Autonomous System Number
///
/// Input feeds spell ASNs either as bare integers or as `"AS"`-prefixed
/// strings; both forms normalize to this single canonical type at the
/// ingestion boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Asn(u32);

impl Asn {
    pub const fn new(asn: u32) -> Self {
        Asn(asn)
    }

    pub const fn as_u32(&self) -> u32 {
        self.0
    }

    /// Checks if the ASN falls in a range that must never originate routes
    /// on the public internet. Queries for such origins are answered with
    /// [`ReservedAsn`](crate::RoaValidity::ReservedAsn) before any ROA
    /// lookup happens.
    ///
    /// Covered ranges:
    ///  - 64496..=65551: documentation (RFC5398), private use (RFC6996),
    ///    last 16-bit ASN (RFC7300)
    ///  - 4200000000..=4294967295: private use (RFC6996), last 32-bit ASN
    ///    (RFC7300)
    ///
    /// <https://datatracker.ietf.org/doc/rfc7249/>
    pub const fn is_reserved(&self) -> bool {
        matches!(self.0, 64496..=65551 | 4200000000..=4294967295)
    }
}

impl FromStr for Asn {
    type Err = RovError;

    /// Accepts a bare integer (`"64496"`) or the marker form (`"AS64496"`,
    /// case-insensitive). Anything else is rejected rather than coerced.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let digits = match s.get(..2) {
            Some(marker) if marker.eq_ignore_ascii_case("as") => &s[2..],
            _ => s,
        };
        digits
            .parse::<u32>()
            .map(Asn)
            .map_err(|_| RovError::ParseError(format!("invalid ASN '{s}'")))
    }
}

impl From<u32> for Asn {
    fn from(v: u32) -> Self {
        Asn(v)
    }
}

impl From<Asn> for u32 {
    fn from(value: Asn) -> Self {
        value.0
    }
}

impl PartialEq<u32> for Asn {
    fn eq(&self, other: &u32) -> bool {
        self.0 == *other
    }
}

impl Display for Asn {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for Asn {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u32(self.0)
    }
}

impl<'de> Deserialize<'de> for Asn {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum AsnRepr {
            Int(u32),
            Str(String),
        }

        match AsnRepr::deserialize(deserializer)? {
            AsnRepr::Int(v) => Ok(Asn(v)),
            AsnRepr::Str(s) => s.parse().map_err(serde::de::Error::custom),
        }
    }
}
