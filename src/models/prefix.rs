use crate::error::RovError;
use ipnet::{IpNet, Ipv4Net, Ipv6Net};
use std::fmt::{Debug, Display, Formatter};
use std::net::IpAddr;
use std::str::FromStr;

/// An IP network prefix: address family, network address, and prefix length.
///
/// Host bits are truncated at construction, so two textual spellings of the
/// same network compare equal. Covering relations are defined bitwise over
/// the leading `prefix_len` bits and never cross address families.
#[derive(PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub struct IpPrefix {
    net: IpNet,
}

impl IpPrefix {
    pub fn new(net: IpNet) -> IpPrefix {
        IpPrefix { net: net.trunc() }
    }

    /// Length of the prefix in bits.
    pub fn prefix_len(&self) -> u8 {
        self.net.prefix_len()
    }

    /// Address-family bit width: 32 for IPv4, 128 for IPv6.
    pub fn max_prefix_len(&self) -> u8 {
        self.net.max_prefix_len()
    }

    pub fn is_ipv4(&self) -> bool {
        matches!(self.net, IpNet::V4(_))
    }

    /// The (truncated) network address.
    pub fn network(&self) -> IpAddr {
        self.net.addr()
    }

    /// The i-th bit of the network address, 0-indexed from the most
    /// significant bit. `i` must be below [`max_prefix_len`](Self::max_prefix_len).
    pub fn bit(&self, i: u8) -> bool {
        debug_assert!(i < self.max_prefix_len());
        match self.net {
            IpNet::V4(n) => u32::from(n.network()) >> (31 - i) & 1 == 1,
            IpNet::V6(n) => u128::from(n.network()) >> (127 - i) & 1 == 1,
        }
    }

    /// True iff `self` and `other` share the address family, `self` is no
    /// longer than `other`, and the first `self.prefix_len()` bits of both
    /// network addresses match. Every prefix covers itself.
    pub fn covers(&self, other: &IpPrefix) -> bool {
        match (self.net, other.net) {
            (IpNet::V4(a), IpNet::V4(b)) => {
                a.prefix_len() <= b.prefix_len()
                    && match 32 - a.prefix_len() {
                        32 => true,
                        shift => u32::from(a.network()) >> shift == u32::from(b.network()) >> shift,
                    }
            }
            (IpNet::V6(a), IpNet::V6(b)) => {
                a.prefix_len() <= b.prefix_len()
                    && match 128 - a.prefix_len() {
                        128 => true,
                        shift => {
                            u128::from(a.network()) >> shift == u128::from(b.network()) >> shift
                        }
                    }
            }
            _ => false,
        }
    }

    /// The prefix formed by the first `len` bits of this prefix's network
    /// address. `len` must not exceed `prefix_len()`.
    pub(crate) fn ancestor(&self, len: u8) -> IpPrefix {
        debug_assert!(len <= self.prefix_len());
        let net = match self.net {
            IpNet::V4(n) => IpNet::V4(Ipv4Net::new(n.addr(), len).unwrap()),
            IpNet::V6(n) => IpNet::V6(Ipv6Net::new(n.addr(), len).unwrap()),
        };
        IpPrefix::new(net)
    }
}

impl FromStr for IpPrefix {
    type Err = RovError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let net = IpNet::from_str(s.trim())?;
        Ok(IpPrefix::new(net))
    }
}

impl Display for IpPrefix {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.net)
    }
}

impl Debug for IpPrefix {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.net)
    }
}

impl From<IpPrefix> for IpNet {
    fn from(value: IpPrefix) -> Self {
        value.net
    }
}

mod serde_impl {
    use super::*;
    use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

    impl Serialize for IpPrefix {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            serializer.collect_str(self)
        }
    }

    impl<'de> Deserialize<'de> for IpPrefix {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: Deserializer<'de>,
        {
            let s = String::deserialize(deserializer)?;
            s.parse().map_err(de::Error::custom)
        }
    }
}
