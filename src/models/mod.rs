/*!
Data structures shared across the crate: prefixes, ASNs, ROA records, and
validation verdicts.
*/
mod asn;
mod prefix;
mod roa;
mod validity;

pub use asn::*;
pub use prefix::*;
pub use roa::*;
pub use validity::*;
