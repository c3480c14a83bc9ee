/*!
Binary prefix trie indexing ROA records by network prefix.

One trie holds both address families behind separate roots. Inserts and
covering-prefix walks touch at most one node per prefix bit (32 for IPv4,
128 for IPv6), independent of how many records are stored, which is what
keeps point queries cheap against multi-hundred-thousand-ROA feeds.

The trie is built once per load cycle and is read-only afterwards; an
immutable trie is safe to share across threads (see [`crate::Rov`] for the
snapshot-swap reload pattern).
*/
use crate::error::RovError;
use crate::models::{Asn, IpPrefix, RoaRecord};
use ipnet::{IpNet, Ipv4Net, Ipv6Net};
use std::net::{Ipv4Addr, Ipv6Addr};

/// One trie position: the prefix it stands for, up to two children (bit 0 /
/// bit 1), and the per-origin record buckets attached to that exact prefix.
///
/// Buckets keep insertion order, both across origins and across records of
/// one origin, so evidence selection during validation is reproducible.
#[derive(Debug, Clone)]
pub struct TrieNode {
    prefix: IpPrefix,
    children: [Option<Box<TrieNode>>; 2],
    buckets: Vec<(Asn, Vec<RoaRecord>)>,
}

impl TrieNode {
    fn new(prefix: IpPrefix) -> TrieNode {
        TrieNode {
            prefix,
            children: [None, None],
            buckets: Vec::new(),
        }
    }

    /// The prefix this node indexes.
    pub fn prefix(&self) -> &IpPrefix {
        &self.prefix
    }

    /// Whether any ROA record is attached to this exact prefix.
    pub fn has_roas(&self) -> bool {
        !self.buckets.is_empty()
    }

    /// Origins with at least one record here, in insertion order.
    pub fn origins(&self) -> impl Iterator<Item = Asn> + '_ {
        self.buckets.iter().map(|(origin, _)| *origin)
    }

    /// Records authorized for `origin` at this prefix, in insertion order.
    pub fn records(&self, origin: Asn) -> Option<&[RoaRecord]> {
        self.buckets
            .iter()
            .find(|(bucket_origin, _)| *bucket_origin == origin)
            .map(|(_, records)| records.as_slice())
    }

    /// First record of the first origin bucket. Used as illustrative
    /// evidence when no bucket matches the queried origin.
    pub fn first_record(&self) -> Option<&RoaRecord> {
        self.buckets
            .first()
            .and_then(|(_, records)| records.first())
    }

    fn bucket_mut(&mut self, origin: Asn) -> &mut Vec<RoaRecord> {
        match self
            .buckets
            .iter()
            .position(|(bucket_origin, _)| *bucket_origin == origin)
        {
            Some(idx) => &mut self.buckets[idx].1,
            None => {
                self.buckets.push((origin, Vec::new()));
                &mut self.buckets.last_mut().expect("just pushed").1
            }
        }
    }
}

/// Prefix trie over IPv4 and IPv6 ROA data.
///
/// There is never more than one node per distinct prefix: inserting a second
/// record for an existing prefix appends to that node's buckets.
#[derive(Debug, Clone)]
pub struct PrefixTrie {
    root_v4: TrieNode,
    root_v6: TrieNode,
    record_count: usize,
}

impl Default for PrefixTrie {
    fn default() -> Self {
        Self::new()
    }
}

impl PrefixTrie {
    pub fn new() -> PrefixTrie {
        // zero-length roots cannot fail to construct
        let v4 = Ipv4Net::new(Ipv4Addr::UNSPECIFIED, 0).expect("0.0.0.0/0");
        let v6 = Ipv6Net::new(Ipv6Addr::UNSPECIFIED, 0).expect("::/0");
        PrefixTrie {
            root_v4: TrieNode::new(IpPrefix::new(IpNet::V4(v4))),
            root_v6: TrieNode::new(IpPrefix::new(IpNet::V6(v6))),
            record_count: 0,
        }
    }

    /// Insert `record` under `(prefix, origin)`, creating intermediate
    /// branching nodes as needed.
    ///
    /// A record whose `max_length` is shorter than the prefix itself is
    /// rejected with [`RovError::RejectedRecord`]; loaders log and skip such
    /// records without failing the batch.
    pub fn insert(
        &mut self,
        prefix: IpPrefix,
        origin: Asn,
        record: RoaRecord,
    ) -> Result<(), RovError> {
        if record.max_length < prefix.prefix_len() {
            return Err(RovError::RejectedRecord {
                prefix: prefix.to_string(),
                max_length: record.max_length,
            });
        }

        let mut node = self.root_mut(&prefix);
        for depth in 0..prefix.prefix_len() {
            let bit = prefix.bit(depth) as usize;
            node = node.children[bit]
                .get_or_insert_with(|| Box::new(TrieNode::new(prefix.ancestor(depth + 1))));
        }
        node.bucket_mut(origin).push(record);
        self.record_count += 1;
        Ok(())
    }

    /// Walk the bit path of `prefix` from the root, yielding every stored
    /// node whose prefix covers it, least specific first. A node exactly
    /// matching `prefix` comes last. The walk is lazy and each call returns
    /// an independent, restartable iterator.
    pub fn covering_nodes(&self, prefix: &IpPrefix) -> CoveringNodes<'_> {
        CoveringNodes {
            node: Some(self.root(prefix)),
            prefix: *prefix,
            depth: 0,
        }
    }

    /// Number of ROA records stored across both families.
    pub fn record_count(&self) -> usize {
        self.record_count
    }

    pub fn is_empty(&self) -> bool {
        self.record_count == 0
    }

    fn root(&self, prefix: &IpPrefix) -> &TrieNode {
        if prefix.is_ipv4() {
            &self.root_v4
        } else {
            &self.root_v6
        }
    }

    fn root_mut(&mut self, prefix: &IpPrefix) -> &mut TrieNode {
        if prefix.is_ipv4() {
            &mut self.root_v4
        } else {
            &mut self.root_v6
        }
    }
}

/// Lazy walk over the covering nodes of one prefix, least specific first.
pub struct CoveringNodes<'a> {
    node: Option<&'a TrieNode>,
    prefix: IpPrefix,
    depth: u8,
}

impl<'a> Iterator for CoveringNodes<'a> {
    type Item = &'a TrieNode;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.node {
            // advance before yielding so the next call resumes below
            self.node = if self.depth < self.prefix.prefix_len() {
                let bit = self.prefix.bit(self.depth) as usize;
                self.depth += 1;
                node.children[bit].as_deref()
            } else {
                None
            };
            if node.has_roas() {
                return Some(node);
            }
        }
        None
    }
}
