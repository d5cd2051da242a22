//! Structural sharing of identical subtrees.
//!
//! Every trie node with children gets a structural hash, computed bottom-up.
//! Nodes with equal hashes (and, when verification is on, equal shape) are grouped
//! into one [`SubTrie`] record; only the record's representative is ever written to
//! the output buffer, and every other occurrence is replaced by a reference to it.

use hashbrown::HashMap;
use smallvec::SmallVec;

use super::node_arena::{NodeArena, NodeId};

/// Multiplier folding each child hash and the node's own header into the running hash.
const HASH_MULTIPLIER: u64 = 256 + 129;

/// Index of a record in a [`SubTrieTable`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct SubTrieId(pub(crate) u32);

/// All occurrences of one subtree shape.
#[derive(Clone, Debug)]
pub(crate) struct SubTrie {
    /// The first occurrence found; the only one that gets serialized.
    pub(crate) node: NodeId,
    /// Number of nodes below the representative.
    pub(crate) node_count: usize,
    /// Every node with this shape, the representative included.
    pub(crate) occurrences: SmallVec<[NodeId; 2]>,
}

impl SubTrie {
    /// True if more than one node has this shape.
    #[inline]
    pub(crate) fn is_shared(&self) -> bool {
        self.occurrences.len() > 1
    }

    /// Estimated number of nodes saved by sharing this subtree.
    #[inline]
    pub(crate) fn savings(&self) -> usize {
        self.node_count * (self.occurrences.len() - 1)
    }
}

/// The dedup table: SubTrie records bucketed by structural hash.
///
/// One table is shared by all trunks of a generator, so a subtree occurring in the
/// forward and in the reversed trunk is stored once.
#[derive(Debug)]
pub(crate) struct SubTrieTable {
    records: Vec<SubTrie>,
    buckets: HashMap<u64, SmallVec<[SubTrieId; 1]>>,
    verify: bool,
}

impl SubTrieTable {
    /// Creates an empty table. With `verify`, subtrees are only merged after a
    /// shape comparison confirms a hash match.
    pub(crate) fn new(verify: bool) -> Self {
        SubTrieTable {
            records: Vec::new(),
            buckets: HashMap::new(),
            verify,
        }
    }

    /// Hashes the trie below `root` and records every node that has children.
    /// Returns the number of nodes in the trie, `root` included.
    pub(crate) fn collect(&mut self, arena: &mut NodeArena, root: NodeId) -> usize {
        self.hash_subtree(arena, root).0
    }

    fn hash_subtree(&mut self, arena: &mut NodeArena, node: NodeId) -> (usize, u64) {
        let children: SmallVec<[NodeId; 8]> =
            arena[node].children.iter().map(|(_, child)| child).collect();

        let mut node_count = 0usize;
        let mut hash = 0u64;
        for (index, &child) in children.iter().enumerate() {
            let (child_count, child_hash) = self.hash_subtree(arena, child);
            node_count += child_count;
            hash = hash.wrapping_mul(HASH_MULTIPLIER)
                ^ child_hash.wrapping_mul((node_count + index) as u64);
        }
        hash = hash.wrapping_mul(HASH_MULTIPLIER) ^ u64::from(arena[node].letter_bits());

        if arena[node].has_children() {
            arena[node].hash = hash;
            let id = self.record(arena, node, hash, node_count);
            arena[node].subtrie = Some(id);
        }
        (node_count + 1, hash)
    }

    fn record(&mut self, arena: &NodeArena, node: NodeId, hash: u64, node_count: usize) -> SubTrieId {
        let bucket = self.buckets.entry(hash).or_default();
        let existing = bucket.iter().copied().find(|id| {
            let representative = self.records[id.0 as usize].node;
            !self.verify || same_shape(arena, representative, node)
        });
        match existing {
            Some(id) => {
                self.records[id.0 as usize].occurrences.push(node);
                id
            }
            None => {
                let id = SubTrieId(self.records.len() as u32);
                bucket.push(id);
                self.records.push(SubTrie {
                    node,
                    node_count,
                    occurrences: SmallVec::from_elem(node, 1),
                });
                id
            }
        }
    }

    /// Marks occurrences of shared subtrees and unmarks singletons, so singletons
    /// serialize inline. Returns the shared records in ascending savings order,
    /// the order in which they are placed.
    pub(crate) fn plan(&self, arena: &mut NodeArena) -> Vec<SubTrieId> {
        let mut shared = Vec::new();
        for (index, record) in self.records.iter().enumerate() {
            let id = SubTrieId(index as u32);
            let mark = record.is_shared().then_some(id);
            for &occurrence in &record.occurrences {
                arena[occurrence].subtrie = mark;
            }
            if record.is_shared() {
                shared.push((id, record.savings()));
            }
        }
        shared.sort_by_key(|&(_, savings)| savings);
        shared.into_iter().map(|(id, _)| id).collect()
    }

    /// Returns the node that is serialized in place of `node`.
    #[inline]
    pub(crate) fn resolve(&self, arena: &NodeArena, node: NodeId) -> NodeId {
        match arena[node].subtrie {
            Some(id) => self.records[id.0 as usize].node,
            None => node,
        }
    }

    #[inline]
    pub(crate) fn get(&self, id: SubTrieId) -> &SubTrie {
        &self.records[id.0 as usize]
    }

    /// Number of records with more than one occurrence.
    pub(crate) fn shared_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_shared()).count()
    }
}

/// True if the subtrees below `a` and `b` are identical.
fn same_shape(arena: &NodeArena, a: NodeId, b: NodeId) -> bool {
    if a == b {
        return true;
    }
    let (na, nb) = (&arena[a], &arena[b]);
    na.hash == nb.hash
        && na.letter_bits() == nb.letter_bits()
        && na.children.len() == nb.children.len()
        && na
            .children
            .iter()
            .zip(nb.children.iter())
            .all(|((la, ca), (lb, cb))| la == lb && same_shape(arena, ca, cb))
}
