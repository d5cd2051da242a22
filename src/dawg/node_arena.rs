//! Index arena owning every construction-time trie node.
//!
//! Nodes refer to each other through [`NodeId`]s instead of references, so the
//! builder can mutate any node (placement, sharing marks) while the trie is walked.

use std::ops::{Index, IndexMut};

use super::node::TrieNode;

/// Index of a node in a [`NodeArena`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct NodeId(pub(crate) u32);

/// Growable arena of trie nodes. Nodes are never removed.
#[derive(Debug, Default)]
pub(crate) struct NodeArena {
    nodes: Vec<TrieNode>,
}

impl NodeArena {
    /// Creates an empty arena.
    pub(crate) fn new() -> Self {
        NodeArena { nodes: Vec::new() }
    }

    /// Allocates a node and returns its id.
    pub(crate) fn alloc(&mut self, node: TrieNode) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Inserts the letters of `word` below `root`, creating nodes as needed.
    /// Every node on the path, including `root`, has its visit count bumped.
    pub(crate) fn insert_word(&mut self, root: NodeId, word: &[u8]) {
        let mut current = root;
        self[current].visits += 1;
        for &letter in word {
            current = match self[current].children.get(letter) {
                Some(child) => child,
                None => {
                    let child = self.alloc(TrieNode::new(letter));
                    self[current].children.insert(letter, child);
                    child
                }
            };
            self[current].visits += 1;
        }
        self[current].end_of_word = true;
    }

    /// Follows `word` from `node` along raw trie edges.
    pub(crate) fn walk(&self, node: NodeId, word: &[u8]) -> Option<NodeId> {
        word.iter()
            .try_fold(node, |n, &letter| self[n].children.get(letter))
    }

    /// Returns the number of nodes allocated in this arena.
    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut TrieNode> {
        self.nodes.iter_mut()
    }
}

impl Index<NodeId> for NodeArena {
    type Output = TrieNode;

    #[inline]
    fn index(&self, id: NodeId) -> &TrieNode {
        &self.nodes[id.0 as usize]
    }
}

impl IndexMut<NodeId> for NodeArena {
    #[inline]
    fn index_mut(&mut self, id: NodeId) -> &mut TrieNode {
        &mut self.nodes[id.0 as usize]
    }
}
