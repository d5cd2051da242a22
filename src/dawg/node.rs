use super::children::Children;
use super::format::END_OF_WORD;
use super::subtrie::SubTrieId;

/// A mutable trie node, used only while building. Not part of the encoded format.
#[derive(Clone, Debug, Default)]
pub(crate) struct TrieNode {
    /// 5-bit letter code; 0 for the synthetic root of a trunk.
    pub(crate) letter: u8,
    pub(crate) end_of_word: bool,
    pub(crate) children: Children,
    /// Number of inserted words passing through this node.
    pub(crate) visits: u32,
    /// Structural hash of the subtree; 0 for leaves.
    pub(crate) hash: u64,
    /// Shared subtrie this node belongs to, if it is shared by more than one occurrence.
    pub(crate) subtrie: Option<SubTrieId>,
    /// Offset of this node in the output buffer once placed.
    pub(crate) address: Option<u32>,
}

impl TrieNode {
    pub(crate) fn new(letter: u8) -> Self {
        TrieNode {
            letter,
            ..TrieNode::default()
        }
    }

    /// The node's header byte without the child flags: `letter | end-of-word`.
    #[inline]
    pub(crate) fn letter_bits(&self) -> u8 {
        self.letter | if self.end_of_word { END_OF_WORD } else { 0 }
    }

    #[inline]
    pub(crate) fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}
