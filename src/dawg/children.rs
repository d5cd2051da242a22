use super::node_arena::NodeId;

/// The children of a trie node, kept sorted by letter code. Doesn't allocate until
/// there are at least three children.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) enum Children {
    /// No children.
    #[default]
    None,
    /// Exactly one child (letter, node).
    One((u8, NodeId)),
    /// Exactly two children (letter1, node1, letter2, node2), `letter1 < letter2`.
    Two((u8, NodeId, u8, NodeId)),
    /// Three or more children stored in a vector.
    Many(Vec<(u8, NodeId)>),
}

impl Children {
    /// Gets the child at the specified index.
    #[inline]
    pub(crate) fn get_index(&self, index: usize) -> Option<(u8, NodeId)> {
        match self {
            Children::None => None,
            Children::One(child) => (index == 0).then_some(*child),
            Children::Two((c1, n1, c2, n2)) => match index {
                0 => Some((*c1, *n1)),
                1 => Some((*c2, *n2)),
                _ => None,
            },
            Children::Many(children) => children.get(index).copied(),
        }
    }

    /// Returns the child reached by `letter`.
    #[inline]
    pub(crate) fn get(&self, letter: u8) -> Option<NodeId> {
        match self {
            Children::None => None,
            Children::One((ch, node)) => (*ch == letter).then_some(*node),
            Children::Two((c1, n1, c2, n2)) => {
                if letter == *c1 {
                    Some(*n1)
                } else if letter == *c2 {
                    Some(*n2)
                } else {
                    None
                }
            }
            Children::Many(children) => children
                .binary_search_by_key(&letter, |&(ch, _)| ch)
                .ok()
                .map(|i| children[i].1),
        }
    }

    /// Inserts a child in sorted position. The letter must not be present yet.
    pub(crate) fn insert(&mut self, letter: u8, child: NodeId) {
        debug_assert!(self.get(letter).is_none(), "insert: letter already exists");
        *self = match std::mem::take(self) {
            Children::None => Children::One((letter, child)),
            Children::One((c1, n1)) => {
                if letter < c1 {
                    Children::Two((letter, child, c1, n1))
                } else {
                    Children::Two((c1, n1, letter, child))
                }
            }
            Children::Two((c1, n1, c2, n2)) => {
                let mut v = vec![(c1, n1), (c2, n2), (letter, child)];
                v.sort_unstable_by_key(|&(c, _)| c);
                Children::Many(v)
            }
            Children::Many(mut children) => {
                let pos = children.partition_point(|&(c, _)| c < letter);
                children.insert(pos, (letter, child));
                Children::Many(children)
            }
        };
    }

    /// Returns the number of children.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        match self {
            Children::None => 0,
            Children::One(_) => 1,
            Children::Two(_) => 2,
            Children::Many(children) => children.len(),
        }
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        matches!(self, Children::None)
    }

    /// Returns an iterator over `(letter, child)` pairs in letter order.
    #[inline]
    pub(crate) fn iter(&self) -> ChildIter<'_> {
        ChildIter {
            children: self,
            index: 0,
        }
    }
}

/// An iterator over the children of a trie node.
#[derive(Clone)]
pub(crate) struct ChildIter<'c> {
    children: &'c Children,
    index: usize,
}

impl Iterator for ChildIter<'_> {
    type Item = (u8, NodeId);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let next_child = self.children.get_index(self.index)?;
        self.index += 1;
        Some(next_child)
    }

    /// Since we know the exact size, we can do better than the default implementation.
    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.children.len().saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ChildIter<'_> {}
