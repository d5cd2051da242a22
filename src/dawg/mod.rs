/// Mapping between characters and 5-bit letter codes.
pub mod alphabet;
/// Generator turning word batches into an encoded graph.
pub mod builder;
/// Compact child lists of construction-time trie nodes.
pub(crate) mod children;
/// Constants and address codec of the encoded format.
pub mod format;
/// Branch-free membership tests on letters packed into 5-bit lanes.
pub mod lanes;
/// Construction-time trie node.
pub(crate) mod node;
/// Index arena holding construction-time trie nodes.
pub(crate) mod node_arena;
/// Queries against an encoded graph.
pub mod packed;
/// Injectable randomness for random word sampling.
pub mod random;
/// Structural hashing and sharing of identical subtrees.
pub(crate) mod subtrie;

/// Words are truncated to this many letters when inserted; it also bounds the
/// depth of every traversal.
pub const MAX_WORD_LENGTH: usize = 16;

pub use alphabet::{Alphabet, AlphabetError, Word, WILDCARD_CODE};
pub use builder::{build_packed_dawg, BuilderError, DawgGenerator, GeneratorOptions};
pub use packed::{DawgError, EncodedDawg, PackedChildren, PackedDawg, PackedNode};
pub use random::RandomSource;
