use std::error::Error;
use std::fmt;

use smallvec::SmallVec;
use tracing::{debug, trace, warn};

use super::alphabet::{Alphabet, Word};
use super::format::{
    write_address, write_trunk, ADDRESSED_CHILDREN, ADDRESS_SIZE, ADDRESS_SPACE,
    NATURAL_CONTINUATION, TRUNK_ENTRY_SIZE,
};
use super::node::TrieNode;
use super::node_arena::{NodeArena, NodeId};
use super::packed::EncodedDawg;
use super::subtrie::SubTrieTable;
use super::MAX_WORD_LENGTH;

/// Tuning knobs for a [`DawgGenerator`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratorOptions {
    /// Maximum size of the encoded buffer in bytes. Clamped to `2^23`, the size of
    /// the address space.
    pub address_limit: usize,
    /// Compare subtree shapes on a structural hash match before sharing them.
    /// Without verification a hash collision merges two different subtrees.
    pub verify_shared_subtries: bool,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        GeneratorOptions {
            address_limit: ADDRESS_SPACE,
            verify_shared_subtries: true,
        }
    }
}

/// Builds an encoded word graph from one or more batches of words.
///
/// Each batch becomes a trunk: an independent entry point into the same buffer.
/// Subtrees that occur more than once, in any trunk, are stored once.
///
/// # Examples
///
/// ```
/// use packdawg::dawg::{Alphabet, DawgGenerator};
///
/// let alphabet = Alphabet::latin();
/// let words = ["bake", "cake", "fake", "lake"];
///
/// let mut generator = DawgGenerator::new(alphabet.clone());
/// generator.add_word_batch(words, false);
/// generator.add_word_batch(words, true);
/// let encoded = generator.generate().unwrap();
///
/// let forward = encoded.trunk(0, &alphabet).unwrap();
/// let backward = encoded.trunk(1, &alphabet).unwrap();
/// assert!(forward.check_word("cake"));
/// assert!(backward.check_word("ekac"));
/// ```
#[derive(Debug)]
pub struct DawgGenerator {
    alphabet: Alphabet,
    options: GeneratorOptions,
    arena: NodeArena,
    subtries: SubTrieTable,
    trunks: Vec<NodeId>,
    starts: Vec<u32>,
}

impl DawgGenerator {
    /// Creates a generator with default options.
    pub fn new(alphabet: Alphabet) -> Self {
        DawgGenerator::with_options(alphabet, GeneratorOptions::default())
    }

    /// Creates a generator with the given options.
    pub fn with_options(alphabet: Alphabet, mut options: GeneratorOptions) -> Self {
        options.address_limit = options.address_limit.min(ADDRESS_SPACE);
        let subtries = SubTrieTable::new(options.verify_shared_subtries);
        DawgGenerator {
            alphabet,
            options,
            arena: NodeArena::new(),
            subtries,
            trunks: Vec::new(),
            starts: Vec::new(),
        }
    }

    /// The alphabet words are encoded with.
    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// Inserts a batch of words as a new trunk and returns the trunk index.
    ///
    /// With `reverse`, the letters of every word are inserted back to front.
    /// Characters missing from the alphabet are skipped, and only the first 16
    /// letters of a word are kept. Words left without letters are ignored.
    pub fn add_word_batch<W: AsRef<str>>(
        &mut self,
        words: impl IntoIterator<Item = W>,
        reverse: bool,
    ) -> usize {
        let trunk = self.trunks.len();
        let root = self.arena.alloc(TrieNode::new(0));
        let mut inserted = 0usize;
        let mut skipped = 0usize;

        for word in words {
            let letters = self.letters(word.as_ref(), reverse);
            if letters.is_empty() {
                skipped += 1;
                continue;
            }
            self.arena.insert_word(root, &letters);
            inserted += 1;
        }
        if skipped > 0 {
            warn!(trunk, skipped, "skipped words without encodable letters");
        }

        let nodes = self.subtries.collect(&mut self.arena, root);
        self.trunks.push(root);
        debug!(trunk, reverse, words = inserted, nodes, "added trunk");
        trunk
    }

    fn letters(&self, word: &str, reverse: bool) -> Word {
        let code = |ch| self.alphabet.code(ch);
        if reverse {
            word.chars().rev().filter_map(code).take(MAX_WORD_LENGTH).collect()
        } else {
            word.chars().filter_map(code).take(MAX_WORD_LENGTH).collect()
        }
    }

    /// Serializes all trunks into one buffer.
    ///
    /// Shared subtrees are placed first, in ascending order of estimated savings,
    /// then the root of every trunk. Generating again after adding more batches
    /// produces a fresh buffer covering all trunks.
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError::NoTrunks`] if no batch was added, and
    /// [`BuilderError::AddressSpaceExceeded`] if the buffer would outgrow the
    /// configured address limit.
    pub fn generate(&mut self) -> Result<EncodedDawg, BuilderError> {
        if self.trunks.is_empty() {
            return Err(BuilderError::NoTrunks);
        }
        self.starts.clear();
        for node in self.arena.iter_mut() {
            node.address = None;
        }
        let order = self.subtries.plan(&mut self.arena);

        let header = self.trunks.len() * TRUNK_ENTRY_SIZE;
        let mut serializer = Serializer {
            arena: &mut self.arena,
            subtries: &self.subtries,
            data: Vec::new(),
            limit: self.options.address_limit,
        };
        serializer.allocate(header)?;

        for &id in &order {
            let record = self.subtries.get(id);
            let address = serializer.add_subtrie(record.node)?;
            trace!(
                address,
                nodes = record.node_count,
                occurrences = record.occurrences.len(),
                "placed shared subtrie"
            );
        }

        let mut starts = Vec::with_capacity(self.trunks.len());
        // Each trunk gets its own root. Only the children resolve to shared subtries.
        for (trunk, &root) in self.trunks.iter().enumerate() {
            let address = serializer.add_subtrie(root)?;
            write_trunk(&mut serializer.data, trunk, address);
            starts.push(address);
        }

        let data = serializer.data;
        debug!(
            trunks = self.trunks.len(),
            shared = order.len(),
            bytes = data.len(),
            "generated word graph"
        );
        self.starts = starts;
        Ok(EncodedDawg::new(data, self.trunks.len()))
    }

    /// True if every character of `word` is part of the alphabet.
    pub fn is_encodable(&self, word: &str) -> bool {
        self.alphabet.is_encodable(word)
    }

    /// True if `word` was inserted into `trunk`, following the raw trie edges.
    pub fn contains_word(&self, word: &str, trunk: usize) -> bool {
        let (Some(&root), Ok(letters)) = (self.trunks.get(trunk), self.alphabet.encode(word))
        else {
            return false;
        };
        self.arena
            .walk(root, &letters)
            .is_some_and(|node| self.arena[node].end_of_word)
    }

    /// True if `word` is reachable in `trunk` when every shared subtree is replaced
    /// by its representative, which is what the encoded graph stores.
    pub fn contains_word_shared(&self, word: &str, trunk: usize) -> bool {
        let (Some(&root), Ok(letters)) = (self.trunks.get(trunk), self.alphabet.encode(word))
        else {
            return false;
        };
        letters
            .iter()
            .try_fold(root, |node, &letter| {
                let child = self.arena[node].children.get(letter)?;
                Some(self.subtries.resolve(&self.arena, child))
            })
            .is_some_and(|node| self.arena[node].end_of_word)
    }

    /// Number of words inserted into `trunk` that start with `prefix`.
    pub fn visit_count(&self, prefix: &str, trunk: usize) -> u32 {
        let (Some(&root), Ok(letters)) = (self.trunks.get(trunk), self.alphabet.encode(prefix))
        else {
            return 0;
        };
        self.arena
            .walk(root, &letters)
            .map_or(0, |node| self.arena[node].visits)
    }

    /// Number of trunks added so far.
    pub fn trunk_count(&self) -> usize {
        self.trunks.len()
    }

    /// Start address of `trunk` in the most recently generated buffer.
    pub fn start_address(&self, trunk: usize) -> Option<u32> {
        self.starts.get(trunk).copied()
    }

    /// Number of trie nodes across all trunks, before sharing.
    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    /// Number of subtree shapes that occur more than once.
    pub fn shared_subtrie_count(&self) -> usize {
        self.subtries.shared_count()
    }
}

/// Writes trie nodes into the output buffer. Lives for one `generate` call.
struct Serializer<'g> {
    arena: &'g mut NodeArena,
    subtries: &'g SubTrieTable,
    data: Vec<u8>,
    limit: usize,
}

impl Serializer<'_> {
    /// Reserves `len` zeroed bytes at the end of the buffer and returns their offset.
    fn allocate(&mut self, len: usize) -> Result<u32, BuilderError> {
        let address = self.data.len();
        let required = address + len;
        if required > self.limit {
            return Err(BuilderError::AddressSpaceExceeded {
                required,
                limit: self.limit,
            });
        }
        self.data.resize(required, 0);
        Ok(address as u32)
    }

    /// Places `node` and everything below it, returning its address. Nodes that are
    /// already placed are not written again.
    fn add_subtrie(&mut self, node: NodeId) -> Result<u32, BuilderError> {
        if let Some(address) = self.arena[node].address {
            return Ok(address);
        }

        let children: SmallVec<[NodeId; 8]> =
            self.arena[node].children.iter().map(|(_, child)| child).collect();
        let reserved = children.len().saturating_sub(1) * ADDRESS_SIZE;
        let address = self.allocate(1 + reserved)?;
        self.arena[node].address = Some(address);

        let mut header = self.arena[node].letter_bits();
        let mut entries: SmallVec<[u32; 8]> = SmallVec::new();
        for (index, &child) in children.iter().enumerate() {
            let target = self.subtries.resolve(&*self.arena, child);
            if index == 0 {
                if self.arena[target].address.is_some() {
                    // Already placed elsewhere: needs an address entry of its own.
                    self.allocate(ADDRESS_SIZE)?;
                } else {
                    self.add_subtrie(target)?;
                    header |= NATURAL_CONTINUATION;
                    continue;
                }
            }
            entries.push(self.add_subtrie(target)?);
        }

        let start = address as usize;
        if !entries.is_empty() {
            header |= ADDRESSED_CHILDREN;
        }
        self.data[start] = header;
        let last = entries.len().saturating_sub(1);
        for (i, &entry) in entries.iter().enumerate() {
            let at = start + 1 + i * ADDRESS_SIZE;
            write_address(&mut self.data[at..at + ADDRESS_SIZE], entry, i == last);
        }
        Ok(address)
    }
}

/// Builds a single forward trunk from `words` and encodes it.
///
/// # Examples
///
/// ```
/// use packdawg::dawg::{build_packed_dawg, Alphabet};
///
/// let alphabet = Alphabet::latin();
/// let encoded = build_packed_dawg(&alphabet, ["apple", "banana", "cherry"]).unwrap();
/// let dawg = encoded.trunk(0, &alphabet).unwrap();
/// assert!(dawg.check_word("banana"));
/// assert!(!dawg.check_word("apricot"));
/// ```
pub fn build_packed_dawg<W: AsRef<str>>(
    alphabet: &Alphabet,
    words: impl IntoIterator<Item = W>,
) -> Result<EncodedDawg, BuilderError> {
    let mut generator = DawgGenerator::new(alphabet.clone());
    generator.add_word_batch(words, false);
    generator.generate()
}

/// Errors that can occur when generating an encoded word graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuilderError {
    /// The encoded graph needs more bytes than addresses can reach.
    AddressSpaceExceeded {
        /// Bytes needed when the limit was hit.
        required: usize,
        /// The configured limit.
        limit: usize,
    },
    /// `generate` was called before any word batch was added.
    NoTrunks,
}

impl fmt::Display for BuilderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuilderError::AddressSpaceExceeded { required, limit } => write!(
                f,
                "encoded graph needs at least {required} bytes, limit is {limit}"
            ),
            BuilderError::NoTrunks => write!(f, "no word batch was added"),
        }
    }
}

impl Error for BuilderError {}
