//! Queries answered directly against an encoded word graph.
//!
//! Nothing is decoded back into a tree: every operation walks the packed bytes.
//! The buffer is never mutated, so a [`PackedDawg`] can be shared freely between
//! threads.

use std::error::Error;
use std::fmt;

use smallvec::SmallVec;

use super::alphabet::{Alphabet, AlphabetError, Word, LETTER_CODES};
use super::format::{
    read_address, read_trunk, ADDRESSED_CHILDREN, ADDRESS_SIZE, END_OF_WORD, LETTER_BITS,
    NATURAL_CONTINUATION, TRUNK_ENTRY_SIZE,
};
use super::lanes::{LetterLanes, LANES};
use super::random::RandomSource;
use super::MAX_WORD_LENGTH;

/// Maximum selection size for rack queries: one elimination bit per tile.
pub const MAX_RACK_SIZE: usize = u32::BITS as usize;

/// An encoded word graph: the trunk directory followed by the packed nodes.
///
/// This is the artifact a [`DawgGenerator`](super::DawgGenerator) produces. The
/// bytes may be stored and loaded again verbatim.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedDawg {
    data: Vec<u8>,
    trunk_count: usize,
}

impl EncodedDawg {
    pub(crate) fn new(data: Vec<u8>, trunk_count: usize) -> Self {
        EncodedDawg { data, trunk_count }
    }

    /// Wraps bytes loaded from storage, checking the directory of `trunk_count` trunks.
    pub fn from_bytes(data: Vec<u8>, trunk_count: usize) -> Result<Self, DawgError> {
        for trunk in 0..trunk_count {
            start_of(&data, trunk)?;
        }
        Ok(EncodedDawg { data, trunk_count })
    }

    /// Opens `trunk` for querying.
    pub fn trunk<'a>(
        &'a self,
        trunk: usize,
        alphabet: &'a Alphabet,
    ) -> Result<PackedDawg<'a>, DawgError> {
        if trunk >= self.trunk_count {
            return Err(DawgError::NoSuchTrunk {
                trunk,
                trunk_count: self.trunk_count,
            });
        }
        PackedDawg::new(&self.data, alphabet, trunk)
    }

    /// Start address of `trunk`.
    pub fn start_address(&self, trunk: usize) -> Option<u32> {
        if trunk >= self.trunk_count {
            return None;
        }
        read_trunk(&self.data, trunk).map(|address| address as u32)
    }

    /// Number of trunks in the directory.
    pub fn trunk_count(&self) -> usize {
        self.trunk_count
    }

    /// The encoded bytes, directory included.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Consumes the graph, returning its bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Size of the encoded graph in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True if the buffer holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl AsRef<[u8]> for EncodedDawg {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

/// Reads and checks the start address of `trunk`. The root must lie inside the
/// buffer and past the trunk's own directory slot.
fn start_of(data: &[u8], trunk: usize) -> Result<usize, DawgError> {
    let directory_end = trunk.saturating_add(1).saturating_mul(TRUNK_ENTRY_SIZE);
    read_trunk(data, trunk)
        .filter(|&start| start >= directory_end && start < data.len())
        .ok_or(DawgError::TrunkOutOfRange {
            trunk,
            len: data.len(),
        })
}

/// One trunk of an encoded word graph, ready for queries.
///
/// # Examples
///
/// ```
/// use packdawg::dawg::{build_packed_dawg, Alphabet, PackedDawg};
///
/// let alphabet = Alphabet::latin();
/// let encoded = build_packed_dawg(&alphabet, ["tea", "eat", "ate", "tee"]).unwrap();
/// let dawg = PackedDawg::new(encoded.as_bytes(), &alphabet, 0).unwrap();
///
/// assert!(dawg.check_word("eat"));
/// assert_eq!(dawg.possible_words_count("aet").unwrap(), 4);
/// assert_eq!(dawg.possible_words_count_with_elimination("aet", 0).unwrap(), 3);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct PackedDawg<'a> {
    data: &'a [u8],
    alphabet: &'a Alphabet,
    start: usize,
}

impl<'a> PackedDawg<'a> {
    /// Opens trunk `trunk` of the encoded graph in `data`.
    ///
    /// The raw bytes do not record how many trunks they hold, so only the
    /// directory slot and the start address are checked here;
    /// [`EncodedDawg::trunk`] checks the index against the trunk count.
    pub fn new(data: &'a [u8], alphabet: &'a Alphabet, trunk: usize) -> Result<Self, DawgError> {
        let start = start_of(data, trunk)?;
        Ok(PackedDawg {
            data,
            alphabet,
            start,
        })
    }

    /// The trunk's root. Its own letter is meaningless.
    #[inline]
    pub fn root(&self) -> PackedNode<'a> {
        PackedNode {
            data: self.data,
            address: self.start,
        }
    }

    /// The alphabet queries are encoded with.
    pub fn alphabet(&self) -> &'a Alphabet {
        self.alphabet
    }

    /// True if `word` is in this trunk. Unmapped characters never match.
    pub fn check_word(&self, word: &str) -> bool {
        self.alphabet
            .encode(word)
            .is_ok_and(|codes| self.check_codes(&codes))
    }

    /// True if the letter codes spell a word of this trunk.
    pub fn check_codes(&self, codes: &[u8]) -> bool {
        !codes.is_empty() && self.root().walk(codes).is_some_and(|node| node.is_word())
    }

    /// True if some word of this trunk starts with `prefix`.
    pub fn has_prefix(&self, prefix: &str) -> bool {
        self.alphabet
            .encode(prefix)
            .is_ok_and(|codes| self.root().walk(&codes).is_some())
    }

    /// Every word spelled only with letters from `selection`, each letter reusable
    /// any number of times.
    pub fn possible_words(&self, selection: &str) -> Result<Vec<Word>, DawgError> {
        let selection = self.alphabet.encode(selection)?;
        let mut words = Vec::new();
        self.collect_from_root(&|letter| selection.contains(&letter), &mut words);
        Ok(words)
    }

    /// Number of words [`possible_words`](Self::possible_words) would return.
    pub fn possible_words_count(&self, selection: &str) -> Result<usize, DawgError> {
        let selection = self.alphabet.encode(selection)?;
        Ok(self.count_from_root(&|letter| selection.contains(&letter)))
    }

    /// Same as [`possible_words_count`](Self::possible_words_count) for at most 12
    /// letters, testing membership with packed lanes in constant time per node.
    pub fn possible_words_count_fast(&self, selection: &str) -> Result<usize, DawgError> {
        let lanes = self.lanes(selection)?;
        #[cfg(target_pointer_width = "64")]
        let count = self.count_from_root(&|letter| lanes.contains(letter));
        #[cfg(not(target_pointer_width = "64"))]
        let count = {
            let lanes = lanes.narrow();
            self.count_from_root(&|letter| lanes.contains(letter))
        };
        Ok(count)
    }

    /// The 32-bit variant of [`possible_words_count_fast`](Self::possible_words_count_fast),
    /// whatever the target.
    pub fn possible_words_count_fast_narrow(&self, selection: &str) -> Result<usize, DawgError> {
        let lanes = self.lanes(selection)?.narrow();
        Ok(self.count_from_root(&|letter| lanes.contains(letter)))
    }

    fn lanes(&self, selection: &str) -> Result<LetterLanes, DawgError> {
        let selection = self.alphabet.encode(selection)?;
        LetterLanes::pack(&selection).ok_or(DawgError::SelectionTooLong {
            len: selection.len(),
            max: LANES,
        })
    }

    /// Number of words of at least `minimum_length` letters that can be laid out
    /// with the tiles in `selection`, each tile used at most once per word.
    pub fn possible_words_count_with_elimination(
        &self,
        selection: &str,
        minimum_length: usize,
    ) -> Result<usize, DawgError> {
        let selection = self.alphabet.encode(selection)?;
        if selection.len() > MAX_RACK_SIZE {
            return Err(DawgError::SelectionTooLong {
                len: selection.len(),
                max: MAX_RACK_SIZE,
            });
        }
        Ok(self
            .root()
            .children()
            .map(|child| self.count_eliminating(child, &selection, 0, 1, minimum_length))
            .sum())
    }

    /// Words matching `pattern` position by position, where `' '` matches any letter.
    /// See [`possible_words_pattern`](Self::possible_words_pattern).
    pub fn possible_words_wildcard(
        &self,
        pattern: &str,
        minimum_length: usize,
    ) -> Result<Vec<Word>, DawgError> {
        self.possible_words_pattern(pattern, ' ', minimum_length)
    }

    /// Words with `minimum_length..=pattern length` letters whose letters equal
    /// the pattern's at every position that isn't `wildcard`.
    pub fn possible_words_pattern(
        &self,
        pattern: &str,
        wildcard: char,
        minimum_length: usize,
    ) -> Result<Vec<Word>, DawgError> {
        let pattern = pattern
            .chars()
            .map(|ch| match ch {
                ch if ch == wildcard => Ok(None),
                ch => self.alphabet.code(ch).map(Some).ok_or(AlphabetError::UnknownLetter(ch)),
            })
            .collect::<Result<SmallVec<[Option<u8>; MAX_WORD_LENGTH]>, _>>()?;

        let mut words = Vec::new();
        let mut path = Word::new();
        for child in self.root().children() {
            self.collect_pattern(child, &pattern, minimum_length, &mut path, &mut words);
        }
        Ok(words)
    }

    /// Number of words in this trunk.
    pub fn word_count(&self) -> usize {
        self.count_from_root(&|letter| letter < LETTER_CODES)
    }

    /// Every word in this trunk, in graph order.
    pub fn words(&self) -> Vec<Word> {
        let mut words = Vec::new();
        self.collect_from_root(&|letter| letter < LETTER_CODES, &mut words);
        words
    }

    /// Walks from the root picking a uniformly random child at every step, stopping
    /// with probability one half at every word end. Longer words are favored.
    pub fn random_word(&self, rng: &mut impl RandomSource) -> String {
        let mut node = self.root();
        let mut word = Word::new();
        while word.len() < MAX_WORD_LENGTH {
            let children: SmallVec<[PackedNode<'a>; 32]> = node.children().collect();
            if children.is_empty() {
                break;
            }
            node = children[rng.uniform(children.len())];
            word.push(node.letter());
            if node.is_word() && rng.uniform(2) == 0 {
                break;
            }
        }
        self.alphabet.decode(&word)
    }

    /// Decodes a query result into a string.
    pub fn solution_to_word(&self, solution: &[u8]) -> String {
        self.alphabet.decode(solution)
    }

    fn count_from_root(&self, contains: &impl Fn(u8) -> bool) -> usize {
        self.root()
            .children()
            .map(|child| count_matching(child, contains, 1))
            .sum()
    }

    fn collect_from_root(&self, contains: &impl Fn(u8) -> bool, words: &mut Vec<Word>) {
        let mut path = Word::new();
        for child in self.root().children() {
            collect_matching(child, contains, &mut path, words);
        }
    }

    fn count_eliminating(
        &self,
        node: PackedNode<'a>,
        selection: &[u8],
        used: u32,
        depth: usize,
        minimum_length: usize,
    ) -> usize {
        let letter = node.letter();
        let Some(slot) = (0..selection.len())
            .find(|&slot| used & (1 << slot) == 0 && selection[slot] == letter)
        else {
            return 0;
        };
        let used = used | 1 << slot;

        let mut count = usize::from(depth >= minimum_length && node.is_word());
        if depth < MAX_WORD_LENGTH {
            for child in node.children() {
                count += self.count_eliminating(child, selection, used, depth + 1, minimum_length);
            }
        }
        count
    }

    fn collect_pattern(
        &self,
        node: PackedNode<'a>,
        pattern: &[Option<u8>],
        minimum_length: usize,
        path: &mut Word,
        words: &mut Vec<Word>,
    ) {
        let Some(&required) = pattern.get(path.len()) else {
            return;
        };
        let letter = node.letter();
        if required.is_some_and(|required| required != letter) {
            return;
        }

        path.push(letter);
        if path.len() >= minimum_length && node.is_word() {
            words.push(path.clone());
        }
        if path.len() < MAX_WORD_LENGTH {
            for child in node.children() {
                self.collect_pattern(child, pattern, minimum_length, path, words);
            }
        }
        path.pop();
    }
}

fn count_matching(node: PackedNode<'_>, contains: &impl Fn(u8) -> bool, depth: usize) -> usize {
    if !contains(node.letter()) {
        return 0;
    }
    let mut count = usize::from(node.is_word());
    if depth < MAX_WORD_LENGTH {
        for child in node.children() {
            count += count_matching(child, contains, depth + 1);
        }
    }
    count
}

fn collect_matching(
    node: PackedNode<'_>,
    contains: &impl Fn(u8) -> bool,
    path: &mut Word,
    words: &mut Vec<Word>,
) {
    let letter = node.letter();
    if !contains(letter) {
        return;
    }
    path.push(letter);
    if node.is_word() {
        words.push(path.clone());
    }
    if path.len() < MAX_WORD_LENGTH {
        for child in node.children() {
            collect_matching(child, contains, path, words);
        }
    }
    path.pop();
}

/// A node of an encoded word graph: a position in the buffer.
#[derive(Clone, Copy, Debug)]
pub struct PackedNode<'a> {
    data: &'a [u8],
    address: usize,
}

impl<'a> PackedNode<'a> {
    /// The node's header byte. Reads outside the buffer yield an empty header.
    #[inline]
    fn header(&self) -> u8 {
        self.data.get(self.address).copied().unwrap_or(0)
    }

    /// Offset of the node in the buffer.
    #[inline]
    pub fn address(&self) -> usize {
        self.address
    }

    /// The node's letter code.
    #[inline]
    pub fn letter(&self) -> u8 {
        self.header() & LETTER_BITS
    }

    /// True if this node corresponds to the end of a word.
    #[inline]
    pub fn is_word(&self) -> bool {
        self.header() & END_OF_WORD != 0
    }

    /// Returns the child reached by `letter`.
    #[inline]
    pub fn get(&self, letter: u8) -> Option<PackedNode<'a>> {
        self.children().find(|child| child.letter() == letter)
    }

    /// Follows `letters` down from this node.
    #[inline]
    pub fn walk(&self, letters: &[u8]) -> Option<PackedNode<'a>> {
        letters.iter().try_fold(*self, |node, &letter| node.get(letter))
    }

    /// Returns an iterator over the children: addressed children first, then the
    /// natural continuation.
    #[inline]
    pub fn children(&self) -> PackedChildren<'a> {
        let header = self.header();
        PackedChildren {
            data: self.data,
            cursor: self.address + 1,
            addressed: header & ADDRESSED_CHILDREN != 0,
            natural: header & NATURAL_CONTINUATION != 0,
        }
    }
}

// Two handles are the same node if they point at the same place of the same buffer.
impl PartialEq for PackedNode<'_> {
    fn eq(&self, rhs: &Self) -> bool {
        std::ptr::eq(self.data, rhs.data) && self.address == rhs.address
    }
}

impl Eq for PackedNode<'_> {}

/// An iterator over the children of a [`PackedNode`].
#[derive(Clone, Debug)]
pub struct PackedChildren<'a> {
    data: &'a [u8],
    cursor: usize,
    addressed: bool,
    natural: bool,
}

impl<'a> Iterator for PackedChildren<'a> {
    type Item = PackedNode<'a>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.addressed {
            let Some(entry) = self.data.get(self.cursor..self.cursor + ADDRESS_SIZE) else {
                self.addressed = false;
                self.natural = false;
                return None;
            };
            let (address, last) = read_address(entry);
            self.cursor += ADDRESS_SIZE;
            self.addressed = !last;
            return Some(PackedNode {
                data: self.data,
                address,
            });
        }
        if self.natural {
            self.natural = false;
            return Some(PackedNode {
                data: self.data,
                address: self.cursor,
            });
        }
        None
    }
}

/// Errors returned by queries on an encoded word graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DawgError {
    /// The trunk index has no valid entry in the buffer's directory.
    TrunkOutOfRange {
        /// The requested trunk.
        trunk: usize,
        /// Size of the buffer in bytes.
        len: usize,
    },
    /// The trunk index is not below the graph's trunk count.
    NoSuchTrunk {
        /// The requested trunk.
        trunk: usize,
        /// Trunks in the graph.
        trunk_count: usize,
    },
    /// A query string could not be encoded.
    Alphabet(AlphabetError),
    /// The selection holds more letters than the query supports.
    SelectionTooLong {
        /// Letters in the selection.
        len: usize,
        /// Letters supported.
        max: usize,
    },
}

impl From<AlphabetError> for DawgError {
    fn from(err: AlphabetError) -> Self {
        DawgError::Alphabet(err)
    }
}

impl fmt::Display for DawgError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DawgError::TrunkOutOfRange { trunk, len } => {
                write!(f, "trunk {trunk} out of range for a {len} byte graph")
            }
            DawgError::NoSuchTrunk { trunk, trunk_count } => {
                write!(f, "trunk {trunk} out of range for a graph of {trunk_count} trunks")
            }
            DawgError::Alphabet(err) => err.fmt(f),
            DawgError::SelectionTooLong { len, max } => {
                write!(f, "selection of {len} letters exceeds the maximum of {max}")
            }
        }
    }
}

impl Error for DawgError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            DawgError::Alphabet(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::dawg::builder::{build_packed_dawg, DawgGenerator};
    use itertools::Itertools;

    const WORDS: [&str; 24] = [
        "art", "rat", "tar", "tart", "start", "star", "stare", "rate", "tear", "treat", "eat",
        "tea", "ate", "oat", "toe", "tree", "sea", "seat", "east", "hen", "he", "hetman",
        "herman", "heathen",
    ];

    fn encoded() -> (Alphabet, EncodedDawg) {
        let alphabet = Alphabet::latin();
        let encoded = build_packed_dawg(&alphabet, WORDS).unwrap();
        (alphabet, encoded)
    }

    fn letter_counts(word: &str) -> [usize; 26] {
        let mut counts = [0; 26];
        for b in word.bytes() {
            counts[(b - b'a') as usize] += 1;
        }
        counts
    }

    fn set_matches(selection: &str) -> Vec<&'static str> {
        WORDS
            .iter()
            .copied()
            .filter(|w| w.chars().all(|c| selection.contains(c)))
            .sorted()
            .collect()
    }

    fn rack_matches(selection: &str, minimum_length: usize) -> Vec<&'static str> {
        let rack = letter_counts(selection);
        WORDS
            .iter()
            .copied()
            .filter(|w| w.len() >= minimum_length)
            .filter(|w| letter_counts(w).iter().zip(rack).all(|(&need, have)| need <= have))
            .sorted()
            .collect()
    }

    fn decode_all(dawg: &PackedDawg<'_>, words: &[Word]) -> Vec<String> {
        words.iter().map(|w| dawg.solution_to_word(w)).sorted().collect()
    }

    #[test]
    fn all_words() {
        let (alphabet, encoded) = encoded();
        let dawg = encoded.trunk(0, &alphabet).unwrap();
        for word in WORDS {
            assert!(dawg.check_word(word), "{word}");
        }
        for word in ["superfalse", "aaaaaaa", "rtwerdvs", "a", "b", "", "tre", "hetmans"] {
            assert!(!dawg.check_word(word), "{word}");
        }
        assert!(!dawg.check_word("t-e-a"));
    }

    #[test]
    fn prefixes() {
        let (alphabet, encoded) = encoded();
        let dawg = encoded.trunk(0, &alphabet).unwrap();
        assert!(dawg.has_prefix("het"));
        assert!(dawg.has_prefix("star"));
        assert!(dawg.has_prefix(""));
        assert!(!dawg.has_prefix("hx"));
    }

    #[test]
    fn enumeration_yields_the_word_list() {
        let (alphabet, encoded) = encoded();
        let dawg = encoded.trunk(0, &alphabet).unwrap();
        let expected: Vec<&str> = WORDS.iter().copied().sorted().collect();
        assert_eq!(decode_all(&dawg, &dawg.words()), expected);
        assert_eq!(dawg.word_count(), WORDS.len());
    }

    #[test]
    fn letter_set_queries() {
        let (alphabet, encoded) = encoded();
        let dawg = encoded.trunk(0, &alphabet).unwrap();
        for selection in ["aeort", "aeortms", "st", "", "heatmnr", "z"] {
            let expected = set_matches(selection);
            let words = dawg.possible_words(selection).unwrap();
            assert_eq!(decode_all(&dawg, &words), expected, "{selection}");
            assert_eq!(dawg.possible_words_count(selection).unwrap(), expected.len());
            assert_eq!(dawg.possible_words_count_fast(selection).unwrap(), expected.len());
            assert_eq!(
                dawg.possible_words_count_fast_narrow(selection).unwrap(),
                expected.len()
            );
        }
    }

    #[test]
    fn elimination_respects_tile_counts() {
        let (alphabet, encoded) = encoded();
        let dawg = encoded.trunk(0, &alphabet).unwrap();

        let unlimited = dawg.possible_words_count("aeort").unwrap();
        let rack = dawg.possible_words_count_with_elimination("aeort", 0).unwrap();
        // "tart", "treat" and "tree" need a second "t" or "e".
        assert_eq!(rack, rack_matches("aeort", 0).len());
        assert_eq!(unlimited, rack + 3);

        for (selection, minimum_length) in [("aeortt", 0), ("aeortt", 4), ("ttaer", 5), ("eert", 0)] {
            assert_eq!(
                dawg.possible_words_count_with_elimination(selection, minimum_length)
                    .unwrap(),
                rack_matches(selection, minimum_length).len(),
                "{selection} {minimum_length}"
            );
        }
    }

    #[test]
    fn wildcard_patterns() {
        let (alphabet, encoded) = encoded();
        let dawg = encoded.trunk(0, &alphabet).unwrap();

        let words = dawg.possible_words_wildcard("he  an", 6).unwrap();
        assert_eq!(decode_all(&dawg, &words), ["herman", "hetman"]);

        let words = dawg.possible_words_wildcard("he  an", 2).unwrap();
        assert_eq!(decode_all(&dawg, &words), ["he", "hen", "herman", "hetman"]);

        let words = dawg.possible_words_wildcard("      ", 6).unwrap();
        assert_eq!(decode_all(&dawg, &words), ["herman", "hetman"]);

        let words = dawg.possible_words_pattern("s**r*", '*', 4).unwrap();
        assert_eq!(decode_all(&dawg, &words), ["star", "stare", "start"]);

        assert!(dawg.possible_words_wildcard("    xyz", 6).unwrap().is_empty());
        assert!(dawg.possible_words_wildcard("    aaaa", 6).unwrap().is_empty());
    }

    #[test]
    fn unknown_letters_are_errors() {
        let (alphabet, encoded) = encoded();
        let dawg = encoded.trunk(0, &alphabet).unwrap();
        let unknown = DawgError::Alphabet(AlphabetError::UnknownLetter('!'));
        assert_eq!(dawg.possible_words("ab!").unwrap_err(), unknown);
        assert_eq!(dawg.possible_words_count("ab!").unwrap_err(), unknown);
        assert_eq!(dawg.possible_words_count_fast("ab!").unwrap_err(), unknown);
        assert_eq!(
            dawg.possible_words_count_with_elimination("ab!", 0).unwrap_err(),
            unknown
        );
        assert_eq!(dawg.possible_words_wildcard("h !", 0).unwrap_err(), unknown);
    }

    #[test]
    fn selection_limits() {
        let (alphabet, encoded) = encoded();
        let dawg = encoded.trunk(0, &alphabet).unwrap();
        assert!(dawg.possible_words_count_fast("abcdefghijkl").is_ok());
        assert_eq!(
            dawg.possible_words_count_fast("abcdefghijklm").unwrap_err(),
            DawgError::SelectionTooLong { len: 13, max: 12 }
        );
        let rack = "e".repeat(MAX_RACK_SIZE + 1);
        assert_eq!(
            dawg.possible_words_count_with_elimination(&rack, 0).unwrap_err(),
            DawgError::SelectionTooLong { len: 33, max: 32 }
        );
        // The set query has no limit.
        assert!(dawg.possible_words_count(&rack).is_ok());
    }

    #[test]
    fn trunk_bounds() {
        let (alphabet, encoded) = encoded();
        let err = encoded.trunk(1, &alphabet).unwrap_err();
        assert_eq!(
            err,
            DawgError::NoSuchTrunk {
                trunk: 1,
                trunk_count: 1
            }
        );
        assert_eq!(
            err.to_string(),
            "trunk 1 out of range for a graph of 1 trunks"
        );
        assert!(PackedDawg::new(&[], &alphabet, 0).is_err());
        assert!(PackedDawg::new(&[8, 0, 0, 0, 0], &alphabet, 0).is_err());
        assert!(PackedDawg::new(&[2, 0, 0, 0, 0], &alphabet, 0).is_err());
        assert!(PackedDawg::new(encoded.as_bytes(), &alphabet, usize::MAX).is_err());
        assert_eq!(encoded.start_address(1), None);
    }

    #[test]
    fn reload_from_bytes() {
        let (alphabet, encoded) = encoded();
        let start = encoded.start_address(0);
        let reloaded = EncodedDawg::from_bytes(encoded.clone().into_bytes(), 1).unwrap();
        assert_eq!(reloaded, encoded);
        assert_eq!(reloaded.start_address(0), start);
        assert!(reloaded.trunk(0, &alphabet).unwrap().check_word("hetman"));
        assert!(EncodedDawg::from_bytes(vec![200, 0, 0, 0], 1).is_err());
    }

    #[test]
    fn truncated_buffer_does_not_panic() {
        let (alphabet, encoded) = encoded();
        let bytes = encoded.as_bytes();
        let start = encoded.start_address(0).unwrap() as usize;
        let mut data = bytes.to_vec();
        data.truncate(start + 4);
        let dawg = PackedDawg::new(&data, &alphabet, 0).unwrap();
        let _ = dawg.check_word("hetman");
        let _ = dawg.word_count();
        let _ = dawg.words();
    }

    #[test]
    fn node_navigation() {
        let (alphabet, encoded) = encoded();
        let dawg = encoded.trunk(0, &alphabet).unwrap();
        let h = dawg.root().get(alphabet.code('h').unwrap()).unwrap();
        let e = h.get(alphabet.code('e').unwrap()).unwrap();
        assert!(e.is_word());
        let letters: Vec<char> = e
            .children()
            .map(|c| alphabet.char(c.letter()).unwrap())
            .sorted()
            .collect();
        assert_eq!(letters, ['a', 'n', 'r', 't']);
        assert_eq!(dawg.root().walk(&alphabet.encode("he").unwrap()), Some(e));
    }

    #[cfg(feature = "rand")]
    #[test]
    fn random_words_are_words() {
        use rand::rngs::StdRng;
        use rand::SeedableRng;

        let (alphabet, encoded) = encoded();
        let dawg = encoded.trunk(0, &alphabet).unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            let word = dawg.random_word(&mut rng);
            assert!(dawg.check_word(&word), "{word}");
        }
    }

    #[test]
    fn backward_trunk() {
        let alphabet = Alphabet::latin();
        let mut generator = DawgGenerator::new(alphabet.clone());
        generator.add_word_batch(WORDS, false);
        generator.add_word_batch(WORDS, true);
        let encoded = generator.generate().unwrap();
        assert_ne!(encoded.start_address(0), encoded.start_address(1));
        let forward = encoded.trunk(0, &alphabet).unwrap();
        let backward = encoded.trunk(1, &alphabet).unwrap();
        for word in WORDS {
            let reversed: String = word.chars().rev().collect();
            assert!(forward.check_word(word), "{word}");
            assert!(backward.check_word(&reversed), "{reversed}");
        }
        assert!(!backward.check_word("hetman"));
        // Words ending in "eat"
        let words = backward.possible_words_pattern("tae", '*', 3).unwrap();
        assert_eq!(decode_all(&backward, &words), ["tae"]);
        let words = backward.possible_words_pattern("tae***", '*', 4).unwrap();
        assert_eq!(decode_all(&backward, &words), ["taert", "taes"]);
    }

    #[test]
    fn packed_dawg_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PackedDawg<'_>>();
        assert_send_sync::<EncodedDawg>();
    }
}
