//! # packdawg
//!
//! Compact, relocatable [DAWG](https://en.wikipedia.org/wiki/Deterministic_acyclic_finite_state_automaton)
//! (Directed Acyclic Word Graph) buffers for word games.
//!
//! A word list is inserted into a trie, identical subtrees are shared, and the
//! result is packed into a single byte buffer with one or more entry points
//! ("trunks"), for example a forward and a reversed dictionary. Queries run
//! directly against the packed bytes without decoding them.
//!
//! ## Features
//!
//! - **Small**: one header byte per node, 23-bit child addresses only where a
//!   child can't follow its parent directly
//! - **Relocatable**: the buffer can be stored and loaded verbatim
//! - **Word-game queries**: membership, letter-set anagrams, tile racks with
//!   per-tile elimination, wildcard patterns and random sampling
//! - **Thread-safe**: queries never mutate the buffer
//!
//! ## Quick Start
//!
//! ```
//! use packdawg::dawg::{Alphabet, DawgGenerator};
//!
//! let alphabet = Alphabet::latin();
//! let words = ["bake", "baker", "cake", "fake", "lake", "make"];
//!
//! let mut generator = DawgGenerator::new(alphabet.clone());
//! generator.add_word_batch(words, false);
//! generator.add_word_batch(words, true);
//! let encoded = generator.generate().unwrap();
//!
//! let dawg = encoded.trunk(0, &alphabet).unwrap();
//! assert!(dawg.check_word("cake"));
//! assert!(!dawg.check_word("ake"));
//! assert_eq!(dawg.possible_words_count("abek").unwrap(), 1);
//!
//! let suffixes = encoded.trunk(1, &alphabet).unwrap();
//! let words = suffixes.possible_words_wildcard("eka ", 4).unwrap();
//! assert_eq!(words.len(), 5);
//! ```
//!
//! ## Loading a stored buffer
//!
//! ```
//! use packdawg::dawg::{build_packed_dawg, Alphabet, PackedDawg};
//!
//! let alphabet = Alphabet::latin();
//! let bytes = build_packed_dawg(&alphabet, ["apple", "banana"]).unwrap().into_bytes();
//!
//! let dawg = PackedDawg::new(&bytes, &alphabet, 0).unwrap();
//! assert!(dawg.check_word("banana"));
//! ```

#![warn(missing_docs)]

/// Word graph construction, encoding and queries.
pub mod dawg;

pub use dawg::{
    build_packed_dawg, Alphabet, DawgError, DawgGenerator, EncodedDawg, PackedDawg,
    RandomSource,
};
