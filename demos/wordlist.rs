//! Example: a word-game dictionary on top of a packed word graph.
//!
//! Builds a forward and a reversed trunk from a small word list, then runs
//! lookups, prefix checks, anagram counts and wildcard searches against the
//! packed bytes.
//!
//! Run with: RUST_LOG=debug cargo run --example wordlist

use packdawg::dawg::{Alphabet, DawgGenerator, PackedDawg};
use tracing_subscriber::EnvFilter;

/// A word list answering the questions a word game asks.
struct Wordlist<'w> {
    forward: PackedDawg<'w>,
    backward: PackedDawg<'w>,
}

impl Wordlist<'_> {
    fn is_word(&self, word: &str) -> bool {
        self.forward.check_word(word)
    }

    fn has_prefix(&self, prefix: &str) -> bool {
        self.forward.has_prefix(prefix)
    }

    fn has_suffix(&self, suffix: &str) -> bool {
        let reversed: String = suffix.chars().rev().collect();
        self.backward.has_prefix(&reversed)
    }

    /// Words matching `pattern`, where `?` stands for any letter.
    fn matching(&self, pattern: &str) -> Vec<String> {
        let length = pattern.chars().count();
        self.forward
            .possible_words_pattern(pattern, '?', length)
            .map(|words| {
                words
                    .iter()
                    .map(|w| self.forward.solution_to_word(w))
                    .collect()
            })
            .unwrap_or_default()
    }
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let alphabet = Alphabet::from_groups([
        "aA", "bB", "cC", "dD", "eE", "fF", "gG", "hH", "iI", "jJ", "kK", "lL", "mM", "nN", "oO",
        "pP", "qQ", "rR", "sS", "tT", "uU", "vV", "wW", "xX", "yY", "zZ",
    ])
    .expect("26 letters fit in the code space");
    let words = ["BAKE", "BAKED", "BAKER", "CAKE", "CAKED", "FAKE", "LAKE", "TAKEN"];

    let mut generator = DawgGenerator::new(alphabet.clone());
    generator.add_word_batch(words, false);
    generator.add_word_batch(words, true);
    let encoded = generator.generate().expect("small word lists fit");
    println!(
        "{} words, {} trie nodes, {} shared subtrees, {} bytes",
        words.len(),
        generator.node_count(),
        generator.shared_subtrie_count(),
        encoded.len()
    );

    let wordlist = Wordlist {
        forward: encoded.trunk(0, &alphabet).expect("forward trunk"),
        backward: encoded.trunk(1, &alphabet).expect("backward trunk"),
    };

    println!("\nWord lookup:");
    for word in ["BAKE", "baker", "BAKES", "CAKE", "LAKE", "MAKE"] {
        println!("  {word}: {}", if wordlist.is_word(word) { "yes" } else { "no" });
    }

    println!("\nPrefix checking:");
    for prefix in ["BA", "CAK", "MA", "FAK"] {
        println!("  {prefix}*: {}", if wordlist.has_prefix(prefix) { "yes" } else { "no" });
    }

    println!("\nSuffix checking:");
    for suffix in ["KED", "KEN", "KES"] {
        println!("  *{suffix}: {}", if wordlist.has_suffix(suffix) { "yes" } else { "no" });
    }

    println!("\nRack queries:");
    for rack in ["EKAB", "EKABD", "KATEN"] {
        let reusable = wordlist.forward.possible_words_count(rack).unwrap_or(0);
        let tiles = wordlist
            .forward
            .possible_words_count_with_elimination(rack, 0)
            .unwrap_or(0);
        println!("  {rack}: {reusable} with reuse, {tiles} with single tiles");
    }

    println!("\nPattern ?AKE?: {:?}", wordlist.matching("?AKE?"));
}
