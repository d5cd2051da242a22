use std::error::Error;
use std::fmt;

use hashbrown::HashMap;
use smallvec::SmallVec;

use super::MAX_WORD_LENGTH;

/// Number of codes available for letters (`0..=30`).
pub const LETTER_CODES: u8 = 31;

/// The reserved code that matches any letter in a packed selection. Never stored in a graph.
pub const WILDCARD_CODE: u8 = 31;

/// A word as a sequence of 5-bit letter codes.
pub type Word = SmallVec<[u8; MAX_WORD_LENGTH]>;

/// Bidirectional mapping between characters and 5-bit letter codes.
///
/// Several characters may map to the same code (for example `'a'` and `'A'`).
/// The reverse direction yields the first character registered for a code.
///
/// # Examples
///
/// ```
/// use packdawg::dawg::Alphabet;
///
/// let alphabet = Alphabet::from_groups(["aA", "bB", "cC"]).unwrap();
/// assert_eq!(alphabet.code('B'), Some(1));
/// assert_eq!(alphabet.char(1), Some('b'));
/// assert_eq!(alphabet.code('d'), None);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Alphabet {
    codes: HashMap<char, u8>,
    chars: [Option<char>; LETTER_CODES as usize],
}

impl Alphabet {
    /// Creates an alphabet from explicit `(char, code)` pairs.
    pub fn new(pairs: impl IntoIterator<Item = (char, u8)>) -> Result<Self, AlphabetError> {
        let mut alphabet = Alphabet {
            codes: HashMap::new(),
            chars: [None; LETTER_CODES as usize],
        };
        for (ch, code) in pairs {
            alphabet.insert(ch, code)?;
        }
        Ok(alphabet)
    }

    /// Creates an alphabet where every character of `groups[i]` maps to code `i`.
    pub fn from_groups<S: AsRef<str>>(
        groups: impl IntoIterator<Item = S>,
    ) -> Result<Self, AlphabetError> {
        let mut pairs = Vec::new();
        for (code, group) in groups.into_iter().enumerate() {
            let code = u8::try_from(code).map_err(|_| AlphabetError::CodeOutOfRange(code))?;
            pairs.extend(group.as_ref().chars().map(|ch| (ch, code)));
        }
        Alphabet::new(pairs)
    }

    /// The lowercase latin alphabet `a..=z` mapped to codes `0..=25`.
    pub fn latin() -> Self {
        let mut alphabet = Alphabet {
            codes: HashMap::new(),
            chars: [None; LETTER_CODES as usize],
        };
        for (code, ch) in ('a'..='z').enumerate() {
            alphabet.codes.insert(ch, code as u8);
            alphabet.chars[code] = Some(ch);
        }
        alphabet
    }

    fn insert(&mut self, ch: char, code: u8) -> Result<(), AlphabetError> {
        if code >= LETTER_CODES {
            return Err(AlphabetError::CodeOutOfRange(code as usize));
        }
        self.codes.insert(ch, code);
        self.chars[code as usize].get_or_insert(ch);
        Ok(())
    }

    /// Returns the letter code of `ch`, or `None` if it is not part of the alphabet.
    #[inline]
    pub fn code(&self, ch: char) -> Option<u8> {
        self.codes.get(&ch).copied()
    }

    /// Returns the character for a letter code.
    #[inline]
    pub fn char(&self, code: u8) -> Option<char> {
        self.chars.get(code as usize).copied().flatten()
    }

    /// Returns every letter code that has at least one character mapped to it.
    pub fn codes(&self) -> impl Iterator<Item = u8> + '_ {
        (0..LETTER_CODES).filter(|&code| self.chars[code as usize].is_some())
    }

    /// Number of distinct letter codes in use.
    pub fn len(&self) -> usize {
        self.codes().count()
    }

    /// True if no character is mapped.
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// True if every character of `word` is mapped.
    pub fn is_encodable(&self, word: &str) -> bool {
        word.chars().all(|ch| self.codes.contains_key(&ch))
    }

    /// Encodes `word`, failing on the first unmapped character.
    pub fn encode(&self, word: &str) -> Result<Word, AlphabetError> {
        word.chars()
            .map(|ch| self.code(ch).ok_or(AlphabetError::UnknownLetter(ch)))
            .collect()
    }

    /// Encodes `word`, skipping unmapped characters.
    pub fn encode_lossy(&self, word: &str) -> Word {
        word.chars().filter_map(|ch| self.code(ch)).collect()
    }

    /// Decodes letter codes back into a string. Codes without a character are skipped.
    pub fn decode(&self, codes: &[u8]) -> String {
        codes.iter().filter_map(|&code| self.char(code)).collect()
    }
}

/// Errors raised while building an alphabet or encoding text with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlphabetError {
    /// The character has no letter code.
    UnknownLetter(char),
    /// Letter codes must be below 31.
    CodeOutOfRange(usize),
}

impl fmt::Display for AlphabetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlphabetError::UnknownLetter(ch) => write!(f, "unknown letter {ch:?}"),
            AlphabetError::CodeOutOfRange(code) => {
                write!(f, "letter code {code} out of range (max {})", LETTER_CODES - 1)
            }
        }
    }
}

impl Error for AlphabetError {}
