//! The fixed 2048-word dictionary.
//!
//! The word list is compiled into the binary and validated the first time
//! it is requested.  Its order matters: a word's position is its value as a
//! base-2048 digit, and the first 16 words double as the hex digits of the
//! unlock code.

use std::collections::HashSet;
use std::sync::OnceLock;

use crate::errors::{Result, SesameError};

/// Number of words in the dictionary.
pub const WORD_COUNT: usize = 2048;

/// Number of leading words used for unlock codes (one per hex digit).
pub const CHECKSUM_WORD_COUNT: usize = 16;

const WORDS: &str = include_str!("words.txt");

static DICTIONARY: OnceLock<std::result::Result<Dictionary, String>> = OnceLock::new();

/// An ordered list of exactly 2048 unique lowercase words.
#[derive(Debug)]
pub struct Dictionary {
    words: Vec<&'static str>,
}

impl Dictionary {
    /// Return the process-wide dictionary, loading it on first use.
    pub fn load() -> Result<&'static Dictionary> {
        DICTIONARY
            .get_or_init(|| Self::parse(WORDS))
            .as_ref()
            .map_err(|e| SesameError::Dictionary(e.clone()))
    }

    fn parse(text: &'static str) -> std::result::Result<Self, String> {
        let words: Vec<&'static str> = text.split_whitespace().collect();

        if words.len() != WORD_COUNT {
            return Err(format!(
                "expected {WORD_COUNT} words, found {}",
                words.len()
            ));
        }

        let mut seen = HashSet::with_capacity(WORD_COUNT);
        for word in &words {
            if !word.bytes().all(|b| b.is_ascii_lowercase()) {
                return Err(format!("'{word}' is not a lowercase word"));
            }
            if !seen.insert(*word) {
                return Err(format!("'{word}' appears more than once"));
            }
        }

        // The unlock shorthand needs every checksum word to start differently.
        let initials: HashSet<u8> = words[..CHECKSUM_WORD_COUNT]
            .iter()
            .map(|w| w.as_bytes()[0])
            .collect();
        if initials.len() != CHECKSUM_WORD_COUNT {
            return Err("checksum words must have distinct initials".into());
        }

        Ok(Self { words })
    }

    /// All words, in order.
    pub fn words(&self) -> &[&'static str] {
        &self.words
    }

    /// The word at `index`, if any.
    pub fn word(&self, index: usize) -> Option<&'static str> {
        self.words.get(index).copied()
    }

    /// Position of `word` in the dictionary.
    pub fn index_of(&self, word: &str) -> Option<usize> {
        self.words.iter().position(|w| *w == word)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.index_of(word).is_some()
    }

    /// The words that stand for the hex digits `0..=f`.
    pub fn checksum_words(&self) -> &[&'static str] {
        &self.words[..CHECKSUM_WORD_COUNT]
    }

    /// The zero digit of every word alphabet.
    pub fn zero(&self) -> &'static str {
        self.words[0]
    }
}
