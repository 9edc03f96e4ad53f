//! Recovery phrases, unlock codes and passphrases as word numerals.

use rand::RngCore;
use zeroize::Zeroizing;

use crate::bases::{self, Alphabet};
use crate::crypto::checksum::CHECKSUM_LEN;
use crate::dict::Dictionary;
use crate::errors::{Result, SesameError};

/// Words in a recovery phrase.
pub const PHRASE_WORDS: usize = 8;

/// Random bytes behind a recovery phrase (88 bits = 8 words of 11 bits).
pub const SEED_BYTES: usize = 11;

/// Hex characters in a seed.
pub const SEED_HEX_LEN: usize = SEED_BYTES * 2;

/// Words in an unlock code.
pub const CODE_WORDS: usize = CHECKSUM_LEN;

/// Minimum words in a generated passphrase.
pub const PASSPHRASE_MIN_WORDS: usize = 4;

/// A fresh random seed as 22 lowercase hex characters.
pub fn random_seed() -> Zeroizing<String> {
    let mut bytes = Zeroizing::new([0u8; SEED_BYTES]);
    rand::rng().fill_bytes(bytes.as_mut());
    Zeroizing::new(bytes.iter().map(|b| format!("{b:02x}")).collect())
}

/// Validate an 8-word recovery phrase and turn it into its hex seed.
pub fn seed_from_phrase(dict: &'static Dictionary, phrase: &str) -> Result<Zeroizing<String>> {
    let phrase = Zeroizing::new(phrase.to_lowercase());
    let words: Vec<&str> = phrase.split_whitespace().collect();
    if words.len() != PHRASE_WORDS {
        return Err(SesameError::WrongWordCount(PHRASE_WORDS));
    }
    if !words.iter().all(|w| dict.contains(w)) {
        return Err(SesameError::UnknownWord);
    }
    let digits = bases::convert(&words, Alphabet::Words(dict), Alphabet::Hex)?;
    let seed = bases::pad_left(digits, SEED_HEX_LEN, Alphabet::Hex).concat();
    Ok(Zeroizing::new(seed))
}

/// Render a seed as its 8-word phrase, checking the conversion round-trips.
pub fn phrase_from_seed(dict: &'static Dictionary, seed: &str) -> Result<Zeroizing<String>> {
    bases::check_round_trip(seed, Alphabet::Hex, Alphabet::Words(dict), PHRASE_WORDS)
        .map(Zeroizing::new)
}

/// Render a 4-digit hex checksum as four checksum words.
pub fn code_from_checksum(dict: &'static Dictionary, checksum: &str) -> Result<Zeroizing<String>> {
    bases::rebase(checksum, Alphabet::Hex, Alphabet::ChecksumWords(dict), CODE_WORDS)
        .map(Zeroizing::new)
}

/// Parse an unlock code back into its 4-digit hex checksum.
///
/// Accepts four checksum words separated by spaces, or exactly four
/// characters with no spaces, each the initial of a checksum word.
pub fn checksum_from_code(dict: &'static Dictionary, code: &str) -> Result<Zeroizing<String>> {
    let code = Zeroizing::new(code.to_lowercase());
    let checksum_words = dict.checksum_words();

    let words: Vec<&str> = if code.chars().count() == CODE_WORDS && !code.contains(' ') {
        code.chars()
            .map(|c| {
                checksum_words
                    .iter()
                    .find(|w| w.starts_with(c))
                    .copied()
                    .ok_or(SesameError::UnknownWord)
            })
            .collect::<Result<_>>()?
    } else {
        code.split_whitespace().collect()
    };

    if words.len() != CODE_WORDS {
        return Err(SesameError::WrongWordCount(CODE_WORDS));
    }
    if !words.iter().all(|w| checksum_words.iter().any(|c| c == w)) {
        return Err(SesameError::UnknownWord);
    }

    let digits = bases::convert(&words, Alphabet::ChecksumWords(dict), Alphabet::Hex)?;
    Ok(Zeroizing::new(
        bases::pad_left(digits, CHECKSUM_LEN, Alphabet::Hex).concat(),
    ))
}

/// Turn derived key material into passphrase words.
///
/// Each byte contributes its lowest bit.  The resulting bit string is read
/// as a big-endian integer, so leading zero bits produce no words; the
/// result is padded to at least four words.
pub fn passphrase_from_material(
    dict: &'static Dictionary,
    material: &[u8],
) -> Result<Zeroizing<String>> {
    let bits: Zeroizing<String> = Zeroizing::new(
        material
            .iter()
            .map(|b| if b % 2 == 0 { '0' } else { '1' })
            .collect(),
    );
    bases::rebase(&bits, Alphabet::Bits, Alphabet::Words(dict), PASSPHRASE_MIN_WORDS)
        .map(Zeroizing::new)
}
