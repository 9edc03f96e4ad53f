//! Exact re-basing of non-negative integers between numeral alphabets.
//!
//! A numeral is a sequence of symbols from an [`Alphabet`]; its value is
//! the usual positional big-endian interpretation.  Conversion goes through
//! an arbitrary-precision integer, so leading zero digits carry no value and
//! are dropped.  Callers that need a fixed width pad the result with the
//! target alphabet's zero symbol (see [`pad_left`] and [`rebase`]).

use num_bigint::BigUint;
use num_traits::{ToPrimitive, Zero};

use crate::dict::Dictionary;
use crate::errors::{Result, SesameError};

const HEX_DIGITS: &str = "0123456789abcdef";
const BIT_DIGITS: &str = "01";

/// The numeral systems used by the cave.
#[derive(Debug, Clone, Copy)]
pub enum Alphabet {
    /// Lowercase hex digits, base 16.
    Hex,
    /// `0` and `1`, base 2.
    Bits,
    /// The full dictionary, base 2048.
    Words(&'static Dictionary),
    /// The first 16 dictionary words, base 16.
    ChecksumWords(&'static Dictionary),
}

impl Alphabet {
    pub fn radix(&self) -> u32 {
        match self {
            Self::Hex | Self::ChecksumWords(_) => 16,
            Self::Bits => 2,
            Self::Words(_) => 2048,
        }
    }

    /// The symbol for digit value `digit`.
    pub fn symbol(&self, digit: u32) -> Option<&'static str> {
        let d = usize::try_from(digit).ok()?;
        match self {
            Self::Hex => HEX_DIGITS.get(d..d + 1),
            Self::Bits => BIT_DIGITS.get(d..d + 1),
            Self::Words(dict) => dict.word(d),
            Self::ChecksumWords(dict) => dict.checksum_words().get(d).copied(),
        }
    }

    /// The digit value of `symbol`.
    pub fn digit(&self, symbol: &str) -> Option<u32> {
        let position = match self {
            Self::Hex | Self::Bits => {
                let digits = if matches!(self, Self::Hex) {
                    HEX_DIGITS
                } else {
                    BIT_DIGITS
                };
                if symbol.len() != 1 {
                    return None;
                }
                digits.find(symbol)
            }
            Self::Words(dict) => dict.index_of(symbol),
            Self::ChecksumWords(dict) => dict.checksum_words().iter().position(|w| *w == symbol),
        }?;
        u32::try_from(position).ok()
    }

    pub fn zero(&self) -> &'static str {
        match self {
            Self::Hex | Self::Bits => "0",
            Self::Words(dict) | Self::ChecksumWords(dict) => dict.zero(),
        }
    }

    /// Split a rendered numeral into its symbols.
    ///
    /// Character alphabets split per character, word alphabets on whitespace.
    pub fn split<'a>(&self, text: &'a str) -> Vec<&'a str> {
        match self {
            Self::Hex | Self::Bits => text
                .char_indices()
                .map(|(i, c)| &text[i..i + c.len_utf8()])
                .collect(),
            Self::Words(_) | Self::ChecksumWords(_) => text.split_whitespace().collect(),
        }
    }

    /// Render symbols as text; the inverse of [`Alphabet::split`].
    pub fn join(&self, symbols: &[&str]) -> String {
        match self {
            Self::Hex | Self::Bits => symbols.concat(),
            Self::Words(_) | Self::ChecksumWords(_) => symbols.join(" "),
        }
    }

    /// The integer value of a big-endian numeral.
    pub fn value<S: AsRef<str>>(&self, symbols: &[S]) -> Result<BigUint> {
        let radix = BigUint::from(self.radix());
        symbols.iter().try_fold(BigUint::zero(), |acc, symbol| {
            let digit = self
                .digit(symbol.as_ref())
                .ok_or(SesameError::Conversion)?;
            Ok(acc * &radix + digit)
        })
    }

    /// The shortest big-endian numeral for `value` (a single zero for 0).
    pub fn digits(&self, value: &BigUint) -> Result<Vec<&'static str>> {
        if value.is_zero() {
            return Ok(vec![self.zero()]);
        }

        let radix = BigUint::from(self.radix());
        let mut rest = value.clone();
        let mut out = Vec::new();
        while !rest.is_zero() {
            let digit = (&rest % &radix)
                .to_u32()
                .ok_or(SesameError::Conversion)?;
            out.push(self.symbol(digit).ok_or(SesameError::Conversion)?);
            rest /= &radix;
        }
        out.reverse();
        Ok(out)
    }
}

/// Re-express the value of `symbols` (in `from`) as digits of `to`.
pub fn convert<S: AsRef<str>>(
    symbols: &[S],
    from: Alphabet,
    to: Alphabet,
) -> Result<Vec<&'static str>> {
    to.digits(&from.value(symbols)?)
}

/// Prefix zero symbols until `digits` is at least `width` long.
pub fn pad_left(mut digits: Vec<&'static str>, width: usize, alphabet: Alphabet) -> Vec<&'static str> {
    if digits.len() < width {
        let mut padded = vec![alphabet.zero(); width - digits.len()];
        padded.append(&mut digits);
        return padded;
    }
    digits
}

/// Convert rendered `text` from one alphabet to another, padded to `width`.
pub fn rebase(text: &str, from: Alphabet, to: Alphabet, width: usize) -> Result<String> {
    let digits = convert(&from.split(text), from, to)?;
    Ok(to.join(&pad_left(digits, width, to)))
}

/// Convert `original` into `via` (padded to `via_width`) and check that
/// converting back reproduces `original` exactly.
///
/// Returns the `via` rendering.  This is a self-test of the conversion
/// arithmetic, not a security check.
pub fn check_round_trip(
    original: &str,
    from: Alphabet,
    via: Alphabet,
    via_width: usize,
) -> Result<String> {
    let width = from.split(original).len();
    let rendered = rebase(original, from, via, via_width)?;
    if rebase(&rendered, via, from, width)? != original {
        return Err(SesameError::Conversion);
    }
    Ok(rendered)
}
