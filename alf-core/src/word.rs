use std::{borrow::Borrow, ops::Deref};

use thiserror::Error;

use crate::{alphabet::Alphabet, id::Symbol};

/// Errors that arise when reading words from a flat integer buffer supplied by the host.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// A symbol id was negative.
    #[error("encountered negative symbol `{symbol}` at position {position}")]
    NegativeSymbol {
        /// Position of the symbol in the flat buffer.
        position: usize,
        /// The offending value.
        symbol: i32,
    },
    /// A length or count prefix was negative.
    #[error("encountered negative length `{value}` at position {position}")]
    NegativeLength {
        /// Position of the length in the flat buffer.
        position: usize,
        /// The offending value.
        value: i32,
    },
    /// The buffer ended before all announced values were read.
    #[error("flat buffer ended after {available} values, but at least {expected} are required")]
    Truncated {
        /// Number of values the buffer would need to hold.
        expected: usize,
        /// Number of values the buffer actually holds.
        available: usize,
    },
    /// Values remained after everything announced was read.
    #[error("flat buffer has {0} trailing values")]
    Trailing(usize),
}

/// A finite word, i.e. an ordered sequence of symbol ids.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Word(Vec<Symbol>);

impl Word {
    /// The empty word.
    pub fn epsilon() -> Self {
        Self(vec![])
    }

    /// Returns the symbols making up `self`.
    pub fn symbols(&self) -> &[Symbol] {
        &self.0
    }

    /// Appends a symbol to the end of `self`.
    pub fn push(&mut self, symbol: Symbol) {
        self.0.push(symbol)
    }

    /// Returns the concatenation of `self` and `suffix`.
    pub fn concat(&self, suffix: &[Symbol]) -> Self {
        self.0.iter().chain(suffix).copied().collect()
    }

    /// Returns `true` if every symbol of `self` belongs to `alphabet`.
    pub fn is_over(&self, alphabet: &Alphabet) -> bool {
        self.0.iter().all(|&sym| alphabet.contains(sym))
    }

    /// Reads a word from a slice containing nothing but its symbols.
    pub fn from_encoded(symbols: &[i32]) -> Result<Self, DecodeError> {
        symbols
            .iter()
            .enumerate()
            .map(|(position, &symbol)| {
                Symbol::try_from(symbol).map_err(|_| DecodeError::NegativeSymbol { position, symbol })
            })
            .collect()
    }

    /// The number of values [`Word::encode_into`] writes: one length prefix plus one value
    /// per symbol.
    pub fn encoded_len(&self) -> usize {
        self.0.len() + 1
    }

    /// Appends the length of `self` followed by its symbols to `out`.
    pub fn encode_into(&self, out: &mut Vec<i32>) {
        out.push(self.0.len() as i32);
        out.extend(self.0.iter().map(|&sym| sym as i32));
    }

    /// Consumes `self`, returning the underlying symbols.
    pub fn into_inner(self) -> Vec<Symbol> {
        self.0
    }
}

impl Deref for Word {
    type Target = [Symbol];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Borrow<[Symbol]> for Word {
    fn borrow(&self) -> &[Symbol] {
        &self.0
    }
}

impl std::fmt::Debug for Word {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", crate::Show::show(self))
    }
}

impl From<Vec<Symbol>> for Word {
    fn from(value: Vec<Symbol>) -> Self {
        Self(value)
    }
}

impl From<&[Symbol]> for Word {
    fn from(value: &[Symbol]) -> Self {
        Self(value.to_vec())
    }
}

impl<const N: usize> From<[Symbol; N]> for Word {
    fn from(value: [Symbol; N]) -> Self {
        Self(value.to_vec())
    }
}

impl FromIterator<Symbol> for Word {
    fn from_iter<T: IntoIterator<Item = Symbol>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A cursor over a flat buffer of length-prefixed words, as exchanged with the host. Each word
/// is stored as its length followed by its symbols, a sequence of words may be preceded by a
/// count.
#[derive(Debug, Clone)]
pub struct FlatWords<'a> {
    buf: &'a [i32],
    position: usize,
}

impl<'a> FlatWords<'a> {
    /// Creates a cursor positioned at the start of `buf`.
    pub fn new(buf: &'a [i32]) -> Self {
        Self { buf, position: 0 }
    }

    /// Number of values that have not been read yet.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.position
    }

    fn take(&mut self, len: usize) -> Result<&'a [i32], DecodeError> {
        let end = self.position + len;
        if end > self.buf.len() {
            return Err(DecodeError::Truncated {
                expected: end,
                available: self.buf.len(),
            });
        }
        let out = &self.buf[self.position..end];
        self.position = end;
        Ok(out)
    }

    /// Reads a nonnegative length or count value.
    pub fn read_len(&mut self) -> Result<usize, DecodeError> {
        let position = self.position;
        let value = self.take(1)?[0];
        usize::try_from(value).map_err(|_| DecodeError::NegativeLength { position, value })
    }

    /// Reads one length-prefixed word.
    pub fn read_word(&mut self) -> Result<Word, DecodeError> {
        let len = self.read_len()?;
        let start = self.position;
        Word::from_encoded(self.take(len)?).map_err(|err| match err {
            DecodeError::NegativeSymbol { position, symbol } => DecodeError::NegativeSymbol {
                position: start + position,
                symbol,
            },
            other => other,
        })
    }

    /// Reads `count` consecutive length-prefixed words.
    pub fn read_words(&mut self, count: usize) -> Result<Vec<Word>, DecodeError> {
        (0..count).map(|_| self.read_word()).collect()
    }

    /// Reads a count followed by that many length-prefixed words.
    pub fn read_counted(&mut self) -> Result<Vec<Word>, DecodeError> {
        let count = self.read_len()?;
        self.read_words(count)
    }

    /// Succeeds only if the whole buffer has been consumed.
    pub fn finish(self) -> Result<(), DecodeError> {
        match self.remaining() {
            0 => Ok(()),
            n => Err(DecodeError::Trailing(n)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{DecodeError, FlatWords, Word};

    #[test]
    fn words_from_host_symbols() {
        assert_eq!(Word::from_encoded(&[0, 2, 1]), Ok(Word::from([0, 2, 1])));
        assert_eq!(
            Word::from_encoded(&[0, -3]),
            Err(DecodeError::NegativeSymbol {
                position: 1,
                symbol: -3
            })
        );
    }

    #[test]
    fn encode_prefixes_length() {
        let mut out = vec![];
        Word::from([4, 5]).encode_into(&mut out);
        Word::epsilon().encode_into(&mut out);
        assert_eq!(out, vec![2, 4, 5, 0]);
        assert_eq!(Word::from([4, 5]).encoded_len(), 3);
    }

    #[test]
    fn flat_cursor() {
        let buf = [2, 1, 7, 0, 3, 1, 1, 1];
        let mut cursor = FlatWords::new(&buf);
        let words = cursor.read_counted().unwrap();
        assert_eq!(words, vec![Word::from([7]), Word::epsilon()]);
        assert_eq!(cursor.read_word().unwrap(), Word::from([1, 1, 1]));
        assert!(cursor.finish().is_ok());

        let mut cursor = FlatWords::new(&[1, 3, 0]);
        assert_eq!(
            cursor.read_counted(),
            Err(DecodeError::Truncated {
                expected: 5,
                available: 3
            })
        );

        let mut cursor = FlatWords::new(&[1, 1, -1]);
        assert_eq!(
            cursor.read_counted(),
            Err(DecodeError::NegativeSymbol {
                position: 2,
                symbol: -1
            })
        );

        let mut cursor = FlatWords::new(&[-2]);
        assert_eq!(
            cursor.read_len(),
            Err(DecodeError::NegativeLength {
                position: 0,
                value: -2
            })
        );

        let mut cursor = FlatWords::new(&[0, 9]);
        assert!(cursor.read_counted().unwrap().is_empty());
        assert_eq!(cursor.finish(), Err(DecodeError::Trailing(1)));
    }
}
