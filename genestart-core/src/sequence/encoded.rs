use std::ops::{Deref, Range};

use crate::sequence::Alphabet;
use crate::types::{GeneStartError, Symbol};

/// A sequence held as numeric alphabet codes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NumericSequence {
    symbols: Vec<Symbol>,
}

impl NumericSequence {
    /// Encodes text with the given alphabet.
    ///
    /// # Errors
    ///
    /// Returns [`GeneStartError::InvalidSequence`] for the first character
    /// that is not part of the alphabet.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use genestart_core::sequence::{Alphabet, NumericSequence};
    ///
    /// let alphabet = Alphabet::dna();
    /// let seq = NumericSequence::encode(b"ACgtN", &alphabet).unwrap();
    /// assert_eq!(seq.as_slice(), &[0, 1, 2, 3, 9]);
    /// assert!(NumericSequence::encode(b"AC-T", &alphabet).is_err());
    /// ```
    pub fn encode(text: &[u8], alphabet: &Alphabet) -> Result<Self, GeneStartError> {
        let symbols = text
            .iter()
            .enumerate()
            .map(|(i, &c)| {
                alphabet.encode(c).ok_or_else(|| {
                    GeneStartError::InvalidSequence(format!(
                        "character '{}' at position {} is not in the alphabet",
                        char::from(c).escape_default(),
                        i + 1
                    ))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { symbols })
    }

    #[must_use]
    pub fn from_symbols(symbols: Vec<Symbol>) -> Self {
        Self { symbols }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Symbol] {
        &self.symbols
    }

    /// Copy of the symbols in `range`, clamped to the sequence bounds.
    #[must_use]
    pub fn subrange(&self, range: Range<usize>) -> Self {
        let end = range.end.min(self.symbols.len());
        let start = range.start.min(end);
        Self {
            symbols: self.symbols[start..end].to_vec(),
        }
    }

    /// Reverse complement under the given alphabet
    #[must_use]
    pub fn reverse_complement(&self, alphabet: &Alphabet) -> Self {
        Self {
            symbols: self
                .symbols
                .iter()
                .rev()
                .map(|&s| alphabet.complement(s))
                .collect(),
        }
    }

    #[must_use]
    pub fn decode(&self, alphabet: &Alphabet) -> String {
        alphabet.decode_all(&self.symbols)
    }
}

impl Deref for NumericSequence {
    type Target = [Symbol];

    fn deref(&self) -> &Self::Target {
        &self.symbols
    }
}

impl AsRef<[Symbol]> for NumericSequence {
    fn as_ref(&self) -> &[Symbol] {
        &self.symbols
    }
}

impl From<Vec<Symbol>> for NumericSequence {
    fn from(symbols: Vec<Symbol>) -> Self {
        Self { symbols }
    }
}
