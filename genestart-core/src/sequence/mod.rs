//! Alphabet, numeric sequences and word encoding.
//!
//! This module provides the symbol-level collaborators of the Markov engine:
//! the DNA alphabet with its complement map, numeric encoding of text
//! sequences, and the word codec that packs runs of symbols into table
//! indices.
//!
//! ## Overview
//!
//! Characters are mapped to compact integer codes:
//! - A: 0, C: 1, G: 2, T/U: 3 (valid symbols, used for word indices)
//! - B D H K M N R S V W Y Z: 4..16 (ambiguous symbols, never counted)
//!
//! ## Modules
//!
//! - [`codec`]: Packing of symbol runs into word indices
//! - [`encoded`]: Numeric sequences with reverse-complement support
//! - [`io`]: FASTA file reading
//!
//! ## Examples
//!
//! ```rust
//! use genestart_core::sequence::Alphabet;
//!
//! let alphabet = Alphabet::dna();
//! assert_eq!(alphabet.encode(b'g'), Some(2));
//! assert_eq!(alphabet.complement(0), 3); // A <-> T
//! assert!(alphabet.is_ambiguous(alphabet.encode(b'N').unwrap()));
//! ```

pub mod codec;
pub mod encoded;
pub mod io;

pub use codec::WordCodec;
pub use encoded::NumericSequence;
pub use io::*;

use crate::constants::{DNA_AMBIGUOUS, DNA_COMPLEMENT_PAIRS, DNA_VALID};
use crate::types::Symbol;

/// Alphabet of characters with their numeric codes.
///
/// Valid characters receive codes `0..size_valid()` in the order given,
/// ambiguous characters receive the following codes. Complements are only
/// defined between valid characters; every other symbol is its own
/// complement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    characters: Vec<u8>,
    valid_count: usize,
    complements: Vec<Symbol>,
    lookup: Vec<Option<Symbol>>,
}

impl Alphabet {
    /// Builds an alphabet from its valid and ambiguous characters.
    ///
    /// Characters are matched case-insensitively; `pairs` lists complementary
    /// valid characters.
    ///
    /// # Panics
    ///
    /// Panics if the alphabet holds more than 255 characters or a character
    /// appears twice.
    #[must_use]
    pub fn new(valid: &[u8], ambiguous: &[u8], pairs: &[(u8, u8)]) -> Self {
        let characters: Vec<u8> = valid
            .iter()
            .chain(ambiguous)
            .map(u8::to_ascii_uppercase)
            .collect();
        assert!(characters.len() < usize::from(u8::MAX), "alphabet too large");

        let mut lookup = vec![None; 256];
        for (code, &c) in characters.iter().enumerate() {
            assert!(lookup[usize::from(c)].is_none(), "duplicate character");
            let code = code as Symbol;
            lookup[usize::from(c)] = Some(code);
            lookup[usize::from(c.to_ascii_lowercase())] = Some(code);
        }

        let mut complements: Vec<Symbol> = (0..characters.len()).map(|c| c as Symbol).collect();
        for &(a, b) in pairs {
            if let (Some(x), Some(y)) = (
                lookup[usize::from(a.to_ascii_uppercase())],
                lookup[usize::from(b.to_ascii_uppercase())],
            ) {
                complements[usize::from(x)] = y;
                complements[usize::from(y)] = x;
            }
        }

        Self {
            characters,
            valid_count: valid.len(),
            complements,
            lookup,
        }
    }

    /// The nucleotide alphabet: `ACGT` plus IUPAC ambiguity codes.
    ///
    /// `U` is accepted as an alias of `T`.
    #[must_use]
    pub fn dna() -> Self {
        let mut alphabet = Self::new(DNA_VALID, DNA_AMBIGUOUS, DNA_COMPLEMENT_PAIRS);
        let t = alphabet.lookup[usize::from(b'T')];
        alphabet.lookup[usize::from(b'U')] = t;
        alphabet.lookup[usize::from(b'u')] = t;
        alphabet
    }

    /// Total number of characters
    #[must_use]
    pub fn size(&self) -> usize {
        self.characters.len()
    }

    /// Number of valid (non-ambiguous) characters
    #[must_use]
    pub const fn size_valid(&self) -> usize {
        self.valid_count
    }

    /// Number of ambiguous characters
    #[must_use]
    pub fn size_ambiguous(&self) -> usize {
        self.characters.len() - self.valid_count
    }

    #[must_use]
    pub fn contains(&self, symbol: Symbol) -> bool {
        usize::from(symbol) < self.characters.len()
    }

    #[must_use]
    pub fn is_valid(&self, symbol: Symbol) -> bool {
        usize::from(symbol) < self.valid_count
    }

    #[must_use]
    pub fn is_ambiguous(&self, symbol: Symbol) -> bool {
        self.contains(symbol) && !self.is_valid(symbol)
    }

    /// Complement of a symbol; symbols without a partner map to themselves.
    #[must_use]
    pub fn complement(&self, symbol: Symbol) -> Symbol {
        self.complements
            .get(usize::from(symbol))
            .copied()
            .unwrap_or(symbol)
    }

    /// Numeric code of a character, or `None` if it is not in the alphabet.
    #[must_use]
    pub fn encode(&self, c: u8) -> Option<Symbol> {
        self.lookup[usize::from(c)]
    }

    /// Character of a numeric code, or `None` if the code is out of range.
    #[must_use]
    pub fn decode(&self, symbol: Symbol) -> Option<u8> {
        self.characters.get(usize::from(symbol)).copied()
    }

    /// Decodes a run of symbols into text; unknown codes become `?`.
    #[must_use]
    pub fn decode_all(&self, symbols: &[Symbol]) -> String {
        symbols
            .iter()
            .map(|&s| char::from(self.decode(s).unwrap_or(b'?')))
            .collect()
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self::dna()
    }
}
