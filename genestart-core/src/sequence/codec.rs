//! Packing of fixed-length symbol runs into word indices.

use crate::constants::MAX_WORD_BITS;
use crate::sequence::Alphabet;
use crate::types::Symbol;

/// Maps runs of valid symbols to dense table indices and back.
///
/// Each symbol takes `bits_per_symbol()` bits, the first symbol of a word
/// occupies the most significant bits. For DNA this is 2 bits per symbol, so
/// the word `ACG` has index `0b00_01_10 = 6`.
///
/// # Examples
///
/// ```rust
/// use genestart_core::sequence::{Alphabet, WordCodec};
///
/// let codec = WordCodec::for_alphabet(&Alphabet::dna());
/// assert_eq!(codec.bits_per_symbol(), 2);
/// assert_eq!(codec.word_index_of(&[0, 1, 2]), 6);
/// assert_eq!(codec.symbols_of(6, 3), vec![0, 1, 2]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordCodec {
    bits: u32,
}

impl WordCodec {
    /// Codec for an alphabet, using `ceil(log2(size_valid))` bits, at least 1.
    #[must_use]
    pub fn for_alphabet(alphabet: &Alphabet) -> Self {
        Self::with_valid_size(alphabet.size_valid())
    }

    #[must_use]
    pub fn with_valid_size(valid: usize) -> Self {
        let bits = valid.max(2).next_power_of_two().trailing_zeros();
        Self { bits }
    }

    #[must_use]
    pub const fn bits_per_symbol(&self) -> u32 {
        self.bits
    }

    /// Block size: number of word indices sharing one prefix
    #[must_use]
    pub const fn radix(&self) -> usize {
        1 << self.bits
    }

    /// Whether words of `len` symbols fit in the supported table size
    #[must_use]
    pub const fn supports_length(&self, len: usize) -> bool {
        (self.bits as usize) * len <= MAX_WORD_BITS as usize
    }

    /// Mask keeping the low `bits * len` bits of a rolling index
    #[must_use]
    pub const fn word_mask(&self, len: usize) -> u64 {
        let width = self.bits as usize * len;
        if width >= 64 {
            u64::MAX
        } else {
            (1u64 << width) - 1
        }
    }

    /// Number of cells in a table of words of `len` symbols
    #[must_use]
    pub const fn table_len(&self, len: usize) -> usize {
        1 << (self.bits as usize * len)
    }

    /// Index of a word; the symbols must be valid.
    #[must_use]
    pub fn word_index_of(&self, word: &[Symbol]) -> u64 {
        word.iter()
            .fold(0u64, |index, &s| (index << self.bits) | u64::from(s))
    }

    /// Symbols of the word of `len` symbols at `index`.
    #[must_use]
    pub fn symbols_of(&self, index: u64, len: usize) -> Vec<Symbol> {
        let symbol_mask = self.word_mask(1);
        (0..len)
            .rev()
            .map(|i| ((index >> (self.bits as usize * i)) & symbol_mask) as Symbol)
            .collect()
    }

    /// Appends a symbol to a rolling index and keeps the last `len` symbols.
    #[must_use]
    pub const fn push(&self, index: u64, symbol: Symbol, len: usize) -> u64 {
        ((index << self.bits) | symbol as u64) & self.word_mask(len)
    }
}
