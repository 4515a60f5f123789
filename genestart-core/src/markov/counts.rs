//! Word frequency tables.

use bio::bio_types::strand::Strand;

use crate::markov::Topology;
use crate::sequence::{Alphabet, WordCodec};
use crate::types::{CountTable, GeneStartError, Symbol};

/// Frequency tables of words of `order + 1` symbols, one table per frame.
///
/// `count` and `decount` are exact inverses: after `count(w, s)` followed by
/// `decount(w, s)` every table is restored.
#[derive(Debug, Clone, PartialEq)]
pub struct Counts {
    alphabet: Alphabet,
    codec: WordCodec,
    order: usize,
    topology: Topology,
    tables: Vec<CountTable>,
}

impl Counts {
    /// Creates empty tables.
    ///
    /// # Errors
    ///
    /// Returns [`GeneStartError::InvalidConfiguration`] for a zero length or
    /// period, or when words of `order + 1` symbols do not fit a table.
    pub fn new(alphabet: &Alphabet, order: usize, topology: Topology) -> Result<Self, GeneStartError> {
        let codec = WordCodec::for_alphabet(alphabet);
        topology.validate(order, &codec)?;
        let tables = (0..topology.frame_count())
            .map(|f| vec![0; codec.table_len(topology.frame_order(order, f) + 1)])
            .collect();
        Ok(Self {
            alphabet: alphabet.clone(),
            codec,
            order,
            topology,
            tables,
        })
    }

    #[must_use]
    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    #[must_use]
    pub const fn codec(&self) -> WordCodec {
        self.codec
    }

    #[must_use]
    pub const fn order(&self) -> usize {
        self.order
    }

    #[must_use]
    pub const fn topology(&self) -> Topology {
        self.topology
    }

    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.tables.len()
    }

    /// Table of one frame
    ///
    /// # Panics
    ///
    /// Panics if `frame` is not below [`Counts::frame_count`].
    #[must_use]
    pub fn frame(&self, frame: usize) -> &[u64] {
        &self.tables[frame]
    }

    /// Sum of all cells of all frames
    #[must_use]
    pub fn total(&self) -> u64 {
        self.tables.iter().flatten().sum()
    }

    pub fn reset_counts(&mut self) {
        for table in &mut self.tables {
            table.fill(0);
        }
    }

    /// Counts every word of a window.
    ///
    /// On [`Strand::Reverse`] the reverse complement of the window is
    /// counted; any other strand reads the window as is.
    pub fn count(&mut self, window: &[Symbol], strand: Strand) {
        let words: Vec<(usize, usize)> = self.walk(window, strand).collect();
        for (frame, word) in words {
            self.tables[frame][word] += 1;
        }
    }

    /// Removes every word of a window that an identical `count` call added.
    ///
    /// # Errors
    ///
    /// Returns [`GeneStartError::CountUnderflow`] if a cell would go below
    /// zero; decrements already applied by this call are rolled back.
    pub fn decount(&mut self, window: &[Symbol], strand: Strand) -> Result<(), GeneStartError> {
        let words: Vec<(usize, usize)> = self.walk(window, strand).collect();
        for (applied, &(frame, word)) in words.iter().enumerate() {
            if self.tables[frame][word] == 0 {
                for &(f, w) in &words[..applied] {
                    self.tables[f][w] += 1;
                }
                return Err(GeneStartError::CountUnderflow { frame, word });
            }
            self.tables[frame][word] -= 1;
        }
        Ok(())
    }

    /// Resets the tables and counts every sequence on the forward strand.
    pub fn construct<S: AsRef<[Symbol]>>(&mut self, sequences: &[S]) {
        self.reset_counts();
        for sequence in sequences {
            self.count(sequence.as_ref(), Strand::Forward);
        }
    }

    fn walk<'a>(&'a self, window: &'a [Symbol], strand: Strand) -> WordWalk<'a> {
        WordWalk::new(self, window, strand == Strand::Reverse)
    }
}

/// Rolling walk over the countable words of a window.
///
/// Yields `(frame, word index)` for every position whose preceding
/// `frame order` symbols and itself are valid.
pub(crate) struct WordWalk<'a> {
    window: &'a [Symbol],
    alphabet: &'a Alphabet,
    codec: WordCodec,
    order: usize,
    topology: Topology,
    reverse: bool,
    position: usize,
    index: u64,
    suppress: usize,
}

impl<'a> WordWalk<'a> {
    fn new(counts: &'a Counts, window: &'a [Symbol], reverse: bool) -> Self {
        let suppress = if counts.topology.primes_context() {
            counts.order
        } else {
            0
        };
        Self {
            window,
            alphabet: &counts.alphabet,
            codec: counts.codec,
            order: counts.order,
            topology: counts.topology,
            reverse,
            position: 0,
            index: 0,
            suppress,
        }
    }

    fn symbol_at(&self, position: usize) -> Symbol {
        if self.reverse {
            let s = self.window[self.window.len() - 1 - position];
            self.alphabet.complement(s)
        } else {
            self.window[position]
        }
    }
}

impl Iterator for WordWalk<'_> {
    type Item = (usize, usize);

    fn next(&mut self) -> Option<Self::Item> {
        while self.position < self.window.len() {
            let frame = self.topology.frame_at(self.position)?;
            let mut symbol = self.symbol_at(self.position);
            self.position += 1;

            if !self.alphabet.is_valid(symbol) {
                self.suppress = self.order + 1;
                symbol = 0;
            }
            self.index = self.codec.push(self.index, symbol, self.order + 1);

            if self.suppress > 0 {
                self.suppress -= 1;
                continue;
            }

            let word_len = self.topology.frame_order(self.order, frame) + 1;
            let word = self.index & self.codec.word_mask(word_len);
            return Some((frame, word as usize));
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence::NumericSequence;

    fn encode(text: &[u8]) -> NumericSequence {
        NumericSequence::encode(text, &Alphabet::dna()).unwrap()
    }

    fn word(text: &[u8]) -> usize {
        let codec = WordCodec::for_alphabet(&Alphabet::dna());
        codec.word_index_of(encode(text).as_slice()) as usize
    }

    #[test]
    fn test_uniform_counts_words() {
        let mut counts = Counts::new(&Alphabet::dna(), 1, Topology::Uniform).unwrap();
        counts.count(&encode(b"ACGAC"), Strand::Forward);
        assert_eq!(counts.total(), 4);
        assert_eq!(counts.frame(0)[word(b"AC")], 2);
        assert_eq!(counts.frame(0)[word(b"CG")], 1);
        assert_eq!(counts.frame(0)[word(b"GA")], 1);
        assert_eq!(counts.frame(0).len(), 16);
    }

    #[test]
    fn test_short_window_counts_nothing() {
        let mut counts = Counts::new(&Alphabet::dna(), 2, Topology::Uniform).unwrap();
        counts.count(&encode(b"AC"), Strand::Forward);
        assert_eq!(counts.total(), 0);
        counts.count(&[], Strand::Forward);
        assert_eq!(counts.total(), 0);
    }

    #[test]
    fn test_ambiguous_symbol_suppresses_words() {
        let mut counts = Counts::new(&Alphabet::dna(), 1, Topology::Uniform).unwrap();
        counts.count(&encode(b"ACNGTA"), Strand::Forward);
        // AC, GT, TA; CN and NG are skipped
        assert_eq!(counts.total(), 3);
        assert_eq!(counts.frame(0)[word(b"AC")], 1);
        assert_eq!(counts.frame(0)[word(b"GT")], 1);
        assert_eq!(counts.frame(0)[word(b"TA")], 1);
    }

    #[test]
    fn test_periodic_frames() {
        let mut counts = Counts::new(&Alphabet::dna(), 0, Topology::Periodic { period: 3 }).unwrap();
        counts.count(&encode(b"ACGTAC"), Strand::Forward);
        assert_eq!(counts.frame(0)[word(b"A")], 1);
        assert_eq!(counts.frame(0)[word(b"T")], 1);
        assert_eq!(counts.frame(1)[word(b"C")], 1);
        assert_eq!(counts.frame(1)[word(b"A")], 1);
        assert_eq!(counts.frame(2)[word(b"G")], 1);
        assert_eq!(counts.frame(2)[word(b"C")], 1);
    }

    #[test]
    fn test_periodic_frame_follows_last_symbol() {
        let mut counts = Counts::new(&Alphabet::dna(), 1, Topology::Periodic { period: 3 }).unwrap();
        counts.count(&encode(b"ACGT"), Strand::Forward);
        assert_eq!(counts.frame(0)[word(b"GT")], 1);
        assert_eq!(counts.frame(1)[word(b"AC")], 1);
        assert_eq!(counts.frame(2)[word(b"CG")], 1);
        assert_eq!(counts.total(), 3);
    }

    #[test]
    fn test_non_uniform_short_frames() {
        let topology = Topology::NonUniform { length: 4 };
        let mut counts = Counts::new(&Alphabet::dna(), 2, topology).unwrap();
        assert_eq!(counts.frame(0).len(), 4);
        assert_eq!(counts.frame(1).len(), 16);
        assert_eq!(counts.frame(2).len(), 64);
        assert_eq!(counts.frame(3).len(), 64);

        counts.count(&encode(b"TGCAAA"), Strand::Forward);
        assert_eq!(counts.frame(0)[word(b"T")], 1);
        assert_eq!(counts.frame(1)[word(b"TG")], 1);
        assert_eq!(counts.frame(2)[word(b"TGC")], 1);
        assert_eq!(counts.frame(3)[word(b"GCA")], 1);
        // the walk stops after the last frame
        assert_eq!(counts.total(), 4);
    }

    #[test]
    fn test_non_uniform_window_shorter_than_order() {
        let topology = Topology::NonUniform { length: 4 };
        let mut counts = Counts::new(&Alphabet::dna(), 2, topology).unwrap();
        counts.count(&encode(b"TG"), Strand::Forward);
        assert_eq!(counts.frame(0)[word(b"T")], 1);
        assert_eq!(counts.frame(1)[word(b"TG")], 1);
        assert_eq!(counts.total(), 2);
    }

    #[test]
    fn test_reverse_strand_matches_reverse_complement() {
        let alphabet = Alphabet::dna();
        let window = encode(b"AACG");
        let mut reverse = Counts::new(&alphabet, 1, Topology::Uniform).unwrap();
        reverse.count(&window, Strand::Reverse);

        let mut forward = Counts::new(&alphabet, 1, Topology::Uniform).unwrap();
        forward.count(&encode(b"CGTT"), Strand::Forward);

        assert_eq!(reverse, forward);
    }

    #[test]
    fn test_count_decount_round_trip() {
        let alphabet = Alphabet::dna();
        let mut counts = Counts::new(&alphabet, 2, Topology::Periodic { period: 3 }).unwrap();
        counts.count(&encode(b"ATGAAACGCATTAGCACC"), Strand::Forward);
        let snapshot = counts.clone();

        let window = encode(b"GGNTACCA");
        counts.count(&window, Strand::Forward);
        counts.count(&window, Strand::Reverse);
        counts.decount(&window, Strand::Reverse).unwrap();
        counts.decount(&window, Strand::Forward).unwrap();
        assert_eq!(counts, snapshot);
    }

    #[test]
    fn test_decount_underflow_rolls_back() {
        let mut counts = Counts::new(&Alphabet::dna(), 0, Topology::Uniform).unwrap();
        counts.count(&encode(b"AC"), Strand::Forward);
        let snapshot = counts.clone();

        let err = counts.decount(&encode(b"ACG"), Strand::Forward).unwrap_err();
        assert!(matches!(
            err,
            GeneStartError::CountUnderflow { frame: 0, word: 2 }
        ));
        assert_eq!(counts, snapshot);
    }

    #[test]
    fn test_construct_resets() {
        let mut counts = Counts::new(&Alphabet::dna(), 0, Topology::Uniform).unwrap();
        counts.count(&encode(b"TTTT"), Strand::Forward);
        counts.construct(&[encode(b"AC"), encode(b"G")]);
        assert_eq!(counts.total(), 3);
        assert_eq!(counts.frame(0)[word(b"T")], 0);

        counts.reset_counts();
        assert_eq!(counts.total(), 0);
    }

    #[test]
    fn test_new_rejects_large_order() {
        let result = Counts::new(&Alphabet::dna(), 20, Topology::Uniform);
        assert!(matches!(
            result,
            Err(GeneStartError::InvalidConfiguration(_))
        ));
    }
}
