//! Conditional probability models built from word counts.

use std::fmt;

use log::debug;
use rand::distributions::WeightedIndex;
use rand::prelude::*;

use crate::markov::joint::{
    elevate_joint, joint_to_conditional, marginalize_joint, normalize, prepend_uniform,
    sum_out_oldest,
};
use crate::markov::{Counts, Topology};
use crate::sequence::{Alphabet, WordCodec};
use crate::types::{GeneStartError, ProbabilityTable, Symbol};

/// Markov model of a given order and topology.
///
/// Every frame keeps a *ladder* of tables: level `k` holds words of `k + 1`
/// symbols. The top level is the frame's native order; lower levels are the
/// prefix marginals of the level above, used to score the first symbols of a
/// window where the full context is not available yet.
#[derive(Debug, Clone, PartialEq)]
pub struct Markov {
    alphabet: Alphabet,
    codec: WordCodec,
    order: usize,
    topology: Topology,
    joint: Vec<Vec<ProbabilityTable>>,
    conditional: Vec<Vec<ProbabilityTable>>,
}

impl Markov {
    /// Creates a model with all-zero tables.
    ///
    /// # Errors
    ///
    /// Returns [`GeneStartError::InvalidConfiguration`] for the same reasons as
    /// [`Counts::new`].
    pub fn new(alphabet: &Alphabet, order: usize, topology: Topology) -> Result<Self, GeneStartError> {
        let codec = WordCodec::for_alphabet(alphabet);
        topology.validate(order, &codec)?;
        let ladder = |f: usize| -> Vec<ProbabilityTable> {
            (0..=topology.frame_order(order, f))
                .map(|k| vec![0.0; codec.table_len(k + 1)])
                .collect()
        };
        let joint: Vec<_> = (0..topology.frame_count()).map(ladder).collect();
        Ok(Self {
            alphabet: alphabet.clone(),
            codec,
            order,
            topology,
            conditional: joint.clone(),
            joint,
        })
    }

    #[must_use]
    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
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
        self.joint.len()
    }

    /// Conditional table of a frame at its native order.
    ///
    /// Each cell holds `P(last symbol | preceding symbols)` of its word.
    #[must_use]
    pub fn conditional(&self, frame: usize) -> &[f64] {
        top(&self.conditional[frame])
    }

    /// Joint table of a frame at its native order
    #[must_use]
    pub fn joint(&self, frame: usize) -> &[f64] {
        top(&self.joint[frame])
    }

    /// Prefix marginal of a frame's joint table with words of `k + 1` symbols.
    ///
    /// Returns `None` when `k` exceeds the frame's order.
    #[must_use]
    pub fn joint_at_order(&self, frame: usize, k: usize) -> Option<&[f64]> {
        self.joint
            .get(frame)
            .and_then(|ladder| ladder.get(k))
            .map(Vec::as_slice)
    }

    /// Counts `sequences` on the forward strand and builds the model.
    ///
    /// # Errors
    ///
    /// Propagates errors of [`Counts::new`].
    pub fn construct<S: AsRef<[Symbol]>>(
        &mut self,
        sequences: &[S],
        pseudocount: f64,
    ) -> Result<(), GeneStartError> {
        let mut counts = Counts::new(&self.alphabet, self.order, self.topology)?;
        counts.construct(sequences);
        self.construct_from_counts(&counts, pseudocount)
    }

    /// Builds the probability tables from counts plus a pseudocount.
    ///
    /// # Errors
    ///
    /// Returns [`GeneStartError::ModelMismatch`] when the counts were
    /// collected with another alphabet, order or topology.
    pub fn construct_from_counts(&mut self, counts: &Counts, pseudocount: f64) -> Result<(), GeneStartError> {
        self.check_compatible(counts)?;

        let radix = self.codec.radix();
        for frame in 0..self.frame_count() {
            let len = self.topology.frame_order(self.order, frame) + 1;
            let mut table: ProbabilityTable = counts
                .frame(frame)
                .iter()
                .enumerate()
                .map(|(word, &c)| {
                    if self.is_valid_word(word, len) {
                        c as f64 + pseudocount
                    } else {
                        c as f64
                    }
                })
                .collect();
            normalize(&mut table);
            self.joint[frame] = build_ladder(table, radix);
            self.conditional[frame] = conditional_ladder(&self.joint[frame], radix);
        }
        Ok(())
    }

    /// Whether every symbol of a word of `len` symbols is valid.
    fn is_valid_word(&self, mut word: usize, len: usize) -> bool {
        let radix = self.codec.radix();
        (0..len).all(|_| {
            let symbol = (word % radix) as Symbol;
            word /= radix;
            self.alphabet.is_valid(symbol)
        })
    }

    fn check_compatible(&self, counts: &Counts) -> Result<(), GeneStartError> {
        if counts.alphabet() != &self.alphabet {
            return Err(GeneStartError::ModelMismatch {
                field: "alphabet",
                expected: self.alphabet.decode_all(&symbols_of(&self.alphabet)),
                found: counts.alphabet().decode_all(&symbols_of(counts.alphabet())),
            });
        }
        if counts.order() != self.order {
            return Err(GeneStartError::ModelMismatch {
                field: "order",
                expected: self.order.to_string(),
                found: counts.order().to_string(),
            });
        }
        if counts.topology() != self.topology {
            return Err(GeneStartError::ModelMismatch {
                field: "topology",
                expected: self.topology.to_string(),
                found: counts.topology().to_string(),
            });
        }
        Ok(())
    }

    /// Probability of a window, or its natural logarithm when `use_log`.
    ///
    /// An empty window evaluates to `-inf` (log) or `0`. Ambiguous symbols
    /// contribute a factor of one and reset the context. Non-uniform windows
    /// longer than the model length are scored on their first `length`
    /// symbols.
    #[must_use]
    pub fn evaluate(&self, window: &[Symbol], use_log: bool) -> f64 {
        if window.is_empty() {
            return if use_log { f64::NEG_INFINITY } else { 0.0 };
        }

        let mut score = if use_log { 0.0 } else { 1.0 };
        let mut index = 0u64;
        let mut valid_run = 0usize;

        for (position, &symbol) in window.iter().enumerate() {
            let Some(frame) = self.topology.frame_at(position) else {
                break;
            };
            if !self.alphabet.is_valid(symbol) {
                valid_run = 0;
                index = self.codec.push(index, 0, self.order + 1);
                continue;
            }
            index = self.codec.push(index, symbol, self.order + 1);

            if let Some(p) = self.symbol_probability(frame, index, valid_run) {
                if use_log {
                    score += p.ln();
                } else {
                    score *= p;
                }
            }
            valid_run += 1;
        }
        score
    }

    /// Probability of the last symbol of `index` given up to `valid_run`
    /// preceding symbols, or `None` when the symbol is not scored.
    fn symbol_probability(&self, frame: usize, index: u64, valid_run: usize) -> Option<f64> {
        let frame_order = self.topology.frame_order(self.order, frame);
        let context = valid_run.min(frame_order);
        let (ladder_frame, level) = match self.topology {
            Topology::NonUniform { .. } if context < frame_order => return None,
            Topology::Periodic { period } if context < frame_order => {
                ((frame + frame_order - context) % period, context)
            }
            Topology::Uniform => (0, context),
            _ => (frame, frame_order),
        };
        let word = (index & self.codec.word_mask(level + 1)) as usize;
        Some(self.conditional[ladder_frame][level][word])
    }

    /// Changes the order of the model in place.
    ///
    /// Raising the order spreads each word's joint mass over the next symbol
    /// using the current conditional probabilities (uniform and periodic
    /// models) or prepends an older, uniformly distributed symbol
    /// (non-uniform models). Lowering the order takes prefix marginals
    /// (uniform and periodic) or sums out the oldest symbol (non-uniform).
    ///
    /// # Errors
    ///
    /// Returns [`GeneStartError::InvalidConfiguration`] if the new order does
    /// not fit a table.
    pub fn change_order(&mut self, new_order: usize) -> Result<(), GeneStartError> {
        if new_order == self.order {
            return Ok(());
        }
        self.topology.validate(new_order, &self.codec)?;
        debug!("Changing {} model order from {} to {}", self.topology, self.order, new_order);

        let radix = self.codec.radix();
        let valid = self.alphabet.size_valid();
        let old_order = self.order;
        let frames = self.frame_count();

        let tops: Vec<ProbabilityTable> = match self.topology {
            Topology::Uniform => {
                vec![self.joint_at_any_order(new_order)]
            }
            Topology::Periodic { .. } if new_order > old_order => {
                let mut tops: Vec<ProbabilityTable> =
                    (0..frames).map(|f| self.joint(f).to_vec()).collect();
                let mut conditionals: Vec<ProbabilityTable> =
                    (0..frames).map(|f| self.conditional(f).to_vec()).collect();
                for _ in old_order..new_order {
                    let elevated: Vec<ProbabilityTable> = (0..frames)
                        .map(|g| {
                            let previous = (g + frames - 1) % frames;
                            elevate_joint(&tops[previous], &conditionals[g], radix, valid)
                        })
                        .collect();
                    conditionals = elevated
                        .iter()
                        .map(|j| joint_to_conditional(j, radix))
                        .collect();
                    tops = elevated;
                }
                tops
            }
            Topology::Periodic { .. } => {
                let diff = old_order - new_order;
                (0..frames)
                    .map(|g| self.joint[(g + diff) % frames][new_order].clone())
                    .collect()
            }
            Topology::NonUniform { .. } => (0..frames)
                .map(|f| {
                    let from = self.topology.frame_order(old_order, f);
                    let to = self.topology.frame_order(new_order, f);
                    let mut table = self.joint(f).to_vec();
                    for _ in to..from {
                        table = sum_out_oldest(&table, radix);
                    }
                    for _ in from..to {
                        table = prepend_uniform(&table, radix, valid);
                    }
                    table
                })
                .collect(),
        };

        self.order = new_order;
        self.joint = tops.into_iter().map(|t| build_ladder(t, radix)).collect();
        self.conditional = self
            .joint
            .iter()
            .map(|ladder| conditional_ladder(ladder, radix))
            .collect();
        Ok(())
    }

    /// Conditional table of a uniform model at any order.
    ///
    /// Orders up to the native one come from the marginal ladder; higher
    /// orders are obtained by raising the joint table.
    ///
    /// # Errors
    ///
    /// Returns [`GeneStartError::ModelMismatch`] for non-uniform topologies
    /// and [`GeneStartError::InvalidConfiguration`] if `k` does not fit a
    /// table.
    pub fn conditional_table_at_order(&self, k: usize) -> Result<ProbabilityTable, GeneStartError> {
        if self.topology != Topology::Uniform {
            return Err(GeneStartError::ModelMismatch {
                field: "topology",
                expected: Topology::Uniform.to_string(),
                found: self.topology.to_string(),
            });
        }
        if k <= self.order {
            return Ok(self.conditional[0][k].clone());
        }
        self.topology.validate(k, &self.codec)?;
        Ok(joint_to_conditional(
            &self.joint_at_any_order(k),
            self.codec.radix(),
        ))
    }

    /// Joint table of the single uniform frame at order `k`.
    fn joint_at_any_order(&self, k: usize) -> ProbabilityTable {
        let ladder = &self.joint[0];
        if k <= self.order {
            return ladder[k].clone();
        }
        let radix = self.codec.radix();
        let valid = self.alphabet.size_valid();
        let mut joint = top(ladder).to_vec();
        let mut conditional = top(&self.conditional[0]).to_vec();
        for _ in self.order..k {
            joint = elevate_joint(&joint, &conditional, radix, valid);
            conditional = joint_to_conditional(&joint, radix);
        }
        joint
    }

    /// Samples a sequence of `length` valid symbols from a uniform model.
    ///
    /// The first word is drawn from the joint table, every following symbol
    /// from the conditional block of its context.
    ///
    /// # Errors
    ///
    /// Returns [`GeneStartError::ModelMismatch`] for non-uniform topologies
    /// and [`GeneStartError::DegenerateDistribution`] if the model has no
    /// probability mass to draw from.
    pub fn emit<R: Rng + ?Sized>(&self, length: usize, rng: &mut R) -> Result<Vec<Symbol>, GeneStartError> {
        if self.topology != Topology::Uniform {
            return Err(GeneStartError::ModelMismatch {
                field: "topology",
                expected: Topology::Uniform.to_string(),
                found: self.topology.to_string(),
            });
        }
        if length == 0 {
            return Ok(Vec::new());
        }

        let head = length.min(self.order + 1);
        let first = draw(&self.joint[0][head - 1], rng)?;
        let mut emitted = self.codec.symbols_of(first as u64, head);

        let radix = self.codec.radix();
        let conditional = top(&self.conditional[0]);
        let mut index = first as u64;
        while emitted.len() < length {
            let context = (index & self.codec.word_mask(self.order)) as usize;
            let block = &conditional[context * radix..(context + 1) * radix];
            let symbol = draw(block, rng)? as Symbol;
            emitted.push(symbol);
            index = self.codec.push(index, symbol, self.order + 1);
        }
        Ok(emitted)
    }
}

impl fmt::Display for Markov {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# {} model of order {}", self.topology, self.order)?;
        for frame in 0..self.frame_count() {
            if self.frame_count() > 1 {
                writeln!(f, "# frame {}", frame)?;
            }
            let len = self.topology.frame_order(self.order, frame) + 1;
            let joint = self.joint(frame);
            let conditional = self.conditional(frame);
            for (word, (j, c)) in joint.iter().zip(conditional).enumerate() {
                let symbols = self.codec.symbols_of(word as u64, len);
                if symbols.iter().any(|&s| !self.alphabet.is_valid(s)) {
                    continue;
                }
                writeln!(
                    f,
                    "{}\t{:.6}\t{:.6}",
                    self.alphabet.decode_all(&symbols),
                    j,
                    c
                )?;
            }
        }
        Ok(())
    }
}

fn top(ladder: &[ProbabilityTable]) -> &[f64] {
    ladder.last().map(Vec::as_slice).unwrap_or(&[])
}

fn symbols_of(alphabet: &Alphabet) -> Vec<Symbol> {
    (0..alphabet.size()).map(|s| s as Symbol).collect()
}

/// Joint ladder from a top-level table, lowest order first.
fn build_ladder(top: ProbabilityTable, radix: usize) -> Vec<ProbabilityTable> {
    let mut ladder = vec![top];
    while ladder.last().map_or(0, Vec::len) > radix {
        let marginal = marginalize_joint(&ladder[ladder.len() - 1], radix);
        ladder.push(marginal);
    }
    ladder.reverse();
    ladder
}

fn conditional_ladder(joint: &[ProbabilityTable], radix: usize) -> Vec<ProbabilityTable> {
    joint
        .iter()
        .map(|table| joint_to_conditional(table, radix))
        .collect()
}

fn draw<R: Rng + ?Sized>(weights: &[f64], rng: &mut R) -> Result<usize, GeneStartError> {
    let dist = WeightedIndex::new(weights)
        .map_err(|e| GeneStartError::DegenerateDistribution(e.to_string()))?;
    Ok(dist.sample(rng))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::PROBABILITY_TOLERANCE;
    use crate::sequence::NumericSequence;
    use bio::bio_types::strand::Strand;
    use rand::SeedableRng;
    use rand_xoshiro::Xoroshiro128PlusPlus;

    fn dna() -> Alphabet {
        Alphabet::dna()
    }

    fn encode(text: &[u8]) -> NumericSequence {
        NumericSequence::encode(text, &dna()).unwrap()
    }

    fn assert_blocks_normalized(model: &Markov) {
        for frame in 0..model.frame_count() {
            let joint = model.joint(frame);
            for (block, mass) in model
                .conditional(frame)
                .chunks(4)
                .zip(joint.chunks(4))
            {
                let sum: f64 = block.iter().sum();
                if mass.iter().sum::<f64>() > 0.0 {
                    assert!((sum - 1.0).abs() < PROBABILITY_TOLERANCE);
                } else {
                    assert_eq!(sum, 0.0);
                }
            }
        }
    }

    fn trained(order: usize, topology: Topology, text: &[u8]) -> Markov {
        let mut model = Markov::new(&dna(), order, topology).unwrap();
        model.construct(&[encode(text)], 1.0).unwrap();
        model
    }

    #[test]
    fn test_construct_from_counts_normalizes() {
        let model = trained(2, Topology::Uniform, b"ATGAAACGCATTAGCACCACCATTACCACCACCATCACCATTACCACAGGTAACGGTGCGGGCTGA");
        assert_blocks_normalized(&model);
        let total: f64 = model.joint(0).iter().sum();
        assert!((total - 1.0).abs() < PROBABILITY_TOLERANCE);
        assert_eq!(model.joint_at_order(0, 0).unwrap().len(), 4);
        assert_eq!(model.joint_at_order(0, 1).unwrap().len(), 16);
        assert!(model.joint_at_order(0, 3).is_none());
    }

    #[test]
    fn test_zero_pseudocount_leaves_empty_blocks_zero() {
        let mut model = Markov::new(&dna(), 1, Topology::Uniform).unwrap();
        model.construct(&[encode(b"AAAAC")], 0.0).unwrap();
        assert_blocks_normalized(&model);
        // context G never seen
        assert_eq!(model.conditional(0)[8..12].iter().sum::<f64>(), 0.0);
        assert!((model.conditional(0)[0] - 0.75).abs() < PROBABILITY_TOLERANCE);
    }

    #[test]
    fn test_pseudocount_skips_words_with_unused_codes() {
        let alphabet = Alphabet::new(b"ACG", b"N", &[]);
        let sequence = NumericSequence::encode(b"ACGANCA", &alphabet).unwrap();

        let mut model = Markov::new(&alphabet, 0, Topology::Uniform).unwrap();
        model.construct(&[&sequence], 1.0).unwrap();
        let conditional = model.conditional(0);
        // A: 3, C: 2, G: 1 plus one pseudocount each
        assert!((conditional[0] - 4.0 / 9.0).abs() < PROBABILITY_TOLERANCE);
        assert!((conditional[2] - 2.0 / 9.0).abs() < PROBABILITY_TOLERANCE);
        assert_eq!(conditional[3], 0.0);

        let mut model = Markov::new(&alphabet, 1, Topology::Uniform).unwrap();
        model.construct(&[&sequence], 1.0).unwrap();
        for context in 0..3 {
            let block = &model.conditional(0)[context * 4..context * 4 + 4];
            assert!((block[..3].iter().sum::<f64>() - 1.0).abs() < PROBABILITY_TOLERANCE);
            assert_eq!(block[3], 0.0);
        }
        assert_eq!(model.conditional(0)[12..16].iter().sum::<f64>(), 0.0);
    }

    #[test]
    fn test_order_mismatch_is_reported() {
        let alphabet = dna();
        let mut counts = Counts::new(&alphabet, 1, Topology::Uniform).unwrap();
        counts.count(&encode(b"ACGT"), Strand::Forward);
        let mut model = Markov::new(&alphabet, 2, Topology::Uniform).unwrap();

        let err = model.construct_from_counts(&counts, 1.0).unwrap_err();
        match err {
            GeneStartError::ModelMismatch { field, expected, found } => {
                assert_eq!(field, "order");
                assert_eq!(expected, "2");
                assert_eq!(found, "1");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_topology_mismatch_is_reported() {
        let alphabet = dna();
        let counts = Counts::new(&alphabet, 0, Topology::Periodic { period: 3 }).unwrap();
        let mut model = Markov::new(&alphabet, 0, Topology::Periodic { period: 2 }).unwrap();
        assert!(matches!(
            model.construct_from_counts(&counts, 1.0),
            Err(GeneStartError::ModelMismatch { field: "topology", .. })
        ));
    }

    #[test]
    fn test_evaluate_order_zero() {
        let model = trained(0, Topology::Uniform, b"AAAC");
        // joint with pseudocount 1: A 4/8, C 2/8, G 1/8, T 1/8
        let p = model.evaluate(&encode(b"AC"), false);
        assert!((p - 0.5 * 0.25).abs() < PROBABILITY_TOLERANCE);
        let log_p = model.evaluate(&encode(b"AC"), true);
        assert!((log_p - p.ln()).abs() < PROBABILITY_TOLERANCE);
    }

    #[test]
    fn test_evaluate_empty_window() {
        let model = trained(1, Topology::Uniform, b"ACGT");
        assert_eq!(model.evaluate(&[], true), f64::NEG_INFINITY);
        assert_eq!(model.evaluate(&[], false), 0.0);
    }

    #[test]
    fn test_evaluate_ambiguous_symbols_are_neutral() {
        let model = trained(0, Topology::Uniform, b"AAAC");
        let with_n = model.evaluate(&encode(b"ANC"), false);
        let without = model.evaluate(&encode(b"AC"), false);
        assert!((with_n - without).abs() < PROBABILITY_TOLERANCE);
    }

    #[test]
    fn test_evaluate_uses_lower_order_at_window_start() {
        let model = trained(1, Topology::Uniform, b"ACGTTGCAAC");
        let window = encode(b"GA");
        let marginal = joint_to_conditional(model.joint_at_order(0, 0).unwrap(), 4);
        let expected = marginal[2] * model.conditional(0)[8];
        assert!((model.evaluate(&window, false) - expected).abs() < PROBABILITY_TOLERANCE);
    }

    #[test]
    fn test_evaluate_periodic_start_uses_matching_frame() {
        let model = trained(1, Topology::Periodic { period: 3 }, b"ATGAAACGCATTAGCACC");
        let window = encode(b"CA");
        // first symbol: frame 0 single-symbol marginal, taken from frame 1's ladder
        let first = joint_to_conditional(model.joint_at_order(1, 0).unwrap(), 4)[1];
        let second = model.conditional(1)[4];
        let expected = first * second;
        assert!((model.evaluate(&window, false) - expected).abs() < PROBABILITY_TOLERANCE);
    }

    #[test]
    fn test_evaluate_non_uniform() {
        let alphabet = dna();
        let topology = Topology::NonUniform { length: 3 };
        let mut counts = Counts::new(&alphabet, 1, topology).unwrap();
        counts.count(&encode(b"AGG"), Strand::Forward);
        counts.count(&encode(b"AGG"), Strand::Forward);
        let mut model = Markov::new(&alphabet, 1, topology).unwrap();
        model.construct_from_counts(&counts, 0.0).unwrap();

        assert!((model.evaluate(&encode(b"AGG"), false) - 1.0).abs() < PROBABILITY_TOLERANCE);
        assert_eq!(model.evaluate(&encode(b"AGC"), false), 0.0);
        // the G after N has no context and is not scored
        assert!((model.evaluate(&encode(b"ANG"), false) - 1.0).abs() < PROBABILITY_TOLERANCE);
        // symbols past the model length are ignored
        assert!((model.evaluate(&encode(b"AGGT"), false) - 1.0).abs() < PROBABILITY_TOLERANCE);
    }

    #[test]
    fn test_change_order_uniform_round_trip() {
        let mut model = trained(1, Topology::Uniform, b"ATGAAACGCATTAGCACCACCATTACC");
        let original = model.clone();

        model.change_order(3).unwrap();
        assert_eq!(model.order(), 3);
        assert_eq!(model.joint(0).len(), 256);
        assert_blocks_normalized(&model);
        // raising keeps the conditional probabilities of the native order
        for word in 0..256 {
            let expected = original.conditional(0)[word % 16];
            assert!((model.conditional(0)[word] - expected).abs() < 1e-9);
        }

        model.change_order(1).unwrap();
        for (a, b) in model.joint(0).iter().zip(original.joint(0)) {
            assert!((a - b).abs() < 1e-12);
        }
    }

    #[test]
    fn test_change_order_periodic() {
        let text = b"ATGAAACGCATTAGCACCACCATTACCACCACCATCACCATTACCACAGG";
        let mut model = trained(1, Topology::Periodic { period: 3 }, text);
        let original = model.clone();

        model.change_order(2).unwrap();
        assert_blocks_normalized(&model);
        for g in 0..3 {
            let total: f64 = model.joint(g).iter().sum();
            assert!((total - 1.0).abs() < 1e-9);
            // the prefix marginal of the raised frame is the previous frame
            let previous = (g + 2) % 3;
            let marginal = model.joint_at_order(g, 1).unwrap();
            for (a, b) in marginal.iter().zip(original.joint(previous)) {
                assert!((a - b).abs() < 1e-12);
            }
        }

        model.change_order(1).unwrap();
        for g in 0..3 {
            for (a, b) in model.joint(g).iter().zip(original.joint(g)) {
                assert!((a - b).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_change_order_non_uniform() {
        let alphabet = dna();
        let topology = Topology::NonUniform { length: 4 };
        let mut model = Markov::new(&alphabet, 0, topology).unwrap();
        model
            .construct(&[encode(b"AGGA"), encode(b"AGGT")], 0.5)
            .unwrap();
        let original = model.clone();

        model.change_order(2).unwrap();
        assert_eq!(model.joint(0).len(), 4);
        assert_eq!(model.joint(1).len(), 16);
        assert_eq!(model.joint(3).len(), 64);
        assert_blocks_normalized(&model);
        for frame in 0..4 {
            let cond = model.conditional(frame);
            for (word, &p) in cond.iter().enumerate() {
                assert!((p - original.conditional(frame)[word % 4]).abs() < 1e-12);
            }
        }

        model.change_order(0).unwrap();
        for frame in 0..4 {
            assert_eq!(model.joint(frame).len(), 4);
            for (a, b) in model.joint(frame).iter().zip(original.joint(frame)) {
                assert!((a - b).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_conditional_table_at_order() {
        let model = trained(1, Topology::Uniform, b"ACGTTGCAAC");
        assert_eq!(model.conditional_table_at_order(1).unwrap(), model.conditional(0));
        assert_eq!(model.conditional_table_at_order(0).unwrap().len(), 4);
        let raised = model.conditional_table_at_order(2).unwrap();
        assert_eq!(raised.len(), 64);
        for word in 0..64 {
            assert!((raised[word] - model.conditional(0)[word % 16]).abs() < 1e-9);
        }

        let periodic = trained(0, Topology::Periodic { period: 3 }, b"ACGT");
        assert!(periodic.conditional_table_at_order(0).is_err());
    }

    #[test]
    fn test_emit_is_reproducible() {
        let model = trained(2, Topology::Uniform, b"ACGTTGCAACGGTACCATG");
        let mut rng = Xoroshiro128PlusPlus::seed_from_u64(7);
        let first = model.emit(50, &mut rng).unwrap();
        let mut rng = Xoroshiro128PlusPlus::seed_from_u64(7);
        let second = model.emit(50, &mut rng).unwrap();
        assert_eq!(first.len(), 50);
        assert_eq!(first, second);
        assert!(first.iter().all(|&s| s < 4));
        assert_eq!(model.emit(2, &mut rng).unwrap().len(), 2);
        assert!(model.emit(0, &mut rng).unwrap().is_empty());
    }

    #[test]
    fn test_emit_follows_deterministic_model() {
        let mut model = Markov::new(&dna(), 1, Topology::Uniform).unwrap();
        model.construct(&[encode(b"ACACACACAC")], 0.0).unwrap();
        let mut rng = Xoroshiro128PlusPlus::seed_from_u64(1);
        let emitted = model.emit(8, &mut rng).unwrap();
        for pair in emitted.windows(2) {
            assert_ne!(pair[0], pair[1]);
        }
    }

    #[test]
    fn test_emit_degenerate_model() {
        let model = Markov::new(&dna(), 1, Topology::Uniform).unwrap();
        let mut rng = Xoroshiro128PlusPlus::seed_from_u64(1);
        assert!(matches!(
            model.emit(5, &mut rng),
            Err(GeneStartError::DegenerateDistribution(_))
        ));
    }

    #[test]
    fn test_display_lists_words() {
        let model = trained(0, Topology::Uniform, b"AAAC");
        let rendered = model.to_string();
        assert!(rendered.starts_with("# uniform model of order 0\n"));
        assert!(rendered.contains("A\t0.500000\t0.500000\n"));
        assert_eq!(rendered.lines().count(), 5);
    }
}
