//! Motif and background models trained on one alignment.

use bio::bio_types::strand::Strand;
use rand::Rng;

use crate::config::MotifFinderConfig;
use crate::markov::{Counts, Markov, Topology};
use crate::motif::distribution::{argmax, PositionDistribution};
use crate::sequence::Alphabet;
use crate::types::{AlignmentMode, GeneStartError, ProbabilityTable, Symbol};

/// Count tables and probability models of a motif alignment.
///
/// Each aligned sequence contributes its motif window to the position-specific
/// motif counts, the flanks on both sides of the window to the uniform
/// background counts and, when aligned, one tally to the offset histogram.
/// Sequences can be removed and re-added one at a time, which is the core
/// step of Gibbs sampling.
///
/// # Examples
///
/// ```rust
/// use genestart_core::config::MotifFinderConfig;
/// use genestart_core::motif::MotifBundle;
/// use genestart_core::sequence::{Alphabet, NumericSequence};
///
/// let alphabet = Alphabet::dna();
/// let config = MotifFinderConfig { width: 4, ..Default::default() };
/// let sequences: Vec<NumericSequence> = ["TTAGGAT", "CAGGACC"]
///     .iter()
///     .map(|s| NumericSequence::encode(s.as_bytes(), &alphabet))
///     .collect::<Result<_, _>>()?;
///
/// let bundle = MotifBundle::from_alignment(&alphabet, &config, &sequences, &[2, 1])?;
/// assert!(bundle.compute_cll() > 0.0);
/// assert_eq!(bundle.sample_position(&sequences[0], true, &mut rand::thread_rng())?, 2);
/// # Ok::<(), genestart_core::types::GeneStartError>(())
/// ```
#[derive(Debug, Clone)]
pub struct MotifBundle {
    config: MotifFinderConfig,
    motif_counts: Counts,
    background_counts: Counts,
    offset_counts: Vec<u64>,
    motif: Markov,
    background: Markov,
    background_tables: Vec<ProbabilityTable>,
    offsets: Option<PositionDistribution>,
}

impl MotifBundle {
    /// Creates empty tables for `max_offsets` motif offsets per sequence.
    ///
    /// # Errors
    ///
    /// Returns [`GeneStartError::InvalidConfiguration`] if the configuration
    /// is invalid or its orders do not fit a table.
    pub fn new(
        alphabet: &Alphabet,
        config: &MotifFinderConfig,
        max_offsets: usize,
    ) -> Result<Self, GeneStartError> {
        config.validate()?;
        let motif_topology = Topology::NonUniform {
            length: config.width,
        };
        Ok(Self {
            config: config.clone(),
            motif_counts: Counts::new(alphabet, config.motif_order, motif_topology)?,
            background_counts: Counts::new(alphabet, config.background_order, Topology::Uniform)?,
            offset_counts: vec![0; max_offsets],
            motif: Markov::new(alphabet, config.motif_order, motif_topology)?,
            background: Markov::new(alphabet, config.background_order, Topology::Uniform)?,
            background_tables: Vec::new(),
            offsets: None,
        })
    }

    /// Counts an alignment and builds the probability models.
    ///
    /// # Errors
    ///
    /// Returns an error if `positions` does not hold one offset per sequence,
    /// if a sequence is shorter than the motif or an offset is out of range.
    pub fn from_alignment<S: AsRef<[Symbol]>>(
        alphabet: &Alphabet,
        config: &MotifFinderConfig,
        sequences: &[S],
        positions: &[usize],
    ) -> Result<Self, GeneStartError> {
        let max_offsets = max_offsets(sequences, config.width);
        let mut bundle = Self::new(alphabet, config, max_offsets)?;
        bundle.recount(sequences, positions)?;
        bundle.construct()?;
        Ok(bundle)
    }

    /// Clears all tallies and counts the given alignment.
    ///
    /// The probability models are not rebuilt; call [`MotifBundle::construct`].
    ///
    /// # Errors
    ///
    /// See [`MotifBundle::from_alignment`].
    pub fn recount<S: AsRef<[Symbol]>>(
        &mut self,
        sequences: &[S],
        positions: &[usize],
    ) -> Result<(), GeneStartError> {
        if sequences.len() != positions.len() {
            return Err(GeneStartError::InvalidConfiguration(format!(
                "{} motif positions given for {} sequences",
                positions.len(),
                sequences.len()
            )));
        }
        self.motif_counts.reset_counts();
        self.background_counts.reset_counts();
        self.offset_counts.fill(0);

        for (index, (sequence, &position)) in sequences.iter().zip(positions).enumerate() {
            self.count(sequence.as_ref(), position)
                .map_err(|e| with_sequence_index(e, index))?;
        }
        Ok(())
    }

    /// Adds one aligned sequence to the tallies.
    ///
    /// # Errors
    ///
    /// Returns [`GeneStartError::SequenceTooShort`] or
    /// [`GeneStartError::InvalidMotifPosition`]; the tallies are unchanged.
    pub fn count(&mut self, sequence: &[Symbol], position: usize) -> Result<(), GeneStartError> {
        let width = self.config.width;
        let offset = self.checked_offset(sequence, position)?;

        self.motif_counts
            .count(&sequence[position..position + width], Strand::Forward);
        self.background_counts
            .count(&sequence[..position], Strand::Forward);
        self.background_counts
            .count(&sequence[position + width..], Strand::Forward);

        if let Some(offset) = offset {
            if offset >= self.offset_counts.len() {
                self.offset_counts.resize(offset + 1, 0);
            }
            self.offset_counts[offset] += 1;
        }
        Ok(())
    }

    /// Removes one aligned sequence that was added with the same offset.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`MotifBundle::count`] and
    /// [`GeneStartError::CountUnderflow`] when the sequence was not counted;
    /// the tallies are unchanged on error.
    pub fn decount(&mut self, sequence: &[Symbol], position: usize) -> Result<(), GeneStartError> {
        let width = self.config.width;
        let offset = self.checked_offset(sequence, position)?;
        if let Some(offset) = offset {
            if self.offset_counts.get(offset).copied().unwrap_or(0) == 0 {
                return Err(GeneStartError::CountUnderflow {
                    frame: 0,
                    word: offset,
                });
            }
        }

        let motif = &sequence[position..position + width];
        let left = &sequence[..position];
        let right = &sequence[position + width..];

        self.motif_counts.decount(motif, Strand::Forward)?;
        if let Err(e) = self.background_counts.decount(left, Strand::Forward) {
            self.motif_counts.count(motif, Strand::Forward);
            return Err(e);
        }
        if let Err(e) = self.background_counts.decount(right, Strand::Forward) {
            self.background_counts.count(left, Strand::Forward);
            self.motif_counts.count(motif, Strand::Forward);
            return Err(e);
        }
        if let Some(offset) = offset {
            self.offset_counts[offset] -= 1;
        }
        Ok(())
    }

    /// Rebuilds every probability model from the current tallies.
    ///
    /// # Errors
    ///
    /// Propagates construction errors of the Markov models.
    pub fn construct(&mut self) -> Result<(), GeneStartError> {
        let pseudocounts = self.config.pseudocounts;
        self.motif
            .construct_from_counts(&self.motif_counts, pseudocounts)?;
        self.background
            .construct_from_counts(&self.background_counts, pseudocounts)?;

        self.background_tables = (0..=self.config.motif_order)
            .map(|k| self.background.conditional_table_at_order(k))
            .collect::<Result<_, _>>()?;

        self.offsets = if self.config.alignment.is_aligned() {
            let weights: Vec<f64> = self
                .offset_counts
                .iter()
                .map(|&c| c as f64 + pseudocounts)
                .collect();
            let distribution = if weights.iter().sum::<f64>() > 0.0 {
                PositionDistribution::from_weights(&weights)?
            } else {
                PositionDistribution::from_weights(&vec![1.0; weights.len().max(1)])?
            };
            Some(distribution)
        } else {
            None
        };
        Ok(())
    }

    /// Conditional log-likelihood of the counted alignment.
    ///
    /// Sums `count * ln(motif / background)` over every motif position and
    /// word, with the background taken at the order of the motif position;
    /// cells with a zero or undefined ratio are skipped. When aligned, adds
    /// `count * ln(p)` over the offsets of non-zero probability.
    #[must_use]
    pub fn compute_cll(&self) -> f64 {
        let topology = self.motif_counts.topology();
        let mut score = 0.0;

        for frame in 0..self.motif_counts.frame_count() {
            let level = topology.frame_order(self.config.motif_order, frame);
            let Some(background) = self.background_tables.get(level) else {
                continue;
            };
            let counts = self.motif_counts.frame(frame);
            let motif = self.motif.conditional(frame);
            for (word, &count) in counts.iter().enumerate() {
                if count == 0 {
                    continue;
                }
                let ratio = motif[word] / background[word];
                if ratio > 0.0 && ratio.is_finite() {
                    score += count as f64 * ratio.ln();
                }
            }
        }

        if let Some(offsets) = &self.offsets {
            for (offset, &count) in self.offset_counts.iter().enumerate() {
                let p = offsets.probability(offset);
                if p > 0.0 {
                    score += count as f64 * p.ln();
                }
            }
        }
        score
    }

    /// Log-odds score of a motif occurrence at `position`.
    ///
    /// `ln P_motif(window) - ln P_background(window)`, plus the log
    /// probability of the offset when aligned. A window the motif cannot
    /// produce scores `-inf`; one only the background cannot produce scores
    /// `+inf`.
    ///
    /// # Errors
    ///
    /// Returns [`GeneStartError::SequenceTooShort`] or
    /// [`GeneStartError::InvalidMotifPosition`].
    pub fn position_score(&self, sequence: &[Symbol], position: usize) -> Result<f64, GeneStartError> {
        let offset = self.checked_offset(sequence, position)?;
        let window = &sequence[position..position + self.config.width];

        let motif = self.motif.evaluate(window, true);
        if motif == f64::NEG_INFINITY {
            return Ok(f64::NEG_INFINITY);
        }
        let mut score = motif - self.background.evaluate(window, true);

        if let (Some(offsets), Some(offset)) = (&self.offsets, offset) {
            score += offsets.probability(offset).ln();
        }
        Ok(score)
    }

    /// Scores of every valid offset `0..=len - width`.
    ///
    /// # Errors
    ///
    /// Returns [`GeneStartError::SequenceTooShort`].
    pub fn position_scores(&self, sequence: &[Symbol]) -> Result<Vec<f64>, GeneStartError> {
        let last = self.last_position(sequence)?;
        (0..=last)
            .map(|position| self.position_score(sequence, position))
            .collect()
    }

    /// Picks a motif offset for a sequence.
    ///
    /// With `get_max` the first offset of maximal score is returned;
    /// otherwise an offset is drawn with probability proportional to the
    /// exponentiated score. Offsets scoring `+inf` share all the mass.
    ///
    /// # Errors
    ///
    /// Returns [`GeneStartError::SequenceTooShort`] or, in both modes,
    /// [`GeneStartError::DegenerateDistribution`] when every offset scores
    /// `-inf`.
    pub fn sample_position<R: Rng + ?Sized>(
        &self,
        sequence: &[Symbol],
        get_max: bool,
        rng: &mut R,
    ) -> Result<usize, GeneStartError> {
        let scores = self.position_scores(sequence)?;
        if get_max {
            if scores.iter().all(|&s| s == f64::NEG_INFINITY) {
                return Err(GeneStartError::DegenerateDistribution(format!(
                    "all {} offsets score -inf",
                    scores.len()
                )));
            }
            return Ok(argmax(&scores));
        }
        PositionDistribution::from_log_weights(&scores)?.sample(rng)
    }

    #[must_use]
    pub fn config(&self) -> &MotifFinderConfig {
        &self.config
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.config.width
    }

    #[must_use]
    pub fn alignment(&self) -> AlignmentMode {
        self.config.alignment
    }

    #[must_use]
    pub fn motif_model(&self) -> &Markov {
        &self.motif
    }

    #[must_use]
    pub fn background_model(&self) -> &Markov {
        &self.background
    }

    #[must_use]
    pub fn motif_counts(&self) -> &Counts {
        &self.motif_counts
    }

    #[must_use]
    pub fn background_counts(&self) -> &Counts {
        &self.background_counts
    }

    /// Tallies of motif offsets from the anchored edge
    #[must_use]
    pub fn offset_counts(&self) -> &[u64] {
        &self.offset_counts
    }

    /// Offset distribution; `None` when not aligned or not constructed yet
    #[must_use]
    pub fn offset_distribution(&self) -> Option<&PositionDistribution> {
        self.offsets.as_ref()
    }

    fn last_position(&self, sequence: &[Symbol]) -> Result<usize, GeneStartError> {
        let width = self.config.width;
        sequence
            .len()
            .checked_sub(width)
            .ok_or(GeneStartError::SequenceTooShort {
                index: 0,
                length: sequence.len(),
                width,
            })
    }

    /// Validates `position` and returns its offset from the anchored edge.
    fn checked_offset(&self, sequence: &[Symbol], position: usize) -> Result<Option<usize>, GeneStartError> {
        let last = self.last_position(sequence)?;
        if position > last {
            return Err(GeneStartError::InvalidMotifPosition {
                position,
                max: last,
            });
        }
        Ok(self
            .config
            .alignment
            .offset_from_edge(sequence.len(), self.config.width, position))
    }
}

/// Number of motif offsets in the longest sequence
pub(crate) fn max_offsets<S: AsRef<[Symbol]>>(sequences: &[S], width: usize) -> usize {
    sequences
        .iter()
        .map(|s| s.as_ref().len().saturating_sub(width) + 1)
        .max()
        .unwrap_or(0)
}

fn with_sequence_index(error: GeneStartError, index: usize) -> GeneStartError {
    match error {
        GeneStartError::SequenceTooShort { length, width, .. } => GeneStartError::SequenceTooShort {
            index,
            length,
            width,
        },
        other => other,
    }
}
