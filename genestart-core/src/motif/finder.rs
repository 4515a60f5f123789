//! Gibbs sampling search for a shared motif.

use log::{debug, info, warn};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::MotifFinderConfig;
use crate::constants::{MAX_SHIFT, MIN_SHIFT};
use crate::markov::Topology;
use crate::motif::bundle::MotifBundle;
use crate::motif::distribution::PositionDistribution;
use crate::sequence::{Alphabet, WordCodec};
use crate::types::{GeneStartError, Symbol};

/// Result of one independent try.
#[derive(Debug, Clone, PartialEq)]
pub struct TryOutcome {
    /// Best conditional log-likelihood reached
    pub score: f64,
    /// Alignment with that score
    pub positions: Vec<usize>,
    /// Best score so far, after initialization and after every round
    pub history: Vec<f64>,
}

/// Outcome of a full motif search.
#[derive(Debug, Clone)]
pub struct MotifSearch {
    /// Motif offset per sequence
    pub positions: Vec<usize>,
    /// Conditional log-likelihood of the alignment
    pub score: f64,
    /// Outcome of every try, in order
    pub tries: Vec<TryOutcome>,
    /// Score of each sequence's site under the final models
    pub site_scores: Vec<f64>,
    /// Whether each site reaches the configured filter threshold
    pub passes_filter: Vec<bool>,
    /// Models trained on the final alignment
    pub bundle: MotifBundle,
}

/// Random permutation of sequence indices, reshuffled every round.
#[derive(Debug, Clone)]
pub struct VisitSchedule {
    order: Vec<usize>,
}

impl VisitSchedule {
    #[must_use]
    pub fn new(count: usize) -> Self {
        Self {
            order: (0..count).collect(),
        }
    }

    /// Shuffles and returns the visiting order of the next round.
    pub fn next_round<R: Rng + ?Sized>(&mut self, rng: &mut R) -> &[usize] {
        self.order.shuffle(rng);
        &self.order
    }
}

/// Finds one motif occurrence per sequence by Gibbs sampling.
///
/// Every try starts from a random alignment and repeatedly re-samples the
/// position of one sequence from models trained on all the others. Every
/// `shift_every` rounds the whole alignment may be shifted by up to two
/// positions to escape phase-shifted local optima. The best alignment of the
/// sampling phase is then polished with EM rounds, which move each sequence
/// to its best-scoring position. The try with the highest conditional
/// log-likelihood wins.
///
/// # Examples
///
/// ```rust
/// use genestart_core::config::MotifFinderConfig;
/// use genestart_core::motif::MotifFinder;
/// use genestart_core::sequence::{Alphabet, NumericSequence};
/// use rand::SeedableRng;
///
/// let alphabet = Alphabet::dna();
/// let sequences: Vec<NumericSequence> = ["CTAGGAGGTC", "TCAGGAGGCT", "CCAGGAGGTT"]
///     .iter()
///     .map(|s| NumericSequence::encode(s.as_bytes(), &alphabet))
///     .collect::<Result<_, _>>()?;
///
/// let finder = MotifFinder::new(MotifFinderConfig { width: 6, tries: 3, ..Default::default() })?;
/// let mut rng = rand::rngs::StdRng::seed_from_u64(11);
/// let positions = finder.find_motifs(&sequences, &mut rng)?;
/// assert_eq!(positions.len(), 3);
/// assert!(positions.iter().all(|&p| p <= 4));
/// # Ok::<(), genestart_core::types::GeneStartError>(())
/// ```
#[derive(Debug, Clone)]
pub struct MotifFinder {
    config: MotifFinderConfig,
    alphabet: Alphabet,
}

impl MotifFinder {
    /// Creates a finder for DNA sequences.
    ///
    /// # Errors
    ///
    /// Returns [`GeneStartError::InvalidConfiguration`] if the configuration
    /// is invalid.
    pub fn new(config: MotifFinderConfig) -> Result<Self, GeneStartError> {
        Self::with_alphabet(config, Alphabet::dna())
    }

    /// Creates a finder for sequences over another alphabet.
    ///
    /// # Errors
    ///
    /// See [`MotifFinder::new`].
    pub fn with_alphabet(config: MotifFinderConfig, alphabet: Alphabet) -> Result<Self, GeneStartError> {
        config.validate()?;
        let codec = WordCodec::for_alphabet(&alphabet);
        Topology::NonUniform {
            length: config.width,
        }
        .validate(config.motif_order, &codec)?;
        Topology::Uniform.validate(config.background_order, &codec)?;
        Ok(Self { config, alphabet })
    }

    #[must_use]
    pub fn config(&self) -> &MotifFinderConfig {
        &self.config
    }

    #[must_use]
    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// Motif offset of every sequence in the best alignment found.
    ///
    /// Returns an empty vector for empty input.
    ///
    /// # Errors
    ///
    /// See [`MotifFinder::search`].
    pub fn find_motifs<S, R>(&self, sequences: &[S], rng: &mut R) -> Result<Vec<usize>, GeneStartError>
    where
        S: AsRef<[Symbol]>,
        R: Rng + ?Sized,
    {
        Ok(self
            .search(sequences, rng)?
            .map(|search| search.positions)
            .unwrap_or_default())
    }

    /// Runs every try and returns the best alignment with its models.
    ///
    /// Returns `None` for empty input.
    ///
    /// # Errors
    ///
    /// Returns [`GeneStartError::SequenceTooShort`] before any work if a
    /// sequence cannot hold the motif, and
    /// [`GeneStartError::DegenerateDistribution`] if position sampling has no
    /// finite score to draw from.
    pub fn search<S, R>(&self, sequences: &[S], rng: &mut R) -> Result<Option<MotifSearch>, GeneStartError>
    where
        S: AsRef<[Symbol]>,
        R: Rng + ?Sized,
    {
        if sequences.is_empty() {
            info!("No sequences given; skipping motif search");
            return Ok(None);
        }
        let width = self.config.width;
        if let Some((index, sequence)) = sequences
            .iter()
            .enumerate()
            .find(|(_, s)| s.as_ref().len() < width)
        {
            return Err(GeneStartError::SequenceTooShort {
                index,
                length: sequence.as_ref().len(),
                width,
            });
        }

        info!(
            "Searching for a motif of width {} in {} sequences ({} tries)",
            width,
            sequences.len(),
            self.config.tries
        );

        let mut outcomes: Vec<TryOutcome> = Vec::with_capacity(self.config.tries);
        let mut best: Option<usize> = None;
        for t in 0..self.config.tries {
            let outcome = self.run_try(sequences, rng)?;
            info!("Try {}/{}: CLL {:.4}", t + 1, self.config.tries, outcome.score);
            if best.map_or(true, |b| outcome.score > outcomes[b].score) {
                best = Some(outcomes.len());
            }
            outcomes.push(outcome);
        }

        let best = best.map_or_else(|| outcomes[0].clone(), |b| outcomes[b].clone());
        let bundle = MotifBundle::from_alignment(&self.alphabet, &self.config, sequences, &best.positions)?;

        let site_scores = sequences
            .iter()
            .zip(&best.positions)
            .map(|(s, &p)| bundle.position_score(s.as_ref(), p))
            .collect::<Result<Vec<_>, _>>()?;
        let passes_filter: Vec<bool> = site_scores
            .iter()
            .map(|&score| score >= self.config.filter_threshold)
            .collect();
        let filtered = passes_filter.iter().filter(|&&ok| !ok).count();
        if filtered > 0 {
            warn!(
                "{} of {} sites score below the filter threshold {}",
                filtered,
                sequences.len(),
                self.config.filter_threshold
            );
        }

        info!("Motif search finished with CLL {:.4}", best.score);
        Ok(Some(MotifSearch {
            positions: best.positions,
            score: best.score,
            tries: outcomes,
            site_scores,
            passes_filter,
            bundle,
        }))
    }

    fn run_try<S, R>(&self, sequences: &[S], rng: &mut R) -> Result<TryOutcome, GeneStartError>
    where
        S: AsRef<[Symbol]>,
        R: Rng + ?Sized,
    {
        let width = self.config.width;
        let mut positions: Vec<usize> = sequences
            .iter()
            .map(|s| rng.gen_range(0..=s.as_ref().len() - width))
            .collect();
        let mut bundle = MotifBundle::from_alignment(&self.alphabet, &self.config, sequences, &positions)?;
        let mut schedule = VisitSchedule::new(sequences.len());

        let mut best_score = bundle.compute_cll();
        let mut best_positions = positions.clone();
        let mut history = vec![best_score];

        for round in 0..self.config.max_iter {
            sweep(&mut bundle, sequences, &mut positions, &mut schedule, false, rng)?;

            let shift_every = self.config.shift_every;
            if shift_every > 0 && round > 0 && round % shift_every == 0 {
                let shift = self.attempt_shift(sequences, &positions, rng)?;
                if shift != 0 {
                    positions = shift_positions(&positions, shift, sequences, width);
                    bundle.recount(sequences, &positions)?;
                }
            }

            bundle.construct()?;
            let score = bundle.compute_cll();
            debug!("Gibbs round {}: CLL {:.4}", round + 1, score);
            if score > best_score {
                best_score = score;
                best_positions.clone_from(&positions);
            }
            history.push(best_score);
        }

        positions.clone_from(&best_positions);
        bundle.recount(sequences, &positions)?;
        for round in 0..self.config.max_em_iter {
            sweep(&mut bundle, sequences, &mut positions, &mut schedule, true, rng)?;

            bundle.construct()?;
            let score = bundle.compute_cll();
            debug!("EM round {}: CLL {:.4}", round + 1, score);
            if score > best_score {
                best_score = score;
                best_positions.clone_from(&positions);
            }
            history.push(best_score);
        }

        Ok(TryOutcome {
            score: best_score,
            positions: best_positions,
            history,
        })
    }

    /// Samples a global shift in `MIN_SHIFT..=MAX_SHIFT` weighted by the CLL
    /// of each shifted alignment.
    fn attempt_shift<S, R>(&self, sequences: &[S], positions: &[usize], rng: &mut R) -> Result<isize, GeneStartError>
    where
        S: AsRef<[Symbol]>,
        R: Rng + ?Sized,
    {
        let scores = (MIN_SHIFT..=MAX_SHIFT)
            .map(|shift| {
                let shifted = shift_positions(positions, shift, sequences, self.config.width);
                MotifBundle::from_alignment(&self.alphabet, &self.config, sequences, &shifted)
                    .map(|bundle| bundle.compute_cll())
            })
            .collect::<Result<Vec<_>, _>>()?;

        let choice = PositionDistribution::from_log_weights(&scores)?.sample(rng)?;
        let shift = MIN_SHIFT + choice as isize;
        debug!("Shift scores {:?}: selected shift {}", scores, shift);
        Ok(shift)
    }
}

/// One pass over all sequences in random order: remove, rebuild, re-place.
fn sweep<S, R>(
    bundle: &mut MotifBundle,
    sequences: &[S],
    positions: &mut [usize],
    schedule: &mut VisitSchedule,
    get_max: bool,
    rng: &mut R,
) -> Result<(), GeneStartError>
where
    S: AsRef<[Symbol]>,
    R: Rng + ?Sized,
{
    let order = schedule.next_round(rng).to_vec();
    for z in order {
        let sequence = sequences[z].as_ref();
        bundle.decount(sequence, positions[z])?;
        bundle.construct()?;
        positions[z] = bundle.sample_position(sequence, get_max, rng)?;
        bundle.count(sequence, positions[z])?;
    }
    Ok(())
}

/// Moves every offset by `shift`, clamped to `[0, len - width]`.
fn shift_positions<S: AsRef<[Symbol]>>(
    positions: &[usize],
    shift: isize,
    sequences: &[S],
    width: usize,
) -> Vec<usize> {
    positions
        .iter()
        .zip(sequences)
        .map(|(&p, s)| {
            let last = s.as_ref().len() - width;
            p.saturating_add_signed(shift).min(last)
        })
        .collect()
}
