//! Discrete distributions over motif offsets.

use rand::distributions::WeightedIndex;
use rand::prelude::*;

use crate::types::GeneStartError;

/// Discrete probability distribution over the indices `0..len`.
///
/// # Examples
///
/// ```rust
/// use genestart_core::motif::PositionDistribution;
///
/// let dist = PositionDistribution::from_counts(&[3, 0, 1], 1.0).unwrap();
/// assert!((dist.probability(0) - 4.0 / 7.0).abs() < 1e-12);
/// assert_eq!(dist.argmax(), 0);
/// assert_eq!(dist.probability(10), 0.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PositionDistribution {
    probabilities: Vec<f64>,
}

impl PositionDistribution {
    /// Normalizes non-negative weights.
    ///
    /// # Errors
    ///
    /// Returns [`GeneStartError::DegenerateDistribution`] if the weights are
    /// empty, contain a negative or non-finite value, or sum to zero.
    pub fn from_weights(weights: &[f64]) -> Result<Self, GeneStartError> {
        if let Some(bad) = weights.iter().find(|w| !w.is_finite() || **w < 0.0) {
            return Err(GeneStartError::DegenerateDistribution(format!(
                "invalid weight {}",
                bad
            )));
        }
        let total: f64 = weights.iter().sum();
        if total <= 0.0 {
            return Err(GeneStartError::DegenerateDistribution(format!(
                "{} weights with zero total",
                weights.len()
            )));
        }
        Ok(Self {
            probabilities: weights.iter().map(|w| w / total).collect(),
        })
    }

    /// Normalizes natural-log weights; `-inf` entries get probability zero.
    ///
    /// Weights are shifted by their maximum before exponentiation so that
    /// large scores do not overflow. When some entries are `+inf` the mass is
    /// shared evenly among them.
    ///
    /// # Errors
    ///
    /// Returns [`GeneStartError::DegenerateDistribution`] if an entry is NaN
    /// or every entry is `-inf`.
    pub fn from_log_weights(log_weights: &[f64]) -> Result<Self, GeneStartError> {
        if log_weights.iter().any(|w| w.is_nan()) {
            return Err(GeneStartError::DegenerateDistribution(
                "log weights must not be NaN".to_string(),
            ));
        }
        let max = log_weights
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);
        if max == f64::NEG_INFINITY {
            return Err(GeneStartError::DegenerateDistribution(format!(
                "all {} log weights are -inf",
                log_weights.len()
            )));
        }
        let weights: Vec<f64> = if max == f64::INFINITY {
            log_weights
                .iter()
                .map(|&w| if w == f64::INFINITY { 1.0 } else { 0.0 })
                .collect()
        } else {
            log_weights.iter().map(|w| (w - max).exp()).collect()
        };
        Self::from_weights(&weights)
    }

    /// Normalizes tallies after adding `pseudocount` to each of them.
    ///
    /// # Errors
    ///
    /// Returns [`GeneStartError::DegenerateDistribution`] if the result has
    /// no mass.
    pub fn from_counts(counts: &[u64], pseudocount: f64) -> Result<Self, GeneStartError> {
        let weights: Vec<f64> = counts.iter().map(|&c| c as f64 + pseudocount).collect();
        Self::from_weights(&weights)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.probabilities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.probabilities.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.probabilities
    }

    /// Probability of `index`, zero outside the support
    #[must_use]
    pub fn probability(&self, index: usize) -> f64 {
        self.probabilities.get(index).copied().unwrap_or(0.0)
    }

    /// Draws an index with the stored probabilities.
    ///
    /// # Errors
    ///
    /// Returns [`GeneStartError::DegenerateDistribution`] if the weights
    /// cannot be sampled from.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<usize, GeneStartError> {
        let dist = WeightedIndex::new(&self.probabilities)
            .map_err(|e| GeneStartError::DegenerateDistribution(e.to_string()))?;
        Ok(dist.sample(rng))
    }

    /// First index of maximal probability
    #[must_use]
    pub fn argmax(&self) -> usize {
        argmax(&self.probabilities)
    }
}

/// First index of the maximum; NaN entries are never selected.
pub(crate) fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate() {
        if v > values[best] || values[best].is_nan() {
            best = i;
        }
    }
    best
}
