use crate::constants::*;
use crate::types::{AlignmentMode, GeneStartError};

/// Configuration settings for the Gibbs-sampling motif finder.
///
/// Controls the shape of the motif and background models and the schedule of
/// the stochastic search.
///
/// # Examples
///
/// ## Default configuration
///
/// ```rust
/// use genestart_core::config::MotifFinderConfig;
///
/// let config = MotifFinderConfig::default();
/// assert_eq!(config.width, 6);
/// assert!(config.validate().is_ok());
/// ```
///
/// ## Ribosome binding sites anchored at the gene start
///
/// ```rust
/// use genestart_core::config::MotifFinderConfig;
/// use genestart_core::types::AlignmentMode;
///
/// let config = MotifFinderConfig {
///     width: 8,
///     motif_order: 1,
///     background_order: 2,
///     alignment: AlignmentMode::Right,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct MotifFinderConfig {
    /// Number of positions in the motif.
    ///
    /// Every input sequence must be at least this long.
    ///
    /// **Default**: `6`
    pub width: usize,

    /// Markov order of the position-specific motif model.
    ///
    /// Position `p` of the motif conditions on `min(p, motif_order)`
    /// preceding symbols. Must be smaller than `width`.
    ///
    /// **Default**: `0`
    pub motif_order: usize,

    /// Markov order of the uniform background model.
    ///
    /// **Default**: `0`
    pub background_order: usize,

    /// Pseudocount added to every count cell before normalization.
    ///
    /// **Default**: `1.0`
    pub pseudocounts: f64,

    /// How motif positions are anchored in their sequence.
    ///
    /// When aligned, the distribution of offsets from the anchored edge is
    /// learned and included in the score. See [`AlignmentMode`].
    ///
    /// **Default**: [`AlignmentMode::None`]
    pub alignment: AlignmentMode,

    /// Number of independent restarts; the best-scoring one is kept.
    ///
    /// **Default**: `10`
    pub tries: usize,

    /// Number of Gibbs sampling rounds per try.
    ///
    /// **Default**: `60`
    pub max_iter: usize,

    /// Number of EM rounds polishing the best alignment of a try.
    ///
    /// **Default**: `10`
    pub max_em_iter: usize,

    /// Rounds between attempts to shift the whole alignment.
    ///
    /// `0` disables shifting.
    ///
    /// **Default**: `10`
    pub shift_every: usize,

    /// Minimum site score for a sequence to pass the final filter.
    ///
    /// **Default**: `f64::NEG_INFINITY` (every sequence passes)
    pub filter_threshold: f64,
}

impl MotifFinderConfig {
    /// Checks that the values are in range and consistent.
    ///
    /// # Errors
    ///
    /// Returns [`GeneStartError::InvalidConfiguration`] describing the first
    /// offending value.
    pub fn validate(&self) -> Result<(), GeneStartError> {
        let invalid = |msg: String| Err(GeneStartError::InvalidConfiguration(msg));

        if self.width == 0 {
            return invalid("motif width must be positive".to_string());
        }
        if self.motif_order >= self.width {
            return invalid(format!(
                "motif order {} must be smaller than the motif width {}",
                self.motif_order, self.width
            ));
        }
        if !self.pseudocounts.is_finite() || self.pseudocounts < 0.0 {
            return invalid(format!(
                "pseudocounts must be a non-negative number, got {}",
                self.pseudocounts
            ));
        }
        if self.tries == 0 {
            return invalid("number of tries must be positive".to_string());
        }
        if self.filter_threshold.is_nan() {
            return invalid("filter threshold must be a number".to_string());
        }
        Ok(())
    }
}

impl Default for MotifFinderConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            motif_order: 0,
            background_order: 0,
            pseudocounts: DEFAULT_PSEUDOCOUNTS,
            alignment: AlignmentMode::None,
            tries: DEFAULT_TRIES,
            max_iter: DEFAULT_MAX_ITER,
            max_em_iter: DEFAULT_MAX_EM_ITER,
            shift_every: DEFAULT_SHIFT_EVERY,
            filter_threshold: f64::NEG_INFINITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = MotifFinderConfig::default();
        assert_eq!(config.width, 6);
        assert_eq!(config.motif_order, 0);
        assert_eq!(config.background_order, 0);
        assert_eq!(config.pseudocounts, 1.0);
        assert_eq!(config.alignment, AlignmentMode::None);
        assert_eq!(config.tries, 10);
        assert_eq!(config.max_iter, 60);
        assert_eq!(config.max_em_iter, 10);
        assert_eq!(config.shift_every, 10);
        assert_eq!(config.filter_threshold, f64::NEG_INFINITY);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let cases = [
            MotifFinderConfig { width: 0, ..Default::default() },
            MotifFinderConfig { motif_order: 6, ..Default::default() },
            MotifFinderConfig { pseudocounts: -1.0, ..Default::default() },
            MotifFinderConfig { pseudocounts: f64::NAN, ..Default::default() },
            MotifFinderConfig { tries: 0, ..Default::default() },
            MotifFinderConfig { filter_threshold: f64::NAN, ..Default::default() },
        ];
        for config in cases {
            assert!(
                matches!(config.validate(), Err(GeneStartError::InvalidConfiguration(_))),
                "{config:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_validate_accepts_edge_values() {
        let config = MotifFinderConfig {
            width: 1,
            pseudocounts: 0.0,
            max_iter: 0,
            max_em_iter: 0,
            shift_every: 0,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }
}
