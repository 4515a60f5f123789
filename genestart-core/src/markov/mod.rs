//! Variable-order Markov models over a numeric alphabet.
//!
//! Models are built in two stages: a [`Counts`] table tallies the words of
//! `order + 1` symbols seen in training windows, then [`Markov`] turns those
//! tallies plus a pseudocount into conditional probabilities
//! `P(last symbol | preceding symbols)`.
//!
//! Both stages share one [`Topology`]:
//!
//! - **Uniform**: a single frame used at every position
//! - **Non-uniform**: one frame per offset of a fixed-length window (motif
//!   models); frames near the window start use shorter words
//! - **Periodic**: `period` frames, position `i` uses frame `i % period`
//!   (coding models)
//!
//! ## Modules
//!
//! - [`counts`]: Word frequency tables with exact count/decount
//! - [`joint`]: Joint/conditional table conversions and order changes
//! - [`model`]: Probability model construction, evaluation and sampling
//!
//! ## Examples
//!
//! ```rust
//! use bio::bio_types::strand::Strand;
//! use genestart_core::markov::{Counts, Markov, Topology};
//! use genestart_core::sequence::{Alphabet, NumericSequence};
//!
//! let alphabet = Alphabet::dna();
//! let seq = NumericSequence::encode(b"ACGTACGTAC", &alphabet)?;
//!
//! let mut counts = Counts::new(&alphabet, 1, Topology::Uniform)?;
//! counts.count(&seq, Strand::Forward);
//! assert_eq!(counts.total(), 9);
//!
//! let mut model = Markov::new(&alphabet, 1, Topology::Uniform)?;
//! model.construct_from_counts(&counts, 1.0)?;
//! let log_likelihood = model.evaluate(&seq, true);
//! assert!(log_likelihood < 0.0);
//! # Ok::<(), genestart_core::types::GeneStartError>(())
//! ```

pub mod counts;
pub mod joint;
pub mod model;

pub use counts::Counts;
pub use model::Markov;

use std::fmt;

use crate::sequence::WordCodec;
use crate::types::GeneStartError;

/// Arrangement of frames across the positions of a window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Topology {
    /// One frame for every position
    #[default]
    Uniform,
    /// One frame per offset of a window of `length` positions
    NonUniform { length: usize },
    /// `period` frames cycling with the position
    Periodic { period: usize },
}

impl Topology {
    /// Number of frames
    #[must_use]
    pub const fn frame_count(&self) -> usize {
        match *self {
            Self::Uniform => 1,
            Self::NonUniform { length } => length,
            Self::Periodic { period } => period,
        }
    }

    /// Order of the words stored in `frame`.
    ///
    /// Non-uniform frames at offset `p < order` only see `p` preceding symbols.
    #[must_use]
    pub const fn frame_order(&self, order: usize, frame: usize) -> usize {
        match *self {
            Self::NonUniform { .. } if frame < order => frame,
            _ => order,
        }
    }

    /// Frame of the symbol at `position`, or `None` past a non-uniform window.
    #[must_use]
    pub const fn frame_at(&self, position: usize) -> Option<usize> {
        match *self {
            Self::Uniform => Some(0),
            Self::NonUniform { length } => {
                if position < length {
                    Some(position)
                } else {
                    None
                }
            }
            Self::Periodic { period } => Some(position % period),
        }
    }

    /// Uniform and periodic walks skip the first `order` positions.
    pub(crate) const fn primes_context(&self) -> bool {
        !matches!(self, Self::NonUniform { .. })
    }

    pub(crate) fn validate(&self, order: usize, codec: &WordCodec) -> Result<(), GeneStartError> {
        match *self {
            Self::NonUniform { length: 0 } => {
                return Err(GeneStartError::InvalidConfiguration(
                    "non-uniform length must be positive".to_string(),
                ));
            }
            Self::Periodic { period: 0 } => {
                return Err(GeneStartError::InvalidConfiguration(
                    "period must be positive".to_string(),
                ));
            }
            _ => {}
        }
        if !codec.supports_length(order + 1) {
            return Err(GeneStartError::InvalidConfiguration(format!(
                "order {} needs words of {} bits, which exceeds the supported table size",
                order,
                codec.bits_per_symbol() as usize * (order + 1)
            )));
        }
        Ok(())
    }
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uniform => write!(f, "uniform"),
            Self::NonUniform { length } => write!(f, "non-uniform (length {})", length),
            Self::Periodic { period } => write!(f, "periodic (period {})", period),
        }
    }
}
