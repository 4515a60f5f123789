use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Numeric code of one alphabet character.
///
/// Valid symbols occupy `0..alphabet.size_valid()`, ambiguous symbols follow.
pub type Symbol = u8;

/// Frequency table of one frame, indexed by word index.
pub type CountTable = Vec<u64>;

/// Probability table of one frame, indexed by word index.
pub type ProbabilityTable = Vec<f64>;

/// How motif occurrences are anchored inside their search window.
///
/// When anchored, the motif bundle keeps a histogram of offsets measured from
/// the anchored edge and scores candidate positions with it.
///
/// # Examples
///
/// ```rust
/// use genestart_core::types::AlignmentMode;
///
/// let mode: AlignmentMode = "right".parse().unwrap();
/// assert_eq!(mode, AlignmentMode::Right);
/// assert_eq!(mode.offset_from_edge(20, 6, 10), Some(4));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlignmentMode {
    /// Positions are unconstrained; no offset distribution is kept
    #[default]
    None,
    /// Offsets are measured from the left edge of the sequence
    Left,
    /// Offsets are measured from the right edge of the sequence
    Right,
}

impl AlignmentMode {
    /// Offset of a motif at `position` from the anchored edge.
    ///
    /// Returns `None` when the mode is [`AlignmentMode::None`].
    #[must_use]
    pub const fn offset_from_edge(
        self,
        sequence_length: usize,
        width: usize,
        position: usize,
    ) -> Option<usize> {
        match self {
            Self::None => None,
            Self::Left => Some(position),
            Self::Right => Some(sequence_length - width - position),
        }
    }

    #[must_use]
    pub const fn is_aligned(self) -> bool {
        !matches!(self, Self::None)
    }
}

impl fmt::Display for AlignmentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Left => write!(f, "left"),
            Self::Right => write!(f, "right"),
        }
    }
}

impl FromStr for AlignmentMode {
    type Err = GeneStartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            other => Err(GeneStartError::InvalidConfiguration(format!(
                "unknown alignment mode '{}' (expected none, left or right)",
                other
            ))),
        }
    }
}

/// Error types raised by model construction and motif search
#[derive(Error, Debug)]
pub enum GeneStartError {
    /// Counts and Markov model disagree on alphabet, order or topology
    #[error("Model mismatch: counts {field} is {found}, but the model expects {expected}")]
    ModelMismatch {
        field: &'static str,
        expected: String,
        found: String,
    },
    /// A decrement reached a zero cell; count/decount calls are unbalanced
    #[error("Cannot decrement counts below 0 (frame {frame}, word {word})")]
    CountUnderflow { frame: usize, word: usize },
    /// Sequence cannot hold a single motif occurrence
    #[error("Sequence {index} has length {length}, shorter than motif width {width}")]
    SequenceTooShort {
        index: usize,
        length: usize,
        width: usize,
    },
    /// Motif start offset is outside `[0, len - width]`
    #[error("Invalid motif position: {position} (valid range 0..={max})")]
    InvalidMotifPosition { position: usize, max: usize },
    /// Sampling was requested from a distribution without positive mass
    #[error("Cannot sample from degenerate distribution: {0}")]
    DegenerateDistribution(String),
    /// Configuration values are out of range or inconsistent
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    /// Input sequence contains characters outside the alphabet
    #[error("Invalid sequence: {0}")]
    InvalidSequence(String),
    /// File I/O operation failed
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    /// Error parsing input data
    #[error("Parse error: {0}")]
    ParseError(String),
}
