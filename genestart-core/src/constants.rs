// =============================================================================
// =============================================================================

/// Version string for the motif finder report
pub const VERSION: &str = "1.0";

/// Name written in the motif finder report header
pub const REPORT_NAME: &str = "MotifFinder";

// =============================================================================
// =============================================================================

/// Valid DNA characters, in code order
pub const DNA_VALID: &[u8] = b"ACGT";

/// Ambiguous IUPAC characters, in code order (sorted)
pub const DNA_AMBIGUOUS: &[u8] = b"BDHKMNRSVWYZ";

/// Watson-Crick pairs of the valid DNA characters
pub const DNA_COMPLEMENT_PAIRS: &[(u8, u8)] = &[(b'A', b'T'), (b'C', b'G')];

// =============================================================================
// =============================================================================

/// Default motif width
pub const DEFAULT_WIDTH: usize = 6;

/// Default number of independent restarts
pub const DEFAULT_TRIES: usize = 10;

/// Default number of Gibbs rounds per try
pub const DEFAULT_MAX_ITER: usize = 60;

/// Default number of EM rounds per try
pub const DEFAULT_MAX_EM_ITER: usize = 10;

/// Default number of Gibbs rounds between shift attempts
pub const DEFAULT_SHIFT_EVERY: usize = 10;

/// Default pseudocount added to every count cell
pub const DEFAULT_PSEUDOCOUNTS: f64 = 1.0;

/// Smallest global shift tried during a shift attempt
pub const MIN_SHIFT: isize = -2;

/// Largest global shift tried during a shift attempt
pub const MAX_SHIFT: isize = 2;

/// Largest supported bits-per-word; word indices are kept in a `u64`
/// and tables are allocated densely.
pub const MAX_WORD_BITS: u32 = 24;

/// Tolerance used when checking that probability blocks sum to one
pub const PROBABILITY_TOLERANCE: f64 = 1e-9;
