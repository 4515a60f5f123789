//! Motif discovery across a collection of short sequences.
//!
//! Given fragments that each contain one occurrence of an unknown short
//! motif (for example the ribosome binding sites upstream of gene starts),
//! [`MotifFinder`] searches for the alignment that maximizes the conditional
//! log-likelihood of a position-specific motif model against a uniform
//! background model.
//!
//! ## Modules
//!
//! - [`bundle`]: Motif, background and offset models of one alignment
//! - [`distribution`]: Discrete distributions over motif offsets
//! - [`finder`]: Gibbs sampling, alignment shifting and EM polishing

pub mod bundle;
pub mod distribution;
pub mod finder;

pub use bundle::MotifBundle;
pub use distribution::PositionDistribution;
pub use finder::{MotifFinder, MotifSearch, TryOutcome, VisitSchedule};
