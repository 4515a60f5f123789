//! # GeneStart Motif Finder
//!
//! A Rust library for discovering short sequence motifs, such as ribosome
//! binding sites, in sets of DNA fragments upstream of gene starts.
//!
//! ## Overview
//!
//! Every input sequence is assumed to carry one occurrence of an unknown
//! motif. The search aligns one window per sequence so that a
//! position-specific Markov model of the motif explains the windows better
//! than a background Markov model explains them, measured by the conditional
//! log-likelihood (CLL) of the alignment. Alignments are refined by Gibbs
//! sampling with periodic shifts of the whole alignment, followed by a
//! deterministic expectation-maximization polish.
//!
//! ## Features
//!
//! - **Variable-order Markov models**: uniform, non-uniform and periodic
//!   topologies with exact count/decount
//! - **Positional prior**: optional distribution over motif offsets from the
//!   left or right sequence edge
//! - **Reproducible search**: every random draw goes through a caller-supplied
//!   [`rand::Rng`]
//!
//! ## Quick Start
//!
//! ```rust
//! use genestart_core::{MotifAnalyzer, config::MotifFinderConfig};
//! use rand::SeedableRng;
//!
//! let analyzer = MotifAnalyzer::new(MotifFinderConfig { width: 4, ..Default::default() });
//! let fasta = b">a\nCCTAGGAC\n>b\nGTAGGACC\n>c\nATAGGTTC\n";
//! let mut rng = rand::rngs::StdRng::seed_from_u64(7);
//!
//! let analysis = analyzer.analyze_reader(&fasta[..], &mut rng)?;
//! for site in &analysis.sites {
//!     println!("{}\t{}\t{}", site.header, site.position + 1, site.motif);
//! }
//! # Ok::<(), genestart_core::types::GeneStartError>(())
//! ```
//!
//! ## Lower-level API
//!
//! ```rust
//! use genestart_core::config::MotifFinderConfig;
//! use genestart_core::motif::MotifFinder;
//! use genestart_core::sequence::{Alphabet, NumericSequence};
//! use rand::SeedableRng;
//!
//! let alphabet = Alphabet::dna();
//! let sequences = ["TTAGGAT", "CAGGACC", "GGAGGAA"]
//!     .iter()
//!     .map(|s| NumericSequence::encode(s.as_bytes(), &alphabet))
//!     .collect::<Result<Vec<_>, _>>()?;
//!
//! let finder = MotifFinder::new(MotifFinderConfig { width: 4, tries: 3, ..Default::default() })?;
//! let mut rng = rand::rngs::StdRng::seed_from_u64(11);
//! let positions = finder.find_motifs(&sequences, &mut rng)?;
//! assert_eq!(positions.len(), 3);
//! # Ok::<(), genestart_core::types::GeneStartError>(())
//! ```
//!
//! ## Module Organization
//!
//! - [`config`]: Configuration of the motif search
//! - [`engine`]: FASTA-to-sites analysis driver
//! - [`markov`]: Count tables and Markov probability models
//! - [`motif`]: Motif bundle and the Gibbs/EM motif finder
//! - [`output`]: Site report and model writers
//! - [`results`]: Analysis results
//! - [`sequence`]: Alphabets, word codec, numeric sequences and FASTA input
//! - [`types`]: Shared type aliases, alignment modes and errors
//!
//! ## Error Handling
//!
//! All fallible operations return [`Result<T, GeneStartError>`](types::GeneStartError),
//! covering:
//!
//! - Invalid sequences and malformed FASTA input
//! - Sequences shorter than the motif
//! - Models combined across different alphabets, orders or topologies
//! - Count underflow and invalid motif positions
//! - Configuration errors and I/O failures

pub mod config;
pub mod constants;
pub mod engine;
pub mod markov;
pub mod motif;
pub mod output;
pub mod results;
pub mod sequence;
pub mod types;

pub use config::MotifFinderConfig;
pub use engine::MotifAnalyzer;
pub use motif::{MotifBundle, MotifFinder, MotifSearch};
pub use results::{MotifAnalysis, MotifSite};
pub use types::{AlignmentMode, GeneStartError};
