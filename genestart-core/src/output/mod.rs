//! Output formatting for motif analyses.
//!
//! ## Formats
//!
//! - **Report**: `NAME` and `VERSION` header lines followed by one line per
//!   sequence: motif residues, 1-based start and sequence length, separated by
//!   tabs
//! - **Models**: `$KEY` markers followed by whitespace-delimited values
//!   describing the motif, background and offset models
//!
//! ## Examples
//!
//! ```rust,no_run
//! use genestart_core::{MotifAnalyzer, config::MotifFinderConfig};
//! use genestart_core::output::{write_motif_models, write_motif_report};
//! use std::io::stdout;
//!
//! let analyzer = MotifAnalyzer::new(MotifFinderConfig::default());
//! let analysis = analyzer.analyze_fasta_file("upstream.fasta", &mut rand::thread_rng())?;
//!
//! write_motif_report(&mut stdout(), &analysis)?;
//! if let Some(bundle) = &analysis.bundle {
//!     let mut models = std::fs::File::create("motif.mod")?;
//!     write_motif_models(&mut models, bundle)?;
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::io::Write;

use crate::constants::{REPORT_NAME, VERSION};
use crate::markov::joint::prepend_uniform;
use crate::markov::Markov;
use crate::motif::MotifBundle;
use crate::results::MotifAnalysis;
use crate::sequence::WordCodec;
use crate::types::{GeneStartError, Symbol};

/// Writes the site report of an analysis.
///
/// # Errors
///
/// Returns [`GeneStartError::IoError`] if writing fails.
pub fn write_motif_report<W: Write>(writer: &mut W, analysis: &MotifAnalysis) -> Result<(), GeneStartError> {
    writeln!(writer, "NAME {}", REPORT_NAME)?;
    writeln!(writer, "VERSION {}", VERSION)?;
    for site in &analysis.sites {
        writeln!(writer, "{}\t{}\t{}", site.motif, site.position + 1, site.length)?;
    }
    Ok(())
}

/// Writes the motif, background and offset models of a bundle.
///
/// Motif rows list a word followed by its joint probability at every motif
/// position; positions of lower order are lifted to the full word length by
/// a uniformly distributed leading context.
///
/// # Errors
///
/// Returns [`GeneStartError::IoError`] if writing fails.
pub fn write_motif_models<W: Write>(writer: &mut W, bundle: &MotifBundle) -> Result<(), GeneStartError> {
    let motif = bundle.motif_model();
    let background = bundle.background_model();

    writeln!(writer, "$MOTIF_WIDTH {}", bundle.width())?;
    writeln!(writer, "$MOTIF_ORDER {}", motif.order())?;
    writeln!(writer, "$MOTIF_MAT")?;
    let columns: Vec<Vec<f64>> = (0..motif.frame_count())
        .map(|frame| lifted_joint(motif, frame))
        .collect();
    write_word_rows(writer, motif, &columns)?;

    writeln!(writer, "$BACKGROUND_ORDER {}", background.order())?;
    writeln!(writer, "$BACKGROUND_MAT")?;
    write_word_rows(writer, background, &[background.joint(0).to_vec()])?;

    writeln!(writer, "$ALIGN {}", bundle.alignment())?;
    if let Some(offsets) = bundle.offset_distribution() {
        writeln!(writer, "$POS_DISTR")?;
        for (offset, p) in offsets.as_slice().iter().enumerate() {
            writeln!(writer, "{} {:.6}", offset, p)?;
        }
    }
    Ok(())
}

/// Joint table of a motif position with words of `order + 1` symbols.
fn lifted_joint(model: &Markov, frame: usize) -> Vec<f64> {
    let radix = WordCodec::for_alphabet(model.alphabet()).radix();
    let valid = model.alphabet().size_valid();
    let frame_order = model.topology().frame_order(model.order(), frame);
    let mut table = model.joint(frame).to_vec();
    for _ in frame_order..model.order() {
        table = prepend_uniform(&table, radix, valid);
    }
    table
}

fn write_word_rows<W: Write>(writer: &mut W, model: &Markov, columns: &[Vec<f64>]) -> Result<(), GeneStartError> {
    let alphabet = model.alphabet();
    let codec = WordCodec::for_alphabet(alphabet);
    let len = model.order() + 1;
    for word in 0..codec.table_len(len) {
        let symbols: Vec<Symbol> = codec.symbols_of(word as u64, len);
        if symbols.iter().any(|&s| !alphabet.is_valid(s)) {
            continue;
        }
        write!(writer, "{}", alphabet.decode_all(&symbols))?;
        for column in columns {
            write!(writer, " {:.6}", column[word])?;
        }
        writeln!(writer)?;
    }
    Ok(())
}
