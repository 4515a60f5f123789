use crate::motif::{MotifBundle, TryOutcome};

/// Outcome of a motif analysis over a set of sequences.
///
/// # Examples
///
/// ```rust,no_run
/// use genestart_core::{MotifAnalyzer, config::MotifFinderConfig};
/// use genestart_core::output::write_motif_report;
///
/// let analyzer = MotifAnalyzer::new(MotifFinderConfig::default());
/// let analysis = analyzer.analyze_fasta_file("upstream.fasta", &mut rand::thread_rng())?;
///
/// println!("Best CLL: {:.3}", analysis.score);
/// for site in &analysis.sites {
///     println!("{}\t{}\t{}", site.header, site.position + 1, site.motif);
/// }
///
/// let mut output = std::fs::File::create("motifs.txt")?;
/// write_motif_report(&mut output, &analysis)?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct MotifAnalysis {
    /// One site per input sequence, in input order.
    pub sites: Vec<MotifSite>,

    /// Conditional log-likelihood of the final alignment.
    ///
    /// `f64::NEG_INFINITY` when there was nothing to align.
    pub score: f64,

    /// Outcome of every search try.
    pub tries: Vec<TryOutcome>,

    /// Motif and background models trained on the final alignment.
    ///
    /// `None` for empty input.
    pub bundle: Option<MotifBundle>,
}

impl MotifAnalysis {
    /// Analysis of an empty input.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            sites: Vec::new(),
            score: f64::NEG_INFINITY,
            tries: Vec::new(),
            bundle: None,
        }
    }

    /// Sites that reach the filter threshold
    pub fn passing_sites(&self) -> impl Iterator<Item = &MotifSite> {
        self.sites.iter().filter(|site| site.passes_filter)
    }
}

/// Motif occurrence found in one sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct MotifSite {
    /// Sequence identifier from the FASTA header.
    pub header: String,

    /// Everything after the first word in the FASTA header line.
    pub description: Option<String>,

    /// Length of the sequence.
    pub length: usize,

    /// 0-based start of the motif.
    pub position: usize,

    /// Motif residues as they appear in the sequence.
    pub motif: String,

    /// Log-odds score of the site under the final models.
    pub score: f64,

    /// Whether the score reaches the filter threshold.
    pub passes_filter: bool,
}
