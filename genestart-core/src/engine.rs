use std::path::Path;

use log::info;
use rand::Rng;

use crate::config::MotifFinderConfig;
use crate::motif::MotifFinder;
use crate::results::{MotifAnalysis, MotifSite};
use crate::sequence::{encode_records, read_fasta_from, read_fasta_sequences, Alphabet, FastaRecord};
use crate::types::GeneStartError;

/// High-level motif analyzer from FASTA input to annotated sites.
///
/// Reads and encodes the sequences, runs the [`MotifFinder`] and maps the
/// resulting alignment back onto the records.
///
/// # Examples
///
/// ## Analyze records already in memory
///
/// ```rust
/// use genestart_core::{MotifAnalyzer, config::MotifFinderConfig};
/// use rand::SeedableRng;
///
/// let analyzer = MotifAnalyzer::new(MotifFinderConfig { width: 4, tries: 2, ..Default::default() });
/// let fasta = b">a\nTTAGGAT\n>b\nCAGGACC\n";
/// let mut rng = rand::rngs::StdRng::seed_from_u64(1);
/// let analysis = analyzer.analyze_reader(&fasta[..], &mut rng)?;
///
/// assert_eq!(analysis.sites.len(), 2);
/// assert_eq!(analysis.sites[0].header, "a");
/// assert_eq!(analysis.sites[0].motif.len(), 4);
/// # Ok::<(), genestart_core::types::GeneStartError>(())
/// ```
///
/// ## Analyze a FASTA file
///
/// ```rust,no_run
/// use genestart_core::{MotifAnalyzer, config::MotifFinderConfig};
///
/// let analyzer = MotifAnalyzer::new(MotifFinderConfig::default());
/// let analysis = analyzer.analyze_fasta_file("upstream.fasta", &mut rand::thread_rng())?;
/// println!("{} sites, CLL {:.3}", analysis.sites.len(), analysis.score);
/// # Ok::<(), genestart_core::types::GeneStartError>(())
/// ```
#[derive(Debug, Clone)]
pub struct MotifAnalyzer {
    /// Configuration of the motif search
    pub config: MotifFinderConfig,
}

impl MotifAnalyzer {
    #[must_use]
    pub const fn new(config: MotifFinderConfig) -> Self {
        Self { config }
    }

    /// Analyzes every record of a FASTA file.
    ///
    /// # Errors
    ///
    /// Returns [`GeneStartError`] if the file cannot be read or parsed, a
    /// record contains characters outside the DNA alphabet, or the search
    /// fails.
    pub fn analyze_fasta_file<P: AsRef<Path>, R: Rng + ?Sized>(
        &self,
        path: P,
        rng: &mut R,
    ) -> Result<MotifAnalysis, GeneStartError> {
        info!("Reading sequences from {}", path.as_ref().display());
        let records = read_fasta_sequences(path)?;
        self.analyze_records(&records, rng)
    }

    /// Analyzes FASTA text from any reader.
    ///
    /// # Errors
    ///
    /// See [`MotifAnalyzer::analyze_fasta_file`].
    pub fn analyze_reader<I: std::io::Read, R: Rng + ?Sized>(
        &self,
        source: I,
        rng: &mut R,
    ) -> Result<MotifAnalysis, GeneStartError> {
        let records = read_fasta_from(source)?;
        self.analyze_records(&records, rng)
    }

    /// Analyzes parsed FASTA records.
    ///
    /// # Errors
    ///
    /// See [`MotifAnalyzer::analyze_fasta_file`].
    pub fn analyze_records<R: Rng + ?Sized>(
        &self,
        records: &[FastaRecord],
        rng: &mut R,
    ) -> Result<MotifAnalysis, GeneStartError> {
        let alphabet = Alphabet::dna();
        let finder = MotifFinder::with_alphabet(self.config.clone(), alphabet.clone())?;
        let sequences = encode_records(records, &alphabet)?;
        info!("Encoded {} sequences", sequences.len());

        let Some(search) = finder.search(&sequences, rng)? else {
            return Ok(MotifAnalysis::empty());
        };

        let width = self.config.width;
        let sites = records
            .iter()
            .zip(&sequences)
            .enumerate()
            .map(|(i, ((header, description, _), sequence))| {
                let position = search.positions[i];
                MotifSite {
                    header: header.clone(),
                    description: description.clone(),
                    length: sequence.len(),
                    position,
                    motif: alphabet.decode_all(&sequence[position..position + width]),
                    score: search.site_scores[i],
                    passes_filter: search.passes_filter[i],
                }
            })
            .collect();

        Ok(MotifAnalysis {
            sites,
            score: search.score,
            tries: search.tries,
            bundle: Some(search.bundle),
        })
    }
}
