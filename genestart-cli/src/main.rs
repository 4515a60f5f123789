//! # GeneStart CLI - Command-Line Motif Finder
//!
//! A command-line interface for discovering ribosome binding sites and other
//! short motifs in sequences upstream of gene starts.
//!
//! ## Usage
//!
//! ```bash
//! # Find a 6-residue motif
//! genestart -i upstream.fasta -o motifs.txt
//!
//! # Wider first-order motif anchored at the gene start
//! genestart -i upstream.fasta -w 8 --motif-order 1 --align right
//!
//! # Reproducible run that also writes the trained models
//! genestart -i upstream.fasta --seed 42 --models motif.mod
//! ```
//!
//! ## Options
//!
//! - `-i, --input <FILE>`: Input FASTA file (default: stdin)
//! - `-o, --output <FILE>`: Output file (default: stdout)
//! - `-w, --width <N>`: Motif width (default: 6)
//! - `--motif-order <N>`: Markov order of the motif model (default: 0)
//! - `--bkgd-order <N>`: Markov order of the background model (default: 0)
//! - `--align <MODE>`: Positional prior: none, left or right (default: none)
//! - `--tries <N>`: Independent search restarts (default: 10)
//! - `--max-iter <N>`: Gibbs rounds per try (default: 60)
//! - `--max-em-iter <N>`: EM rounds per try (default: 10)
//! - `--shift-every <N>`: Rounds between alignment shifts, 0 disables (default: 10)
//! - `--pcount <X>`: Pseudocount added to every count (default: 1)
//! - `--filter-threshold <X>`: Minimum site score to pass the filter
//! - `--seed <N>`: Random seed (default: from entropy)
//! - `--models <FILE>`: Write the trained models to a file
//! - `-q, --quiet`: Only report warnings and errors
//! - `-v, --verbose`: Report debug messages

mod logging;

use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};
use genestart_core::output::{write_motif_models, write_motif_report};
use genestart_core::*;
use log::{info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::fs::File;
use std::io::{self, BufWriter, Write};

fn cli() -> Command {
    Command::new("genestart")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Gibbs-sampling motif finder for sequences upstream of gene starts")
        .arg(
            Arg::new("input")
                .short('i')
                .long("input")
                .value_name("FILE")
                .help("Input FASTA file (default: stdin)"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FILE")
                .help("Output file (default: stdout)"),
        )
        .arg(
            Arg::new("width")
                .short('w')
                .long("width")
                .value_name("N")
                .value_parser(value_parser!(usize))
                .help("Motif width"),
        )
        .arg(
            Arg::new("motif-order")
                .long("motif-order")
                .value_name("N")
                .value_parser(value_parser!(usize))
                .help("Markov order of the motif model"),
        )
        .arg(
            Arg::new("bkgd-order")
                .long("bkgd-order")
                .value_name("N")
                .value_parser(value_parser!(usize))
                .help("Markov order of the background model"),
        )
        .arg(
            Arg::new("align")
                .long("align")
                .value_name("MODE")
                .value_parser(["none", "left", "right"])
                .help("Positional prior: none, left or right"),
        )
        .arg(
            Arg::new("tries")
                .long("tries")
                .value_name("N")
                .value_parser(value_parser!(usize))
                .help("Independent search restarts"),
        )
        .arg(
            Arg::new("max-iter")
                .long("max-iter")
                .value_name("N")
                .value_parser(value_parser!(usize))
                .help("Gibbs rounds per try"),
        )
        .arg(
            Arg::new("max-em-iter")
                .long("max-em-iter")
                .value_name("N")
                .value_parser(value_parser!(usize))
                .help("EM rounds per try"),
        )
        .arg(
            Arg::new("shift-every")
                .long("shift-every")
                .value_name("N")
                .value_parser(value_parser!(usize))
                .help("Rounds between alignment shifts (0 disables)"),
        )
        .arg(
            Arg::new("pcount")
                .long("pcount")
                .value_name("X")
                .value_parser(value_parser!(f64))
                .help("Pseudocount added to every count"),
        )
        .arg(
            Arg::new("filter-threshold")
                .long("filter-threshold")
                .value_name("X")
                .value_parser(value_parser!(f64))
                .allow_negative_numbers(true)
                .help("Minimum site score to pass the filter"),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .value_name("N")
                .value_parser(value_parser!(u64))
                .help("Random seed (default: from entropy)"),
        )
        .arg(
            Arg::new("models")
                .long("models")
                .value_name("FILE")
                .help("Write the trained models to a file"),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .action(ArgAction::SetTrue)
                .help("Only report warnings and errors"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .conflicts_with("quiet")
                .help("Report debug messages"),
        )
}

fn config_from(matches: &ArgMatches) -> Result<MotifFinderConfig, GeneStartError> {
    let defaults = MotifFinderConfig::default();
    let usize_arg = |name: &str, default: usize| matches.get_one::<usize>(name).copied().unwrap_or(default);
    let alignment = match matches.get_one::<String>("align") {
        Some(mode) => mode.parse::<AlignmentMode>()?,
        None => defaults.alignment,
    };

    let config = MotifFinderConfig {
        width: usize_arg("width", defaults.width),
        motif_order: usize_arg("motif-order", defaults.motif_order),
        background_order: usize_arg("bkgd-order", defaults.background_order),
        pseudocounts: matches
            .get_one::<f64>("pcount")
            .copied()
            .unwrap_or(defaults.pseudocounts),
        alignment,
        tries: usize_arg("tries", defaults.tries),
        max_iter: usize_arg("max-iter", defaults.max_iter),
        max_em_iter: usize_arg("max-em-iter", defaults.max_em_iter),
        shift_every: usize_arg("shift-every", defaults.shift_every),
        filter_threshold: matches
            .get_one::<f64>("filter-threshold")
            .copied()
            .unwrap_or(defaults.filter_threshold),
    };
    config.validate()?;
    Ok(config)
}

/// Main entry point for the GeneStart CLI application.
///
/// Parses command-line arguments, runs the motif search over the input
/// sequences and writes the site report and, on request, the models.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let matches = cli().get_matches();
    logging::init_logger(logging::level_from_flags(
        matches.get_flag("quiet"),
        matches.get_flag("verbose"),
    ));

    let config = config_from(&matches)?;
    let mut rng = match matches.get_one::<u64>("seed") {
        Some(&seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let analyzer = MotifAnalyzer::new(config);
    let analysis = if let Some(input_file) = matches.get_one::<String>("input") {
        analyzer.analyze_fasta_file(input_file, &mut rng)?
    } else {
        analyzer.analyze_reader(io::stdin().lock(), &mut rng)?
    };

    let mut writer: Box<dyn Write> = if let Some(output_file) = matches.get_one::<String>("output")
    {
        Box::new(BufWriter::new(File::create(output_file)?))
    } else {
        Box::new(BufWriter::new(io::stdout()))
    };
    write_motif_report(&mut writer, &analysis)?;
    writer.flush()?;

    if let Some(models_file) = matches.get_one::<String>("models") {
        match &analysis.bundle {
            Some(bundle) => {
                let mut models = BufWriter::new(File::create(models_file)?);
                write_motif_models(&mut models, bundle)?;
                models.flush()?;
            }
            None => warn!("No sequences analyzed; models not written"),
        }
    }

    info!(
        "Analysis complete! Aligned {} sequences, {} sites pass the filter, CLL {:.4}",
        analysis.sites.len(),
        analysis.passing_sites().count(),
        analysis.score
    );

    Ok(())
}
