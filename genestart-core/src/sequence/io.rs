use crate::sequence::{Alphabet, NumericSequence};
use crate::types::*;
use bio::io::fasta;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// One FASTA entry: identifier, optional description and raw residues
pub type FastaRecord = (String, Option<String>, Vec<u8>);

/// Read all records of a FASTA file using rust-bio
pub fn read_fasta_sequences<P: AsRef<Path>>(filename: P) -> Result<Vec<FastaRecord>, GeneStartError> {
    let file = File::open(filename)?;
    read_fasta_from(file)
}

/// Read all records from any FASTA source
pub fn read_fasta_from<R: Read>(source: R) -> Result<Vec<FastaRecord>, GeneStartError> {
    let reader = fasta::Reader::new(source);
    let mut sequences = Vec::new();

    for result in reader.records() {
        let record = result.map_err(|e| GeneStartError::ParseError(e.to_string()))?;
        let id = record.id().to_string();
        let description = record.desc().map(String::from);
        let seq = record.seq().to_vec();
        sequences.push((id, description, seq));
    }

    Ok(sequences)
}

/// Encode the residues of every record; errors name the offending record.
pub fn encode_records(
    records: &[FastaRecord],
    alphabet: &Alphabet,
) -> Result<Vec<NumericSequence>, GeneStartError> {
    records
        .iter()
        .map(|(id, _, seq)| {
            NumericSequence::encode(seq, alphabet).map_err(|e| match e {
                GeneStartError::InvalidSequence(msg) => {
                    GeneStartError::InvalidSequence(format!("record '{}': {}", id, msg))
                }
                other => other,
            })
        })
        .collect()
}
