#![allow(dead_code)]

use std::io::Write;

use assert_cmd::Command;
use tempfile::NamedTempFile;

/// Upstream fragments sharing an AGGAGG site at the third residue.
pub const RBS_FASTA: &str = ">s1\nCTAGGAGGTC\n>s2 second\nTCAGGAGGCT\n>s3\nCCAGGAGGTT\n>s4\nTTAGGAGGCC\n";

/// Writes FASTA text to a temporary file
pub fn fasta_file(contents: &str) -> Result<NamedTempFile, Box<dyn std::error::Error>> {
    let mut file = NamedTempFile::new()?;
    file.write_all(contents.as_bytes())?;
    file.flush()?;
    Ok(file)
}

/// GeneStart command with a fixed seed and quiet logging
pub fn genestart(seed: u64) -> Result<Command, Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("genestart")?;
    cmd.arg("--seed").arg(seed.to_string()).arg("-q");
    Ok(cmd)
}

/// Runs GeneStart on `input` and returns its stdout.
pub fn run_genestart(input: &str, seed: u64, args: &[&str]) -> Result<String, Box<dyn std::error::Error>> {
    let fasta = fasta_file(input)?;
    let output = genestart(seed)?
        .arg("-i")
        .arg(fasta.path())
        .args(args)
        .output()?;
    if !output.status.success() {
        return Err(format!(
            "genestart failed: {}",
            String::from_utf8_lossy(&output.stderr)
        )
        .into());
    }
    Ok(String::from_utf8(output.stdout)?)
}
