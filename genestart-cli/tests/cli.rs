mod common;
use crate::common::{RBS_FASTA, fasta_file, genestart, run_genestart};
use tempfile::NamedTempFile;

#[test]
fn report_finds_shared_site() {
    let report = run_genestart(RBS_FASTA, 7, &[]).unwrap();
    insta::assert_snapshot!(report, @r"
    NAME MotifFinder
    VERSION 1.0
    AGGAGG	3	10
    AGGAGG	3	10
    AGGAGG	3	10
    AGGAGG	3	10
    ");
}

#[test]
fn report_is_reproducible_with_seed() {
    let input = ">a\nACGTTGCAAGT\n>b\nTTGACCATGCA\n>c\nGGCATTACGAT\n";
    let first = run_genestart(input, 99, &["-w", "4", "--tries", "2"]).unwrap();
    let second = run_genestart(input, 99, &["-w", "4", "--tries", "2"]).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.lines().count(), 5);
}

#[test]
fn report_reads_stdin() {
    let output = genestart(7)
        .unwrap()
        .write_stdin(RBS_FASTA)
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with("NAME MotifFinder\nVERSION 1.0\n"));
    assert_eq!(stdout.lines().count(), 6);
}

#[test]
fn report_written_to_output_file() {
    let fasta = fasta_file(RBS_FASTA).unwrap();
    let out = NamedTempFile::new().unwrap();
    genestart(7)
        .unwrap()
        .arg("-i")
        .arg(fasta.path())
        .arg("-o")
        .arg(out.path())
        .assert()
        .success()
        .stdout("");
    let written = std::fs::read_to_string(out.path()).unwrap();
    assert!(written.contains("AGGAGG\t3\t10"));
}

#[test]
fn models_file_describes_alignment() {
    let fasta = fasta_file(RBS_FASTA).unwrap();
    let models = NamedTempFile::new().unwrap();
    genestart(7)
        .unwrap()
        .arg("-i")
        .arg(fasta.path())
        .arg("--align")
        .arg("left")
        .arg("--models")
        .arg(models.path())
        .assert()
        .success();
    let text = std::fs::read_to_string(models.path()).unwrap();
    assert!(text.starts_with("$MOTIF_WIDTH 6\n$MOTIF_ORDER 0\n$MOTIF_MAT\n"));
    assert!(text.contains("$BACKGROUND_ORDER 0\n$BACKGROUND_MAT\n"));
    assert!(text.contains("$ALIGN left\n$POS_DISTR\n"));
}

#[test]
fn empty_input_prints_header_only() {
    let report = run_genestart("", 1, &[]).unwrap();
    assert_eq!(report, "NAME MotifFinder\nVERSION 1.0\n");
}

#[test]
fn sequence_shorter_than_motif_fails() {
    let fasta = fasta_file(">long\nACGTACGT\n>short\nACG\n").unwrap();
    let output = genestart(1)
        .unwrap()
        .arg("-i")
        .arg(fasta.path())
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("SequenceTooShort"), "unexpected stderr: {stderr}");
}

#[test]
fn invalid_residue_fails() {
    let fasta = fasta_file(">x\nACGTXACGT\n").unwrap();
    genestart(1)
        .unwrap()
        .arg("-i")
        .arg(fasta.path())
        .assert()
        .failure();
}

#[test]
fn invalid_configuration_fails() {
    let fasta = fasta_file(RBS_FASTA).unwrap();
    genestart(1)
        .unwrap()
        .arg("-i")
        .arg(fasta.path())
        .arg("-w")
        .arg("0")
        .assert()
        .failure();
}

#[test]
fn unknown_alignment_rejected_by_parser() {
    genestart(1)
        .unwrap()
        .arg("--align")
        .arg("center")
        .assert()
        .failure()
        .code(2);
}
