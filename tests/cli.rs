//! End-to-end test of the `dedup-fastq` binary via `assert_cmd`.

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::NamedTempFile;

fn write_fastq(records: &[(&str, &str, &str)]) -> NamedTempFile {
    let mut f = NamedTempFile::with_suffix(".fastq").unwrap();
    for (name, seq, qual) in records {
        writeln!(f, "{name}\n{seq}\n+\n{qual}").unwrap();
    }
    f.flush().unwrap();
    f
}

#[test]
fn runs_end_to_end_and_writes_deduped_output() {
    let r1_seq = "ACGT".repeat(25);
    let r2_seq = "A".repeat(100);
    let qual = "I".repeat(100);

    let r1 = write_fastq(&[("@frag1/1", &r1_seq, &qual), ("@frag2/1", &r1_seq, &qual)]);
    let r2 = write_fastq(&[("@frag1/2", &r2_seq, &qual), ("@frag2/2", &r2_seq, &qual)]);

    let mut cmd = Command::cargo_bin("dedup-fastq").unwrap();
    cmd.arg("-1").arg(r1.path()).arg("-2").arg(r2.path());
    cmd.assert().success();

    let stem = r1.path().file_stem().unwrap().to_str().unwrap();
    let out_path = r1.path().with_file_name(format!("{stem}.deduped.fastq"));
    assert!(out_path.exists());
    let contents = std::fs::read_to_string(&out_path).unwrap();
    assert_eq!(contents.lines().count(), 4);
}

#[test]
fn rejects_mismatched_record_counts() {
    let r1 = write_fastq(&[("@a/1", "ACGT", "IIII"), ("@b/1", "ACGT", "IIII")]);
    let r2 = write_fastq(&[("@a/2", "ACGT", "IIII")]);

    let mut cmd = Command::cargo_bin("dedup-fastq").unwrap();
    cmd.arg("-1").arg(r1.path()).arg("-2").arg(r2.path());
    cmd.assert().failure().stderr(predicate::str::contains("read1"));
}

#[test]
fn rejects_non_fastq_extension() {
    let mut r1 = NamedTempFile::with_suffix(".txt").unwrap();
    writeln!(r1, "@a/1\nACGT\n+\nIIII").unwrap();
    r1.flush().unwrap();
    let r2 = write_fastq(&[("@a/2", "ACGT", "IIII")]);

    let mut cmd = Command::cargo_bin("dedup-fastq").unwrap();
    cmd.arg("-1").arg(r1.path()).arg("-2").arg(r2.path());
    cmd.assert().failure().stderr(predicate::str::contains("non-.fastq(.gz) extension"));
}

#[test]
fn rejects_missing_input_file() {
    let mut cmd = Command::cargo_bin("dedup-fastq").unwrap();
    cmd.arg("-1").arg("/nonexistent/read1.fastq").arg("-2").arg("/nonexistent/read2.fastq");
    cmd.assert().failure();
}
