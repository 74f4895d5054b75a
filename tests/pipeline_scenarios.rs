//! End-to-end scenarios driving the library entry point against
//! `tempfile`-backed FASTQ fixtures.

use std::io::Write;

use dedup_fastq::pipeline::dedup;
use tempfile::NamedTempFile;

fn write_fastq(records: &[(&str, &str, &str)]) -> NamedTempFile {
    let mut f = NamedTempFile::with_suffix(".fastq").unwrap();
    for (name, seq, qual) in records {
        writeln!(f, "{name}\n{seq}\n+\n{qual}").unwrap();
    }
    f.flush().unwrap();
    f
}

fn read_lines(path: &std::path::Path) -> Vec<String> {
    std::fs::read_to_string(path).unwrap().lines().map(String::from).collect()
}

fn deduped_path(original: &std::path::Path) -> std::path::PathBuf {
    let stem = original.file_stem().unwrap().to_str().unwrap();
    original.with_file_name(format!("{stem}.deduped.fastq"))
}

fn revcomp(s: &str) -> String {
    s.bytes()
        .rev()
        .map(|b| match b {
            b'A' => b'T',
            b'T' => b'A',
            b'C' => b'G',
            b'G' => b'C',
            other => other,
        })
        .map(|b| b as char)
        .collect()
}

#[test]
fn exact_duplicate_merge_collapses_to_one_survivor() {
    let r1_seq = "ACGT".repeat(25);
    let r2_seq = "A".repeat(100);
    let qual = "I".repeat(100);

    let r1 = write_fastq(&[("@frag1/1", &r1_seq, &qual), ("@frag2/1", &r1_seq, &qual)]);
    let r2 = write_fastq(&[("@frag1/2", &r2_seq, &qual), ("@frag2/2", &r2_seq, &qual)]);

    dedup(r1.path(), r2.path(), 3, 70, false).unwrap();

    let out_r1 = read_lines(&deduped_path(r1.path()));
    // one surviving 4-line record
    assert_eq!(out_r1.len(), 4);
}

#[test]
fn n_reconciliation_keeps_the_confident_base() {
    let seq_a = "ACGTACGTAAACGTACGTACGTACGTACGTACGTACGTACGTACGTACGT";
    let seq_b = "ACGTACGTANACGTACGTACGTACGTACGTACGTACGTACGTACGTACGT";
    let mut qa = "I".repeat(seq_a.len());
    qa.replace_range(10..11, "I");
    let mut qb = "I".repeat(seq_b.len());
    qb.replace_range(10..11, "!");

    let r2_seq = "T".repeat(60);
    let r2_qual = "I".repeat(60);

    let r1 = write_fastq(&[("@a/1", seq_a, &qa), ("@b/1", seq_b, &qb)]);
    let r2 = write_fastq(&[("@a/2", &r2_seq, &r2_qual), ("@b/2", &r2_seq, &r2_qual)]);

    dedup(r1.path(), r2.path(), 3, 70, false).unwrap();

    let out = read_lines(&deduped_path(r1.path()));
    assert_eq!(out.len(), 4);
    assert_eq!(out[1].as_bytes()[10], b'A');
    assert_eq!(out[3].as_bytes()[10], b'I');
}

#[test]
fn approximate_family_of_five_collapses_to_one_consensus() {
    let base: Vec<u8> = "ACGTAGCATGCATGACTGACTGATCGATCGATGCATCGATGCATGCATCGATGCATGCATGCTAGCTAGCATCGATGC"
        .bytes()
        .collect();
    let r2_seq = "T".repeat(base.len());
    let r2_qual = "I".repeat(base.len());

    let mut r1_records = Vec::new();
    let mut r2_records = Vec::new();
    let names: Vec<String> = (0..5).map(|i| format!("@r{i}")).collect();
    let mut seqs = Vec::new();
    for i in 0..5 {
        let mut mutated = base.clone();
        let pos = 30 + i * 6;
        mutated[pos] = if mutated[pos] == b'A' { b'G' } else { b'A' };
        seqs.push(String::from_utf8(mutated).unwrap());
    }
    let qual = "I".repeat(base.len());
    for i in 0..5 {
        r1_records.push((format!("{}/1", names[i]), seqs[i].clone(), qual.clone()));
        r2_records.push((format!("{}/2", names[i]), r2_seq.clone(), r2_qual.clone()));
    }

    let r1_refs: Vec<(&str, &str, &str)> =
        r1_records.iter().map(|(n, s, q)| (n.as_str(), s.as_str(), q.as_str())).collect();
    let r2_refs: Vec<(&str, &str, &str)> =
        r2_records.iter().map(|(n, s, q)| (n.as_str(), s.as_str(), q.as_str())).collect();

    let r1 = write_fastq(&r1_refs);
    let r2 = write_fastq(&r2_refs);

    dedup(r1.path(), r2.path(), 3, 70, false).unwrap();

    let out = read_lines(&deduped_path(r1.path()));
    assert_eq!(out.len(), 4, "five approximate duplicates should collapse to one record");
}

#[test]
fn thruplex_trim_shortens_and_captures_umi() {
    let umi = "AAAAAA";
    let stem = "CCCCCCCCCCC";
    let body = "G".repeat(150 - 17);
    let r1_seq = format!("{umi}{stem}{body}");
    let qual = "I".repeat(150);

    let r2_seq = revcomp(&r1_seq);

    let r1 = write_fastq(&[("@frag/1", &r1_seq, &qual)]);
    let r2 = write_fastq(&[("@frag/2", &r2_seq, &qual)]);

    dedup(r1.path(), r2.path(), 3, 70, true).unwrap();

    let out = read_lines(&deduped_path(r1.path()));
    assert_eq!(out.len(), 4);
    assert_eq!(out[1].len(), 150 - 17);
}
