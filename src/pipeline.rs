//! Orchestrates the full dedup/consensus pipeline in the order the original
//! tool runs its passes: N-filter, exact-dedup, sizing/UMI-trim, family
//! assignment, consensus collapse, survivor filter, write.

use std::path::Path;
use std::time::Instant;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};

use crate::consensus::collapse_families;
use crate::dedup_exact::remove_exact_duplicates;
use crate::family::assign_families;
use crate::filter_n::remove_n_only_reads;
use crate::io::{read_fastqs, write_fastqs};
use crate::model::ReadPair;
use crate::sizer::size_and_trim;
use crate::survivors::remove_unconfirmed_reads;

fn log_removed(stage: &str, removed: usize, before: usize) {
    let pct = if before == 0 { 0 } else { removed * 100 / before };
    log::info!("{stage}: removed {removed} ({pct}% of {before})");
}

/// Run the full pipeline end to end and write the surviving pairs out next
/// to the input files as `<stem>.deduped.fastq[.gz]`.
pub fn dedup(read1: &Path, read2: &Path, allowed: usize, min_overlap: usize, thruplex: bool) -> Result<()> {
    let start = Instant::now();

    let mut pairs = read_fastqs(read1, read2)?;
    log::info!("Read {} pairs from {:?} / {:?}", pairs.len(), read1, read2);

    let before = pairs.len();
    let n = remove_n_only_reads(&mut pairs);
    log_removed("N-only filter", n, before);

    let before = pairs.len();
    let n = remove_exact_duplicates(&mut pairs);
    log_removed("Exact-duplicate collapse", n, before);

    let total = pairs.len();
    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("       {bar:40} {pos}/{len} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    let mut sized = 0usize;
    for pair in pairs.iter_mut() {
        if size_and_trim(pair, min_overlap, allowed, thruplex) {
            sized += 1;
        }
        pb.inc(1);
    }
    pb.finish_and_clear();
    let pct = if total == 0 { 0 } else { sized * 100 / total };
    log::info!("Sizing: sized {sized} ({pct}% of {total})");

    assign_families(&mut pairs, allowed);

    let before = pairs.len();
    let after = collapse_families(&mut pairs);
    log_removed("Consensus collapse", before - after, before);

    let before = pairs.len();
    let n = remove_unconfirmed_reads(&mut pairs);
    log_removed("Unconfirmed-read filter", n, before);

    write_fastqs(&pairs, read1, read2)?;
    log::info!("Wrote {} surviving pairs in {:.2}s", pairs.len(), start.elapsed().as_secs_f64());

    Ok(())
}

#[allow(dead_code)]
fn copy_number_sum(pairs: &[ReadPair]) -> u64 {
    pairs.iter().map(|p| p.copy_number as u64).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Read;

    #[test]
    fn copy_number_is_conserved_through_exact_dedup_and_consensus() {
        let mut pairs = vec![
            ReadPair::new(
                Read::new("a".into(), b"A".repeat(80), b"I".repeat(80)),
                Read::new("a/2".into(), b"T".repeat(80), b"I".repeat(80)),
            ),
            ReadPair::new(
                Read::new("b".into(), b"A".repeat(80), b"I".repeat(80)),
                Read::new("b/2".into(), b"T".repeat(80), b"I".repeat(80)),
            ),
        ];
        let before_sum = copy_number_sum(&pairs);
        remove_exact_duplicates(&mut pairs);
        assert_eq!(copy_number_sum(&pairs), before_sum);

        for p in pairs.iter_mut() {
            p.family = 1;
        }
        collapse_families(&mut pairs);
        assert_eq!(copy_number_sum(&pairs), before_sum);
    }
}
