//! Exact-duplicate collapsing: sort by sequence, merge byte-identical
//! (modulo Ns) neighbours, correcting Ns and keeping the higher quality.

use crate::equality::are_approx_duplicates;
use crate::model::{ReadPair, R1, R2};

fn cmp_by_sequence(a: &ReadPair, b: &ReadPair) -> std::cmp::Ordering {
    a.reads[R1]
        .seq
        .cmp(&b.reads[R1].seq)
        .then_with(|| a.reads[R2].seq.cmp(&b.reads[R2].seq))
}

/// Merge `src` into `dst`: wherever `dst` has an N and `src` doesn't, adopt
/// `src`'s base and quality; otherwise keep whichever quality is higher.
fn merge_into(dst: &mut ReadPair, src: &ReadPair) {
    for read in [R1, R2] {
        for k in 0..dst.reads[read].len() {
            if dst.reads[read].seq[k] == b'N' {
                dst.reads[read].seq[k] = src.reads[read].seq[k];
                dst.reads[read].qual[k] = src.reads[read].qual[k];
            } else if dst.reads[read].qual[k] < src.reads[read].qual[k] {
                dst.reads[read].qual[k] = src.reads[read].qual[k];
            }
        }
    }
    dst.copy_number += src.copy_number;
}

/// Collapse exact (up-to-N) duplicates in place. Returns the number of
/// records removed. Two adjacent records (after sorting by sequence) are
/// duplicates iff their R1/R2 lengths match pairwise and the
/// approximate-equality test with `allowed = 0` holds.
///
/// May miss some exact duplicates if an 'N' disturbs the sort order; these
/// are caught later by family assignment and consensus collapse instead.
pub fn remove_exact_duplicates(pairs: &mut Vec<ReadPair>) -> usize {
    pairs.sort_unstable_by(cmp_by_sequence);

    let mut write = 0usize;
    for read_idx in 0..pairs.len() {
        if read_idx == 0 {
            write = 0;
            continue;
        }
        let is_dup = {
            let kept = &pairs[write];
            let cur = &pairs[read_idx];
            kept.reads[R1].len() == cur.reads[R1].len()
                && kept.reads[R2].len() == cur.reads[R2].len()
                && are_approx_duplicates(kept, cur, 0)
        };
        if is_dup {
            let src = pairs[read_idx].clone();
            merge_into(&mut pairs[write], &src);
        } else {
            write += 1;
            if write != read_idx {
                pairs.swap(write, read_idx);
            }
        }
    }

    let removed = pairs.len() - (write + 1);
    pairs.truncate(write + 1);
    removed
}
