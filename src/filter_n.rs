//! Drop reads lacking a minimum count of non-N bases in either mate.

use crate::model::{ReadPair, MINIMUM_NON_N_BASES, R1, R2};

fn has_enough_non_n_bases(seq: &[u8]) -> bool {
    let mut bases = 0usize;
    for &b in seq {
        if b != b'N' {
            bases += 1;
            if bases >= MINIMUM_NON_N_BASES {
                return true;
            }
        }
    }
    false
}

/// Remove pairs where either mate has fewer than [`MINIMUM_NON_N_BASES`]
/// non-N bases (these would match everything under the approximate-equality
/// test and pollute downstream clustering). Returns the number removed.
pub fn remove_n_only_reads(pairs: &mut Vec<ReadPair>) -> usize {
    let before = pairs.len();
    pairs.retain(|p| {
        has_enough_non_n_bases(&p.reads[R1].seq) && has_enough_non_n_bases(&p.reads[R2].seq)
    });
    before - pairs.len()
}
