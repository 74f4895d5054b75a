//! Family assignment: partition read pairs into maximal sets of mutual
//! approximate duplicates (transitive closure), per fragment-size bin.
//!
//! Small bins are clustered by brute-force pairwise comparison. Bins at or
//! above [`LARGE_BIN_THRESHOLD`] use an offset-bucket multi-pass scheme:
//! each pass sorts the bin by a narrow 12-byte window and brute-forces
//! within the resulting key-equivalence runs, then merges the new labels
//! into the accumulated ones via `MergeMatrixEntry`. See the design notes for
//! why `allowed + 4` passes at stride [`OFFSET_STRIDE`] starting at
//! [`OFFSET_BASE`] are sufficient to co-cluster every true duplicate pair.

use crate::equality::are_approx_duplicates;
use crate::model::{ReadPair, LARGE_BIN_THRESHOLD, OFFSET_BASE, OFFSET_STRIDE, R1, R2};

/// Sort the whole array into fragment-size bins (descending) and assign a
/// globally unique, non-zero `family` label to every pair so that within a
/// family all pairs are mutual approximate duplicates under `allowed`
/// mismatches, and families partition the record set.
pub fn assign_families(pairs: &mut [ReadPair], allowed: usize) {
    pairs.sort_unstable_by(|a, b| b.fragment_size.cmp(&a.fragment_size));

    let mut current_family: i64 = 0;
    let mut bin_start = 0usize;
    while bin_start < pairs.len() {
        let mut bin_end = bin_start + 1;
        while bin_end < pairs.len() && pairs[bin_end].fragment_size == pairs[bin_start].fragment_size {
            bin_end += 1;
        }

        let bin = &mut pairs[bin_start..bin_end];
        if bin.len() < LARGE_BIN_THRESHOLD {
            brute_assign_families(bin, &mut current_family, allowed);
        } else {
            assign_families_bucketed(bin, &mut current_family, allowed);
        }

        bin_start = bin_end;
    }
}

/// O(n^2) pairwise clustering with transitive-closure relabeling, suitable
/// for bins below [`LARGE_BIN_THRESHOLD`].
fn brute_assign_families(bin: &mut [ReadPair], current_family: &mut i64, allowed: usize) {
    for i in 0..bin.len() {
        if bin[i].family == 0 {
            *current_family += 1;
            bin[i].family = *current_family;
        }
        for j in (i + 1)..bin.len() {
            let (left, right) = bin.split_at_mut(j);
            let a = &left[i];
            let b = &right[0];
            if are_approx_duplicates(a, b, allowed) {
                if bin[j].family == 0 {
                    bin[j].family = bin[i].family;
                } else if bin[j].family != bin[i].family {
                    let joined = bin[j].family;
                    let target = bin[i].family;
                    for rec in bin.iter_mut() {
                        if rec.family == joined {
                            rec.family = target;
                        }
                    }
                }
            }
        }
    }
}

fn short_key(seq: &[u8], offset: usize) -> &[u8] {
    if offset >= seq.len() {
        &[]
    } else {
        &seq[offset..(offset + OFFSET_STRIDE).min(seq.len())]
    }
}

fn sort_key(pair: &ReadPair, offset: usize) -> ([u8; OFFSET_STRIDE], [u8; OFFSET_STRIDE]) {
    let mut k1 = [0u8; OFFSET_STRIDE];
    let mut k2 = [0u8; OFFSET_STRIDE];
    let s1 = short_key(&pair.reads[R1].seq, offset);
    let s2 = short_key(&pair.reads[R2].seq, offset);
    k1[..s1.len()].copy_from_slice(s1);
    k2[..s2.len()].copy_from_slice(s2);
    (k1, k2)
}

/// `(first_match, second_match, swap)` for one previously-seen family
/// label, used to detect and unify splits introduced by a narrow sort key.
#[derive(Clone, Copy, Default)]
struct MergeMatrixEntry {
    first_match: i64,
    second_match: i64,
    swap: i64,
}

/// Offset-bucket multi-pass clustering for bins at or above
/// [`LARGE_BIN_THRESHOLD`].
fn assign_families_bucketed(bin: &mut [ReadPair], current_family: &mut i64, allowed: usize) {
    let passes = allowed + 4;
    let mut matrix = vec![MergeMatrixEntry::default(); bin.len() + 1];

    for n in 0..passes {
        let offset = OFFSET_BASE + OFFSET_STRIDE * n;
        bin.sort_unstable_by(|a, b| sort_key(a, offset).cmp(&sort_key(b, offset)));

        let mut temp_family: i64 = 0;
        let mut run_start = 0usize;
        while run_start < bin.len() {
            let mut run_end = run_start + 1;
            let key_start = sort_key(&bin[run_start], offset);
            while run_end < bin.len() && sort_key(&bin[run_end], offset) == key_start {
                run_end += 1;
            }
            brute_assign_families(&mut bin[run_start..run_end], &mut temp_family, allowed);
            run_start = run_end;
        }

        if n == 0 {
            for rec in bin.iter_mut() {
                rec.prevfamily = rec.family;
                rec.family = 0;
            }
            continue;
        }

        loop {
            for entry in matrix.iter_mut() {
                *entry = MergeMatrixEntry::default();
            }
            let mut incomplete = false;
            let mut merge_required = false;

            for rec in bin.iter() {
                let f = rec.family as usize;
                let p = rec.prevfamily;
                if matrix[f].first_match == 0 {
                    matrix[f].first_match = p;
                } else if matrix[f].first_match == p {
                    // no-op: already the recorded first match
                } else if matrix[f].second_match == 0 {
                    matrix[f].second_match = p;
                    let first = matrix[f].first_match as usize;
                    if matrix[first].swap == 0 {
                        matrix[p as usize].swap = matrix[f].first_match;
                        merge_required = true;
                    } else {
                        incomplete = true;
                    }
                } else if matrix[f].second_match == p {
                    // no-op: already the recorded second match
                } else {
                    incomplete = true;
                }
            }

            if merge_required {
                for rec in bin.iter_mut() {
                    let p = rec.prevfamily as usize;
                    if matrix[p].swap != 0 {
                        rec.prevfamily = matrix[p].swap;
                    }
                }
            }

            if !incomplete {
                break;
            }
        }

        for rec in bin.iter_mut() {
            rec.family = 0;
        }
    }

    let mut max_family = *current_family;
    for rec in bin.iter_mut() {
        let family = rec.prevfamily + *current_family;
        rec.family = family;
        if family > max_family {
            max_family = family;
        }
    }
    *current_family = max_family;
}
