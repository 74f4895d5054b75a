//! Pairwise overlap detection and quality-weighted mismatch reconciliation.

use crate::model::{ReadPair, SIGNIFICANT_PHRED_DIFFERENCE, R1, R2, ZERO_QUAL};

/// Try to overlap R1 against revcomp(R2) (R2 is assumed already
/// reverse-complemented by the caller so both reads share a strand).
///
/// On success, mismatched overlap positions are reconciled in place
/// (the higher-quality base wins outright if the Phred gap exceeds
/// [`SIGNIFICANT_PHRED_DIFFERENCE`], otherwise both are set to N/'!'),
/// `reads[R1].nonoverlapping_len` is set to the overlap offset, and
/// `fragment_size` is set to `L2 + offset`. Returns `true` iff an overlap
/// of at least `min_overlap` bases with at most `allowed` mismatches was
/// found.
///
/// Idempotent: running this again on an already-reconciled pair finds the
/// same offset (no mismatches remain there) and leaves it unchanged.
pub fn find_and_reconcile_overlap(pair: &mut ReadPair, min_overlap: usize, allowed: usize) -> bool {
    let len1 = pair.reads[R1].len();
    let len2 = pair.reads[R2].len();

    if min_overlap > len1 || min_overlap > len2 {
        return false;
    }

    let start_lo = len1.saturating_sub(len2);
    let start_hi = len1 - min_overlap;

    let mut best_start = None;
    for start in start_lo..=start_hi {
        let mut mismatches = 0usize;
        let mut ok = true;
        let span = len2.min(len1 - start);
        for i in 0..span {
            let a = pair.reads[R1].seq[start + i];
            let b = pair.reads[R2].seq[i];
            if a != b && a != b'N' && b != b'N' {
                mismatches += 1;
                if mismatches > allowed {
                    ok = false;
                    break;
                }
            }
        }
        if ok {
            best_start = Some(start);
            break;
        }
    }

    let Some(start) = best_start else {
        return false;
    };

    let span = len2.min(len1 - start);
    for i in 0..span {
        let a = pair.reads[R1].seq[start + i];
        let b = pair.reads[R2].seq[i];
        if a != b {
            let qa = pair.reads[R1].qual[start + i];
            let qb = pair.reads[R2].qual[i];
            if qa > qb.saturating_add(SIGNIFICANT_PHRED_DIFFERENCE) {
                pair.reads[R2].seq[i] = a;
                pair.reads[R2].qual[i] = qa;
            } else if qb > qa.saturating_add(SIGNIFICANT_PHRED_DIFFERENCE) {
                pair.reads[R1].seq[start + i] = b;
                pair.reads[R1].qual[start + i] = qb;
            } else {
                pair.reads[R1].seq[start + i] = b'N';
                pair.reads[R2].seq[i] = b'N';
                pair.reads[R1].qual[start + i] = ZERO_QUAL;
                pair.reads[R2].qual[i] = ZERO_QUAL;
            }
        }
    }

    pair.reads[R1].nonoverlapping_len = start;
    pair.fragment_size = (len2 + start) as u32;
    true
}
