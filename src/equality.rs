//! The approximate-equality test shared by exact-duplicate collapsing and
//! family clustering: are two read pairs within `allowed` mismatches of
//! each other, treating 'N' as a wildcard on either side?

use crate::model::{ReadPair, R1, R2};

/// Count mismatches between two read pairs up to `allowed`, short-circuiting
/// as soon as the budget is exceeded.
///
/// R1 is compared over `max(nonoverlapping_len_a, nonoverlapping_len_b)`
/// bases (not `len`): once overlap reconciliation runs, only the
/// non-overlapping prefix of R1 still carries independent information, but
/// we take the longer of the two so that a read whose overlap trimmed off
/// a genuinely divergent base still gets compared on its full informative
/// span. R2 is compared over `min(len_a, len_b)` bases, since R2 always
/// retains its full length post-sizing. This asymmetry is deliberate (see
/// design notes) and must be preserved.
pub fn are_approx_duplicates(a: &ReadPair, b: &ReadPair, allowed: usize) -> bool {
    let mut mismatches = 0usize;

    let r1_len = a.reads[R1].nonoverlapping_len.max(b.reads[R1].nonoverlapping_len);
    for i in 0..r1_len {
        let (ba, bb) = match (a.reads[R1].seq.get(i), b.reads[R1].seq.get(i)) {
            (Some(&x), Some(&y)) => (x, y),
            _ => continue,
        };
        if ba != bb && ba != b'N' && bb != b'N' {
            mismatches += 1;
            if mismatches > allowed {
                return false;
            }
        }
    }

    let r2_len = a.reads[R2].len().min(b.reads[R2].len());
    for i in 0..r2_len {
        let ba = a.reads[R2].seq[i];
        let bb = b.reads[R2].seq[i];
        if ba != bb && ba != b'N' && bb != b'N' {
            mismatches += 1;
            if mismatches > allowed {
                return false;
            }
        }
    }

    true
}
