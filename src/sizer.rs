//! Fragment sizing and Thruplex UMI trimming.
//!
//! Sizing and UMI trimming are done in one pass because both need R2
//! temporarily reverse-complemented onto R1's strand.

use crate::model::{ReadPair, R1, R2, STEM_LEN, UMT_LEN};
use crate::overlap::find_and_reconcile_overlap;
use crate::seqops::reverse_complement;

/// Run the overlap detector and, if `thruplex` is set, trim the UMI+stem
/// from both mates (including any UMI readthrough into the other mate).
/// Returns `true` iff the pair was sized (overlap found).
pub fn size_and_trim(pair: &mut ReadPair, min_overlap: usize, allowed: usize, thruplex: bool) -> bool {
    reverse_complement(&mut pair.reads[R2].seq);
    pair.reads[R2].qual.reverse();

    let sized = find_and_reconcile_overlap(pair, min_overlap, allowed);

    if thruplex {
        trim_thruplex(pair);
    }

    reverse_complement(&mut pair.reads[R2].seq);
    pair.reads[R2].qual.reverse();

    sized
}

fn trim_thruplex(pair: &mut ReadPair) {
    let umi_stem = (UMT_LEN + STEM_LEN) as i64;

    if pair.fragment_size > 0 {
        // Both readthrough amounts are computed from the pre-trim state
        // before either correction is applied, matching the source.
        let r1_nonoverlap = pair.reads[R1].nonoverlapping_len as i64;
        let r1_len = pair.reads[R1].len() as i64;
        let r2_len = pair.reads[R2].len() as i64;
        let r1_overlap_start = r1_len - r1_nonoverlap;

        let r2_readthrough = umi_stem - r1_nonoverlap;
        let r1_readthrough = umi_stem - (r2_len - r1_overlap_start);

        if r2_readthrough > 0 {
            let shift = r2_readthrough as usize;
            pair.reads[R2].seq.drain(0..shift.min(pair.reads[R2].seq.len()));
            pair.reads[R2].qual.drain(0..shift.min(pair.reads[R2].qual.len()));
            pair.reads[R1].nonoverlapping_len += shift;
        }
        if r1_readthrough > 0 {
            let new_len = (r1_len - r1_readthrough).max(0) as usize;
            pair.reads[R1].seq.truncate(new_len);
            pair.reads[R1].qual.truncate(new_len);
        }
    }

    // Extract and trim the R1-side UMI.
    let r1_umi_end = UMT_LEN.min(pair.reads[R1].seq.len());
    pair.reads[R1].umi = Some(pair.reads[R1].seq[0..r1_umi_end].to_vec());
    let r1_drain = (UMT_LEN + STEM_LEN).min(pair.reads[R1].seq.len());
    pair.reads[R1].seq.drain(0..r1_drain);
    pair.reads[R1].qual.drain(0..r1_drain);
    pair.reads[R1].nonoverlapping_len = pair.reads[R1].nonoverlapping_len.saturating_sub(UMT_LEN + STEM_LEN);

    // Extract and trim the R2-side UMI (at the tail).
    let r2_len = pair.reads[R2].len();
    let r2_umi_start = r2_len.saturating_sub(UMT_LEN);
    pair.reads[R2].umi = Some(pair.reads[R2].seq[r2_umi_start..r2_len].to_vec());
    let r2_new_len = r2_len.saturating_sub(UMT_LEN + STEM_LEN);
    pair.reads[R2].seq.truncate(r2_new_len);
    pair.reads[R2].qual.truncate(r2_new_len);

    if pair.fragment_size > 0 {
        pair.fragment_size = pair.fragment_size.saturating_sub(2 * (UMT_LEN + STEM_LEN) as u32);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Read;
    use crate::seqops::reverse_complement;

    fn make_pair(r1_seq: &str, r2_seq_same_strand: &str) -> ReadPair {
        // r2_seq_same_strand is given on R1's strand; store R2 as its
        // reverse-complement, matching how reads come off the instrument.
        let mut r2 = r2_seq_same_strand.as_bytes().to_vec();
        reverse_complement(&mut r2);
        let mut r2_qual = "I".repeat(r2.len()).into_bytes();
        r2_qual.reverse();
        ReadPair::new(
            Read::new("r1".into(), r1_seq.as_bytes().to_vec(), "I".repeat(r1_seq.len()).into_bytes()),
            Read::new("r2".into(), r2, r2_qual),
        )
    }

    #[test]
    fn sizes_a_fully_overlapping_pair() {
        let seq = "A".repeat(100);
        let mut p = make_pair(&seq, &seq);
        assert!(size_and_trim(&mut p, 70, 3, false));
        assert_eq!(p.fragment_size, 100);
    }

    #[test]
    fn thruplex_trims_umi_and_stem_from_both_ends() {
        let umi1 = "AAAAAA"; // 6bp
        let stem1 = "CCCCCCCCCCC"; // 11bp
        let body = "G".repeat(150 - 17);
        let r1 = format!("{umi1}{stem1}{body}");
        let mut p = make_pair(&r1, &r1);
        let sized = size_and_trim(&mut p, 70, 3, true);
        assert!(sized);
        assert_eq!(p.reads[0].len(), 150 - 2 * 17);
        assert_eq!(p.reads[0].umi_slice(), Some(umi1.as_bytes()));
    }
}
