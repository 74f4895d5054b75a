//! Consensus collapse: merge every pair within a family into one
//! weighted-majority representative.

use crate::model::{ReadPair, R1, R2, ZERO_QUAL};

/// Sort by family so members are contiguous, then replace each family's
/// members with a single consensus record. Returns the post-collapse
/// length (also `pairs.len()` after this call truncates).
pub fn collapse_families(pairs: &mut Vec<ReadPair>) -> usize {
    pairs.sort_unstable_by_key(|p| p.family);

    let mut write = 0usize;
    let mut start = 0usize;
    while start < pairs.len() {
        let mut end = start + 1;
        while end < pairs.len() && pairs[end].family == pairs[start].family {
            end += 1;
        }

        let consensus = merge_reads(&mut pairs[start..end]);
        pairs[write] = consensus;
        write += 1;
        start = end;
    }

    pairs.truncate(write);
    write
}

/// Collapse a single family (all members equal-family, `members.len() >= 1`)
/// into one consensus `ReadPair` via position-wise weighted-majority voting,
/// weighted by each member's `copy_number`.
fn merge_reads(members: &mut [ReadPair]) -> ReadPair {
    // Use the longest member (by R1 length, ties broken by R2 length) as the
    // scaffold so the consensus buffer is never shorter than any member.
    let longest = members
        .iter()
        .enumerate()
        .max_by_key(|(_, p)| (p.reads[R1].len(), p.reads[R2].len()))
        .map(|(i, _)| i)
        .unwrap_or(0);
    members.swap(0, longest);

    let total_copies: u32 = members.iter().map(|p| p.copy_number).sum();
    let mut consensus = members[0].clone();
    consensus.copy_number = total_copies;

    for read in [R1, R2] {
        let len = consensus.reads[read].len();
        for pos in 0..len {
            let mut votes: Vec<(u8, u32, u8)> = Vec::new(); // (base, weight, best_qual)
            let mut total_weight = 0u32;

            for member in members.iter() {
                let Some(&base) = member.reads[read].seq.get(pos) else {
                    continue;
                };
                if base == b'N' {
                    continue;
                }
                let qual = member.reads[read].qual[pos];
                total_weight += member.copy_number;
                if let Some(slot) = votes.iter_mut().find(|(b, _, _)| *b == base) {
                    slot.1 += member.copy_number;
                    if qual > slot.2 {
                        slot.2 = qual;
                    }
                } else {
                    votes.push((base, member.copy_number, qual));
                }
            }

            let required = (6 * total_weight as u64 + 9) / 10;
            let winner = votes
                .iter()
                .max_by_key(|(_, w, _)| *w)
                .filter(|(_, w, _)| *w as u64 >= required);

            match winner {
                Some(&(base, _, qual)) => {
                    consensus.reads[read].seq[pos] = base;
                    consensus.reads[read].qual[pos] = qual;
                }
                None => {
                    consensus.reads[read].seq[pos] = b'N';
                    consensus.reads[read].qual[pos] = ZERO_QUAL;
                }
            }
        }
    }

    consensus
}
