//! Coalescing raw candidates into contiguous match blocks.
//!
//! A single linear sweep over candidates sorted by `(source, target, source)`
//! keeps one open block at a time. A candidate extends the open block when it
//! stays within the configured target-side gap (small overlaps tolerated down
//! to `-seed_size`) and its source-side advance tracks the target-side
//! advance within `max_drift` words.

use crate::types::{MatchBlock, MatchCandidate, MatchParams};

pub fn merge_candidates(
    mut candidates: Vec<MatchCandidate>,
    params: &MatchParams,
) -> Vec<MatchBlock> {
    // Full key, so block formation is deterministic regardless of the order
    // chunks finished in.
    candidates.sort_unstable_by_key(|c| (c.source, c.target_idx, c.source_idx));

    let seed = params.seed_size;
    let extends = |block: &MatchBlock, cand: &MatchCandidate| {
        let dist = cand.target_idx as i64 - block.target_end as i64;
        let gap_t = cand.target_idx as i64 - (block.target_end as i64 - seed as i64);
        let gap_s = cand.source_idx as i64 - block.last_source_idx as i64;
        cand.source == block.source
            && dist <= params.merge_distance as i64
            && dist >= -(seed as i64)
            && (gap_t - gap_s).unsigned_abs() <= params.max_drift as u64
    };

    let mut next_id = 0u64;
    let mut open: Option<MatchBlock> = None;
    let mut blocks = Vec::new();

    for cand in candidates {
        match open.as_mut() {
            Some(block) if extends(block, &cand) => {
                block.target_end = block.target_end.max(cand.target_idx + seed);
                block.last_source_idx = cand.source_idx;
            }
            _ => {
                if let Some(done) = open.take() {
                    blocks.push(done);
                }
                open = Some(MatchBlock {
                    id: next_id,
                    source: cand.source,
                    target_start: cand.target_idx,
                    target_end: cand.target_idx + seed,
                    source_start: cand.source_idx,
                    last_source_idx: cand.source_idx,
                });
                next_id += 1;
            }
        }
    }
    if let Some(block) = open {
        blocks.push(block);
    }

    blocks.retain(|b| b.target_len() >= params.min_block_words);
    blocks
}
