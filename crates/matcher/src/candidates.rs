//! Raw candidate generation against a built [`ReferenceIndex`].
//!
//! Both strategies operate on a chunk (a range of target shingle start
//! positions) so the caller can fan chunks out across threads; the functions
//! themselves only read the immutable index.

use std::collections::HashMap;
use std::ops::Range;

use refindex::ReferenceIndex;
use tokenize::DocumentTable;

use crate::types::{MatchCandidate, MatchParams};

/// Split `total` shingle positions into chunks sized for `max_workers`
/// parallel tasks. Small documents collapse into a single chunk.
pub fn chunk_ranges(total: usize, max_workers: usize) -> Vec<Range<usize>> {
    if total == 0 {
        return Vec::new();
    }
    let chunk = (total / max_workers.max(1)).max(100);
    (0..total)
        .step_by(chunk)
        .map(|start| start..(start + chunk).min(total))
        .collect()
}

/// True when `seed_size` filtered words starting at `t_start`/`s_start` are
/// identical. Guards exact mode against shingle-hash collisions.
fn words_equal(
    target: &DocumentTable,
    t_start: usize,
    source: &DocumentTable,
    s_start: usize,
    seed_size: usize,
) -> bool {
    if t_start + seed_size > target.len() || s_start + seed_size > source.len() {
        return false;
    }
    (0..seed_size).all(|k| target.normalized(t_start + k) == source.normalized(s_start + k))
}

/// Exact mode: hash lookup, then word-by-word verification of every posting.
pub fn match_chunk_exact(
    target: &DocumentTable,
    target_hashes: &[u64],
    chunk: Range<usize>,
    index: &ReferenceIndex,
    params: &MatchParams,
) -> Vec<MatchCandidate> {
    let mut out = Vec::new();
    for target_idx in chunk {
        for posting in index.shingle_postings(target_hashes[target_idx]) {
            let source_table = &index.doc(posting.source).table;
            if words_equal(
                target,
                target_idx,
                source_table,
                posting.index,
                params.seed_size,
            ) {
                out.push(MatchCandidate {
                    target_idx,
                    source: posting.source,
                    source_idx: posting.index,
                });
            }
        }
    }
    out
}

/// Fuzzy mode: each constituent word of a target shingle votes for the
/// source start positions it could belong to; positions reaching
/// `seed_size - 1` votes are checked by character-level edit distance over
/// the space-joined shingle texts.
pub fn match_chunk_fuzzy(
    target: &DocumentTable,
    chunk: Range<usize>,
    index: &ReferenceIndex,
    params: &MatchParams,
) -> Vec<MatchCandidate> {
    let seed = params.seed_size;
    let mut out = Vec::new();
    let mut votes: HashMap<(usize, usize), usize> = HashMap::new();

    for target_idx in chunk {
        votes.clear();
        for k in 0..seed {
            let word = target.normalized(target_idx + k);
            for posting in index.word_postings(word) {
                for offset in 0..seed {
                    if posting.index >= offset {
                        *votes.entry((posting.source, posting.index - offset)).or_default() += 1;
                    }
                }
            }
        }

        let target_text = target.joined(target_idx, seed);
        for (&(source, source_idx), &count) in votes.iter() {
            if count < seed.saturating_sub(1) {
                continue;
            }
            let source_table = &index.doc(source).table;
            if source_idx + seed > source_table.len() {
                continue;
            }
            let source_text = source_table.joined(source_idx, seed);
            if strsim::levenshtein(&target_text, &source_text) <= params.max_edit_distance {
                out.push(MatchCandidate {
                    target_idx,
                    source,
                    source_idx,
                });
            }
        }
    }
    out
}
