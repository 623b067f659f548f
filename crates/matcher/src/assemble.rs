//! Final assembly: refined (or coarse) blocks → per-page highlights and
//! per-source coverage.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use refindex::ReferenceIndex;
use tokenize::{DocumentTable, RawWord};
use tracing::debug;

use crate::align::{smith_waterman, AlignScoring};
use crate::types::{CompareOutcome, Highlight, MatchBlock};

/// Confidence for a block whose refinement was rejected.
const UNREFINED_CONFIDENCE: f32 = 0.7;
/// A refined alignment replaces the block only when it covers more than this
/// share of the block's target span.
const ADOPTION_THRESHOLD: f32 = 0.5;

/// Alignment-refinement settings for one comparison.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RefineOptions {
    pub enabled: bool,
    /// Window expansion, in filtered words, on each side of a block.
    pub expansion: usize,
    pub scoring: AlignScoring,
}

impl Default for RefineOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            expansion: 1,
            scoring: AlignScoring::default(),
        }
    }
}

fn window_strs(table: &DocumentTable, start: usize, end: usize) -> Vec<&str> {
    table.records[start..end]
        .iter()
        .map(|r| r.normalized.as_str())
        .collect()
}

/// Turn merged blocks into the caller-facing outcome, optionally running
/// local alignment per block. `progress` receives `(blocks_done, total)`.
pub fn assemble_blocks(
    blocks: &[MatchBlock],
    target: &DocumentTable,
    index: &ReferenceIndex,
    refine: &RefineOptions,
    total_word_count: usize,
    progress: &mut dyn FnMut(usize, usize),
) -> CompareOutcome {
    let mut outcome = CompareOutcome {
        total_word_count,
        ..CompareOutcome::default()
    };
    let mut covered: HashMap<usize, HashSet<usize>> = HashMap::new();

    for (done, block) in blocks.iter().enumerate() {
        let source_table = &index.doc(block.source).table;

        let mut indices: Vec<usize> = (block.target_start..block.target_end).collect();
        let mut s_start = block.source_start;
        let mut s_end = block.source_start + block.target_len();
        let mut confidence = UNREFINED_CONFIDENCE;

        if refine.enabled {
            let t_s = block.target_start.saturating_sub(refine.expansion);
            let t_e = (block.target_end + refine.expansion).min(target.len());
            let s_s = block.source_start.saturating_sub(refine.expansion);
            let s_e = (block.source_start + block.target_len() + refine.expansion)
                .min(source_table.len());

            let result = smith_waterman(
                &window_strs(target, t_s, t_e),
                &window_strs(source_table, s_s, s_e),
                &refine.scoring,
            );
            let aligned: Vec<usize> = result.indices.iter().map(|&i| t_s + i).collect();

            if aligned.len() as f32 > block.target_len() as f32 * ADOPTION_THRESHOLD {
                indices = aligned;
                s_start = s_s;
                s_end = s_e;
                confidence = result.confidence;
            } else {
                debug!(
                    block = block.id,
                    aligned = aligned.len(),
                    span = block.target_len(),
                    "alignment rejected, keeping coarse block"
                );
            }
        } else {
            // Without refinement, scale confidence with block length.
            confidence = (0.5 + block.target_len() as f32 / 20.0 * 0.5).min(1.0);
        }

        let s_start = s_start.min(source_table.len());
        let s_end = s_end.min(source_table.len());
        let source_words: Arc<[RawWord]> = source_table.records[s_start..s_end]
            .iter()
            .flat_map(|r| r.parts.iter().cloned())
            .collect::<Vec<_>>()
            .into();
        let source_path: Arc<str> = Arc::from(index.doc(block.source).path.as_str());

        for idx in indices {
            if idx >= target.len() {
                continue;
            }
            for part in &target.records[idx].parts {
                outcome
                    .highlights_by_page
                    .entry(part.page)
                    .or_default()
                    .push(Highlight {
                        page: part.page,
                        rect: part.rect,
                        source: Arc::clone(&source_path),
                        source_words: Arc::clone(&source_words),
                        match_id: block.id,
                        confidence,
                    });
            }
            covered.entry(block.source).or_default().insert(idx);
        }

        progress(done + 1, blocks.len());
    }

    for (source, indices) in covered {
        outcome
            .coverage_by_source
            .insert(index.doc(source).path.clone(), indices.len());
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::merge_candidates;
    use crate::candidates::match_chunk_exact;
    use crate::types::MatchParams;
    use refindex::{shingle_hashes, IndexedFile};
    use tokenize::{tokenize_words, RawWord, Rect};

    const SEED: u64 = 7;

    fn table(words: &str) -> DocumentTable {
        let raw = words
            .split_whitespace()
            .enumerate()
            .map(|(i, w)| RawWord::new(0, Rect::new(i as f32, 0.0, i as f32 + 1.0, 1.0), w))
            .collect();
        tokenize_words(raw)
    }

    fn pipeline(reference: &str, target_text: &str, refine: &RefineOptions) -> CompareOutcome {
        let mut index = ReferenceIndex::new();
        index.merge(IndexedFile::build("ref.txt", table(reference), 3, SEED));
        let target = table(target_text);
        let hashes = shingle_hashes(&target, 3, SEED);
        let params = MatchParams::default();
        let cands = match_chunk_exact(&target, &hashes, 0..hashes.len(), &index, &params);
        let blocks = merge_candidates(cands, &params);
        let total = target.raw_word_count;
        assemble_blocks(&blocks, &target, &index, refine, total, &mut |_, _| {})
    }

    #[test]
    fn full_overlap_covers_every_filtered_word() {
        let text = "quick brown fox jumps lazy dog near quiet river bank today";
        let outcome = pipeline(text, text, &RefineOptions::default());
        let covered = outcome.coverage_by_source.get("ref.txt").copied();
        assert_eq!(covered, Some(table(text).len()));
        // One highlight per word, all on page 0, sharing one match id.
        let highlights = &outcome.highlights_by_page[&0];
        assert_eq!(highlights.len(), table(text).len());
        assert!(highlights.iter().all(|h| h.match_id == highlights[0].match_id));
        assert!(highlights.iter().all(|h| h.confidence >= 0.9));
    }

    #[test]
    fn disjoint_documents_produce_nothing() {
        let outcome = pipeline(
            "quick brown fox jumps lazy dog",
            "seven stars shine bright midnight sky",
            &RefineOptions::default(),
        );
        assert!(outcome.highlights_by_page.is_empty());
        assert!(outcome.coverage_by_source.is_empty());
    }

    #[test]
    fn disabled_refinement_scales_confidence_with_length() {
        let text = "quick brown fox jumps lazy dog near quiet river bank";
        let refine = RefineOptions {
            enabled: false,
            ..RefineOptions::default()
        };
        let outcome = pipeline(text, text, &refine);
        let highlights = &outcome.highlights_by_page[&0];
        let expected = (0.5 + table(text).len() as f32 / 20.0 * 0.5).min(1.0);
        assert!(highlights.iter().all(|h| (h.confidence - expected).abs() < 1e-6));
    }

    #[test]
    fn progress_ticks_once_per_block() {
        let text = "quick brown fox jumps lazy dog";
        let mut index = ReferenceIndex::new();
        index.merge(IndexedFile::build("ref.txt", table(text), 3, SEED));
        let target = table(text);
        let hashes = shingle_hashes(&target, 3, SEED);
        let params = MatchParams::default();
        let cands = match_chunk_exact(&target, &hashes, 0..hashes.len(), &index, &params);
        let blocks = merge_candidates(cands, &params);
        assert_eq!(blocks.len(), 1);

        let mut ticks = Vec::new();
        assemble_blocks(
            &blocks,
            &target,
            &index,
            &RefineOptions::default(),
            target.raw_word_count,
            &mut |done, total| ticks.push((done, total)),
        );
        assert_eq!(ticks, vec![(1, 1)]);
    }
}
