use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokenize::{RawWord, Rect};

/// Candidate generation strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Exact shingle-hash lookup, re-verified word-by-word.
    #[default]
    Exact,
    /// Word-overlap voting plus edit-distance acceptance.
    Fuzzy,
}

/// Parameters shared by candidate generation and block merging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchParams {
    /// Words per shingle.
    pub seed_size: usize,
    /// Maximum target-side gap between a block and a candidate extending it.
    pub merge_distance: usize,
    /// Maximum divergence between target-side and source-side advance.
    pub max_drift: usize,
    /// Fuzzy mode: maximum character edit distance between joined shingles.
    pub max_edit_distance: usize,
    /// Blocks spanning fewer target words than this are discarded.
    pub min_block_words: usize,
}

impl Default for MatchParams {
    fn default() -> Self {
        Self {
            seed_size: 3,
            merge_distance: 15,
            max_drift: 5,
            max_edit_distance: 5,
            min_block_words: 3,
        }
    }
}

/// One shingle-level correspondence between target and a reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchCandidate {
    pub target_idx: usize,
    pub source: usize,
    pub source_idx: usize,
}

/// A run of near-contiguous candidates against one reference document.
/// `target_start..target_end` is half-open over filtered target indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchBlock {
    /// Stable id assigned when the block is opened; shared by all highlights
    /// the block produces.
    pub id: u64,
    pub source: usize,
    pub target_start: usize,
    pub target_end: usize,
    pub source_start: usize,
    pub last_source_idx: usize,
}

impl MatchBlock {
    pub fn target_len(&self) -> usize {
        self.target_end - self.target_start
    }
}

/// Final per-word-box output unit: one per matched filtered word per
/// constituent raw box.
#[derive(Debug, Clone, Serialize)]
pub struct Highlight {
    pub page: usize,
    pub rect: Rect,
    /// Path of the matched reference document.
    pub source: Arc<str>,
    /// Raw boxes covering the block's source-side range, for display.
    pub source_words: Arc<[RawWord]>,
    pub match_id: u64,
    pub confidence: f32,
}

/// Aggregated comparison output.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CompareOutcome {
    pub highlights_by_page: BTreeMap<usize, Vec<Highlight>>,
    /// Post-dehyphenation, pre-filter word count of the target.
    pub total_word_count: usize,
    /// Distinct matched filtered target words per reference path.
    pub coverage_by_source: HashMap<String, usize>,
}

impl CompareOutcome {
    /// Share of the target's words attributed to `source`, as a percentage.
    /// An empty target reports 0 rather than dividing by zero.
    pub fn coverage_percent(&self, source: &str) -> f64 {
        let covered = self.coverage_by_source.get(source).copied().unwrap_or(0);
        if self.total_word_count == 0 {
            0.0
        } else {
            covered as f64 * 100.0 / self.total_word_count as f64
        }
    }
}
