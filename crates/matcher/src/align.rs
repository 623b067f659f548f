//! Smith-Waterman local alignment over token windows.
//!
//! Refines a coarse match block into exact aligned target positions plus a
//! confidence score. Complexity is O(m·n) in the two window lengths, which
//! stays small because windows are block-sized plus a bounded expansion.

use serde::{Deserialize, Serialize};

/// Alignment scoring. Defaults are the engine-wide +2 / -1 / -1 scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignScoring {
    pub match_score: i32,
    pub mismatch_penalty: i32,
    pub gap_penalty: i32,
}

impl Default for AlignScoring {
    fn default() -> Self {
        Self {
            match_score: 2,
            mismatch_penalty: -1,
            gap_penalty: -1,
        }
    }
}

/// Result of one local alignment: ascending window-relative indices of the
/// exactly matched positions in the first sequence, and a confidence in
/// `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignmentResult {
    pub indices: Vec<usize>,
    pub confidence: f32,
}

impl AlignmentResult {
    fn empty() -> Self {
        Self {
            indices: Vec::new(),
            confidence: 0.0,
        }
    }
}

/// Align `seq1` (target window) against `seq2` (source window) and return the
/// matched positions of `seq1`.
///
/// Confidence weighs identity within the alignment (0.5), coverage of the
/// shorter sequence (0.3) and the raw score against a perfect alignment
/// (0.2).
pub fn smith_waterman<S1, S2>(seq1: &[S1], seq2: &[S2], scoring: &AlignScoring) -> AlignmentResult
where
    S1: AsRef<str>,
    S2: AsRef<str>,
{
    let m = seq1.len();
    let n = seq2.len();
    if m == 0 || n == 0 {
        return AlignmentResult::empty();
    }

    let width = n + 1;
    let mut score = vec![0i32; (m + 1) * width];
    let at = |i: usize, j: usize| i * width + j;

    let mut max_score = 0i32;
    let mut max_pos = (0usize, 0usize);

    for i in 1..=m {
        for j in 1..=n {
            let step = if seq1[i - 1].as_ref() == seq2[j - 1].as_ref() {
                scoring.match_score
            } else {
                scoring.mismatch_penalty
            };
            let diag = score[at(i - 1, j - 1)] + step;
            let up = score[at(i - 1, j)] + scoring.gap_penalty;
            let left = score[at(i, j - 1)] + scoring.gap_penalty;
            let cell = diag.max(up).max(left).max(0);
            score[at(i, j)] = cell;
            if cell > max_score {
                max_score = cell;
                max_pos = (i, j);
            }
        }
    }

    if max_score == 0 {
        return AlignmentResult::empty();
    }

    // Traceback, preferring the diagonal so a tie consumes a match rather
    // than opening a gap.
    let mut indices = Vec::new();
    let (mut i, mut j) = max_pos;
    let mut match_count = 0usize;
    let mut total_aligned = 0usize;

    while i > 0 && j > 0 && score[at(i, j)] > 0 {
        let cell = score[at(i, j)];
        let diag = score[at(i - 1, j - 1)];
        let is_match = seq1[i - 1].as_ref() == seq2[j - 1].as_ref();
        let step = if is_match {
            scoring.match_score
        } else {
            scoring.mismatch_penalty
        };

        if cell == diag + step || (is_match && cell >= diag) {
            total_aligned += 1;
            if is_match {
                indices.push(i - 1);
                match_count += 1;
            }
            i -= 1;
            j -= 1;
        } else if cell == score[at(i - 1, j)] + scoring.gap_penalty {
            i -= 1;
        } else {
            j -= 1;
        }
    }

    indices.reverse();

    let identity = match_count as f32 / total_aligned.max(1) as f32;
    let min_len = m.min(n);
    let coverage = indices.len() as f32 / min_len.max(1) as f32;
    let perfect = (min_len as i32 * scoring.match_score).max(1);
    let normalized = max_score as f32 / perfect as f32;

    let confidence =
        (identity * 0.5 + coverage * 0.3 + normalized.min(1.0) * 0.2).clamp(0.0, 1.0);

    AlignmentResult {
        indices,
        confidence,
    }
}
