use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box of a word on a page, in page coordinates.
///
/// Geometry is carried through the pipeline untouched; the engine never
/// interprets it beyond handing it back to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl Rect {
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }
}

/// One word as produced by a text extractor: page index, bounding box and the
/// raw (unnormalized) text, in reading order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawWord {
    pub page: usize,
    pub rect: Rect,
    pub text: String,
}

impl RawWord {
    pub fn new(page: usize, rect: Rect, text: impl Into<String>) -> Self {
        Self {
            page,
            rect,
            text: text.into(),
        }
    }
}

/// A filtered word: one or two raw constituents (two when a hyphenation break
/// was merged) plus the normalized text used for all matching.
///
/// Immutable after creation; positions into the owning [`DocumentTable`] are
/// the unit of positional reasoning everywhere downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordRecord {
    pub parts: Vec<RawWord>,
    pub normalized: String,
}

/// Ordered table of filtered words for one document.
///
/// The index into `records` is the "filtered word index". The original
/// pre-filter positions are not retained; only `raw_word_count` survives so
/// callers can report totals over the unfiltered stream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentTable {
    pub records: Vec<WordRecord>,
    /// Post-dehyphenation, pre-filter word count.
    pub raw_word_count: usize,
}

impl DocumentTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Normalized text of the filtered word at `idx`.
    pub fn normalized(&self, idx: usize) -> &str {
        self.records[idx].normalized.as_str()
    }

    /// Space-joined normalized text of `n` consecutive words starting at
    /// `start`. Used for fuzzy shingle comparison.
    pub fn joined(&self, start: usize, n: usize) -> String {
        let end = (start + n).min(self.records.len());
        let mut out = String::new();
        for record in &self.records[start..end] {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(&record.normalized);
        }
        out
    }
}
