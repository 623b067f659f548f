//! textmatch: word-level detection of overlapping passages between a target
//! document and a corpus of reference documents.
//!
//! The umbrella crate stitches the member layers together behind one API:
//! tokenization (`textmatch-tokenize`), the inverted reference index and its
//! on-disk cache (`textmatch-index`), and matching/refinement/assembly
//! (`textmatch-matcher`). [`Comparator`] is the entry point: index references
//! once, compare targets repeatedly, read back per-word highlights with
//! confidence scores.
//!
//! ```no_run
//! use std::path::PathBuf;
//! use textmatch::{Comparator, CompareOptions, EngineConfig};
//!
//! # fn main() -> Result<(), textmatch::EngineError> {
//! let mut engine = Comparator::new(EngineConfig::default())?;
//! engine.add_references(&[PathBuf::from("refs/essay.txt")], None);
//! let outcome = engine.compare_document(
//!     std::path::Path::new("submission.txt"),
//!     &CompareOptions::default(),
//!     None,
//! )?;
//! for (source, words) in &outcome.coverage_by_source {
//!     println!("{source}: {words} overlapping words");
//! }
//! # Ok(())
//! # }
//! ```

mod config;
mod engine;
mod extract;

pub use config::{CompareOptions, ConfigLoadError, EngineConfig};
pub use engine::{
    Comparator, CompareProgress, EngineError, IndexProgress, IndexSummary, SkippedFile,
};
pub use extract::{ExtractError, PlainTextExtractor, WordExtractor};

pub use matcher::{
    smith_waterman, AlignScoring, AlignmentResult, CompareOutcome, Highlight, MatchMode,
    MatchParams, RefineOptions,
};
pub use refindex::{cache_key, IndexStats, ReferenceIndex, TokenCache, CACHE_SCHEMA_VERSION};
pub use tokenize::{
    is_stopword, normalize, tokenize_words, DocumentTable, RawWord, Rect, WordRecord,
};
