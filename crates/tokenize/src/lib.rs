//! textmatch-tokenize: raw extracted words → filtered, indexable word tables.
//!
//! This crate owns the word-level data model shared by the whole engine
//! ([`RawWord`], [`WordRecord`], [`DocumentTable`]) and the tokenization
//! pipeline: dehyphenation of line-break splits, alphanumeric lowercasing,
//! and stopword filtering. It performs no I/O; extractors feed it raw word
//! streams in reading order.

mod pipeline;
mod stopwords;
mod word;

pub use pipeline::{normalize, tokenize_words};
pub use stopwords::is_stopword;
pub use word::{DocumentTable, RawWord, Rect, WordRecord};
