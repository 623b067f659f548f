//! textmatch-index: inverted shingle/word index over reference documents.
//!
//! Per-file results ([`IndexedFile`]) are pure functions of a tokenized word
//! table, so they can be produced on worker threads; [`ReferenceIndex::merge`]
//! is the single non-concurrent step that folds each completed file into the
//! shared maps. The index is rebuilt wholesale on every (re)index call, and
//! is strictly read-only once built.

mod cache;
mod shingle;

pub use cache::{cache_key, TokenCache, CACHE_SCHEMA_VERSION};
pub use shingle::shingle_hashes;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tokenize::DocumentTable;

/// One shingle or word occurrence inside a reference document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Posting {
    /// Index into the index's document list.
    pub source: usize,
    /// Filtered word index of the occurrence (shingle start for shingles).
    pub index: usize,
}

/// A reference document held by the index: its path and word table.
#[derive(Debug, Clone)]
pub struct ReferenceDoc {
    pub path: String,
    pub table: DocumentTable,
}

/// Per-file index contribution, computed independently of all shared state.
#[derive(Debug, Clone)]
pub struct IndexedFile {
    pub path: String,
    pub table: DocumentTable,
    shingles: Vec<u64>,
}

impl IndexedFile {
    /// Shingle a tokenized file. Pure; safe to run on any worker thread.
    pub fn build(
        path: impl Into<String>,
        table: DocumentTable,
        seed_size: usize,
        seed: u64,
    ) -> Self {
        let shingles = shingle_hashes(&table, seed_size, seed);
        Self {
            path: path.into(),
            table,
            shingles,
        }
    }
}

/// Index statistics surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexStats {
    /// Number of distinct shingle keys.
    pub total_shingles: usize,
    pub reference_file_count: usize,
}

/// Shingle postings, word postings and word tables for one reference set.
#[derive(Debug, Default)]
pub struct ReferenceIndex {
    docs: Vec<ReferenceDoc>,
    shingles: HashMap<u64, Vec<Posting>>,
    words: HashMap<String, Vec<Posting>>,
}

impl ReferenceIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all reference state. Called before every rebuild.
    pub fn clear(&mut self) {
        self.docs.clear();
        self.shingles.clear();
        self.words.clear();
    }

    /// Fold a completed file into the shared maps. Must only ever be called
    /// from the single collecting thread.
    pub fn merge(&mut self, file: IndexedFile) {
        let source = self.docs.len();
        for (index, hash) in file.shingles.iter().copied().enumerate() {
            self.shingles
                .entry(hash)
                .or_default()
                .push(Posting { source, index });
        }
        for (index, record) in file.table.records.iter().enumerate() {
            self.words
                .entry(record.normalized.clone())
                .or_default()
                .push(Posting { source, index });
        }
        self.docs.push(ReferenceDoc {
            path: file.path,
            table: file.table,
        });
    }

    pub fn doc(&self, source: usize) -> &ReferenceDoc {
        &self.docs[source]
    }

    pub fn docs(&self) -> &[ReferenceDoc] {
        &self.docs
    }

    pub fn shingle_postings(&self, hash: u64) -> &[Posting] {
        self.shingles.get(&hash).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn word_postings(&self, word: &str) -> &[Posting] {
        self.words.get(word).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn stats(&self) -> IndexStats {
        IndexStats {
            total_shingles: self.shingles.len(),
            reference_file_count: self.docs.len(),
        }
    }
}
