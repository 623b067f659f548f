//! The comparison engine: indexing orchestration, matching, progress.
//!
//! Two parallel phases, separated by a full barrier. Reference indexing fans
//! per-file tasks out on a bounded worker pool; each task is a pure function
//! of its file (plus the cache) and streams its result back over a channel,
//! so the calling thread is the only writer of shared index state. Exact-mode
//! candidate matching fans shingle chunks out over the same pool once the
//! index is immutable. Comparisons run to completion; cancellation is the
//! caller's concern.

use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::sync::Arc;

use rayon::iter::{IntoParallelIterator, ParallelIterator};
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use matcher::{
    assemble_blocks, chunk_ranges, match_chunk_exact, match_chunk_fuzzy, merge_candidates,
    CompareOutcome, MatchCandidate, MatchMode, RefineOptions,
};
use refindex::{shingle_hashes, IndexStats, IndexedFile, ReferenceIndex, TokenCache};
use tokenize::tokenize_words;

use crate::config::{CompareOptions, ConfigLoadError, EngineConfig};
use crate::extract::{ExtractError, PlainTextExtractor, WordExtractor};

/// Errors surfaced by the engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Engine configuration rejected at construction.
    #[error(transparent)]
    Config(#[from] ConfigLoadError),
    /// The target document could not be extracted. Fatal for the comparison.
    #[error(transparent)]
    Extract(#[from] ExtractError),
    /// The worker pool could not be built.
    #[error("failed to build worker pool: {0}")]
    ThreadPool(String),
}

/// One reference file that could not be indexed.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedFile {
    pub path: String,
    pub reason: String,
}

/// Result of an indexing pass: how many files made it in, and which did not.
#[derive(Debug, Clone, Default, Serialize)]
pub struct IndexSummary {
    pub indexed: usize,
    pub skipped: Vec<SkippedFile>,
}

/// Progress callback for comparisons: `(percent, message)`.
pub type CompareProgress<'a> = &'a mut dyn FnMut(u32, &str);
/// Progress callback for indexing: `(files_completed, total_files)`.
pub type IndexProgress<'a> = &'a mut dyn FnMut(usize, usize);

struct ProgressSink<'a>(Option<CompareProgress<'a>>);

impl ProgressSink<'_> {
    fn report(&mut self, percent: u32, message: &str) {
        if let Some(cb) = self.0.as_mut() {
            cb(percent, message);
        }
    }
}

/// Detects and localizes overlapping passages between a target document and
/// an indexed set of reference documents.
///
/// References are indexed once with [`add_references`](Self::add_references)
/// and compared against repeatedly with
/// [`compare_document`](Self::compare_document), possibly under different
/// options.
pub struct Comparator {
    config: EngineConfig,
    extractor: Arc<dyn WordExtractor>,
    cache: Option<TokenCache>,
    index: ReferenceIndex,
    pool: rayon::ThreadPool,
}

impl Comparator {
    /// Engine over plain-text files.
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        Self::with_extractor(config, Arc::new(PlainTextExtractor::new()))
    }

    /// Engine with a caller-provided extractor (PDF, OCR output, ...).
    pub fn with_extractor(
        config: EngineConfig,
        extractor: Arc<dyn WordExtractor>,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.max_workers)
            .build()
            .map_err(|err| EngineError::ThreadPool(err.to_string()))?;
        let cache = config.cache_dir.clone().map(TokenCache::new);
        Ok(Self {
            config,
            extractor,
            cache,
            index: ReferenceIndex::new(),
            pool,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Index statistics for the current reference set.
    pub fn stats(&self) -> IndexStats {
        self.index.stats()
    }

    /// Clear and rebuild all reference state from `paths`.
    ///
    /// Files are processed in parallel; results are merged on this thread as
    /// they complete, and `on_progress` fires after each merge with
    /// `(files_completed, total_files)`. A file that cannot be read is
    /// skipped, logged, and reported in the summary; it never aborts the
    /// rest of the pass.
    pub fn add_references(
        &mut self,
        paths: &[PathBuf],
        mut on_progress: Option<IndexProgress<'_>>,
    ) -> IndexSummary {
        self.index.clear();
        let total = paths.len();
        let mut summary = IndexSummary::default();
        if total == 0 {
            return summary;
        }

        let (tx, rx) = mpsc::channel();
        let extractor = Arc::clone(&self.extractor);
        let cache = self.cache.clone();
        let seed_size = self.config.seed_size;
        let seed = self.config.seed;
        let owned: Vec<PathBuf> = paths.to_vec();

        self.pool.spawn(move || {
            owned.into_par_iter().for_each_with(tx, |tx, path| {
                let result = index_one_file(extractor.as_ref(), cache.as_ref(), &path, seed_size, seed);
                let _ = tx.send((path, result));
            });
        });

        let mut done = 0usize;
        for (path, result) in rx {
            match result {
                Ok(file) => {
                    self.index.merge(file);
                    summary.indexed += 1;
                }
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "skipping unreadable reference");
                    summary.skipped.push(SkippedFile {
                        path: path.display().to_string(),
                        reason: err.to_string(),
                    });
                }
            }
            done += 1;
            if let Some(cb) = on_progress.as_mut() {
                cb(done, total);
            }
        }

        let stats = self.index.stats();
        info!(
            indexed = summary.indexed,
            skipped = summary.skipped.len(),
            shingles = stats.total_shingles,
            "reference index rebuilt"
        );
        summary
    }

    /// Compare `target_path` against the indexed references.
    ///
    /// An unreadable target is an error; an empty one yields an empty
    /// outcome. `on_progress` receives `(percent, message)` pairs with
    /// non-decreasing percentages.
    pub fn compare_document(
        &self,
        target_path: &Path,
        options: &CompareOptions,
        on_progress: Option<CompareProgress<'_>>,
    ) -> Result<CompareOutcome, EngineError> {
        let mut progress = ProgressSink(on_progress);
        progress.report(0, "extracting words");

        let raw = self.extractor.extract_words(target_path)?;
        let target = tokenize_words(raw);
        if target.raw_word_count == 0 {
            progress.report(100, "complete");
            return Ok(CompareOutcome::default());
        }

        let params = self.config.match_params();
        let hashes = shingle_hashes(&target, self.config.seed_size, self.config.seed);

        progress.report(10, "matching shingles");
        let chunks = chunk_ranges(hashes.len(), self.config.max_workers);
        let parallel = chunks.len() > 1
            && (options.mode == MatchMode::Exact || self.config.parallel_fuzzy);

        let run_chunk = |chunk: std::ops::Range<usize>| -> Vec<MatchCandidate> {
            match options.mode {
                MatchMode::Exact => {
                    match_chunk_exact(&target, &hashes, chunk, &self.index, &params)
                }
                MatchMode::Fuzzy => match_chunk_fuzzy(&target, chunk, &self.index, &params),
            }
        };
        let candidates: Vec<MatchCandidate> = if parallel {
            self.pool.install(|| {
                chunks
                    .into_par_iter()
                    .flat_map_iter(run_chunk)
                    .collect()
            })
        } else {
            chunks.into_iter().flat_map(run_chunk).collect()
        };

        progress.report(40, "merging blocks");
        let blocks = merge_candidates(candidates, &params);

        progress.report(60, "refining matches");
        let refine = RefineOptions {
            enabled: options.use_alignment,
            expansion: options.expansion,
            ..RefineOptions::default()
        };
        let outcome = assemble_blocks(
            &blocks,
            &target,
            &self.index,
            &refine,
            target.raw_word_count,
            &mut |done, total| {
                let percent = 60 + (done * 35 / total.max(1)) as u32;
                progress.report(percent, &format!("processing block {done}/{total}"));
            },
        );

        progress.report(100, "complete");
        Ok(outcome)
    }
}

/// Tokenize one reference file, via the cache when possible, and shingle it.
/// Pure apart from cache I/O; runs on worker threads.
fn index_one_file(
    extractor: &dyn WordExtractor,
    cache: Option<&TokenCache>,
    path: &Path,
    seed_size: usize,
    seed: u64,
) -> Result<IndexedFile, ExtractError> {
    let table = match cache.and_then(|c| c.load(path)) {
        Some(table) => table,
        None => {
            let raw = extractor.extract_words(path)?;
            let table = tokenize_words(raw);
            if let Some(c) = cache {
                c.store(path, &table);
            }
            table
        }
    };
    Ok(IndexedFile::build(
        path.display().to_string(),
        table,
        seed_size,
        seed,
    ))
}

#[cfg(test)]
mod tests;
