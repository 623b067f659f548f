//! On-disk cache for reference tokenization.
//!
//! One file per reference document, named by the hex md5 digest of
//! `path \0 mtime \0 size`; a changed fingerprint simply misses. The payload
//! is the filtered word table with geometry flattened to plain numeric
//! tuples, encoded with bincode under a schema version. Every failure mode
//! (unreadable entry, short payload, version skew) is a miss, never an
//! error; corrupt entries are deleted best-effort.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use tokenize::{DocumentTable, RawWord, Rect, WordRecord};

/// Bump whenever the serialized layout of [`CachedTable`] changes.
pub const CACHE_SCHEMA_VERSION: u16 = 1;

/// `(page, (x0, y0, x1, y1), raw_text)` — geometry as plain tuples so the
/// payload is not tied to the in-memory rectangle type.
type CachedPart = (u32, (f32, f32, f32, f32), String);

#[derive(Serialize, Deserialize)]
struct CachedWord {
    normalized: String,
    parts: Vec<CachedPart>,
}

#[derive(Serialize, Deserialize)]
struct CachedTable {
    schema: u16,
    raw_word_count: u64,
    words: Vec<CachedWord>,
}

impl CachedTable {
    fn from_table(table: &DocumentTable) -> Self {
        let words = table
            .records
            .iter()
            .map(|record| CachedWord {
                normalized: record.normalized.clone(),
                parts: record
                    .parts
                    .iter()
                    .map(|p| {
                        (
                            p.page as u32,
                            (p.rect.x0, p.rect.y0, p.rect.x1, p.rect.y1),
                            p.text.clone(),
                        )
                    })
                    .collect(),
            })
            .collect();
        Self {
            schema: CACHE_SCHEMA_VERSION,
            raw_word_count: table.raw_word_count as u64,
            words,
        }
    }

    fn into_table(self) -> DocumentTable {
        let records = self
            .words
            .into_iter()
            .map(|word| WordRecord {
                normalized: word.normalized,
                parts: word
                    .parts
                    .into_iter()
                    .map(|(page, (x0, y0, x1, y1), text)| RawWord {
                        page: page as usize,
                        rect: Rect::new(x0, y0, x1, y1),
                        text,
                    })
                    .collect(),
            })
            .collect();
        DocumentTable {
            records,
            raw_word_count: self.raw_word_count as usize,
        }
    }
}

/// Content fingerprint key for `path`: hex md5 of `path \0 mtime \0 size`.
pub fn cache_key(path: &Path) -> io::Result<String> {
    let meta = fs::metadata(path)?;
    let mtime = meta
        .modified()?
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    let raw = format!(
        "{}\0{}.{:09}\0{}",
        path.display(),
        mtime.as_secs(),
        mtime.subsec_nanos(),
        meta.len()
    );
    let digest = Md5::digest(raw.as_bytes());
    Ok(hex::encode(digest))
}

/// Directory of cached tokenizations. Reads and writes are best-effort; the
/// cache is an optimization only and engine correctness never depends on it.
#[derive(Debug, Clone)]
pub struct TokenCache {
    dir: PathBuf,
}

impl TokenCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.bin"))
    }

    /// Look up the cached table for `path`. Any failure is a miss; a corrupt
    /// entry is removed so the next run does not re-read it.
    pub fn load(&self, path: &Path) -> Option<DocumentTable> {
        let key = cache_key(path).ok()?;
        let entry = self.entry_path(&key);
        let bytes = fs::read(&entry).ok()?;

        let decoded: Result<(CachedTable, usize), _> =
            bincode::serde::decode_from_slice(&bytes, bincode::config::standard());
        match decoded {
            Ok((cached, _)) if cached.schema == CACHE_SCHEMA_VERSION => {
                debug!(path = %path.display(), "tokenization cache hit");
                Some(cached.into_table())
            }
            Ok((cached, _)) => {
                debug!(
                    path = %path.display(),
                    schema = cached.schema,
                    "cache entry from other schema version, ignoring"
                );
                let _ = fs::remove_file(&entry);
                None
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "corrupt cache entry, deleting");
                let _ = fs::remove_file(&entry);
                None
            }
        }
    }

    /// Write the table for `path`. Failures are logged and swallowed.
    pub fn store(&self, path: &Path, table: &DocumentTable) {
        let key = match cache_key(path) {
            Ok(key) => key,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "cannot fingerprint file for cache");
                return;
            }
        };
        if let Err(err) = fs::create_dir_all(&self.dir) {
            warn!(dir = %self.dir.display(), error = %err, "cannot create cache directory");
            return;
        }
        let payload =
            match bincode::serde::encode_to_vec(CachedTable::from_table(table), bincode::config::standard()) {
                Ok(payload) => payload,
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "cache encode failed");
                    return;
                }
            };
        if let Err(err) = fs::write(self.entry_path(&key), payload) {
            warn!(path = %path.display(), error = %err, "cache write failed");
        }
    }
}
