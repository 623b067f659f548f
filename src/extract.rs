//! The text-extraction collaborator boundary.
//!
//! The engine does not decode document formats. It consumes an ordered
//! per-page word stream through [`WordExtractor`] and composes it into the
//! `(page, rect, text)` triples the tokenizer expects. [`PlainTextExtractor`]
//! is the bundled implementation for plain-text files, used by the CLI and
//! the test suite; format-specific extractors live with their callers.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use tokenize::{RawWord, Rect};

/// Errors from a word extractor. An extraction failure is fatal for a target
/// document and recoverable (skip the file) for a reference document.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{path} is not valid UTF-8 text")]
    NotText { path: PathBuf },
}

/// Produces the raw word stream of a document, in reading order, with page
/// indices and bounding boxes.
pub trait WordExtractor: Send + Sync {
    fn extract_words(&self, path: &Path) -> Result<Vec<RawWord>, ExtractError>;
}

/// Extractor for plain-text files.
///
/// Pages are separated by form feeds; each line advances the y position and
/// each word occupies a box derived from fixed glyph metrics. The geometry is
/// synthetic but deterministic, which is all highlight plumbing needs.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextExtractor;

const CHAR_WIDTH: f32 = 6.0;
const LINE_HEIGHT: f32 = 12.0;

impl PlainTextExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl WordExtractor for PlainTextExtractor {
    fn extract_words(&self, path: &Path) -> Result<Vec<RawWord>, ExtractError> {
        let bytes = std::fs::read(path).map_err(|source| ExtractError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let text = String::from_utf8(bytes).map_err(|_| ExtractError::NotText {
            path: path.to_path_buf(),
        })?;

        let mut words = Vec::new();
        for (page, page_text) in text.split('\u{c}').enumerate() {
            for (line_no, line) in page_text.lines().enumerate() {
                let y0 = line_no as f32 * LINE_HEIGHT;
                let mut column = 0usize;
                for word in line.split_whitespace() {
                    // Track the word's true column so boxes mirror the layout.
                    let start = match line[column..].find(word) {
                        Some(offset) => column + offset,
                        None => column,
                    };
                    let x0 = start as f32 * CHAR_WIDTH;
                    let x1 = x0 + word.chars().count() as f32 * CHAR_WIDTH;
                    words.push(RawWord::new(
                        page,
                        Rect::new(x0, y0, x1, y0 + LINE_HEIGHT),
                        word,
                    ));
                    column = start + word.len();
                }
            }
        }
        Ok(words)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        let mut f = std::fs::File::create(&path).expect("create");
        f.write_all(body.as_bytes()).expect("write");
        path
    }

    #[test]
    fn words_carry_pages_and_ordered_boxes() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let path = write_file(tmp.path(), "doc.txt", "alpha beta\ngamma\u{c}delta");
        let words = PlainTextExtractor::new()
            .extract_words(&path)
            .expect("extract");

        let texts: Vec<&str> = words.iter().map(|w| w.text.as_str()).collect();
        assert_eq!(texts, ["alpha", "beta", "gamma", "delta"]);
        assert_eq!(words[0].page, 0);
        assert_eq!(words[2].page, 0);
        assert_eq!(words[3].page, 1);
        // "beta" starts after "alpha " on the same line.
        assert!(words[1].rect.x0 > words[0].rect.x1 - f32::EPSILON);
        // "gamma" is on the next line.
        assert!(words[2].rect.y0 > words[0].rect.y0);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = PlainTextExtractor::new()
            .extract_words(Path::new("/nonexistent/words.txt"))
            .expect_err("should fail");
        assert!(matches!(err, ExtractError::Io { .. }));
    }

    #[test]
    fn binary_content_is_not_text() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let path = tmp.path().join("blob.bin");
        std::fs::write(&path, [0xFFu8, 0xFE, 0x00, 0x80]).expect("write");
        let err = PlainTextExtractor::new()
            .extract_words(&path)
            .expect_err("should fail");
        assert!(matches!(err, ExtractError::NotText { .. }));
    }
}
