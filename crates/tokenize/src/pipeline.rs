//! Raw word stream → filtered [`DocumentTable`].
//!
//! Three passes, all O(n): dehyphenation merges line-break splits into single
//! records, normalization strips to lowercase alphanumerics, filtering drops
//! empty and stopword tokens. Surviving records, in order, form the table.

use crate::stopwords::is_stopword;
use crate::word::{DocumentTable, RawWord, WordRecord};

/// Normalize raw word text: keep alphanumerics only, lowercase.
pub fn normalize(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Merge hyphenation breaks: a word ending in `-` followed by another word
/// becomes one record whose normalized text joins the two and whose `parts`
/// keeps both original boxes.
fn dehyphenate(raw: Vec<RawWord>) -> Vec<(Vec<RawWord>, String)> {
    let mut merged = Vec::with_capacity(raw.len());
    let mut iter = raw.into_iter();
    while let Some(curr) = iter.next() {
        if curr.text.ends_with('-') {
            if let Some(next) = iter.next() {
                let joined = format!("{}{}", &curr.text[..curr.text.len() - 1], next.text);
                merged.push((vec![curr, next], joined));
                continue;
            }
        }
        let text = curr.text.clone();
        merged.push((vec![curr], text));
    }
    merged
}

/// Build the filtered word table from an extractor's raw word stream.
pub fn tokenize_words(raw: Vec<RawWord>) -> DocumentTable {
    let merged = dehyphenate(raw);
    let raw_word_count = merged.len();

    let mut records = Vec::with_capacity(raw_word_count);
    for (parts, text) in merged {
        let normalized = normalize(&text);
        if normalized.is_empty() || is_stopword(&normalized) {
            continue;
        }
        records.push(WordRecord { parts, normalized });
    }

    DocumentTable {
        records,
        raw_word_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::word::Rect;

    fn raw(page: usize, text: &str) -> RawWord {
        RawWord::new(page, Rect::new(0.0, 0.0, 1.0, 1.0), text)
    }

    #[test]
    fn normalize_strips_and_lowercases() {
        assert_eq!(normalize("Hello, World!"), "helloworld");
        assert_eq!(normalize("Ångström-42"), "ångström42");
        assert_eq!(normalize("--"), "");
    }

    #[test]
    fn dehyphenation_merges_split_words() {
        let table = tokenize_words(vec![raw(0, "hyphen-"), raw(0, "ation")]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.records[0].normalized, "hyphenation");
        assert_eq!(table.records[0].parts.len(), 2);
        assert_eq!(table.records[0].parts[0].text, "hyphen-");
        assert_eq!(table.records[0].parts[1].text, "ation");
        // One merged pre-filter word, not two.
        assert_eq!(table.raw_word_count, 1);
    }

    #[test]
    fn trailing_hyphen_with_no_successor_stays() {
        let table = tokenize_words(vec![raw(0, "dangling-")]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.records[0].normalized, "dangling");
        assert_eq!(table.records[0].parts.len(), 1);
    }

    #[test]
    fn stopwords_and_punctuation_tokens_drop() {
        let table = tokenize_words(vec![
            raw(0, "The"),
            raw(0, "quick"),
            raw(0, "..."),
            raw(0, "don't"),
            raw(0, "fox."),
        ]);
        let norms: Vec<&str> = table.records.iter().map(|r| r.normalized.as_str()).collect();
        assert_eq!(norms, ["quick", "fox"]);
        // Pre-filter count keeps everything that survived dehyphenation.
        assert_eq!(table.raw_word_count, 5);
    }

    #[test]
    fn empty_input_yields_empty_table() {
        let table = tokenize_words(Vec::new());
        assert!(table.is_empty());
        assert_eq!(table.raw_word_count, 0);
    }

    #[test]
    fn joined_clips_to_table_end() {
        let table = tokenize_words(vec![raw(0, "alpha"), raw(0, "beta"), raw(0, "gamma")]);
        assert_eq!(table.joined(1, 5), "beta gamma");
    }
}
