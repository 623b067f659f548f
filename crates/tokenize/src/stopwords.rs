//! Shared English stopword set.
//!
//! Entries are stored in normalized form (lowercase, apostrophes stripped) so
//! membership tests run against the same representation the tokenizer emits;
//! a contraction like "don't" normalizes to "dont" and still filters.

use std::collections::HashSet;
use std::sync::OnceLock;

/// Normalized stopword entries. Contractions appear apostrophe-stripped,
/// which makes a handful of surface words ("ill", "wed", "well") stopwords as
/// a side effect; that is the intended trade for matching the token stream.
const STOPWORD_LIST: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any", "are",
    "arent", "as", "at", "be", "because", "been", "before", "being", "below", "between", "both",
    "but", "by", "cannot", "cant", "could", "couldnt", "did", "didnt", "do", "does", "doesnt",
    "doing", "dont", "down", "during", "each", "few", "for", "from", "further", "had", "hadnt",
    "has", "hasnt", "have", "havent", "having", "he", "hed", "hell", "her", "here", "heres",
    "hers", "herself", "hes", "him", "himself", "his", "how", "hows", "i", "id", "if", "ill",
    "im", "in", "into", "is", "isnt", "it", "its", "itself", "ive", "lets", "me", "more", "most",
    "mustnt", "my", "myself", "no", "nor", "not", "of", "off", "on", "once", "only", "or",
    "other", "ought", "our", "ours", "ourselves", "out", "over", "own", "same", "shant", "she",
    "shed", "shell", "shes", "should", "shouldnt", "so", "some", "such", "than", "that", "thats",
    "the", "their", "theirs", "them", "themselves", "then", "there", "theres", "these", "they",
    "theyd", "theyll", "theyre", "theyve", "this", "those", "through", "to", "too", "under",
    "until", "up", "very", "was", "wasnt", "we", "wed", "well", "were", "werent", "weve", "what",
    "whats", "when", "whens", "where", "wheres", "which", "while", "who", "whom", "whos", "why",
    "whys", "with", "wont", "would", "wouldnt", "you", "youd", "youll", "your", "youre", "yours",
    "yourself", "yourselves", "youve",
];

fn stopword_set() -> &'static HashSet<&'static str> {
    static SET: OnceLock<HashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| STOPWORD_LIST.iter().copied().collect())
}

/// Whether a normalized word is a stopword.
pub fn is_stopword(normalized: &str) -> bool {
    stopword_set().contains(normalized)
}
