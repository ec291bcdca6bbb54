//! Content analysis: plain-text extraction, keyword frequency, reading time.
//!
//! Everything here is a pure function of its input string. Nothing can fail:
//! empty or tag-only input yields an empty description, no keywords, and a
//! reading time of zero.
//!
//! ## Keyword ordering
//!
//! Keywords are ranked by descending frequency. Ties keep the order in which
//! each word first appears in the text, so the result is deterministic for a
//! given input and does not depend on hash-map iteration order.

use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Characters kept for the derived description before `...` is appended.
pub const DESCRIPTION_LIMIT: usize = 155;
/// Reading speed used for time estimates.
pub const WORDS_PER_MINUTE: usize = 200;
/// Keywords returned by [`extract_keywords`].
pub const MAX_KEYWORDS: usize = 10;
/// Tokens this short or shorter are never keywords.
const MIN_KEYWORD_EXCLUSIVE: usize = 3;

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static NON_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w\s]").unwrap());
static HEADING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<h[1-6][^>]*>").unwrap());

/// Metadata derived from an article body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentMeta {
    pub description: String,
    pub keywords: Vec<String>,
    /// Minutes.
    pub reading_time: u32,
}

/// Replace tags with spaces, collapse whitespace runs, and trim.
pub fn strip_html(content: &str) -> String {
    let untagged = TAG.replace_all(content, " ");
    WHITESPACE.replace_all(&untagged, " ").trim().to_string()
}

/// Whitespace-separated words in already-stripped text.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// `ceil(words / 200)`.
pub fn reading_time_minutes(words: usize) -> u32 {
    words.div_ceil(WORDS_PER_MINUTE) as u32
}

/// Number of `<h1>`..`<h6>` opening tags in raw HTML.
pub fn count_headings(content: &str) -> usize {
    HEADING.find_iter(content).count()
}

/// First [`DESCRIPTION_LIMIT`] characters, with `...` when truncated.
pub fn summarize(text: &str) -> String {
    let mut chars = text.char_indices();
    match chars.nth(DESCRIPTION_LIMIT) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// Top keywords of already-stripped text.
pub fn extract_keywords(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let cleaned = NON_WORD.replace_all(&lowered, "");

    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut first_seen: Vec<&str> = Vec::new();
    for word in cleaned
        .split_whitespace()
        .filter(|w| w.chars().count() > MIN_KEYWORD_EXCLUSIVE)
    {
        let count = counts.entry(word).or_insert(0);
        if *count == 0 {
            first_seen.push(word);
        }
        *count += 1;
    }

    // Stable: equal counts keep first-appearance order.
    first_seen.sort_by(|a, b| counts[b].cmp(&counts[a]));
    first_seen
        .into_iter()
        .take(MAX_KEYWORDS)
        .map(String::from)
        .collect()
}

/// Derive description, keywords, and reading time from raw HTML or text.
pub fn extract_meta_from_content(content: &str) -> ContentMeta {
    let text = strip_html(content);
    ContentMeta {
        description: summarize(&text),
        keywords: extract_keywords(&text),
        reading_time: reading_time_minutes(word_count(&text)),
    }
}
