//! Advisory SEO scoring and strict metadata validation.
//!
//! [`get_seo_score`] is a fixed point rubric. Each satisfied criterion adds
//! its points, each unsatisfied one adds a suggestion:
//!
//! | criterion | points |
//! |-----------|--------|
//! | title is 30–60 characters | 20 |
//! | description is 120–160 characters | 20 |
//! | at least one Open Graph image | 15 |
//! | keyword string present | 10 |
//! | canonical URL present | 10 |
//! | content has at least 300 words | 15 |
//! | content has at least 2 headings | 10 |
//!
//! The two content criteria are only evaluated when content is supplied,
//! so the maximum is 100 with content and 75 without.
//!
//! [`validate_metadata`] is the stricter gate used before publishing: it
//! fails on any hard limit violation regardless of score.

use crate::analyze::{count_headings, strip_html, word_count};
use crate::metadata::MetadataRecord;
use serde::Serialize;
use std::ops::RangeInclusive;
use thiserror::Error;

const TITLE_RANGE: RangeInclusive<usize> = 30..=60;
const DESCRIPTION_RANGE: RangeInclusive<usize> = 120..=160;
const MIN_WORDS: usize = 300;
const MIN_HEADINGS: usize = 2;

const TITLE_POINTS: u32 = 20;
const DESCRIPTION_POINTS: u32 = 20;
const IMAGE_POINTS: u32 = 15;
const KEYWORD_POINTS: u32 = 10;
const CANONICAL_POINTS: u32 = 10;
const WORD_COUNT_POINTS: u32 = 15;
const HEADING_POINTS: u32 = 10;

/// Hard limits enforced by [`validate_metadata`].
pub const MAX_TITLE_LEN: usize = 60;
pub const MAX_DESCRIPTION_LEN: usize = 160;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeoScore {
    pub score: u32,
    pub suggestions: Vec<String>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("title is {0} characters, limit is 60")]
    TitleTooLong(usize),
    #[error("description is {0} characters, limit is 160")]
    DescriptionTooLong(usize),
    #[error("no Open Graph image")]
    MissingImage,
}

/// Score `metadata`, and `content` (raw HTML) when given.
pub fn get_seo_score(metadata: &MetadataRecord, content: Option<&str>) -> SeoScore {
    let mut score = 0;
    let mut suggestions = Vec::new();
    let mut check = |passed: bool, points: u32, suggestion: String| {
        if passed {
            score += points;
        } else {
            suggestions.push(suggestion);
        }
    };

    let title_len = metadata.title.chars().count();
    check(
        TITLE_RANGE.contains(&title_len),
        TITLE_POINTS,
        format!("Title should be 30-60 characters (currently {title_len})"),
    );

    let description_len = metadata.description.chars().count();
    check(
        DESCRIPTION_RANGE.contains(&description_len),
        DESCRIPTION_POINTS,
        format!("Description should be 120-160 characters (currently {description_len})"),
    );

    check(
        !metadata.open_graph.images.is_empty(),
        IMAGE_POINTS,
        "Add an Open Graph image for social previews".to_string(),
    );
    check(
        !metadata.keywords.trim().is_empty(),
        KEYWORD_POINTS,
        "Add relevant keywords".to_string(),
    );
    check(
        !metadata.canonical.trim().is_empty(),
        CANONICAL_POINTS,
        "Set a canonical URL".to_string(),
    );

    if let Some(content) = content {
        let words = word_count(&strip_html(content));
        check(
            words >= MIN_WORDS,
            WORD_COUNT_POINTS,
            format!("Content should be at least {MIN_WORDS} words (currently {words})"),
        );

        let headings = count_headings(content);
        check(
            headings >= MIN_HEADINGS,
            HEADING_POINTS,
            format!("Use at least {MIN_HEADINGS} headings to structure the content (found {headings})"),
        );
    }

    SeoScore { score, suggestions }
}

/// Check hard limits. Returns every violation, not just the first.
pub fn validate_metadata(metadata: &MetadataRecord) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let title_len = metadata.title.chars().count();
    if title_len > MAX_TITLE_LEN {
        errors.push(ValidationError::TitleTooLong(title_len));
    }
    let description_len = metadata.description.chars().count();
    if description_len > MAX_DESCRIPTION_LEN {
        errors.push(ValidationError::DescriptionTooLong(description_len));
    }
    if metadata.open_graph.images.is_empty() {
        errors.push(ValidationError::MissingImage);
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
