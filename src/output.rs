//! CLI output formatting.
//!
//! # Information-First Display
//!
//! Every entity (page, article) is shown by its semantic identity first:
//! positional index, title, and score. File paths and URL paths are
//! secondary context on indented lines. This reads as a content inventory
//! while still letting users trace a warning back to a file.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! Pages
//! 001 Frogtales - Stories Worth Telling [75/75]
//!     Path: /
//! 002 About Us | Frogtales [55/75]
//!     Path: /about
//!     Suggestion: Description should be 120-160 characters (currently 40)
//!
//! Articles
//! 001 Life in the Pond | Frogtales [45/100]
//!     Source: articles/pond-life.md
//!     Error: no Open Graph image
//!
//! Checked 2 pages, 1 article: 1 failing validation
//! ```
//!
//! ## Build
//!
//! ```text
//! sitemap.xml (3 URLs)
//! robots.txt
//! blog.jsonld
//! head/index.html
//! ...
//!
//! Wrote 6 files to dist
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::SeoManager;
use crate::content::Content;
use crate::generate::GenerateReport;
use crate::metadata::MetadataRecord;
use crate::score::{SeoScore, ValidationError, get_seo_score, validate_metadata};

/// Maximum score without content (pages) and with content (articles).
const PAGE_MAX: u32 = 75;
const ARTICLE_MAX: u32 = 100;

fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

// ============================================================================
// Check
// ============================================================================

/// Score and validation outcome for one page or article.
#[derive(Debug)]
pub struct CheckedEntry {
    pub title: String,
    /// `Path: /about` for pages, `Source: articles/x.md` for articles.
    pub context: String,
    pub score: SeoScore,
    pub max: u32,
    pub errors: Vec<ValidationError>,
}

impl CheckedEntry {
    fn new(meta: &MetadataRecord, context: String, content: Option<&str>) -> Self {
        CheckedEntry {
            title: meta.title.clone(),
            context,
            score: get_seo_score(meta, content),
            max: if content.is_some() { ARTICLE_MAX } else { PAGE_MAX },
            errors: validate_metadata(meta).err().unwrap_or_default(),
        }
    }
}

#[derive(Debug)]
pub struct CheckReport {
    pub pages: Vec<CheckedEntry>,
    pub articles: Vec<CheckedEntry>,
}

impl CheckReport {
    pub fn failing(&self) -> usize {
        self.pages
            .iter()
            .chain(&self.articles)
            .filter(|e| !e.errors.is_empty())
            .count()
    }
}

/// Generate metadata for everything in `content`, then score and validate it.
pub fn check_content(content: &Content, seo: &SeoManager) -> CheckReport {
    let pages = content
        .pages
        .iter()
        .map(|page| {
            let meta = seo.generate_page_metadata(&page.descriptor());
            CheckedEntry::new(&meta, format!("Path: {}", page.path), None)
        })
        .collect();
    let articles = content
        .articles
        .iter()
        .map(|entry| {
            let meta = seo.generate_article_metadata(&entry.article);
            CheckedEntry::new(
                &meta,
                format!("Source: {}", entry.source_path.display()),
                Some(&entry.article.content),
            )
        })
        .collect();
    CheckReport { pages, articles }
}

fn entry_lines(index: usize, entry: &CheckedEntry) -> Vec<String> {
    let mut lines = vec![format!(
        "{} {} [{}/{}]",
        format_index(index),
        entry.title,
        entry.score.score,
        entry.max
    )];
    lines.push(format!("{}{}", indent(1), entry.context));
    for error in &entry.errors {
        lines.push(format!("{}Error: {}", indent(1), error));
    }
    for suggestion in &entry.score.suggestions {
        lines.push(format!("{}Suggestion: {}", indent(1), suggestion));
    }
    lines
}

pub fn format_check_output(report: &CheckReport) -> Vec<String> {
    let mut lines = Vec::new();

    for (heading, entries) in [("Pages", &report.pages), ("Articles", &report.articles)] {
        if entries.is_empty() {
            continue;
        }
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.push(heading.to_string());
        for (i, entry) in entries.iter().enumerate() {
            lines.extend(entry_lines(i + 1, entry));
        }
    }

    if !lines.is_empty() {
        lines.push(String::new());
    }
    let failing = report.failing();
    let mut summary = format!(
        "Checked {}, {}",
        plural(report.pages.len(), "page"),
        plural(report.articles.len(), "article")
    );
    if failing > 0 {
        summary.push_str(&format!(": {failing} failing validation"));
    }
    lines.push(summary);
    lines
}

pub fn print_check_output(report: &CheckReport) {
    for line in format_check_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Score
// ============================================================================

pub fn format_score(entry: &CheckedEntry) -> Vec<String> {
    let mut lines = entry_lines(1, entry);
    // Single entity, so the index adds nothing.
    lines[0] = format!("{} [{}/{}]", entry.title, entry.score.score, entry.max);
    lines
}

/// Score a single article outside of a full content load.
pub fn score_article(
    seo: &SeoManager,
    article: &crate::types::ArticleDescriptor,
    source: &str,
) -> CheckedEntry {
    let meta = seo.generate_article_metadata(article);
    CheckedEntry::new(&meta, format!("Source: {source}"), Some(&article.content))
}

pub fn print_score(entry: &CheckedEntry) {
    for line in format_score(entry) {
        println!("{}", line);
    }
}

// ============================================================================
// Build
// ============================================================================

pub fn format_generate_output(report: &GenerateReport) -> Vec<String> {
    let mut lines: Vec<String> = report
        .files
        .iter()
        .map(|file| {
            if file.as_os_str() == "sitemap.xml" {
                format!("sitemap.xml ({})", plural(report.sitemap_urls, "URL"))
            } else {
                file.display().to_string()
            }
        })
        .collect();
    lines.push(String::new());
    lines.push(format!(
        "Wrote {} to {}",
        plural(report.files.len(), "file"),
        report.output_dir.display()
    ));
    lines
}

pub fn print_generate_output(report: &GenerateReport) {
    for line in format_generate_output(report) {
        println!("{}", line);
    }
}
