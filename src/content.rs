//! Content directory loading.
//!
//! ## Directory Structure
//!
//! ```text
//! content/
//! ├── config.toml              # Site configuration (optional)
//! ├── pages.toml               # Static pages (optional)
//! └── articles/
//!     ├── pond-life.md         # Article: TOML front matter + Markdown body
//!     └── 2024/
//!         └── spring-chorus.md # Subdirectories are walked too
//! ```
//!
//! ## Pages
//!
//! `pages.toml` holds a list of `[[page]]` tables. Each is a
//! [`PageDescriptor`] plus optional sitemap hints (`last_modified`,
//! `change_frequency`, `priority`).
//!
//! ## Articles
//!
//! Articles open with a `+++`-fenced TOML block:
//!
//! ```text
//! +++
//! title = "Life in the Pond"
//! published_at = "2024-02-01T09:30:00Z"   # quoted RFC 3339
//! tags = ["nature"]
//!
//! [author]
//! name = "Fern Lily"
//! +++
//! ## Spring
//! ...
//! ```
//!
//! The Markdown body is rendered to HTML and becomes the article content.
//! The slug defaults to the sanitized file stem. A missing description is
//! derived from the body with [`extract_meta_from_content`].

use crate::analyze::extract_meta_from_content;
use crate::config::{self, SiteConfig};
use crate::types::{
    ArticleDescriptor, Author, BreadcrumbItem, ChangeFrequency, PageDescriptor, SitemapEntry,
};
use chrono::{DateTime, Utc};
use pulldown_cmark::{Options, Parser, html as md_html};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Invalid TOML in {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("Missing +++ front matter in {0}")]
    MissingFrontMatter(PathBuf),
    #[error("Page path {path:?} in {source_file} has a relative or empty segment")]
    UnsafePagePath { path: String, source_file: PathBuf },
    #[error("Article slug {slug:?} in {source_file} must be a single non-empty URL segment")]
    InvalidSlug { slug: String, source_file: PathBuf },
    #[error("Duplicate article slug {slug:?} in {first} and {second}")]
    DuplicateSlug {
        slug: String,
        first: PathBuf,
        second: PathBuf,
    },
}

/// Everything loaded from a content directory.
#[derive(Debug)]
pub struct Content {
    pub config: SiteConfig,
    pub pages: Vec<PageEntry>,
    pub articles: Vec<ArticleEntry>,
}

/// A `[[page]]` table from `pages.toml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PageEntry {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub path: String,
    pub image: Option<String>,
    #[serde(default)]
    pub no_index: bool,
    pub canonical: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    pub last_modified: Option<DateTime<Utc>>,
    pub change_frequency: Option<ChangeFrequency>,
    pub priority: Option<f64>,
}

impl PageEntry {
    pub fn descriptor(&self) -> PageDescriptor {
        PageDescriptor {
            title: self.title.clone(),
            description: self.description.clone(),
            path: self.path.clone(),
            image: self.image.clone(),
            no_index: self.no_index,
            canonical: self.canonical.clone(),
            keywords: self.keywords.clone(),
        }
    }

    pub fn sitemap_entry(&self) -> SitemapEntry {
        SitemapEntry {
            path: self.path.clone(),
            last_modified: self.last_modified,
            change_frequency: self.change_frequency,
            priority: self.priority,
        }
    }

    /// `Home`, then this page unless it is the home page.
    pub fn breadcrumbs(&self, home_title: &str) -> Vec<BreadcrumbItem> {
        let mut crumbs = vec![BreadcrumbItem::new("Home", "/")];
        if self.path != "/" {
            let name = if self.title.is_empty() {
                home_title
            } else {
                self.title.as_str()
            };
            crumbs.push(BreadcrumbItem::new(name, self.path.as_str()));
        }
        crumbs
    }
}

#[derive(Debug, Deserialize)]
struct PagesFile {
    #[serde(default)]
    page: Vec<PageEntry>,
}

/// An article and the file it came from.
#[derive(Debug, Clone)]
pub struct ArticleEntry {
    pub article: ArticleDescriptor,
    /// Relative to the content root.
    pub source_path: PathBuf,
}

impl ArticleEntry {
    pub fn sitemap_entry(&self) -> SitemapEntry {
        SitemapEntry {
            path: self.article.path(),
            last_modified: Some(self.article.modified_at()),
            change_frequency: Some(ChangeFrequency::Monthly),
            priority: Some(0.7),
        }
    }

    /// `Home › Articles › {title}`.
    pub fn breadcrumbs(&self) -> Vec<BreadcrumbItem> {
        vec![
            BreadcrumbItem::new("Home", "/"),
            BreadcrumbItem::new("Articles", "/articles"),
            BreadcrumbItem::new(self.article.title.as_str(), self.article.path()),
        ]
    }
}

/// Article front matter. Mirrors [`ArticleDescriptor`], minus the body.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FrontMatter {
    title: String,
    description: Option<String>,
    slug: Option<String>,
    author: Author,
    published_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    tags: Vec<String>,
    category: Option<String>,
    image: Option<String>,
    reading_time: Option<u32>,
    #[serde(default)]
    premium: bool,
}

/// Load config, pages, and articles from `root`.
pub fn load(root: &Path) -> Result<Content, ContentError> {
    let config = config::load_config(root)?;
    let pages = load_pages(root)?;
    let articles = load_articles(root)?;
    Ok(Content {
        config,
        pages,
        articles,
    })
}

/// Parse `pages.toml`. Missing file means no pages.
pub fn load_pages(root: &Path) -> Result<Vec<PageEntry>, ContentError> {
    let path = root.join("pages.toml");
    if !path.exists() {
        return Ok(Vec::new());
    }
    let text = fs::read_to_string(&path)?;
    let file: PagesFile =
        toml::from_str(&text).map_err(|source| ContentError::Toml {
            path: path.clone(),
            source,
        })?;
    if let Some(page) = file.page.iter().find(|p| !is_safe_url_path(&p.path)) {
        return Err(ContentError::UnsafePagePath {
            path: page.path.clone(),
            source_file: path,
        });
    }
    Ok(file.page)
}

/// A URL path that maps onto a file under the output directory: every
/// segment between slashes is a plain name, never `.` or `..`.
///
/// `/`, `/about` and `/docs/guide/` are safe. `/../x` and `/a/./b` are not.
pub fn is_safe_url_path(path: &str) -> bool {
    let trimmed = path.trim_matches('/');
    trimmed.is_empty()
        || trimmed
            .split('/')
            .all(|segment| !matches!(segment, "" | "." | "..") && !segment.contains('\\'))
}

fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty() && !slug.contains('/') && is_safe_url_path(slug)
}

/// Walk `articles/` for Markdown files, sorted by path.
pub fn load_articles(root: &Path) -> Result<Vec<ArticleEntry>, ContentError> {
    let articles_dir = root.join("articles");
    if !articles_dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut articles = Vec::new();
    let mut seen: HashMap<String, PathBuf> = HashMap::new();
    for entry in WalkDir::new(&articles_dir).sort_by_file_name() {
        let entry = entry?;
        let path = entry.path();
        let is_markdown = path
            .extension()
            .map(|e| e.eq_ignore_ascii_case("md"))
            .unwrap_or(false);
        if !entry.file_type().is_file() || !is_markdown {
            continue;
        }

        let article = load_article(path)?;
        let source_path = path.strip_prefix(root).unwrap_or(path).to_path_buf();
        if let Some(first) = seen.insert(article.slug.clone(), source_path.clone()) {
            return Err(ContentError::DuplicateSlug {
                slug: article.slug,
                first,
                second: source_path,
            });
        }
        debug!(slug = %article.slug, source = %source_path.display(), "loaded article");
        articles.push(ArticleEntry {
            article,
            source_path,
        });
    }
    Ok(articles)
}

/// Parse one article file.
pub fn load_article(path: &Path) -> Result<ArticleDescriptor, ContentError> {
    let text = fs::read_to_string(path)?;
    let (front, body) =
        split_front_matter(&text).ok_or_else(|| ContentError::MissingFrontMatter(path.into()))?;
    let front: FrontMatter = toml::from_str(front).map_err(|source| ContentError::Toml {
        path: path.into(),
        source,
    })?;

    let content = render_markdown(body);
    let description = match front.description {
        Some(d) if !d.is_empty() => d,
        _ => extract_meta_from_content(&content).description,
    };
    let slug = front.slug.unwrap_or_else(|| {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        slugify(&stem)
    });
    if !is_valid_slug(&slug) {
        return Err(ContentError::InvalidSlug {
            slug,
            source_file: path.into(),
        });
    }

    Ok(ArticleDescriptor {
        title: front.title,
        description,
        content,
        slug,
        author: front.author,
        published_at: front.published_at,
        updated_at: front.updated_at,
        tags: front.tags,
        category: front.category,
        image: front.image,
        reading_time: front.reading_time,
        premium: front.premium,
    })
}

/// Split `+++\n<toml>\n+++\n<body>` into its two halves.
fn split_front_matter(text: &str) -> Option<(&str, &str)> {
    let rest = text.strip_prefix("+++")?;
    let rest = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))?;
    let (front, after) = if let Some(after) = rest.strip_prefix("+++") {
        ("", after)
    } else {
        let end = rest.find("\n+++")?;
        (&rest[..end], &rest[end + "\n+++".len()..])
    };
    let body = after.split_once('\n').map(|(_, b)| b).unwrap_or("");
    Some((front, body))
}

/// Render Markdown to HTML.
pub fn render_markdown(markdown: &str) -> String {
    let options = Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_SMART_PUNCTUATION;
    let parser = Parser::new_ext(markdown, options);
    let mut html = String::new();
    md_html::push_html(&mut html, parser);
    html
}

const MAX_SLUG_LEN: usize = 80;

/// Turn a title or file stem into a URL slug.
///
/// - Lower-cases ASCII letters
/// - Replaces non-alphanumeric characters (except dashes) with dashes
/// - Collapses consecutive dashes into one
/// - Strips leading and trailing dashes
/// - Truncates to `MAX_SLUG_LEN` characters (breaks at last dash before limit)
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut prev_dash = false;
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            prev_dash = false;
        } else if !prev_dash {
            slug.push('-');
            prev_dash = true;
        }
    }

    let trimmed = slug.trim_matches('-');
    if trimmed.len() <= MAX_SLUG_LEN {
        trimmed.to_string()
    } else {
        let truncated = &trimmed[..MAX_SLUG_LEN];
        match truncated.rfind('-') {
            Some(pos) => truncated[..pos].to_string(),
            None => truncated.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{SAMPLE_ARTICLE_MD, setup_content};
    use tempfile::TempDir;

    // =========================================================================
    // slugify
    // =========================================================================

    #[test]
    fn slugify_lowercases_and_dashes() {
        assert_eq!(slugify("Pond Life: Spring!"), "pond-life-spring");
    }

    #[test]
    fn slugify_collapses_and_trims() {
        assert_eq!(slugify("--a   b--"), "a-b");
    }

    #[test]
    fn slugify_drops_non_ascii() {
        assert_eq!(slugify("Café Crème"), "caf-cr-me");
    }

    #[test]
    fn slugify_truncates_at_dash() {
        let long = "word-".repeat(30);
        let slug = slugify(&long);
        assert!(slug.len() <= MAX_SLUG_LEN);
        assert!(slug.ends_with("word"));
    }

    // =========================================================================
    // front matter
    // =========================================================================

    #[test]
    fn split_front_matter_basic() {
        let (front, body) = split_front_matter("+++\ntitle = \"x\"\n+++\nBody\n").unwrap();
        assert_eq!(front, "title = \"x\"");
        assert_eq!(body, "Body\n");
    }

    #[test]
    fn split_front_matter_crlf() {
        let (front, body) = split_front_matter("+++\r\na = 1\r\n+++\r\nBody").unwrap();
        assert_eq!(front.trim(), "a = 1");
        assert_eq!(body, "Body");
    }

    #[test]
    fn split_front_matter_empty_block() {
        let (front, body) = split_front_matter("+++\n+++\nBody").unwrap();
        assert_eq!(front, "");
        assert_eq!(body, "Body");
    }

    #[test]
    fn split_front_matter_requires_fence() {
        assert!(split_front_matter("# Just markdown").is_none());
        assert!(split_front_matter("+++\nunterminated").is_none());
    }

    // =========================================================================
    // load_article
    // =========================================================================

    #[test]
    fn load_article_parses_front_matter_and_body() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("Pond-Life.md");
        fs::write(&path, SAMPLE_ARTICLE_MD).unwrap();

        let article = load_article(&path).unwrap();
        assert_eq!(article.title, "Life in the Pond");
        assert_eq!(article.slug, "pond-life");
        assert_eq!(article.author.name, "Fern Lily");
        assert_eq!(article.tags, vec!["nature", "amphibians"]);
        assert!(article.content.contains("<h2>Spring</h2>"));
        assert!(article.content.contains("<em>everywhere</em>"));
        assert!(!article.premium);
    }

    #[test]
    fn load_article_explicit_slug_wins() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("whatever.md");
        let text = SAMPLE_ARTICLE_MD.replacen("+++\n", "+++\nslug = \"custom\"\n", 1);
        fs::write(&path, text).unwrap();
        assert_eq!(load_article(&path).unwrap().slug, "custom");
    }

    #[test]
    fn load_article_derives_missing_description() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("derived.md");
        fs::write(
            &path,
            "+++\ntitle = \"T\"\npublished_at = \"2024-01-01T00:00:00Z\"\n[author]\nname = \"A\"\n+++\nFrogs sing at *night*.\n",
        )
        .unwrap();
        let article = load_article(&path).unwrap();
        assert_eq!(article.description, "Frogs sing at night .");
    }

    #[test]
    fn load_article_without_front_matter_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("bare.md");
        fs::write(&path, "# Title\n").unwrap();
        assert!(matches!(
            load_article(&path),
            Err(ContentError::MissingFrontMatter(_))
        ));
    }

    #[test]
    fn load_article_rejects_unknown_keys() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("typo.md");
        let text = SAMPLE_ARTICLE_MD.replacen("+++\n", "+++\ntagz = []\n", 1);
        fs::write(&path, text).unwrap();
        assert!(matches!(load_article(&path), Err(ContentError::Toml { .. })));
    }

    // =========================================================================
    // load
    // =========================================================================

    #[test]
    fn load_reads_whole_directory() {
        let tmp = setup_content();
        let content = load(tmp.path()).unwrap();

        assert_eq!(content.config.site_url, "https://frogtales.example");
        assert_eq!(content.pages.len(), 2);
        assert_eq!(content.pages[1].title, "About Us");
        assert_eq!(content.pages[0].priority, Some(1.0));
        assert_eq!(content.articles.len(), 1);
        assert_eq!(
            content.articles[0].source_path,
            Path::new("articles/Pond-Life.md")
        );
    }

    #[test]
    fn load_empty_directory_uses_defaults() {
        let tmp = TempDir::new().unwrap();
        let content = load(tmp.path()).unwrap();
        assert!(content.pages.is_empty());
        assert!(content.articles.is_empty());
        assert_eq!(content.config.site_name, "Frogtales");
    }

    #[test]
    fn load_articles_walks_subdirectories() {
        let tmp = setup_content();
        let nested = tmp.path().join("articles/2024");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("spring-chorus.md"), SAMPLE_ARTICLE_MD).unwrap();
        fs::write(nested.join("notes.txt"), "ignored").unwrap();

        let articles = load_articles(tmp.path()).unwrap();
        let slugs: Vec<&str> = articles.iter().map(|a| a.article.slug.as_str()).collect();
        assert_eq!(slugs, vec!["spring-chorus", "pond-life"]);
    }

    #[test]
    fn load_articles_rejects_duplicate_slugs() {
        let tmp = setup_content();
        fs::write(tmp.path().join("articles/pond-life.md"), SAMPLE_ARTICLE_MD).unwrap();
        assert!(matches!(
            load_articles(tmp.path()),
            Err(ContentError::DuplicateSlug { .. })
        ));
    }

    #[test]
    fn safe_url_paths() {
        assert!(is_safe_url_path("/"));
        assert!(is_safe_url_path(""));
        assert!(is_safe_url_path("/about"));
        assert!(is_safe_url_path("/docs/guide/"));
        assert!(!is_safe_url_path("/../../escaped"));
        assert!(!is_safe_url_path("/a/./b"));
        assert!(!is_safe_url_path("/a//b"));
        assert!(!is_safe_url_path("/..\\x"));
    }

    #[test]
    fn load_pages_rejects_parent_segments() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("pages.toml"),
            "[[page]]\npath = \"/\"\n\n[[page]]\npath = \"/../../escaped\"\n",
        )
        .unwrap();
        match load_pages(tmp.path()) {
            Err(ContentError::UnsafePagePath { path, .. }) => assert_eq!(path, "/../../escaped"),
            other => panic!("expected UnsafePagePath, got {other:?}"),
        }
    }

    #[test]
    fn load_article_rejects_path_like_slug() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("escape.md");
        for slug in ["../../x", "a/b", ".."] {
            let text = SAMPLE_ARTICLE_MD.replacen("+++\n", &format!("+++\nslug = {slug:?}\n"), 1);
            fs::write(&path, text).unwrap();
            assert!(
                matches!(load_article(&path), Err(ContentError::InvalidSlug { .. })),
                "slug {slug:?} was accepted"
            );
        }
    }

    #[test]
    fn load_article_rejects_empty_derived_slug() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("!!!.md");
        fs::write(&path, SAMPLE_ARTICLE_MD).unwrap();
        assert!(matches!(
            load_article(&path),
            Err(ContentError::InvalidSlug { .. })
        ));
    }

    #[test]
    fn load_pages_rejects_unknown_keys() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("pages.toml"), "[[page]]\npath = \"/\"\ntitel = \"x\"\n").unwrap();
        assert!(matches!(
            load_pages(tmp.path()),
            Err(ContentError::Toml { .. })
        ));
    }

    // =========================================================================
    // Entry helpers
    // =========================================================================

    #[test]
    fn page_breadcrumbs_skip_home_duplicate() {
        let tmp = setup_content();
        let pages = load_pages(tmp.path()).unwrap();
        assert_eq!(pages[0].breadcrumbs("Home").len(), 1);
        let about = pages[1].breadcrumbs("Home");
        assert_eq!(about[1].name, "About Us");
        assert_eq!(about[1].url, "/about");
    }

    #[test]
    fn article_sitemap_entry_uses_modified_time() {
        let tmp = setup_content();
        let articles = load_articles(tmp.path()).unwrap();
        let entry = articles[0].sitemap_entry();
        assert_eq!(entry.path, "/articles/pond-life");
        assert_eq!(entry.last_modified, articles[0].article.updated_at);
    }
}
