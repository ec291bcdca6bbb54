//! Page and article metadata assembly.
//!
//! Turns a [`PageDescriptor`] or [`ArticleDescriptor`] into a
//! [`MetadataRecord`]: the exact shape the rendering layer needs for
//! `<title>`, `<meta>`, canonical `<link>`, Open Graph, and Twitter card tags.
//!
//! ## Resolution rules
//!
//! | field | page | article |
//! |-------|------|---------|
//! | title | `"{title} \| {site}"`, or the default title verbatim | always `"{title} \| {site}"` |
//! | description | page description → default description | article description verbatim |
//! | canonical | explicit canonical → `{site_url}{path}` | `{site_url}/articles/{slug}` |
//! | image | page image → default image | article image → default image |
//! | keywords | site keywords + page keywords | site keywords + tags + category |
//!
//! Relative images are resolved against `site_url`; absolute `http(s)://`
//! images are used as given.
//!
//! When `social.facebook_app_id` is configured the record also carries an
//! `other` block of extension tags (`fb:app_id`, and for articles the
//! `article:*` properties Facebook reads).

use crate::SeoManager;
use crate::types::{ArticleDescriptor, Author, PageDescriptor};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

/// Width of the social preview image advertised in Open Graph tags.
pub const OG_IMAGE_WIDTH: u32 = 1200;
/// Height of the social preview image advertised in Open Graph tags.
pub const OG_IMAGE_HEIGHT: u32 = 630;

/// Fully resolved metadata for one rendered page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetadataRecord {
    pub title: String,
    pub description: String,
    /// `", "`-joined keyword list.
    pub keywords: String,
    pub authors: Vec<Author>,
    pub creator: String,
    pub publisher: String,
    pub canonical: String,
    pub robots: Robots,
    pub open_graph: OpenGraph,
    pub twitter: TwitterCard,
    /// Platform extension tags, keyed by `property` name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other: Option<BTreeMap<String, String>>,
}

/// Robots directive. Displays as `"index, follow"` / `"noindex, nofollow"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Robots {
    pub index: bool,
    pub follow: bool,
}

impl Robots {
    pub fn for_no_index(no_index: bool) -> Self {
        Self {
            index: !no_index,
            follow: !no_index,
        }
    }
}

impl fmt::Display for Robots {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let index = if self.index { "index" } else { "noindex" };
        let follow = if self.follow { "follow" } else { "nofollow" };
        write!(f, "{index}, {follow}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OgType {
    Website,
    Article,
}

impl OgType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Website => "website",
            Self::Article => "article",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OgImage {
    pub url: String,
    pub width: u32,
    pub height: u32,
    pub alt: String,
}

/// Open Graph block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpenGraph {
    #[serde(rename = "type")]
    pub og_type: OgType,
    pub locale: String,
    pub url: String,
    pub title: String,
    pub description: String,
    pub site_name: String,
    pub images: Vec<OgImage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub article: Option<OgArticle>,
}

/// `article:*` Open Graph properties.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OgArticle {
    pub published_time: DateTime<Utc>,
    /// Never absent: falls back to `published_time`.
    pub modified_time: DateTime<Utc>,
    pub authors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    pub tags: Vec<String>,
}

/// Twitter card block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TwitterCard {
    pub card: String,
    pub title: String,
    pub description: String,
    pub images: Vec<String>,
    pub creator: String,
    pub site: String,
}

/// Resolve a metadata field from multiple sources.
///
/// Takes a list of optional values in priority order and returns the first
/// non-None, non-empty value. Values are used as given, whitespace included.
///
/// ```text
/// description: resolve(&[page.description, config.default_description])
/// ```
pub fn resolve(sources: &[Option<&str>]) -> Option<String> {
    sources
        .iter()
        .filter_map(|opt| opt.filter(|s| !s.is_empty()).map(String::from))
        .next()
}

/// Format a timestamp the way every tag and JSON-LD field in the crate does.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

impl SeoManager {
    /// Build metadata for a static page.
    pub fn generate_page_metadata(&self, page: &PageDescriptor) -> MetadataRecord {
        let config = self.config();

        let title = match resolve(&[Some(&page.title)]) {
            Some(title) => self.suffixed_title(&title),
            None => config.default_title.clone(),
        };
        let description = resolve(&[Some(&page.description)])
            .unwrap_or_else(|| config.default_description.clone());
        let canonical = page
            .canonical
            .clone()
            .unwrap_or_else(|| config.absolute_url(&page.path));
        let image = self.resolve_image(page.image.as_deref());
        let keywords = self.keyword_string(page.keywords.iter().map(String::as_str));

        debug!(path = %page.path, %canonical, "resolved page metadata");

        let other = config
            .social
            .facebook_app_id
            .as_ref()
            .map(|app_id| BTreeMap::from([("fb:app_id".to_string(), app_id.clone())]));

        self.assemble(Assembled {
            title,
            description,
            keywords,
            authors: vec![Author {
                name: config.site_name.clone(),
                url: Some(config.site_url.clone()),
            }],
            canonical,
            image,
            robots: Robots::for_no_index(page.no_index),
            og_type: OgType::Website,
            article: None,
            other,
        })
    }

    /// Build metadata for an article.
    pub fn generate_article_metadata(&self, article: &ArticleDescriptor) -> MetadataRecord {
        let config = self.config();

        let title = self.suffixed_title(&article.title);
        let canonical = config.absolute_url(&article.path());
        let image = self.resolve_image(article.image.as_deref());
        let keywords = self.keyword_string(
            article
                .tags
                .iter()
                .map(String::as_str)
                .chain(article.category.as_deref()),
        );
        let modified_time = article.modified_at();

        let og_article = OgArticle {
            published_time: article.published_at,
            modified_time,
            authors: vec![article.author.name.clone()],
            section: article.category.clone(),
            tags: article.tags.clone(),
        };

        let other = config.social.facebook_app_id.as_ref().map(|app_id| {
            let mut tags = BTreeMap::from([
                ("fb:app_id".to_string(), app_id.clone()),
                ("article:author".to_string(), article.author.name.clone()),
                (
                    "article:published_time".to_string(),
                    format_timestamp(&article.published_at),
                ),
                (
                    "article:modified_time".to_string(),
                    format_timestamp(&modified_time),
                ),
                ("article:tag".to_string(), article.tags.join(", ")),
            ]);
            if let Some(category) = &article.category {
                tags.insert("article:section".to_string(), category.clone());
            }
            tags
        });

        debug!(slug = %article.slug, %canonical, "resolved article metadata");

        self.assemble(Assembled {
            title,
            description: article.description.clone(),
            keywords,
            authors: vec![article.author.clone()],
            canonical,
            image,
            robots: Robots::for_no_index(false),
            og_type: OgType::Article,
            article: Some(og_article),
            other,
        })
    }

    fn suffixed_title(&self, title: &str) -> String {
        format!("{} | {}", title, self.config().site_name)
    }

    /// Absolute URL of the preview image, falling back to the default image.
    pub(crate) fn resolve_image(&self, image: Option<&str>) -> String {
        let config = self.config();
        let path = resolve(&[image]).unwrap_or_else(|| config.default_image.clone());
        config.absolute_url(&path)
    }

    fn keyword_string<'a>(&'a self, extra: impl Iterator<Item = &'a str>) -> String {
        self.config()
            .keywords
            .iter()
            .map(String::as_str)
            .chain(extra)
            .filter(|k| !k.trim().is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn assemble(&self, parts: Assembled) -> MetadataRecord {
        let config = self.config();
        let open_graph = OpenGraph {
            og_type: parts.og_type,
            locale: config.locale.clone(),
            url: parts.canonical.clone(),
            title: parts.title.clone(),
            description: parts.description.clone(),
            site_name: config.site_name.clone(),
            images: vec![OgImage {
                url: parts.image.clone(),
                width: OG_IMAGE_WIDTH,
                height: OG_IMAGE_HEIGHT,
                alt: parts.title.clone(),
            }],
            article: parts.article,
        };
        let twitter = TwitterCard {
            card: "summary_large_image".to_string(),
            title: parts.title.clone(),
            description: parts.description.clone(),
            images: vec![parts.image],
            creator: config.social.twitter_handle.clone(),
            site: config.social.twitter_handle.clone(),
        };

        MetadataRecord {
            title: parts.title,
            description: parts.description,
            keywords: parts.keywords,
            authors: parts.authors,
            creator: config.site_name.clone(),
            publisher: config.site_name.clone(),
            canonical: parts.canonical,
            robots: parts.robots,
            open_graph,
            twitter,
            other: parts.other,
        }
    }
}

/// Resolved fields shared by the page and article builders.
struct Assembled {
    title: String,
    description: String,
    keywords: String,
    authors: Vec<Author>,
    canonical: String,
    image: String,
    robots: Robots,
    og_type: OgType,
    article: Option<OgArticle>,
    other: Option<BTreeMap<String, String>>,
}
