//! Input descriptors shared by every generator.
//!
//! These are transient values: built per render from a content file or a
//! request, handed to [`crate::SeoManager`], then dropped. They deserialize
//! from the same TOML the content loader reads, so field names here are the
//! front-matter keys.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A static page (home, about, pricing...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageDescriptor {
    /// Page title without the site suffix. Empty means "use the default title".
    pub title: String,
    /// Meta description. Empty means "use the default description".
    pub description: String,
    /// Site-relative path, e.g. `/about`.
    pub path: String,
    /// Social preview image, site-relative or absolute.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Ask crawlers not to index or follow this page.
    pub no_index: bool,
    /// Explicit canonical URL, overriding `{site_url}{path}`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canonical: Option<String>,
    /// Page-specific keywords appended after the site keywords.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
}

/// Article author.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Author {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// A published article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleDescriptor {
    pub title: String,
    pub description: String,
    /// Rendered HTML body.
    #[serde(default)]
    pub content: String,
    pub slug: String,
    pub author: Author,
    pub published_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Display order is preserved.
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Minutes. Overrides the estimate derived from `content`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reading_time: Option<u32>,
    /// Paywalled for non-subscribers.
    #[serde(default)]
    pub premium: bool,
}

impl ArticleDescriptor {
    /// `updated_at` if present, else `published_at`.
    pub fn modified_at(&self) -> DateTime<Utc> {
        self.updated_at.unwrap_or(self.published_at)
    }

    /// Site-relative URL path for this article.
    pub fn path(&self) -> String {
        format!("/articles/{}", self.slug)
    }
}

/// One crumb in a breadcrumb trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreadcrumbItem {
    pub name: String,
    pub url: String,
}

impl BreadcrumbItem {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// `<changefreq>` values accepted by the sitemap protocol.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeFrequency {
    Always,
    Hourly,
    Daily,
    #[default]
    Weekly,
    Monthly,
    Yearly,
    Never,
}

impl ChangeFrequency {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Always => "always",
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
            Self::Never => "never",
        }
    }
}

impl fmt::Display for ChangeFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One sitemap `<url>` entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SitemapEntry {
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change_frequency: Option<ChangeFrequency>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<f64>,
}

impl SitemapEntry {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }
}
