//! # Frogtales SEO
//!
//! Search and social metadata for the Frogtales publishing platform. Given a
//! page or article descriptor, this crate produces the `<head>` metadata,
//! schema.org JSON-LD, sitemap entries, and `robots.txt` the site serves,
//! and scores the result against a fixed set of SEO heuristics.
//!
//! # Architecture
//!
//! ```text
//! analyze   content  →  description, keywords, reading time
//! metadata  page / article descriptor  →  MetadataRecord
//! structured / score   descriptor or MetadataRecord  →  JSON-LD / SeoScore
//! ```
//!
//! Every generator is a method on [`SeoManager`], which owns the validated
//! [`config::SiteConfig`]. Build one at startup and share it: it is
//! immutable, so request handlers on any thread can use it without locking.
//!
//! ```
//! use frogtales_seo::{SeoManager, config::SiteConfig, types::PageDescriptor};
//!
//! let seo = SeoManager::new(SiteConfig::default()).unwrap();
//! let meta = seo.generate_page_metadata(&PageDescriptor {
//!     title: "About".into(),
//!     path: "/about".into(),
//!     ..Default::default()
//! });
//! assert_eq!(meta.title, "About | Frogtales");
//! assert_eq!(meta.canonical, "http://localhost:3000/about");
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`analyze`] | Tag stripping, keyword frequency, reading time |
//! | [`metadata`] | Page and article [`metadata::MetadataRecord`] assembly |
//! | [`structured`] | schema.org shapes: Article, WebPage, Organization, BreadcrumbList, Blog |
//! | [`score`] | Advisory SEO score and strict publish-time validation |
//! | [`sitemap`] | `sitemap.xml` fragments and `robots.txt` |
//! | [`render`] | Maud rendering of metadata into `<head>` tags |
//! | [`config`] | `config.toml` loading, layering, and validation |
//! | [`types`] | Input descriptors shared by every generator |
//! | [`content`] | Content directory loader: `pages.toml` and Markdown articles |
//! | [`generate`] | Writes sitemap, robots, JSON-LD, and head fragments to disk |
//! | [`output`] | CLI output formatting |
//!
//! # Failure Model
//!
//! The generators never fail. Missing optional input falls back to the
//! configured defaults. Errors only come from the edges: reading
//! configuration or content files and writing output.

pub mod analyze;
pub mod config;
pub mod content;
pub mod generate;
pub mod metadata;
pub mod output;
pub mod render;
pub mod score;
pub mod sitemap;
pub mod structured;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;

use config::{ConfigError, SiteConfig};

/// Entry point for every generator in the crate.
#[derive(Debug, Clone)]
pub struct SeoManager {
    config: SiteConfig,
}

impl SeoManager {
    /// Validate `config` and wrap it. A trailing `/` on `site_url` is trimmed.
    ///
    /// Values that are valid but unfit for production (a localhost
    /// `site_url`, no Twitter handle) are logged with `tracing::warn!`.
    pub fn new(mut config: SiteConfig) -> Result<Self, ConfigError> {
        config.site_url = config.site_url.trim_end_matches('/').to_string();
        config.validate()?;
        config::warn_unready_values(&config);
        Ok(Self { config })
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }
}
