//! Sitemap and robots.txt generation.
//!
//! # Sitemap Format
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
//!   <url>
//!     <loc>https://frogtales.example/</loc>
//!     <lastmod>2023-01-01</lastmod>
//!     <changefreq>weekly</changefreq>
//!     <priority>1</priority>
//!   </url>
//! </urlset>
//! ```
//!
//! Entries without a last-modified timestamp are stamped with today's UTC
//! date. Change frequency defaults to `weekly`, priority to `0.5`.
//! Priorities are clamped to `0.0..=1.0`; a non-finite priority is replaced
//! by the default.

use crate::SeoManager;
use crate::types::SitemapEntry;
use chrono::{NaiveDate, Utc};
use std::borrow::Cow;
use tracing::warn;

const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";
pub const DEFAULT_PRIORITY: f64 = 0.5;

impl SeoManager {
    /// One `<url>` fragment per entry, in input order.
    pub fn generate_sitemap_urls(&self, entries: &[SitemapEntry]) -> Vec<String> {
        self.sitemap_urls_on(entries, Utc::now().date_naive())
    }

    /// A complete `sitemap.xml` document.
    pub fn generate_sitemap_xml(&self, entries: &[SitemapEntry]) -> String {
        let mut xml = String::with_capacity(256 + entries.len() * 160);
        xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        xml.push_str("<urlset xmlns=\"");
        xml.push_str(SITEMAP_NS);
        xml.push_str("\">\n");
        for fragment in self.generate_sitemap_urls(entries) {
            for line in fragment.lines() {
                xml.push_str("  ");
                xml.push_str(line);
                xml.push('\n');
            }
        }
        xml.push_str("</urlset>\n");
        xml
    }

    /// `robots.txt`: allow everything except the configured paths, point at
    /// the sitemap, then append `extra` lines verbatim.
    pub fn generate_robots_txt(&self, extra: &[String]) -> String {
        let config = self.config();
        let mut lines = vec!["User-agent: *".to_string(), "Allow: /".to_string()];
        lines.extend(
            config
                .robots
                .disallow
                .iter()
                .map(|path| format!("Disallow: {path}")),
        );
        lines.push(String::new());
        lines.push(format!("Sitemap: {}/sitemap.xml", config.site_url));
        lines.extend(extra.iter().cloned());
        lines.join("\n")
    }

    fn sitemap_urls_on(&self, entries: &[SitemapEntry], today: NaiveDate) -> Vec<String> {
        entries
            .iter()
            .map(|entry| {
                let loc = self.config().absolute_url(&entry.path);
                let lastmod = entry
                    .last_modified
                    .map(|ts| ts.date_naive())
                    .unwrap_or(today);
                format!(
                    "<url>\n  <loc>{}</loc>\n  <lastmod>{}</lastmod>\n  <changefreq>{}</changefreq>\n  <priority>{}</priority>\n</url>",
                    escape_xml(&loc),
                    lastmod.format("%Y-%m-%d"),
                    entry.change_frequency.unwrap_or_default(),
                    clamp_priority(&entry.path, entry.priority),
                )
            })
            .collect()
    }
}

fn clamp_priority(path: &str, priority: Option<f64>) -> f64 {
    match priority {
        None => DEFAULT_PRIORITY,
        Some(p) if !p.is_finite() => {
            warn!(path, "sitemap priority is not a number, using {DEFAULT_PRIORITY}");
            DEFAULT_PRIORITY
        }
        Some(p) if !(0.0..=1.0).contains(&p) => {
            warn!(path, priority = p, "sitemap priority outside 0.0-1.0, clamping");
            p.clamp(0.0, 1.0)
        }
        Some(p) => p,
    }
}

/// Escape special XML characters.
fn escape_xml(s: &str) -> Cow<'_, str> {
    // Fast path: check if escaping is needed
    if !s.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(s);
    }

    Cow::Owned(
        s.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;")
            .replace('\'', "&apos;"),
    )
}
