//! `<head>` rendering.
//!
//! Renders a [`MetadataRecord`] plus any structured data as the tag set a
//! page's `<head>` needs. Uses [maud](https://maud.lambda.xyz/), so every
//! interpolated value is HTML-escaped. JSON-LD goes out through
//! `PreEscaped` after `</` sequences are neutralized, which keeps a
//! description containing `</script>` from closing the block early.

use crate::metadata::{MetadataRecord, format_timestamp};
use crate::structured::StructuredData;
use maud::{Markup, PreEscaped, html};

/// Render metadata and structured data as `<head>` children.
pub fn render_head(meta: &MetadataRecord, structured: &[StructuredData]) -> Markup {
    let og = &meta.open_graph;
    let twitter = &meta.twitter;

    html! {
        title { (meta.title) }
        meta name="description" content=(meta.description);
        @if !meta.keywords.is_empty() {
            meta name="keywords" content=(meta.keywords);
        }
        @for author in &meta.authors {
            meta name="author" content=(author.name);
        }
        meta name="robots" content=(meta.robots.to_string());
        link rel="canonical" href=(meta.canonical);

        meta property="og:type" content=(og.og_type.as_str());
        meta property="og:locale" content=(og.locale);
        meta property="og:url" content=(og.url);
        meta property="og:title" content=(og.title);
        meta property="og:description" content=(og.description);
        meta property="og:site_name" content=(og.site_name);
        @for image in &og.images {
            meta property="og:image" content=(image.url);
            meta property="og:image:width" content=(image.width);
            meta property="og:image:height" content=(image.height);
            meta property="og:image:alt" content=(image.alt);
        }
        @if let Some(article) = &og.article {
            meta property="article:published_time" content=(format_timestamp(&article.published_time));
            meta property="article:modified_time" content=(format_timestamp(&article.modified_time));
            @for author in &article.authors {
                meta property="article:author" content=(author);
            }
            @if let Some(section) = &article.section {
                meta property="article:section" content=(section);
            }
            @for tag in &article.tags {
                meta property="article:tag" content=(tag);
            }
        }

        meta name="twitter:card" content=(twitter.card);
        meta name="twitter:title" content=(twitter.title);
        meta name="twitter:description" content=(twitter.description);
        @for image in &twitter.images {
            meta name="twitter:image" content=(image);
        }
        @if !twitter.creator.is_empty() {
            meta name="twitter:creator" content=(twitter.creator);
        }
        @if !twitter.site.is_empty() {
            meta name="twitter:site" content=(twitter.site);
        }

        @if let Some(other) = &meta.other {
            @for (property, value) in other {
                // Already emitted from the Open Graph block.
                @if !(og.article.is_some() && property.starts_with("article:")) {
                    meta property=(property) content=(value);
                }
            }
        }

        @for data in structured {
            script type="application/ld+json" { (PreEscaped(json_ld(data))) }
        }
    }
}

/// JSON-LD text safe to embed in a `<script>` element.
fn json_ld(data: &StructuredData) -> String {
    data.to_json().to_string().replace("</", "<\\/")
}
