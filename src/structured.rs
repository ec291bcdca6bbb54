//! schema.org structured data (JSON-LD).
//!
//! [`StructuredData`] is a closed union with one variant per shape the site
//! emits. Serializing a value yields a complete JSON-LD object: `@context`
//! plus an `@type` taken from the variant name.
//!
//! Inputs are mapped field-for-field and never validated. Optional input
//! that is absent is left out of the output object.

use crate::SeoManager;
use crate::analyze::{reading_time_minutes, strip_html, word_count};
use crate::metadata::{format_timestamp, resolve};
use crate::types::{ArticleDescriptor, Author, BreadcrumbItem, PageDescriptor};
use serde::Serialize;

pub const SCHEMA_CONTEXT: &str = "https://schema.org";

/// What to build structured data for.
#[derive(Debug, Clone, Copy)]
pub enum StructuredDataInput<'a> {
    Article(&'a ArticleDescriptor),
    WebPage(&'a PageDescriptor),
    /// The site itself, described from configuration.
    Organization,
    Breadcrumb(&'a [BreadcrumbItem]),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "@type")]
pub enum StructuredData {
    Article(ArticleSchema),
    WebPage(WebPageSchema),
    Organization(OrganizationSchema),
    BreadcrumbList(BreadcrumbListSchema),
    Blog(BlogSchema),
}

impl StructuredData {
    /// Serialize to a JSON-LD value.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).expect("structured data must serialize")
    }
}

// ============================================================================
// Nested nodes
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Person {
    #[serde(rename = "@type")]
    kind: &'static str,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl From<&Author> for Person {
    fn from(author: &Author) -> Self {
        Self {
            kind: "Person",
            name: author.name.clone(),
            url: author.url.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageObject {
    #[serde(rename = "@type")]
    kind: &'static str,
    pub url: String,
}

impl ImageObject {
    fn new(url: String) -> Self {
        Self {
            kind: "ImageObject",
            url,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Publisher {
    #[serde(rename = "@type")]
    kind: &'static str,
    pub name: String,
    pub logo: ImageObject,
}

/// A typed reference: `{"@type": ..., "@id": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeRef {
    #[serde(rename = "@type")]
    kind: &'static str,
    #[serde(rename = "@id")]
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WebSite {
    #[serde(rename = "@type")]
    kind: &'static str,
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListItem {
    #[serde(rename = "@type")]
    kind: &'static str,
    /// 1-based.
    pub position: usize,
    pub name: String,
    pub item: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPosting {
    #[serde(rename = "@type")]
    kind: &'static str,
    pub headline: String,
    pub description: String,
    pub url: String,
    pub image: String,
    pub date_published: String,
    pub date_modified: String,
    pub author: Person,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub keywords: String,
}

// ============================================================================
// Top-level shapes
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleSchema {
    #[serde(rename = "@context")]
    pub context: &'static str,
    pub headline: String,
    pub description: String,
    pub image: String,
    pub author: Person,
    pub publisher: Publisher,
    pub date_published: String,
    pub date_modified: String,
    pub main_entity_of_page: NodeRef,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub keywords: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub article_section: Option<String>,
    pub word_count: usize,
    /// ISO 8601 duration, e.g. `PT5M`.
    pub time_required: String,
    pub is_accessible_for_free: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebPageSchema {
    #[serde(rename = "@context")]
    pub context: &'static str,
    pub name: String,
    pub description: String,
    pub url: String,
    pub is_part_of: WebSite,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationSchema {
    #[serde(rename = "@context")]
    pub context: &'static str,
    pub name: String,
    pub url: String,
    pub description: String,
    pub logo: ImageObject,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub same_as: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BreadcrumbListSchema {
    #[serde(rename = "@context")]
    pub context: &'static str,
    pub item_list_element: Vec<ListItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogSchema {
    #[serde(rename = "@context")]
    pub context: &'static str,
    pub name: String,
    pub description: String,
    pub url: String,
    pub blog_post: Vec<BlogPosting>,
}

// ============================================================================
// Builders
// ============================================================================

impl SeoManager {
    /// Build the structured-data record for `input`.
    pub fn generate_structured_data(&self, input: StructuredDataInput<'_>) -> StructuredData {
        match input {
            StructuredDataInput::Article(article) => {
                StructuredData::Article(self.article_schema(article))
            }
            StructuredDataInput::WebPage(page) => StructuredData::WebPage(self.webpage_schema(page)),
            StructuredDataInput::Organization => {
                StructuredData::Organization(self.organization_schema())
            }
            StructuredDataInput::Breadcrumb(items) => {
                StructuredData::BreadcrumbList(self.breadcrumb_schema(items))
            }
        }
    }

    /// Build the `Blog` record listing every article, for feeds and the
    /// article index.
    pub fn generate_blog_structured_data(&self, articles: &[ArticleDescriptor]) -> StructuredData {
        let config = self.config();
        let blog_post = articles
            .iter()
            .map(|article| BlogPosting {
                kind: "BlogPosting",
                headline: article.title.clone(),
                description: article.description.clone(),
                url: config.absolute_url(&article.path()),
                image: self.resolve_image(article.image.as_deref()),
                date_published: format_timestamp(&article.published_at),
                date_modified: format_timestamp(&article.modified_at()),
                author: Person::from(&article.author),
                keywords: article.tags.join(", "),
            })
            .collect();

        StructuredData::Blog(BlogSchema {
            context: SCHEMA_CONTEXT,
            name: config.site_name.clone(),
            description: config.default_description.clone(),
            url: config.site_url.clone(),
            blog_post,
        })
    }

    fn article_schema(&self, article: &ArticleDescriptor) -> ArticleSchema {
        let config = self.config();
        let words = word_count(&strip_html(&article.content));
        let minutes = article
            .reading_time
            .unwrap_or_else(|| reading_time_minutes(words));

        ArticleSchema {
            context: SCHEMA_CONTEXT,
            headline: article.title.clone(),
            description: article.description.clone(),
            image: self.resolve_image(article.image.as_deref()),
            author: Person::from(&article.author),
            publisher: Publisher {
                kind: "Organization",
                name: config.site_name.clone(),
                logo: ImageObject::new(config.absolute_url(&config.logo)),
            },
            date_published: format_timestamp(&article.published_at),
            date_modified: format_timestamp(&article.modified_at()),
            main_entity_of_page: NodeRef {
                kind: "WebPage",
                id: config.absolute_url(&article.path()),
            },
            keywords: article.tags.join(", "),
            article_section: article.category.clone(),
            word_count: words,
            time_required: format!("PT{minutes}M"),
            is_accessible_for_free: !article.premium,
        }
    }

    fn webpage_schema(&self, page: &PageDescriptor) -> WebPageSchema {
        let config = self.config();
        WebPageSchema {
            context: SCHEMA_CONTEXT,
            name: resolve(&[Some(&page.title)]).unwrap_or_else(|| config.default_title.clone()),
            description: resolve(&[Some(&page.description)])
                .unwrap_or_else(|| config.default_description.clone()),
            url: page
                .canonical
                .clone()
                .unwrap_or_else(|| config.absolute_url(&page.path)),
            is_part_of: WebSite {
                kind: "WebSite",
                name: config.site_name.clone(),
                url: config.site_url.clone(),
            },
        }
    }

    fn organization_schema(&self) -> OrganizationSchema {
        let config = self.config();
        OrganizationSchema {
            context: SCHEMA_CONTEXT,
            name: config.site_name.clone(),
            url: config.site_url.clone(),
            description: config.default_description.clone(),
            logo: ImageObject::new(config.absolute_url(&config.logo)),
            same_as: config.social.profiles.clone(),
        }
    }

    fn breadcrumb_schema(&self, items: &[BreadcrumbItem]) -> BreadcrumbListSchema {
        let config = self.config();
        BreadcrumbListSchema {
            context: SCHEMA_CONTEXT,
            item_list_element: items
                .iter()
                .enumerate()
                .map(|(i, crumb)| ListItem {
                    kind: "ListItem",
                    position: i + 1,
                    name: crumb.name.clone(),
                    item: config.absolute_url(&crumb.url),
                })
                .collect(),
        }
    }
}
