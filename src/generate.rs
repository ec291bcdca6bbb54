//! Build output generation.
//!
//! Takes loaded [`Content`] and writes everything the web server serves
//! alongside the rendered pages.
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── sitemap.xml                # Pages, then articles
//! ├── robots.txt
//! ├── blog.jsonld                # Blog + BlogPosting list
//! └── head/
//!     ├── index.html             # <head> fragment for "/"
//!     ├── about.html             # <head> fragment for "/about"
//!     └── articles/
//!         └── pond-life.html     # <head> fragment per article
//! ```
//!
//! Head fragments are the children of `<head>` only, ready to be spliced into
//! a page template. Each carries its structured data: pages get WebPage and
//! BreadcrumbList (plus Organization on the home page), articles get Article
//! and BreadcrumbList.

use crate::SeoManager;
use crate::content::{Content, is_safe_url_path};
use crate::render::render_head;
use crate::structured::StructuredDataInput;
use crate::types::SitemapEntry;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("URL path {0:?} would write outside the output directory")]
    UnsafePath(String),
    #[error("{first:?} and {second:?} both map to {fragment}")]
    FragmentCollision {
        fragment: PathBuf,
        first: String,
        second: String,
    },
}

/// What [`generate`] wrote, relative to the output directory.
#[derive(Debug, Default)]
pub struct GenerateReport {
    pub output_dir: PathBuf,
    pub sitemap_urls: usize,
    pub files: Vec<PathBuf>,
}

/// Nothing is written if any fragment path is unsafe or shared by two
/// entries.
pub fn generate(
    content: &Content,
    seo: &SeoManager,
    output_dir: &Path,
    robots_extra: &[String],
) -> Result<GenerateReport, GenerateError> {
    let fragments = plan_fragments(content)?;

    fs::create_dir_all(output_dir)?;
    let mut report = GenerateReport {
        output_dir: output_dir.to_path_buf(),
        ..GenerateReport::default()
    };

    let entries = sitemap_entries(content);
    report.sitemap_urls = entries.len();
    write(
        output_dir,
        Path::new("sitemap.xml"),
        &seo.generate_sitemap_xml(&entries),
        &mut report,
    )?;

    let mut robots = seo.generate_robots_txt(robots_extra);
    robots.push('\n');
    write(output_dir, Path::new("robots.txt"), &robots, &mut report)?;

    let articles: Vec<_> = content.articles.iter().map(|a| a.article.clone()).collect();
    let blog = seo.generate_blog_structured_data(&articles);
    let blog_json = serde_json::to_string_pretty(&blog)?;
    write(output_dir, Path::new("blog.jsonld"), &blog_json, &mut report)?;

    let (page_fragments, article_fragments) = fragments.split_at(content.pages.len());

    for (page, fragment) in content.pages.iter().zip(page_fragments) {
        let descriptor = page.descriptor();
        let meta = seo.generate_page_metadata(&descriptor);
        let crumbs = page.breadcrumbs(&seo.config().site_name);

        let mut structured = vec![
            seo.generate_structured_data(StructuredDataInput::WebPage(&descriptor)),
            seo.generate_structured_data(StructuredDataInput::Breadcrumb(&crumbs)),
        ];
        if page.path == "/" {
            structured.push(seo.generate_structured_data(StructuredDataInput::Organization));
        }

        let head = render_head(&meta, &structured).into_string();
        write(output_dir, fragment, &head, &mut report)?;
    }

    for (entry, fragment) in content.articles.iter().zip(article_fragments) {
        let article = &entry.article;
        let meta = seo.generate_article_metadata(article);
        let crumbs = entry.breadcrumbs();
        let structured = [
            seo.generate_structured_data(StructuredDataInput::Article(article)),
            seo.generate_structured_data(StructuredDataInput::Breadcrumb(&crumbs)),
        ];

        let head = render_head(&meta, &structured).into_string();
        write(output_dir, fragment, &head, &mut report)?;
    }

    Ok(report)
}

/// Pages in file order, then articles in path order.
pub fn sitemap_entries(content: &Content) -> Vec<SitemapEntry> {
    content
        .pages
        .iter()
        .filter(|page| !page.no_index)
        .map(|page| page.sitemap_entry())
        .chain(content.articles.iter().map(|a| a.sitemap_entry()))
        .collect()
}

/// Fragment path for every page, then every article.
fn plan_fragments(content: &Content) -> Result<Vec<PathBuf>, GenerateError> {
    let url_paths = content
        .pages
        .iter()
        .map(|page| page.path.clone())
        .chain(content.articles.iter().map(|a| a.article.path()));

    let mut claimed: HashMap<PathBuf, String> = HashMap::new();
    let mut fragments = Vec::new();
    for url_path in url_paths {
        let fragment = head_fragment_path(&url_path)?;
        if let Some(first) = claimed.insert(fragment.clone(), url_path.clone()) {
            return Err(GenerateError::FragmentCollision {
                fragment,
                first,
                second: url_path,
            });
        }
        fragments.push(fragment);
    }
    Ok(fragments)
}

/// `/` → `head/index.html`, `/a/b/` → `head/a/b.html`.
fn head_fragment_path(url_path: &str) -> Result<PathBuf, GenerateError> {
    if !is_safe_url_path(url_path) {
        return Err(GenerateError::UnsafePath(url_path.to_string()));
    }
    let trimmed = url_path.trim_matches('/');
    let file = if trimmed.is_empty() {
        "index.html".to_string()
    } else {
        format!("{trimmed}.html")
    };
    Ok(Path::new("head").join(file))
}

fn write(
    output_dir: &Path,
    relative: &Path,
    contents: &str,
    report: &mut GenerateReport,
) -> Result<(), GenerateError> {
    let path = output_dir.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, contents)?;
    debug!(path = %path.display(), bytes = contents.len(), "wrote");
    report.files.push(relative.to_path_buf());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content;
    use crate::test_helpers::setup_content;
    use tempfile::TempDir;

    fn build() -> (TempDir, TempDir, GenerateReport) {
        let src = setup_content();
        let out = TempDir::new().unwrap();
        let content = content::load(src.path()).unwrap();
        let seo = SeoManager::new(content.config.clone()).unwrap();
        let report = generate(&content, &seo, out.path(), &[]).unwrap();
        (src, out, report)
    }

    #[test]
    fn head_fragment_paths() {
        let path = |p: &str| head_fragment_path(p).unwrap();
        assert_eq!(path("/"), Path::new("head/index.html"));
        assert_eq!(path("/about"), Path::new("head/about.html"));
        assert_eq!(path("/docs/guide/"), Path::new("head/docs/guide.html"));
    }

    #[test]
    fn head_fragment_path_rejects_parent_segments() {
        assert!(matches!(
            head_fragment_path("/../../escaped"),
            Err(GenerateError::UnsafePath(_))
        ));
    }

    #[test]
    fn generate_refuses_to_write_outside_output_dir() {
        let src = setup_content();
        let out = TempDir::new().unwrap();
        let dist = out.path().join("dist");
        let mut content = content::load(src.path()).unwrap();
        content.pages[1].path = "/../../escaped".to_string();
        let seo = SeoManager::new(content.config.clone()).unwrap();

        let result = generate(&content, &seo, &dist, &[]);
        assert!(matches!(result, Err(GenerateError::UnsafePath(_))));
        assert!(!out.path().join("escaped.html").exists());
        assert!(!dist.exists());
    }

    #[test]
    fn generate_rejects_page_shadowing_article() {
        let src = setup_content();
        let out = TempDir::new().unwrap();
        let mut content = content::load(src.path()).unwrap();
        content.pages[1].path = "/articles/pond-life".to_string();
        let seo = SeoManager::new(content.config.clone()).unwrap();

        match generate(&content, &seo, out.path(), &[]) {
            Err(GenerateError::FragmentCollision {
                fragment,
                first,
                second,
            }) => {
                assert_eq!(fragment, Path::new("head/articles/pond-life.html"));
                assert_eq!(first, "/articles/pond-life");
                assert_eq!(second, "/articles/pond-life");
            }
            other => panic!("expected FragmentCollision, got {other:?}"),
        }
        assert!(!out.path().join("sitemap.xml").exists());
    }

    #[test]
    fn generate_rejects_equivalent_page_paths() {
        let src = setup_content();
        let out = TempDir::new().unwrap();
        let mut content = content::load(src.path()).unwrap();
        content.pages[0].path = "/about/".to_string();
        let seo = SeoManager::new(content.config.clone()).unwrap();
        assert!(matches!(
            generate(&content, &seo, out.path(), &[]),
            Err(GenerateError::FragmentCollision { .. })
        ));
    }

    #[test]
    fn generate_writes_expected_files() {
        let (_src, out, report) = build();
        let files: Vec<String> = report
            .files
            .iter()
            .map(|p| p.to_string_lossy().to_string())
            .collect();
        assert_eq!(
            files,
            vec![
                "sitemap.xml",
                "robots.txt",
                "blog.jsonld",
                "head/index.html",
                "head/about.html",
                "head/articles/pond-life.html",
            ]
        );
        for file in &report.files {
            assert!(out.path().join(file).is_file(), "missing {}", file.display());
        }
    }

    #[test]
    fn sitemap_lists_pages_then_articles() {
        let (_src, out, report) = build();
        assert_eq!(report.sitemap_urls, 3);

        let xml = fs::read_to_string(out.path().join("sitemap.xml")).unwrap();
        let home = xml.find("<loc>https://frogtales.example/</loc>").unwrap();
        let about = xml.find("<loc>https://frogtales.example/about</loc>").unwrap();
        let article = xml
            .find("<loc>https://frogtales.example/articles/pond-life</loc>")
            .unwrap();
        assert!(home < about && about < article);
        assert!(xml.contains("<lastmod>2024-01-15</lastmod>"));
        assert!(xml.contains("<lastmod>2024-02-05</lastmod>"));
        assert!(xml.contains("<changefreq>daily</changefreq>"));
    }

    #[test]
    fn sitemap_skips_no_index_pages() {
        let src = setup_content();
        let mut content = content::load(src.path()).unwrap();
        content.pages[1].no_index = true;
        let entries = sitemap_entries(&content);
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e.path != "/about"));
    }

    #[test]
    fn robots_txt_ends_with_newline() {
        let (_src, out, _) = build();
        let robots = fs::read_to_string(out.path().join("robots.txt")).unwrap();
        assert!(robots.starts_with("User-agent: *\n"));
        assert!(robots.ends_with("Sitemap: https://frogtales.example/sitemap.xml\n"));
    }

    #[test]
    fn blog_jsonld_lists_articles() {
        let (_src, out, _) = build();
        let text = fs::read_to_string(out.path().join("blog.jsonld")).unwrap();
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json["@type"], "Blog");
        assert_eq!(json["blogPost"][0]["headline"], "Life in the Pond");
    }

    #[test]
    fn home_head_has_organization() {
        let (_src, out, _) = build();
        let head = fs::read_to_string(out.path().join("head/index.html")).unwrap();
        assert!(head.contains("<title>Frogtales - Stories Worth Telling</title>"));
        assert!(head.contains(r#""@type":"Organization""#));
        assert!(head.contains(r#""@type":"WebPage""#));
    }

    #[test]
    fn article_head_has_article_and_breadcrumbs() {
        let (_src, out, _) = build();
        let head = fs::read_to_string(out.path().join("head/articles/pond-life.html")).unwrap();
        assert!(head.contains("<title>Life in the Pond | Frogtales</title>"));
        assert!(head.contains(r#""@type":"Article""#));
        assert!(head.contains(r#""@type":"BreadcrumbList""#));
        assert!(head.contains("https://frogtales.example/articles/pond-life"));
    }
}
