//! End-to-end test of the content → build pipeline through the public API.
//!
//! Writes a small content directory to a tempdir, loads it, generates the
//! output tree, and checks the artifacts a web server would serve.

use frogtales_seo::{SeoManager, content, generate, output};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const CONFIG: &str = r#"
site_name = "Frogtales"
site_url = "https://frogtales.example"
keywords = ["frogtales"]

[social]
twitter_handle = "@frogtales"
facebook_app_id = "424242"

[robots]
disallow = ["/drafts/"]
"#;

const PAGES: &str = r#"
[[page]]
path = "/"
priority = 1.0

[[page]]
title = "Members"
path = "/members"
no_index = true
"#;

const ARTICLE: &str = r#"+++
title = "Spring Chorus"
published_at = "2024-03-20T06:00:00Z"
tags = ["frogs", "sound"]
premium = true
image = "/images/chorus.jpg"

[author]
name = "Reed Marsh"
+++
## Dusk

Peepers start calling as soon as the light goes.

## Night

The chorus carries across the whole valley.
"#;

fn write_site(root: &Path) {
    fs::write(root.join("config.toml"), CONFIG).unwrap();
    fs::write(root.join("pages.toml"), PAGES).unwrap();
    fs::create_dir_all(root.join("articles/2024")).unwrap();
    fs::write(root.join("articles/2024/Spring Chorus.md"), ARTICLE).unwrap();
}

fn build() -> (TempDir, TempDir) {
    let src = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write_site(src.path());

    let content = content::load(src.path()).unwrap();
    let seo = SeoManager::new(content.config.clone()).unwrap();
    generate::generate(&content, &seo, out.path(), &["User-agent: GPTBot".to_string()]).unwrap();
    (src, out)
}

fn read(dir: &TempDir, path: &str) -> String {
    fs::read_to_string(dir.path().join(path)).unwrap()
}

#[test]
fn sitemap_skips_no_index_pages() {
    let (_src, out) = build();
    let xml = read(&out, "sitemap.xml");
    assert!(xml.contains("<loc>https://frogtales.example/</loc>"));
    assert!(xml.contains("<loc>https://frogtales.example/articles/spring-chorus</loc>"));
    assert!(!xml.contains("/members"));
    assert!(xml.contains("<lastmod>2024-03-20</lastmod>"));
}

#[test]
fn robots_uses_configured_disallow_and_extra_lines() {
    let (_src, out) = build();
    let robots = read(&out, "robots.txt");
    assert!(robots.contains("Disallow: /drafts/\n"));
    assert!(!robots.contains("/api/"));
    assert!(robots.ends_with("Sitemap: https://frogtales.example/sitemap.xml\nUser-agent: GPTBot\n"));
}

#[test]
fn no_index_page_still_gets_head_fragment() {
    let (_src, out) = build();
    let head = read(&out, "head/members.html");
    assert!(head.contains(r#"<meta name="robots" content="noindex, nofollow">"#));
}

#[test]
fn article_head_carries_metadata_and_json_ld() {
    let (_src, out) = build();
    let head = read(&out, "head/articles/spring-chorus.html");

    assert!(head.contains("<title>Spring Chorus | Frogtales</title>"));
    assert!(head.contains(r#"content="https://frogtales.example/images/chorus.jpg""#));
    assert!(head.contains(r#"<meta property="fb:app_id" content="424242">"#));
    assert!(head.contains(r#"<meta property="article:tag" content="sound">"#));
    assert!(head.contains(r#""isAccessibleForFree":false"#));
    // Description derived from the body.
    assert!(head.contains(r#"<meta name="description" content="Dusk Peepers start calling"#));
}

#[test]
fn blog_jsonld_is_valid_json() {
    let (_src, out) = build();
    let json: serde_json::Value = serde_json::from_str(&read(&out, "blog.jsonld")).unwrap();
    assert_eq!(json["@context"], "https://schema.org");
    assert_eq!(json["blogPost"][0]["keywords"], "frogs, sound");
    assert_eq!(json["blogPost"][0]["author"]["name"], "Reed Marsh");
}

#[test]
fn check_report_scores_article_content() {
    let src = TempDir::new().unwrap();
    write_site(src.path());
    let content = content::load(src.path()).unwrap();
    let seo = SeoManager::new(content.config.clone()).unwrap();

    let report = output::check_content(&content, &seo);
    assert_eq!(report.failing(), 0);
    let article = &report.articles[0];
    assert_eq!(article.max, 100);
    assert!(
        article
            .score
            .suggestions
            .iter()
            .any(|s| s.starts_with("Content should be at least 300 words"))
    );
    // Two headings earn their points.
    assert!(!article.score.suggestions.iter().any(|s| s.contains("headings")));
}
