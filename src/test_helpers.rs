//! Shared test fixtures.
//!
//! Every module's tests build on the same site and descriptors so expected
//! strings stay consistent across the suite:
//!
//! - site: `Frogtales` at `https://frogtales.example`, handle `@frogtales`,
//!   keywords `frogtales, stories`
//! - page: `About Us` at `/about`
//! - article: `Life in the Pond` (`pond-life`) by Fern Lily, tagged
//!   `nature, amphibians`, category `Science`

use std::fs;
use std::path::Path;
use tempfile::TempDir;

use crate::SeoManager;
use crate::config::{SiteConfig, SocialConfig};
use crate::types::{ArticleDescriptor, Author, PageDescriptor};

pub fn test_config() -> SiteConfig {
    SiteConfig {
        site_url: "https://frogtales.example".to_string(),
        keywords: vec!["frogtales".to_string(), "stories".to_string()],
        social: SocialConfig {
            twitter_handle: "@frogtales".to_string(),
            facebook_app_id: None,
            profiles: vec!["https://x.com/frogtales".to_string()],
        },
        ..SiteConfig::default()
    }
}

pub fn manager() -> SeoManager {
    SeoManager::new(test_config()).unwrap()
}

/// Same site with a Facebook app id configured.
pub fn fb_manager() -> SeoManager {
    let mut config = test_config();
    config.social.facebook_app_id = Some("424242".to_string());
    SeoManager::new(config).unwrap()
}

pub fn sample_page() -> PageDescriptor {
    PageDescriptor {
        title: "About Us".to_string(),
        description: "Who we are and why we write about frogs.".to_string(),
        path: "/about".to_string(),
        ..PageDescriptor::default()
    }
}

pub fn sample_article() -> ArticleDescriptor {
    ArticleDescriptor {
        title: "Life in the Pond".to_string(),
        description: "A season of watching frogs grow up.".to_string(),
        content: "<h2>Spring</h2><p>Spawn everywhere.</p><h2>Summer</h2><p>Tadpoles.</p>"
            .to_string(),
        slug: "pond-life".to_string(),
        author: Author {
            name: "Fern Lily".to_string(),
            url: Some("https://frogtales.example/authors/fern".to_string()),
        },
        published_at: "2024-02-01T09:30:00Z".parse().unwrap(),
        updated_at: Some("2024-02-05T12:00:00Z".parse().unwrap()),
        tags: vec!["nature".to_string(), "amphibians".to_string()],
        category: Some("Science".to_string()),
        image: None,
        reading_time: None,
        premium: false,
    }
}

// =========================================================================
// Content directory fixtures
// =========================================================================

pub const SAMPLE_CONFIG_TOML: &str = r#"
site_url = "https://frogtales.example/"
keywords = ["frogtales", "stories"]

[social]
twitter_handle = "@frogtales"
"#;

pub const SAMPLE_PAGES_TOML: &str = r#"
[[page]]
title = ""
path = "/"
priority = 1.0
change_frequency = "daily"

[[page]]
title = "About Us"
description = "Who we are and why we write about frogs."
path = "/about"
last_modified = "2024-01-15T00:00:00Z"
"#;

pub const SAMPLE_ARTICLE_MD: &str = r#"+++
title = "Life in the Pond"
description = "A season of watching frogs grow up."
published_at = "2024-02-01T09:30:00Z"
updated_at = "2024-02-05T12:00:00Z"
tags = ["nature", "amphibians"]
category = "Science"

[author]
name = "Fern Lily"
url = "https://frogtales.example/authors/fern"
+++
## Spring

Spawn *everywhere*.

## Summer

Tadpoles.
"#;

/// Write a small content directory: config, two pages, one article.
pub fn setup_content() -> TempDir {
    let tmp = TempDir::new().unwrap();
    write_content(tmp.path());
    tmp
}

fn write_content(root: &Path) {
    fs::write(root.join("config.toml"), SAMPLE_CONFIG_TOML).unwrap();
    fs::write(root.join("pages.toml"), SAMPLE_PAGES_TOML).unwrap();
    fs::create_dir_all(root.join("articles")).unwrap();
    fs::write(root.join("articles/Pond-Life.md"), SAMPLE_ARTICLE_MD).unwrap();
}
