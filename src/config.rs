//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. The file lives in
//! the content root and is layered on top of the stock defaults, so it only
//! needs the keys it wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! site_name = "Frogtales"
//! site_url = "http://localhost:3000"      # No trailing slash (trimmed if present)
//! default_title = "Frogtales - Stories Worth Telling"
//! default_description = "Independent writing, essays, and stories from creators on Frogtales."
//! default_image = "/images/og-default.jpg" # Site-relative
//! logo = "/logo.png"                       # Site-relative
//! locale = "en_US"
//! keywords = ["frogtales", "stories", "articles", "creators", "writing"]
//!
//! [social]
//! twitter_handle = ""        # e.g. "@frogtales"
//! # facebook_app_id = "1234"  # Enables fb:/article: extension tags
//! profiles = []              # Profile URLs for Organization.sameAs
//!
//! [robots]
//! disallow = ["/api/", "/admin/", "/dashboard/"]
//! ```
//!
//! Unknown keys are rejected to catch typos early. Values that parse but are
//! not ready for production (a localhost `site_url`, an empty Twitter handle)
//! are logged as warnings and otherwise accepted.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("site_url {url:?} is not a valid URL: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
///
/// Constructed once at startup and never mutated afterwards. Every generator
/// in the crate reads from it through [`crate::SeoManager`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Appended to every page title as `"{title} | {site_name}"`.
    pub site_name: String,
    /// Absolute base URL, no trailing slash.
    pub site_url: String,
    /// Title used verbatim when a page has none.
    pub default_title: String,
    /// Description used when a page has none.
    pub default_description: String,
    /// Social preview image used when a page or article has none.
    pub default_image: String,
    /// Publisher logo for structured data.
    pub logo: String,
    /// Open Graph locale.
    pub locale: String,
    /// Site-wide keywords, prepended to every page's keyword string.
    pub keywords: Vec<String>,
    /// Social handles and platform ids.
    pub social: SocialConfig,
    /// `robots.txt` rule set.
    pub robots: RobotsConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site_name: "Frogtales".to_string(),
            site_url: "http://localhost:3000".to_string(),
            default_title: "Frogtales - Stories Worth Telling".to_string(),
            default_description:
                "Independent writing, essays, and stories from creators on Frogtales.".to_string(),
            default_image: "/images/og-default.jpg".to_string(),
            logo: "/logo.png".to_string(),
            locale: "en_US".to_string(),
            keywords: ["frogtales", "stories", "articles", "creators", "writing"]
                .into_iter()
                .map(String::from)
                .collect(),
            social: SocialConfig::default(),
            robots: RobotsConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Validate config values. Run once after loading.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let parsed = url::Url::parse(&self.site_url).map_err(|source| ConfigError::InvalidUrl {
            url: self.site_url.clone(),
            source,
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::Validation(format!(
                "site_url must use http or https, got {}",
                parsed.scheme()
            )));
        }
        if self.site_name.trim().is_empty() {
            return Err(ConfigError::Validation("site_name must not be empty".into()));
        }
        if self.default_title.trim().is_empty() {
            return Err(ConfigError::Validation(
                "default_title must not be empty".into(),
            ));
        }
        for (key, value) in [("default_image", &self.default_image), ("logo", &self.logo)] {
            if !value.starts_with('/') {
                return Err(ConfigError::Validation(format!(
                    "{key} must be a site-relative path starting with '/', got {value:?}"
                )));
            }
        }
        Ok(())
    }

    /// Resolve a site-relative path (or pass through an absolute URL).
    ///
    /// `"/about"` → `"{site_url}/about"`; `"about"` gets the missing slash;
    /// `"https://cdn.example/x.jpg"` is returned unchanged.
    pub fn absolute_url(&self, path: &str) -> String {
        if is_absolute_url(path) {
            path.to_string()
        } else if path.starts_with('/') {
            format!("{}{}", self.site_url, path)
        } else {
            format!("{}/{}", self.site_url, path)
        }
    }
}

/// Whether `s` is an absolute `http(s)://` URL.
pub fn is_absolute_url(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}

/// Social handles and platform ids.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SocialConfig {
    /// Twitter/X handle including the `@`, used for `twitter:creator` and `twitter:site`.
    pub twitter_handle: String,
    /// When set, pages carry `fb:app_id` and articles carry `article:*` tags.
    pub facebook_app_id: Option<String>,
    /// Public profile URLs, emitted as `Organization.sameAs`.
    pub profiles: Vec<String>,
}

/// `robots.txt` rule set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RobotsConfig {
    /// Paths emitted as `Disallow:` lines, in order.
    pub disallow: Vec<String>,
}

impl Default for RobotsConfig {
    fn default() -> Self {
        Self {
            disallow: vec![
                "/api/".to_string(),
                "/admin/".to_string(),
                "/dashboard/".to_string(),
            ],
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged on top of.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize,
/// normalize, and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let mut config: SiteConfig = merged.try_into()?;
    config.site_url = config.site_url.trim_end_matches('/').to_string();
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Values that are valid but would produce poor production metadata.
pub(crate) fn unready_values(config: &SiteConfig) -> Vec<String> {
    let mut notes = Vec::new();
    let host = url::Url::parse(&config.site_url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string));
    if let Some(host) = host.filter(|h| h == "localhost" || h == "127.0.0.1") {
        notes.push(format!(
            "site_url points at {host}; canonical and sitemap URLs will not resolve in production"
        ));
    }
    if config.social.twitter_handle.is_empty() {
        notes.push(
            "social.twitter_handle is not set; twitter:site and twitter:creator will be empty"
                .to_string(),
        );
    }
    notes
}

/// Log each of [`unready_values`] as a warning.
pub(crate) fn warn_unready_values(config: &SiteConfig) {
    for note in unready_values(config) {
        warn!(site_url = %config.site_url, "{note}");
    }
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Frogtales SEO Configuration
# ===========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Unknown keys will cause an error.

# Appended to page titles as "{title} | {site_name}".
site_name = "Frogtales"

# Absolute base URL used for canonical links, images, and the sitemap.
# A trailing slash is trimmed.
site_url = "http://localhost:3000"

# Used verbatim when a page has no title of its own.
default_title = "Frogtales - Stories Worth Telling"

# Used when a page has no description of its own.
default_description = "Independent writing, essays, and stories from creators on Frogtales."

# Site-relative social preview image (1200x630 recommended).
default_image = "/images/og-default.jpg"

# Site-relative publisher logo for structured data.
logo = "/logo.png"

# Open Graph locale.
locale = "en_US"

# Site-wide keywords, prepended to every page's keyword list.
keywords = ["frogtales", "stories", "articles", "creators", "writing"]

# ---------------------------------------------------------------------------
# Social
# ---------------------------------------------------------------------------
[social]
# Twitter/X handle including the "@".
twitter_handle = ""

# Facebook app id. When set, fb:app_id and article:* tags are emitted.
# facebook_app_id = "1234567890"

# Public profile URLs, listed as Organization.sameAs.
profiles = []

# ---------------------------------------------------------------------------
# robots.txt
# ---------------------------------------------------------------------------
[robots]
# Paths crawlers are asked to skip.
disallow = ["/api/", "/admin/", "/dashboard/"]
"##
}
