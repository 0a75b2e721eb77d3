//! Site configuration (_config.yml)

use anyhow::{Context, Result};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub name: String,
    pub title: String,
    pub description: String,
    pub tagline: String,
    pub keywords: Vec<String>,

    // URL
    pub url: String,

    // Directory
    pub public_dir: String,

    pub author: AuthorConfig,
    pub social: SocialConfig,
    pub blog: BlogConfig,
    pub feed: FeedConfig,
    pub sitemap: SitemapConfig,
    pub robots: RobotsConfig,
    pub about: AboutConfig,
    pub navigation: Vec<NavItem>,
    pub technical: TechnicalConfig,
    pub highlight: HighlightConfig,
    pub server: ServerConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: "Folio".to_string(),
            title: "Folio".to_string(),
            description: String::new(),
            tagline: String::new(),
            keywords: Vec::new(),

            url: "http://example.com".to_string(),

            public_dir: "public".to_string(),

            author: AuthorConfig::default(),
            social: SocialConfig::default(),
            blog: BlogConfig::default(),
            feed: FeedConfig::default(),
            sitemap: SitemapConfig::default(),
            robots: RobotsConfig::default(),
            about: AboutConfig::default(),
            navigation: vec![
                NavItem::new("Home", "/"),
                NavItem::new("About", "/about"),
                NavItem::new("Blog", "/#blog"),
            ],
            technical: TechnicalConfig::default(),
            highlight: HighlightConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: SiteConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        Ok(config)
    }

    /// Timezone used to interpret post dates without an offset.
    /// Falls back to UTC when the configured name is unknown.
    pub fn timezone(&self) -> Tz {
        match self.technical.timezone.parse::<Tz>() {
            Ok(tz) => tz,
            Err(_) => {
                tracing::warn!(
                    "Unknown timezone {:?}, using UTC",
                    self.technical.timezone
                );
                Tz::UTC
            }
        }
    }
}

/// Site-wide author, also the fallback author of every post
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthorConfig {
    pub name: String,
    pub email: String,
    pub avatar: String,
    pub bio: String,
    pub long_bio: String,
}

impl Default for AuthorConfig {
    fn default() -> Self {
        Self {
            name: "John Doe".to_string(),
            email: String::new(),
            avatar: "/images/avatar.jpeg".to_string(),
            bio: String::new(),
            long_bio: String::new(),
        }
    }
}

/// Social profile links; unset entries are skipped when listed
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialConfig {
    pub twitter: Option<String>,
    pub github: Option<String>,
    pub linkedin: Option<String>,
    pub email: Option<String>,
}

impl SocialConfig {
    /// `(platform, url)` pairs for every configured link
    pub fn links(&self) -> Vec<(&'static str, &str)> {
        [
            ("Twitter", self.twitter.as_deref()),
            ("GitHub", self.github.as_deref()),
            ("LinkedIn", self.linkedin.as_deref()),
            ("Email", self.email.as_deref()),
        ]
        .into_iter()
        .filter_map(|(name, url)| url.map(|u| (name, u)))
        .collect()
    }
}

/// Blog content configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BlogConfig {
    /// Directory of markdown posts, relative to the site root
    pub content_dir: String,
    /// Persisted metadata index, relative to the site root
    pub index_path: String,
    /// Allowed categories, in display order
    pub categories: Vec<String>,
    /// Categories given to posts without a valid one
    pub default_categories: Vec<String>,
    pub default_title: String,
    pub default_read_time: String,
    /// Files above this size are treated as unreadable
    pub max_file_bytes: u64,
}

impl Default for BlogConfig {
    fn default() -> Self {
        Self {
            content_dir: "content/blog".to_string(),
            index_path: "content/blog-index.json".to_string(),
            categories: vec!["General Thoughts".to_string()],
            default_categories: vec!["General Thoughts".to_string()],
            default_title: "Untitled".to_string(),
            default_read_time: "5 min read".to_string(),
            max_file_bytes: 4 * 1024 * 1024,
        }
    }
}

/// RSS feed configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub path: String,
    pub limit: usize,
    pub ttl: u32,
    pub language: String,
    /// Channel image, relative to the site URL
    pub image: Option<String>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            path: "feed.xml".to_string(),
            limit: 20,
            ttl: 60,
            language: "en-us".to_string(),
            image: Some("/logo.png".to_string()),
        }
    }
}

/// Sitemap configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SitemapConfig {
    pub path: String,
    /// Non-post pages listed ahead of the posts
    pub pages: Vec<SitemapPage>,
}

impl Default for SitemapConfig {
    fn default() -> Self {
        Self {
            path: "sitemap.xml".to_string(),
            pages: vec![
                SitemapPage {
                    path: "/".to_string(),
                    changefreq: "daily".to_string(),
                    priority: 1.0,
                },
                SitemapPage {
                    path: "/about".to_string(),
                    changefreq: "monthly".to_string(),
                    priority: 0.7,
                },
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SitemapPage {
    pub path: String,
    pub changefreq: String,
    pub priority: f32,
}

/// robots.txt rules
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RobotsConfig {
    pub rules: Vec<RobotsRule>,
}

impl Default for RobotsConfig {
    fn default() -> Self {
        Self {
            rules: vec![RobotsRule {
                user_agent: "*".to_string(),
                allow: vec!["/".to_string()],
                disallow: vec!["/api/*".to_string()],
            }],
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RobotsRule {
    pub user_agent: String,
    pub allow: Vec<String>,
    pub disallow: Vec<String>,
}

/// About page content surfaced in generated text files
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AboutConfig {
    pub subtitle: String,
    pub topics: Vec<Topic>,
    pub talks: Vec<Talk>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Topic {
    pub title: String,
    pub description: String,
}

/// A speaking engagement. Links are optional per talk.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Talk {
    pub title: String,
    pub event: String,
    pub date: String,
    pub video: Option<String>,
    pub slides: Option<String>,
    pub event_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavItem {
    pub name: String,
    pub href: String,
}

impl NavItem {
    fn new(name: &str, href: &str) -> Self {
        Self {
            name: name.to_string(),
            href: href.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TechnicalConfig {
    pub timezone: String,
    pub language: String,
}

impl Default for TechnicalConfig {
    fn default() -> Self {
        Self {
            timezone: "UTC".to_string(),
            language: "en".to_string(),
        }
    }
}

/// Code block highlighting
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub enable: bool,
    pub theme: String,
    pub line_number: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            enable: true,
            theme: "base16-ocean.dark".to_string(),
            line_number: false,
        }
    }
}

/// Preview server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Upper bound for resolving a single request, in milliseconds
    pub read_timeout_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            read_timeout_ms: 5_000,
        }
    }
}
