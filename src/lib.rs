//! folio: markdown content pipeline for a personal blog
//!
//! Builds a metadata index from a directory of markdown posts, resolves
//! individual posts to rendered HTML, and derives the feed, sitemap and
//! other build-time files from the index.

pub mod commands;
pub mod config;
pub mod content;
pub mod generator;
pub mod helpers;
pub mod server;

use anyhow::Result;
use std::path::{Path, PathBuf};

/// Name of the site configuration file in the base directory
pub const CONFIG_FILE: &str = "_config.yml";

/// The main application: configuration plus resolved site paths
#[derive(Clone)]
pub struct Folio {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Markdown posts
    pub content_dir: PathBuf,
    /// Persisted post index
    pub index_path: PathBuf,
    /// Public (output) directory
    pub public_dir: PathBuf,
}

impl Folio {
    /// Create a new instance from a directory, reading `_config.yml` if present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref();
        let config_path = base_dir.join(CONFIG_FILE);

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            tracing::debug!("No {} in {:?}, using defaults", CONFIG_FILE, base_dir);
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Create an instance with an explicit configuration
    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::SiteConfig) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let content_dir = base_dir.join(&config.blog.content_dir);
        let index_path = base_dir.join(&config.blog.index_path);
        let public_dir = base_dir.join(&config.public_dir);

        Self {
            config,
            base_dir,
            content_dir,
            index_path,
            public_dir,
        }
    }

    /// Rebuild the post index
    pub fn build_index(&self) -> Result<content::IndexSummary> {
        Ok(content::IndexBuilder::new(self).build()?)
    }

    /// Read-side store over the current index
    pub fn store(&self) -> content::PostStore {
        content::PostStore::new(self)
    }

    /// Build the index, then write the feed, sitemap and other files
    pub fn generate(&self) -> Result<()> {
        commands::generate::run(self)
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }

    /// Create a new post
    pub fn new_post(&self, title: &str, slug: Option<&str>) -> Result<PathBuf> {
        commands::new::create_post(self, title, slug)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_new_without_config_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let folio = Folio::new(dir.path()).unwrap();
        assert_eq!(folio.content_dir, dir.path().join("content/blog"));
        assert_eq!(folio.index_path, dir.path().join("content/blog-index.json"));
        assert_eq!(folio.public_dir, dir.path().join("public"));
    }

    #[test]
    fn test_new_reads_config_paths() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "blog:\n  content_dir: posts\n  index_path: posts.json\npublic_dir: out\n",
        )
        .unwrap();
        let folio = Folio::new(dir.path()).unwrap();
        assert_eq!(folio.content_dir, dir.path().join("posts"));
        assert_eq!(folio.index_path, dir.path().join("posts.json"));
        assert_eq!(folio.public_dir, dir.path().join("out"));
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "blog: [unclosed").unwrap();
        assert!(Folio::new(dir.path()).is_err());
    }
}
