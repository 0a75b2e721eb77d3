//! Generator module - writes the build-time files derived from the post index

mod feed;
mod llms;
mod robots;
mod sitemap;

use anyhow::{Context, Result};
use chrono::Utc;
use std::fs;
use std::path::Path;

pub use feed::render_feed;
pub use llms::render_llms;
pub use robots::render_robots;
pub use sitemap::render_sitemap;

use crate::content::BlogPostMeta;
use crate::Folio;

/// Writes feed.xml, sitemap.xml, robots.txt and llms.txt into the public directory
pub struct Generator {
    folio: Folio,
}

impl Generator {
    /// Create a new generator
    pub fn new(folio: &Folio) -> Self {
        Self {
            folio: folio.clone(),
        }
    }

    /// Generate every file for `posts` (newest first)
    pub fn generate(&self, posts: &[BlogPostMeta]) -> Result<()> {
        let config = &self.folio.config;
        let public_dir = &self.folio.public_dir;
        let now = Utc::now();

        fs::create_dir_all(public_dir)
            .with_context(|| format!("Failed to create {}", public_dir.display()))?;

        write_output(
            &public_dir.join(&config.feed.path),
            &render_feed(config, posts, now),
        )?;
        write_output(
            &public_dir.join(&config.sitemap.path),
            &render_sitemap(config, posts, now),
        )?;
        write_output(&public_dir.join("robots.txt"), &render_robots(config))?;
        write_output(
            &public_dir.join("llms.txt"),
            &render_llms(config, posts, now.date_naive()),
        )?;

        Ok(())
    }
}

fn write_output(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!("Generated {}", path.display());
    Ok(())
}
