//! Create a new post

use anyhow::{bail, Result};
use std::fs;
use std::path::PathBuf;

use crate::content::identity::is_url_safe;
use crate::Folio;

/// Create a new post file with scaffolded front-matter.
/// The slug defaults to the slugified title.
pub fn create_post(folio: &Folio, title: &str, slug: Option<&str>) -> Result<PathBuf> {
    let slug = match slug {
        Some(s) => s.to_string(),
        None => slug::slugify(title),
    };
    if !is_url_safe(&slug) {
        bail!("Slug {:?} is not URL-safe", slug);
    }

    fs::create_dir_all(&folio.content_dir)?;
    let file_path = folio.content_dir.join(format!("{}.md", slug));

    // Check if file already exists
    if file_path.exists() {
        bail!("File already exists: {:?}", file_path);
    }

    let blog = &folio.config.blog;
    let mut content = String::from("---\n");
    content.push_str(&format!("title: {}\n", yaml_string(title)));
    content.push_str("excerpt: ''\n");
    content.push_str(&format!(
        "date: {}\n",
        chrono::Local::now().format("%Y-%m-%d")
    ));
    content.push_str(&format!(
        "readTime: {}\n",
        yaml_string(&blog.default_read_time)
    ));
    content.push_str("categories:\n");
    for category in &blog.default_categories {
        content.push_str(&format!("  - {}\n", yaml_string(category)));
    }
    content.push_str("tags: []\n---\n\n");

    fs::write(&file_path, content)?;
    tracing::info!("Created: {:?}", file_path);

    Ok(file_path)
}

/// Single-quoted YAML scalar
fn yaml_string(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}
