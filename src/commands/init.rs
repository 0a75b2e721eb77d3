//! Initialize a new site

use anyhow::{bail, Result};
use std::fs;
use std::path::Path;

use crate::config::SiteConfig;
use crate::CONFIG_FILE;

const DEFAULT_CONFIG: &str = r#"# Site
name: My Blog
title: My Blog - Notes and essays
description: ''
tagline: ''
url: http://example.com
public_dir: public

author:
  name: John Doe
  email: ''
  avatar: /images/avatar.jpeg
  bio: ''

social:
  github:
  twitter:

# Blog
blog:
  content_dir: content/blog
  index_path: content/blog-index.json
  categories:
    - General Thoughts
  default_categories:
    - General Thoughts
  default_title: Untitled
  default_read_time: 5 min read

feed:
  path: feed.xml
  limit: 20

technical:
  timezone: UTC
  language: en

highlight:
  enable: true
  theme: base16-ocean.dark
  line_number: false
"#;

/// Initialize a new site in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    let config_path = target_dir.join(CONFIG_FILE);
    if config_path.exists() {
        bail!("{:?} already exists", config_path);
    }

    let config: SiteConfig = serde_yaml::from_str(DEFAULT_CONFIG)?;
    let content_dir = target_dir.join(&config.blog.content_dir);

    fs::create_dir_all(&content_dir)?;
    fs::write(&config_path, DEFAULT_CONFIG)?;

    let today = chrono::Local::now().format("%Y-%m-%d");
    let sample_post = format!(
        r#"---
title: Hello World
excerpt: The first post on this blog.
date: {}
readTime: 1 min read
categories:
  - General Thoughts
---

Welcome! This post lives in `{}/hello-world.md`.

## Next steps

- [ ] Edit `{}`
- [ ] Write a post with `folio new "My Next Post"`
- [ ] Run `folio generate`
"#,
        today, config.blog.content_dir, CONFIG_FILE
    );

    fs::write(content_dir.join("hello-world.md"), sample_post)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Folio;
    use tempfile::TempDir;

    #[test]
    fn test_init_site_is_indexable() {
        let dir = TempDir::new().unwrap();
        init_site(dir.path()).unwrap();

        let folio = Folio::new(dir.path()).unwrap();
        let summary = folio.build_index().unwrap();
        assert_eq!(summary.posts, 1);

        let post = folio.store().get_post("hello-world").unwrap();
        assert_eq!(post.meta.title, "Hello World");
        assert_eq!(post.meta.categories, vec!["General Thoughts"]);
    }

    #[test]
    fn test_init_refuses_existing_site() {
        let dir = TempDir::new().unwrap();
        init_site(dir.path()).unwrap();
        assert!(init_site(dir.path()).is_err());
    }
}
