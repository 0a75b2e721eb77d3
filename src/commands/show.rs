//! Print a single post

use anyhow::{bail, Result};

use crate::Folio;

/// Print the rendered HTML for a slug or legacy id, or the markdown source
/// when `raw` is set
pub fn run(folio: &Folio, key: &str, raw: bool) -> Result<()> {
    let store = folio.store();

    if raw {
        // Raw markdown is addressed by slug only; map an id to its slug first
        let slug = match store.get_post(key) {
            Some(post) => post.meta.slug,
            None => key.to_string(),
        };
        match store.raw_markdown(&slug) {
            Some(source) => print!("{}", source),
            None => bail!("Post not found: {}", key),
        }
        return Ok(());
    }

    match store.get_post(key) {
        Some(post) => {
            println!("<!-- {} ({}) {} -->", post.meta.title, post.meta.slug, post.meta.date);
            println!("{}", post.content);
            Ok(())
        }
        None => bail!("Post not found: {}", key),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_show_missing_post_is_error() {
        let dir = TempDir::new().unwrap();
        let folio = Folio::new(dir.path()).unwrap();
        fs::create_dir_all(&folio.content_dir).unwrap();
        fs::write(folio.content_dir.join("a.md"), "---\ntitle: A\n---\nA").unwrap();
        folio.build_index().unwrap();

        assert!(run(&folio, "a", false).is_ok());
        assert!(run(&folio, "a", true).is_ok());
        assert!(run(&folio, "b", false).is_err());
        assert!(run(&folio, "b", true).is_err());
    }
}
