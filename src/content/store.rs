//! Post resolver - answers listing and lookup queries from the persisted index
//!
//! Every query reads the index afresh; nothing is cached between calls. The
//! public query methods never return errors: failures are logged and turn
//! into empty results or `None`, so one bad post cannot take down a page
//! build.

use chrono_tz::Tz;
use indexmap::IndexMap;
use std::fs;
use std::path::PathBuf;

use super::error::{ContentError, ContentResult};
use super::identity::is_file_name;
use super::index::{read_bounded, sort_by_date_desc};
use super::{Author, BlogPost, BlogPostMeta, FrontMatter, MarkdownRenderer, Taxonomy};
use crate::Folio;

/// Read-side view over the index and the content directory
pub struct PostStore {
    index_path: PathBuf,
    content_dir: PathBuf,
    taxonomy: Taxonomy,
    tz: Tz,
    max_file_bytes: u64,
    renderer: MarkdownRenderer,
    site_author: Author,
}

impl PostStore {
    pub fn new(folio: &Folio) -> Self {
        Self {
            index_path: folio.index_path.clone(),
            content_dir: folio.content_dir.clone(),
            taxonomy: Taxonomy::from_config(&folio.config.blog),
            tz: folio.config.timezone(),
            max_file_bytes: folio.config.blog.max_file_bytes,
            renderer: MarkdownRenderer::with_options(&folio.config.highlight),
            site_author: Author {
                name: folio.config.author.name.clone(),
                avatar: folio.config.author.avatar.clone(),
            },
        }
    }

    /// Read the whole index, newest first.
    ///
    /// Entries are decoded one by one; an entry that does not fit is logged
    /// and skipped so the rest of the index stays usable.
    pub fn load_index(&self) -> ContentResult<Vec<BlogPostMeta>> {
        let json = read_bounded(&self.index_path, self.max_file_bytes)?;
        let entries: Vec<serde_json::Value> =
            serde_json::from_str(&json).map_err(|source| ContentError::Index {
                path: self.index_path.clone(),
                source,
            })?;

        let mut posts: Vec<BlogPostMeta> = entries
            .into_iter()
            .enumerate()
            .filter_map(|(i, entry)| match serde_json::from_value::<BlogPostMeta>(entry) {
                Ok(meta) => Some(self.fill_author(meta)),
                Err(e) => {
                    tracing::warn!(
                        "Skipping malformed entry #{} in {}: {}",
                        i,
                        self.index_path.display(),
                        e
                    );
                    None
                }
            })
            .collect();
        sort_by_date_desc(&mut posts, self.tz);
        Ok(posts)
    }

    fn fill_author(&self, mut meta: BlogPostMeta) -> BlogPostMeta {
        if meta.author.name.trim().is_empty() {
            meta.author.name = self.site_author.name.clone();
        }
        if meta.author.avatar.trim().is_empty() {
            meta.author.avatar = self.site_author.avatar.clone();
        }
        meta
    }

    /// All post metadata, newest first. Empty when the index is unusable.
    pub fn all_posts(&self) -> Vec<BlogPostMeta> {
        match self.load_index() {
            Ok(posts) => posts,
            Err(e) => {
                tracing::error!("Error reading blog index: {}", e);
                Vec::new()
            }
        }
    }

    /// Resolve a post by slug, or by legacy id when no slug matches
    pub fn get_post(&self, key: &str) -> Option<BlogPost> {
        match self.resolve(key) {
            Ok(post) => post,
            Err(e) => {
                tracing::error!("Error reading blog post {:?}: {}", key, e);
                None
            }
        }
    }

    fn resolve(&self, key: &str) -> ContentResult<Option<BlogPost>> {
        let posts = self.load_index()?;
        let Some(meta) = find_post(posts, key) else {
            tracing::debug!("No post matches {:?}", key);
            return Ok(None);
        };

        // Always the matched slug, never the raw key, so id lookups hit the right file
        let Some(path) = self.markdown_path(&meta.slug) else {
            tracing::warn!("Index entry {:?} has an unusable slug", meta.slug);
            return Ok(None);
        };
        if !path.is_file() {
            tracing::error!("Markdown file not found: {}", path.display());
            return Ok(None);
        }

        let source = read_bounded(&path, self.max_file_bytes)?;
        let content = self.renderer.render(FrontMatter::strip(&source));

        Ok(Some(BlogPost { meta, content }))
    }

    /// Posts whose categories contain `category`, newest first
    pub fn posts_by_category(&self, category: &str) -> Vec<BlogPostMeta> {
        self.all_posts()
            .into_iter()
            .filter(|p| p.in_category(category))
            .collect()
    }

    /// Every category used by at least one post, sorted alphabetically
    pub fn categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = self
            .all_posts()
            .into_iter()
            .flat_map(|p| p.categories)
            .filter(|c| !c.is_empty())
            .collect();
        categories.sort();
        categories.dedup();
        categories
    }

    /// Taxonomy categories that have posts, in taxonomy order, with counts
    pub fn category_counts(&self) -> IndexMap<String, usize> {
        let posts = self.all_posts();
        self.taxonomy
            .allowed()
            .iter()
            .filter_map(|category| {
                let count = posts.iter().filter(|p| p.in_category(category)).count();
                (count > 0).then(|| (category.clone(), count))
            })
            .collect()
    }

    /// Case-insensitive search over title, excerpt and categories
    pub fn search(&self, term: &str) -> Vec<BlogPostMeta> {
        let needle = term.trim().to_lowercase();
        let posts = self.all_posts();
        if needle.is_empty() {
            return posts;
        }
        posts.into_iter().filter(|p| p.matches(&needle)).collect()
    }

    /// The markdown file for `slug`, verbatim, front-matter included
    pub fn raw_markdown(&self, slug: &str) -> Option<String> {
        let path = self.markdown_path(slug)?;
        match fs::metadata(&path) {
            Ok(meta) if meta.is_file() => {}
            _ => return None,
        }
        match read_bounded(&path, self.max_file_bytes) {
            Ok(source) => Some(source),
            Err(e) => {
                tracing::error!("Error serving markdown file {:?}: {}", slug, e);
                None
            }
        }
    }

    fn markdown_path(&self, slug: &str) -> Option<PathBuf> {
        is_file_name(slug).then(|| self.content_dir.join(format!("{}.md", slug)))
    }
}

/// First slug match, else first id match
fn find_post(posts: Vec<BlogPostMeta>, key: &str) -> Option<BlogPostMeta> {
    let pos = posts
        .iter()
        .position(|p| p.slug == key)
        .or_else(|| posts.iter().position(|p| p.id == key))?;
    posts.into_iter().nth(pos)
}
