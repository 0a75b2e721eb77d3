//! Index builder - turns the content directory into the persisted post index

use chrono_tz::Tz;
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::error::{ContentError, ContentResult};
use super::identity::{id_from_slug, is_url_safe, slug_from_path};
use super::{Author, BlogPostMeta, FrontMatter, Taxonomy};
use crate::helpers::parse_date;
use crate::Folio;

/// Outcome of an index build
#[derive(Debug, Clone)]
pub struct IndexSummary {
    pub posts: usize,
    pub index_path: PathBuf,
}

/// Builds `BlogPostMeta` entries from markdown files
pub struct IndexBuilder<'a> {
    folio: &'a Folio,
    taxonomy: Taxonomy,
    tz: Tz,
}

impl<'a> IndexBuilder<'a> {
    pub fn new(folio: &'a Folio) -> Self {
        Self {
            folio,
            taxonomy: Taxonomy::from_config(&folio.config.blog),
            tz: folio.config.timezone(),
        }
    }

    /// Scan the content directory and write the index, replacing it whole
    pub fn build(&self) -> ContentResult<IndexSummary> {
        let posts = self.scan()?;
        write_index(&self.folio.index_path, &posts)?;

        tracing::info!(
            "Wrote {} posts to {}",
            posts.len(),
            self.folio.index_path.display()
        );
        Ok(IndexSummary {
            posts: posts.len(),
            index_path: self.folio.index_path.clone(),
        })
    }

    /// Read every `*.md` file in the content directory, newest first
    pub fn scan(&self) -> ContentResult<Vec<BlogPostMeta>> {
        let dir = &self.folio.content_dir;
        if !dir.is_dir() {
            return Err(ContentError::MissingContentDir(dir.clone()));
        }

        tracing::debug!("Scanning {}", dir.display());

        let mut posts = Vec::new();
        let mut ids: HashMap<String, String> = HashMap::new();

        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| dir.clone());
                    if !is_markdown_file(&path) {
                        tracing::warn!("Skipping {}: {}", path.display(), e);
                        continue;
                    }
                    return Err(ContentError::read(path, e.into()));
                }
            };
            let path = entry.path();
            if !path.is_file() || !is_markdown_file(path) {
                continue;
            }

            let post = self.load_entry(path)?;

            if let Some(other) = ids.insert(post.id.clone(), post.slug.clone()) {
                tracing::warn!(
                    "Posts {:?} and {:?} share id {}; only slug lookups can tell them apart",
                    other,
                    post.slug,
                    post.id
                );
            }
            tracing::debug!("Processed: {} ({})", post.title, post.slug);
            posts.push(post);
        }

        if posts.is_empty() {
            tracing::info!("No markdown files found in {}", dir.display());
        }

        sort_by_date_desc(&mut posts, self.tz);
        Ok(posts)
    }

    fn load_entry(&self, path: &Path) -> ContentResult<BlogPostMeta> {
        let source = read_bounded(path, self.folio.config.blog.max_file_bytes)?;
        let slug = slug_from_path(path).ok_or_else(|| {
            ContentError::read(
                path,
                io::Error::new(io::ErrorKind::InvalidData, "file name is not valid UTF-8"),
            )
        })?;
        if !is_url_safe(&slug) {
            tracing::warn!(
                "{} has a slug that is not URL-safe; links to it will be percent-encoded",
                path.display()
            );
        }
        Ok(self.entry_from_source(slug, &source))
    }

    /// Build the index entry for one file, filling defaults for missing fields
    pub fn entry_from_source(&self, slug: String, source: &str) -> BlogPostMeta {
        let blog = &self.folio.config.blog;
        let site_author = &self.folio.config.author;
        let (fm, _) = FrontMatter::parse(source);

        let categories = self.taxonomy.normalize(&fm.raw_categories());
        let author = match fm.author {
            Some(a) => Author {
                name: non_empty(a.name).unwrap_or_else(|| site_author.name.clone()),
                avatar: non_empty(a.avatar).unwrap_or_else(|| site_author.avatar.clone()),
            },
            None => Author {
                name: site_author.name.clone(),
                avatar: site_author.avatar.clone(),
            },
        };

        BlogPostMeta {
            id: id_from_slug(&slug),
            slug,
            title: non_empty(fm.title).unwrap_or_else(|| blog.default_title.clone()),
            excerpt: fm.excerpt.unwrap_or_default(),
            date: fm.date.unwrap_or_default(),
            read_time: non_empty(fm.read_time).unwrap_or_else(|| blog.default_read_time.clone()),
            categories,
            tags: fm.tags.unwrap_or_default(),
            author,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Check if a file is a markdown file
fn is_markdown_file(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("md")
}

/// Sort newest first; dates that do not parse sort last. Stable.
pub fn sort_by_date_desc(posts: &mut [BlogPostMeta], tz: Tz) {
    posts.sort_by_cached_key(|p| std::cmp::Reverse(parse_date(&p.date, tz)));
}

/// Write the index through a temporary sibling file and rename it into place
pub fn write_index(path: &Path, posts: &[BlogPostMeta]) -> ContentResult<()> {
    let write_err = |source| ContentError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_err)?;
    }

    let json = serde_json::to_string_pretty(posts).map_err(|e| write_err(e.into()))?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "index.json".to_string());
    let tmp_path = path.with_file_name(format!(".{}.tmp", file_name));

    fs::write(&tmp_path, json).map_err(write_err)?;
    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(write_err(e));
    }
    Ok(())
}

/// Read a UTF-8 file, refusing anything above `limit` bytes
pub(crate) fn read_bounded(path: &Path, limit: u64) -> ContentResult<String> {
    let file = File::open(path).map_err(|e| ContentError::read(path, e))?;
    let size = file
        .metadata()
        .map_err(|e| ContentError::read(path, e))?
        .len();
    if size > limit {
        return Err(ContentError::TooLarge {
            path: path.to_path_buf(),
            size,
            limit,
        });
    }

    let mut content = String::new();
    file.take(limit)
        .read_to_string(&mut content)
        .map_err(|e| ContentError::read(path, e))?;
    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use tempfile::TempDir;

    fn site() -> (TempDir, Folio) {
        let dir = TempDir::new().unwrap();
        let mut config = SiteConfig::default();
        config.author.name = "Site Author".to_string();
        config.author.avatar = "/me.png".to_string();
        config.blog.categories = vec!["AI".to_string(), "General Thoughts".to_string()];
        let folio = Folio::with_config(dir.path(), config);
        fs::create_dir_all(&folio.content_dir).unwrap();
        (dir, folio)
    }

    fn write_post(folio: &Folio, name: &str, content: &str) {
        fs::write(folio.content_dir.join(name), content).unwrap();
    }

    #[test]
    fn test_build_sorts_by_date_desc() {
        let (_dir, folio) = site();
        write_post(&folio, "hello-world.md", "---\ntitle: Hello\ndate: 2024-01-01\n---\nHi");
        write_post(&folio, "second-post.md", "---\ntitle: Second\ndate: 2024-02-01\n---\nHi");
        write_post(&folio, "undated.md", "---\ntitle: Undated\n---\nHi");
        write_post(&folio, "notes.txt", "ignored");

        let summary = IndexBuilder::new(&folio).build().unwrap();
        assert_eq!(summary.posts, 3);

        let json = fs::read_to_string(&folio.index_path).unwrap();
        let posts: Vec<BlogPostMeta> = serde_json::from_str(&json).unwrap();
        let slugs: Vec<_> = posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["second-post", "hello-world", "undated"]);
    }

    #[test]
    fn test_defaults_fill_missing_fields() {
        let (_dir, folio) = site();
        let post = IndexBuilder::new(&folio).entry_from_source("bare".to_string(), "Just text");
        assert_eq!(post.title, "Untitled");
        assert_eq!(post.excerpt, "");
        assert_eq!(post.date, "");
        assert_eq!(post.read_time, "5 min read");
        assert_eq!(post.categories, vec!["General Thoughts"]);
        assert!(post.tags.is_empty());
        assert_eq!(post.author.name, "Site Author");
        assert_eq!(post.author.avatar, "/me.png");
        assert_eq!(post.id, id_from_slug("bare"));
    }

    #[test]
    fn test_author_name_without_avatar() {
        let (_dir, folio) = site();
        let post = IndexBuilder::new(&folio)
            .entry_from_source("guest".to_string(), "---\nauthor:\n  name: Guest\n---\n");
        assert_eq!(post.author.name, "Guest");
        assert_eq!(post.author.avatar, "/me.png");
    }

    #[test]
    fn test_legacy_category_is_normalized() {
        let (_dir, folio) = site();
        let post = IndexBuilder::new(&folio)
            .entry_from_source("p".to_string(), "---\ncategory: ai\ntags: [x]\n---\n");
        assert_eq!(post.categories, vec!["AI"]);
        assert_eq!(post.tags, vec!["x"]);
    }

    #[test]
    fn test_ids_are_stable_across_runs() {
        let (_dir, folio) = site();
        write_post(&folio, "stable.md", "---\ntitle: Stable\n---\n");
        let first = IndexBuilder::new(&folio).scan().unwrap();
        let second = IndexBuilder::new(&folio).scan().unwrap();
        assert_eq!(first[0].id, second[0].id);
    }

    #[test]
    fn test_missing_content_dir_is_fatal() {
        let dir = TempDir::new().unwrap();
        let folio = Folio::with_config(dir.path(), SiteConfig::default());
        let err = IndexBuilder::new(&folio).build().unwrap_err();
        assert!(matches!(err, ContentError::MissingContentDir(_)));
        assert!(!folio.index_path.exists());
    }

    #[test]
    fn test_empty_dir_writes_empty_index() {
        let (_dir, folio) = site();
        fs::write(&folio.index_path, r#"[{"stale": true}]"#).unwrap();
        IndexBuilder::new(&folio).build().unwrap();
        assert_eq!(fs::read_to_string(&folio.index_path).unwrap(), "[]");
    }

    #[test]
    fn test_unreadable_file_fails_the_run() {
        let (_dir, folio) = site();
        fs::write(folio.content_dir.join("binary.md"), [0xff, 0xfe, 0x00]).unwrap();
        let err = IndexBuilder::new(&folio).build().unwrap_err();
        assert!(matches!(err, ContentError::Read { .. }));
    }

    #[test]
    fn test_oversized_file_fails_the_run() {
        let (_dir, mut folio) = site();
        folio.config.blog.max_file_bytes = 8;
        write_post(&folio, "big.md", "---\ntitle: Too big\n---\n");
        let err = IndexBuilder::new(&folio).scan().unwrap_err();
        assert!(matches!(err, ContentError::TooLarge { .. }));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_non_utf8_file_name_fails_the_run() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let (_dir, folio) = site();
        let name = OsStr::from_bytes(b"caf\xe9.md");
        fs::write(folio.content_dir.join(name), "---\ntitle: Cafe\n---\n").unwrap();
        let err = IndexBuilder::new(&folio).scan().unwrap_err();
        assert!(matches!(err, ContentError::Read { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_symlinks() {
        let (_dir, folio) = site();
        write_post(&folio, "ok.md", "---\ntitle: Ok\n---\n");
        std::os::unix::fs::symlink(
            folio.content_dir.join("missing-target"),
            folio.content_dir.join("stale-link.txt"),
        )
        .unwrap();

        let posts = IndexBuilder::new(&folio).scan().unwrap();
        assert_eq!(posts.len(), 1);

        std::os::unix::fs::symlink(
            folio.content_dir.join("missing-post"),
            folio.content_dir.join("gone.md"),
        )
        .unwrap();
        assert!(IndexBuilder::new(&folio).scan().is_err());
    }

    #[test]
    fn test_write_index_leaves_no_temp_file() {
        let (_dir, folio) = site();
        write_index(&folio.index_path, &[]).unwrap();
        let leftovers: Vec<_> = fs::read_dir(folio.index_path.parent().unwrap())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }
}
