//! Post models

use serde::{Deserialize, Serialize};

use super::frontmatter::string_or_vec;

/// Post author, denormalized into every index entry.
/// Older indexes may omit either field; the store fills them from the site author.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Author {
    pub name: String,
    pub avatar: String,
}

/// Index entry for one markdown file. Carries no body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPostMeta {
    /// Legacy numeric identifier derived from the slug
    pub id: String,

    /// Filename stem; the canonical lookup key
    pub slug: String,

    pub title: String,

    #[serde(default)]
    pub excerpt: String,

    /// Publication date as written in front-matter
    #[serde(default)]
    pub date: String,

    #[serde(default)]
    pub read_time: String,

    /// Older indexes stored a single `category` string
    #[serde(default, alias = "category", deserialize_with = "string_or_vec")]
    pub categories: Vec<String>,

    #[serde(default, deserialize_with = "string_or_vec")]
    pub tags: Vec<String>,

    #[serde(default)]
    pub author: Author,
}

impl BlogPostMeta {
    /// Whether the post belongs to `category` (exact match)
    pub fn in_category(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c == category)
    }

    /// Case-insensitive match over title, excerpt and categories.
    /// `needle` must already be lowercase.
    pub(crate) fn matches(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.excerpt.to_lowercase().contains(needle)
            || self
                .categories
                .iter()
                .any(|c| c.to_lowercase().contains(needle))
    }
}

/// A resolved post: index metadata plus rendered HTML
#[derive(Debug, Clone, Serialize)]
pub struct BlogPost {
    #[serde(flatten)]
    pub meta: BlogPostMeta,

    /// Rendered HTML. Not sanitized.
    pub content: String,
}
