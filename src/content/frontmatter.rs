//! Front-matter parsing
//!
//! Fields are read leniently: a value of the wrong shape is dropped and the
//! builder's default takes its place, so one bad key never costs the rest of
//! the block.

use serde::{Deserialize, Deserializer};
use serde_yaml::Value;

/// Custom deserializer that handles both a single string and a list of strings
pub(crate) fn string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, SeqAccess, Visitor};
    use std::fmt;

    struct StringOrVec;

    impl<'de> Visitor<'de> for StringOrVec {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or a list of strings")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value.to_string()])
        }

        fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value])
        }

        fn visit_seq<S>(self, mut seq: S) -> Result<Self::Value, S::Error>
        where
            S: SeqAccess<'de>,
        {
            let mut vec = Vec::new();
            while let Some(item) = seq.next_element::<String>()? {
                vec.push(item);
            }
            Ok(vec)
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }
    }

    deserializer.deserialize_any(StringOrVec)
}

/// Render a YAML scalar as text; mappings and sequences yield `None`
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Tagged(tagged) => scalar_text(&tagged.value),
        _ => None,
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(scalar_text(&value))
}

fn lenient_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Sequence(items) => Some(items.iter().filter_map(scalar_text).collect()),
        Value::Null => None,
        other => scalar_text(&other).map(|s| vec![s]),
    })
}

fn lenient_author<'de, D>(deserializer: D) -> Result<Option<AuthorField>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Mapping(map) => Some(AuthorField {
            name: map.get("name").and_then(scalar_text),
            avatar: map.get("avatar").and_then(scalar_text),
        }),
        other => scalar_text(&other).map(|name| AuthorField {
            name: Some(name),
            avatar: None,
        }),
    })
}

/// Author as written in front-matter; either part may be missing
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthorField {
    pub name: Option<String>,
    pub avatar: Option<String>,
}

/// Front-matter data from a post
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    #[serde(deserialize_with = "lenient_text")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub excerpt: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub date: Option<String>,
    #[serde(rename = "readTime", alias = "read_time", deserialize_with = "lenient_text")]
    pub read_time: Option<String>,
    /// Single-category spelling used by older posts
    #[serde(deserialize_with = "lenient_list")]
    pub category: Option<Vec<String>>,
    #[serde(deserialize_with = "lenient_list")]
    pub categories: Option<Vec<String>>,
    #[serde(deserialize_with = "lenient_list")]
    pub tags: Option<Vec<String>>,
    #[serde(deserialize_with = "lenient_author")]
    pub author: Option<AuthorField>,
}

impl FrontMatter {
    /// Parse front-matter from content string
    /// Returns (front_matter, remaining_content)
    pub fn parse(content: &str) -> (Self, &str) {
        let content = content.trim_start_matches('\u{feff}').trim_start();

        if !content.starts_with("---") {
            return (FrontMatter::default(), content);
        }

        let rest = content[3..].trim_start_matches([' ', '\t']);
        let Some(rest) = rest
            .strip_prefix("\r\n")
            .or_else(|| rest.strip_prefix('\n'))
        else {
            // "----" or "--- text" opens no block
            return (FrontMatter::default(), content);
        };

        let Some((yaml_content, remaining)) = split_closing_fence(rest) else {
            // No closing ---, treat as no front-matter
            return (FrontMatter::default(), content);
        };
        let remaining = remaining.trim_start_matches(['\n', '\r']);

        if yaml_content.trim().is_empty() {
            return (FrontMatter::default(), remaining);
        }

        if !has_yaml_structure(yaml_content) {
            // A thematic break followed by prose, not front-matter
            return (FrontMatter::default(), content);
        }

        match serde_yaml::from_str::<FrontMatter>(yaml_content) {
            Ok(fm) => (fm, remaining),
            Err(e) => {
                tracing::warn!("Failed to parse YAML front-matter, using defaults: {}", e);
                (FrontMatter::default(), remaining)
            }
        }
    }

    /// Body only, front-matter removed
    pub fn strip(content: &str) -> &str {
        Self::parse(content).1
    }

    /// Raw category values, `categories` first, then `category`
    pub fn raw_categories(&self) -> Vec<String> {
        self.categories
            .iter()
            .chain(self.category.iter())
            .flatten()
            .cloned()
            .collect()
    }
}

/// Split at the first line consisting of `---`
fn split_closing_fence(rest: &str) -> Option<(&str, &str)> {
    if let Some(after) = rest.strip_prefix("---") {
        if after.is_empty() || after.starts_with('\n') || after.starts_with("\r\n") {
            return Some(("", after));
        }
    }

    for (pos, _) in rest.match_indices("\n---") {
        let after = &rest[pos + 4..];
        let line_end = after.find('\n').unwrap_or(after.len());
        if after[..line_end].trim().is_empty() {
            return Some((&rest[..pos], after));
        }
    }
    None
}

/// Valid YAML front-matter has at least one `key: value` line
fn has_yaml_structure(yaml_content: &str) -> bool {
    yaml_content.lines().any(|line| {
        let trimmed = line.trim();
        // Skip empty lines and comments
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return false;
        }
        let Some(colon_pos) = trimmed.find(':') else {
            return false;
        };
        let key = &trimmed[..colon_pos];
        let is_valid_key = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
            && !matches!(key, "http" | "https" | "ftp");
        let after_colon = &trimmed[colon_pos + 1..];
        is_valid_key && (after_colon.is_empty() || after_colon.starts_with(' '))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_yaml_frontmatter() {
        let content = r#"---
title: Hello World
date: 2024-01-15
readTime: 7 min read
tags:
  - rust
  - blog
categories:
  - AI
author:
  name: Jane
  avatar: /jane.png
---

This is the content.
"#;

        let (fm, remaining) = FrontMatter::parse(content);
        assert_eq!(fm.title.as_deref(), Some("Hello World"));
        assert_eq!(fm.date.as_deref(), Some("2024-01-15"));
        assert_eq!(fm.read_time.as_deref(), Some("7 min read"));
        assert_eq!(fm.tags, Some(vec!["rust".to_string(), "blog".to_string()]));
        assert_eq!(fm.raw_categories(), vec!["AI"]);
        assert_eq!(
            fm.author,
            Some(AuthorField {
                name: Some("Jane".to_string()),
                avatar: Some("/jane.png".to_string()),
            })
        );
        assert_eq!(remaining, "This is the content.\n");
    }

    #[test]
    fn test_single_string_category() {
        let content = "---\ntitle: One\ncategory: Team Leadership\ntags: Notes\n---\nBody";
        let (fm, remaining) = FrontMatter::parse(content);
        assert_eq!(fm.raw_categories(), vec!["Team Leadership"]);
        assert_eq!(fm.tags, Some(vec!["Notes".to_string()]));
        assert_eq!(remaining, "Body");
    }

    #[test]
    fn test_categories_merge_both_spellings() {
        let content = "---\ncategory: AI\ncategories: [Deep Learning]\n---\n";
        let (fm, _) = FrontMatter::parse(content);
        assert_eq!(fm.raw_categories(), vec!["Deep Learning", "AI"]);
    }

    #[test]
    fn test_malformed_field_is_dropped_alone() {
        let content = "---\ntitle:\n  nested: map\nexcerpt: Still here\ndate: 2024\n---\nBody";
        let (fm, _) = FrontMatter::parse(content);
        assert_eq!(fm.title, None);
        assert_eq!(fm.excerpt.as_deref(), Some("Still here"));
        assert_eq!(fm.date.as_deref(), Some("2024"));
    }

    #[test]
    fn test_invalid_yaml_strips_block() {
        let content = "---\ntitle: [unclosed\n---\nBody text";
        let (fm, remaining) = FrontMatter::parse(content);
        assert_eq!(fm.title, None);
        assert_eq!(remaining, "Body text");
    }

    #[test]
    fn test_author_as_plain_string() {
        let content = "---\nauthor: Sam\n---\n";
        let (fm, _) = FrontMatter::parse(content);
        let author = fm.author.unwrap();
        assert_eq!(author.name.as_deref(), Some("Sam"));
        assert_eq!(author.avatar, None);
    }

    #[test]
    fn test_no_frontmatter() {
        let (fm, remaining) = FrontMatter::parse("# Heading\n\nText");
        assert!(fm.title.is_none());
        assert_eq!(remaining, "# Heading\n\nText");
    }

    #[test]
    fn test_unclosed_block_is_content() {
        let content = "---\ntitle: Never closed\n\nText";
        let (fm, remaining) = FrontMatter::parse(content);
        assert!(fm.title.is_none());
        assert_eq!(remaining, content);
    }

    #[test]
    fn test_markdown_separator_not_yaml() {
        // Content that uses --- as markdown separator, not YAML front-matter
        let content = r#"
---

Some random text with markdown lists:
- Item 1
- Item 2

---
More content here.
"#;

        let (fm, remaining) = FrontMatter::parse(content);
        assert_eq!(fm.title, None);
        assert!(remaining.contains("Some random text"));
    }

    #[test]
    fn test_content_with_url_not_yaml() {
        let content = "---\n\nCheck out https://example.com/path\n\n---\nMore content.\n";
        let (fm, remaining) = FrontMatter::parse(content);
        assert_eq!(fm.title, None);
        assert!(remaining.contains("https://example.com"));
    }

    #[test]
    fn test_crlf_line_endings() {
        let content = "---\r\ntitle: Windows\r\n---\r\nBody\r\n";
        let (fm, remaining) = FrontMatter::parse(content);
        assert_eq!(fm.title.as_deref(), Some("Windows"));
        assert_eq!(remaining, "Body\r\n");
    }

    #[test]
    fn test_strip_returns_body() {
        assert_eq!(FrontMatter::strip("---\ntitle: x\n---\n\nHello"), "Hello");
    }
}
