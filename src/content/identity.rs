//! Slug and id derivation for content files

use lazy_static::lazy_static;
use regex::Regex;
use std::path::Path;

lazy_static! {
    static ref URL_SAFE: Regex = Regex::new(r"^[A-Za-z0-9._~-]+$").unwrap();
}

/// Ids fall in `1..=ID_SPACE`
pub const ID_SPACE: i64 = 1000;

/// Slug of a content file: its file name without extension
pub fn slug_from_path(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s.to_string())
}

/// Whether a slug can be used as a URL path segment and file name as-is
pub fn is_url_safe(slug: &str) -> bool {
    URL_SAFE.is_match(slug) && slug != "." && slug != ".."
}

/// Whether a slug names a single file inside the content directory
pub fn is_file_name(slug: &str) -> bool {
    !slug.is_empty()
        && slug != "."
        && slug != ".."
        && !slug.contains(['/', '\\', '\0'])
}

/// Legacy numeric id for a slug.
///
/// 32-bit wrapping `h * 31 + unit` over UTF-16 code units, then
/// `|h| % 1000 + 1`. Distinct slugs can share an id; the slug stays the
/// authoritative key.
pub fn id_from_slug(slug: &str) -> String {
    let hash = slug
        .encode_utf16()
        .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(i32::from(unit)));
    let id = i64::from(hash).abs() % ID_SPACE + 1;
    id.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_from_path() {
        assert_eq!(
            slug_from_path(Path::new("content/blog/hello-world.md")).as_deref(),
            Some("hello-world")
        );
    }

    #[test]
    fn test_id_is_deterministic() {
        assert_eq!(id_from_slug("hello-world"), id_from_slug("hello-world"));
    }

    #[test]
    fn test_id_known_values() {
        // "a" = 97
        assert_eq!(id_from_slug("a"), "98");
        // "ab" = 97 * 31 + 98 = 3105
        assert_eq!(id_from_slug("ab"), "106");
        assert_eq!(id_from_slug(""), "1");
    }

    #[test]
    fn test_id_stays_in_range() {
        for slug in ["hello-world", "second-post", "a-very-long-slug-that-overflows-32-bits", "ünïcode"] {
            let id: i64 = id_from_slug(slug).parse().unwrap();
            assert!((1..=ID_SPACE).contains(&id), "{} -> {}", slug, id);
        }
    }

    #[test]
    fn test_url_safe() {
        assert!(is_url_safe("hello-world"));
        assert!(is_url_safe("v1.2_notes~draft"));
        assert!(!is_url_safe("hello world"));
        assert!(!is_url_safe("../etc/passwd"));
        assert!(!is_url_safe(".."));
        assert!(!is_url_safe(""));
    }

    #[test]
    fn test_file_name() {
        assert!(is_file_name("hello world"));
        assert!(!is_file_name("../secret"));
        assert!(!is_file_name("a\\b"));
        assert!(!is_file_name(".."));
    }
}
