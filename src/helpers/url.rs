//! URL helper functions

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

use crate::config::SiteConfig;

/// Characters escaped inside a single path segment
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Generate a site-relative URL
///
/// # Examples
/// ```ignore
/// url_for("about") // -> "/about"
/// ```
pub fn url_for(path: &str) -> String {
    format!("/{}", path.trim_start_matches('/'))
}

/// Generate a full URL including the domain
///
/// # Examples
/// ```ignore
/// full_url_for(&config, "/about") // -> "https://example.com/about"
/// ```
pub fn full_url_for(config: &SiteConfig, path: &str) -> String {
    let base = config.url.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        base.to_string()
    } else {
        format!("{}/{}", base, path)
    }
}

/// Site-relative URL of a post page
pub fn post_path(slug: &str) -> String {
    format!("/blog/{}", encode_segment(slug))
}

/// Absolute URL of a post page
pub fn post_url(config: &SiteConfig, slug: &str) -> String {
    full_url_for(config, &post_path(slug))
}

/// Percent-encode one URL path segment
pub fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, SEGMENT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> SiteConfig {
        let mut config = SiteConfig::default();
        config.url = "https://example.com/".to_string();
        config
    }

    #[test]
    fn test_url_for() {
        assert_eq!(url_for("about"), "/about");
        assert_eq!(url_for("/feed.xml"), "/feed.xml");
    }

    #[test]
    fn test_full_url_for() {
        let config = test_config();
        assert_eq!(full_url_for(&config, "/about"), "https://example.com/about");
        assert_eq!(full_url_for(&config, "/"), "https://example.com");
    }

    #[test]
    fn test_post_url_encodes_slug() {
        let config = test_config();
        assert_eq!(
            post_url(&config, "hello-world"),
            "https://example.com/blog/hello-world"
        );
        assert_eq!(post_path("a b?"), "/blog/a%20b%3F");
    }
}
