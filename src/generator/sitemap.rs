//! Sitemap generation.
//!
//! Configured static pages come first, then one entry per post:
//!
//! ```xml
//! <url>
//!   <loc>https://example.com/blog/hello-world</loc>
//!   <lastmod>2024-01-01T00:00:00Z</lastmod>
//!   <changefreq>weekly</changefreq>
//!   <priority>0.8</priority>
//! </url>
//! ```

use chrono::{DateTime, Utc};

use crate::config::SiteConfig;
use crate::content::BlogPostMeta;
use crate::helpers::{date_xml, escape_xml, full_url_for, parse_date, post_url};

const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

const POST_CHANGEFREQ: &str = "weekly";
const POST_PRIORITY: f32 = 0.8;

struct UrlEntry {
    loc: String,
    lastmod: Option<String>,
    changefreq: String,
    priority: f32,
}

/// Render the sitemap; static pages are stamped with `now`
pub fn render_sitemap(config: &SiteConfig, posts: &[BlogPostMeta], now: DateTime<Utc>) -> String {
    let tz = config.timezone();

    let pages = config.sitemap.pages.iter().map(|page| UrlEntry {
        loc: full_url_for(config, &page.path),
        lastmod: Some(date_xml(&now)),
        changefreq: page.changefreq.clone(),
        priority: page.priority,
    });
    let posts = posts.iter().map(|post| UrlEntry {
        loc: post_url(config, &post.slug),
        lastmod: parse_date(&post.date, tz).map(|d| date_xml(&d)),
        changefreq: POST_CHANGEFREQ.to_string(),
        priority: POST_PRIORITY,
    });

    let mut xml = String::with_capacity(4096);
    xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str("<urlset xmlns=\"");
    xml.push_str(SITEMAP_NS);
    xml.push_str("\">\n");

    for entry in pages.chain(posts) {
        xml.push_str("  <url>\n    <loc>");
        xml.push_str(&escape_xml(&entry.loc));
        xml.push_str("</loc>\n");
        if let Some(lastmod) = entry.lastmod {
            xml.push_str("    <lastmod>");
            xml.push_str(&lastmod);
            xml.push_str("</lastmod>\n");
        }
        xml.push_str(&format!(
            "    <changefreq>{}</changefreq>\n    <priority>{:.1}</priority>\n",
            escape_xml(&entry.changefreq),
            entry.priority
        ));
        xml.push_str("  </url>\n");
    }

    xml.push_str("</urlset>\n");
    xml
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Author;

    fn post(slug: &str, date: &str) -> BlogPostMeta {
        BlogPostMeta {
            id: "1".to_string(),
            slug: slug.to_string(),
            title: slug.to_string(),
            excerpt: String::new(),
            date: date.to_string(),
            read_time: String::new(),
            categories: Vec::new(),
            tags: Vec::new(),
            author: Author {
                name: String::new(),
                avatar: String::new(),
            },
        }
    }

    #[test]
    fn test_sitemap_entries() {
        let mut config = SiteConfig::default();
        config.url = "https://example.com".to_string();
        let now = parse_date("2024-03-01", chrono_tz::Tz::UTC).unwrap();

        let xml = render_sitemap(
            &config,
            &[post("hello-world", "2024-01-01"), post("undated", "soon")],
            now,
        );

        assert!(xml.contains("<loc>https://example.com</loc>"));
        assert!(xml.contains("<loc>https://example.com/about</loc>"));
        assert!(xml.contains("<changefreq>daily</changefreq>\n    <priority>1.0</priority>"));
        assert!(xml.contains(
            "<loc>https://example.com/blog/hello-world</loc>\n    <lastmod>2024-01-01T00:00:00Z</lastmod>"
        ));
        assert!(xml.contains("<loc>https://example.com/blog/undated</loc>\n    <changefreq>weekly"));
        assert_eq!(xml.matches("<url>").count(), 4);
    }
}
