//! RSS 2.0 feed

use chrono::{DateTime, Utc};

use crate::config::SiteConfig;
use crate::content::BlogPostMeta;
use crate::helpers::{cdata, escape_xml, full_url_for, parse_date, post_url, rfc822};

/// Render the feed for `posts` (already newest first)
pub fn render_feed(config: &SiteConfig, posts: &[BlogPostMeta], now: DateTime<Utc>) -> String {
    let base_url = full_url_for(config, "/");
    let tz = config.timezone();

    let mut feed = String::with_capacity(4096);
    feed.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\" ?>\n");
    feed.push_str("<rss version=\"2.0\" xmlns:atom=\"http://www.w3.org/2005/Atom\">\n");
    feed.push_str("  <channel>\n");
    feed.push_str(&format!("    <title>{}</title>\n", escape_xml(&config.name)));
    feed.push_str(&format!(
        "    <description>{}</description>\n",
        escape_xml(&config.description)
    ));
    feed.push_str(&format!("    <link>{}</link>\n", escape_xml(&base_url)));
    feed.push_str(&format!(
        "    <atom:link href=\"{}\" rel=\"self\" type=\"application/rss+xml\" />\n",
        escape_xml(&full_url_for(config, &config.feed.path))
    ));
    feed.push_str(&format!(
        "    <language>{}</language>\n",
        escape_xml(&config.feed.language)
    ));
    feed.push_str(&format!("    <lastBuildDate>{}</lastBuildDate>\n", rfc822(&now)));
    if !config.author.email.is_empty() {
        let editor = escape_xml(&format!("{} ({})", config.author.email, config.author.name));
        feed.push_str(&format!("    <managingEditor>{}</managingEditor>\n", editor));
        feed.push_str(&format!("    <webMaster>{}</webMaster>\n", editor));
    }
    feed.push_str(&format!("    <ttl>{}</ttl>\n", config.feed.ttl));
    if let Some(image) = &config.feed.image {
        feed.push_str("    <image>\n");
        feed.push_str(&format!(
            "      <url>{}</url>\n",
            escape_xml(&full_url_for(config, image))
        ));
        feed.push_str(&format!("      <title>{}</title>\n", escape_xml(&config.name)));
        feed.push_str(&format!("      <link>{}</link>\n", escape_xml(&base_url)));
        feed.push_str("    </image>\n");
    }

    for post in posts.iter().take(config.feed.limit) {
        let link = escape_xml(&post_url(config, &post.slug));
        feed.push_str("    <item>\n");
        feed.push_str(&format!("      <title>{}</title>\n", cdata(&post.title)));
        feed.push_str(&format!(
            "      <description>{}</description>\n",
            cdata(&post.excerpt)
        ));
        feed.push_str(&format!("      <link>{}</link>\n", link));
        feed.push_str(&format!("      <guid isPermaLink=\"true\">{}</guid>\n", link));
        if let Some(date) = parse_date(&post.date, tz) {
            feed.push_str(&format!("      <pubDate>{}</pubDate>\n", rfc822(&date)));
        }
        feed.push_str(&format!(
            "      <author>{}</author>\n",
            escape_xml(&post.author.name)
        ));
        for tag in &post.tags {
            feed.push_str(&format!("      <category>{}</category>\n", escape_xml(tag)));
        }
        feed.push_str("    </item>\n");
    }

    feed.push_str("  </channel>\n");
    feed.push_str("</rss>\n");
    feed
}
