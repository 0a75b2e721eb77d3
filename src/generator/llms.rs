//! llms.txt: a plain-text summary of the site for language-model crawlers

use chrono::NaiveDate;

use crate::config::SiteConfig;
use crate::content::BlogPostMeta;
use crate::helpers::{full_url_for, url_for};

pub fn render_llms(config: &SiteConfig, posts: &[BlogPostMeta], today: NaiveDate) -> String {
    let mut out = String::new();
    let author = &config.author;

    out.push_str("# llms.txt\n\n");
    out.push_str(&format!(
        "This is an llms.txt file for {} - {}'s personal blog.\n",
        config.name, author.name
    ));
    out.push_str(&format!("Generated automatically on {}.\n\n", today));

    out.push_str("## Site Information\n\n");
    out.push_str(&format!("**Site Name**: {}\n", config.name));
    out.push_str(&format!("**URL**: {}\n", full_url_for(config, "/")));
    if !config.tagline.is_empty() {
        out.push_str(&format!("**Tagline**: {}\n", config.tagline));
    }
    out.push_str(&format!("**Description**: {}\n\n", config.description));

    out.push_str("## Author Information\n\n");
    out.push_str(&format!("**Name**: {}\n", author.name));
    if !author.email.is_empty() {
        out.push_str(&format!("**Email**: {}\n", author.email));
    }
    if !author.bio.is_empty() {
        out.push_str(&format!("**Bio**: {}\n", author.bio));
    }

    let social = config.social.links();
    if !social.is_empty() {
        out.push_str("\n**Social Links**:\n");
        for (platform, url) in social {
            out.push_str(&format!("- {}: {}\n", platform, url));
        }
    }

    out.push_str("\n**Speaking Engagements**:\n");
    if config.about.talks.is_empty() {
        out.push_str("No speaking engagements listed\n");
    }
    for talk in &config.about.talks {
        out.push_str(&format!("- {} at {} ({})", talk.title, talk.event, talk.date));
        let links: Vec<String> = [
            ("video", &talk.video),
            ("slides", &talk.slides),
            ("event", &talk.event_url),
        ]
        .into_iter()
        .filter_map(|(label, url)| url.as_ref().map(|u| format!("{}: {}", label, u)))
        .collect();
        if !links.is_empty() {
            out.push_str(&format!(" [{}]", links.join(", ")));
        }
        out.push('\n');
    }

    out.push_str("\n## Content\n\n");
    if !author.long_bio.is_empty() {
        out.push_str(&format!("**Target Audience**: {}\n\n", author.long_bio));
    }
    out.push_str(&format!("- Total blog posts: {}\n", posts.len()));
    let mut used: Vec<&str> = Vec::new();
    for category in posts.iter().flat_map(|p| p.categories.iter()) {
        if !used.contains(&category.as_str()) {
            used.push(category);
        }
    }
    let used = if used.is_empty() {
        "General".to_string()
    } else {
        used.join(", ")
    };
    out.push_str(&format!("- Categories: {}\n", used));
    if let Some(latest) = posts.first() {
        out.push_str(&format!("- Latest post: \"{}\"\n", latest.title));
    }

    if !config.blog.categories.is_empty() {
        out.push_str("\n**Blog Categories Available**:\n");
        for category in &config.blog.categories {
            out.push_str(&format!("- {}\n", category));
        }
    }

    if !config.about.subtitle.is_empty() {
        out.push_str(&format!("\n**Content Focus**: {}\n", config.about.subtitle));
    }

    if !config.about.topics.is_empty() {
        out.push_str("\n**Topics Covered**:\n");
        for topic in &config.about.topics {
            out.push_str(&format!("- {}: {}\n", topic.title, topic.description));
        }
    }

    out.push_str("\n## Site Structure\n\n");
    for item in &config.navigation {
        out.push_str(&format!("- {} ({})\n", item.name, item.href));
    }
    out.push_str("- Blog Posts (/blog/[slug]): Individual articles\n");
    out.push_str("- Markdown Source (/blog/[slug]/md): Raw markdown for each post\n");
    out.push_str(&format!("- RSS Feed ({}): XML feed\n", url_for(&config.feed.path)));

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Talk;
    use crate::content::Author;

    #[test]
    fn test_llms_summary() {
        let mut config = SiteConfig::default();
        config.name = "Logs".to_string();
        config.author.name = "Jane".to_string();
        config.author.long_bio = "Engineers who build for the web".to_string();
        config.about.subtitle = "Performance and developer experience".to_string();
        config.about.talks.push(Talk {
            title: "Fast UIs".to_string(),
            event: "ConfX".to_string(),
            date: "2024".to_string(),
            video: Some("https://video.example/1".to_string()),
            ..Default::default()
        });
        let posts = vec![BlogPostMeta {
            id: "1".to_string(),
            slug: "latest".to_string(),
            title: "Latest".to_string(),
            excerpt: String::new(),
            date: "2024-01-01".to_string(),
            read_time: String::new(),
            categories: vec!["AI".to_string()],
            tags: Vec::new(),
            author: Author {
                name: "Jane".to_string(),
                avatar: String::new(),
            },
        }];
        let today = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();

        let text = render_llms(&config, &posts, today);
        assert!(text.contains("Generated automatically on 2024-05-01."));
        assert!(text.contains("**Target Audience**: Engineers who build for the web"));
        assert!(text.contains("**Content Focus**: Performance and developer experience"));
        assert!(text.contains("- Fast UIs at ConfX (2024) [video: https://video.example/1]"));
        assert!(text.contains("- Total blog posts: 1"));
        assert!(text.contains("- Categories: AI"));
        assert!(text.contains("- Latest post: \"Latest\""));
        assert!(text.contains("- RSS Feed (/feed.xml)"));
    }
}
