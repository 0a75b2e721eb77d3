//! robots.txt from the configured rules

use crate::config::SiteConfig;
use crate::helpers::full_url_for;

pub fn render_robots(config: &SiteConfig) -> String {
    let mut out = String::new();

    for rule in &config.robots.rules {
        out.push_str(&format!("User-agent: {}\n", rule.user_agent));
        for path in &rule.allow {
            out.push_str(&format!("Allow: {}\n", path));
        }
        for path in &rule.disallow {
            out.push_str(&format!("Disallow: {}\n", path));
        }
        out.push('\n');
    }

    out.push_str(&format!(
        "Sitemap: {}\n",
        full_url_for(config, &config.sitemap.path)
    ));
    out.push_str(&format!("Host: {}\n", full_url_for(config, "/")));
    out
}
