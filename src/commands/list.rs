//! List site content

use anyhow::{bail, Result};
use indexmap::IndexMap;

use crate::content::PostStore;
use crate::Folio;

/// Print posts, categories or tags
pub fn run(folio: &Folio, content_type: &str) -> Result<()> {
    for line in listing(&folio.store(), content_type)? {
        println!("{}", line);
    }
    Ok(())
}

fn listing(store: &PostStore, content_type: &str) -> Result<Vec<String>> {
    let mut lines = Vec::new();

    match content_type {
        "post" | "posts" => {
            let posts = store.load_index()?;
            lines.push(format!("Posts ({}):", posts.len()));
            lines.extend(
                posts
                    .iter()
                    .map(|p| format!("  {:<10} {:>4}  {} [{}]", p.date, p.id, p.title, p.slug)),
            );
        }
        "category" | "categories" => {
            lines.extend(counted("Categories", store.category_counts()));
        }
        "tag" | "tags" => {
            let mut tags: IndexMap<String, usize> = IndexMap::new();
            for tag in store.load_index()?.into_iter().flat_map(|p| p.tags) {
                *tags.entry(tag).or_default() += 1;
            }
            // Most used first; ties keep first-seen order
            tags.sort_by(|_, a, _, b| b.cmp(a));
            lines.extend(counted("Tags", tags));
        }
        _ => bail!(
            "Unknown type: {}. Available: post, category, tag",
            content_type
        ),
    }

    Ok(lines)
}

fn counted(heading: &str, counts: IndexMap<String, usize>) -> Vec<String> {
    std::iter::once(format!("{} ({}):", heading, counts.len()))
        .chain(
            counts
                .into_iter()
                .map(|(name, n)| format!("  {} ({})", name, n)),
        )
        .collect()
}
