//! Generate the index and every derived file

use anyhow::Result;

use crate::generator::Generator;
use crate::Folio;

/// Build the index, then the feed, sitemap, robots.txt and llms.txt
pub fn run(folio: &Folio) -> Result<()> {
    let start = std::time::Instant::now();

    super::index::run(folio)?;

    let posts = folio.store().all_posts();
    Generator::new(folio).generate(&posts)?;

    tracing::info!("Generated in {:.2}s", start.elapsed().as_secs_f64());
    Ok(())
}
