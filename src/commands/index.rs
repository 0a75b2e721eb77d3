//! Build the post index

use anyhow::Result;
use notify::Watcher;
use std::sync::mpsc::{channel, RecvTimeoutError};
use std::time::{Duration, Instant};

use crate::content::IndexSummary;
use crate::Folio;

/// Rebuild the index once
pub fn run(folio: &Folio) -> Result<IndexSummary> {
    let start = Instant::now();
    let summary = folio.build_index()?;
    tracing::info!(
        "Indexed {} posts in {:.2}s",
        summary.posts,
        start.elapsed().as_secs_f64()
    );
    Ok(summary)
}

/// Rebuild now, then again whenever the content directory changes
pub fn watch(folio: &Folio) -> Result<()> {
    run(folio)?;

    let (tx, rx) = channel();

    let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
        if let Ok(event) = res {
            let _ = tx.send(event);
        }
    })?;

    watcher.watch(&folio.content_dir, notify::RecursiveMode::NonRecursive)?;

    tracing::info!(
        "Watching {} for changes. Press Ctrl+C to stop.",
        folio.content_dir.display()
    );

    let debounce = Duration::from_millis(500);
    // Set when a relevant change arrives, cleared once the rebuild runs
    let mut dirty_since: Option<Instant> = None;

    loop {
        match rx.recv_timeout(Duration::from_millis(100)) {
            Ok(event) => {
                let relevant = event.paths.iter().any(|p| {
                    p.extension().and_then(|e| e.to_str()) == Some("md")
                        && *p != folio.index_path
                });
                if relevant {
                    dirty_since.get_or_insert_with(Instant::now);
                }
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }

        if dirty_since.is_some_and(|t| t.elapsed() >= debounce) {
            dirty_since = None;
            tracing::info!("Content changed, rebuilding index...");
            if let Err(e) = run(folio) {
                tracing::error!("Index rebuild failed: {:#}", e);
            }
        }
    }

    Ok(())
}
