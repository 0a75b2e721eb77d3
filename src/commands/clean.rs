//! Clean generated output

use anyhow::Result;
use std::fs;

use crate::Folio;

/// Remove the public directory. The index is left alone; it is rebuilt
/// from the content directory by `index`.
pub fn run(folio: &Folio) -> Result<()> {
    if folio.public_dir.exists() {
        fs::remove_dir_all(&folio.public_dir)?;
        tracing::info!("Deleted: {:?}", folio.public_dir);
    }

    Ok(())
}
