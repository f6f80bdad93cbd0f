//! Check that the generated document matches the sources.

use crate::SourceOptions;
use anyhow::{bail, Context, Result};
use console::style;
use docgen_core::{document_status, DocumentStatus};

/// Render in memory and compare with the document on disk.
pub fn run(options: &SourceOptions) -> Result<()> {
    let config = super::resolve_config(options)?;
    let collection = super::collect(&config)?;

    let doc_path = config.doc_path();
    let status = document_status(&doc_path, &collection.scopes)
        .with_context(|| format!("Failed to read {}", doc_path.display()))?;

    match status {
        DocumentStatus::Current => {}
        DocumentStatus::Missing => bail!(
            "{} does not exist. Run 'docgen generate' to create it.",
            doc_path.display()
        ),
        DocumentStatus::Stale => bail!(
            "{} is out of date. Run 'docgen generate' to refresh it.",
            doc_path.display()
        ),
    }

    println!(
        "{} {} is up to date ({} scenarios)",
        style("✓").green(),
        doc_path.display(),
        collection.record_count()
    );
    Ok(())
}
