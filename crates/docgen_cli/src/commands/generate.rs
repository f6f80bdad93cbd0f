//! Generate command implementation.

use crate::SourceOptions;
use anyhow::{Context, Result};
use console::style;
use docgen_core::{render, FileSink};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Instant;

/// Collect markers and write the document.
pub fn run(options: &SourceOptions) -> Result<()> {
    let start = Instant::now();
    let config = super::resolve_config(options)?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message("Scanning for scenario markers...");
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));

    let collection = super::collect(&config);
    spinner.finish_and_clear();
    let collection = collection?;

    for failure in &collection.skipped {
        println!(
            "{} {}: {}",
            style("skipped").yellow(),
            failure.location,
            failure.reason
        );
    }

    let doc_path = config.doc_path();
    let mut sink = FileSink::create(&doc_path)
        .with_context(|| format!("Failed to open {}", doc_path.display()))?;
    let report = render(&collection.scopes, &mut sink)
        .with_context(|| format!("Failed to write {}", doc_path.display()))?;

    println!(
        "Wrote {} ({} scenarios from {} scopes, {} with failures) in {:.2}s",
        style(doc_path.display()).bold(),
        style(report.records).cyan(),
        report.scopes,
        report.failure_records,
        start.elapsed().as_secs_f64()
    );

    Ok(())
}
