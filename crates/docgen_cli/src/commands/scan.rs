//! Scan command - list collected scenarios.

use crate::SourceOptions;
use anyhow::{Context, Result};

/// Print the collected scopes and any skipped markers.
pub fn run(options: &SourceOptions, format: &str) -> Result<()> {
    let config = super::resolve_config(options)?;
    let collection = super::collect(&config)?;

    match format {
        "json" => {
            let json = collection.to_json().context("Failed to serialize to JSON")?;
            println!("{}", json);
        }
        "text" => {
            if collection.scopes.is_empty() {
                println!("No scenario markers found.");
            }
            print!("{}", collection.to_text());
        }
        _ => {
            anyhow::bail!("Unsupported format: {}. Use 'json' or 'text'.", format);
        }
    }

    Ok(())
}
