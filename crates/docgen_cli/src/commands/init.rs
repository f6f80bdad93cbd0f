//! Write a default configuration file.

use anyhow::{bail, Context, Result};
use docgen_core::{Config, CONFIG_FILE_NAME};
use std::path::Path;

/// Write docgen.toml with default values in the current directory.
pub fn run(force: bool) -> Result<()> {
    let root = Path::new(".");
    if root.join(CONFIG_FILE_NAME).exists() && !force {
        bail!("{} already exists (use --force to overwrite)", CONFIG_FILE_NAME);
    }

    let config = Config::default();
    let path = config.save(root).context("Failed to write configuration")?;

    println!("Wrote {}", path.display());
    println!();
    println!("  Document:  {}", config.doc_path().display());
    println!("  Scanning:  {}", config.scan.paths.join(", "));
    println!("  Extensions: {}", config.scan.extensions.join(", "));

    Ok(())
}
