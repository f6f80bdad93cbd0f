//! CLI commands.

pub mod check;
pub mod generate;
pub mod init;
pub mod scan;

use crate::SourceOptions;
use anyhow::{Context, Result};
use docgen_core::{Collection, Collector, Config, SchemaRegistry};
use std::path::Path;
use tracing::debug;

/// Loads docgen.toml (or the `--config` file) and applies flag overrides.
pub fn resolve_config(options: &SourceOptions) -> Result<Config> {
    let mut config = match &options.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => Config::load(Path::new(".")).context("Failed to load docgen.toml")?,
    };

    if let Some(doc_name) = &options.doc_name {
        config.output.doc_name = doc_name.clone();
    }
    if let Some(dir) = &options.output_dir {
        config.output.directory = dir.clone();
    }
    if !options.paths.is_empty() {
        config.scan.paths = options.paths.clone();
    }

    config.validate()?;
    debug!(?config, "resolved configuration");
    Ok(config)
}

/// Builds the registry and collects markers from the configured paths.
pub fn collect(config: &Config) -> Result<Collection> {
    let registry = SchemaRegistry::with_defaults().context("Failed to register schemas")?;
    let collector = Collector::new(&registry, &config.scan.extensions)?;
    let collection = collector
        .collect(&config.scan.paths)
        .context("Failed to collect scenario markers")?;
    Ok(collection)
}
