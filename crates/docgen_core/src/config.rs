//! Configuration for document generation.

use crate::error::{DocgenError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "docgen.toml";

/// Comprehensive configuration for a generation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Where the document is written.
    #[serde(default)]
    pub output: OutputConfig,

    /// Which sources are scanned for markers.
    #[serde(default)]
    pub scan: ScanConfig,
}

impl Config {
    /// Load configuration from `docgen.toml` in `root`, or defaults if absent.
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE_NAME);
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Config::default())
        }
    }

    /// Load configuration from an explicit file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| DocgenError::ConfigError(format!("failed to read config: {}", e)))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| DocgenError::ConfigError(format!("failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to `docgen.toml` in `root`.
    pub fn save(&self, root: &Path) -> Result<PathBuf> {
        let path = root.join(CONFIG_FILE_NAME);
        let content = toml::to_string_pretty(self)
            .map_err(|e| DocgenError::ConfigError(format!("failed to serialize config: {}", e)))?;
        fs::write(&path, content)
            .map_err(|e| DocgenError::ConfigError(format!("failed to write config: {}", e)))?;
        Ok(path)
    }

    /// Checks values that would only fail later in the run.
    pub fn validate(&self) -> Result<()> {
        let name = self.output.doc_name.trim();
        if name.is_empty() {
            return Err(DocgenError::ConfigError(
                "output.doc_name must not be empty".to_string(),
            ));
        }
        if name.contains(&['/', '\\'][..]) {
            return Err(DocgenError::ConfigError(format!(
                "output.doc_name must be a file name, got {:?}",
                name
            )));
        }
        if self.scan.paths.is_empty() {
            return Err(DocgenError::ConfigError(
                "scan.paths must list at least one path".to_string(),
            ));
        }
        Ok(())
    }

    /// Full path of the generated document.
    pub fn doc_path(&self) -> PathBuf {
        self.output.directory.join(&self.output.doc_name)
    }
}

/// Output location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// File name of the generated document (default: `PODStates.md`).
    pub doc_name: String,

    /// Directory the document is written to (default: `docs`).
    pub directory: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            doc_name: "PODStates.md".to_string(),
            directory: PathBuf::from("docs"),
        }
    }
}

/// Source scanning options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Paths to scan; a trailing `/...` scans recursively (default: `./...`).
    pub paths: Vec<String>,

    /// File extensions that may carry markers (default: `go`).
    pub extensions: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            paths: vec!["./...".to_string()],
            extensions: vec!["go".to_string()],
        }
    }
}
