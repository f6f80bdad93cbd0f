//! Error types for docgen_core operations.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for docgen_core operations.
#[derive(Error, Debug)]
pub enum DocgenError {
    /// A schema with the same marker name is already registered.
    #[error("schema already registered: {0}")]
    DuplicateSchema(String),

    /// No schema is registered under the given marker name.
    #[error("unknown schema: {0}")]
    UnknownSchema(String),

    /// A marker could not be decoded into its registered shape.
    #[error("malformed marker at {location}: {reason}")]
    Decode {
        /// Where the marker was found (`file:line`, or a caller-supplied label)
        location: String,
        /// Description of what's wrong
        reason: String,
    },

    /// The document sink rejected a persist call.
    #[error("failed to write document {}: {source}", path.display())]
    Write {
        /// Target the document was being written to
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// Another process holds the lock on the output document.
    #[error("document locked by another process: {}", .0.display())]
    SinkLocked(PathBuf),

    /// A configured source path does not exist.
    #[error("source path not found: {}", .0.display())]
    SourcePathNotFound(PathBuf),

    /// Serialization error while producing machine-readable output.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Configuration error (loading, parsing, invalid values).
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DocgenError {
    /// Returns a user-friendly recovery suggestion for the error, if available.
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            Self::Decode { .. } => {
                Some("Check the marker syntax: key=value pairs, lists as {a,b} or a;b.")
            }
            Self::SinkLocked(_) => {
                Some("Another docgen run is writing this document; wait for it to finish.")
            }
            Self::SourcePathNotFound(_) => {
                Some("Check the `paths` entry in docgen.toml or the --path flag.")
            }
            Self::ConfigError(_) => Some("Run 'docgen init' to write a fresh docgen.toml."),
            Self::Write { .. } => Some(
                "The last successfully written snapshot is still in place; fix the target and rerun.",
            ),
            _ => None,
        }
    }
}

/// Convenience Result type for docgen_core operations.
pub type Result<T> = std::result::Result<T, DocgenError>;
