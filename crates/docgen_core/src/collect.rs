//! Marker collection from source trees.
//!
//! Every directory is one scope. Files are read in name order and markers
//! in line order, so the discovery order is stable across runs. Markers
//! that fail to decode are logged and skipped; they never abort a scope.

use crate::error::{DocgenError, Result};
use crate::schema::{SchemaRegistry, SchemaShape, POD_SCENARIO_SCHEMA};
use crate::types::{ScenarioRecord, ScopeCollection};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Suffix that makes a source path recursive (`./...`).
const RECURSIVE_SUFFIX: &str = "...";

/// Directory names never descended into.
const SKIPPED_DIRS: &[&str] = &["testdata", "vendor", "node_modules", "target"];

/// A marker that was found but could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodeFailure {
    /// `file:line` of the marker.
    pub location: String,
    /// What was wrong with it.
    pub reason: String,
}

/// Result of scanning the configured source paths.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Collection {
    /// Scopes with at least one record, in visit order.
    pub scopes: Vec<ScopeCollection>,
    /// Markers skipped because they failed to decode.
    pub skipped: Vec<DecodeFailure>,
}

impl Collection {
    /// Total records across all scopes.
    pub fn record_count(&self) -> usize {
        self.scopes.iter().map(|s| s.records.len()).sum()
    }

    /// Serializes the collection as pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| DocgenError::Serialization(e.to_string()))
    }

    /// Formats the collection as a plain-text listing.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for scope in &self.scopes {
            out.push_str(&format!("{} ({} scenarios)\n", scope.scope, scope.records.len()));
            for record in &scope.records {
                let failed = if record.failed_states.is_empty() {
                    String::new()
                } else {
                    format!(" [fails: {}]", record.failed_states.join(", "))
                };
                out.push_str(&format!(
                    "  - {}: {}{}\n",
                    record.scenario,
                    record.success_states.join(" -> "),
                    failed
                ));
            }
        }
        if !self.skipped.is_empty() {
            out.push_str(&format!("skipped {} malformed markers\n", self.skipped.len()));
            for failure in &self.skipped {
                out.push_str(&format!("  {}: {}\n", failure.location, failure.reason));
            }
        }
        out
    }
}

/// Scans source files for pod scenario markers.
pub struct Collector<'r> {
    registry: &'r SchemaRegistry,
    shape: &'r SchemaShape,
    extensions: Vec<String>,
}

impl<'r> Collector<'r> {
    /// Creates a collector reading files with the given extensions.
    ///
    /// # Errors
    ///
    /// Returns `UnknownSchema` if the registry lacks the pod scenario schema.
    pub fn new(registry: &'r SchemaRegistry, extensions: &[String]) -> Result<Self> {
        let shape = registry.require(POD_SCENARIO_SCHEMA)?;
        Ok(Self {
            registry,
            shape,
            extensions: extensions
                .iter()
                .map(|e| e.trim_start_matches('.').to_string())
                .collect(),
        })
    }

    /// Collects scopes from each source path, in the order given.
    ///
    /// A path ending in `/...` is walked recursively. A file reached through
    /// more than one path is only scanned once, and records for a directory
    /// already in the collection are added to its existing scope.
    ///
    /// # Errors
    ///
    /// Returns `SourcePathNotFound` for a missing path, or `Io` if a
    /// directory cannot be listed.
    pub fn collect(&self, paths: &[String]) -> Result<Collection> {
        let mut collection = Collection::default();
        let mut visited = BTreeSet::new();
        let mut seen_files = BTreeSet::new();

        for spec in paths {
            let (root, recursive) = split_source_path(spec);
            if !root.exists() {
                return Err(DocgenError::SourcePathNotFound(root));
            }

            if root.is_file() {
                let scope = root
                    .parent()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default();
                self.scan_files(&mut collection, scope, vec![root], &mut seen_files)?;
                continue;
            }

            let mut dirs = vec![root.clone()];
            if recursive {
                walk_dirs(&root, &mut dirs)?;
            }

            for dir in dirs {
                if !visited.insert(fs::canonicalize(&dir)?) {
                    continue;
                }
                let files = self.files_in(&dir)?;
                self.scan_files(&mut collection, dir.display().to_string(), files, &mut seen_files)?;
            }
        }

        info!(
            scopes = collection.scopes.len(),
            records = collection.record_count(),
            skipped = collection.skipped.len(),
            "collected scenario markers"
        );
        Ok(collection)
    }

    /// Matching files directly inside `dir`, in name order.
    fn files_in(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_file() && self.wants(&path) {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    /// Scans `files` into `scope`, skipping any already scanned.
    fn scan_files(
        &self,
        collection: &mut Collection,
        scope: String,
        files: Vec<PathBuf>,
        seen_files: &mut BTreeSet<PathBuf>,
    ) -> Result<()> {
        let mut records = Vec::new();
        for file in files {
            if !seen_files.insert(fs::canonicalize(&file)?) {
                debug!(file = %file.display(), "already scanned");
                continue;
            }
            let (found, failed) = self.scan_file(&file)?;
            records.extend(found);
            collection.skipped.extend(failed);
        }
        push_scope(collection, scope, records);
        Ok(())
    }

    fn scan_file(&self, file: &Path) -> Result<(Vec<ScenarioRecord>, Vec<DecodeFailure>)> {
        let bytes = fs::read(file)?;
        let text = String::from_utf8_lossy(&bytes);
        debug!(file = %file.display(), "scanning");
        Ok(self.scan_source(&text, &file.display().to_string()))
    }

    /// Extracts records from source text. `label` prefixes error locations.
    pub fn scan_source(&self, text: &str, label: &str) -> (Vec<ScenarioRecord>, Vec<DecodeFailure>) {
        let mut records = Vec::new();
        let mut skipped = Vec::new();

        for (index, line) in text.lines().enumerate() {
            let Some(body) = marker_body(line) else {
                continue;
            };
            let Some(marker) = self.registry.match_marker(body) else {
                continue;
            };
            if marker.name != POD_SCENARIO_SCHEMA {
                debug!(marker = marker.name, "ignoring marker for another schema");
                continue;
            }

            let location = format!("{}:{}", label, index + 1);
            match self.shape.decode(marker.name, marker.arguments, &location) {
                Ok(raw) => records.push(ScenarioRecord::from_annotation(&raw)),
                Err(DocgenError::Decode { location, reason }) => {
                    warn!(%location, %reason, "skipping malformed marker");
                    skipped.push(DecodeFailure { location, reason });
                }
                Err(other) => {
                    warn!(%location, error = %other, "skipping malformed marker");
                    skipped.push(DecodeFailure {
                        location,
                        reason: other.to_string(),
                    });
                }
            }
        }

        (records, skipped)
    }

    fn wants(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|want| want == ext))
    }
}

/// Returns the marker body of a `// +name:args` comment line.
fn marker_body(line: &str) -> Option<&str> {
    let comment = line.trim_start().strip_prefix("//")?;
    let body = comment.trim_start().strip_prefix('+')?;
    Some(body.trim_end())
}

/// Splits `dir/...` into (`dir`, recursive).
fn split_source_path(spec: &str) -> (PathBuf, bool) {
    let spec = spec.trim().trim_matches('"');
    match spec.strip_suffix(RECURSIVE_SUFFIX) {
        Some(base) => {
            let base = base.trim_end_matches(&['/', '\\'][..]);
            let root = if base.is_empty() { "." } else { base };
            (PathBuf::from(root), true)
        }
        None => (PathBuf::from(spec), false),
    }
}

/// Appends every subdirectory of `dir` to `out`, depth first in name order.
fn walk_dirs(dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    let mut children = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name.starts_with('.') || name.starts_with('_') || SKIPPED_DIRS.contains(&name.as_ref()) {
            continue;
        }
        children.push(entry.path());
    }
    children.sort();

    for child in children {
        out.push(child.clone());
        walk_dirs(&child, out)?;
    }
    Ok(())
}

fn push_scope(collection: &mut Collection, scope: String, records: Vec<ScenarioRecord>) {
    if records.is_empty() {
        return;
    }
    match collection.scopes.iter_mut().find(|s| s.scope == scope) {
        Some(existing) => existing.records.extend(records),
        None => collection.scopes.push(ScopeCollection::new(scope, records)),
    }
}
