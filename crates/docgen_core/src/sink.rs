//! Targets the rendered document is persisted to.

use crate::error::{DocgenError, Result};
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Capability to replace the stored document.
///
/// Every call receives the complete document and overwrites whatever the
/// previous call stored. Implementations must not append.
pub trait DocumentSink {
    /// Replaces the stored document with `contents`.
    fn replace(&mut self, contents: &str) -> Result<()>;
}

impl<S: DocumentSink + ?Sized> DocumentSink for &mut S {
    fn replace(&mut self, contents: &str) -> Result<()> {
        (**self).replace(contents)
    }
}

/// In-memory sink, used for `check` and tests.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    contents: String,
    writes: usize,
}

impl MemorySink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Last stored document.
    pub fn contents(&self) -> &str {
        &self.contents
    }

    /// Consumes the sink, returning the last stored document.
    pub fn into_contents(self) -> String {
        self.contents
    }

    /// Number of replace calls so far.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl DocumentSink for MemorySink {
    fn replace(&mut self, contents: &str) -> Result<()> {
        self.contents.clear();
        self.contents.push_str(contents);
        self.writes += 1;
        Ok(())
    }
}

/// Document file on disk.
///
/// Holds an exclusive lock on `<path>.lock` for its lifetime. The lock file
/// itself is left in place when the sink is dropped. Each
/// `replace` writes a temp file, syncs it and renames it over the target,
/// so readers see either the previous snapshot or the new one.
#[derive(Debug)]
pub struct FileSink {
    path: PathBuf,
    lock: File,
}

impl FileSink {
    /// Opens a sink for `path`, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns `SinkLocked` if another sink holds the document lock.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let lock_path = sibling_path(&path, ".lock");
        let lock = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)?;

        if let Err(e) = lock.try_lock_exclusive() {
            if e.kind() == fs2::lock_contended_error().kind() {
                return Err(DocgenError::SinkLocked(path));
            }
            return Err(DocgenError::Io(e));
        }

        debug!(path = %path.display(), lock = %lock_path.display(), "opened document sink");
        Ok(Self { path, lock })
    }

    /// Path of the document this sink writes.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_atomic(&self, data: &[u8]) -> std::io::Result<()> {
        let tmp_path = sibling_path(&self.path, ".tmp");

        let written = File::create(&tmp_path).and_then(|mut file| {
            file.write_all(data)?;
            file.sync_all()
        });
        if let Err(e) = written.and_then(|()| fs::rename(&tmp_path, &self.path)) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e);
        }

        // fsync parent directory (Unix)
        #[cfg(unix)]
        {
            if let Some(parent) = self.path.parent() {
                if let Ok(dir_file) = File::open(parent) {
                    let _ = dir_file.sync_all();
                }
            }
        }

        Ok(())
    }
}

impl DocumentSink for FileSink {
    fn replace(&mut self, contents: &str) -> Result<()> {
        self.write_atomic(contents.as_bytes())
            .map_err(|source| DocgenError::Write {
                path: self.path.clone(),
                source,
            })?;
        debug!(path = %self.path.display(), bytes = contents.len(), "persisted document");
        Ok(())
    }
}

impl Drop for FileSink {
    fn drop(&mut self) {
        // Every sink for this document must lock the same inode, so the
        // lock file is never removed.
        let _ = FileExt::unlock(&self.lock);
    }
}

/// `<file_name><suffix>` next to `path`.
fn sibling_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(suffix);
    path.with_file_name(name)
}
