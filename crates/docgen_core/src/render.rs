//! Markdown rendering of scenario records.
//!
//! The document is a fixed heading followed by one block per record, in
//! scope order and then discovery order. Records with failed states get the
//! failure sentence and reason appended to their success block. Nothing is
//! sorted, deduplicated or timestamped, so identical input renders
//! byte-identical output.
//!
//! The running document is handed to the sink after every record. If a later
//! persist fails, the sink still holds the document up to the last record
//! that was written successfully.

use crate::error::Result;
use crate::payload::synthesize_payload;
use crate::sink::{DocumentSink, MemorySink};
use crate::types::{RenderMode, ScenarioRecord, ScopeCollection};
use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, info};

/// Title of the generated document.
pub const DOCUMENT_TITLE: &str = "POD CONDITION TESTS";

/// Counts from a completed render.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RenderReport {
    /// Scopes visited.
    pub scopes: usize,
    /// Records rendered.
    pub records: usize,
    /// Records rendered with a failure section.
    pub failure_records: usize,
}

/// Returns the document heading block.
pub fn document_heading() -> String {
    format!("# {}\n\n", DOCUMENT_TITLE)
}

/// Renders a single record block.
pub fn render_record(record: &ScenarioRecord) -> String {
    let payload = synthesize_payload(
        record.has_init_container.is_enabled(),
        record.has_volume.is_enabled(),
    );

    let mut block = String::new();
    // Writing into a String cannot fail
    let _ = write!(
        block,
        "### Scenario: {}\n\n**PodSpec**:\n```sh\n{}\n```\n\n\
         - For the above pod spec, pod successfully transitions to **{}** states\n",
        record.scenario,
        payload,
        record.success_states.join(" -> "),
    );

    match record.render_mode() {
        RenderMode::SuccessOnly => block.push_str("\n\n"),
        RenderMode::SuccessAndFailure => {
            let _ = write!(
                block,
                "- Fails to transition to **{}** states\n\n**Reason for failure**: {}\n",
                record.failed_states.join(", "),
                record.failure_reason,
            );
        }
    }

    block
}

/// Accumulates the document and persists it after each record.
///
/// The buffer belongs to the renderer; the sink only ever sees complete
/// snapshots ending on a record boundary.
pub struct DocumentRenderer<'s, S: DocumentSink + ?Sized> {
    buffer: String,
    sink: &'s mut S,
    report: RenderReport,
}

impl<'s, S: DocumentSink + ?Sized> DocumentRenderer<'s, S> {
    /// Starts a document with the heading already in the buffer.
    pub fn new(sink: &'s mut S) -> Self {
        Self {
            buffer: document_heading(),
            sink,
            report: RenderReport::default(),
        }
    }

    /// Marks the start of a new scope.
    pub fn begin_scope(&mut self, scope: &str) {
        debug!(scope, "rendering scope");
        self.report.scopes += 1;
    }

    /// Appends one record and persists the whole buffer.
    ///
    /// # Errors
    ///
    /// Propagates the sink's error. The record stays in the buffer but the
    /// sink keeps its previous snapshot.
    pub fn append(&mut self, record: &ScenarioRecord) -> Result<()> {
        self.buffer.push_str(&render_record(record));
        self.report.records += 1;
        if record.render_mode() == RenderMode::SuccessAndFailure {
            self.report.failure_records += 1;
        }

        debug!(
            scenario = %record.scenario,
            records = self.report.records,
            "appended scenario"
        );
        self.sink.replace(&self.buffer)
    }

    /// Finishes the run.
    ///
    /// A run that rendered no records persists the heading alone so the
    /// output always exists afterwards.
    pub fn finish(self) -> Result<RenderReport> {
        if self.report.records == 0 {
            self.sink.replace(&self.buffer)?;
        }

        info!(
            scopes = self.report.scopes,
            records = self.report.records,
            failures = self.report.failure_records,
            "rendered document"
        );
        Ok(self.report)
    }
}

/// Renders all scopes into `sink`, persisting after every record.
///
/// # Errors
///
/// Returns the first error reported by the sink; rendering stops there.
pub fn render<S: DocumentSink + ?Sized>(
    scopes: &[ScopeCollection],
    sink: &mut S,
) -> Result<RenderReport> {
    let mut renderer = DocumentRenderer::new(sink);
    for scope in scopes {
        renderer.begin_scope(&scope.scope);
        for record in &scope.records {
            renderer.append(record)?;
        }
    }
    renderer.finish()
}

/// Renders all scopes into a string without persisting anything.
///
/// Goes through [`render`] with a [`MemorySink`], so the result is exactly
/// what a file sink would hold after a successful run.
pub fn render_to_string(scopes: &[ScopeCollection]) -> Result<String> {
    let mut sink = MemorySink::new();
    render(scopes, &mut sink)?;
    Ok(sink.into_contents())
}

/// How the document on disk compares to a fresh render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentStatus {
    /// Byte-identical to a fresh render.
    Current,
    /// Present but different.
    Stale,
    /// No document at the path.
    Missing,
}

/// Compares the document at `path` with what `scopes` render to.
///
/// # Errors
///
/// Returns `Io` if the document exists but cannot be read.
pub fn document_status(path: &Path, scopes: &[ScopeCollection]) -> Result<DocumentStatus> {
    let actual = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(DocumentStatus::Missing),
        Err(e) => return Err(e.into()),
    };

    let status = if actual == render_to_string(scopes)? {
        DocumentStatus::Current
    } else {
        DocumentStatus::Stale
    };
    debug!(path = %path.display(), ?status, "compared document");
    Ok(status)
}
