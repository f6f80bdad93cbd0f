//! Docgen Core Library
//!
//! Turns pod scenario markers found in source comments into a Markdown
//! document:
//! - Schema registry for marker names and their fields
//! - Marker collection, one scope per directory
//! - Deterministic rendering with an example pod spec per scenario
//! - Incremental persistence after every rendered scenario
//!
//! # Quick Start
//!
//! ```
//! use docgen_core::{render, MemorySink, ScenarioRecord, ScopeCollection};
//!
//! let record = ScenarioRecord::new("basic", &["Pending", "Running"]).with_init_container(true);
//! let scopes = vec![ScopeCollection::new("e2e/pods", vec![record])];
//!
//! let mut sink = MemorySink::new();
//! render(&scopes, &mut sink).unwrap();
//!
//! assert!(sink.contents().starts_with("# POD CONDITION TESTS\n"));
//! assert!(sink
//!     .contents()
//!     .contains("pod successfully transitions to **Pending -> Running** states"));
//! ```
//!
//! # Markers
//!
//! Scenarios are declared in line comments and decoded against the
//! registered schema:
//!
//! ```
//! use docgen_core::{Collector, SchemaRegistry};
//!
//! let registry = SchemaRegistry::with_defaults().unwrap();
//! let collector = Collector::new(&registry, &["go".to_string()]).unwrap();
//!
//! let source = r#"
//! // +docgenerator:pod:scenario="bad image",successStates={Pending},failedStates={Running},failureReason="ErrImagePull"
//! "#;
//! let (records, skipped) = collector.scan_source(source, "pods_test.go");
//!
//! assert!(skipped.is_empty());
//! assert_eq!(records[0].failed_states, vec!["Running"]);
//! ```
//!
//! # Incremental Output
//!
//! The renderer hands the whole document to its [`DocumentSink`] after each
//! scenario. [`FileSink`] replaces the file atomically, so a run that fails
//! halfway leaves a complete document covering every scenario written so
//! far.

mod collect;
mod config;
mod error;
mod payload;
mod render;
mod schema;
mod sink;
mod types;

pub use collect::{Collection, Collector, DecodeFailure};
pub use config::{Config, OutputConfig, ScanConfig, CONFIG_FILE_NAME};
pub use error::{DocgenError, Result};
pub use payload::synthesize_payload;
pub use render::{
    document_heading, document_status, render, render_record, render_to_string, DocumentRenderer,
    DocumentStatus, RenderReport, DOCUMENT_TITLE,
};
pub use schema::{
    parse_arguments, FieldKind, FieldSpec, MarkerMatch, RawAnnotation, RawValue,
    RegistrationHandle, SchemaRegistry, SchemaShape, POD_SCENARIO_SCHEMA,
};
pub use sink::{DocumentSink, FileSink, MemorySink};
pub use types::{Flag, RenderMode, ScenarioRecord, ScopeCollection};
