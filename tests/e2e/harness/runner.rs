use super::assertions::Assertion;
use super::steps::ScenarioStep;
use super::workspace::TestWorkspace;
use anyhow::{anyhow, bail, Context, Result};
use docgen_core::{
    document_status, render, Collection, Collector, Config, DocgenError, DocumentSink,
    DocumentStatus, FileSink, SchemaRegistry,
};
use std::collections::HashMap;
use std::fs;

/// File sink that rejects one persist call, for interrupted-run scenarios
struct FlakySink {
    inner: FileSink,
    fail_on: usize,
    calls: usize,
}

impl DocumentSink for FlakySink {
    fn replace(&mut self, contents: &str) -> docgen_core::Result<()> {
        self.calls += 1;
        if self.calls == self.fail_on {
            return Err(DocgenError::Write {
                path: self.inner.path().to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::Other, "injected failure"),
            });
        }
        self.inner.replace(contents)
    }
}

/// Executes scenarios against a real source tree and output file
pub struct ScenarioRunner {
    workspace: TestWorkspace,
    config: Config,
    registry: SchemaRegistry,
    current_step: usize,
    last_collection: Option<Collection>,
    last_error: Option<String>,
    last_check: Option<DocumentStatus>,
    previous_document: Option<String>,
}

impl ScenarioRunner {
    /// Create a new runner with initial files
    pub fn new(initial_files: HashMap<String, Vec<u8>>) -> Result<Self> {
        Self::with_workspace(TestWorkspace::with_files(initial_files)?)
    }

    /// Create a runner over a fixture tree
    pub fn from_fixture(name: &str) -> Result<Self> {
        Self::with_workspace(TestWorkspace::from_fixture(name)?)
    }

    fn with_workspace(workspace: TestWorkspace) -> Result<Self> {
        let config = workspace.config();
        let registry = SchemaRegistry::with_defaults()?;
        Ok(Self {
            workspace,
            config,
            registry,
            current_step: 0,
            last_collection: None,
            last_error: None,
            last_check: None,
            previous_document: None,
        })
    }

    /// Get current step number
    pub fn current_step(&self) -> usize {
        self.current_step
    }

    /// Execute all steps in sequence
    pub fn execute(&mut self, steps: &[ScenarioStep]) -> Result<()> {
        for (i, step) in steps.iter().enumerate() {
            self.current_step = i;
            self.execute_step(step)
                .with_context(|| format!("Step {}: {:?}", i, step))?;
        }
        Ok(())
    }

    /// Execute a single step
    fn execute_step(&mut self, step: &ScenarioStep) -> Result<()> {
        match step {
            ScenarioStep::WriteSource { path, content } => {
                self.workspace.write_file(path, content.as_bytes())
            }
            ScenarioStep::RemoveSource { path } => self.workspace.remove_file(path),
            ScenarioStep::Generate => self.handle_generate(None),
            ScenarioStep::GenerateFailingAt { persist } => self.handle_generate(Some(*persist)),
            ScenarioStep::Check => self.handle_check(),
            ScenarioStep::Assert { assertion } => self.check(assertion),
        }
    }

    fn collect(&self) -> Result<Collection> {
        let collector = Collector::new(&self.registry, &self.config.scan.extensions)?;
        Ok(collector.collect(&self.config.scan.paths)?)
    }

    fn handle_generate(&mut self, fail_on: Option<usize>) -> Result<()> {
        self.previous_document = self.document()?;

        let collection = self.collect()?;

        let inner = FileSink::create(self.config.doc_path())?;
        let result = match fail_on {
            Some(n) => {
                let mut sink = FlakySink {
                    inner,
                    fail_on: n,
                    calls: 0,
                };
                render(&collection.scopes, &mut sink)
            }
            None => {
                let mut sink = inner;
                render(&collection.scopes, &mut sink)
            }
        };

        self.last_error = result.err().map(|e| e.to_string());
        self.last_collection = Some(collection);
        Ok(())
    }

    fn handle_check(&mut self) -> Result<()> {
        let collection = self.collect()?;
        self.last_check = Some(document_status(&self.config.doc_path(), &collection.scopes)?);
        Ok(())
    }

    fn document(&self) -> Result<Option<String>> {
        let path = self.config.doc_path();
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(&path)?))
    }

    fn require_document(&self) -> Result<String> {
        self.document()?
            .ok_or_else(|| anyhow!("document {} was not written", self.config.doc_path().display()))
    }

    fn collection(&self) -> Result<&Collection> {
        self.last_collection
            .as_ref()
            .ok_or_else(|| anyhow!("no generation run yet"))
    }

    fn check(&self, assertion: &Assertion) -> Result<()> {
        match assertion {
            Assertion::DocumentExists => {
                self.require_document()?;
            }
            Assertion::DocumentMissing => {
                if self.document()?.is_some() {
                    bail!("document exists but should not");
                }
            }
            Assertion::DocumentContains(text) => {
                let doc = self.require_document()?;
                if !doc.contains(text.as_str()) {
                    bail!("document does not contain {:?}:\n{}", text, doc);
                }
            }
            Assertion::DocumentLacks(text) => {
                let doc = self.require_document()?;
                if doc.contains(text.as_str()) {
                    bail!("document unexpectedly contains {:?}", text);
                }
            }
            Assertion::DocumentUnchanged => {
                let doc = self.require_document()?;
                if self.previous_document.as_deref() != Some(doc.as_str()) {
                    bail!("document changed between the last two runs");
                }
            }
            Assertion::ScenarioCount(expected) => {
                let actual = scenario_names(&self.require_document()?).len();
                if actual != *expected {
                    bail!("expected {} scenarios, found {}", expected, actual);
                }
            }
            Assertion::ScenarioOrder(expected) => {
                let actual = scenario_names(&self.require_document()?);
                if &actual != expected {
                    bail!("scenario order {:?}, expected {:?}", actual, expected);
                }
            }
            Assertion::FailureSectionCount(expected) => {
                let actual = self
                    .require_document()?
                    .matches("**Reason for failure**:")
                    .count();
                if actual != *expected {
                    bail!("expected {} failure sections, found {}", expected, actual);
                }
            }
            Assertion::SkippedCount(expected) => {
                let actual = self.collection()?.skipped.len();
                if actual != *expected {
                    bail!("expected {} skipped markers, found {}", expected, actual);
                }
            }
            Assertion::LastRunFailed => {
                if self.last_error.is_none() {
                    bail!("last generation run succeeded but should have failed");
                }
            }
            Assertion::CheckStatus(expected) => {
                let actual = self
                    .last_check
                    .ok_or_else(|| anyhow!("no check run yet"))?;
                if actual != *expected {
                    bail!("check reported {:?}, expected {:?}", actual, expected);
                }
            }
            Assertion::Custom(check) => {
                check(&self.require_document()?)?;
            }
        }
        Ok(())
    }
}

/// Scenario names in document order
pub fn scenario_names(doc: &str) -> Vec<String> {
    doc.lines()
        .filter_map(|line| line.strip_prefix("### Scenario: "))
        .map(str::to_string)
        .collect()
}
