use anyhow::Result;
use docgen_core::DocumentStatus;

/// Declarative assertions on the generated document
pub enum Assertion {
    // Document
    DocumentExists,
    DocumentMissing,
    DocumentContains(String),
    DocumentLacks(String),
    DocumentUnchanged,

    // Scenarios
    ScenarioCount(usize),
    ScenarioOrder(Vec<String>),
    FailureSectionCount(usize),

    // Collection
    SkippedCount(usize),

    // Runs
    LastRunFailed,
    CheckStatus(DocumentStatus),

    // Custom (receives the document text)
    Custom(Box<dyn Fn(&str) -> Result<()> + Send + Sync>),
}

impl std::fmt::Debug for Assertion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DocumentExists => write!(f, "DocumentExists"),
            Self::DocumentMissing => write!(f, "DocumentMissing"),
            Self::DocumentContains(s) => write!(f, "DocumentContains({:?})", s),
            Self::DocumentLacks(s) => write!(f, "DocumentLacks({:?})", s),
            Self::DocumentUnchanged => write!(f, "DocumentUnchanged"),
            Self::ScenarioCount(n) => write!(f, "ScenarioCount({})", n),
            Self::ScenarioOrder(names) => write!(f, "ScenarioOrder({:?})", names),
            Self::FailureSectionCount(n) => write!(f, "FailureSectionCount({})", n),
            Self::SkippedCount(n) => write!(f, "SkippedCount({})", n),
            Self::LastRunFailed => write!(f, "LastRunFailed"),
            Self::CheckStatus(status) => write!(f, "CheckStatus({:?})", status),
            Self::Custom(_) => write!(f, "Custom(<fn>)"),
        }
    }
}
