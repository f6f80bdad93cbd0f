//! Core data types for scenario documentation.

use serde::{Deserialize, Serialize};

/// Tri-state switch decoded from a marker's text value.
///
/// Markers carry flags as free text; only the exact value `"true"` turns a
/// flag on. A field that was never written stays `Unset`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Flag {
    /// The marker did not mention the field.
    #[default]
    Unset,
    /// The marker set the field to `"true"`.
    True,
    /// The marker set the field to any other text.
    False,
}

impl Flag {
    /// Decodes a marker text value.
    pub fn from_text(text: &str) -> Self {
        if text == "true" {
            Self::True
        } else {
            Self::False
        }
    }

    /// Returns whether the flag is switched on.
    pub fn is_enabled(self) -> bool {
        matches!(self, Self::True)
    }
}

impl From<bool> for Flag {
    fn from(value: bool) -> Self {
        if value {
            Self::True
        } else {
            Self::False
        }
    }
}

/// One annotated pod scenario.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioRecord {
    /// Human-readable scenario name (may be empty).
    #[serde(default)]
    pub scenario: String,

    /// States the pod passes through on success, in order.
    #[serde(default)]
    pub success_states: Vec<String>,

    /// States the pod is expected to fail to reach.
    #[serde(default)]
    pub failed_states: Vec<String>,

    /// Why the failed states are not reached.
    #[serde(default)]
    pub failure_reason: String,

    /// Include an init container in the example pod spec.
    #[serde(default)]
    pub has_init_container: Flag,

    /// Include a volume in the example pod spec.
    #[serde(default)]
    pub has_volume: Flag,
}

impl ScenarioRecord {
    /// Creates a success-only record with both flags unset.
    pub fn new(scenario: impl Into<String>, success_states: &[&str]) -> Self {
        Self {
            scenario: scenario.into(),
            success_states: success_states.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    /// Adds failed states and the reason they are not reached.
    pub fn with_failure(mut self, failed_states: &[&str], reason: impl Into<String>) -> Self {
        self.failed_states = failed_states.iter().map(|s| s.to_string()).collect();
        self.failure_reason = reason.into();
        self
    }

    /// Sets the init-container flag.
    pub fn with_init_container(mut self, enabled: bool) -> Self {
        self.has_init_container = Flag::from(enabled);
        self
    }

    /// Sets the volume flag.
    pub fn with_volume(mut self, enabled: bool) -> Self {
        self.has_volume = Flag::from(enabled);
        self
    }

    /// Returns which template variant this record renders with.
    pub fn render_mode(&self) -> RenderMode {
        if self.failed_states.is_empty() {
            RenderMode::SuccessOnly
        } else {
            RenderMode::SuccessAndFailure
        }
    }
}

/// Template variant for a record, decided solely by `failed_states`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Success chain only.
    SuccessOnly,
    /// Success chain followed by the failure sentence and reason.
    SuccessAndFailure,
}

/// Records discovered within one scope, in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeCollection {
    /// Scope name (the directory the markers were found in).
    pub scope: String,
    /// Records in discovery order; duplicates are kept.
    pub records: Vec<ScenarioRecord>,
}

impl ScopeCollection {
    /// Creates a scope with the given records.
    pub fn new(scope: impl Into<String>, records: Vec<ScenarioRecord>) -> Self {
        Self {
            scope: scope.into(),
            records,
        }
    }

    /// Returns true if no records were discovered in this scope.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
