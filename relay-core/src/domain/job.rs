//! Job domain types

use serde::{Deserialize, Serialize};

/// A remote job to trigger
///
/// Supplied by the caller and never modified by the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSpec {
    /// Identifier of the caller's job definition, copied into the build record
    pub id: String,
    /// Job name as known by the CI server (may be URL-encoded, e.g. folder paths)
    pub name: String,
    /// Build parameters, in submission order
    pub parameters: Vec<(String, String)>,
}

impl JobSpec {
    /// Creates a job spec without parameters, using the name as identifier
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: name.clone(),
            name,
            parameters: Vec::new(),
        }
    }

    /// Overrides the job identifier
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Appends a build parameter
    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.push((key.into(), value.into()));
        self
    }

    /// Whether the job must be submitted through the parameterized endpoint
    pub fn is_parameterized(&self) -> bool {
        !self.parameters.is_empty()
    }

    /// Job name with any URL encoding removed, for display
    pub fn display_name(&self) -> String {
        urlencoding::decode(&self.name)
            .map(|name| name.into_owned())
            .unwrap_or_else(|_| self.name.clone())
    }
}
