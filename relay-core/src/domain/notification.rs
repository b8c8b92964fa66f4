//! Notification domain types

use serde::{Deserialize, Serialize};

use crate::domain::build::BuildStatus;

/// Severity of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
}

/// Summary sent to the requester once a build is over
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub severity: Severity,
}

impl Notification {
    /// Builds the completion summary for a job
    ///
    /// Anything other than a successful build is reported as an error.
    pub fn build_finished(title: impl Into<String>, status: BuildStatus) -> Self {
        let (message, severity) = match status {
            BuildStatus::Success => (":tada: finished!", Severity::Success),
            _ => (":firecracker: failed!", Severity::Error),
        };

        Self {
            title: title.into(),
            message: message.to_string(),
            severity,
        }
    }
}
