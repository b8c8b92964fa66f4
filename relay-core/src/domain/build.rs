//! Build domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Pointer to a pending entry in the CI server's build queue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueHandle(String);

impl QueueHandle {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn url(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QueueHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A queue entry that has been assigned a concrete build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildHandle {
    pub build_number: u64,
    pub in_queue_since: DateTime<Utc>,
}

/// Terminal outcome reported by the CI server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuildOutcome {
    Success,
    Failure,
}

/// Terminal result observed by the status poller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminalResult {
    pub outcome: BuildOutcome,
    pub completed_at: DateTime<Utc>,
}

/// Lifecycle status of a build record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BuildStatus {
    Pending,
    Success,
    Failure,
}

impl BuildStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildStatus::Pending => "PENDING",
            BuildStatus::Success => "SUCCESS",
            BuildStatus::Failure => "FAILURE",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, BuildStatus::Pending)
    }
}

impl From<BuildOutcome> for BuildStatus {
    fn from(outcome: BuildOutcome) -> Self {
        match outcome {
            BuildOutcome::Success => BuildStatus::Success,
            BuildOutcome::Failure => BuildStatus::Failure,
        }
    }
}

impl std::str::FromStr for BuildStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(BuildStatus::Pending),
            "SUCCESS" => Ok(BuildStatus::Success),
            "FAILURE" => Ok(BuildStatus::Failure),
            other => Err(format!("unknown build status: {}", other)),
        }
    }
}

impl fmt::Display for BuildStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Build lifecycle record
///
/// Opened once the queue entry resolves to a build, closed once a terminal
/// result is observed. `ended_at` is set exactly when `status` is terminal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildRecord {
    pub id: Uuid,
    pub job_id: String,
    pub requester_id: String,
    pub build_number: u64,
    pub status: BuildStatus,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
}

impl BuildRecord {
    pub fn is_pending(&self) -> bool {
        self.status == BuildStatus::Pending
    }

    /// Checks the status/end-timestamp invariant
    pub fn is_consistent(&self) -> bool {
        match (self.status, self.ended_at) {
            (BuildStatus::Pending, None) => true,
            (BuildStatus::Pending, Some(_)) => false,
            (_, Some(ended_at)) => ended_at >= self.started_at,
            (_, None) => false,
        }
    }
}
