//! Jenkins API payloads
//!
//! Only the fields the orchestrator reads are modelled; everything is
//! optional because Jenkins omits or nulls them depending on state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::build::BuildOutcome;

/// Queue entry returned by `GET {queue_url}/api/json`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueItem {
    /// Epoch milliseconds at which the item entered the queue
    pub in_queue_since: Option<i64>,
    /// Present once an executor picked the item up
    pub executable: Option<Executable>,
    pub cancelled: Option<bool>,
    /// Human readable reason the item is still waiting
    pub why: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Executable {
    pub number: Option<u64>,
    pub url: Option<String>,
}

impl QueueItem {
    /// Build number assigned to this entry, if any
    pub fn build_number(&self) -> Option<u64> {
        self.executable.as_ref().and_then(|e| e.number)
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.unwrap_or(false)
    }

    pub fn queued_at(&self) -> Option<DateTime<Utc>> {
        self.in_queue_since.and_then(DateTime::from_timestamp_millis)
    }
}

/// Build details returned by `GET {base}/job/{name}/{number}/api/json`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuildInfo {
    pub result: Option<String>,
    /// Epoch milliseconds
    pub timestamp: Option<i64>,
    pub building: Option<bool>,
    pub duration: Option<i64>,
}

impl BuildInfo {
    /// Terminal outcome, if the result is exactly `SUCCESS` or `FAILURE`
    pub fn outcome(&self) -> Option<BuildOutcome> {
        match self.result.as_deref() {
            Some("SUCCESS") => Some(BuildOutcome::Success),
            Some("FAILURE") => Some(BuildOutcome::Failure),
            _ => None,
        }
    }

    pub fn reported_at(&self) -> Option<DateTime<Utc>> {
        self.timestamp.and_then(DateTime::from_timestamp_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_waiting_queue_item() {
        let item: QueueItem = serde_json::from_str(
            r#"{"inQueueSince": 1700000000000, "why": "Waiting for next available executor"}"#,
        )
        .unwrap();

        assert_eq!(item.build_number(), None);
        assert!(!item.is_cancelled());
        assert_eq!(item.queued_at().unwrap().timestamp_millis(), 1_700_000_000_000);
    }

    #[test]
    fn test_resolved_queue_item() {
        let item: QueueItem = serde_json::from_str(
            r#"{"inQueueSince": 1700000000000, "executable": {"number": 42, "url": "http://ci/job/deploy/42/"}}"#,
        )
        .unwrap();

        assert_eq!(item.build_number(), Some(42));
    }

    #[test]
    fn test_executable_without_number() {
        let item: QueueItem = serde_json::from_str(r#"{"executable": {}}"#).unwrap();
        assert_eq!(item.build_number(), None);
        assert_eq!(item.queued_at(), None);
    }

    #[test]
    fn test_build_outcome() {
        let parse = |json: &str| serde_json::from_str::<BuildInfo>(json).unwrap().outcome();

        assert_eq!(parse(r#"{"result": "SUCCESS"}"#), Some(BuildOutcome::Success));
        assert_eq!(parse(r#"{"result": "FAILURE"}"#), Some(BuildOutcome::Failure));
        assert_eq!(parse(r#"{"result": "ABORTED"}"#), None);
        assert_eq!(parse(r#"{"result": null, "building": true}"#), None);
        assert_eq!(parse(r#"{}"#), None);
    }
}
