//! Build lifecycle assembly
//!
//! Builds the lifecycle record from what the two polling phases observed.
//! No I/O happens here.

use relay_core::domain::build::{BuildHandle, BuildRecord, BuildStatus, TerminalResult};
use uuid::Uuid;

/// Open a pending record for a build that just left the queue
pub fn open_record(job_id: &str, requester_id: &str, handle: BuildHandle) -> BuildRecord {
    BuildRecord {
        id: Uuid::new_v4(),
        job_id: job_id.to_string(),
        requester_id: requester_id.to_string(),
        build_number: handle.build_number,
        status: BuildStatus::Pending,
        started_at: handle.in_queue_since,
        ended_at: None,
    }
}

/// Close a record with the build's terminal result
///
/// An end time earlier than the start is clamped to the start, so a closed
/// record guarantees `ended_at >= started_at`; equal instants are allowed
/// because the CI server reports both at millisecond resolution. Closing an
/// already closed record returns it unchanged.
pub fn close_record(record: BuildRecord, result: TerminalResult) -> BuildRecord {
    if record.status.is_terminal() {
        tracing::warn!("Build record {} is already closed", record.id);
        return record;
    }

    let ended_at = if result.completed_at < record.started_at {
        tracing::warn!(
            "Build record {} reported completion before it was queued, clamping end time",
            record.id
        );
        record.started_at
    } else {
        result.completed_at
    };

    BuildRecord {
        status: result.outcome.into(),
        ended_at: Some(ended_at),
        ..record
    }
}
