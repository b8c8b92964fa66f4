//! Scheduler layer
//!
//! The two polling phases of a run: waiting for the queue entry to turn
//! into a build, then waiting for that build to finish. Each phase runs in
//! its own task so the sleep/poll cycle never blocks the caller.

pub mod queue;
pub mod status;

pub use queue::QueueResolver;
pub use status::BuildStatusPoller;

use std::fmt;
use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::debug;

use crate::error::{OrchestratorError, Result};

/// Polling phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Queue,
    Status,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Queue => f.write_str("queue"),
            Phase::Status => f.write_str("status"),
        }
    }
}

/// Owns the task running a phase and aborts it when dropped
///
/// Whatever way the phase ends (result, timeout, panic, or the awaiting
/// future being dropped) the task does not outlive its guard.
struct PhaseTask<T> {
    phase: Phase,
    handle: JoinHandle<T>,
}

impl<T> Drop for PhaseTask<T> {
    fn drop(&mut self) {
        self.handle.abort();
        debug!("Released {} phase task", self.phase);
    }
}

/// Runs a polling phase in a dedicated task and waits for it
pub(crate) async fn run_phase<T, F>(phase: Phase, timeout: Option<Duration>, poll: F) -> Result<T>
where
    T: Send + 'static,
    F: Future<Output = T> + Send + 'static,
{
    let mut task = PhaseTask {
        phase,
        handle: tokio::spawn(poll),
    };

    let joined = match timeout {
        Some(limit) => tokio::time::timeout(limit, &mut task.handle)
            .await
            .map_err(|_| OrchestratorError::PhaseTimedOut {
                phase,
                timeout: limit,
            })?,
        None => (&mut task.handle).await,
    };

    joined.map_err(|source| OrchestratorError::PhaseFailed { phase, source })
}
