//! Orchestration errors

use std::time::Duration;

use relay_client::ClientError;
use thiserror::Error;

use crate::scheduler::Phase;

/// Errors that end an orchestration run
///
/// Transient poll failures never show up here: the pollers log them and
/// keep going. A build that ends in `FAILURE` is not an error either.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// The job could not be started; never retried
    #[error("Remote submission failed: {0}")]
    RemoteSubmission(#[source] ClientError),

    /// A build record could not be stored
    #[error("Failed to persist build record: {0:#}")]
    Persistence(anyhow::Error),

    /// A polling phase ran past the configured limit
    #[error("{phase} phase timed out after {timeout:?}")]
    PhaseTimedOut { phase: Phase, timeout: Duration },

    /// A polling task died before producing a result
    #[error("{phase} phase task failed: {source}")]
    PhaseFailed {
        phase: Phase,
        #[source]
        source: tokio::task::JoinError,
    },
}

pub type Result<T> = std::result::Result<T, OrchestratorError>;
