//! Orchestrator
//!
//! Runs one job end to end: submit, wait for the queue, record the start,
//! wait for the build, record the end, notify the requester.

use relay_core::domain::build::BuildRecord;
use relay_core::domain::job::JobSpec;
use relay_core::domain::notification::Notification;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::{OrchestratorError, Result};
use crate::repository::{BuildRepository, JenkinsRepository, Notifier};
use crate::scheduler::{BuildStatusPoller, QueueResolver};
use crate::service::lifecycle;

/// End-to-end build orchestration
///
/// Cloning is cheap; clones share collaborators but no run state, so
/// independent runs can execute concurrently.
#[derive(Clone)]
pub struct Orchestrator {
    jenkins: Arc<dyn JenkinsRepository>,
    builds: Arc<dyn BuildRepository>,
    notifier: Arc<dyn Notifier>,
    queue_resolver: QueueResolver,
    status_poller: BuildStatusPoller,
}

impl Orchestrator {
    pub fn new(
        config: &Config,
        jenkins: Arc<dyn JenkinsRepository>,
        builds: Arc<dyn BuildRepository>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let queue_resolver = QueueResolver::new(Arc::clone(&jenkins), config.queue_poll_interval)
            .with_timeout(config.phase_timeout);
        let status_poller = BuildStatusPoller::new(Arc::clone(&jenkins), config.status_poll_interval)
            .with_timeout(config.phase_timeout);

        Self {
            jenkins,
            builds,
            notifier,
            queue_resolver,
            status_poller,
        }
    }

    /// Trigger a job and follow it to completion
    ///
    /// A failed submission aborts before anything is stored or sent. A
    /// build that ends in `FAILURE` is returned as a closed record, not as
    /// an error.
    pub async fn run(&self, spec: &JobSpec, requester_id: &str) -> Result<BuildRecord> {
        info!("Submitting job {} for request {}", spec.name, requester_id);

        let queue = self
            .jenkins
            .submit(spec)
            .await
            .map_err(OrchestratorError::RemoteSubmission)?;

        info!("Job {} queued at {}", spec.name, queue);

        let build = self.queue_resolver.resolve(queue).await?;

        let record = lifecycle::open_record(&spec.id, requester_id, build);
        self.builds
            .save_build_started(&record)
            .await
            .map_err(OrchestratorError::Persistence)?;

        info!(
            "Build {} #{} started (record {})",
            spec.name, record.build_number, record.id
        );

        let result = self
            .status_poller
            .await_completion(&spec.name, record.build_number)
            .await?;

        let record = lifecycle::close_record(record, result);
        self.builds
            .save_build_ended(&record)
            .await
            .map_err(OrchestratorError::Persistence)?;

        info!(
            "Build {} #{} completed with status {}",
            spec.name, record.build_number, record.status
        );

        let notification = Notification::build_finished(spec.display_name(), record.status);
        if let Err(e) = self.notifier.notify(requester_id, &notification).await {
            warn!(
                "Failed to notify request {} about build {}: {:#}",
                requester_id, record.id, e
            );
        }

        Ok(record)
    }
}
