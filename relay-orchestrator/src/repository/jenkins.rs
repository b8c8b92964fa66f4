//! CI server repository
//!
//! Thin seam over the Jenkins HTTP client so the pollers and the
//! orchestrator can run against scripted servers in tests.

use async_trait::async_trait;
use relay_client::JenkinsClient;
use relay_client::Result;
use relay_core::domain::build::QueueHandle;
use relay_core::domain::job::JobSpec;
use relay_core::dto::jenkins::{BuildInfo, QueueItem};

/// Repository trait for the remote CI server
#[async_trait]
pub trait JenkinsRepository: Send + Sync {
    /// Triggers a job and returns its queue entry
    async fn submit(&self, spec: &JobSpec) -> Result<QueueHandle>;

    /// Reads a queue entry
    async fn queue_item(&self, handle: &QueueHandle) -> Result<QueueItem>;

    /// Reads a build
    async fn build_info(&self, job_name: &str, build_number: u64) -> Result<BuildInfo>;
}

/// HTTP implementation of JenkinsRepository
pub struct HttpJenkinsRepository {
    client: JenkinsClient,
}

impl HttpJenkinsRepository {
    pub fn new(client: JenkinsClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl JenkinsRepository for HttpJenkinsRepository {
    async fn submit(&self, spec: &JobSpec) -> Result<QueueHandle> {
        self.client.submit(spec).await
    }

    async fn queue_item(&self, handle: &QueueHandle) -> Result<QueueItem> {
        self.client.queue_item(handle).await
    }

    async fn build_info(&self, job_name: &str, build_number: u64) -> Result<BuildInfo> {
        self.client.build_info(job_name, build_number).await
    }
}
