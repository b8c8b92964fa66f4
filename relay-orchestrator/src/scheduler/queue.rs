//! Queue resolver
//!
//! Waits for a submitted job's queue entry to be handed to an executor,
//! which is when the CI server assigns it a build number.

use chrono::Utc;
use relay_core::domain::build::{BuildHandle, QueueHandle};
use std::sync::Arc;
use std::time::Duration;
use tokio::time;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::repository::JenkinsRepository;
use crate::scheduler::{Phase, run_phase};

/// Polls a queue entry until it resolves to a build
#[derive(Clone)]
pub struct QueueResolver {
    jenkins: Arc<dyn JenkinsRepository>,
    interval: Duration,
    timeout: Option<Duration>,
}

impl QueueResolver {
    pub fn new(jenkins: Arc<dyn JenkinsRepository>, interval: Duration) -> Self {
        Self {
            jenkins,
            interval,
            timeout: None,
        }
    }

    /// Bounds the whole phase; unbounded by default
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Waits until the queue entry exposes a build number
    ///
    /// Poll failures are logged and retried on the next tick, so the only
    /// errors returned are a configured timeout or a crashed poll task.
    pub async fn resolve(&self, handle: QueueHandle) -> Result<BuildHandle> {
        let jenkins = Arc::clone(&self.jenkins);
        let interval = self.interval;

        run_phase(
            Phase::Queue,
            self.timeout,
            poll_until_assigned(jenkins, handle, interval),
        )
        .await
    }
}

async fn poll_until_assigned(
    jenkins: Arc<dyn JenkinsRepository>,
    handle: QueueHandle,
    interval: Duration,
) -> BuildHandle {
    let mut attempt: u64 = 0;
    let mut reported_cancel = false;
    let mut reported_missing = false;

    loop {
        time::sleep(interval).await;
        attempt += 1;

        let item = match jenkins.queue_item(&handle).await {
            Ok(item) => item,
            // Jenkins can answer 404 for an entry it has not published yet
            Err(e) if e.is_not_found() => {
                if reported_missing {
                    debug!("Queue entry {} still not found (attempt {})", handle, attempt);
                } else {
                    warn!("Queue entry {} not found, will keep polling: {}", handle, e);
                    reported_missing = true;
                }
                continue;
            }
            Err(e) => {
                warn!("Failed to poll queue entry {} (attempt {}): {}", handle, attempt, e);
                continue;
            }
        };

        if let Some(build_number) = item.build_number() {
            let in_queue_since = item.queued_at().unwrap_or_else(|| {
                warn!(
                    "Queue entry {} has no usable inQueueSince, using observation time",
                    handle
                );
                Utc::now()
            });

            info!(
                "Queue entry {} resolved to build #{} after {} poll(s)",
                handle, build_number, attempt
            );

            return BuildHandle {
                build_number,
                in_queue_since,
            };
        }

        if item.is_cancelled() && !reported_cancel {
            warn!("Queue entry {} was cancelled, still waiting for a build", handle);
            reported_cancel = true;
        } else {
            debug!(
                "Queue entry {} still waiting: {}",
                handle,
                item.why.as_deref().unwrap_or("no reason given")
            );
        }
    }
}
