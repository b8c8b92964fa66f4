//! Scripted collaborators shared by the unit tests

use anyhow::Result;
use async_trait::async_trait;
use relay_client::ClientError;
use relay_core::domain::build::{BuildRecord, QueueHandle};
use relay_core::domain::job::JobSpec;
use relay_core::domain::notification::Notification;
use relay_core::dto::jenkins::{BuildInfo, Executable, QueueItem};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::repository::{BuildRepository, JenkinsRepository, Notifier};

/// Ordered record of every collaborator call, shared between mocks
pub type EventLog = Arc<Mutex<Vec<&'static str>>>;

pub const QUEUE_URL: &str = "http://ci/queue/item/1/";

pub fn waiting(in_queue_since: i64) -> QueueItem {
    QueueItem {
        in_queue_since: Some(in_queue_since),
        why: Some("Waiting for next available executor".to_string()),
        ..Default::default()
    }
}

pub fn assigned(build_number: u64, in_queue_since: i64) -> QueueItem {
    QueueItem {
        in_queue_since: Some(in_queue_since),
        executable: Some(Executable {
            number: Some(build_number),
            url: None,
        }),
        ..Default::default()
    }
}

pub fn running() -> BuildInfo {
    BuildInfo {
        building: Some(true),
        ..Default::default()
    }
}

pub fn finished(result: &str, timestamp: i64) -> BuildInfo {
    BuildInfo {
        result: Some(result.to_string()),
        timestamp: Some(timestamp),
        building: Some(false),
        ..Default::default()
    }
}

pub fn unreachable() -> ClientError {
    ClientError::api_error(503, "Service Unavailable")
}

/// CI server that replays scripted responses
///
/// Once a script runs out the server keeps answering "still waiting".
#[derive(Default)]
pub struct ScriptedJenkins {
    submit_error: Mutex<Option<ClientError>>,
    queue: Mutex<VecDeque<relay_client::Result<QueueItem>>>,
    builds: Mutex<VecDeque<relay_client::Result<BuildInfo>>>,
    events: EventLog,
}

impl ScriptedJenkins {
    pub fn new(events: EventLog) -> Self {
        Self {
            events,
            ..Default::default()
        }
    }

    pub fn failing_submit(self, error: ClientError) -> Self {
        *self.submit_error.lock().unwrap() = Some(error);
        self
    }

    pub fn with_queue(self, responses: Vec<relay_client::Result<QueueItem>>) -> Self {
        self.queue.lock().unwrap().extend(responses);
        self
    }

    pub fn with_builds(self, responses: Vec<relay_client::Result<BuildInfo>>) -> Self {
        self.builds.lock().unwrap().extend(responses);
        self
    }

    pub fn count(&self, event: &str) -> usize {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| **e == event)
            .count()
    }

    fn record(&self, event: &'static str) {
        self.events.lock().unwrap().push(event);
    }
}

#[async_trait]
impl JenkinsRepository for ScriptedJenkins {
    async fn submit(&self, _spec: &JobSpec) -> relay_client::Result<QueueHandle> {
        self.record("submit");
        match self.submit_error.lock().unwrap().take() {
            Some(error) => Err(error),
            None => Ok(QueueHandle::new(QUEUE_URL)),
        }
    }

    async fn queue_item(&self, _handle: &QueueHandle) -> relay_client::Result<QueueItem> {
        self.record("queue");
        self.queue
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(waiting(0)))
    }

    async fn build_info(&self, _job_name: &str, _build_number: u64) -> relay_client::Result<BuildInfo> {
        self.record("build");
        self.builds
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(running()))
    }
}

/// Build repository that remembers every write
pub struct RecordingBuilds {
    pub saved: Mutex<Vec<BuildRecord>>,
    fail: bool,
    events: EventLog,
}

impl RecordingBuilds {
    pub fn new(events: EventLog) -> Self {
        Self {
            saved: Mutex::new(Vec::new()),
            fail: false,
            events,
        }
    }

    pub fn failing(events: EventLog) -> Self {
        Self {
            fail: true,
            ..Self::new(events)
        }
    }

    fn save(&self, event: &'static str, record: &BuildRecord) -> Result<()> {
        self.events.lock().unwrap().push(event);
        if self.fail {
            anyhow::bail!("database unavailable");
        }
        self.saved.lock().unwrap().push(record.clone());
        Ok(())
    }
}

#[async_trait]
impl BuildRepository for RecordingBuilds {
    async fn save_build_started(&self, record: &BuildRecord) -> Result<()> {
        self.save("save_started", record)
    }

    async fn save_build_ended(&self, record: &BuildRecord) -> Result<()> {
        self.save("save_ended", record)
    }
}

/// Notifier that remembers every notification
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<(String, Notification)>>,
    fail: bool,
    events: EventLog,
}

impl RecordingNotifier {
    pub fn new(events: EventLog) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: false,
            events,
        }
    }

    pub fn failing(events: EventLog) -> Self {
        Self {
            fail: true,
            ..Self::new(events)
        }
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, requester_id: &str, notification: &Notification) -> Result<()> {
        self.events.lock().unwrap().push("notify");
        if self.fail {
            anyhow::bail!("webhook rejected the message");
        }
        self.sent
            .lock()
            .unwrap()
            .push((requester_id.to_string(), notification.clone()));
        Ok(())
    }
}
