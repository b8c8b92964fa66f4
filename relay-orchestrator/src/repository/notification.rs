//! Notification repository
//!
//! Delivers the end-of-build summary to the requester.

use anyhow::{Context, Result};
use async_trait::async_trait;
use relay_core::domain::notification::{Notification, Severity};
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::info;

/// Repository trait for outbound notifications
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Sends a notification on behalf of a request
    ///
    /// # Arguments
    /// * `requester_id` - The request that triggered the build
    /// * `notification` - The summary to deliver
    async fn notify(&self, requester_id: &str, notification: &Notification) -> Result<()>;
}

/// Slack incoming-webhook implementation of Notifier
pub struct SlackNotifier {
    client: Client,
    webhook_url: String,
}

impl SlackNotifier {
    /// Creates a notifier whose webhook calls give up after `timeout`
    pub fn new(webhook_url: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build Slack HTTP client")?;

        Ok(Self {
            client,
            webhook_url,
        })
    }
}

#[async_trait]
impl Notifier for SlackNotifier {
    async fn notify(&self, requester_id: &str, notification: &Notification) -> Result<()> {
        let response = self
            .client
            .post(&self.webhook_url)
            .json(&SlackMessage::new(requester_id, notification))
            .send()
            .await
            .context("Failed to send Slack notification")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Failed to send Slack notification: {} - {}", status, body);
        }

        Ok(())
    }
}

/// Notifier that only writes to the log
#[derive(Debug, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, requester_id: &str, notification: &Notification) -> Result<()> {
        info!(
            requester_id,
            severity = ?notification.severity,
            "{}: {}",
            notification.title,
            notification.message
        );
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct SlackMessage {
    response_type: &'static str,
    attachments: Vec<SlackAttachment>,
}

#[derive(Debug, Serialize)]
struct SlackAttachment {
    title: String,
    text: String,
    color: &'static str,
    footer: String,
}

impl SlackMessage {
    fn new(requester_id: &str, notification: &Notification) -> Self {
        let color = match notification.severity {
            Severity::Success => "good",
            Severity::Error => "danger",
        };

        Self {
            response_type: "in_channel",
            attachments: vec![SlackAttachment {
                title: notification.title.clone(),
                text: notification.message.clone(),
                color,
                footer: format!("request {}", requester_id),
            }],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relay_core::domain::build::BuildStatus;

    #[test]
    fn test_slack_payload_success() {
        let notification = Notification::build_finished("deploy", BuildStatus::Success);
        let payload = serde_json::to_value(SlackMessage::new("req-1", &notification)).unwrap();

        assert_eq!(payload["response_type"], "in_channel");
        assert_eq!(payload["attachments"][0]["title"], "deploy");
        assert_eq!(payload["attachments"][0]["text"], ":tada: finished!");
        assert_eq!(payload["attachments"][0]["color"], "good");
        assert_eq!(payload["attachments"][0]["footer"], "request req-1");
    }

    #[test]
    fn test_slack_payload_failure() {
        let notification = Notification::build_finished("deploy", BuildStatus::Failure);
        let payload = serde_json::to_value(SlackMessage::new("req-1", &notification)).unwrap();

        assert_eq!(payload["attachments"][0]["color"], "danger");
    }

    #[tokio::test]
    async fn test_slack_notifier_gives_up_on_silent_webhook() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/hook", listener.local_addr().unwrap());
        tokio::spawn(async move {
            let mut open = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                open.push(socket);
            }
        });

        let notifier = SlackNotifier::new(url, Duration::from_millis(200)).unwrap();
        let notification = Notification::build_finished("deploy", BuildStatus::Success);

        let result = tokio::time::timeout(
            Duration::from_secs(5),
            notifier.notify("req-1", &notification),
        )
        .await
        .expect("notify should give up on its own");

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_log_notifier_never_fails() {
        let notification = Notification::build_finished("deploy", BuildStatus::Success);
        assert!(LogNotifier.notify("req-1", &notification).await.is_ok());
    }
}
