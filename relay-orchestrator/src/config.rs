//! Orchestrator configuration
//!
//! Connection settings for the CI server plus the polling cadence of the
//! two polling phases. Everything here is injected into constructors.

use std::time::Duration;

/// Orchestrator configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// CI server base URL (e.g., "https://ci.example.com")
    pub jenkins_url: String,

    /// Basic-auth user
    pub username: String,

    /// Basic-auth password or API token
    pub password: String,

    /// Remote trigger token sent with every build request
    pub build_token: String,

    /// Delay before each poll of the queue entry
    pub queue_poll_interval: Duration,

    /// Delay before each poll of the running build
    pub status_poll_interval: Duration,

    /// Upper bound on each polling phase; `None` polls until a terminal state
    pub phase_timeout: Option<Duration>,

    /// Per-request timeout for CI server and webhook calls
    pub http_timeout: Duration,

    /// PostgreSQL URL for build records; in-memory storage when unset
    pub database_url: Option<String>,

    /// Slack incoming webhook for notifications; log-only when unset
    pub slack_webhook_url: Option<String>,
}

impl Config {
    /// Creates a new configuration with defaults
    pub fn new(
        jenkins_url: String,
        username: String,
        password: String,
        build_token: String,
    ) -> Self {
        Self {
            jenkins_url,
            username,
            password,
            build_token,
            queue_poll_interval: Duration::from_secs(3),
            status_poll_interval: Duration::from_secs(5),
            phase_timeout: None,
            http_timeout: Duration::from_secs(30),
            database_url: None,
            slack_webhook_url: None,
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - JENKINS_URL (required)
    /// - JENKINS_USERNAME (required)
    /// - JENKINS_PASSWORD (required)
    /// - JENKINS_BUILD_TOKEN (required)
    /// - QUEUE_POLL_INTERVAL (optional, seconds, default: 3)
    /// - STATUS_POLL_INTERVAL (optional, seconds, default: 5)
    /// - PHASE_TIMEOUT (optional, seconds, default: unbounded; 0 also means unbounded)
    /// - HTTP_TIMEOUT (optional, seconds, default: 30)
    /// - DATABASE_URL (optional)
    /// - SLACK_WEBHOOK_URL (optional)
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Creates configuration from an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let required = |key: &str| {
            lookup(key).ok_or_else(|| anyhow::anyhow!("{} environment variable not set", key))
        };
        let seconds = |key: &str| {
            lookup(key)
                .and_then(|s| s.parse::<u64>().ok())
                .map(Duration::from_secs)
        };

        let mut config = Self::new(
            required("JENKINS_URL")?,
            required("JENKINS_USERNAME")?,
            required("JENKINS_PASSWORD")?,
            required("JENKINS_BUILD_TOKEN")?,
        );

        if let Some(interval) = seconds("QUEUE_POLL_INTERVAL") {
            config.queue_poll_interval = interval;
        }
        if let Some(interval) = seconds("STATUS_POLL_INTERVAL") {
            config.status_poll_interval = interval;
        }
        config.phase_timeout = seconds("PHASE_TIMEOUT").filter(|t| !t.is_zero());
        if let Some(timeout) = seconds("HTTP_TIMEOUT") {
            config.http_timeout = timeout;
        }
        config.database_url = lookup("DATABASE_URL").filter(|s| !s.is_empty());
        config.slack_webhook_url = lookup("SLACK_WEBHOOK_URL").filter(|s| !s.is_empty());

        Ok(config)
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.jenkins_url.is_empty() {
            anyhow::bail!("jenkins_url cannot be empty");
        }

        if !self.jenkins_url.starts_with("http://") && !self.jenkins_url.starts_with("https://") {
            anyhow::bail!("jenkins_url must start with http:// or https://");
        }

        if self.username.is_empty() {
            anyhow::bail!("username cannot be empty");
        }

        if self.build_token.is_empty() {
            anyhow::bail!("build_token cannot be empty");
        }

        if self.queue_poll_interval.is_zero() {
            anyhow::bail!("queue_poll_interval must be greater than 0");
        }

        if self.status_poll_interval.is_zero() {
            anyhow::bail!("status_poll_interval must be greater than 0");
        }

        if self.http_timeout.is_zero() {
            anyhow::bail!("http_timeout must be greater than 0");
        }

        Ok(())
    }
}
