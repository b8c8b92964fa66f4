//! Build status poller
//!
//! Follows a running build until the CI server reports `SUCCESS` or
//! `FAILURE`. Any other result (still running, aborted, unstable) keeps
//! the poller going.

use chrono::Utc;
use relay_core::domain::build::TerminalResult;
use std::sync::Arc;
use std::time::Duration;
use tokio::time;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::repository::JenkinsRepository;
use crate::scheduler::{Phase, run_phase};

/// Polls a build until it reaches a terminal result
#[derive(Clone)]
pub struct BuildStatusPoller {
    jenkins: Arc<dyn JenkinsRepository>,
    interval: Duration,
    timeout: Option<Duration>,
}

impl BuildStatusPoller {
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

    /// Waits until the build reports a terminal result
    pub async fn await_completion(&self, job_name: &str, build_number: u64) -> Result<TerminalResult> {
        let jenkins = Arc::clone(&self.jenkins);
        let job_name = job_name.to_string();
        let interval = self.interval;

        run_phase(
            Phase::Status,
            self.timeout,
            poll_until_terminal(jenkins, job_name, build_number, interval),
        )
        .await
    }
}

async fn poll_until_terminal(
    jenkins: Arc<dyn JenkinsRepository>,
    job_name: String,
    build_number: u64,
    interval: Duration,
) -> TerminalResult {
    let mut attempt: u64 = 0;

    loop {
        time::sleep(interval).await;
        attempt += 1;

        let info = match jenkins.build_info(&job_name, build_number).await {
            Ok(info) => info,
            Err(e) => {
                warn!(
                    "Failed to poll build {} #{} (attempt {}): {}",
                    job_name, build_number, attempt, e
                );
                continue;
            }
        };

        let Some(outcome) = info.outcome() else {
            debug!(
                "Build {} #{} not finished yet (result: {})",
                job_name,
                build_number,
                info.result.as_deref().unwrap_or("none")
            );
            continue;
        };

        let completed_at = info.reported_at().unwrap_or_else(|| {
            warn!(
                "Build {} #{} has no usable timestamp, using observation time",
                job_name, build_number
            );
            Utc::now()
        });

        info!(
            "Build {} #{} finished with {:?} after {} poll(s)",
            job_name, build_number, outcome, attempt
        );

        return TerminalResult {
            outcome,
            completed_at,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OrchestratorError;
    use crate::testing::{EventLog, ScriptedJenkins, finished, running, unreachable};
    use relay_core::domain::build::BuildOutcome;

    const T1: i64 = 1_700_000_600_000;

    fn poller(jenkins: &Arc<ScriptedJenkins>) -> BuildStatusPoller {
        BuildStatusPoller::new(jenkins.clone(), Duration::from_secs(5))
    }

    #[tokio::test(start_paused = true)]
    async fn test_returns_on_first_terminal_result() {
        let jenkins = Arc::new(ScriptedJenkins::new(EventLog::default()).with_builds(vec![
            Ok(running()),
            Ok(running()),
            Ok(finished("SUCCESS", T1)),
        ]));

        let started = time::Instant::now();
        let result = poller(&jenkins).await_completion("deploy", 42).await.unwrap();

        assert_eq!(result.outcome, BuildOutcome::Success);
        assert_eq!(result.completed_at.timestamp_millis(), T1);
        assert_eq!(jenkins.count("build"), 3);
        assert!(started.elapsed() >= Duration::from_secs(15));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_is_terminal() {
        let jenkins = Arc::new(
            ScriptedJenkins::new(EventLog::default()).with_builds(vec![Ok(finished("FAILURE", T1))]),
        );

        let result = poller(&jenkins).await_completion("deploy", 42).await.unwrap();

        assert_eq!(result.outcome, BuildOutcome::Failure);
        assert_eq!(jenkins.count("build"), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_other_results_keep_polling() {
        let jenkins = Arc::new(ScriptedJenkins::new(EventLog::default()).with_builds(vec![
            Ok(finished("ABORTED", T1)),
            Ok(finished("UNSTABLE", T1)),
            Err(unreachable()),
            Ok(finished("SUCCESS", T1)),
        ]));

        let result = poller(&jenkins).await_completion("deploy", 42).await.unwrap();

        assert_eq!(result.outcome, BuildOutcome::Success);
        assert_eq!(jenkins.count("build"), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_hook() {
        let jenkins = Arc::new(ScriptedJenkins::new(EventLog::default()));

        let err = poller(&jenkins)
            .with_timeout(Some(Duration::from_secs(12)))
            .await_completion("deploy", 42)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            OrchestratorError::PhaseTimedOut {
                phase: Phase::Status,
                ..
            }
        ));
        assert_eq!(jenkins.count("build"), 2);
    }
}
