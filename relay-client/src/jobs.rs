//! Job trigger endpoint

use reqwest::Url;
use reqwest::header::LOCATION;
use relay_core::domain::build::QueueHandle;
use relay_core::domain::job::JobSpec;
use tracing::debug;

use crate::JenkinsClient;
use crate::error::{ClientError, Result};

impl JenkinsClient {
    /// Trigger a job and return a handle to its queue entry
    ///
    /// Uses `buildWithParameters` when the job carries parameters and
    /// `build` otherwise. The queue URL is read from the `Location` header.
    ///
    /// Submissions are never retried: a request that failed after reaching
    /// the server may still have queued a build.
    pub async fn submit(&self, spec: &JobSpec) -> Result<QueueHandle> {
        let url = self.trigger_url(spec)?;
        debug!("Submitting job {} to {}", spec.name, url.path());

        let response = self
            .client
            .post(url.clone())
            .basic_auth(&self.credentials.username, Some(&self.credentials.password))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() && !status.is_redirection() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty())
            .ok_or_else(|| ClientError::MissingLocation(url.path().to_string()))?;

        Ok(QueueHandle::new(location))
    }

    /// Build the trigger URL for a job
    ///
    /// The token comes first, then every parameter exactly once in order.
    pub fn trigger_url(&self, spec: &JobSpec) -> Result<Url> {
        let endpoint = if spec.is_parameterized() {
            "buildWithParameters"
        } else {
            "build"
        };

        let raw = format!("{}{}", self.job_url(&spec.name), endpoint);
        let mut url = Url::parse(&raw).map_err(|e| ClientError::InvalidUrl(format!("{}: {}", raw, e)))?;

        {
            let mut query = url.query_pairs_mut();
            query.append_pair("token", &self.build_token);
            for (key, value) in &spec.parameters {
                query.append_pair(key, value);
            }
        }

        Ok(url)
    }
}
