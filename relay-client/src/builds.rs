//! Build endpoint

use relay_core::dto::jenkins::BuildInfo;

use crate::error::Result;
use crate::{JenkinsClient, api_json_url};

impl JenkinsClient {
    /// Read the current state of a build
    pub async fn build_info(&self, job_name: &str, build_number: u64) -> Result<BuildInfo> {
        self.get_json(&api_json_url(&self.build_url(job_name, build_number)))
            .await
    }

    /// `{base}/job/{name}/{number}/`
    pub fn build_url(&self, job_name: &str, build_number: u64) -> String {
        format!("{}{}/", self.job_url(job_name), build_number)
    }
}
