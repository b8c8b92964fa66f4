//! Queue endpoint

use relay_core::domain::build::QueueHandle;
use relay_core::dto::jenkins::QueueItem;

use crate::error::Result;
use crate::{JenkinsClient, api_json_url};

impl JenkinsClient {
    /// Read the current state of a queue entry
    pub async fn queue_item(&self, handle: &QueueHandle) -> Result<QueueItem> {
        self.get_json(&api_json_url(handle.url())).await
    }
}
