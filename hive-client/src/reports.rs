//! Error report endpoint

use crate::HiveClient;
use crate::error::Result;
use hive_core::dto::errors::ErrorEntry;

impl HiveClient {
    /// Fetch the errors services have published to the hive, newest first
    pub async fn fetch_error_report(&self) -> Result<Vec<ErrorEntry>> {
        let url = format!("{}/errors", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("type", "json")])
            .send()
            .await?;

        self.handle_response(response).await
    }
}
