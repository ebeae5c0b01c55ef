//! Snapshot endpoint

use crate::HiveClient;
use crate::error::Result;
use hive_core::dto::snapshot::Snapshot;
use tracing::debug;

impl HiveClient {
    // =============================================================================
    // Pipeline Snapshots
    // =============================================================================

    /// Fetch the topology and state of every pipeline
    ///
    /// The snapshot is validated before it is returned, so callers can rely on
    /// every declared service having a state record.
    pub async fn fetch_snapshot(&self) -> Result<Snapshot> {
        let url = format!("{}/_pipelines", self.base_url);
        let response = self.client.get(&url).send().await?;

        let snapshot: Snapshot = self.handle_response(response).await?;
        snapshot.validate()?;

        debug!("Fetched snapshot with {} pipeline(s)", snapshot.info.len());
        Ok(snapshot)
    }
}
