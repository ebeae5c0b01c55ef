//! Command endpoint

use crate::HiveClient;
use crate::error::Result;
use hive_core::dto::command::SendCommand;
use tracing::debug;

impl HiveClient {
    // =============================================================================
    // Operator Commands
    // =============================================================================

    /// Relay a command to a pipeline or service
    ///
    /// # Errors
    /// * [`ClientError::HiveDisconnect`](crate::ClientError::HiveDisconnect) when
    ///   the hive answers 503 because it cannot reach the message bus
    /// * [`ClientError::RequestFailed`](crate::ClientError::RequestFailed) when
    ///   the hive itself cannot be reached
    pub async fn send_command(&self, req: &SendCommand) -> Result<()> {
        let url = format!("{}/send_command", self.base_url);
        debug!("Sending `{}` to {}", req.command, req.target);

        let response = self.client.post(&url).json(req).send().await?;

        self.handle_empty_response(response).await
    }
}
