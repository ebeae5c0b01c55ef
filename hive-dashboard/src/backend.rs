//! Backend seam
//!
//! The dashboard reaches the hive only through [`Backend`], so the poll loop,
//! inspector and dispatcher can be driven by an in-memory fake in tests.

use async_trait::async_trait;
use hive_client::{HiveClient, Result, Snapshot};
use hive_core::dto::command::SendCommand;

/// Operations the dashboard needs from the hive
#[async_trait]
pub trait Backend: Send + Sync {
    /// Fetches topology and state of every pipeline
    async fn fetch_snapshot(&self) -> Result<Snapshot>;

    /// Relays one operator command
    async fn send_command(&self, req: &SendCommand) -> Result<()>;
}

#[async_trait]
impl Backend for HiveClient {
    async fn fetch_snapshot(&self) -> Result<Snapshot> {
        HiveClient::fetch_snapshot(self).await
    }

    async fn send_command(&self, req: &SendCommand) -> Result<()> {
        HiveClient::send_command(self, req).await
    }
}

#[cfg(test)]
pub mod fake {
    //! Scripted backend for tests

    use super::*;
    use hive_client::ClientError;
    use hive_core::dto::snapshot::SnapshotError;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// How the fake answers a command
    #[derive(Debug, Clone, Copy)]
    pub enum Reply {
        Accept,
        Disconnect,
        Unreachable,
    }

    /// Backend serving a fixed snapshot and scripted command replies
    pub struct FakeBackend {
        snapshot: Mutex<Option<Snapshot>>,
        invalid: Mutex<bool>,
        replies: Mutex<VecDeque<Reply>>,
        sent: Mutex<Vec<SendCommand>>,
        fetches: Mutex<usize>,
    }

    impl FakeBackend {
        pub fn new(snapshot: Option<Snapshot>) -> Self {
            Self {
                snapshot: Mutex::new(snapshot),
                invalid: Mutex::new(false),
                replies: Mutex::new(VecDeque::new()),
                sent: Mutex::new(Vec::new()),
                fetches: Mutex::new(0),
            }
        }

        /// Makes every following fetch fail (`None`) or succeed
        pub fn set_snapshot(&self, snapshot: Option<Snapshot>) {
            *self.snapshot.lock().unwrap() = snapshot;
        }

        /// Makes every following fetch answer with a snapshot that fails
        /// validation
        pub fn set_invalid(&self, invalid: bool) {
            *self.invalid.lock().unwrap() = invalid;
        }

        pub fn push_reply(&self, reply: Reply) {
            self.replies.lock().unwrap().push_back(reply);
        }

        pub fn sent(&self) -> Vec<SendCommand> {
            self.sent.lock().unwrap().clone()
        }

        pub fn fetches(&self) -> usize {
            *self.fetches.lock().unwrap()
        }
    }

    /// Produces a genuine transport error by calling a closed port
    async fn transport_error() -> ClientError {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        HiveClient::new(format!("http://{}", addr))
            .fetch_snapshot()
            .await
            .unwrap_err()
    }

    #[async_trait]
    impl Backend for FakeBackend {
        async fn fetch_snapshot(&self) -> Result<Snapshot> {
            *self.fetches.lock().unwrap() += 1;
            if *self.invalid.lock().unwrap() {
                return Err(ClientError::InvalidSnapshot(SnapshotError::MissingServiceState {
                    pipeline: "ingest".to_string(),
                    service: "B".to_string(),
                }));
            }
            let snapshot = self.snapshot.lock().unwrap().clone();
            match snapshot {
                Some(snapshot) => Ok(snapshot),
                None => Err(transport_error().await),
            }
        }

        async fn send_command(&self, req: &SendCommand) -> Result<()> {
            self.sent.lock().unwrap().push(req.clone());
            let reply = self.replies.lock().unwrap().pop_front().unwrap_or(Reply::Accept);
            match reply {
                Reply::Accept => Ok(()),
                Reply::Disconnect => Err(ClientError::HiveDisconnect("Failure".to_string())),
                Reply::Unreachable => Err(transport_error().await),
            }
        }
    }

    /// The two-service pipeline used across tests
    pub fn ingest_snapshot(a: &str, b: &str) -> Snapshot {
        let json = serde_json::json!({
            "info": {
                "ingest": {
                    "jenkins_url": "http://ci/job/ingest",
                    "rabbitmq_url": "rabbit:15672",
                    "services": {
                        "A": {"predecessors": [], "input_queue": "q0", "supported_commands": []},
                        "B": {"predecessors": ["A"], "input_queue": "q1", "supported_commands": ["flush", "reload_mapping"]}
                    }
                }
            },
            "state": {
                "ingest": {
                    "A": {"pipeline_state": a, "last_received_message_datetime": null, "last_sent_message_datetime": null},
                    "B": {"pipeline_state": b, "last_received_message_datetime": "2024-03-01 10:00:00", "last_sent_message_datetime": 1709287200.0}
                }
            }
        });
        serde_json::from_value(json).unwrap()
    }
}
