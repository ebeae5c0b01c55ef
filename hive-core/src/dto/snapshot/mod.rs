//! Snapshot DTOs
//!
//! One `GET /_pipelines` response: the topology of every pipeline plus the
//! current state of every service.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::pipeline::{Pipeline, ServiceDescriptor};
use crate::domain::state::ServiceState;

/// Per-service states of one pipeline
pub type PipelineStates = IndexMap<String, ServiceState>;

/// Full backend snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub info: IndexMap<String, Pipeline>,
    pub state: IndexMap<String, PipelineStates>,
}

/// Structural inconsistencies that serde alone does not catch
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SnapshotError {
    #[error("pipeline `{0}` has no state map")]
    MissingPipelineState(String),

    #[error("service `{pipeline}.{service}` has no state record")]
    MissingServiceState { pipeline: String, service: String },
}

impl Snapshot {
    pub fn pipeline(&self, name: &str) -> Option<&Pipeline> {
        self.info.get(name)
    }

    pub fn service(&self, pipeline: &str, service: &str) -> Option<&ServiceDescriptor> {
        self.info.get(pipeline)?.services.get(service)
    }

    pub fn pipeline_states(&self, pipeline: &str) -> Option<&PipelineStates> {
        self.state.get(pipeline)
    }

    pub fn service_state(&self, pipeline: &str, service: &str) -> Option<&ServiceState> {
        self.state.get(pipeline)?.get(service)
    }

    /// Checks that every declared service has a state record
    pub fn validate(&self) -> Result<(), SnapshotError> {
        for (name, pipeline) in self.info.iter() {
            let states = self
                .state
                .get(name)
                .ok_or_else(|| SnapshotError::MissingPipelineState(name.to_string()))?;

            if let Some(service) = pipeline.services.keys().find(|s| !states.contains_key(s.as_str())) {
                return Err(SnapshotError::MissingServiceState {
                    pipeline: name.to_string(),
                    service: service.to_string(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SNAPSHOT: &str = r#"{
        "info": {
            "ingest": {
                "name": "ingest",
                "jenkins_url": "http://ci/job/ingest",
                "rabbitmq_url": "rabbit:15672",
                "services": {
                    "A": {"predecessors": [], "input_queue": "q0", "supported_commands": []},
                    "B": {"predecessors": ["A"], "input_queue": "q1", "supported_commands": ["flush"]}
                }
            }
        },
        "state": {
            "ingest": {
                "A": {"pipeline_state": "up", "last_received_message_datetime": null, "last_sent_message_datetime": null},
                "B": {"pipeline_state": "suspended", "last_received_message_datetime": "t1", "last_sent_message_datetime": "t2"}
            }
        }
    }"#;

    #[test]
    fn test_decode_and_lookup() {
        let snapshot: Snapshot = serde_json::from_str(SNAPSHOT).unwrap();
        assert!(snapshot.validate().is_ok());
        assert_eq!(snapshot.pipeline("ingest").unwrap().jenkins_url, "http://ci/job/ingest");
        assert_eq!(
            snapshot.service("ingest", "B").unwrap().supported_commands,
            vec!["flush".to_string()]
        );
        assert_eq!(
            snapshot.service_state("ingest", "B").unwrap().pipeline_state,
            "suspended"
        );
        assert!(snapshot.service_state("ingest", "C").is_none());
        assert!(snapshot.pipeline("other").is_none());
    }

    #[test]
    fn test_missing_state_section_fails_decoding() {
        let json = r#"{"info": {}}"#;
        assert!(serde_json::from_str::<Snapshot>(json).is_err());
    }

    #[test]
    fn test_validate_reports_missing_states() {
        let mut snapshot: Snapshot = serde_json::from_str(SNAPSHOT).unwrap();

        let states: PipelineStates = snapshot
            .state
            .get("ingest")
            .unwrap()
            .iter()
            .filter(|(name, _)| *name != "B")
            .map(|(name, state)| (name.clone(), state.clone()))
            .collect();
        snapshot.state.insert("ingest".to_string(), states);
        assert_eq!(
            snapshot.validate(),
            Err(SnapshotError::MissingServiceState {
                pipeline: "ingest".to_string(),
                service: "B".to_string(),
            })
        );

        snapshot.state = IndexMap::new();
        assert_eq!(
            snapshot.validate(),
            Err(SnapshotError::MissingPipelineState("ingest".to_string()))
        );
    }
}
