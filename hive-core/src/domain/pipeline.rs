//! Pipeline domain types

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Services keyed by name, in the order the hive declares them
pub type ServiceMap = IndexMap<String, ServiceDescriptor>;

/// A named pipeline, as described by the hive
///
/// The pipeline's own name is the key it is delivered under; it is not
/// repeated inside the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pipeline {
    /// Build-system (Jenkins) job URL
    pub jenkins_url: String,

    /// Broker management host, without scheme (e.g. "rabbit.local:15672")
    pub rabbitmq_url: String,

    /// Services in the order the hive declares them
    pub services: ServiceMap,
}

/// Static description of one service within a pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceDescriptor {
    /// Services whose output feeds this one
    pub predecessors: Vec<String>,

    /// Queue this service consumes from
    pub input_queue: String,

    /// Commands the service understands, beyond the built-in ones
    #[serde(default)]
    pub supported_commands: Vec<String>,
}

impl ServiceDescriptor {
    pub fn new(input_queue: impl Into<String>) -> Self {
        Self {
            predecessors: Vec::new(),
            input_queue: input_queue.into(),
            supported_commands: Vec::new(),
        }
    }

    pub fn with_predecessor(mut self, name: impl Into<String>) -> Self {
        self.predecessors.push(name.into());
        self
    }
}
