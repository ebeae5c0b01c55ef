//! Command and inspection targets

use std::str::FromStr;
use thiserror::Error;

/// A pipeline, optionally narrowed to one of its services
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Target {
    pub pipeline: String,
    pub service: Option<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TargetParseError {
    #[error("target must name a pipeline")]
    EmptyPipeline,

    #[error("target `{0}` names an empty service")]
    EmptyService(String),
}

impl Target {
    /// Targets a whole pipeline
    pub fn pipeline(pipeline: impl Into<String>) -> Self {
        Self {
            pipeline: pipeline.into(),
            service: None,
        }
    }

    /// Targets a single service of a pipeline
    pub fn service(pipeline: impl Into<String>, service: impl Into<String>) -> Self {
        Self {
            pipeline: pipeline.into(),
            service: Some(service.into()),
        }
    }

    /// Routing key form sent to the hive: `pipeline` or `pipeline.service`
    pub fn wire(&self) -> String {
        match &self.service {
            Some(service) => format!("{}.{}", self.pipeline, service),
            None => self.pipeline.clone(),
        }
    }

    /// Human-readable form used as a popup title: `pipeline::service`
    pub fn title(&self) -> String {
        match &self.service {
            Some(service) => format!("{}::{}", self.pipeline, service),
            None => self.pipeline.clone(),
        }
    }
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.wire())
    }
}

impl FromStr for Target {
    type Err = TargetParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (pipeline, service) = match s.split_once('.') {
            Some((pipeline, service)) => (pipeline, Some(service)),
            None => (s, None),
        };

        if pipeline.is_empty() {
            return Err(TargetParseError::EmptyPipeline);
        }

        match service {
            Some("") => Err(TargetParseError::EmptyService(s.to_string())),
            Some(service) => Ok(Target::service(pipeline, service)),
            None => Ok(Target::pipeline(pipeline)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_and_title_forms() {
        let target = Target::service("ingest", "B");
        assert_eq!(target.wire(), "ingest.B");
        assert_eq!(target.title(), "ingest::B");

        let pipeline = Target::pipeline("ingest");
        assert_eq!(pipeline.wire(), "ingest");
        assert_eq!(pipeline.title(), "ingest");
    }

    #[test]
    fn test_parse() {
        assert_eq!("ingest".parse(), Ok(Target::pipeline("ingest")));
        assert_eq!("ingest.B".parse(), Ok(Target::service("ingest", "B")));
        assert_eq!("".parse::<Target>(), Err(TargetParseError::EmptyPipeline));
        assert_eq!(".B".parse::<Target>(), Err(TargetParseError::EmptyPipeline));
        assert!(matches!(
            "ingest.".parse::<Target>(),
            Err(TargetParseError::EmptyService(_))
        ));
    }
}
