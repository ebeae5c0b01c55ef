//! Service state domain types

use chrono::{DateTime, SecondsFormat};
use serde::{Deserialize, Serialize};

/// Shown wherever a timestamp is unknown or undefined
pub const TIME_PLACEHOLDER: &str = "-";

/// Operational status of a service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Heartbeats are arriving and the service is processing
    Up,

    /// No recent heartbeat
    Down,

    /// Heartbeats are arriving but processing is paused
    Suspended,
}

impl Status {
    /// Every member of the closed status set
    pub const ALL: [Status; 3] = [Status::Up, Status::Down, Status::Suspended];

    /// Wire name, also used as the node's style class
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Up => "up",
            Status::Down => "down",
            Status::Suspended => "suspended",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Live state of one service at a poll instant
///
/// `pipeline_state` is kept as delivered; turning it into a [`Status`] is the
/// classifier's job so that an unknown value can be reported instead of
/// failing the whole snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceState {
    pub pipeline_state: String,

    #[serde(default)]
    pub last_received_message_datetime: Option<MessageTime>,

    #[serde(default)]
    pub last_sent_message_datetime: Option<MessageTime>,

    #[serde(default)]
    pub last_heartbeat_datetime: Option<MessageTime>,
}

impl ServiceState {
    pub fn new(pipeline_state: impl Into<String>) -> Self {
        Self {
            pipeline_state: pipeline_state.into(),
            last_received_message_datetime: None,
            last_sent_message_datetime: None,
            last_heartbeat_datetime: None,
        }
    }
}

/// A timestamp as reported by a service heartbeat
///
/// Services report either a preformatted string or seconds since the epoch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageTime {
    Epoch(f64),
    Text(String),
}

impl MessageTime {
    /// Renders an optional timestamp, falling back to [`TIME_PLACEHOLDER`]
    pub fn display_or_placeholder(time: Option<&MessageTime>) -> String {
        time.map(|t| t.to_string())
            .unwrap_or_else(|| TIME_PLACEHOLDER.to_string())
    }
}

impl std::fmt::Display for MessageTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageTime::Text(text) => f.write_str(text),
            MessageTime::Epoch(seconds) => {
                let whole = seconds.trunc() as i64;
                let nanos = (seconds.fract() * 1e9) as u32;
                match DateTime::from_timestamp(whole, nanos) {
                    Some(at) => f.write_str(&at.to_rfc3339_opts(SecondsFormat::Secs, true)),
                    None => write!(f, "{}", seconds),
                }
            }
        }
    }
}
