//! Operator notifications
//!
//! Short, non-blocking messages shown to the operator, the terminal
//! counterpart of toast popups. Every failure the dashboard survives is
//! reported here; the wording keeps the three command outcomes distinct.

use colored::*;
use hive_client::ClientError;

/// Severity of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: Level,
    pub title: String,
    pub message: String,
}

impl Notification {
    pub fn new(level: Level, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            title: title.into(),
            message: message.into(),
        }
    }

    /// The dashboard's own server could not be reached
    pub fn connection_lost() -> Self {
        Self::new(Level::Warning, "Connection lost", "Can't connect to the hive.")
    }

    /// The hive answered with pipeline data that cannot be used
    pub fn invalid_snapshot(reason: impl std::fmt::Display) -> Self {
        Self::new(
            Level::Error,
            "Invalid snapshot",
            format!("The hive sent unusable pipeline data: {}", reason),
        )
    }

    /// Picks the notification for a failed snapshot fetch
    ///
    /// Only a body that arrived and broke the data contract counts as an
    /// invalid snapshot; every other failure means the hive is out of reach.
    pub fn snapshot_failed(error: &ClientError) -> Self {
        match error {
            ClientError::ParseError(_) | ClientError::InvalidSnapshot(_) => {
                Self::invalid_snapshot(error)
            }
            ClientError::RequestFailed(_)
            | ClientError::HiveDisconnect(_)
            | ClientError::ApiError { .. } => Self::connection_lost(),
        }
    }

    pub fn command_sent(command: &str) -> Self {
        Self::new(
            Level::Success,
            "Command sent!",
            format!("Successfully sent {} command.", command),
        )
    }

    /// The hive answered but cannot reach the message bus
    pub fn hive_disconnect() -> Self {
        Self::new(
            Level::Error,
            "Hive-side error",
            "Unable to send command due to disconnect from global MQ.",
        )
    }

    /// The command never reached the hive
    pub fn sending_failed(command: &str) -> Self {
        Self::new(
            Level::Error,
            "Sending failed",
            format!("Unable to send {} command. Can't connect to the hive.", command),
        )
    }

    pub fn unrecognized_status(pipeline: &str, service: &str, value: &str) -> Self {
        Self::new(
            Level::Error,
            "Unknown status",
            format!("{}::{} reported status `{}`.", pipeline, service, value),
        )
    }

    pub fn no_target() -> Self {
        Self::new(
            Level::Warning,
            "No target",
            "Open a pipeline or service before sending commands.",
        )
    }
}

/// Surface notifications are delivered to
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Prints notifications to stdout, coloured by level
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, notification: Notification) {
        let title = match notification.level {
            Level::Success => notification.title.green().bold(),
            Level::Warning => notification.title.yellow().bold(),
            Level::Error => notification.title.red().bold(),
        };
        println!("{} {}", title, notification.message);
    }
}

#[cfg(test)]
pub use recording::RecordingNotifier;


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_outcomes_are_distinct() {
        let sent = Notification::command_sent("restart");
        let disconnect = Notification::hive_disconnect();
        let failed = Notification::sending_failed("restart");

        assert!(sent.message.contains("restart"));
        assert_eq!(sent.level, Level::Success);
        assert_ne!(disconnect.title, failed.title);
        assert_ne!(disconnect.message, failed.message);
        assert!(failed.message.contains("restart"));
    }

    #[test]
    fn test_snapshot_failures_are_told_apart() {
        let invalid = Notification::snapshot_failed(&ClientError::InvalidSnapshot(
            hive_core::dto::snapshot::SnapshotError::MissingServiceState {
                pipeline: "ingest".to_string(),
                service: "B".to_string(),
            },
        ));
        assert_eq!(invalid.title, "Invalid snapshot");
        assert_eq!(invalid.level, Level::Error);
        assert!(invalid.message.contains("ingest.B"));

        let garbled = Notification::snapshot_failed(&ClientError::ParseError("eof".to_string()));
        assert_eq!(garbled.title, "Invalid snapshot");
        assert!(garbled.message.contains("eof"));

        let down = Notification::snapshot_failed(&ClientError::HiveDisconnect("gone".to_string()));
        assert_eq!(down, Notification::connection_lost());

        let refused = Notification::snapshot_failed(&ClientError::api_error(500, "boom"));
        assert_eq!(refused, Notification::connection_lost());
    }

    #[test]
    fn test_recording_notifier() {
        let notifier = RecordingNotifier::default();
        notifier.notify(Notification::connection_lost());
        notifier.notify(Notification::connection_lost());
        assert_eq!(notifier.count("Connection lost"), 2);
    }
}
