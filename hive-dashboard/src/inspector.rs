//! Inspector popup
//!
//! Opening a target fetches a fresh snapshot and fills a [`PopupView`] with
//! links, timestamps and the commands the service understands. The popup
//! always opens: when the hive cannot be reached the view is filled with
//! placeholders instead.

use colored::*;
use hive_client::Snapshot;
use hive_core::domain::state::{MessageTime, TIME_PLACEHOLDER};
use hive_core::domain::target::Target;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::backend::Backend;
use crate::config::Config;
use crate::notify::{Level, Notification, Notifier};

/// Everything the popup shows for one target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopupView {
    pub title: String,
    pub jenkins_link: String,
    pub log_link: String,
    pub last_received: String,
    pub last_sent: String,
    pub supported_commands: Vec<String>,
    /// Free-text command field, cleared on every open
    pub custom_command: String,
    /// Free-text argument field, cleared on every open
    pub custom_arguments: String,
}

impl std::fmt::Display for PopupView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.title.bold())?;
        writeln!(f, "  Last received: {}", self.last_received)?;
        writeln!(f, "  Last sent:     {}", self.last_sent)?;
        writeln!(f, "  Jenkins: {}", self.jenkins_link.dimmed())?;
        writeln!(f, "  Logs:    {}", self.log_link.dimmed())?;
        if self.supported_commands.is_empty() {
            write!(f, "  Commands: shutdown, suspend, resume")
        } else {
            write!(
                f,
                "  Commands: shutdown, suspend, resume, {}",
                self.supported_commands.join(", ")
            )
        }
    }
}

/// An open popup, scoped to exactly one target
///
/// Dropping the session is closing the popup.
#[derive(Debug, Clone)]
pub struct InspectorSession {
    pub target: Target,
    pub view: PopupView,
}

/// Builds the log search deep link for a pipeline or service
///
/// Matches containers built from the pipeline's image and, for a service,
/// containers named after it; heartbeat chatter is filtered out.
pub fn log_query_link(kibana_url: &str, pipeline: &str, service: Option<&str>) -> String {
    let mut query = format!("container.image.name:*{}*", pipeline);
    if let Some(service) = service {
        query.push_str(&format!("%20AND%20container.name:*_{}*", service));
    }
    query.push_str("%20AND%20NOT%20message:heartbeat*");

    format!(
        "{}/app/kibana#/discover?_g=(filters:!(),refreshInterval:(pause:!t,value:0),\
         time:(from:now-3d,to:now))&_a=(columns:!(message),filters:!(),index:'filebeat-*',\
         interval:h,sort:!('@timestamp',desc),query:(language:kuery,query:'{}'))",
        kibana_url.trim_end_matches('/'),
        query
    )
}

#[derive(Clone)]
pub struct Inspector {
    backend: Arc<dyn Backend>,
    notifier: Arc<dyn Notifier>,
    default_jenkins_url: String,
    kibana_url: String,
}

impl Inspector {
    pub fn new(backend: Arc<dyn Backend>, notifier: Arc<dyn Notifier>, config: &Config) -> Self {
        Self {
            backend,
            notifier,
            default_jenkins_url: config.default_jenkins_url.clone(),
            kibana_url: config.kibana_url.clone(),
        }
    }

    /// Opens a popup for `target`
    pub async fn open(&self, target: Target) -> InspectorSession {
        debug!("Opening inspector for {}", target);

        let view = match self.backend.fetch_snapshot().await {
            Ok(snapshot) => self.fill(&target, &snapshot).unwrap_or_else(|| {
                warn!("Snapshot does not contain {}", target);
                self.notifier.notify(Notification::new(
                    Level::Warning,
                    "Unknown target",
                    format!("The hive does not report {}.", target.title()),
                ));
                self.placeholder(&target)
            }),
            Err(e) => {
                warn!("Failed to fetch snapshot for inspector: {}", e);
                self.notifier.notify(Notification::snapshot_failed(&e));
                self.placeholder(&target)
            }
        };

        InspectorSession { target, view }
    }

    fn fill(&self, target: &Target, snapshot: &Snapshot) -> Option<PopupView> {
        let pipeline = snapshot.pipeline(&target.pipeline)?;
        let mut view = self.empty_view(target, pipeline.jenkins_url.clone());

        if let Some(service) = &target.service {
            let descriptor = pipeline.services.get(service)?;
            let state = snapshot.service_state(&target.pipeline, service)?;
            view.last_received =
                MessageTime::display_or_placeholder(state.last_received_message_datetime.as_ref());
            view.last_sent =
                MessageTime::display_or_placeholder(state.last_sent_message_datetime.as_ref());
            view.supported_commands = descriptor.supported_commands.clone();
        }

        Some(view)
    }

    fn placeholder(&self, target: &Target) -> PopupView {
        self.empty_view(target, self.default_jenkins_url.clone())
    }

    fn empty_view(&self, target: &Target, jenkins_link: String) -> PopupView {
        PopupView {
            title: target.title(),
            jenkins_link,
            log_link: log_query_link(
                &self.kibana_url,
                &target.pipeline,
                target.service.as_deref(),
            ),
            last_received: TIME_PLACEHOLDER.to_string(),
            last_sent: TIME_PLACEHOLDER.to_string(),
            supported_commands: Vec::new(),
            custom_command: String::new(),
            custom_arguments: String::new(),
        }
    }
}
