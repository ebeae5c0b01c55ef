//! Layout engines
//!
//! Placing nodes is delegated to a [`LayoutEngine`]; the dashboard only hands
//! it a drawn graph and shows whatever comes back.

use colored::*;
use hive_core::domain::state::Status;

use crate::render::graph::GraphHandle;

/// Turns a drawn graph into something the operator can look at
pub trait LayoutEngine: Send {
    fn layout(&self, handle: &GraphHandle) -> String;
}

/// Plain terminal layout
///
/// Nodes are listed left to right in vertex order, followed by one line per
/// queue edge with its broker link.
pub struct TextLayout;

fn paint(status: Option<Status>) -> ColoredString {
    match status {
        Some(Status::Up) => "up".green(),
        Some(Status::Down) => "down".red(),
        Some(Status::Suspended) => "suspended".yellow(),
        None => "?".dimmed(),
    }
}

impl LayoutEngine for TextLayout {
    fn layout(&self, handle: &GraphHandle) -> String {
        let mut out = format!("{}\n", handle.pipeline().bold());

        let nodes: Vec<String> = handle
            .nodes()
            .iter()
            .map(|node| format!("[{} {}]", node.name, paint(node.status())))
            .collect();
        out.push_str(&format!("  {}\n", nodes.join("  ")));

        let graph = handle.graph();
        for edge in graph.vertices.iter().flat_map(|v| graph.incoming(v)) {
            out.push_str(&format!(
                "  {} -({})-> {}  {}\n",
                edge.from,
                edge.label.queue.cyan(),
                edge.to,
                edge.label.link.dimmed()
            ));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hive_core::domain::pipeline::{ServiceDescriptor, ServiceMap};
    use hive_core::topology::compile;

    #[test]
    fn test_text_layout_lists_nodes_and_queues() {
        let services: ServiceMap = [
            ("A".to_string(), ServiceDescriptor::new("q0")),
            ("B".to_string(), ServiceDescriptor::new("q1").with_predecessor("A")),
        ]
        .into_iter()
        .collect();
        let handle = GraphHandle::draw("ingest", compile(&services, "rabbit:15672"));

        let text = TextLayout.layout(&handle);
        assert!(text.contains("ingest"));
        assert!(text.contains("[A "));
        assert!(text.contains("[B "));
        assert!(text.contains("q1"));
        assert!(text.contains("http://rabbit:15672/#/queues/%2F/q1"));
    }
}
