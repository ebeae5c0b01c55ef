//! Drawn pipeline graphs
//!
//! A [`GraphHandle`] is the live visual state of one pipeline: its compiled
//! structure, fixed at draw time, and the style classes of each node. Polls
//! only ever touch the status classes.

use hive_core::domain::state::Status;
use hive_core::domain::target::Target;
use hive_core::topology::CompiledGraph;
use std::collections::{BTreeMap, BTreeSet};

use crate::mediator::DashboardEvent;

/// Class every node carries regardless of status
pub const NODE_CLASS: &str = "node";

/// One drawn vertex
#[derive(Debug, Clone)]
pub struct NodeView {
    pub name: String,
    classes: BTreeSet<String>,
    on_click: Target,
}

impl NodeView {
    #[cfg(test)]
    pub fn classes(&self) -> &BTreeSet<String> {
        &self.classes
    }

    /// The single status class currently applied, if any
    pub fn status(&self) -> Option<Status> {
        Status::ALL
            .into_iter()
            .find(|s| self.classes.contains(s.as_str()))
    }
}

/// Visual handle of a drawn pipeline
#[derive(Debug, Clone)]
pub struct GraphHandle {
    pipeline: String,
    graph: CompiledGraph,
    nodes: Vec<NodeView>,
}

impl GraphHandle {
    /// Builds nodes for every vertex, each bound to open its own inspector
    pub fn draw(pipeline: &str, graph: CompiledGraph) -> Self {
        let nodes = graph
            .vertices
            .iter()
            .map(|name| NodeView {
                name: name.clone(),
                classes: BTreeSet::from([NODE_CLASS.to_string()]),
                on_click: Target::service(pipeline, name.as_str()),
            })
            .collect();

        Self {
            pipeline: pipeline.to_string(),
            graph,
            nodes,
        }
    }

    pub fn pipeline(&self) -> &str {
        &self.pipeline
    }

    pub fn graph(&self) -> &CompiledGraph {
        &self.graph
    }

    pub fn nodes(&self) -> &[NodeView] {
        &self.nodes
    }

    pub fn node(&self, name: &str) -> Option<&NodeView> {
        self.nodes.iter().find(|n| n.name == name)
    }

    /// Event fired by clicking a node
    pub fn click(&self, name: &str) -> Option<DashboardEvent> {
        self.node(name)
            .map(|node| DashboardEvent::OpenPopup(node.on_click.clone()))
    }

    /// Event fired by clicking the pipeline section outside any node
    pub fn click_section(&self) -> DashboardEvent {
        DashboardEvent::OpenPopup(Target::pipeline(self.pipeline.as_str()))
    }

    /// Sets each mentioned node to exactly one status class
    ///
    /// All status classes are removed before the current one is added, so
    /// repeated or out-of-order calls never leave two statuses on a node.
    /// Names that are not vertices are ignored and nodes not mentioned keep
    /// their classes. Returns the number of nodes updated.
    pub fn apply_statuses(&mut self, statuses: &BTreeMap<String, Status>) -> usize {
        let mut applied = 0;
        for node in &mut self.nodes {
            let Some(status) = statuses.get(&node.name) else {
                continue;
            };
            for stale in Status::ALL {
                node.classes.remove(stale.as_str());
            }
            node.classes.insert(status.as_str().to_string());
            applied += 1;
        }
        applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hive_core::domain::pipeline::{ServiceDescriptor, ServiceMap};
    use hive_core::topology::compile;

    fn handle() -> GraphHandle {
        let services: ServiceMap = [
            ("A".to_string(), ServiceDescriptor::new("q0")),
            ("B".to_string(), ServiceDescriptor::new("q1").with_predecessor("A")),
        ]
        .into_iter()
        .collect();
        GraphHandle::draw("ingest", compile(&services, "rabbit"))
    }

    fn statuses(pairs: &[(&str, Status)]) -> BTreeMap<String, Status> {
        pairs.iter().map(|(n, s)| (n.to_string(), *s)).collect()
    }

    fn status_classes(node: &NodeView) -> Vec<&str> {
        node.classes()
            .iter()
            .map(String::as_str)
            .filter(|c| *c != NODE_CLASS)
            .collect()
    }

    #[test]
    fn test_apply_sets_single_class() {
        let mut handle = handle();
        handle.apply_statuses(&statuses(&[("B", Status::Up)]));

        let b = handle.node("B").unwrap();
        assert_eq!(status_classes(b), vec!["up"]);
        assert!(!b.classes().contains("down"));
        assert!(!b.classes().contains("suspended"));
        assert!(b.classes().contains(NODE_CLASS));
        assert_eq!(handle.node("A").unwrap().status(), None);
    }

    #[test]
    fn test_apply_is_idempotent() {
        let mut handle = handle();
        let mapping = statuses(&[("A", Status::Down), ("B", Status::Suspended)]);
        handle.apply_statuses(&mapping);
        let once: Vec<_> = handle.nodes().iter().map(|n| n.classes().clone()).collect();
        handle.apply_statuses(&mapping);
        let twice: Vec<_> = handle.nodes().iter().map(|n| n.classes().clone()).collect();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_status_changes_replace_previous_class() {
        let mut handle = handle();
        for status in [Status::Up, Status::Suspended, Status::Down, Status::Up] {
            handle.apply_statuses(&statuses(&[("A", status)]));
            let a = handle.node("A").unwrap();
            assert_eq!(a.status(), Some(status));
            assert_eq!(status_classes(a).len(), 1);
        }
    }

    #[test]
    fn test_apply_never_changes_structure() {
        let mut handle = handle();
        let before = handle.graph().clone();
        let applied = handle.apply_statuses(&statuses(&[("A", Status::Up), ("ghost", Status::Down)]));

        assert_eq!(applied, 1);
        assert_eq!(handle.graph(), &before);
        assert_eq!(handle.nodes().len(), 2);
        assert!(handle.node("ghost").is_none());
    }

    #[test]
    fn test_click_bindings() {
        let handle = handle();
        match handle.click("B") {
            Some(DashboardEvent::OpenPopup(target)) => {
                assert_eq!(target, Target::service("ingest", "B"))
            }
            other => panic!("unexpected click result: {:?}", other),
        }
        assert!(handle.click("missing").is_none());
        match handle.click_section() {
            DashboardEvent::OpenPopup(target) => assert_eq!(target, Target::pipeline("ingest")),
            other => panic!("unexpected click result: {:?}", other),
        }
    }
}
