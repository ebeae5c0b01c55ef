//! Topology compiler
//!
//! Turns a pipeline's service map into the vertex and edge lists handed to the
//! renderer. The output is a pure function of the input, so comparing two
//! compiled graphs is enough to decide whether a drawn graph is out of date.

use crate::domain::pipeline::{Pipeline, ServiceMap};

/// Label attached to an edge: the queue that connects the two services
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeLabel {
    /// Queue name, shown as the label text
    pub queue: String,

    /// Broker management page for the queue
    pub link: String,
}

impl EdgeLabel {
    pub fn new(rabbitmq_url: &str, queue: &str) -> Self {
        Self {
            queue: queue.to_string(),
            link: queue_link(rabbitmq_url, queue),
        }
    }
}

/// Directed edge from a predecessor to the service consuming its output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub from: String,
    pub to: String,
    pub label: EdgeLabel,
}

/// Renderable form of a pipeline
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompiledGraph {
    /// Service names in delivery order
    pub vertices: Vec<String>,
    pub edges: Vec<Edge>,
}

impl CompiledGraph {
    /// Edges ending at `name`, in predecessor order
    pub fn incoming<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.iter().filter(move |e| e.to == name)
    }
}

/// Builds the broker management URL for a queue on the default vhost
pub fn queue_link(rabbitmq_url: &str, queue: &str) -> String {
    format!("http://{}/#/queues/%2F/{}", rabbitmq_url, queue)
}

/// Compiles a service map into vertices and queue-labelled edges
///
/// Every predecessor listed by a service yields one edge, labelled with the
/// consuming service's input queue. Predecessors that are not themselves in
/// the map and cycles are passed through untouched.
pub fn compile(services: &ServiceMap, rabbitmq_url: &str) -> CompiledGraph {
    let vertices: Vec<String> = services.keys().cloned().collect();

    let edges = services
        .iter()
        .flat_map(|(name, service)| {
            service.predecessors.iter().map(move |predecessor| Edge {
                from: predecessor.clone(),
                to: name.clone(),
                label: EdgeLabel::new(rabbitmq_url, &service.input_queue),
            })
        })
        .collect();

    CompiledGraph { vertices, edges }
}

/// Compiles a pipeline using its own broker URL
pub fn compile_pipeline(pipeline: &Pipeline) -> CompiledGraph {
    compile(&pipeline.services, &pipeline.rabbitmq_url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::pipeline::ServiceDescriptor;

    fn ingest() -> ServiceMap {
        [
            ("A".to_string(), ServiceDescriptor::new("q0")),
            ("B".to_string(), ServiceDescriptor::new("q1").with_predecessor("A")),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_compile_two_services() {
        let graph = compile(&ingest(), "rabbit:15672");

        assert_eq!(graph.vertices, vec!["A".to_string(), "B".to_string()]);
        assert_eq!(graph.edges.len(), 1);
        let edge = &graph.edges[0];
        assert_eq!((edge.from.as_str(), edge.to.as_str()), ("A", "B"));
        assert_eq!(edge.label.queue, "q1");
        assert_eq!(edge.label.link, "http://rabbit:15672/#/queues/%2F/q1");
    }

    #[test]
    fn test_compile_is_deterministic() {
        let services = ingest();
        assert_eq!(compile(&services, "r"), compile(&services, "r"));
    }

    #[test]
    fn test_one_edge_per_predecessor() {
        let services: ServiceMap = [
            ("src1".to_string(), ServiceDescriptor::new("in1")),
            ("src2".to_string(), ServiceDescriptor::new("in2")),
            (
                "join".to_string(),
                ServiceDescriptor::new("joined")
                    .with_predecessor("src1")
                    .with_predecessor("src2"),
            ),
        ]
        .into_iter()
        .collect();

        let graph = compile(&services, "r");
        let incoming: Vec<(&str, &str)> = graph
            .incoming("join")
            .map(|e| (e.from.as_str(), e.label.queue.as_str()))
            .collect();
        assert_eq!(incoming, vec![("src1", "joined"), ("src2", "joined")]);
        assert_eq!(graph.edges.len(), 2);
    }

    #[test]
    fn test_vertices_keep_delivery_order() {
        let services: ServiceMap = [
            ("zeta".to_string(), ServiceDescriptor::new("z")),
            ("alpha".to_string(), ServiceDescriptor::new("a").with_predecessor("zeta")),
        ]
        .into_iter()
        .collect();

        let graph = compile(&services, "r");
        assert_eq!(graph.vertices, vec!["zeta".to_string(), "alpha".to_string()]);
    }

    #[test]
    fn test_cycles_pass_through() {
        let services: ServiceMap = [
            ("a".to_string(), ServiceDescriptor::new("qa").with_predecessor("b")),
            ("b".to_string(), ServiceDescriptor::new("qb").with_predecessor("a")),
            ("c".to_string(), ServiceDescriptor::new("qc").with_predecessor("c")),
        ]
        .into_iter()
        .collect();

        let graph = compile(&services, "r");
        assert_eq!(graph.edges.len(), 3);
        assert!(graph.edges.iter().any(|e| e.from == "c" && e.to == "c"));
    }

    #[test]
    fn test_topology_change_is_detected() {
        let before = compile(&ingest(), "r");
        let mut services = ingest();
        services.insert("C".to_string(), ServiceDescriptor::new("q2").with_predecessor("B"));
        assert_ne!(before, compile(&services, "r"));
    }
}
