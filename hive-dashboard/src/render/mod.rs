//! Graph renderer adapter
//!
//! Owns one [`GraphHandle`] per drawn pipeline. Structure is only ever created
//! by [`Renderer::draw_all`] (the initial draw and the explicit rebuild path);
//! the poll loop goes through [`GraphHandle::apply_statuses`].

pub mod graph;
pub mod layout;

pub use graph::GraphHandle;
pub use layout::{LayoutEngine, TextLayout};

use hive_client::Snapshot;
use hive_core::topology::compile_pipeline;
use tracing::debug;

use crate::mediator::DashboardEvent;

pub struct Renderer {
    layout: Box<dyn LayoutEngine>,
    graphs: Vec<GraphHandle>,
}

impl Renderer {
    pub fn new(layout: Box<dyn LayoutEngine>) -> Self {
        Self {
            layout,
            graphs: Vec::new(),
        }
    }

    /// Tears down every drawn graph and draws the snapshot's pipelines
    pub fn draw_all(&mut self, snapshot: &Snapshot) -> usize {
        self.graphs = snapshot
            .info
            .iter()
            .map(|(name, pipeline)| GraphHandle::draw(name, compile_pipeline(pipeline)))
            .collect();
        debug!("Drew {} pipeline graph(s)", self.graphs.len());
        self.graphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graphs.is_empty()
    }

    pub fn graphs_mut(&mut self) -> impl Iterator<Item = &mut GraphHandle> {
        self.graphs.iter_mut()
    }

    pub fn get(&self, pipeline: &str) -> Option<&GraphHandle> {
        self.graphs.iter().find(|g| g.pipeline() == pipeline)
    }

    /// Whether the snapshot's topology differs from what is drawn
    pub fn needs_rebuild(&self, snapshot: &Snapshot) -> bool {
        if snapshot.info.len() != self.graphs.len() {
            return true;
        }
        snapshot
            .info
            .iter()
            .zip(&self.graphs)
            .any(|((name, pipeline), handle)| {
                name != handle.pipeline() || &compile_pipeline(pipeline) != handle.graph()
            })
    }

    /// Routes a click on a pipeline section or one of its nodes
    pub fn click(&self, pipeline: &str, service: Option<&str>) -> Option<DashboardEvent> {
        let handle = self.get(pipeline)?;
        match service {
            Some(service) => handle.click(service),
            None => Some(handle.click_section()),
        }
    }

    /// Lays out every drawn graph
    pub fn render(&self) -> String {
        self.graphs
            .iter()
            .map(|handle| self.layout.layout(handle))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
