//! Render adapter seam
//!
//! Drawing and layout physics live outside this crate. The scheduler hands
//! each reconciled graph to a [`RenderAdapter`] as a borrowed view; the
//! adapter copies whatever it needs to keep.

use newsgraph_core::{GraphView, NodeKind};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::io::Write;
use tracing::{info, warn};

/// Where and how large the graph is drawn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderTarget {
    /// Container selector
    pub container: String,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

/// Consumer of reconciled graphs
pub trait RenderAdapter: Send + Sync {
    /// Attach to a render target; called once by `NewsGraph::init`
    fn mount(&self, _target: &RenderTarget) {}

    /// Replace the working set after a completed reconciliation
    ///
    /// Called with the store locked; do not block.
    fn set_graph(&self, graph: GraphView<'_>);

    /// Render area changed
    fn resize(&self, _width: u32, _height: u32) {}
}

/// Logs a one-line summary of every graph
#[derive(Debug, Clone, Copy, Default)]
pub struct LogRenderer;

impl RenderAdapter for LogRenderer {
    fn mount(&self, target: &RenderTarget) {
        info!(container = %target.container, width = target.width, height = target.height, "render target mounted");
    }

    fn set_graph(&self, graph: GraphView<'_>) {
        let authors = graph.nodes().filter(|n| n.kind() == NodeKind::Author).count();
        let stories = graph.node_count() - authors;
        let busiest = graph
            .nodes()
            .filter(|n| n.kind() == NodeKind::Author)
            .max_by_key(|n| n.weight())
            .map(|n| n.key().to_owned());

        info!(
            authors,
            stories,
            links = graph.link_count(),
            busiest_author = busiest.as_deref().unwrap_or("-"),
            "graph updated"
        );
    }

    fn resize(&self, width: u32, height: u32) {
        info!(width, height, "render target resized");
    }
}

/// Writes each graph as one line of JSON
///
/// Output line: `{"nodes": [...], "links": [...]}`.
#[derive(Debug)]
pub struct JsonRenderer<W> {
    out: Mutex<W>,
}

impl<W: Write + Send> JsonRenderer<W> {
    /// Write to `out`
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    /// Recover the writer
    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }
}

impl<W: Write + Send> RenderAdapter for JsonRenderer<W> {
    fn set_graph(&self, graph: GraphView<'_>) {
        let snapshot = graph.to_snapshot();
        let mut out = self.out.lock();
        let written = serde_json::to_writer(&mut *out, &snapshot)
            .map_err(std::io::Error::from)
            .and_then(|()| out.write_all(b"\n"))
            .and_then(|()| out.flush());
        if let Err(error) = written {
            warn!(%error, "failed to write graph snapshot");
        }
    }
}
