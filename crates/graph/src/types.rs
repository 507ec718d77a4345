use serde::{Deserialize, Serialize};

/// Rendering weight shared by every node. The viewer sizes nodes uniformly;
/// the field exists because the renderer's input format requires one.
pub const NODE_WEIGHT: f64 = 1.0;

/// A graph vertex as the viewer consumes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    /// Opaque backend identifier, unique within a workspace graph.
    pub id: String,
    /// Human-readable label; never empty (normalization guarantees this).
    pub display_name: String,
    /// Constant rendering hint, see [`NODE_WEIGHT`].
    pub weight: f64,
    /// Categorical tag used only for color assignment.
    pub group: Option<String>,
}

/// A graph connection. Directed (source → target) for arrowhead display,
/// undirected for traversal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source_id: String,
    pub target_id: String,
    pub label_ko: Option<String>,
    pub label_en: Option<String>,
}

/// The currently rendered subgraph, derived from a [`GraphSnapshot`] by the
/// last search or reset. Self-contained: the renderer needs nothing else.
///
/// Invariant: both endpoints of every edge are present in `nodes`.
///
/// [`GraphSnapshot`]: crate::GraphSnapshot
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilteredView {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl FilteredView {
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
