use crate::pattern::QueryPattern;
use crate::types::{FilteredView, GraphEdge, GraphNode, NODE_WEIGHT};
use kmap_protocol::RawGraphPayload;
use petgraph::graph::{EdgeIndex, Graph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::{HashMap, HashSet};

/// Immutable snapshot of a full workspace graph.
///
/// Built wholesale from one backend payload and replaced wholesale on the
/// next load; never mutated in place. Node iteration order is payload order,
/// which keeps filtered views and suggestions deterministic.
#[derive(Debug, Default)]
pub struct GraphSnapshot {
    graph: Graph<GraphNode, GraphEdge>,
    id_index: HashMap<String, NodeIndex>,
}

impl GraphSnapshot {
    /// Empty snapshot, used when no documents are selected.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Normalize a raw backend payload into a snapshot.
    ///
    /// Phase 1 creates nodes: records without a usable id or display name are
    /// dropped, as are duplicate ids (first record wins). Phase 2 creates
    /// edges: records with missing or dangling endpoints are dropped.
    /// Parallel edges between the same pair are kept distinct, since the
    /// backend emits one per semantic label.
    #[must_use]
    pub fn from_payload(payload: &RawGraphPayload) -> Self {
        let mut graph = Graph::new();
        let mut id_index: HashMap<String, NodeIndex> = HashMap::new();

        for raw in &payload.nodes {
            let Some(id) = raw.id.as_deref().map(str::trim).filter(|id| !id.is_empty()) else {
                log::warn!("dropping node record without _id");
                continue;
            };
            let Some(display_name) = raw.display_name() else {
                log::warn!("dropping node {id}: no label, term or key");
                continue;
            };
            if id_index.contains_key(id) {
                log::warn!("dropping duplicate node {id}");
                continue;
            }

            let node = GraphNode {
                id: id.to_string(),
                display_name: display_name.to_string(),
                weight: NODE_WEIGHT,
                group: raw.group().map(str::to_string),
            };
            let idx = graph.add_node(node);
            id_index.insert(id.to_string(), idx);
        }

        for raw in &payload.links {
            let (Some(from), Some(to)) = (raw.from.as_deref(), raw.to.as_deref()) else {
                log::warn!("dropping link record without endpoints");
                continue;
            };
            let (Some(&source), Some(&target)) = (id_index.get(from), id_index.get(to)) else {
                log::warn!("dropping dangling link {from} -> {to}");
                continue;
            };

            let edge = GraphEdge {
                source_id: from.to_string(),
                target_id: to.to_string(),
                label_ko: raw.label_ko.clone(),
                label_en: raw.label_en.clone(),
            };
            graph.add_edge(source, target, edge);
        }

        log::info!(
            "Built graph snapshot: {} nodes, {} edges",
            graph.node_count(),
            graph.edge_count()
        );

        Self { graph, id_index }
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.id_index.contains_key(id)
    }

    /// View containing the whole snapshot, as adopted after a load or reset.
    #[must_use]
    pub fn full_view(&self) -> FilteredView {
        let visited: HashSet<NodeIndex> = self.graph.node_indices().collect();
        let touched: HashSet<EdgeIndex> = self.graph.edge_indices().collect();
        self.materialize(&visited, &touched)
    }

    /// All nodes whose display name matches the query, in snapshot order.
    #[must_use]
    pub fn matching_nodes(&self, pattern: &QueryPattern) -> Vec<NodeIndex> {
        self.graph
            .node_indices()
            .filter(|&idx| pattern.matches(&self.graph[idx].display_name))
            .collect()
    }

    /// Breadth-first neighborhood of `seeds`, treating edges as undirected.
    ///
    /// Runs exactly `depth` rounds (clamped to at least 1). Every edge
    /// incident to a frontier node is collected, including edges into the
    /// final layer and edges back into already-visited nodes; nodes further
    /// than `depth` hops from every seed are excluded.
    #[must_use]
    pub fn expand(&self, seeds: &[NodeIndex], depth: usize) -> FilteredView {
        let depth = depth.max(1);
        let mut visited: HashSet<NodeIndex> = seeds.iter().copied().collect();
        let mut frontier: Vec<NodeIndex> = seeds.to_vec();
        let mut touched: HashSet<EdgeIndex> = HashSet::new();

        for _round in 0..depth {
            let mut next = Vec::new();
            for &node in &frontier {
                let incident = self
                    .graph
                    .edges_directed(node, Direction::Outgoing)
                    .chain(self.graph.edges_directed(node, Direction::Incoming));
                for edge in incident {
                    touched.insert(edge.id());
                    let neighbor = if edge.source() == node {
                        edge.target()
                    } else {
                        edge.source()
                    };
                    if visited.insert(neighbor) {
                        next.push(neighbor);
                    }
                }
            }
            if next.is_empty() {
                break;
            }
            frontier = next;
        }

        self.materialize(&visited, &touched)
    }

    /// Match then expand in one step. Returns `None` when nothing matches,
    /// leaving the caller's current view untouched.
    #[must_use]
    pub fn filter(&self, pattern: &QueryPattern, depth: usize) -> Option<FilteredView> {
        let seeds = self.matching_nodes(pattern);
        if seeds.is_empty() {
            return None;
        }
        log::debug!("query matched {} nodes, expanding depth {depth}", seeds.len());
        Some(self.expand(&seeds, depth))
    }

    /// Autocomplete: up to `limit` distinct display names containing
    /// `partial` (case-insensitive), in snapshot order. An empty `partial`
    /// yields nothing.
    #[must_use]
    pub fn suggest(&self, partial: &str, limit: usize) -> Vec<String> {
        if partial.is_empty() || limit == 0 {
            return Vec::new();
        }
        let needle = partial.to_lowercase();

        let mut seen = HashSet::new();
        let mut suggestions = Vec::new();
        for idx in self.graph.node_indices() {
            let name = &self.graph[idx].display_name;
            if name.to_lowercase().contains(&needle) && seen.insert(name.clone()) {
                suggestions.push(name.clone());
                if suggestions.len() == limit {
                    break;
                }
            }
        }
        suggestions
    }

    /// Copy the selected nodes and edges out of the snapshot, in snapshot
    /// order. Edges whose endpoints are not both visited are re-checked and
    /// excluded here, so the view is a well-formed subgraph by construction.
    fn materialize(
        &self,
        visited: &HashSet<NodeIndex>,
        touched: &HashSet<EdgeIndex>,
    ) -> FilteredView {
        let nodes = self
            .graph
            .node_indices()
            .filter(|idx| visited.contains(idx))
            .map(|idx| self.graph[idx].clone())
            .collect();

        let edges = self
            .graph
            .edge_indices()
            .filter(|idx| touched.contains(idx))
            .filter(|&idx| {
                self.graph
                    .edge_endpoints(idx)
                    .is_some_and(|(s, t)| visited.contains(&s) && visited.contains(&t))
            })
            .map(|idx| self.graph[idx].clone())
            .collect();

        FilteredView { nodes, edges }
    }
}
