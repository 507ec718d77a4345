//! # KMap Graph
//!
//! In-memory model of a workspace knowledge graph and the search/filter
//! logic that drives the graph viewer.
//!
//! ## Architecture
//!
//! ```text
//! RawGraphPayload (kmap-protocol)
//!     │
//!     ├──> GraphSnapshot (petgraph)
//!     │      ├─ Nodes: display name, weight, group
//!     │      ├─ Edges: directed for display, undirected for traversal
//!     │      └─ id -> NodeIndex map
//!     │
//!     ├──> QueryPattern
//!     │      ├─ substring containment (no `*`)
//!     │      └─ anchored glob (`*` -> `.*`, everything else escaped)
//!     │
//!     └──> FilteredView
//!            ├─ BFS expansion from matched nodes, depth-bounded
//!            └─ always a well-formed subgraph of the snapshot
//! ```

mod error;
mod pattern;
mod snapshot;
mod types;

pub use error::{GraphError, Result};
pub use pattern::QueryPattern;
pub use snapshot::GraphSnapshot;
pub use types::{FilteredView, GraphEdge, GraphNode, NODE_WEIGHT};
