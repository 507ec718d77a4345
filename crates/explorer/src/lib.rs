//! # KMap Explorer
//!
//! Facade over the workspace graph viewer's client-side state: owns the
//! current [`GraphSnapshot`] and [`FilteredView`], executes load, search,
//! reset and suggest operations, and publishes observable state (loading
//! flag, node count, last error) to any rendering layer through plain
//! accessors plus a subscribe/notify listener registry.
//!
//! ## Guarantees
//!
//! - The view is always a well-formed subgraph of the current snapshot.
//! - Snapshot and view are replaced atomically; no partial update is
//!   observable, even across threads.
//! - A failed or timed-out load leaves the previous snapshot untouched.
//! - Responses from superseded loads are discarded (sequence-numbered
//!   requests), so a slow fetch can never clobber a newer one.

mod config;
mod error;
mod event;
mod explorer;

pub use config::ExplorerConfig;
pub use error::{ExplorerError, Result};
pub use event::{ErrorKind, ExplorerEvent};
pub use explorer::GraphExplorer;

pub use kmap_client::{GraphSource, HttpGraphSource};
pub use kmap_graph::{FilteredView, GraphEdge, GraphNode, GraphSnapshot};
