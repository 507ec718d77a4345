//! HTTP source for the KMap workspace graph endpoint.
//!
//! [`GraphSource`] is the seam the explorer fetches through; the production
//! implementation is [`HttpGraphSource`], a thin reqwest client for
//! `GET {base}/api/graph/workspace/{workspaceId}`. Tests substitute scripted
//! in-memory sources.

mod error;
mod http;

pub use error::{ClientError, Result};
pub use http::HttpGraphSource;

use async_trait::async_trait;
use kmap_protocol::RawGraphPayload;

/// Provider of raw workspace graphs.
#[async_trait]
pub trait GraphSource: Send + Sync {
    /// Fetch the graph for a workspace, scoped to the given document ids.
    /// Callers guarantee `document_ids` is non-empty; the empty-selection
    /// short-circuit happens before the source is consulted.
    async fn fetch_graph(
        &self,
        workspace_id: &str,
        document_ids: &[String],
    ) -> Result<RawGraphPayload>;
}
