use crate::error::{ClientError, Result};
use crate::GraphSource;
use async_trait::async_trait;
use kmap_protocol::RawGraphPayload;
use std::time::Duration;

/// Reqwest-backed [`GraphSource`].
///
/// The per-request timeout doubles as the abort bound: when the deadline
/// passes, the in-flight request is dropped and the call returns
/// [`ClientError::Timeout`] without any partial result.
pub struct HttpGraphSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpGraphSource {
    /// Build a source for `base_url` (scheme + host, no trailing slash
    /// required) with the given request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| ClientError::Init(err.to_string()))?;

        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Ok(Self { client, base_url })
    }

    fn workspace_graph_url(&self, workspace_id: &str) -> String {
        format!("{}/api/graph/workspace/{workspace_id}", self.base_url)
    }
}

#[async_trait]
impl GraphSource for HttpGraphSource {
    async fn fetch_graph(
        &self,
        workspace_id: &str,
        document_ids: &[String],
    ) -> Result<RawGraphPayload> {
        let url = self.workspace_graph_url(workspace_id);
        let query: Vec<(&str, &str)> = document_ids
            .iter()
            .map(|id| ("documentIds", id.as_str()))
            .collect();

        log::debug!("fetching graph: {url} ({} documents)", document_ids.len());

        let response = self
            .client
            .get(&url)
            .query(&query)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::FetchFailed(format!(
                "backend returned {status} for {url}"
            )));
        }

        response
            .json::<RawGraphPayload>()
            .await
            .map_err(map_transport_error)
    }
}

fn map_transport_error(err: reqwest::Error) -> ClientError {
    if err.is_timeout() {
        ClientError::Timeout
    } else {
        ClientError::FetchFailed(err.to_string())
    }
}
