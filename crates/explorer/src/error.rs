use kmap_client::ClientError;
use kmap_graph::GraphError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ExplorerError>;

#[derive(Error, Debug)]
pub enum ExplorerError {
    #[error("Search query is empty")]
    EmptyQuery,

    #[error("Invalid search query: {0}")]
    InvalidQuery(String),

    #[error("Search matched no nodes")]
    NoResults,

    #[error("Graph fetch timed out")]
    Timeout,

    #[error("Graph fetch failed: {0}")]
    FetchFailed(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<GraphError> for ExplorerError {
    fn from(err: GraphError) -> Self {
        match err {
            GraphError::EmptyQuery => Self::EmptyQuery,
            GraphError::InvalidPattern(message) => Self::InvalidQuery(message),
        }
    }
}

impl From<ClientError> for ExplorerError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Timeout => Self::Timeout,
            ClientError::FetchFailed(message) => Self::FetchFailed(message),
            ClientError::Init(message) => Self::Config(message),
        }
    }
}
