use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Graph fetch timed out")]
    Timeout,

    #[error("Graph fetch failed: {0}")]
    FetchFailed(String),

    #[error("Failed to build HTTP client: {0}")]
    Init(String),
}
