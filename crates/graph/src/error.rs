use thiserror::Error;

pub type Result<T> = std::result::Result<T, GraphError>;

#[derive(Error, Debug)]
pub enum GraphError {
    #[error("Search query is empty")]
    EmptyQuery,

    #[error("Invalid search pattern: {0}")]
    InvalidPattern(String),
}
