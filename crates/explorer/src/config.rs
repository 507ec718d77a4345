use crate::error::{ExplorerError, Result};
use serde::Deserialize;
use std::time::Duration;

/// Explorer tunables. Every field has a sensible default, so an empty TOML
/// document is a valid configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    /// Deadline for one graph fetch, in seconds.
    pub request_timeout_secs: u64,
    /// Maximum number of autocomplete suggestions returned per keystroke.
    pub suggest_limit: usize,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 60,
            suggest_limit: 10,
        }
    }
}

impl ExplorerConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|err| ExplorerError::Config(err.to_string()))
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
