//! Shared application state.

use std::sync::Arc;

use jiff::Timestamp;

use crate::config::ProxyConfig;

/// State shared across all proxy handlers. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    /// Proxy configuration, including the credential pairs.
    pub config: Arc<ProxyConfig>,
    /// HTTP client used for token exchanges with the accounts service.
    pub http: reqwest::Client,
    /// Process start time, reported by the health endpoint.
    pub started_at: Timestamp,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("started_at", &self.started_at)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Creates the shared state from a validated configuration.
    pub fn new(config: ProxyConfig) -> Self {
        Self {
            config: Arc::new(config),
            http: reqwest::Client::new(),
            started_at: Timestamp::now(),
        }
    }
}
