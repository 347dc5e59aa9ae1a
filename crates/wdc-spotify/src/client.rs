//! Spotify Web API client implementation using reqwest.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::api::{CatalogApi, Page};
use crate::config::SpotifyClientConfig;
use crate::error::{Error, Result};
use crate::filters::TimeRange;
use crate::status::intercept_status;

/// Tracing target for client operations.
pub const TRACING_TARGET: &str = "wdc_spotify::client";

/// Inner client that holds the HTTP client, configuration and token.
struct SpotifyClientInner {
    http: Client,
    config: SpotifyClientConfig,
    access_token: String,
}

impl std::fmt::Debug for SpotifyClientInner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpotifyClientInner")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Client for the Spotify Web API.
///
/// Cheap to clone; all methods issue bearer-authenticated GET requests and
/// normalize non-success statuses through the status interceptor.
#[derive(Clone, Debug)]
pub struct SpotifyClient {
    inner: Arc<SpotifyClientInner>,
}

impl SpotifyClient {
    /// Creates a new client with the given access token and configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be created.
    pub fn new(access_token: impl Into<String>, config: SpotifyClientConfig) -> Result<Self> {
        tracing::debug!(
            target: TRACING_TARGET,
            timeout_ms = config.timeout.as_millis(),
            base_url = %config.base_url,
            "Creating Spotify client"
        );

        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        let inner = SpotifyClientInner {
            http,
            config,
            access_token: access_token.into(),
        };

        Ok(Self {
            inner: Arc::new(inner),
        })
    }

    /// Creates a new client with default configuration.
    pub fn with_defaults(access_token: impl Into<String>) -> Result<Self> {
        Self::new(access_token, SpotifyClientConfig::default())
    }

    /// Gets the client configuration.
    pub fn config(&self) -> &SpotifyClientConfig {
        &self.inner.config
    }

    async fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value> {
        let url = self.inner.config.base_url.join(path)?;

        tracing::debug!(
            target: TRACING_TARGET,
            %url,
            "Requesting resource"
        );

        let response = self
            .inner
            .http
            .get(url)
            .bearer_auth(&self.inner.access_token)
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let reason = status.canonical_reason().unwrap_or("request failed");
            let failure = intercept_status(status.as_u16(), "SpotifyClient", reason);

            if let Some(action) = failure.action {
                // Advisory only; nothing in this crate retries or re-auths.
                tracing::warn!(
                    target: TRACING_TARGET,
                    status = failure.status,
                    action = %action.as_ref(),
                    "We could take an action for this error"
                );
            }

            return Err(Error::Api(failure));
        }

        Ok(response.json().await?)
    }

    async fn get_page(&self, path: &str, query: &[(&str, String)]) -> Result<Page> {
        let body = self.get_json(path, query).await?;
        Ok(serde_json::from_value(body)?)
    }

    async fn get_batch(
        &self,
        path: &str,
        collection_key: &str,
        ids: &[String],
    ) -> Result<Vec<Value>> {
        let query = [("ids", ids.join(","))];
        let mut body = self.get_json(path, &query).await?;

        let items = match body.get_mut(collection_key).map(Value::take) {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        };

        Ok(items)
    }
}

#[async_trait]
impl CatalogApi for SpotifyClient {
    async fn top_artists(&self, time_range: TimeRange, offset: u32, limit: u32) -> Result<Page> {
        let query = [
            ("time_range", time_range.to_string()),
            ("offset", offset.to_string()),
            ("limit", limit.to_string()),
        ];
        self.get_page("v1/me/top/artists", &query).await
    }

    async fn top_tracks(&self, time_range: TimeRange, offset: u32, limit: u32) -> Result<Page> {
        let query = [
            ("time_range", time_range.to_string()),
            ("offset", offset.to_string()),
            ("limit", limit.to_string()),
        ];
        self.get_page("v1/me/top/tracks", &query).await
    }

    async fn saved_albums(&self, market: Option<&str>, offset: u32, limit: u32) -> Result<Page> {
        let mut query = vec![("offset", offset.to_string()), ("limit", limit.to_string())];
        if let Some(market) = market {
            query.push(("market", market.to_owned()));
        }
        self.get_page("v1/me/albums", &query).await
    }

    async fn saved_tracks(&self, market: Option<&str>, offset: u32, limit: u32) -> Result<Page> {
        let mut query = vec![("offset", offset.to_string()), ("limit", limit.to_string())];
        if let Some(market) = market {
            query.push(("market", market.to_owned()));
        }
        self.get_page("v1/me/tracks", &query).await
    }

    async fn artists(&self, ids: &[String]) -> Result<Vec<Value>> {
        self.get_batch("v1/artists", "artists", ids).await
    }

    async fn audio_features(&self, ids: &[String]) -> Result<Vec<Value>> {
        self.get_batch("v1/audio-features", "audio_features", ids)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_creation_succeeds_with_defaults() {
        let client = SpotifyClient::with_defaults("token");
        assert!(client.is_ok());
    }

    #[test]
    fn debug_does_not_leak_the_token() {
        let client = SpotifyClient::with_defaults("super-secret").unwrap();
        let rendered = format!("{client:?}");
        assert!(!rendered.contains("super-secret"));
    }
}
