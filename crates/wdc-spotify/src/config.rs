//! Configuration for the Spotify Web API client.

use std::time::Duration;

use url::Url;

/// Default timeout for HTTP requests: 30 seconds.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default Web API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.spotify.com/";

/// Configuration for the Spotify HTTP client.
#[derive(Debug, Clone)]
pub struct SpotifyClientConfig {
    /// Base URL of the Web API.
    pub base_url: Url,
    /// Default timeout for HTTP requests.
    pub timeout: Duration,
    /// User-Agent header to send with requests.
    pub user_agent: String,
}

impl Default for SpotifyClientConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("valid default base URL"),
            timeout: DEFAULT_TIMEOUT,
            user_agent: Self::default_user_agent(),
        }
    }
}

impl SpotifyClientConfig {
    /// Returns the default user agent string.
    fn default_user_agent() -> String {
        format!("spotify-wdc/{}", env!("CARGO_PKG_VERSION"))
    }

    /// Creates a new configuration with the specified base URL.
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = base_url;
        self
    }

    /// Creates a new configuration with the specified timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Creates a new configuration with the specified user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}
