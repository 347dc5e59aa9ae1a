//! Proxy configuration.
//!
//! Two application registrations are kept side by side, one per auth
//! purpose: `EPHEMERAL` credentials serve desktop sessions whose tokens die
//! with the session, `ENDURING` credentials serve server deployments that
//! refresh tokens unattended. The purpose travels through the OAuth2 `state`
//! parameter so the callback can pick the matching secret pair.

use anyhow::{Result as AnyhowResult, anyhow};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use clap::Args;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use url::Url;

/// Tracing target for configuration operations.
pub const TRACING_TARGET: &str = "wdc_server::config";

/// Default OAuth2 scope requested on login.
pub const DEFAULT_APP_SCOPE: &str =
    "user-read-private user-read-email user-top-read playlist-read-private user-library-read";

/// Which credential pair a request should use.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum AuthPurpose {
    /// Desktop sessions; tokens are not persisted.
    #[default]
    Ephemeral,
    /// Server deployments; tokens survive for scheduled refreshes.
    Enduring,
}

impl AuthPurpose {
    /// Parses a purpose from an optional query value.
    ///
    /// Anything absent or unrecognized falls back to [`AuthPurpose::Ephemeral`],
    /// matching the safer of the two credential pairs.
    pub fn from_param(value: Option<&str>) -> Self {
        value
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_default()
    }
}

/// The credential pair resolved for one request.
#[derive(Clone)]
pub struct Secrets {
    /// OAuth2 client id, safe to expose in the authorize URL.
    pub client_id: String,
    /// `base64(client_id:client_secret)` for the Basic authorization header.
    pub encoded_signature: String,
    /// The purpose these secrets belong to.
    pub purpose: AuthPurpose,
}

impl std::fmt::Debug for Secrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secrets")
            .field("client_id", &self.client_id)
            .field("purpose", &self.purpose)
            .finish_non_exhaustive()
    }
}

/// OAuth2 proxy configuration.
///
/// All options can be set via CLI arguments or environment variables.
#[derive(Debug, Clone, Args, Serialize, Deserialize)]
#[must_use = "config does nothing unless you use it"]
pub struct ProxyConfig {
    /// Redirect URI registered with the Spotify application.
    ///
    /// Must match the registration exactly, including scheme and port.
    #[arg(long, env = "REDIRECT_URI", default_value = "http://localhost:3000/callback")]
    pub redirect_uri: String,

    /// Base URL of the Spotify accounts service.
    #[arg(long, env = "ACCOUNTS_URL", default_value = "https://accounts.spotify.com")]
    pub accounts_url: Url,

    /// OAuth2 scope requested on login.
    #[arg(long, env = "APP_SCOPE", default_value = DEFAULT_APP_SCOPE)]
    pub app_scope: String,

    /// Client id for desktop (ephemeral) sessions.
    #[arg(long, env = "EPHEMERAL_CLIENT_ID", default_value = "")]
    pub ephemeral_client_id: String,

    /// Client secret for desktop (ephemeral) sessions.
    #[arg(long, env = "EPHEMERAL_CLIENT_SECRET", default_value = "", hide_env_values = true)]
    #[serde(skip_serializing)]
    #[serde(default)]
    pub ephemeral_client_secret: String,

    /// Client id for server (enduring) deployments.
    #[arg(long, env = "ENDURING_CLIENT_ID", default_value = "")]
    pub enduring_client_id: String,

    /// Client secret for server (enduring) deployments.
    #[arg(long, env = "ENDURING_CLIENT_SECRET", default_value = "", hide_env_values = true)]
    #[serde(skip_serializing)]
    #[serde(default)]
    pub enduring_client_secret: String,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            redirect_uri: "http://localhost:3000/callback".to_owned(),
            accounts_url: Url::parse("https://accounts.spotify.com")
                .expect("valid default accounts URL"),
            app_scope: DEFAULT_APP_SCOPE.to_owned(),
            ephemeral_client_id: String::new(),
            ephemeral_client_secret: String::new(),
            enduring_client_id: String::new(),
            enduring_client_secret: String::new(),
        }
    }
}

impl ProxyConfig {
    /// The authorize endpoint on the accounts service.
    pub fn authorize_url(&self) -> Url {
        let mut url = self.accounts_url.clone();
        url.set_path("/authorize");
        url
    }

    /// The token endpoint on the accounts service.
    pub fn tokens_url(&self) -> Url {
        let mut url = self.accounts_url.clone();
        url.set_path("/api/token");
        url
    }

    /// Resolves the credential pair for a purpose.
    pub fn secrets(&self, purpose: AuthPurpose) -> Secrets {
        let (client_id, client_secret) = match purpose {
            AuthPurpose::Ephemeral => (&self.ephemeral_client_id, &self.ephemeral_client_secret),
            AuthPurpose::Enduring => (&self.enduring_client_id, &self.enduring_client_secret),
        };

        let signature = format!("{client_id}:{client_secret}");

        Secrets {
            client_id: client_id.clone(),
            encoded_signature: BASE64.encode(signature),
            purpose,
        }
    }

    /// Validates the configuration, logging what will be used.
    pub fn validate(&self) -> AnyhowResult<()> {
        if self.redirect_uri.parse::<Url>().is_err() {
            return Err(anyhow!("invalid redirect URI: {}", self.redirect_uri));
        }

        if self.ephemeral_client_id.is_empty() && self.enduring_client_id.is_empty() {
            tracing::warn!(
                target: TRACING_TARGET,
                "No client credentials configured, login will not succeed"
            );
        }

        tracing::debug!(
            target: TRACING_TARGET,
            accounts_url = %self.accounts_url,
            redirect_uri = %self.redirect_uri,
            "Proxy configuration validated"
        );

        Ok(())
    }
}
