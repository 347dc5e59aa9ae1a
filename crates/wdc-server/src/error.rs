//! Proxy error handling.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

/// Result type alias for proxy handlers.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by proxy handlers.
///
/// Upstream detail stays in the log; responses carry only a stable error
/// label so tokens and credentials never leak through an error body.
#[derive(Debug, Error)]
pub enum Error {
    /// The accounts service could not be reached.
    #[error("token request failed: {0}")]
    Upstream(#[from] reqwest::Error),
    /// The accounts service answered the token exchange with a non-success
    /// status.
    #[error("token exchange rejected with status {0}")]
    TokenExchange(u16),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "Proxy request failed");

        let status = match self {
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
            Self::TokenExchange(_) => StatusCode::UNAUTHORIZED,
        };

        let body = Json(json!({ "error": "invalid_token" }));
        (status, body).into_response()
    }
}
