//! All `axum::`[`Router`]s with related `axum::`[`Handler`]s.
//!
//! [`Router`]: axum::routing::Router
//! [`Handler`]: axum::handler::Handler

mod auth;
mod monitors;
mod schema;

use axum::Router;
use axum::routing::get;

pub use crate::error::{Error, Result};
use crate::state::AppState;

/// Returns a [`Router`] with every proxy route.
///
/// [`Router`]: axum::routing::Router
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login))
        .route("/callback", get(auth::callback))
        .route("/refresh_token", get(auth::refresh_token))
        .route("/health", get(monitors::health))
        .route("/schema", get(schema::advanced_schema))
}

#[cfg(test)]
mod tests {
    use axum_test::TestServer;
    use serde_json::Value;
    use url::Url;

    use crate::config::ProxyConfig;
    use crate::state::AppState;

    fn test_server(config: ProxyConfig) -> TestServer {
        TestServer::new(crate::routes(AppState::new(config))).expect("test server")
    }

    fn test_config() -> ProxyConfig {
        ProxyConfig {
            ephemeral_client_id: "desktop-id".to_owned(),
            ephemeral_client_secret: "desktop-secret".to_owned(),
            enduring_client_id: "server-id".to_owned(),
            enduring_client_secret: "server-secret".to_owned(),
            ..ProxyConfig::default()
        }
    }

    #[tokio::test]
    async fn health_reports_process_details() {
        let server = test_server(test_config());

        let response = server.get("/health").await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["pid"], u64::from(std::process::id()));
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
        assert!(body["uptime"].is_number());
    }

    #[tokio::test]
    async fn login_redirects_to_the_authorize_endpoint() {
        let server = test_server(test_config());

        let response = server.get("/login").await;
        response.assert_status(axum::http::StatusCode::TEMPORARY_REDIRECT);

        let location = response.header("location");
        let url = Url::parse(location.to_str().unwrap()).unwrap();
        assert_eq!(url.host_str(), Some("accounts.spotify.com"));
        assert_eq!(url.path(), "/authorize");

        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();
        assert!(pairs.contains(&("response_type".to_owned(), "code".to_owned())));
        assert!(pairs.contains(&("client_id".to_owned(), "desktop-id".to_owned())));
        assert!(pairs.contains(&("state".to_owned(), "EPHEMERAL".to_owned())));
        assert!(pairs.iter().any(|(key, _)| key == "scope"));
        assert!(pairs.iter().any(|(key, _)| key == "redirect_uri"));
    }

    #[tokio::test]
    async fn login_purpose_selects_the_enduring_credentials() {
        let server = test_server(test_config());

        let response = server.get("/login").add_query_param("authPurpose", "enduring").await;

        let location = response.header("location");
        let location = location.to_str().unwrap();
        assert!(location.contains("client_id=server-id"));
        assert!(location.contains("state=ENDURING"));
    }

    #[tokio::test]
    async fn callback_failure_redirects_with_an_error_fragment() {
        // Nothing listens on this port, so the token exchange cannot succeed.
        let config = ProxyConfig {
            accounts_url: Url::parse("http://127.0.0.1:1").unwrap(),
            ..test_config()
        };
        let server = test_server(config);

        let response = server.get("/callback").add_query_param("code", "abc").await;
        response.assert_status(axum::http::StatusCode::TEMPORARY_REDIRECT);

        let location = response.header("location");
        assert_eq!(location, "/#error=invalid_token");
    }

    #[tokio::test]
    async fn refresh_token_failure_answers_with_the_stable_error_body() {
        // Nothing listens on this port, so the refresh grant cannot succeed.
        let config = ProxyConfig {
            accounts_url: Url::parse("http://127.0.0.1:1").unwrap(),
            ..test_config()
        };
        let server = test_server(config);

        let response = server
            .get("/refresh_token")
            .add_query_param("refresh_token", "stale")
            .await;
        response.assert_status(axum::http::StatusCode::BAD_GATEWAY);

        let body: Value = response.json();
        assert_eq!(body["error"], "invalid_token");
    }

    #[tokio::test]
    async fn refresh_token_without_a_token_is_rejected() {
        let server = test_server(test_config());

        let response = server.get("/refresh_token").await;
        response.assert_status(axum::http::StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn schema_serves_the_advanced_document() {
        let server = test_server(test_config());

        let response = server.get("/schema").await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["tables"].as_array().map(Vec::len), Some(7));
        assert_eq!(body["standardConnections"].as_array().map(Vec::len), Some(2));
        assert_eq!(body["tables"][0]["id"], "topArtists");
    }
}
