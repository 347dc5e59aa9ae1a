//! OAuth2 authorization-code flow handlers.
//!
//! The proxy exists so the client secrets never reach the connector: the
//! connector opens `/login`, the accounts service sends the user back to
//! `/callback`, and the tokens travel to the page through the URL fragment,
//! which the browser keeps client-side.

use axum::Json;
use axum::extract::{Query, State};
use axum::response::Redirect;
use reqwest::header;
use serde::Deserialize;
use serde_json::{Value, json};
use url::form_urlencoded;

use crate::config::AuthPurpose;
use crate::error::{Error, Result};
use crate::state::AppState;

/// Tracing target for auth operations.
const TRACING_TARGET: &str = "wdc_server::handler::auth";

#[derive(Debug, Default, Deserialize)]
pub(super) struct LoginParams {
    #[serde(rename = "authPurpose")]
    auth_purpose: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct CallbackParams {
    code: Option<String>,
    state: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct RefreshParams {
    refresh_token: String,
    #[serde(rename = "authPurpose")]
    auth_purpose: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
}

/// Starts the authorization-code flow.
///
/// The auth purpose rides in the OAuth2 `state` parameter so `/callback`
/// can resolve the same credential pair without any session storage.
pub(super) async fn login(
    State(state): State<AppState>,
    Query(params): Query<LoginParams>,
) -> Redirect {
    let purpose = AuthPurpose::from_param(params.auth_purpose.as_deref());
    let secrets = state.config.secrets(purpose);

    let mut url = state.config.authorize_url();
    url.query_pairs_mut()
        .append_pair("response_type", "code")
        .append_pair("client_id", &secrets.client_id)
        .append_pair("scope", &state.config.app_scope)
        .append_pair("redirect_uri", &state.config.redirect_uri)
        .append_pair("state", &purpose.to_string());

    tracing::info!(
        target: TRACING_TARGET,
        purpose = %purpose,
        "Redirecting to the authorization endpoint"
    );

    Redirect::temporary(url.as_str())
}

/// Exchanges the authorization code for tokens.
///
/// Success hands both tokens to the page through the URL fragment; any
/// failure collapses to the single `invalid_token` error fragment.
pub(super) async fn callback(
    State(state): State<AppState>,
    Query(params): Query<CallbackParams>,
) -> Redirect {
    let purpose = AuthPurpose::from_param(params.state.as_deref());
    let secrets = state.config.secrets(purpose);

    tracing::info!(
        target: TRACING_TARGET,
        purpose = %purpose,
        "Exchanging authorization code for tokens"
    );

    let exchange = state
        .http
        .post(state.config.tokens_url())
        .header(
            header::AUTHORIZATION,
            format!("Basic {}", secrets.encoded_signature),
        )
        .form(&[
            ("code", params.code.unwrap_or_default()),
            ("redirect_uri", state.config.redirect_uri.clone()),
            ("grant_type", "authorization_code".to_owned()),
        ])
        .send()
        .await;

    let tokens = match exchange {
        Ok(response) if response.status().is_success() => {
            response.json::<TokenResponse>().await.ok()
        }
        Ok(response) => {
            tracing::warn!(
                target: TRACING_TARGET,
                status = response.status().as_u16(),
                "Token exchange rejected"
            );
            None
        }
        Err(err) => {
            tracing::warn!(
                target: TRACING_TARGET,
                error = %err,
                "Token exchange unreachable"
            );
            None
        }
    };

    match tokens {
        Some(tokens) => {
            let fragment = form_urlencoded::Serializer::new(String::new())
                .append_pair("access_token", &tokens.access_token)
                .append_pair(
                    "refresh_token",
                    tokens.refresh_token.as_deref().unwrap_or_default(),
                )
                .finish();
            Redirect::temporary(&format!("/#{fragment}"))
        }
        None => Redirect::temporary("/#error=invalid_token"),
    }
}

/// Mints a fresh access token from a refresh token.
pub(super) async fn refresh_token(
    State(state): State<AppState>,
    Query(params): Query<RefreshParams>,
) -> Result<Json<Value>> {
    let purpose = AuthPurpose::from_param(params.auth_purpose.as_deref());
    let secrets = state.config.secrets(purpose);

    let response = state
        .http
        .post(state.config.tokens_url())
        .header(
            header::AUTHORIZATION,
            format!("Basic {}", secrets.encoded_signature),
        )
        .form(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", params.refresh_token.as_str()),
        ])
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(Error::TokenExchange(status.as_u16()));
    }

    let tokens: TokenResponse = response.json().await.map_err(Error::Upstream)?;

    tracing::info!(target: TRACING_TARGET, purpose = %purpose, "Access token refreshed");

    Ok(Json(json!({ "access_token": tokens.access_token })))
}
