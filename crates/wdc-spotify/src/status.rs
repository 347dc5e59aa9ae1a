//! Classification of non-2xx API responses.
//!
//! Failures are normalized into an advisory `{ action, custom_message }`
//! shape. Actions are surfaced to logs only; no automatic retry or re-auth is
//! implemented anywhere in this crate.

use strum::{AsRefStr, IntoStaticStr};
use thiserror::Error;

use crate::terms;

/// Advisory recovery action suggested by a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, IntoStaticStr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorAction {
    /// 401: the access token is no longer accepted.
    Reauth,
    /// 429: rate limiting has been applied.
    Retry,
}

/// A normalized API failure.
#[derive(Debug, Clone, Error)]
#[error("{custom_message}")]
pub struct ApiFailure {
    /// The HTTP status code that produced this failure.
    pub status: u16,
    /// Advisory action, if the status suggests one.
    pub action: Option<ErrorAction>,
    /// Human-readable message for logs and, where safe, the user.
    pub custom_message: String,
}

/// Maps a status code to its advisory classification.
///
/// Handled codes carry the documented Spotify explanation; anything else is
/// rendered as `name: message (status)`.
pub fn intercept_status(status: u16, name: &str, message: &str) -> ApiFailure {
    let action = match status {
        401 => Some(ErrorAction::Reauth),
        429 => Some(ErrorAction::Retry),
        _ => None,
    };

    let custom_message = match terms::status_code_message(status) {
        Some(documented) => documented.to_owned(),
        None => format!("{name}: {message} ({status})"),
    };

    ApiFailure {
        status,
        action,
        custom_message,
    }
}
