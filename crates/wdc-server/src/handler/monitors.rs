//! Server health handler.

use axum::Json;
use axum::extract::State;
use jiff::Timestamp;
use serde_json::{Value, json};

use crate::state::AppState;

/// Process details for deployment checks.
pub(super) async fn health(State(state): State<AppState>) -> Json<Value> {
    let uptime = state.started_at.duration_until(Timestamp::now());

    Json(json!({
        "pid": std::process::id(),
        "uptime": uptime.as_secs(),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
