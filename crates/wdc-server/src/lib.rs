#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod error;

pub mod config;
pub mod handler;
pub mod state;

use axum::Router;
use tower_http::trace::TraceLayer;

pub use crate::config::{AuthPurpose, ProxyConfig, Secrets};
pub use crate::error::{Error, Result};
pub use crate::state::AppState;

/// Builds the complete proxy router with tracing attached.
pub fn routes(state: AppState) -> Router {
    handler::routes()
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
