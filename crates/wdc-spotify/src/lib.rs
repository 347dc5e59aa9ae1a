#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod error;

pub mod api;
pub mod client;
pub mod config;
pub mod connector;
pub mod filters;
pub mod schema;
pub mod status;
pub mod terms;
pub mod views;

#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

pub use crate::api::{CatalogApi, Page};
pub use crate::client::SpotifyClient;
pub use crate::config::SpotifyClientConfig;
pub use crate::connector::{Connector, TableRequest};
pub use crate::error::{Error, Result};
pub use crate::filters::{Filters, TimeRange};
