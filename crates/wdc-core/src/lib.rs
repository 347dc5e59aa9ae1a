#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod error;

pub mod host;
pub mod mapping;
pub mod schema;

#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

pub use crate::error::{ConnectorError, DEFAULT_ERROR_NAME};
