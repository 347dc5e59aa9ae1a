//! Error types for the Spotify connector side.

use thiserror::Error;
use wdc_core::mapping::MappingError;

use crate::status::ApiFailure;
use crate::terms;

/// Result type alias for wdc-spotify operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while gathering schema or data.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP request failed before a response was available.
    #[error("HTTP error: {0}")]
    Reqwest(#[from] reqwest::Error),
    /// Response body could not be decoded.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    /// The API answered with a non-success status.
    #[error(transparent)]
    Api(#[from] ApiFailure),
    /// Rule definition or flattening failed.
    #[error(transparent)]
    Mapping(#[from] MappingError),
    /// The requested table id has no data view.
    #[error("{0} not found on data view classes")]
    UnknownTable(String),
    /// A data gather started without stored tokens.
    #[error("data gather started without authentication")]
    MissingAuth,
    /// A request URL could not be built.
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl Error {
    /// The message safe to show to the end user.
    ///
    /// API failures already carry a curated message; everything else falls
    /// back to the generic error so details never leak past the log.
    pub fn user_message(&self) -> &str {
        match self {
            Self::Api(failure) => &failure.custom_message,
            _ => terms::DEFAULT_ERROR,
        }
    }
}
