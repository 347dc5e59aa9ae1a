//! Errors raised while defining rules or flattening data.
//!
//! All of these indicate a programming or configuration bug and are meant to
//! fail fast and loudly, ideally at startup or test time. Messages keep a
//! stable, substring-matchable shape and carry the offending rule's JSON
//! rendering where one exists.

use thiserror::Error;

/// Validation and transform failures for a [`Mapping`].
///
/// [`Mapping`]: super::Mapping
#[derive(Debug, Error)]
pub enum MappingError {
    /// The rule definition was not a JSON object.
    #[error("Mapping rules MUST be literal objects {0}")]
    NotAnObject(String),
    /// The rule id did not match the required pattern.
    #[error("Invalid id @ mappingRule item {0}")]
    InvalidId(String),
    /// A rule with the same id is already registered.
    #[error("id MUST be unique @ mappingRule item {0}")]
    DuplicateId(String),
    /// The rule had no dataType.
    #[error("dataType mandatory property missing @ mappingRule item {0}")]
    MissingDataType(String),
    /// The dataType is not part of the supported enumerated set.
    #[error("dataType unsupported {0}")]
    UnsupportedDataType(String),
    /// The rule had no lookup path.
    #[error("lookup mandatory property missing @ mappingRule item {0}")]
    MissingLookup(String),
    /// A transformation handler was registered without a key.
    #[error("key param is required to register a transformation handler")]
    HandlerKeyRequired,
    /// A transformation handler key was registered twice.
    #[error("{0} already exists on transformation handlers")]
    HandlerExists(String),
    /// A named transform referenced a handler that was never registered.
    #[error("{0} is not a defined Mapping transformation handler")]
    UnknownHandler(String),
}
