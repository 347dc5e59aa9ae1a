//! Per-rule value transforms.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

/// A reusable transform function over resolved values.
pub type TransformFn = Arc<dyn Fn(Value) -> Value + Send + Sync>;

/// How a rule transforms its resolved value, resolved explicitly instead of
/// branching on runtime type.
#[derive(Clone, Default)]
pub enum Transform {
    /// Pass the value through unchanged.
    #[default]
    None,
    /// Look up a handler registered on the owning `Mapping` by name.
    Named(String),
    /// Invoke the function directly.
    Inline(TransformFn),
}

impl Transform {
    /// Wraps a closure as an inline transform.
    pub fn inline(f: impl Fn(Value) -> Value + Send + Sync + 'static) -> Self {
        Self::Inline(Arc::new(f))
    }

    /// Creates a named handler reference.
    pub fn named(key: impl Into<String>) -> Self {
        Self::Named(key.into())
    }

    /// Returns true when no transform is attached.
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Textual form used when rendering a rule into an error message.
    pub(super) fn describe(&self) -> Option<String> {
        match self {
            Self::None => None,
            Self::Named(key) => Some(key.clone()),
            Self::Inline(_) => Some("[inline transform]".to_owned()),
        }
    }
}

impl fmt::Debug for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("Transform::None"),
            Self::Named(key) => write!(f, "Transform::Named({key})"),
            Self::Inline(_) => f.write_str("Transform::Inline(..)"),
        }
    }
}
