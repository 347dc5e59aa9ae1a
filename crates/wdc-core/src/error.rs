//! Connector-level error tagging.
//!
//! Errors that cross the host boundary are wrapped in a [`ConnectorError`]
//! carrying a display name and an optional code, and render as a uniform
//! multi-line block suitable for host-side logging. Tagging is applied at
//! most once; re-tagging an already tagged error keeps the original fields.

use std::fmt;

/// Display name used when an error is created without an explicit tag.
pub const DEFAULT_ERROR_NAME: &str = "Generic WDC Error";

/// An error with a display name and an optional code attached.
#[derive(Debug, Clone)]
pub struct ConnectorError {
    name: String,
    code: Option<String>,
    message: String,
    tagged: bool,
}

impl ConnectorError {
    /// Creates a new untagged error from a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            name: DEFAULT_ERROR_NAME.to_owned(),
            code: None,
            message: message.into(),
            tagged: false,
        }
    }

    /// Attaches a display name and an optional code.
    ///
    /// The first tag wins: tagging an already tagged error is a no-op for
    /// the tagging fields.
    pub fn tag(mut self, name: impl Into<String>, code: Option<&str>) -> Self {
        if !self.tagged {
            self.name = name.into();
            self.code = code.map(str::to_owned);
            self.tagged = true;
        }
        self
    }

    /// Returns the display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the code, if one was attached.
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    /// Returns the underlying message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Renders the uniform block handed to the host log.
    pub fn stringify(&self) -> String {
        format!(
            "\nName: {}\nMessage: {}\nCode: {}",
            self.name,
            self.message,
            self.code.as_deref().unwrap_or("undefined"),
        )
    }
}

impl fmt::Display for ConnectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.message)
    }
}

impl std::error::Error for ConnectorError {}
