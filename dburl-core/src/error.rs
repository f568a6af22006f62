//! Errors raised while reading and decomposing database URLs.

use thiserror::Error;

/// Errors that can occur while parsing a database URL.
///
/// The parser itself only ever produces [`UrlError::MalformedUrl`]. The
/// environment variants come from loading a URL out of the process
/// environment before it is parsed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UrlError {
    /// The input is empty or has no `scheme://` prefix.
    #[error("Malformed database URL: {0}")]
    MalformedUrl(String),

    /// Environment variable not found.
    #[error("Environment variable not found: {0}")]
    EnvNotFound(String),

    /// Invalid environment variable value.
    #[error("Invalid environment variable '{name}': {message}")]
    InvalidEnvValue { name: String, message: String },
}

impl UrlError {
    /// Create a malformed URL error.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedUrl(msg.into())
    }

    /// Check if this error came from the URL grammar rather than the environment.
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedUrl(_))
    }
}

/// Result type for URL operations.
pub type UrlResult<T> = Result<T, UrlError>;
