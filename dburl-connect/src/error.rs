//! Error types for resolving and building connectors.

use dburl_core::UrlError;
use thiserror::Error;

/// Result type for connector operations.
pub type ConnectResult<T> = Result<T, ConnectError>;

/// Errors raised while turning a URL into a connector.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConnectError {
    /// The URL itself could not be parsed.
    #[error(transparent)]
    Url(#[from] UrlError),

    /// No connector is registered for the scheme.
    #[error("Unrecognized or unsupported scheme: \"{0}\"")]
    UnknownScheme(String),

    /// A connection option has the wrong type or range.
    #[error("Invalid option '{key}': {message}")]
    InvalidOption { key: String, message: String },
}

impl ConnectError {
    /// Create an invalid option error.
    pub fn invalid_option(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidOption {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Check if this is a registry lookup failure.
    pub fn is_unknown_scheme(&self) -> bool {
        matches!(self, Self::UnknownScheme(_))
    }

    /// Check if this is a URL parse failure.
    pub fn is_parse_error(&self) -> bool {
        matches!(self, Self::Url(_))
    }
}
