//! Error types for outbound messaging.

use thiserror::Error;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while shaping or dispatching a message.
#[derive(Debug, Error)]
pub enum Error {
    /// No session registered under the given id.
    #[error("session not found: {0}")]
    SessionNotFound(String),

    /// A media message was sent without a media reference.
    #[error("{0} media is required")]
    MissingMedia(&'static str),

    /// A required request field was absent or empty.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// Poll options or selectable count are out of range.
    #[error("invalid poll: {0}")]
    InvalidPoll(String),

    /// Document file name has no known extension.
    #[error("unsupported file extension: {0}")]
    UnsupportedExtension(String),

    /// Phone number or group id could not be turned into a JID.
    #[error("invalid address: {0:?}")]
    InvalidAddress(String),

    /// Coordinates outside the valid latitude/longitude range.
    #[error("invalid location: {0}")]
    InvalidLocation(String),

    /// Failure reported by the underlying session.
    #[error("transport error: {0}")]
    Transport(String),

    /// Configuration could not be parsed.
    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
