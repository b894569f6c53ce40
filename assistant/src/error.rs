//! Error types for the chat assistant.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the assistant and its hosts.
///
/// None of these reach the user directly: the executor turns every failure into
/// a conversational reply, and hosts map the rest to HTTP statuses.
#[derive(Error, Debug)]
pub enum Error {
    /// Transport error talking to the backend
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Authentication error
    #[error("Authentication error: {0}")]
    Auth(String),

    /// A command is already in flight for this session
    #[error("Session is busy processing a previous message")]
    Busy,

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Get HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Error::Validation(_) | Error::Serialization(_) => 400,
            Error::Auth(_) => 401,
            Error::Busy => 409,
            Error::Http(_) | Error::Upstream(_) => 502,
            _ => 500,
        }
    }
}
