//! Error types for the ElevenLabs API client.

use thiserror::Error;

/// Result type alias for ElevenLabs operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for ElevenLabs API operations.
#[derive(Error, Debug)]
pub enum Error {
    /// API error returned by ElevenLabs.
    #[error("elevenlabs: {message} (status={status}, http={http_status})")]
    Api {
        status: String,
        message: String,
        http_status: u16,
    },

    /// HTTP request error.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Voice search returned nothing.
    #[error("voice not found: {0}")]
    VoiceNotFound(String),

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Other error.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Creates a new API error.
    pub fn api(status: impl Into<String>, message: impl Into<String>, http_status: u16) -> Self {
        Error::Api {
            status: status.into(),
            message: message.into(),
            http_status,
        }
    }

    /// Returns true if this is a rate limit error.
    pub fn is_rate_limit(&self) -> bool {
        match self {
            Error::Api {
                status,
                http_status,
                ..
            } => *http_status == 429 || status == "too_many_concurrent_requests",
            _ => false,
        }
    }

    /// Returns true if this is an invalid API key error.
    pub fn is_invalid_api_key(&self) -> bool {
        match self {
            Error::Api {
                status,
                http_status,
                ..
            } => *http_status == 401 || status == "invalid_api_key",
            _ => false,
        }
    }

    /// Returns true if this is a server error.
    pub fn is_server_error(&self) -> bool {
        match self {
            Error::Api { http_status, .. } => *http_status >= 500,
            _ => false,
        }
    }

    /// Returns true if the request may succeed when retried.
    pub fn is_retryable(&self) -> bool {
        self.is_rate_limit() || self.is_server_error()
    }
}
