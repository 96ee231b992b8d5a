//! Error types for chat clients.

use thiserror::Error;

/// Result type alias for LLM operations.
pub type Result<T> = std::result::Result<T, LlmError>;

/// Error type for LLM operations.
#[derive(Error, Debug)]
pub enum LlmError {
    /// HTTP transport error.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status from a provider.
    #[error("{provider} api error {status}: {body}")]
    Api {
        provider: String,
        status: u16,
        body: String,
    },

    /// JSON serialization/deserialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The provider answered without any content.
    #[error("empty response from {0}")]
    EmptyResponse(String),

    /// No factory is registered for the provider tag.
    #[error("unknown provider: {0}")]
    UnknownProvider(String),

    /// A factory is already registered for the provider tag.
    #[error("provider already registered: {0}")]
    DuplicateProvider(String),

    /// The provider needs an API key and none was configured.
    #[error("missing api key for provider {0}")]
    MissingApiKey(String),
}

impl LlmError {
    /// Returns true if retrying the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            LlmError::Http(e) => e.is_timeout() || e.is_connect(),
            LlmError::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}
