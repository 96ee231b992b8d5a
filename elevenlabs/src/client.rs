//! ElevenLabs API client.

use std::sync::Arc;

use super::{
    error::{Error, Result},
    http::HttpClient,
    speech::SpeechService,
    voice::VoiceService,
};

/// Default ElevenLabs API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.elevenlabs.io";

/// Default maximum number of retries.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// ElevenLabs API client.
///
/// # Example
///
/// ```rust,ignore
/// use ttsprep_elevenlabs::Client;
///
/// let client = Client::new("your-api-key")?;
/// let voice = client.voices().find("Prince Nuri").await?;
/// ```
pub struct Client {
    http: Arc<HttpClient>,
    base_url: String,
}

impl Client {
    /// Creates a client with default settings.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        ClientBuilder::new(api_key).build()
    }

    /// Creates a new client builder for more configuration options.
    pub fn builder(api_key: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new(api_key)
    }

    /// Returns the configured base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the voice library service.
    pub fn voices(&self) -> VoiceService {
        VoiceService::new(self.http.clone())
    }

    /// Returns the text-to-speech service.
    pub fn speech(&self) -> SpeechService {
        SpeechService::new(self.http.clone())
    }
}

/// Builder for creating an ElevenLabs API client.
pub struct ClientBuilder {
    api_key: String,
    base_url: String,
    max_retries: u32,
}

impl ClientBuilder {
    /// Creates a new client builder.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    /// Sets the base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the maximum number of retries for 429 and 5xx responses.
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Builds the client.
    pub fn build(self) -> Result<Client> {
        if self.api_key.is_empty() {
            return Err(Error::Config("API key is required".to_string()));
        }

        let http = HttpClient::new(self.base_url.clone(), &self.api_key, self.max_retries)?;

        Ok(Client {
            http: Arc::new(http),
            base_url: self.base_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let client = Client::new("test-key").unwrap();
        assert_eq!(client.base_url(), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_builder_custom_url() {
        let client = Client::builder("k")
            .base_url("http://localhost:9000")
            .max_retries(0)
            .build()
            .unwrap();
        assert_eq!(client.base_url(), "http://localhost:9000");
    }

    #[test]
    fn test_empty_key_rejected() {
        assert!(matches!(Client::new(""), Err(Error::Config(_))));
    }
}
