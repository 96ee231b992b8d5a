//! Text-to-speech service.

use std::sync::Arc;

use super::{
    error::Result,
    http::HttpClient,
    types::{OutputFormat, TextToSpeechRequest},
};

/// Text-to-speech service.
pub struct SpeechService {
    http: Arc<HttpClient>,
}

impl SpeechService {
    pub(crate) fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    /// Converts text to audio with the given voice.
    ///
    /// Returns the encoded audio exactly as the API sent it. PCM formats are
    /// headerless samples.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let req = TextToSpeechRequest::new("Привет, мир!");
    /// let audio = client.speech().convert(&voice.voice_id, &req, OutputFormat::Mp3_44100_192).await?;
    /// std::fs::write("hello.mp3", audio)?;
    /// ```
    pub async fn convert(
        &self,
        voice_id: &str,
        request: &TextToSpeechRequest,
        format: OutputFormat,
    ) -> Result<Vec<u8>> {
        let path = format!("/v1/text-to-speech/{}", voice_id);
        self.http
            .post_bytes(&path, &[("output_format", format.as_str())], request)
            .await
    }
}
