//! Text-to-speech capability used by synthesis jobs.

use async_trait::async_trait;
use tracing::info;
use ttsprep_elevenlabs::{Client, OutputFormat, TextToSpeechRequest, Voice};

/// Turns text into encoded audio with a fixed voice.
#[async_trait]
pub trait Synthesizer: Send + Sync {
    /// Speaker name recorded in metadata.
    fn voice_name(&self) -> &str;

    async fn synthesize(&self, text: &str, format: OutputFormat) -> anyhow::Result<Vec<u8>>;
}

/// [`Synthesizer`] backed by the ElevenLabs API.
pub struct ElevenLabsSynthesizer {
    client: Client,
    voice: Voice,
}

impl ElevenLabsSynthesizer {
    /// Resolves `voice_name` to a library voice. Fails before any record is
    /// touched if no voice matches.
    pub async fn connect(client: Client, voice_name: &str) -> ttsprep_elevenlabs::Result<Self> {
        let voice = client.voices().find(voice_name).await?;
        info!(voice_id = %voice.voice_id, name = %voice.name, "voice found");
        Ok(Self { client, voice })
    }

    /// Uses an already resolved voice.
    pub fn with_voice(client: Client, voice: Voice) -> Self {
        Self { client, voice }
    }

    pub fn voice(&self) -> &Voice {
        &self.voice
    }
}

#[async_trait]
impl Synthesizer for ElevenLabsSynthesizer {
    fn voice_name(&self) -> &str {
        &self.voice.name
    }

    async fn synthesize(&self, text: &str, format: OutputFormat) -> anyhow::Result<Vec<u8>> {
        let request = TextToSpeechRequest::new(text);
        let audio = self
            .client
            .speech()
            .convert(&self.voice.voice_id, &request, format)
            .await?;
        if audio.is_empty() {
            anyhow::bail!("empty audio for voice {}", self.voice.voice_id);
        }
        Ok(audio)
    }
}
