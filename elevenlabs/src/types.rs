//! Shared request and response types.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Multilingual model used for dataset synthesis.
pub const DEFAULT_MODEL_ID: &str = "eleven_multilingual_v2";

/// Audio encoding returned by text-to-speech.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    /// Raw signed 16-bit little-endian mono PCM at 48 kHz.
    Pcm48000,
    Pcm44100,
    Pcm24000,
    Pcm16000,
    Mp3_44100_128,
    Mp3_44100_192,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Pcm48000 => "pcm_48000",
            OutputFormat::Pcm44100 => "pcm_44100",
            OutputFormat::Pcm24000 => "pcm_24000",
            OutputFormat::Pcm16000 => "pcm_16000",
            OutputFormat::Mp3_44100_128 => "mp3_44100_128",
            OutputFormat::Mp3_44100_192 => "mp3_44100_192",
        }
    }

    /// Sample rate of a raw PCM format.
    pub fn pcm_sample_rate(&self) -> Option<u32> {
        match self {
            OutputFormat::Pcm48000 => Some(48_000),
            OutputFormat::Pcm44100 => Some(44_100),
            OutputFormat::Pcm24000 => Some(24_000),
            OutputFormat::Pcm16000 => Some(16_000),
            _ => None,
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Voice tuning parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceSettings {
    pub stability: f32,
    pub similarity_boost: f32,
    pub style: f32,
    pub use_speaker_boost: bool,
    pub speed: f32,
}

impl Default for VoiceSettings {
    /// Settings tuned for clean, consistent dataset audio.
    fn default() -> Self {
        Self {
            stability: 0.8,
            similarity_boost: 1.0,
            style: 0.0,
            use_speaker_boost: true,
            speed: 1.0,
        }
    }
}

/// Body of `POST /v1/text-to-speech/{voice_id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextToSpeechRequest {
    pub text: String,
    pub model_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice_settings: Option<VoiceSettings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language_code: Option<String>,
}

impl TextToSpeechRequest {
    /// Request with the default model and voice settings.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            model_id: DEFAULT_MODEL_ID.to_string(),
            voice_settings: Some(VoiceSettings::default()),
            language_code: None,
        }
    }
}

/// A voice from the library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Voice {
    pub voice_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub labels: HashMap<String, String>,
}

/// Response of `GET /v2/voices`.
#[derive(Debug, Clone, Deserialize)]
pub struct VoiceList {
    #[serde(default)]
    pub voices: Vec<Voice>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub total_count: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_json() {
        let req = TextToSpeechRequest::new("Привет");
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(v["model_id"], "eleven_multilingual_v2");
        let stability = v["voice_settings"]["stability"].as_f64().unwrap();
        assert!((stability - 0.8).abs() < 1e-6);
        assert_eq!(v["voice_settings"]["similarity_boost"], 1.0);
        assert_eq!(v["voice_settings"]["use_speaker_boost"], true);
        assert!(v.get("language_code").is_none());
    }

    #[test]
    fn test_output_format() {
        assert_eq!(OutputFormat::Pcm48000.as_str(), "pcm_48000");
        assert_eq!(OutputFormat::Mp3_44100_192.to_string(), "mp3_44100_192");
        assert_eq!(OutputFormat::Pcm48000.pcm_sample_rate(), Some(48_000));
        assert_eq!(OutputFormat::Mp3_44100_192.pcm_sample_rate(), None);
    }

    #[test]
    fn test_voice_list_decode() {
        let list: VoiceList = serde_json::from_str(
            r#"{"voices":[{"voice_id":"abc","name":"Prince Nuri","category":"professional","labels":{"accent":"ru"}}],"has_more":false,"total_count":1}"#,
        )
        .unwrap();
        assert_eq!(list.voices[0].voice_id, "abc");
        assert_eq!(list.voices[0].labels["accent"], "ru");
    }
}
