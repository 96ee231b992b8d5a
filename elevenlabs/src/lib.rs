//! ElevenLabs API SDK for Rust.
//!
//! Covers the two endpoints dataset synthesis needs: voice search and
//! text-to-speech conversion.

mod client;
mod error;
pub mod http;
mod speech;
mod types;
mod voice;

pub use client::{Client, ClientBuilder, DEFAULT_BASE_URL, DEFAULT_MAX_RETRIES};
pub use error::{Error, Result};
pub use speech::SpeechService;
pub use types::{
    DEFAULT_MODEL_ID, OutputFormat, TextToSpeechRequest, Voice, VoiceList, VoiceSettings,
};
pub use voice::VoiceService;
