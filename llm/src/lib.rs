//! Structured-output chat clients.
//!
//! One request, one text reply. Every provider is reached over its plain
//! HTTP API and selected by tag through a [`Registry`].
//!
//! # Example
//!
//! ```rust,ignore
//! use ttsprep_llm::{ChatRequest, ProviderConfig, Registry, json_utils};
//!
//! let client = Registry::builtin().create("ollama", &ProviderConfig::default())?;
//! let reply = client
//!     .chat(&ChatRequest::new(SYSTEM, text).with_schema::<Reply>())
//!     .await?;
//! let reply: Reply = json_utils::parse_reply(&reply)?;
//! ```

mod error;
mod http;
mod registry;
mod types;

pub mod gemini;
pub mod json_utils;
pub mod ollama;
pub mod openai;

pub use error::{LlmError, Result};
pub use gemini::GeminiClient;
pub use ollama::OllamaClient;
pub use openai::{OpenAiCompatible, SchemaMode};
pub use registry::{Factory, ProviderConfig, Registry, default_model, requires_api_key};
pub use types::{ChatClient, ChatRequest, Message, Role};
