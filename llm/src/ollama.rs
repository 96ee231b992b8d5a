//! Ollama chat client.

use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{info, warn};

use crate::error::Result;
use crate::http::{build_client, join_url, reply_text, send_json};
use crate::types::{ChatClient, ChatRequest};

pub const PROVIDER: &str = "ollama";
pub const DEFAULT_HOST: &str = "http://localhost:11434";
pub const DEFAULT_MODEL: &str = "qwen3:30b-a3b";
/// Context window requested for every chat.
pub const NUM_CTX: u32 = 32768;

/// Client for a local or remote Ollama server.
pub struct OllamaClient {
    http: ReqwestClient,
    host: String,
    model: String,
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<ModelTag>,
}

#[derive(Debug, Deserialize)]
struct ModelTag {
    name: String,
}

impl OllamaClient {
    pub fn new(host: impl Into<String>, model: impl Into<String>) -> Result<Self> {
        Ok(Self {
            http: build_client()?,
            host: host.into(),
            model: model.into(),
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Lists models installed on the server.
    pub async fn list_models(&self) -> Result<Vec<String>> {
        let url = join_url(&self.host, "/api/tags");
        let value = send_json(PROVIDER, self.http.get(&url)).await?;
        let tags: TagsResponse = serde_json::from_value(value)?;
        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }

    /// Checks that the configured model is installed. Logs a warning when it
    /// is not; the server may still pull it on first use.
    pub async fn check_model(&self) -> Result<bool> {
        let models = self.list_models().await?;
        let found = models.iter().any(|m| m == &self.model);
        if found {
            info!(model = %self.model, "ollama model available");
        } else {
            warn!(model = %self.model, available = ?models, "ollama model not found on server");
        }
        Ok(found)
    }

    fn build_body(&self, request: &ChatRequest) -> Value {
        let messages: Vec<Value> = request
            .messages
            .iter()
            .map(|m| json!({"role": m.role.as_str(), "content": m.content}))
            .collect();

        let mut options = json!({ "num_ctx": NUM_CTX });
        if let Some(t) = request.temperature {
            options["temperature"] = json!(t);
        }
        if let Some(max) = request.max_tokens {
            options["num_predict"] = json!(max);
        }

        let mut body = json!({
            "model": self.model,
            "messages": messages,
            "stream": false,
            "options": options,
        });
        if let Some(schema) = &request.schema {
            body["format"] = schema.clone();
        }
        body
    }
}

#[async_trait]
impl ChatClient for OllamaClient {
    fn provider(&self) -> &str {
        PROVIDER
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn chat(&self, request: &ChatRequest) -> Result<String> {
        let url = join_url(&self.host, "/api/chat");
        let body = self.build_body(request);
        let value = send_json(PROVIDER, self.http.post(&url).json(&body)).await?;
        reply_text(PROVIDER, &value["message"]["content"])
    }

    async fn preflight(&self) -> Result<()> {
        self.check_model().await.map(|_| ())
    }
}
