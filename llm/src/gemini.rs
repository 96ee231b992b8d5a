//! Gemini `generateContent` client.

use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use serde_json::{Value, json};

use crate::error::Result;
use crate::http::{build_client, join_url, reply_text, send_json};
use crate::types::{ChatClient, ChatRequest, Role};

pub const PROVIDER: &str = "gemini";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const MAX_OUTPUT_TOKENS: u32 = 65000;

pub struct GeminiClient {
    http: ReqwestClient,
    base_url: String,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self> {
        Ok(Self {
            http: build_client()?,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            model: model.into(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn build_body(&self, request: &ChatRequest) -> Value {
        let mut system_parts = Vec::new();
        let mut contents = Vec::new();
        for msg in &request.messages {
            match msg.role {
                Role::System => system_parts.push(json!({"text": msg.content})),
                Role::User => contents.push(json!({
                    "role": "user",
                    "parts": [{"text": msg.content}],
                })),
                Role::Assistant => contents.push(json!({
                    "role": "model",
                    "parts": [{"text": msg.content}],
                })),
            }
        }

        let mut generation_config = json!({
            "maxOutputTokens": request.max_tokens.unwrap_or(MAX_OUTPUT_TOKENS),
        });
        if let Some(t) = request.temperature {
            generation_config["temperature"] = json!(t);
        }
        if let Some(schema) = &request.schema {
            generation_config["responseMimeType"] = json!("application/json");
            generation_config["responseJsonSchema"] = schema.clone();
        }

        let mut body = json!({
            "contents": contents,
            "generationConfig": generation_config,
        });
        if !system_parts.is_empty() {
            body["systemInstruction"] = json!({ "parts": system_parts });
        }
        body
    }
}

#[async_trait]
impl ChatClient for GeminiClient {
    fn provider(&self) -> &str {
        PROVIDER
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn chat(&self, request: &ChatRequest) -> Result<String> {
        let url = join_url(
            &self.base_url,
            &format!("models/{}:generateContent", self.model),
        );
        let body = self.build_body(request);
        let builder = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body);
        let value = send_json(PROVIDER, builder).await?;
        reply_text(PROVIDER, &value["candidates"][0]["content"]["parts"][0]["text"])
    }
}
