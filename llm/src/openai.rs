//! OpenAI-compatible chat completions client.
//!
//! Used for DeepSeek and OpenRouter, which differ only in base URL, default
//! model and how structured output is requested.

use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use serde_json::{Value, json};

use crate::error::Result;
use crate::http::{build_client, join_url, reply_text, send_json};
use crate::types::{ChatClient, ChatRequest};

pub const DEEPSEEK: &str = "deepseek";
pub const DEEPSEEK_BASE_URL: &str = "https://api.deepseek.com";
pub const DEEPSEEK_MODEL: &str = "deepseek-reasoner";

pub const OPENROUTER: &str = "openrouter";
pub const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const OPENROUTER_MODEL: &str = "openai/gpt-4.1";
pub const OPENROUTER_MAX_TOKENS: u32 = 32000;

/// How a request schema is passed to the endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaMode {
    /// `response_format = {"type": "json_object"}`; the schema itself is
    /// only described by the prompt.
    JsonObject,
    /// Strict `json_schema` response format.
    JsonSchema,
}

/// Chat client for `POST {base_url}/chat/completions`.
pub struct OpenAiCompatible {
    http: ReqwestClient,
    provider: String,
    base_url: String,
    api_key: String,
    model: String,
    schema_mode: SchemaMode,
    max_tokens: Option<u32>,
}

impl OpenAiCompatible {
    pub fn new(
        provider: impl Into<String>,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Result<Self> {
        Ok(Self {
            http: build_client()?,
            provider: provider.into(),
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
            schema_mode: SchemaMode::JsonObject,
            max_tokens: None,
        })
    }

    /// DeepSeek with JSON-object output.
    pub fn deepseek(api_key: impl Into<String>, model: Option<String>) -> Result<Self> {
        Self::new(
            DEEPSEEK,
            DEEPSEEK_BASE_URL,
            api_key,
            model.unwrap_or_else(|| DEEPSEEK_MODEL.to_string()),
        )
    }

    /// OpenRouter with strict schema output.
    pub fn openrouter(api_key: impl Into<String>, model: Option<String>) -> Result<Self> {
        Ok(Self::new(
            OPENROUTER,
            OPENROUTER_BASE_URL,
            api_key,
            model.unwrap_or_else(|| OPENROUTER_MODEL.to_string()),
        )?
        .with_schema_mode(SchemaMode::JsonSchema)
        .with_max_tokens(OPENROUTER_MAX_TOKENS))
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_schema_mode(mut self, mode: SchemaMode) -> Self {
        self.schema_mode = mode;
        self
    }

    /// Default completion cap, used when the request sets none.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    fn build_body(&self, request: &ChatRequest) -> Value {
        let messages: Vec<Value> = request
            .messages
            .iter()
            .map(|m| json!({"role": m.role.as_str(), "content": m.content}))
            .collect();

        let mut body = json!({
            "model": self.model,
            "messages": messages,
            "stream": false,
        });
        if let Some(t) = request.temperature {
            body["temperature"] = json!(t);
        }
        if let Some(max) = request.max_tokens.or(self.max_tokens) {
            body["max_tokens"] = json!(max);
        }
        if let Some(schema) = &request.schema {
            body["response_format"] = match self.schema_mode {
                SchemaMode::JsonObject => json!({"type": "json_object"}),
                SchemaMode::JsonSchema => json!({
                    "type": "json_schema",
                    "json_schema": {
                        "name": "response",
                        "strict": true,
                        "schema": schema,
                    },
                }),
            };
        }
        body
    }
}

#[async_trait]
impl ChatClient for OpenAiCompatible {
    fn provider(&self) -> &str {
        &self.provider
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn chat(&self, request: &ChatRequest) -> Result<String> {
        let url = join_url(&self.base_url, "chat/completions");
        let body = self.build_body(request);
        let builder = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body);
        let value = send_json(&self.provider, builder).await?;
        reply_text(&self.provider, &value["choices"][0]["message"]["content"])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema_request() -> ChatRequest {
        let mut req = ChatRequest::new("sys", "usr").with_temperature(0.3);
        req.schema = Some(json!({"type": "object", "properties": {}}));
        req
    }

    #[test]
    fn test_deepseek_body() {
        let client = OpenAiCompatible::deepseek("sk-test", None).unwrap();
        assert_eq!(client.model(), "deepseek-reasoner");
        let body = client.build_body(&schema_request());
        assert_eq!(body["response_format"]["type"], "json_object");
        assert!(body.get("max_tokens").is_none());
        assert_eq!(body["messages"][0]["role"], "system");
    }

    #[test]
    fn test_openrouter_body() {
        let client = OpenAiCompatible::openrouter("sk-or", Some("x/y".into())).unwrap();
        assert_eq!(client.model(), "x/y");
        let body = client.build_body(&schema_request());
        assert_eq!(body["response_format"]["type"], "json_schema");
        assert_eq!(body["response_format"]["json_schema"]["strict"], true);
        assert_eq!(body["max_tokens"], 32000);
    }

    #[test]
    fn test_no_schema_no_response_format() {
        let client = OpenAiCompatible::deepseek("k", None).unwrap();
        let body = client.build_body(&ChatRequest::new("s", "u"));
        assert!(body.get("response_format").is_none());
    }
}
