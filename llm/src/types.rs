//! Chat request types and the client capability.

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;

/// Message role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// A single chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// One non-streaming completion request.
#[derive(Debug, Clone, Default)]
pub struct ChatRequest {
    pub messages: Vec<Message>,
    pub temperature: Option<f32>,
    /// JSON Schema the reply must follow.
    pub schema: Option<Value>,
    pub max_tokens: Option<u32>,
}

impl ChatRequest {
    /// Creates a request with a system prompt and one user message.
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::system(system), Message::user(user)],
            ..Default::default()
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Requests structured output shaped like `T`.
    pub fn with_schema<T: JsonSchema>(mut self) -> Self {
        let schema = schemars::schema_for!(T);
        self.schema = Some(serde_json::to_value(&schema).unwrap_or_default());
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Text of the first system message, if any.
    pub fn system_prompt(&self) -> Option<&str> {
        self.messages
            .iter()
            .find(|m| m.role == Role::System)
            .map(|m| m.content.as_str())
    }
}

/// A chat model that answers one request with one text reply.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Provider tag, e.g. `"ollama"`.
    fn provider(&self) -> &str;

    /// Model name sent with each request.
    fn model(&self) -> &str;

    /// Sends the request and returns the raw reply text.
    async fn chat(&self, request: &ChatRequest) -> Result<String>;

    /// Checks the provider before any work is done.
    async fn preflight(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, JsonSchema)]
    #[allow(dead_code)]
    struct Reply {
        converted_text: String,
    }

    #[test]
    fn test_request_builder() {
        let req = ChatRequest::new("be terse", "hello")
            .with_temperature(0.3)
            .with_max_tokens(100)
            .with_schema::<Reply>();

        assert_eq!(req.messages.len(), 2);
        assert_eq!(req.messages[1].role, Role::User);
        assert_eq!(req.system_prompt(), Some("be terse"));
        assert_eq!(req.temperature, Some(0.3));
        let schema = req.schema.unwrap();
        assert!(schema["properties"]["converted_text"].is_object());
    }

    #[test]
    fn test_role_serde() {
        assert_eq!(serde_json::to_string(&Role::Assistant).unwrap(), "\"assistant\"");
        assert_eq!(Role::System.as_str(), "system");
    }
}
