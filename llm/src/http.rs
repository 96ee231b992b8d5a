//! Shared request plumbing for the provider clients.

use std::time::Duration;

use reqwest::{Client as ReqwestClient, RequestBuilder};
use serde_json::Value;
use tracing::debug;

use crate::error::{LlmError, Result};

/// Request timeout. Reasoning models can take minutes on long prompts.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(600);

pub(crate) fn build_client() -> Result<ReqwestClient> {
    Ok(ReqwestClient::builder().timeout(DEFAULT_TIMEOUT).build()?)
}

/// Sends a request and decodes a JSON body, mapping non-2xx to [`LlmError::Api`].
pub(crate) async fn send_json(provider: &str, request: RequestBuilder) -> Result<Value> {
    let response = request.send().await?;
    let status = response.status();
    debug!(provider, status = status.as_u16(), "llm response");

    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "unknown".to_string());
        return Err(LlmError::Api {
            provider: provider.to_string(),
            status: status.as_u16(),
            body,
        });
    }

    Ok(response.json().await?)
}

/// Returns the string at `value` or an empty-response error.
pub(crate) fn reply_text(provider: &str, value: &Value) -> Result<String> {
    match value.as_str() {
        Some(text) if !text.trim().is_empty() => Ok(text.to_string()),
        _ => Err(LlmError::EmptyResponse(provider.to_string())),
    }
}

/// Joins a base URL and a path without doubling the slash.
pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}
