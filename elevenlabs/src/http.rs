//! HTTP client implementation for the ElevenLabs API.

use std::time::Duration;

use reqwest::{
    Client as ReqwestClient, Method,
    header::{CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT},
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::{debug, warn};

use super::error::{Error, Result};

const API_KEY_HEADER: &str = "xi-api-key";

/// HTTP client for the ElevenLabs API.
pub struct HttpClient {
    client: ReqwestClient,
    base_url: String,
    headers: HeaderMap,
    max_retries: u32,
}

impl HttpClient {
    /// Creates a new HTTP client.
    pub fn new(base_url: String, api_key: &str, max_retries: u32) -> Result<Self> {
        let client = ReqwestClient::builder()
            .timeout(Duration::from_secs(300))
            .build()?;

        let mut headers = HeaderMap::new();
        headers.insert(
            API_KEY_HEADER,
            HeaderValue::from_str(api_key).map_err(|e| Error::Config(e.to_string()))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static("ttsprep-elevenlabs/0.1"));

        Ok(Self {
            client,
            base_url,
            headers,
            max_retries,
        })
    }

    /// GET a JSON resource.
    pub async fn get_json<R>(&self, path: &str, query: &[(&str, &str)]) -> Result<R>
    where
        R: DeserializeOwned,
    {
        let body = self.request::<()>(Method::GET, path, query, None).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// POST a JSON body and return the raw response bytes.
    pub async fn post_bytes<T>(&self, path: &str, query: &[(&str, &str)], body: &T) -> Result<Vec<u8>>
    where
        T: Serialize + ?Sized,
    {
        self.request(Method::POST, path, query, Some(body)).await
    }

    /// Makes an HTTP request to the API with retry support.
    async fn request<T>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&T>,
    ) -> Result<Vec<u8>>
    where
        T: Serialize + ?Sized,
    {
        let mut last_err = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s, 4s, ...
                let backoff = Duration::from_secs(1 << (attempt - 1));
                tokio::time::sleep(backoff).await;
            }

            match self.do_request(method.clone(), path, query, body).await {
                Ok(bytes) => return Ok(bytes),
                Err(e) if e.is_retryable() => {
                    warn!(attempt, path, error = %e, "elevenlabs request failed, retrying");
                    last_err = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_err.unwrap_or_else(|| Error::Other("max retries exceeded".to_string())))
    }

    /// Performs a single HTTP request.
    async fn do_request<T>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&T>,
    ) -> Result<Vec<u8>>
    where
        T: Serialize + ?Sized,
    {
        let url = format!("{}{}", self.base_url.trim_end_matches('/'), path);
        debug!(%method, %url, "elevenlabs request");

        let mut request = self
            .client
            .request(method, &url)
            .headers(self.headers.clone());
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            return Err(parse_error(&bytes, status.as_u16()));
        }
        Ok(bytes.to_vec())
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: ErrorDetail,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorDetail {
    Structured {
        #[serde(default)]
        status: String,
        #[serde(default)]
        message: String,
    },
    Text(String),
    Other(serde_json::Value),
}

/// Parses an error response body.
pub(crate) fn parse_error(body: &[u8], http_status: u16) -> Error {
    match serde_json::from_slice::<ErrorBody>(body) {
        Ok(ErrorBody {
            detail: ErrorDetail::Structured { status, message },
        }) => Error::api(status, message, http_status),
        Ok(ErrorBody {
            detail: ErrorDetail::Text(message),
        }) => Error::api("", message, http_status),
        Ok(ErrorBody {
            detail: ErrorDetail::Other(value),
        }) => Error::api("", value.to_string(), http_status),
        Err(_) => Error::api("", String::from_utf8_lossy(body).to_string(), http_status),
    }
}
