/// Ollama HTTP client.
///
/// Talks to `POST /api/generate` (with streaming disabled) and `GET /api/tags`.
/// Every call is a single request with no retry; failures surface immediately.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::LlmBackend;
use crate::core::error::GatewayError;

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    models: Option<Value>,
}

pub struct OllamaClient {
    http: HttpClient,
    base_url: String,
}

impl OllamaClient {
    /// Build a client for `base_url`. With `timeout` unset, requests wait as
    /// long as the upstream takes.
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, GatewayError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();

        let mut builder = HttpClient::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(|e| GatewayError::UpstreamRequest {
            endpoint: base_url.clone(),
            source: e,
        })?;

        Ok(Self { http, base_url })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a prepared request and decode a 2xx JSON body.
    async fn send_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<T, GatewayError> {
        let response = request.send().await.map_err(|e| GatewayError::UpstreamRequest {
            endpoint: endpoint.to_string(),
            source: e,
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::UpstreamStatus {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await.map_err(|e| GatewayError::UpstreamRequest {
            endpoint: endpoint.to_string(),
            source: e,
        })?;

        serde_json::from_slice(&bytes).map_err(|e| GatewayError::UpstreamBody {
            endpoint: endpoint.to_string(),
            reason: format!("invalid JSON: {e}"),
        })
    }
}

#[async_trait]
impl LlmBackend for OllamaClient {
    async fn generate(&self, model: &str, prompt: &str) -> Result<String, GatewayError> {
        let endpoint = self.endpoint("/api/generate");
        let body = GenerateRequest {
            model,
            prompt,
            stream: false,
        };

        tracing::debug!(%endpoint, model, "calling ollama generate");
        let parsed: GenerateResponse = self
            .send_json(&endpoint, self.http.post(&endpoint).json(&body))
            .await?;

        parsed.response.ok_or_else(|| GatewayError::UpstreamBody {
            endpoint,
            reason: "missing `response` field".to_string(),
        })
    }

    async fn list_models(&self) -> Result<Value, GatewayError> {
        let endpoint = self.endpoint("/api/tags");

        tracing::debug!(%endpoint, "listing ollama models");
        let parsed: TagsResponse = self.send_json(&endpoint, self.http.get(&endpoint)).await?;

        parsed.models.ok_or_else(|| GatewayError::UpstreamBody {
            endpoint,
            reason: "missing `models` field".to_string(),
        })
    }
}
