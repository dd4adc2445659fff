//! Hugging Face backend implementation
//!
//! Sends generation requests to the shared inference API (`/models/{id}`)
//! or straight to a dedicated inference endpoint, and decodes the
//! server-sent event stream into [`TextGenerationStreamOutput`] records.

use async_trait::async_trait;
use eventsource_stream::Eventsource;
use futures_util::StreamExt;

use super::{BackendError, ClientFactory, InferenceTarget, TextGenerationClient, TokenStream};
use crate::constants;
use crate::types::{TextGenerationRequest, TextGenerationStreamOutput};

/// Factory for [`HfInferenceClient`]s
///
/// Clients built by one factory share its HTTP connection pool.
#[derive(Clone)]
pub struct HfClientFactory {
    http_client: reqwest::Client,
    base_url: String,
}

impl HfClientFactory {
    /// Factory targeting the public inference API
    pub fn new() -> Self {
        Self::with_base_url(constants::hosts::INFERENCE_API)
    }

    /// Factory targeting another inference API host (mirrors, tests)
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL requests for `target` are posted to
    pub fn url_for(&self, target: &InferenceTarget) -> Result<String, BackendError> {
        match target {
            InferenceTarget::Model(model) if model.trim().is_empty() => {
                Err(BackendError::Config("Model id is empty".to_string()))
            }
            InferenceTarget::Model(model) => Ok(format!(
                "{}/{}/{}",
                self.base_url,
                constants::paths::MODELS,
                model.trim()
            )),
            InferenceTarget::Endpoint(endpoint) if endpoint.trim().is_empty() => {
                Err(BackendError::Config("Endpoint URL is empty".to_string()))
            }
            InferenceTarget::Endpoint(endpoint) => Ok(endpoint.trim().to_string()),
        }
    }
}

impl Default for HfClientFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientFactory for HfClientFactory {
    fn connect(
        &self,
        target: &InferenceTarget,
        access_token: Option<&str>,
    ) -> Result<Box<dyn TextGenerationClient>, BackendError> {
        let url = self.url_for(target)?;

        if access_token.is_none() {
            log::warn!("No access token configured; sending unauthenticated requests to {}", url);
        }

        Ok(Box::new(HfInferenceClient {
            http_client: self.http_client.clone(),
            url,
            access_token: access_token.map(str::to_string),
        }))
    }
}

/// Client bound to one model or endpoint URL
pub struct HfInferenceClient {
    http_client: reqwest::Client,
    url: String,
    access_token: Option<String>,
}

impl HfInferenceClient {
    /// URL generation requests are posted to
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Decode one SSE `data` payload
    ///
    /// Returns `Ok(None)` for keep-alives and the terminal `[DONE]` marker.
    fn parse_event(data: &str) -> Result<Option<TextGenerationStreamOutput>, BackendError> {
        let data = data.trim();
        if data.is_empty() || data == "[DONE]" {
            return Ok(None);
        }

        let json: serde_json::Value = serde_json::from_str(data)?;
        if let Some(error) = json.get("error") {
            let message = error
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| error.to_string());
            return Err(BackendError::Inference(message));
        }

        Ok(Some(serde_json::from_value(json)?))
    }

    /// Turn an error response body into a readable message
    fn error_message(body: &str) -> String {
        serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|json| json.get("error").and_then(|e| e.as_str()).map(str::to_string))
            .unwrap_or_else(|| body.to_string())
    }
}

#[async_trait]
impl TextGenerationClient for HfInferenceClient {
    async fn text_generation_stream(
        &self,
        request: TextGenerationRequest,
    ) -> Result<TokenStream, BackendError> {
        log::debug!(
            "HfInferenceClient: streaming {} prompt chars to {}",
            request.inputs.len(),
            self.url
        );

        let mut builder = self
            .http_client
            .post(&self.url)
            .header(reqwest::header::USER_AGENT, constants::USER_AGENT)
            .header(reqwest::header::ACCEPT, "text/event-stream")
            .json(&request.to_body());

        if let Some(token) = &self.access_token {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Api {
                status,
                message: Self::error_message(&body),
            });
        }

        // Models that cannot stream answer with a plain JSON body
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();
        if !content_type.starts_with("text/event-stream") {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Stream(format!(
                "Expected an event stream, got '{}': {}",
                content_type,
                Self::error_message(&body)
            )));
        }

        let stream = response
            .bytes_stream()
            .eventsource()
            .filter_map(|event| {
                let item = match event {
                    Ok(event) => Self::parse_event(&event.data).transpose(),
                    Err(e) => Some(Err(BackendError::Stream(e.to_string()))),
                };
                futures_util::future::ready(item)
            });

        Ok(Box::pin(stream))
    }
}
