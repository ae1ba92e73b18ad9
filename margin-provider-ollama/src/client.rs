//! Ollama API client struct and builder.

use std::future::Future;

use margin_types::{GenerateHandle, Model, ModelError, Settings};

use crate::error::{map_http_status, map_send_error};
use crate::streaming::stream_generation;
use crate::types::{GenerateRequest, TagsResponse};

/// Default model used when none is configured.
const DEFAULT_MODEL: &str = "llama2";

/// Default Ollama API base URL.
const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Client for the Ollama generate API.
///
/// Implements [`Model`] for use anywhere a backend is accepted.
///
/// # Example
///
/// ```no_run
/// use margin_provider_ollama::Ollama;
///
/// let client = Ollama::new()
///     .model("llama2")
///     .base_url("http://localhost:11434");
/// ```
pub struct Ollama {
    /// Model identifier sent with every generation request.
    pub(crate) model: String,
    /// API base URL (override for testing or remote instances).
    pub(crate) base_url: String,
    /// Shared HTTP client.
    pub(crate) client: reqwest::Client,
}

impl Ollama {
    /// Create a new client with the local-server defaults.
    ///
    /// Default model: `llama2`. Default base URL:
    /// `http://localhost:11434`. No authentication: Ollama is local.
    #[must_use]
    pub fn new() -> Self {
        Self {
            model: DEFAULT_MODEL.into(),
            base_url: DEFAULT_BASE_URL.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Build a client from persisted settings.
    #[must_use]
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new()
            .base_url(settings.ollama_url.clone())
            .model(settings.model_name.clone())
    }

    /// Override the model.
    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Override the API base URL.
    ///
    /// Useful for testing with a mock server or a remote Ollama instance.
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Build the generate endpoint URL.
    pub(crate) fn generate_url(&self) -> String {
        format!("{}/api/generate", self.base_url)
    }

    /// Build the model-list endpoint URL.
    pub(crate) fn tags_url(&self) -> String {
        format!("{}/api/tags", self.base_url)
    }
}

impl Default for Ollama {
    fn default() -> Self {
        Self::new()
    }
}

impl Model for Ollama {
    /// Start a streaming generation via `POST /api/generate`.
    ///
    /// The request carries `stream: true`; the response body is consumed
    /// as NDJSON by the [`crate::streaming`] parser.
    fn generate(
        &self,
        prompt: &str,
    ) -> impl Future<Output = Result<GenerateHandle, ModelError>> + Send {
        let url = self.generate_url();
        let body = GenerateRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            stream: true,
        };
        let http_client = self.client.clone();

        async move {
            tracing::debug!(url = %url, model = %body.model, "sending generate request to Ollama");

            let response = http_client
                .post(&url)
                .header("content-type", "application/json")
                .json(&body)
                .send()
                .await
                .map_err(map_send_error)?;

            let status = response.status();
            if !status.is_success() {
                return Err(map_http_status(status));
            }

            Ok(stream_generation(response))
        }
    }

    /// List available models via `GET /api/tags`.
    ///
    /// Every failure collapses to an empty list: a dead server, a
    /// non-success status, or a body that does not parse all look the same
    /// to the caller.
    fn models(&self) -> impl Future<Output = Vec<String>> + Send {
        let url = self.tags_url();
        let http_client = self.client.clone();

        async move {
            let response = match http_client.get(&url).send().await {
                Ok(response) => response,
                Err(e) => {
                    tracing::warn!(error = %e, "failed to fetch model list");
                    return Vec::new();
                }
            };

            if !response.status().is_success() {
                tracing::warn!(status = %response.status(), "model list request rejected");
                return Vec::new();
            }

            match response.json::<TagsResponse>().await {
                Ok(tags) => tags.models.into_iter().map(|m| m.name).collect(),
                Err(e) => {
                    tracing::warn!(error = %e, "failed to parse model list");
                    Vec::new()
                }
            }
        }
    }
}
