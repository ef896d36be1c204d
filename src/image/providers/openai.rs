//! OpenAI image generation client (dall-e-2, dall-e-3).

use crate::error::{GenerationError, Result};
use crate::image::provider::ImageGenerator;
use crate::image::types::{Credential, GeneratedImage, GenerationMetadata, GenerationRequest};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Default API origin.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";

const GENERATIONS_PATH: &str = "/v1/images/generations";

/// Longest slice of an error body that is written to the log.
const MAX_LOGGED_BODY: usize = 512;

/// Builder for OpenAiImageClient.
#[derive(Debug, Clone, Default)]
pub struct OpenAiImageClientBuilder {
    base_url: Option<String>,
    client: Option<reqwest::Client>,
}

impl OpenAiImageClientBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the API origin (default: `https://api.openai.com`).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Uses a preconfigured HTTP client.
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Builds the client.
    pub fn build(self) -> OpenAiImageClient {
        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let endpoint = format!("{}{}", base_url.trim_end_matches('/'), GENERATIONS_PATH);

        OpenAiImageClient {
            client: self.client.unwrap_or_default(),
            endpoint,
        }
    }
}

/// OpenAI image generation client.
///
/// Holds no credential of its own; the caller passes one per request so a key
/// entered mid-session takes effect immediately.
#[derive(Debug, Clone)]
pub struct OpenAiImageClient {
    client: reqwest::Client,
    endpoint: String,
}

impl Default for OpenAiImageClient {
    fn default() -> Self {
        OpenAiImageClientBuilder::new().build()
    }
}

impl OpenAiImageClient {
    /// Creates a new `OpenAiImageClientBuilder`.
    pub fn builder() -> OpenAiImageClientBuilder {
        OpenAiImageClientBuilder::new()
    }

    /// Full URL requests are posted to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn send(
        &self,
        credential: &Credential,
        request: &GenerationRequest,
    ) -> std::result::Result<OpenAiImageResponse, FailureCause> {
        let body = OpenAiImageRequest::from_generation_request(request);

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", credential.as_str()))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(FailureCause::Network)?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(FailureCause::Status {
                status: status.as_u16(),
                body: truncate_for_log(&text),
            });
        }

        response.json().await.map_err(FailureCause::Network)
    }
}

#[async_trait]
impl ImageGenerator for OpenAiImageClient {
    async fn generate(
        &self,
        credential: &Credential,
        request: &GenerationRequest,
    ) -> Result<GeneratedImage> {
        if credential.is_empty() {
            return Err(GenerationError::MissingCredential);
        }

        let start = Instant::now();
        tracing::debug!(
            model = request.model.as_str(),
            size = request.size.as_str(),
            "submitting image generation request"
        );

        let response = match self.send(credential, request).await {
            Ok(response) => response,
            Err(cause) => {
                tracing::warn!("image generation failed: {cause}");
                return Err(GenerationError::GenerationFailed);
            }
        };

        let image_data = response.data.into_iter().next();
        let Some(OpenAiImageData {
            url: Some(url),
            revised_prompt,
        }) = image_data
        else {
            tracing::warn!("image generation failed: response contained no image url");
            return Err(GenerationError::GenerationFailed);
        };

        let duration_ms = start.elapsed().as_millis() as u64;
        tracing::debug!(url = %url, duration_ms, "image generation complete");

        Ok(GeneratedImage::new(
            url,
            GenerationMetadata {
                model: Some(request.model.as_str().to_string()),
                revised_prompt,
                duration_ms: Some(duration_ms),
            },
        ))
    }

    fn name(&self) -> &str {
        "OpenAI Images"
    }
}

/// Why a call failed. Logged, never returned to callers.
#[derive(Debug, thiserror::Error)]
enum FailureCause {
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("API returned {status}: {body}")]
    Status { status: u16, body: String },
}

fn truncate_for_log(text: &str) -> String {
    match text.char_indices().nth(MAX_LOGGED_BODY) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

#[derive(Debug, Serialize)]
struct OpenAiImageRequest {
    model: String,
    prompt: String,
    n: u32,
    size: String,
}

impl OpenAiImageRequest {
    fn from_generation_request(req: &GenerationRequest) -> Self {
        Self {
            model: req.model.as_str().to_string(),
            prompt: req.prompt.clone(),
            n: GenerationRequest::COUNT,
            size: req.size.as_str().to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OpenAiImageResponse {
    data: Vec<OpenAiImageData>,
}

#[derive(Debug, Deserialize)]
struct OpenAiImageData {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    revised_prompt: Option<String>,
}
