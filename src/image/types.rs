//! Core types for image generation.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Supported image models.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImageModel {
    /// DALL-E 2.
    #[serde(rename = "dall-e-2")]
    DallE2,
    /// DALL-E 3 - high quality image generation.
    #[default]
    #[serde(rename = "dall-e-3")]
    DallE3,
}

impl ImageModel {
    /// All models, in display order.
    pub const ALL: [ImageModel; 2] = [ImageModel::DallE2, ImageModel::DallE3];

    /// Returns the API model identifier string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DallE2 => "dall-e-2",
            Self::DallE3 => "dall-e-3",
        }
    }

    /// Sizes this model accepts.
    pub fn supported_sizes(&self) -> &'static [ImageSize] {
        match self {
            Self::DallE2 => &[ImageSize::Small, ImageSize::Medium, ImageSize::Square],
            Self::DallE3 => &[
                ImageSize::Small,
                ImageSize::Medium,
                ImageSize::Square,
                ImageSize::Wide,
            ],
        }
    }

    /// Returns true if `size` is one of [`Self::supported_sizes`].
    pub fn supports(&self, size: ImageSize) -> bool {
        self.supported_sizes().contains(&size)
    }
}

impl std::fmt::Display for ImageModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImageModel {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dall-e-2" => Ok(Self::DallE2),
            "dall-e-3" => Ok(Self::DallE3),
            other => Err(ParseOptionError::new("model", other)),
        }
    }
}

/// Output dimensions offered by the image API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImageSize {
    /// 256x256.
    #[serde(rename = "256x256")]
    Small,
    /// 512x512.
    #[serde(rename = "512x512")]
    Medium,
    /// 1024x1024.
    #[default]
    #[serde(rename = "1024x1024")]
    Square,
    /// 1792x1024 landscape.
    #[serde(rename = "1792x1024")]
    Wide,
}

impl ImageSize {
    /// Returns the size as the API expects it (e.g., "1024x1024").
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Small => "256x256",
            Self::Medium => "512x512",
            Self::Square => "1024x1024",
            Self::Wide => "1792x1024",
        }
    }
}

impl std::fmt::Display for ImageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImageSize {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "256x256" => Ok(Self::Small),
            "512x512" => Ok(Self::Medium),
            "1024x1024" => Ok(Self::Square),
            "1792x1024" => Ok(Self::Wide),
            other => Err(ParseOptionError::new("size", other)),
        }
    }
}

/// Error parsing a model or size name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value:?}")]
pub struct ParseOptionError {
    kind: &'static str,
    value: String,
}

impl ParseOptionError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Bearer token used to authorize generation calls.
///
/// An empty value means "unset". The value is never validated locally.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wraps a raw token.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns true if no token is set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the raw token.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            f.write_str("Credential(<unset>)")
        } else {
            f.write_str("Credential(<redacted>)")
        }
    }
}

impl From<&str> for Credential {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Credential {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A request to generate an image.
///
/// Model and size are not cross-checked here; the service is the judge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// The text prompt describing the desired image.
    pub prompt: String,
    /// Model to generate with.
    pub model: ImageModel,
    /// Output dimensions.
    pub size: ImageSize,
}

impl GenerationRequest {
    /// Number of images requested per call.
    pub const COUNT: u32 = 1;

    /// Creates a new request with the given prompt and default model/size.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            model: ImageModel::default(),
            size: ImageSize::default(),
        }
    }

    /// Sets the model.
    pub fn with_model(mut self, model: ImageModel) -> Self {
        self.model = model;
        self
    }

    /// Sets the output size.
    pub fn with_size(mut self, size: ImageSize) -> Self {
        self.size = size;
        self
    }
}

/// Metadata about the generation process.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationMetadata {
    /// Model used for generation.
    pub model: Option<String>,
    /// Prompt as rewritten by the service, if it did so.
    pub revised_prompt: Option<String>,
    /// Request duration in milliseconds.
    pub duration_ms: Option<u64>,
}

/// A generated image, referenced by URL.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "generated image should be displayed or recorded"]
pub struct GeneratedImage {
    /// Where the image can be fetched from.
    pub url: String,
    /// Generation metadata.
    pub metadata: GenerationMetadata,
}

impl GeneratedImage {
    /// Creates a new generated image reference.
    pub fn new(url: impl Into<String>, metadata: GenerationMetadata) -> Self {
        Self {
            url: url.into(),
            metadata,
        }
    }
}
