//! Image generator trait.

use crate::error::Result;
use crate::image::types::{Credential, GeneratedImage, GenerationRequest};
use async_trait::async_trait;

/// Trait for image generation backends.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Generates one image for `request`, authorized by `credential`.
    ///
    /// Implementations must return [`GenerationError::MissingCredential`]
    /// without any network activity when `credential` is empty, and
    /// [`GenerationError::GenerationFailed`] for every other failure.
    /// A single attempt is made.
    ///
    /// [`GenerationError::MissingCredential`]: crate::GenerationError::MissingCredential
    /// [`GenerationError::GenerationFailed`]: crate::GenerationError::GenerationFailed
    async fn generate(
        &self,
        credential: &Credential,
        request: &GenerationRequest,
    ) -> Result<GeneratedImage>;

    /// Returns the name of this generator for display.
    fn name(&self) -> &str;
}

