//! Input form state behind the generate action.

use crate::image::types::{GenerationRequest, ImageModel, ImageSize};

/// Current prompt, model and size selections.
///
/// Keeps the selected size within what the selected model offers. This is a
/// presentation guard only; [`GenerationRequest`] itself accepts any pairing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Form {
    prompt: String,
    model: ImageModel,
    size: ImageSize,
}

impl Form {
    /// Creates a form with default selections and an empty prompt.
    pub fn new() -> Self {
        Self::default()
    }

    /// The prompt text.
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// The selected model.
    pub fn model(&self) -> ImageModel {
        self.model
    }

    /// The selected size.
    pub fn size(&self) -> ImageSize {
        self.size
    }

    /// Replaces the prompt text.
    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.prompt = prompt.into();
    }

    /// Selects a model, falling back to the default size if the current one
    /// is not offered by it.
    pub fn set_model(&mut self, model: ImageModel) {
        self.model = model;
        if !model.supports(self.size) {
            self.size = ImageSize::default();
        }
    }

    /// Selects a size. Returns false and leaves the selection unchanged if the
    /// current model does not offer it.
    pub fn set_size(&mut self, size: ImageSize) -> bool {
        if !self.model.supports(size) {
            return false;
        }
        self.size = size;
        true
    }

    /// Sizes available for the current model.
    pub fn size_options(&self) -> &'static [ImageSize] {
        self.model.supported_sizes()
    }

    /// Builds the request for the current selections.
    pub fn to_request(&self) -> GenerationRequest {
        GenerationRequest::new(self.prompt.clone())
            .with_model(self.model)
            .with_size(self.size)
    }
}
