//! Image generation module.

mod form;
mod provider;
pub mod providers;
mod types;

pub use form::Form;
pub use provider::ImageGenerator;
pub use types::{
    Credential, GeneratedImage, GenerationMetadata, GenerationRequest, ImageModel, ImageSize,
    ParseOptionError,
};
