//! Image generation backends.

mod openai;

pub use openai::{OpenAiImageClient, OpenAiImageClientBuilder, DEFAULT_BASE_URL};
