#![warn(missing_docs)]
//! dalle-studio - prompt-to-image client with a persisted local history.
//!
//! Type a prompt, pick a model and size, get back an image URL. Generated
//! URLs are kept in a most-recent-first history, and the API key is stored
//! alongside it, in a small key-value state file.
//!
//! # Quick Start
//!
//! ```no_run
//! use dalle_studio::{FileStore, ImageModel, OpenAiImageClient, Session};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), dalle_studio::SessionError> {
//!     let mut session = Session::new(FileStore::new("state.json"));
//!     if session.credential_prompt_visible() {
//!         session.submit_credential("sk-...");
//!     }
//!
//!     session.form_mut().set_prompt("a red fox");
//!     session.form_mut().set_model(ImageModel::DallE3);
//!
//!     let client = OpenAiImageClient::default();
//!     let image = session.generate(&client).await?;
//!     println!("{}", image.url);
//!     Ok(())
//! }
//! ```
//!
//! # Features
//!
//! - `cli` (default): the `dalle-studio` command-line front end

mod error;

pub mod image;
pub mod session;
pub mod store;

// Re-export error types at crate root
pub use error::{GenerationError, Result, SessionError, StoreError, GENERATION_FAILED_MESSAGE};

pub use image::providers::{OpenAiImageClient, OpenAiImageClientBuilder};
pub use image::{
    Credential, Form, GeneratedImage, GenerationMetadata, GenerationRequest, ImageGenerator,
    ImageModel, ImageSize,
};
pub use session::{PendingGeneration, Session, SessionState};
pub use store::{CredentialStore, FileStore, HistoryStore, KeyValueStore, MemoryStore};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::{GenerationError, Result, SessionError};
    pub use crate::image::providers::OpenAiImageClient;
    pub use crate::image::{GeneratedImage, GenerationRequest, ImageGenerator, ImageModel, ImageSize};
    pub use crate::session::{Session, SessionState};
    pub use crate::store::{FileStore, KeyValueStore};
}
