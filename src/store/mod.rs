//! Local persistence for the credential and the image history.
//!
//! Both stores sit on a [`KeyValueStore`], a flat string-to-string map. Store
//! failures are logged and otherwise ignored by [`CredentialStore`] and
//! [`HistoryStore`]: losing persistence degrades the tool, it does not stop it.

mod credential;
mod file;
mod history;
mod memory;

pub use credential::CredentialStore;
pub use file::FileStore;
pub use history::HistoryStore;
pub use memory::MemoryStore;

use crate::error::StoreError;

/// Key the credential is stored under.
pub const CREDENTIAL_KEY: &str = "openai_api_key";

/// Key the JSON-encoded history is stored under.
pub const HISTORY_KEY: &str = "image_generation_history";

/// A persistent string-to-string map.
pub trait KeyValueStore: Send + Sync {
    /// Reads the value stored under `key`.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}
