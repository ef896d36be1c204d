use crate::image::Credential;
use crate::store::{KeyValueStore, CREDENTIAL_KEY};

/// Persists the single API credential.
#[derive(Debug, Clone)]
pub struct CredentialStore<S> {
    store: S,
}

impl<S: KeyValueStore> CredentialStore<S> {
    /// Wraps a key-value store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Reads the stored credential. Unset or unreadable reads as empty.
    pub fn get(&self) -> Credential {
        match self.store.get(CREDENTIAL_KEY) {
            Ok(value) => Credential::new(value.unwrap_or_default()),
            Err(e) => {
                tracing::warn!("failed to read credential: {e}");
                Credential::default()
            }
        }
    }

    /// Persists `credential` as-is. Write failures are logged and ignored.
    pub fn set(&self, credential: &Credential) {
        if let Err(e) = self.store.set(CREDENTIAL_KEY, credential.as_str()) {
            tracing::warn!("failed to persist credential: {e}");
        }
    }
}
