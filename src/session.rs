//! Generation session: the state behind the view.
//!
//! A [`Session`] owns the form selections, the displayed image and transient
//! copies of the persisted credential and history. All transitions go through
//! one [`SessionState`]:
//!
//! ```text
//! NeedsCredential --submit_credential--> Idle
//! Idle --begin_generation (no credential)--> NeedsCredential
//! Idle --begin_generation--> Generating --finish_generation--> Idle
//! ```

use crate::error::{GenerationError, SessionError};
use crate::image::{Credential, Form, GeneratedImage, GenerationRequest, ImageGenerator};
use crate::store::{CredentialStore, HistoryStore, KeyValueStore};

/// Where the session is in the generate cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No credential; the credential prompt is showing.
    NeedsCredential,
    /// Ready for a generate action.
    Idle,
    /// A request is outstanding; the generate action is disabled.
    Generating,
}

/// A generation that has been started and awaits its outcome.
#[derive(Debug, Clone)]
pub struct PendingGeneration {
    credential: Credential,
    request: GenerationRequest,
}

impl PendingGeneration {
    /// Credential to authorize the call with.
    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    /// Request to send.
    pub fn request(&self) -> &GenerationRequest {
        &self.request
    }
}

/// State behind the image generator view.
#[derive(Debug)]
pub struct Session<S> {
    state: SessionState,
    form: Form,
    credential: Credential,
    current_image: Option<String>,
    history: Vec<String>,
    credentials: CredentialStore<S>,
    history_store: HistoryStore<S>,
}

impl<S: KeyValueStore + Clone> Session<S> {
    /// Opens a session over `store`, reading the credential and history once.
    pub fn new(store: S) -> Self {
        Self::with_stores(
            CredentialStore::new(store.clone()),
            HistoryStore::new(store),
        )
    }
}

impl<S: KeyValueStore> Session<S> {
    /// Opens a session over separate credential and history stores.
    pub fn with_stores(credentials: CredentialStore<S>, history_store: HistoryStore<S>) -> Self {
        let credential = credentials.get();
        let history = history_store.get();
        let state = if credential.is_empty() {
            SessionState::NeedsCredential
        } else {
            SessionState::Idle
        };

        tracing::debug!(?state, history_len = history.len(), "session opened");

        Self {
            state,
            form: Form::new(),
            credential,
            current_image: None,
            history,
            credentials,
            history_store,
        }
    }

    /// Current state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Returns true if the credential prompt should be shown.
    pub fn credential_prompt_visible(&self) -> bool {
        self.state == SessionState::NeedsCredential
    }

    /// Returns true if the generate action is available.
    pub fn can_generate(&self) -> bool {
        self.state != SessionState::Generating
    }

    /// Form selections.
    pub fn form(&self) -> &Form {
        &self.form
    }

    /// Mutable form selections.
    pub fn form_mut(&mut self) -> &mut Form {
        &mut self.form
    }

    /// The most recently generated image in this session.
    pub fn current_image(&self) -> Option<&str> {
        self.current_image.as_deref()
    }

    /// Generated image URLs, most recent first.
    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Returns true if a non-empty credential is held.
    pub fn has_credential(&self) -> bool {
        !self.credential.is_empty()
    }

    /// Stores a credential and closes the credential prompt.
    ///
    /// The value is persisted without validation. A generation that was
    /// refused for lack of a credential is not retried.
    pub fn submit_credential(&mut self, credential: impl Into<Credential>) {
        self.credential = credential.into();
        self.credentials.set(&self.credential);
        if self.state == SessionState::NeedsCredential {
            self.state = SessionState::Idle;
        }
        tracing::debug!(state = ?self.state, "credential submitted");
    }

    /// Starts a generation for the current form.
    ///
    /// Without a credential this moves to [`SessionState::NeedsCredential`]
    /// and returns [`GenerationError::MissingCredential`]; no request is
    /// produced.
    pub fn begin_generation(&mut self) -> Result<PendingGeneration, SessionError> {
        if self.state == SessionState::Generating {
            return Err(SessionError::Busy);
        }
        if self.credential.is_empty() {
            self.state = SessionState::NeedsCredential;
            return Err(GenerationError::MissingCredential.into());
        }

        self.state = SessionState::Generating;
        Ok(PendingGeneration {
            credential: self.credential.clone(),
            request: self.form.to_request(),
        })
    }

    /// Applies the outcome of the outstanding generation and returns to
    /// [`SessionState::Idle`].
    ///
    /// On success the image becomes the displayed image and is prepended to
    /// the history. On failure both are left as they were. Outcomes arriving
    /// when nothing is outstanding are ignored.
    pub fn finish_generation(
        &mut self,
        outcome: crate::Result<GeneratedImage>,
    ) -> Result<GeneratedImage, SessionError> {
        if self.state != SessionState::Generating {
            tracing::debug!(state = ?self.state, "ignoring generation outcome");
            return outcome.map_err(Into::into);
        }

        match outcome {
            Ok(image) => {
                self.state = SessionState::Idle;
                self.current_image = Some(image.url.clone());
                self.history.insert(0, image.url.clone());
                self.history_store.save(&self.history);
                Ok(image)
            }
            Err(GenerationError::MissingCredential) => {
                self.state = SessionState::NeedsCredential;
                Err(GenerationError::MissingCredential.into())
            }
            Err(e) => {
                self.state = SessionState::Idle;
                Err(e.into())
            }
        }
    }

    /// Runs one full generate action against `generator`.
    pub async fn generate<G>(&mut self, generator: &G) -> Result<GeneratedImage, SessionError>
    where
        G: ImageGenerator + ?Sized,
    {
        let pending = self.begin_generation()?;
        let outcome = generator
            .generate(pending.credential(), pending.request())
            .await;
        self.finish_generation(outcome)
    }
}
