//! Error types for image generation, persistence and the session.

/// Message shown to the user for every failed generation.
pub const GENERATION_FAILED_MESSAGE: &str =
    "Error generating image. Please check your API key and prompt.";

/// Outcome of a generation attempt that did not produce an image.
///
/// The cause of a failure (bad key, bad prompt, quota, network) is deliberately
/// collapsed into a single variant; providers log the details instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    /// No credential is stored. Recovered by asking the user for one.
    #[error("no API key configured")]
    MissingCredential,

    /// The remote call failed or returned something unusable.
    #[error("{}", GENERATION_FAILED_MESSAGE)]
    GenerationFailed,
}

impl GenerationError {
    /// Returns true if this error should route the user to credential entry.
    pub fn needs_credential(&self) -> bool {
        matches!(self, Self::MissingCredential)
    }
}

/// Errors raised by a persistent key-value store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// I/O error reading or writing the backing file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file is not a JSON object of strings.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors returned by session transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// A generation is already outstanding.
    #[error("a generation is already in progress")]
    Busy,

    /// The generation attempt itself failed.
    #[error(transparent)]
    Generation(#[from] GenerationError),
}

/// Result type alias for generation operations.
pub type Result<T> = std::result::Result<T, GenerationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_needs_credential() {
        assert!(GenerationError::MissingCredential.needs_credential());
        assert!(!GenerationError::GenerationFailed.needs_credential());
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            GenerationError::GenerationFailed.to_string(),
            "Error generating image. Please check your API key and prompt."
        );

        let err = SessionError::from(GenerationError::GenerationFailed);
        assert_eq!(err.to_string(), GENERATION_FAILED_MESSAGE);
        assert_eq!(
            SessionError::Busy.to_string(),
            "a generation is already in progress"
        );
    }

    #[test]
    fn test_store_error_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = StoreError::from(json_err);
        assert!(err.to_string().starts_with("JSON error:"));
    }
}
