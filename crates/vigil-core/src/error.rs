//! Unified error model.
//!
//! External-call wrappers return typed errors; the stages pattern-match on
//! the kind to choose fallback behavior. Only `Validation` is terminal for
//! an invocation; everything else degrades to a lower-severity outcome.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum VigilError {
    /// Object-store read or write failure.
    #[error("STORE/{0}")]
    Store(String),

    /// Opaque classifier (transcription, vision, reasoning) call failure.
    #[error("CLASSIFY/{0}")]
    Classifier(String),

    /// Response from an external service could not be parsed.
    #[error("PARSE/{0}")]
    Parse(String),

    /// Notification or speech channel failure.
    #[error("CHANNEL/{0}")]
    Channel(String),

    /// Permission or auth failure from an external service.
    #[error("PERMISSION/{0}")]
    Permission(String),

    /// Programming or input-validation error. Terminal for the invocation:
    /// there is no safe default to fall back to.
    #[error("VALIDATION/{0}")]
    Validation(String),
}

impl VigilError {
    /// Whether the per-event invocation should fail outright rather than
    /// degrade to a no-alert outcome.
    pub fn is_terminal(&self) -> bool {
        matches!(self, VigilError::Validation(_))
    }
}
