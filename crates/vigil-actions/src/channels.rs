//! External channel interfaces: notification and speech synthesis.

use thiserror::Error;
use vigil_core::ActionType;

#[derive(Error, Debug, Clone)]
pub enum ChannelError {
    /// Permission or auth failure. The speech path retries this once.
    #[error("CHANNEL/permission-denied: {0}")]
    PermissionDenied(String),

    /// Channel unreachable or rate-limited.
    #[error("CHANNEL/unavailable: {0}")]
    Unavailable(String),

    /// Channel rejected the payload.
    #[error("CHANNEL/rejected: {0}")]
    Rejected(String),
}

/// Structured attributes attached to a notification.
#[derive(Debug, Clone)]
pub struct MessageAttributes {
    pub priority: u8,
    pub action_type: ActionType,
    pub requires_immediate_response: bool,
}

/// Opaque fire-and-forget notification channel. Returns a message id.
pub trait Notifier: Send + Sync {
    fn publish(
        &self,
        subject: &str,
        body: &str,
        attributes: &MessageAttributes,
    ) -> Result<String, ChannelError>;
}

/// Opaque speech-synthesis service: text in, audio bytes out.
pub trait SpeechSynthesizer: Send + Sync {
    fn synthesize(&self, text: &str, voice_id: &str) -> Result<Vec<u8>, ChannelError>;
}
