//! Interface to the opaque multimodal reasoning model.

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum ModelError {
    /// Model unreachable, rate-limited, or timing out.
    #[error("MODEL/unavailable: {0}")]
    Unavailable(String),

    /// Auth or permission failure.
    #[error("MODEL/permission: {0}")]
    Permission(String),
}

/// An image attached to a multimodal request.
#[derive(Debug, Clone)]
pub struct ImageAttachment {
    pub bytes: Vec<u8>,
    /// e.g. `image/jpeg`.
    pub content_type: String,
}

/// One inference request: system prompt, user prompt, optional image.
#[derive(Debug, Clone)]
pub struct InferenceRequest {
    pub system: String,
    pub prompt: String,
    pub image: Option<ImageAttachment>,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl InferenceRequest {
    pub fn new(system: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            prompt: prompt.into(),
            image: None,
            max_tokens: 1000,
            temperature: 0.5,
        }
    }

    pub fn with_image(mut self, image: ImageAttachment) -> Self {
        self.image = Some(image);
        self
    }
}

/// Opaque reasoning service. Returns the raw response body; the caller owns
/// content extraction and parsing.
pub trait ReasoningModel: Send + Sync {
    /// Identifier recorded in reports as `model_used`.
    fn model_id(&self) -> &str;

    fn infer(&self, request: &InferenceRequest) -> Result<serde_json::Value, ModelError>;
}
