//! Interfaces to the opaque classifiers.
//!
//! The real implementations call external ML services; tests inject fakes.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum ClassifierError {
    /// Service unreachable, rate-limited, or otherwise transiently failing.
    #[error("CLASSIFY/unavailable: {0}")]
    Unavailable(String),

    /// Call exceeded its deadline.
    #[error("CLASSIFY/timeout: {0}")]
    Timeout(String),

    /// Service answered with something the wrapper could not interpret.
    #[error("CLASSIFY/invalid-response: {0}")]
    InvalidResponse(String),
}

/// Opaque transcription classifier: audio bytes in, transcript text out.
pub trait Transcriber: Send + Sync {
    fn transcribe(&self, audio: &[u8]) -> Result<String, ClassifierError>;
}

/// One label returned by the cheap detection pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedLabel {
    pub name: String,
    /// Confidence 0-100.
    pub confidence: f32,
}

/// Structured result of the full visual safety analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameAnalysis {
    pub person_count: u32,
    /// 0-100, higher is safer.
    pub safety_score: u8,
    /// Tags such as `person_lying_down` or `unstable_movement`.
    pub fall_indicators: Vec<String>,
}

/// Opaque vision classifier over a frame or frame-grid.
pub trait VisionClassifier: Send + Sync {
    /// Cheap label detection used by the human-presence gate.
    fn detect_labels(&self, image: &[u8]) -> Result<Vec<DetectedLabel>, ClassifierError>;

    /// Full fall/safety analysis.
    fn analyze_frame(&self, image: &[u8]) -> Result<FrameAnalysis, ClassifierError>;
}
