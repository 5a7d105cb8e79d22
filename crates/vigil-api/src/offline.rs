//! Offline stand-ins for the external integrations.
//!
//! The binary runs without any real transcription, vision, reasoning, or
//! delivery service attached. These implementations keep the full pipeline
//! exercisable locally: audio degrades to an absent record, video is gated
//! out, the reasoning model returns a fixed no-alert judgment, and delivery
//! is logged instead of sent.

use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use vigil_actions::{ChannelError, MessageAttributes, Notifier, SpeechSynthesizer};
use vigil_analyzers::{ClassifierError, DetectedLabel, FrameAnalysis, Transcriber, VisionClassifier};
use vigil_severity::{InferenceRequest, ModelError, ReasoningModel};

pub struct OfflineTranscriber;

impl Transcriber for OfflineTranscriber {
    fn transcribe(&self, _audio: &[u8]) -> Result<String, ClassifierError> {
        Ok(String::new())
    }
}

pub struct OfflineVision;

impl VisionClassifier for OfflineVision {
    fn detect_labels(&self, _image: &[u8]) -> Result<Vec<DetectedLabel>, ClassifierError> {
        Ok(Vec::new())
    }

    fn analyze_frame(&self, _image: &[u8]) -> Result<FrameAnalysis, ClassifierError> {
        Err(ClassifierError::Unavailable(
            "no vision backend configured".to_string(),
        ))
    }
}

pub struct OfflineModel;

impl ReasoningModel for OfflineModel {
    fn model_id(&self) -> &str {
        "offline"
    }

    fn infer(&self, _request: &InferenceRequest) -> Result<Value, ModelError> {
        Ok(json!({
            "alert_level": 0,
            "reason": "No input data available",
            "log_file_name": "offline_analysis.json",
            "brief_description": "Offline mode",
            "full_description": "No external reasoning model is configured; reporting no alert."
        }))
    }
}

/// Logs each notification instead of delivering it.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn publish(
        &self,
        subject: &str,
        body: &str,
        attributes: &MessageAttributes,
    ) -> Result<String, ChannelError> {
        info!(
            subject = subject,
            priority = attributes.priority,
            body_len = body.len(),
            "notification (offline, not delivered)"
        );
        Ok(Uuid::new_v4().to_string())
    }
}

/// Produces an empty audio stream instead of synthesized speech.
pub struct NullSynthesizer;

impl SpeechSynthesizer for NullSynthesizer {
    fn synthesize(&self, text: &str, voice_id: &str) -> Result<Vec<u8>, ChannelError> {
        info!(
            voice_id = voice_id,
            text_len = text.len(),
            "speech (offline, not synthesized)"
        );
        Ok(Vec::new())
    }
}
