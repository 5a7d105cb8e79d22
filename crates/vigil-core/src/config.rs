//! Pipeline configuration profiles.
//!
//! The exact MEDIUM/LOW boundary and the human-presence gate varied between
//! revisions of the production system, so both are tunables here rather
//! than constants.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tunables for one deployment of the correlation pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Correlation window size in seconds. Always at least 1.
    pub window_seconds: i64,

    /// Safety score below which an otherwise-LOW event escalates to MEDIUM.
    pub medium_score_threshold: u8,

    /// Whether frames with no detected person are discarded before the
    /// expensive analysis runs.
    pub presence_gate: bool,

    /// Minimum label confidence for the presence gate to count a person.
    pub person_confidence_threshold: f32,

    /// How far back historical context reaches, in hours.
    pub lookback_hours: i64,

    /// Maximum number of historical events embedded in the prompt.
    pub history_limit: usize,

    /// Delay before the single retry on a permission-denied speech call,
    /// in milliseconds.
    pub speech_retry_delay_ms: u64,

    /// Voice used for speech synthesis.
    pub voice_id: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            window_seconds: 30,
            medium_score_threshold: 75,
            presence_gate: true,
            person_confidence_threshold: 70.0,
            lookback_hours: 24,
            history_limit: 10,
            speech_retry_delay_ms: 5_000,
            voice_id: "Joanna".to_string(),
        }
    }
}

impl PipelineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Profile matching the legacy video-URI path: no presence gate, every
    /// frame runs the full analysis.
    pub fn ungated() -> Self {
        Self {
            presence_gate: false,
            ..Self::default()
        }
    }

    pub fn with_window_seconds(mut self, seconds: i64) -> Self {
        self.window_seconds = seconds.max(1);
        self
    }

    pub fn with_medium_score_threshold(mut self, threshold: u8) -> Self {
        self.medium_score_threshold = threshold;
        self
    }

    pub fn with_presence_gate(mut self, enabled: bool) -> Self {
        self.presence_gate = enabled;
        self
    }

    pub fn with_lookback_hours(mut self, hours: i64) -> Self {
        self.lookback_hours = hours;
        self
    }

    pub fn with_speech_retry_delay(mut self, delay: Duration) -> Self {
        self.speech_retry_delay_ms = delay.as_millis() as u64;
        self
    }

    /// Retry delay as a [`Duration`].
    pub fn speech_retry_delay(&self) -> Duration {
        Duration::from_millis(self.speech_retry_delay_ms)
    }
}
