//! Wire shapes shared by every stage of the pipeline.
//!
//! A [`SubAnalysis`] is the normalized output of one modality analyzer, one
//! per `(event_id, modality)`. The aggregator folds the available
//! sub-analyses into a [`CombinedVerdict`], the reasoning step turns that
//! into a [`SeverityReport`], and the router derives [`Action`]s from it.

use crate::event::{EventId, Modality};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Indicator tag emitted when the transcript contains emergency terms.
pub const AUDIO_EMERGENCY: &str = "audio_emergency";
/// Indicator tag emitted when the transcript contains unusual-activity terms.
pub const AUDIO_UNUSUAL: &str = "audio_unusual";

/// Normalized output of one modality analyzer for one event window.
///
/// Immutable once written. A later write for the same `(event_id, modality)`
/// key is a redundant recomputation and may safely overwrite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubAnalysis {
    pub event_id: EventId,
    pub modality: Modality,

    /// Whether this modality was actually captured. `false` records a
    /// degraded capture (empty transcript, classifier failure) so the
    /// aggregator can distinguish it from a record that never arrived.
    pub present: bool,

    /// Indicator tags, e.g. `audio_emergency` or `person_lying_down`.
    #[serde(default)]
    pub raw_indicators: Vec<String>,

    /// Safety score 0-100, higher is safer. Video only; audio carries no
    /// numeric score.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub safety_score: Option<u8>,

    /// Number of persons detected in the frame (video only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub person_count: Option<u32>,

    /// Free-text transcript (audio only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcript: Option<String>,

    pub timestamp: DateTime<Utc>,
}

impl SubAnalysis {
    /// Record for a modality that could not be captured or analyzed.
    pub fn absent(event_id: EventId, modality: Modality, timestamp: DateTime<Utc>) -> Self {
        Self {
            event_id,
            modality,
            present: false,
            raw_indicators: Vec::new(),
            safety_score: None,
            person_count: None,
            transcript: None,
            timestamp,
        }
    }
}

/// Coarse classification assigned at the aggregation stage, before the
/// expensive reasoning step runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PriorityLevel {
    /// Neither modality arrived for this window.
    #[default]
    Unknown,
    Low,
    Medium,
    High,
}

impl fmt::Display for PriorityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriorityLevel::Unknown => write!(f, "UNKNOWN"),
            PriorityLevel::Low => write!(f, "LOW"),
            PriorityLevel::Medium => write!(f, "MEDIUM"),
            PriorityLevel::High => write!(f, "HIGH"),
        }
    }
}

/// Merged view of all sub-analyses available for one event window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedVerdict {
    pub event_id: EventId,
    pub has_audio: bool,
    pub has_video: bool,

    /// Which modalities contributed, audio first.
    pub input_sources: Vec<Modality>,

    /// Union of indicator tags from all present modalities, audio first.
    pub combined_indicators: Vec<String>,

    /// Minimum across modality scores; 100 when no modality carries one.
    pub overall_safety_score: u8,

    pub priority_level: PriorityLevel,

    /// Single-sentence statement of which sources were used.
    pub note: String,

    pub timestamp: DateTime<Utc>,
}

/// Severity assigned by the reasoning step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(try_from = "u8", into = "u8")]
pub enum AlertLevel {
    /// No issues requiring attention.
    #[default]
    Safe,
    /// Possible issue requiring attention (soft alert).
    Soft,
    /// Issue requiring immediate action (high alert).
    High,
}

impl TryFrom<u8> for AlertLevel {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(AlertLevel::Safe),
            1 => Ok(AlertLevel::Soft),
            2 => Ok(AlertLevel::High),
            other => Err(format!("alert_level must be 0, 1, or 2, got {}", other)),
        }
    }
}

impl From<AlertLevel> for u8 {
    fn from(level: AlertLevel) -> u8 {
        level as u8
    }
}

/// Parsed structured judgment produced by the reasoning step.
///
/// The first five fields are the model's wire shape; the rest is metadata
/// attached by the pipeline. Fallback reports (parse or invocation failure)
/// still carry `timestamp` and `source_event_id` so downstream stages never
/// see an unusable record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeverityReport {
    pub alert_level: AlertLevel,
    pub reason: String,
    pub log_file_name: String,
    pub brief_description: String,
    pub full_description: String,

    /// Report timestamp, `%Y%m%d-%H%M%S`.
    pub timestamp: String,
    pub source_event_id: EventId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_used: Option<String>,

    /// How many historical events were fed to the model as context.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub historical_context_used: Option<usize>,
}

/// Kind of downstream action derived from a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    EmergencyAlert,
    FallDetected,
    UnusualActivity,
    NormalActivity,
}

impl ActionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::EmergencyAlert => "emergency_alert",
            ActionType::FallDetected => "fall_detected",
            ActionType::UnusualActivity => "unusual_activity",
            ActionType::NormalActivity => "normal_activity",
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One routed action, consumed once by the executor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub action_type: ActionType,

    /// 1 is highest priority, 5 is lowest.
    pub priority: u8,

    pub message: String,

    #[serde(default)]
    pub metadata: serde_json::Value,

    #[serde(default)]
    pub requires_immediate_response: bool,
}

impl Action {
    /// Whether a notification should be dispatched for this action.
    pub fn should_notify(&self) -> bool {
        self.priority <= 3 || self.requires_immediate_response
    }

    /// Whether speech should be synthesized for this action.
    pub fn should_speak(&self) -> bool {
        self.priority <= 2 || self.requires_immediate_response
    }

    /// Fail-toward-caution action emitted when routing itself fails.
    pub fn manual_check(error: impl fmt::Display) -> Self {
        Self {
            action_type: ActionType::EmergencyAlert,
            priority: 1,
            message: "Error in analysis - manual check required".to_string(),
            metadata: serde_json::json!({ "error": error.to_string() }),
            requires_immediate_response: true,
        }
    }
}
