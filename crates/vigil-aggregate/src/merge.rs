//! Deterministic merge rules.

use chrono::{DateTime, Utc};
use vigil_core::model::{AUDIO_EMERGENCY, AUDIO_UNUSUAL};
use vigil_core::{CombinedVerdict, EventId, Modality, PipelineConfig, PriorityLevel, SubAnalysis};

/// Merge the available sub-analyses for one event window.
///
/// A sub-analysis with `present = false` counts as missing: it records a
/// degraded capture, and the verdict must not escalate on it.
pub fn merge(
    event_id: &EventId,
    audio: Option<&SubAnalysis>,
    video: Option<&SubAnalysis>,
    config: &PipelineConfig,
    now: DateTime<Utc>,
) -> CombinedVerdict {
    let audio = audio.filter(|a| a.present);
    let video = video.filter(|v| v.present);
    let has_audio = audio.is_some();
    let has_video = video.is_some();

    if !has_audio && !has_video {
        return CombinedVerdict {
            event_id: event_id.clone(),
            has_audio: false,
            has_video: false,
            input_sources: Vec::new(),
            combined_indicators: Vec::new(),
            overall_safety_score: 100,
            priority_level: PriorityLevel::Unknown,
            note: "No input data available".to_string(),
            timestamp: now,
        };
    }

    // Audio carries no numeric score; only video lowers the overall score.
    let overall_safety_score = video
        .and_then(|v| v.safety_score)
        .map(|s| s.min(100))
        .unwrap_or(100);

    let mut combined_indicators = Vec::new();
    if let Some(a) = audio {
        combined_indicators.extend(a.raw_indicators.iter().cloned());
    }
    let video_has_falls = video.map(|v| !v.raw_indicators.is_empty()).unwrap_or(false);
    if let Some(v) = video {
        combined_indicators.extend(v.raw_indicators.iter().cloned());
    }

    let priority_level = derive_priority(
        &combined_indicators,
        video_has_falls,
        overall_safety_score,
        config.medium_score_threshold,
    );

    let mut input_sources = Vec::new();
    if has_audio {
        input_sources.push(Modality::Audio);
    }
    if has_video {
        input_sources.push(Modality::Video);
    }

    let note = match (has_audio, has_video) {
        (true, true) => "Analysis based on both audio and video input",
        (true, false) => "Analysis based on audio input only",
        (false, true) => "Analysis based on video input only",
        (false, false) => unreachable!("handled above"),
    }
    .to_string();

    CombinedVerdict {
        event_id: event_id.clone(),
        has_audio,
        has_video,
        input_sources,
        combined_indicators,
        overall_safety_score,
        priority_level,
        note,
        timestamp: now,
    }
}

/// Priority precedence, first match wins:
/// emergency indicators → HIGH; unusual indicators or a low score while
/// still at LOW → MEDIUM; otherwise LOW.
fn derive_priority(
    indicators: &[String],
    video_has_falls: bool,
    score: u8,
    medium_threshold: u8,
) -> PriorityLevel {
    if indicators.iter().any(|i| i == AUDIO_EMERGENCY) || video_has_falls {
        return PriorityLevel::High;
    }
    if indicators.iter().any(|i| i == AUDIO_UNUSUAL) || score < medium_threshold {
        return PriorityLevel::Medium;
    }
    PriorityLevel::Low
}
