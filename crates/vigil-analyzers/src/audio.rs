//! Audio modality: transcription plus transcript keyword scan.

use crate::traits::Transcriber;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::warn;
use vigil_core::model::{AUDIO_EMERGENCY, AUDIO_UNUSUAL};
use vigil_core::{EventId, Modality, SubAnalysis};
use vigil_store::{EventRepo, StoreError};

/// Emergency/fall terms. Checked first; a hit short-circuits the scan.
const EMERGENCY_TERMS: &[&str] = &["fall", "fell", "help", "emergency"];

/// Unusual-activity terms, only consulted when no emergency term matched.
const UNUSUAL_TERMS: &[&str] = &["unusual", "strange", "concerning"];

/// Case-insensitive substring scan of a transcript.
///
/// Returns at most one indicator tag; emergency wins over unusual.
pub fn scan_transcript(transcript: &str) -> Option<&'static str> {
    let lowered = transcript.to_lowercase();
    if EMERGENCY_TERMS.iter().any(|term| lowered.contains(term)) {
        return Some(AUDIO_EMERGENCY);
    }
    if UNUSUAL_TERMS.iter().any(|term| lowered.contains(term)) {
        return Some(AUDIO_UNUSUAL);
    }
    None
}

/// Normalizes transcription output into an audio sub-analysis.
pub struct AudioAnalyzer {
    transcriber: Arc<dyn Transcriber>,
    repo: EventRepo,
}

impl AudioAnalyzer {
    pub fn new(transcriber: Arc<dyn Transcriber>, repo: EventRepo) -> Self {
        Self { transcriber, repo }
    }

    /// Transcribe and scan one audio capture.
    ///
    /// Transcription failure degrades to `present = false`; it never
    /// propagates.
    pub fn analyze(&self, audio: &[u8], event_id: &EventId, now: DateTime<Utc>) -> SubAnalysis {
        let transcript = match self.transcriber.transcribe(audio) {
            Ok(text) => text,
            Err(e) => {
                warn!(event_id = %event_id, error = %e, "transcription failed, recording audio as absent");
                return SubAnalysis::absent(event_id.clone(), Modality::Audio, now);
            }
        };

        if transcript.trim().is_empty() {
            return SubAnalysis::absent(event_id.clone(), Modality::Audio, now);
        }

        let raw_indicators = scan_transcript(&transcript)
            .map(|tag| vec![tag.to_string()])
            .unwrap_or_default();

        SubAnalysis {
            event_id: event_id.clone(),
            modality: Modality::Audio,
            present: true,
            raw_indicators,
            safety_score: None,
            person_count: None,
            transcript: Some(transcript),
            timestamp: now,
        }
    }

    /// Analyze one capture and persist the resulting sub-analysis.
    pub fn run(
        &self,
        audio: &[u8],
        event_id: &EventId,
        now: DateTime<Utc>,
    ) -> Result<SubAnalysis, StoreError> {
        let analysis = self.analyze(audio, event_id, now);
        self.repo.put_sub_analysis(&analysis)?;
        Ok(analysis)
    }
}
