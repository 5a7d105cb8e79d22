//! Video modality: human-presence gate plus visual safety analysis.

use crate::traits::{DetectedLabel, VisionClassifier};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, warn};
use vigil_core::{EventId, Modality, PipelineConfig, SubAnalysis};
use vigil_store::{EventRepo, StoreError};

/// Label the presence gate looks for.
const PERSON_LABEL: &str = "person";

fn person_present(labels: &[DetectedLabel], threshold: f32) -> bool {
    labels
        .iter()
        .any(|l| l.name.eq_ignore_ascii_case(PERSON_LABEL) && l.confidence >= threshold)
}

/// Normalizes visual classifier output into a video sub-analysis.
pub struct VideoAnalyzer {
    vision: Arc<dyn VisionClassifier>,
    repo: EventRepo,
    config: PipelineConfig,
}

impl VideoAnalyzer {
    pub fn new(vision: Arc<dyn VisionClassifier>, repo: EventRepo, config: PipelineConfig) -> Self {
        Self {
            vision,
            repo,
            config,
        }
    }

    /// Analyze one frame or frame-grid.
    ///
    /// With the presence gate enabled, a frame with no detected person is
    /// discarded entirely (`None`, nothing stored); the expensive analysis
    /// never runs on an empty scene. A classifier failure instead degrades
    /// to a `present = false` record.
    pub fn analyze(
        &self,
        image: &[u8],
        event_id: &EventId,
        now: DateTime<Utc>,
    ) -> Option<SubAnalysis> {
        if self.config.presence_gate {
            match self.vision.detect_labels(image) {
                Ok(labels) => {
                    if !person_present(&labels, self.config.person_confidence_threshold) {
                        debug!(event_id = %event_id, "no person detected, discarding frame");
                        return None;
                    }
                }
                Err(e) => {
                    warn!(event_id = %event_id, error = %e, "presence detection failed, recording video as absent");
                    return Some(SubAnalysis::absent(event_id.clone(), Modality::Video, now));
                }
            }
        }

        match self.vision.analyze_frame(image) {
            Ok(frame) => Some(SubAnalysis {
                event_id: event_id.clone(),
                modality: Modality::Video,
                present: true,
                raw_indicators: frame.fall_indicators,
                safety_score: Some(frame.safety_score.min(100)),
                person_count: Some(frame.person_count),
                transcript: None,
                timestamp: now,
            }),
            Err(e) => {
                warn!(event_id = %event_id, error = %e, "frame analysis failed, recording video as absent");
                Some(SubAnalysis::absent(event_id.clone(), Modality::Video, now))
            }
        }
    }

    /// Analyze one capture and persist the sub-analysis, if any. A gated-out
    /// frame stores nothing.
    pub fn run(
        &self,
        image: &[u8],
        event_id: &EventId,
        now: DateTime<Utc>,
    ) -> Result<Option<SubAnalysis>, StoreError> {
        match self.analyze(image, event_id, now) {
            Some(analysis) => {
                self.repo.put_sub_analysis(&analysis)?;
                Ok(Some(analysis))
            }
            None => Ok(None),
        }
    }
}
