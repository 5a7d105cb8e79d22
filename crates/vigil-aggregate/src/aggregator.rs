//! Store-backed aggregation.

use crate::merge::merge;
use chrono::{DateTime, Utc};
use tracing::warn;
use vigil_core::{CombinedVerdict, EventId, Modality, PipelineConfig, SubAnalysis};
use vigil_store::EventRepo;

/// Loads the available sub-analyses for an event and merges them.
pub struct Aggregator {
    repo: EventRepo,
    config: PipelineConfig,
}

impl Aggregator {
    pub fn new(repo: EventRepo, config: PipelineConfig) -> Self {
        Self { repo, config }
    }

    fn load(&self, modality: Modality, event_id: &EventId) -> Option<SubAnalysis> {
        match self.repo.load_sub_analysis(modality, event_id) {
            Ok(found) => found,
            Err(e) => {
                // Fail-open toward lower severity: a lookup error is treated
                // as "not present". Known risk, hence the loud log line.
                warn!(
                    event_id = %event_id,
                    modality = %modality,
                    error = %e,
                    "sub-analysis lookup failed, treating modality as absent"
                );
                None
            }
        }
    }

    /// Merge whatever has landed for `event_id` and persist the verdict.
    ///
    /// Safe to invoke before both modalities have arrived; missing records
    /// degrade per the merge rules. A verdict write failure is logged and
    /// does not block the in-memory result.
    pub fn combine(&self, event_id: &EventId, now: DateTime<Utc>) -> CombinedVerdict {
        let audio = self.load(Modality::Audio, event_id);
        let video = self.load(Modality::Video, event_id);
        let verdict = merge(event_id, audio.as_ref(), video.as_ref(), &self.config, now);

        if let Err(e) = self.repo.put_verdict(&verdict) {
            warn!(event_id = %event_id, error = %e, "failed to persist combined verdict");
        }
        verdict
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use vigil_core::PriorityLevel;
    use vigil_store::{MemoryStore, ObjectStore};

    fn event_id() -> EventId {
        EventId::from_raw("20240101T120000Z")
    }

    #[test]
    fn combine_before_any_write_is_unknown() {
        let repo = EventRepo::new(Arc::new(MemoryStore::new()));
        let aggregator = Aggregator::new(repo, PipelineConfig::default());
        let verdict = aggregator.combine(&event_id(), Utc::now());
        assert_eq!(verdict.priority_level, PriorityLevel::Unknown);
    }

    #[test]
    fn combine_persists_verdict() {
        let store = Arc::new(MemoryStore::new());
        let repo = EventRepo::new(store.clone());
        let aggregator = Aggregator::new(repo.clone(), PipelineConfig::default());

        let analysis = SubAnalysis {
            event_id: event_id(),
            modality: Modality::Video,
            present: true,
            raw_indicators: vec!["person_lying_down".to_string()],
            safety_score: Some(20),
            person_count: Some(1),
            transcript: None,
            timestamp: Utc::now(),
        };
        repo.put_sub_analysis(&analysis).unwrap();

        let verdict = aggregator.combine(&event_id(), Utc::now());
        assert_eq!(verdict.priority_level, PriorityLevel::High);

        let stored = store
            .get("events/combined/20240101T120000Z.json")
            .unwrap()
            .expect("verdict persisted");
        let parsed: CombinedVerdict = serde_json::from_slice(&stored).unwrap();
        assert_eq!(parsed, verdict);
    }

    #[test]
    fn corrupt_sub_analysis_degrades_to_absent() {
        let store = Arc::new(MemoryStore::new());
        store
            .put("events/audio/20240101T120000Z.json", b"{broken")
            .unwrap();
        let aggregator = Aggregator::new(EventRepo::new(store), PipelineConfig::default());
        let verdict = aggregator.combine(&event_id(), Utc::now());
        assert_eq!(verdict.priority_level, PriorityLevel::Unknown);
        assert!(!verdict.has_audio);
    }
}
