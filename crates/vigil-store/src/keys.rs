//! Key scheme for persisted artifacts.

use vigil_core::{EventId, Modality};

/// Prefix under which report copies are kept for historical retrieval.
pub const KNOWLEDGE_BASE_PREFIX: &str = "knowledge-base/";

/// Key of a sub-analysis record: `events/{modality}/{event_id}.json`.
pub fn sub_analysis_key(modality: Modality, event_id: &EventId) -> String {
    format!("events/{}/{}.json", modality.key_segment(), event_id)
}

/// Key of a combined verdict: `events/combined/{event_id}.json`.
pub fn combined_key(event_id: &EventId) -> String {
    format!("events/combined/{}.json", event_id)
}

/// Key of a severity report stored alongside its source artifact.
pub fn analysis_key(source_key: &str) -> String {
    format!("{}_analysis.json", source_key)
}

/// Key of a knowledge-base copy of a report.
pub fn knowledge_base_key(timestamp: &str, log_file_name: &str) -> String {
    format!("{}{}_{}.json", KNOWLEDGE_BASE_PREFIX, timestamp, log_file_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_layout() {
        let id = EventId::from_raw("20240101T120000Z");
        assert_eq!(
            sub_analysis_key(Modality::Audio, &id),
            "events/audio/20240101T120000Z.json"
        );
        assert_eq!(
            sub_analysis_key(Modality::Video, &id),
            "events/video/20240101T120000Z.json"
        );
        assert_eq!(combined_key(&id), "events/combined/20240101T120000Z.json");
        assert_eq!(
            analysis_key("events/combined/20240101T120000Z"),
            "events/combined/20240101T120000Z_analysis.json"
        );
        assert_eq!(
            knowledge_base_key("20240101-120000", "event_log"),
            "knowledge-base/20240101-120000_event_log.json"
        );
    }
}
