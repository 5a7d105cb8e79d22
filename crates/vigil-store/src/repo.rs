//! Typed repository over the raw object store.

use crate::keys;
use crate::store::{ObjectStore, StoreError};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;
use vigil_core::{CombinedVerdict, EventId, Modality, SeverityReport, SubAnalysis};

/// Timestamp format carried inside reports and knowledge-base keys.
pub const REPORT_TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

/// A report copy persisted for historical retrieval, with provenance
/// metadata attached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeBaseEntry {
    #[serde(flatten)]
    pub report: SeverityReport,
    pub knowledge_base_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Typed access to every artifact the pipeline persists.
#[derive(Clone)]
pub struct EventRepo {
    store: Arc<dyn ObjectStore>,
}

impl EventRepo {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    fn put_json<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(value)?;
        self.store.put(key, &bytes)
    }

    /// Persist a sub-analysis under `events/{modality}/{event_id}.json`.
    pub fn put_sub_analysis(&self, analysis: &SubAnalysis) -> Result<(), StoreError> {
        let key = keys::sub_analysis_key(analysis.modality, &analysis.event_id);
        self.put_json(&key, analysis)
    }

    /// Load the sub-analysis for one modality of an event, if it has landed.
    pub fn load_sub_analysis(
        &self,
        modality: Modality,
        event_id: &EventId,
    ) -> Result<Option<SubAnalysis>, StoreError> {
        let key = keys::sub_analysis_key(modality, event_id);
        match self.store.get(&key)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Persist a combined verdict under `events/combined/{event_id}.json`.
    pub fn put_verdict(&self, verdict: &CombinedVerdict) -> Result<(), StoreError> {
        self.put_json(&keys::combined_key(&verdict.event_id), verdict)
    }

    /// Persist a severity report alongside its source artifact.
    pub fn put_report(&self, source_key: &str, report: &SeverityReport) -> Result<(), StoreError> {
        self.put_json(&keys::analysis_key(source_key), report)
    }

    /// Persist a knowledge-base copy of a report for future context.
    pub fn put_knowledge_base_entry(
        &self,
        report: &SeverityReport,
    ) -> Result<KnowledgeBaseEntry, StoreError> {
        let entry = KnowledgeBaseEntry {
            report: report.clone(),
            knowledge_base_id: Uuid::new_v4(),
            created_at: Utc::now(),
        };
        let key = keys::knowledge_base_key(&report.timestamp, &report.log_file_name);
        self.put_json(&key, &entry)?;
        Ok(entry)
    }

    /// Reports from the knowledge base newer than `cutoff`, most recent
    /// first, at most `limit` entries.
    ///
    /// Individual unreadable or malformed entries are skipped with a
    /// warning; a bad record must never abort the whole retrieval.
    pub fn recent_reports(
        &self,
        cutoff: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<SeverityReport>, StoreError> {
        let mut reports = Vec::new();
        for key in self.store.list(keys::KNOWLEDGE_BASE_PREFIX)? {
            if !key.ends_with(".json") {
                continue;
            }
            let bytes = match self.store.get(&key) {
                Ok(Some(bytes)) => bytes,
                Ok(None) => continue,
                Err(e) => {
                    warn!(key = %key, error = %e, "skipping unreadable knowledge-base entry");
                    continue;
                }
            };
            let entry: KnowledgeBaseEntry = match serde_json::from_slice(&bytes) {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(key = %key, error = %e, "skipping malformed knowledge-base entry");
                    continue;
                }
            };
            match parse_report_timestamp(&entry.report.timestamp) {
                Some(ts) if ts >= cutoff => reports.push(entry.report),
                Some(_) => {}
                None => {
                    warn!(key = %key, "skipping knowledge-base entry with unparsable timestamp");
                }
            }
        }

        // The timestamp format sorts lexicographically in time order.
        reports.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        reports.truncate(limit);
        Ok(reports)
    }
}

/// Parse a `%Y%m%d-%H%M%S` report timestamp as UTC.
pub fn parse_report_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(raw, REPORT_TIMESTAMP_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use chrono::TimeZone;
    use vigil_core::AlertLevel;

    fn repo() -> EventRepo {
        EventRepo::new(Arc::new(MemoryStore::new()))
    }

    fn report(timestamp: &str, reason: &str) -> SeverityReport {
        SeverityReport {
            alert_level: AlertLevel::Safe,
            reason: reason.to_string(),
            log_file_name: format!("{}_event", timestamp),
            brief_description: "brief".to_string(),
            full_description: "full".to_string(),
            timestamp: timestamp.to_string(),
            source_event_id: EventId::from_raw("20240101T120000Z"),
            model_used: None,
            historical_context_used: None,
        }
    }

    #[test]
    fn sub_analysis_round_trip() {
        let repo = repo();
        let analysis = SubAnalysis::absent(
            EventId::from_raw("20240101T120000Z"),
            Modality::Audio,
            Utc::now(),
        );
        repo.put_sub_analysis(&analysis).unwrap();
        let loaded = repo
            .load_sub_analysis(Modality::Audio, &analysis.event_id)
            .unwrap()
            .unwrap();
        assert_eq!(loaded, analysis);
        assert!(repo
            .load_sub_analysis(Modality::Video, &analysis.event_id)
            .unwrap()
            .is_none());
    }

    #[test]
    fn recent_reports_sorted_and_limited() {
        let repo = repo();
        for (ts, reason) in [
            ("20240101-100000", "oldest"),
            ("20240101-110000", "middle"),
            ("20240101-120000", "newest"),
        ] {
            repo.put_knowledge_base_entry(&report(ts, reason)).unwrap();
        }

        let cutoff = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let reports = repo.recent_reports(cutoff, 2).unwrap();
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].reason, "newest");
        assert_eq!(reports[1].reason, "middle");
    }

    #[test]
    fn recent_reports_applies_cutoff() {
        let repo = repo();
        repo.put_knowledge_base_entry(&report("20240101-100000", "old"))
            .unwrap();
        repo.put_knowledge_base_entry(&report("20240102-100000", "new"))
            .unwrap();

        let cutoff = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        let reports = repo.recent_reports(cutoff, 10).unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].reason, "new");
    }

    #[test]
    fn malformed_entries_are_skipped_not_fatal() {
        let store = Arc::new(MemoryStore::new());
        store
            .put("knowledge-base/20240101-100000_bad.json", b"not json at all")
            .unwrap();
        let repo = EventRepo::new(store);
        repo.put_knowledge_base_entry(&report("20240101-110000", "good"))
            .unwrap();

        let cutoff = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let reports = repo.recent_reports(cutoff, 10).unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].reason, "good");
    }
}
