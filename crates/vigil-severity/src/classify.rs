//! The classify operation: prompt, invoke, parse, persist, never crash.

use crate::parse::{extract_content, parse_report};
use crate::prompt::{build_analysis_prompt, format_history, SYSTEM_PROMPT};
use crate::traits::{ImageAttachment, InferenceRequest, ReasoningModel};
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tracing::{info, warn};
use vigil_core::{AlertLevel, CombinedVerdict, PipelineConfig, SeverityReport};
use vigil_store::repo::REPORT_TIMESTAMP_FORMAT;
use vigil_store::EventRepo;

/// Invokes the reasoning model on a combined verdict and parses its reply.
///
/// Both failure paths (invocation, parsing) synthesize an `alert_level = 0`
/// fallback report carrying the timestamp and source event id, so the
/// pipeline always receives a usable record.
pub struct SeverityClassifier {
    model: Arc<dyn ReasoningModel>,
    repo: EventRepo,
    config: PipelineConfig,
}

impl SeverityClassifier {
    pub fn new(model: Arc<dyn ReasoningModel>, repo: EventRepo, config: PipelineConfig) -> Self {
        Self {
            model,
            repo,
            config,
        }
    }

    /// Classify one combined verdict, optionally with the source frame
    /// attached, and persist the report plus its knowledge-base copy.
    pub fn classify(
        &self,
        verdict: &CombinedVerdict,
        image: Option<ImageAttachment>,
        now: DateTime<Utc>,
    ) -> SeverityReport {
        let timestamp = now.format(REPORT_TIMESTAMP_FORMAT).to_string();

        let history = self.load_history(now);
        let context = format_history(&history);
        let prompt = build_analysis_prompt(verdict, &context, &timestamp);

        let mut request = InferenceRequest::new(SYSTEM_PROMPT, prompt);
        if let Some(image) = image {
            request = request.with_image(image);
        }

        let report = match self.model.infer(&request) {
            Ok(response) => {
                let text = extract_content(&response).unwrap_or_else(|| response.to_string());
                match parse_report(&text) {
                    Ok(wire) => SeverityReport {
                        alert_level: wire.alert_level,
                        reason: wire.reason,
                        log_file_name: wire.log_file_name,
                        brief_description: wire.brief_description,
                        full_description: wire.full_description,
                        timestamp: timestamp.clone(),
                        source_event_id: verdict.event_id.clone(),
                        model_used: Some(self.model.model_id().to_string()),
                        historical_context_used: Some(history.len()),
                    },
                    Err(e) => {
                        warn!(event_id = %verdict.event_id, error = %e, "failed to parse model response as JSON");
                        SeverityReport {
                            alert_level: AlertLevel::Safe,
                            reason: "JSON parsing failed".to_string(),
                            log_file_name: format!("{}_parsing_error.json", timestamp),
                            brief_description: "Failed to parse model response".to_string(),
                            full_description: format!("Raw response: {}", text),
                            timestamp: timestamp.clone(),
                            source_event_id: verdict.event_id.clone(),
                            model_used: Some(self.model.model_id().to_string()),
                            historical_context_used: Some(history.len()),
                        }
                    }
                }
            }
            Err(e) => {
                warn!(event_id = %verdict.event_id, error = %e, "model invocation failed");
                SeverityReport {
                    alert_level: AlertLevel::Safe,
                    reason: "model invocation failed".to_string(),
                    log_file_name: format!("{}_invocation_error.json", timestamp),
                    brief_description: "AI analysis failed".to_string(),
                    full_description: format!("Error: {}", e),
                    timestamp: timestamp.clone(),
                    source_event_id: verdict.event_id.clone(),
                    model_used: Some(self.model.model_id().to_string()),
                    historical_context_used: Some(history.len()),
                }
            }
        };

        self.persist(verdict, &report);
        info!(
            event_id = %verdict.event_id,
            alert_level = u8::from(report.alert_level),
            reason = %report.reason,
            "severity report produced"
        );
        report
    }

    fn load_history(&self, now: DateTime<Utc>) -> Vec<SeverityReport> {
        let cutoff = now - Duration::hours(self.config.lookback_hours);
        match self.repo.recent_reports(cutoff, self.config.history_limit) {
            Ok(history) => history,
            Err(e) => {
                warn!(error = %e, "historical context retrieval failed, proceeding without it");
                Vec::new()
            }
        }
    }

    fn persist(&self, verdict: &CombinedVerdict, report: &SeverityReport) {
        let source_key = format!("events/combined/{}", verdict.event_id);
        if let Err(e) = self.repo.put_report(&source_key, report) {
            warn!(event_id = %verdict.event_id, error = %e, "failed to persist severity report");
        }
        if let Err(e) = self.repo.put_knowledge_base_entry(report) {
            warn!(event_id = %verdict.event_id, error = %e, "failed to persist knowledge-base entry");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::ModelError;
    use serde_json::json;
    use std::sync::Arc;
    use std::sync::Mutex;
    use vigil_core::{EventId, Modality, PriorityLevel};
    use vigil_store::{MemoryStore, ObjectStore};

    struct ScriptedModel {
        response: Result<serde_json::Value, ModelError>,
        last_prompt: Mutex<Option<String>>,
    }

    impl ScriptedModel {
        fn new(response: Result<serde_json::Value, ModelError>) -> Self {
            Self {
                response,
                last_prompt: Mutex::new(None),
            }
        }
    }

    impl ReasoningModel for ScriptedModel {
        fn model_id(&self) -> &str {
            "scripted-model"
        }

        fn infer(&self, request: &InferenceRequest) -> Result<serde_json::Value, ModelError> {
            *self.last_prompt.lock().unwrap() = Some(request.prompt.clone());
            self.response.clone()
        }
    }

    fn verdict() -> CombinedVerdict {
        CombinedVerdict {
            event_id: EventId::from_raw("20240101T120000Z"),
            has_audio: false,
            has_video: true,
            input_sources: vec![Modality::Video],
            combined_indicators: vec![],
            overall_safety_score: 85,
            priority_level: PriorityLevel::Low,
            note: "Analysis based on video input only".to_string(),
            timestamp: Utc::now(),
        }
    }

    fn classifier(
        model: Arc<ScriptedModel>,
    ) -> (SeverityClassifier, EventRepo, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let repo = EventRepo::new(store.clone());
        (
            SeverityClassifier::new(model, repo.clone(), PipelineConfig::default()),
            repo,
            store,
        )
    }

    fn wire_reply() -> serde_json::Value {
        json!({
            "content": [{"type": "text", "text":
                "```json\n{\"alert_level\":2,\"reason\":\"fall\",\"log_file_name\":\"fall.json\",\"brief_description\":\"fall detected\",\"full_description\":\"person on the floor\"}\n```"
            }]
        })
    }

    #[test]
    fn fenced_reply_parses_into_report() {
        let model = Arc::new(ScriptedModel::new(Ok(wire_reply())));
        let (classifier, _, store) = classifier(model);

        let report = classifier.classify(&verdict(), None, Utc::now());
        assert_eq!(report.alert_level, AlertLevel::High);
        assert_eq!(report.reason, "fall");
        assert_eq!(report.model_used.as_deref(), Some("scripted-model"));
        assert_eq!(report.historical_context_used, Some(0));
        assert_eq!(report.source_event_id, EventId::from_raw("20240101T120000Z"));

        // Persisted next to the verdict and copied to the knowledge base.
        assert!(store
            .get("events/combined/20240101T120000Z_analysis.json")
            .unwrap()
            .is_some());
        assert_eq!(store.list("knowledge-base/").unwrap().len(), 1);
    }

    #[test]
    fn unparsable_reply_degrades_to_safe_report() {
        let model = Arc::new(ScriptedModel::new(Ok(json!({
            "content": "I think everything looks fine, no JSON for you"
        }))));
        let (classifier, _, _) = classifier(model);

        let report = classifier.classify(&verdict(), None, Utc::now());
        assert_eq!(report.alert_level, AlertLevel::Safe);
        assert_eq!(report.reason, "JSON parsing failed");
        assert!(report.full_description.starts_with("Raw response: "));
        assert!(!report.timestamp.is_empty());
    }

    #[test]
    fn invocation_failure_degrades_to_safe_report() {
        let model = Arc::new(ScriptedModel::new(Err(ModelError::Unavailable(
            "connection refused".to_string(),
        ))));
        let (classifier, _, _) = classifier(model);

        let report = classifier.classify(&verdict(), None, Utc::now());
        assert_eq!(report.alert_level, AlertLevel::Safe);
        assert_eq!(report.reason, "model invocation failed");
        assert!(report.log_file_name.ends_with("_invocation_error.json"));
    }

    #[test]
    fn history_flows_into_the_prompt() {
        let past = SeverityReport {
            alert_level: AlertLevel::Soft,
            reason: "stumble near couch".to_string(),
            log_file_name: "stumble.json".to_string(),
            brief_description: "brief".to_string(),
            full_description: "full".to_string(),
            timestamp: Utc::now().format(REPORT_TIMESTAMP_FORMAT).to_string(),
            source_event_id: EventId::from_raw("20240101T110000Z"),
            model_used: None,
            historical_context_used: None,
        };

        let model = Arc::new(ScriptedModel::new(Ok(wire_reply())));
        let (classifier, repo, _) = classifier(model.clone());
        repo.put_knowledge_base_entry(&past).unwrap();

        let report = classifier.classify(&verdict(), None, Utc::now());
        assert_eq!(report.historical_context_used, Some(1));

        let prompt = model.last_prompt.lock().unwrap().clone().unwrap();
        assert!(prompt.contains("stumble near couch"));
    }
}
