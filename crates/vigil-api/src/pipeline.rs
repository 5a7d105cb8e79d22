//! End-to-end orchestration: ingest, aggregate, classify, act.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::info;

use vigil_actions::{
    caregiver_message, route, ActionExecutor, ExecutionResult, Notifier, SpeechSynthesizer,
};
use vigil_aggregate::Aggregator;
use vigil_analyzers::{AudioAnalyzer, Transcriber, VideoAnalyzer, VisionClassifier};
use vigil_core::{
    Action, CombinedVerdict, EventId, PipelineConfig, SeverityReport, SubAnalysis, VigilError,
};
use vigil_severity::{ImageAttachment, ReasoningModel, SeverityClassifier};
use vigil_store::{EventRepo, ObjectStore};

/// External integrations the pipeline is parameterized over.
pub struct ExternalServices {
    pub transcriber: Arc<dyn Transcriber>,
    pub vision: Arc<dyn VisionClassifier>,
    pub model: Arc<dyn ReasoningModel>,
    pub notifier: Arc<dyn Notifier>,
    pub synthesizer: Arc<dyn SpeechSynthesizer>,
}

/// Outcome of a full evaluation pass for one event window.
#[derive(Debug, Serialize)]
pub struct Evaluation {
    pub verdict: CombinedVerdict,
    pub report: SeverityReport,
    pub actions: Vec<Action>,
    pub execution: ExecutionResult,

    /// Spoken-word message addressed to the monitored person.
    pub caregiver_message: String,
}

pub struct Pipeline {
    config: PipelineConfig,
    audio: AudioAnalyzer,
    video: VideoAnalyzer,
    aggregator: Aggregator,
    classifier: SeverityClassifier,
    executor: ActionExecutor,
}

impl Pipeline {
    pub fn new(
        store: Arc<dyn ObjectStore>,
        services: ExternalServices,
        config: PipelineConfig,
    ) -> Self {
        let repo = EventRepo::new(store);
        Self {
            audio: AudioAnalyzer::new(services.transcriber, repo.clone()),
            video: VideoAnalyzer::new(services.vision, repo.clone(), config.clone()),
            aggregator: Aggregator::new(repo.clone(), config.clone()),
            classifier: SeverityClassifier::new(services.model, repo, config.clone()),
            executor: ActionExecutor::new(services.notifier, services.synthesizer, config.clone()),
            config,
        }
    }

    /// Event id for the window containing the current instant.
    pub fn current_event_id(&self) -> EventId {
        EventId::from_timestamp(Utc::now(), self.config.window_seconds)
    }

    /// Transcribe and scan one audio clip, persisting the sub-analysis.
    pub fn ingest_audio(&self, event_id: &EventId, audio: &[u8]) -> Result<SubAnalysis, VigilError> {
        validate_event_id(event_id)?;
        self.audio
            .run(audio, event_id, Utc::now())
            .map_err(|e| VigilError::Store(e.to_string()))
    }

    /// Analyze one video frame. Returns None when the presence gate
    /// drops the frame (no person seen), in which case nothing is stored.
    pub fn ingest_video(
        &self,
        event_id: &EventId,
        frame: &[u8],
    ) -> Result<Option<SubAnalysis>, VigilError> {
        validate_event_id(event_id)?;
        self.video
            .run(frame, event_id, Utc::now())
            .map_err(|e| VigilError::Store(e.to_string()))
    }

    /// Merge whatever sub-analyses exist for the window, grade severity,
    /// route and execute the resulting actions.
    pub fn evaluate(
        &self,
        event_id: &EventId,
        image: Option<ImageAttachment>,
    ) -> Result<Evaluation, VigilError> {
        validate_event_id(event_id)?;
        let now = Utc::now();

        let verdict = self.aggregator.combine(event_id, now);
        let report = self.classifier.classify(&verdict, image, now);
        let actions = route(&report_text(&report));
        let execution = self.executor.execute(&actions);

        info!(
            event_id = %event_id,
            alert_level = u8::from(report.alert_level),
            summary = %execution.summary(),
            "evaluation complete"
        );

        let caregiver_message = caregiver_message(&report);
        Ok(Evaluation {
            verdict,
            report,
            actions,
            execution,
            caregiver_message,
        })
    }
}

// Ids arrive as raw URL path segments and end up as storage key parts, so
// anything outside the canonical shape is rejected before it reaches a store.
fn validate_event_id(event_id: &EventId) -> Result<(), VigilError> {
    if !event_id.is_well_formed() {
        return Err(VigilError::Validation(format!(
            "malformed event id: {:?}",
            event_id.as_str()
        )));
    }
    Ok(())
}

/// Text the keyword router scans. The reason plus both descriptions
/// carry every indicator the grading model surfaced.
fn report_text(report: &SeverityReport) -> String {
    format!(
        "{}. {}. {}",
        report.reason, report.brief_description, report.full_description
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use vigil_core::AlertLevel;

    fn sample_report(reason: &str, brief: &str, full: &str) -> SeverityReport {
        SeverityReport {
            alert_level: AlertLevel::Safe,
            reason: reason.to_string(),
            log_file_name: "20240101-120000_analysis.json".to_string(),
            brief_description: brief.to_string(),
            full_description: full.to_string(),
            timestamp: "20240101-120000".to_string(),
            source_event_id: EventId::from_raw("20240101T120000Z"),
            model_used: None,
            historical_context_used: None,
        }
    }

    #[test]
    fn report_text_includes_all_narrative_fields() {
        let report = sample_report("routine activity", "walking calmly", "no fall indicators");
        let text = report_text(&report);
        assert!(text.contains("routine activity"));
        assert!(text.contains("walking calmly"));
        assert!(text.contains("no fall indicators"));
    }
}
