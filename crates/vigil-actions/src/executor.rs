//! Action execution with partial-failure semantics.

use crate::channels::{ChannelError, MessageAttributes, Notifier, SpeechSynthesizer};
use crate::messages::{notification_body, notification_subject, speech_text};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};
use vigil_core::{Action, ActionType, PipelineConfig};

/// Log entry for one executed action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionEntry {
    pub action_type: ActionType,
    pub priority: u8,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub requires_immediate_response: bool,
    pub action_taken: String,
}

/// Record of one dispatched notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationRecord {
    pub action_type: ActionType,
    pub message_id: String,
    pub subject: String,
    pub timestamp: DateTime<Utc>,
}

/// Record of one completed speech synthesis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechRecord {
    pub action_type: ActionType,
    pub speech_text: String,
    pub audio_size_bytes: usize,
    pub voice_id: String,
    pub timestamp: DateTime<Utc>,
}

/// Per-action error, recorded without aborting the batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionError {
    pub action_type: ActionType,
    pub error: String,
    pub timestamp: DateTime<Utc>,
}

/// Outcome of one `execute` call. Always a success at the batch level; the
/// `errors` list carries whatever went wrong per action.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub executed: Vec<ExecutionEntry>,
    pub notifications: Vec<NotificationRecord>,
    pub speech: Vec<SpeechRecord>,
    pub errors: Vec<ExecutionError>,
}

impl ExecutionResult {
    /// Human-readable summary of the execution.
    pub fn summary(&self) -> String {
        let mut summary = format!(
            "Execution Summary:\n\
             - Total actions executed: {}\n\
             - Notifications sent: {}\n\
             - Speech synthesis completed: {}\n\
             - Errors encountered: {}",
            self.executed.len(),
            self.notifications.len(),
            self.speech.len(),
            self.errors.len(),
        );
        if !self.errors.is_empty() {
            summary.push_str("\n\nErrors:\n");
            for e in &self.errors {
                summary.push_str(&format!("- {}: {}\n", e.action_type, e.error));
            }
        }
        summary
    }
}

fn action_taken(action_type: ActionType) -> &'static str {
    match action_type {
        ActionType::EmergencyAlert => "Emergency alert processed",
        ActionType::FallDetected => "Fall detection alert processed",
        ActionType::UnusualActivity => "Unusual activity alert processed",
        ActionType::NormalActivity => "Normal activity logged",
    }
}

/// Executes routed actions against the external channels.
///
/// Actions are processed sequentially in the given (priority) order so log
/// and notification sequencing match escalation order.
pub struct ActionExecutor {
    notifier: Arc<dyn Notifier>,
    synthesizer: Arc<dyn SpeechSynthesizer>,
    config: PipelineConfig,
}

impl ActionExecutor {
    pub fn new(
        notifier: Arc<dyn Notifier>,
        synthesizer: Arc<dyn SpeechSynthesizer>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            notifier,
            synthesizer,
            config,
        }
    }

    /// Execute a batch of actions. Never fails as a whole: each action's
    /// errors are caught, recorded, and processing continues.
    pub fn execute(&self, actions: &[Action]) -> ExecutionResult {
        let mut result = ExecutionResult::default();

        for action in actions {
            let now = Utc::now();
            result.executed.push(ExecutionEntry {
                action_type: action.action_type,
                priority: action.priority,
                message: action.message.clone(),
                timestamp: now,
                requires_immediate_response: action.requires_immediate_response,
                action_taken: action_taken(action.action_type).to_string(),
            });

            if action.should_notify() {
                match self.notify(action, now) {
                    Ok(record) => result.notifications.push(record),
                    Err(e) => {
                        error!(action_type = %action.action_type, error = %e, "notification dispatch failed");
                        result.errors.push(ExecutionError {
                            action_type: action.action_type,
                            error: e.to_string(),
                            timestamp: Utc::now(),
                        });
                        // Matches the production path: a failed notification
                        // skips speech for this action, not for the batch.
                        continue;
                    }
                }
            }

            if action.should_speak() {
                match self.speak(action) {
                    Ok(record) => result.speech.push(record),
                    Err(e) => {
                        error!(action_type = %action.action_type, error = %e, "speech synthesis failed");
                        result.errors.push(ExecutionError {
                            action_type: action.action_type,
                            error: e.to_string(),
                            timestamp: Utc::now(),
                        });
                    }
                }
            }
        }

        info!(
            executed = result.executed.len(),
            notifications = result.notifications.len(),
            speech = result.speech.len(),
            errors = result.errors.len(),
            "action batch executed"
        );
        result
    }

    fn notify(
        &self,
        action: &Action,
        now: DateTime<Utc>,
    ) -> Result<NotificationRecord, ChannelError> {
        let subject = notification_subject(action.action_type);
        let body = notification_body(action, now);
        let attributes = MessageAttributes {
            priority: action.priority,
            action_type: action.action_type,
            requires_immediate_response: action.requires_immediate_response,
        };
        let message_id = self.notifier.publish(subject, &body, &attributes)?;
        Ok(NotificationRecord {
            action_type: action.action_type,
            message_id,
            subject: subject.to_string(),
            timestamp: now,
        })
    }

    /// Synthesize the canned phrase for an action. A permission-denied
    /// error is retried once after a fixed delay before giving up.
    fn speak(&self, action: &Action) -> Result<SpeechRecord, ChannelError> {
        let text = speech_text(action.action_type);
        let voice = &self.config.voice_id;

        let audio = match self.synthesizer.synthesize(text, voice) {
            Ok(audio) => audio,
            Err(ChannelError::PermissionDenied(msg)) => {
                info!(
                    delay_ms = self.config.speech_retry_delay_ms,
                    "speech permission denied ({}), retrying once", msg
                );
                std::thread::sleep(self.config.speech_retry_delay());
                self.synthesizer.synthesize(text, voice)?
            }
            Err(e) => return Err(e),
        };

        Ok(SpeechRecord {
            action_type: action.action_type,
            speech_text: text.to_string(),
            audio_size_bytes: audio.len(),
            voice_id: voice.clone(),
            timestamp: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct FakeNotifier {
        fail_on: Mutex<Vec<ActionType>>,
        published: Mutex<Vec<String>>,
    }

    impl FakeNotifier {
        fn new() -> Self {
            Self {
                fail_on: Mutex::new(Vec::new()),
                published: Mutex::new(Vec::new()),
            }
        }

        fn failing_on(action_type: ActionType) -> Self {
            let notifier = Self::new();
            notifier.fail_on.lock().unwrap().push(action_type);
            notifier
        }
    }

    impl Notifier for FakeNotifier {
        fn publish(
            &self,
            subject: &str,
            _body: &str,
            attributes: &MessageAttributes,
        ) -> Result<String, ChannelError> {
            if self.fail_on.lock().unwrap().contains(&attributes.action_type) {
                return Err(ChannelError::Unavailable("topic missing".to_string()));
            }
            self.published.lock().unwrap().push(subject.to_string());
            Ok(format!("msg-{}", self.published.lock().unwrap().len()))
        }
    }

    struct FakeSynthesizer {
        calls: AtomicUsize,
        deny_first: bool,
    }

    impl FakeSynthesizer {
        fn ok() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                deny_first: false,
            }
        }

        fn denying_first() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                deny_first: true,
            }
        }
    }

    impl SpeechSynthesizer for FakeSynthesizer {
        fn synthesize(&self, text: &str, _voice_id: &str) -> Result<Vec<u8>, ChannelError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if self.deny_first && call == 0 {
                return Err(ChannelError::PermissionDenied("cold role".to_string()));
            }
            Ok(text.as_bytes().to_vec())
        }
    }

    fn action(action_type: ActionType, priority: u8, immediate: bool) -> Action {
        Action {
            action_type,
            priority,
            message: format!("{} happened", action_type),
            metadata: serde_json::json!({}),
            requires_immediate_response: immediate,
        }
    }

    fn no_retry_config() -> PipelineConfig {
        PipelineConfig::new().with_speech_retry_delay(std::time::Duration::ZERO)
    }

    #[test]
    fn high_priority_action_notifies_and_speaks() {
        let executor = ActionExecutor::new(
            Arc::new(FakeNotifier::new()),
            Arc::new(FakeSynthesizer::ok()),
            no_retry_config(),
        );
        let result = executor.execute(&[action(ActionType::FallDetected, 1, true)]);
        assert_eq!(result.executed.len(), 1);
        assert_eq!(result.notifications.len(), 1);
        assert_eq!(result.speech.len(), 1);
        assert!(result.errors.is_empty());
        assert_eq!(result.speech[0].voice_id, "Joanna");
        assert!(result.speech[0].audio_size_bytes > 0);
    }

    #[test]
    fn normal_activity_triggers_no_side_effects() {
        let executor = ActionExecutor::new(
            Arc::new(FakeNotifier::new()),
            Arc::new(FakeSynthesizer::ok()),
            no_retry_config(),
        );
        let result = executor.execute(&[action(ActionType::NormalActivity, 5, false)]);
        assert_eq!(result.executed.len(), 1);
        assert!(result.notifications.is_empty());
        assert!(result.speech.is_empty());
    }

    #[test]
    fn one_failing_action_does_not_abort_the_batch() {
        let executor = ActionExecutor::new(
            Arc::new(FakeNotifier::failing_on(ActionType::EmergencyAlert)),
            Arc::new(FakeSynthesizer::ok()),
            no_retry_config(),
        );
        let batch = [
            action(ActionType::FallDetected, 1, true),
            action(ActionType::EmergencyAlert, 1, true),
            action(ActionType::UnusualActivity, 3, false),
        ];
        let result = executor.execute(&batch);

        // All three actions logged; the failing one contributes an error.
        assert_eq!(result.executed.len(), 3);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].action_type, ActionType::EmergencyAlert);
        // Actions 1 and 3 still dispatched their notifications.
        assert_eq!(result.notifications.len(), 2);
    }

    #[test]
    fn permission_denied_speech_is_retried_once() {
        let synthesizer = Arc::new(FakeSynthesizer::denying_first());
        let executor = ActionExecutor::new(
            Arc::new(FakeNotifier::new()),
            synthesizer.clone(),
            no_retry_config(),
        );
        let result = executor.execute(&[action(ActionType::EmergencyAlert, 1, true)]);
        assert_eq!(result.speech.len(), 1);
        assert!(result.errors.is_empty());
        assert_eq!(synthesizer.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn summary_counts_and_lists_errors() {
        let executor = ActionExecutor::new(
            Arc::new(FakeNotifier::failing_on(ActionType::FallDetected)),
            Arc::new(FakeSynthesizer::ok()),
            no_retry_config(),
        );
        let result = executor.execute(&[action(ActionType::FallDetected, 1, true)]);
        let summary = result.summary();
        assert!(summary.contains("Total actions executed: 1"));
        assert!(summary.contains("Errors encountered: 1"));
        assert!(summary.contains("fall_detected"));
    }
}
