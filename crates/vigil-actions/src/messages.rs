//! Fixed message texts: notification subjects and bodies, canned speech
//! phrases, and the caregiver message per alert level.

use chrono::{DateTime, Utc};
use vigil_core::{Action, ActionType, AlertLevel, SeverityReport};

/// Subject line for a notification, by action type.
pub fn notification_subject(action_type: ActionType) -> &'static str {
    match action_type {
        ActionType::EmergencyAlert => "🚨 EMERGENCY ALERT - Immediate Attention Required",
        ActionType::FallDetected => "⚠️ FALL DETECTED - Elderly Safety Alert",
        ActionType::UnusualActivity => "📊 Unusual Activity Detected",
        ActionType::NormalActivity => "✅ Normal Activity Confirmed",
    }
}

fn title(action_type: ActionType) -> &'static str {
    match action_type {
        ActionType::EmergencyAlert => "Emergency Alert",
        ActionType::FallDetected => "Fall Detected",
        ActionType::UnusualActivity => "Unusual Activity",
        ActionType::NormalActivity => "Normal Activity",
    }
}

/// Notification body: type, priority, timestamp, immediate-flag, message,
/// and serialized metadata.
pub fn notification_body(action: &Action, now: DateTime<Utc>) -> String {
    let metadata = serde_json::to_string_pretty(&action.metadata)
        .unwrap_or_else(|_| action.metadata.to_string());

    format!(
        "Action Type: {}\n\
         Priority: {}/5\n\
         Timestamp: {}\n\
         Requires Immediate Response: {}\n\
         \n\
         Message: {}\n\
         \n\
         Metadata: {}",
        title(action.action_type),
        action.priority,
        now.format("%Y-%m-%d %H:%M:%S UTC"),
        if action.requires_immediate_response {
            "Yes"
        } else {
            "No"
        },
        action.message,
        metadata,
    )
}

/// Canned phrase synthesized for an action.
pub fn speech_text(action_type: ActionType) -> &'static str {
    match action_type {
        ActionType::EmergencyAlert => {
            "Emergency alert! Immediate attention required. Please check on the elderly person immediately."
        }
        ActionType::FallDetected => {
            "Fall detected! The elderly person may have fallen. Please check on them immediately."
        }
        ActionType::UnusualActivity => {
            "Unusual activity detected. Please check on the elderly person when convenient."
        }
        ActionType::NormalActivity => {
            "Normal activity confirmed. Everything appears to be fine."
        }
    }
}

/// Spoken message addressed to the monitored person, by alert level.
pub fn caregiver_message(report: &SeverityReport) -> String {
    match report.alert_level {
        AlertLevel::Safe => {
            "Hello! Everything seems fine. No immediate issues detected.".to_string()
        }
        AlertLevel::Soft => format!(
            "Hi! A minor incident was detected: {}. Please respond if you are okay.",
            report.brief_description
        ),
        AlertLevel::High => format!(
            "Attention! A serious incident was detected: {}. Please stay still. Help has been informed.",
            report.brief_description
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vigil_core::EventId;

    fn report(level: AlertLevel) -> SeverityReport {
        SeverityReport {
            alert_level: level,
            reason: "reason".to_string(),
            log_file_name: "log.json".to_string(),
            brief_description: "a stumble near the couch".to_string(),
            full_description: "full".to_string(),
            timestamp: "20240101-120000".to_string(),
            source_event_id: EventId::from_raw("20240101T120000Z"),
            model_used: None,
            historical_context_used: None,
        }
    }

    #[test]
    fn subjects_are_distinct_per_type() {
        let subjects = [
            notification_subject(ActionType::EmergencyAlert),
            notification_subject(ActionType::FallDetected),
            notification_subject(ActionType::UnusualActivity),
            notification_subject(ActionType::NormalActivity),
        ];
        for (i, a) in subjects.iter().enumerate() {
            for b in &subjects[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn body_carries_all_fields() {
        let action = Action {
            action_type: ActionType::FallDetected,
            priority: 1,
            message: "Fall detected: person on floor...".to_string(),
            metadata: serde_json::json!({"indicators": ["fell"]}),
            requires_immediate_response: true,
        };
        let body = notification_body(&action, Utc::now());
        assert!(body.contains("Action Type: Fall Detected"));
        assert!(body.contains("Priority: 1/5"));
        assert!(body.contains("Requires Immediate Response: Yes"));
        assert!(body.contains("person on floor"));
        assert!(body.contains("\"fell\""));
    }

    #[test]
    fn caregiver_message_per_level() {
        assert!(caregiver_message(&report(AlertLevel::Safe)).contains("Everything seems fine"));
        assert!(caregiver_message(&report(AlertLevel::Soft)).contains("minor incident"));
        let high = caregiver_message(&report(AlertLevel::High));
        assert!(high.contains("serious incident"));
        assert!(high.contains("a stumble near the couch"));
    }
}
