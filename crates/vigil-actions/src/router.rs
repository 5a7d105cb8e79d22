//! Keyword-scan action routing.

use tracing::{error, info};
use vigil_core::{Action, ActionType};

const FALL_KEYWORDS: &[&str] = &[
    "fall",
    "fallen",
    "fell",
    "collapsed",
    "unconscious",
    "motionless",
    "lying down",
    "on floor",
    "emergency",
];

const EMERGENCY_KEYWORDS: &[&str] = &[
    "emergency",
    "urgent",
    "critical",
    "immediate",
    "help needed",
    "medical emergency",
    "ambulance",
    "911",
];

const UNUSUAL_KEYWORDS: &[&str] = &[
    "unusual",
    "abnormal",
    "concerning",
    "worrisome",
    "strange",
    "out of ordinary",
    "not normal",
];

const NORMAL_KEYWORDS: &[&str] = &[
    "normal", "regular", "routine", "fine", "okay", "good", "healthy", "active", "moving",
    "walking",
];

/// Derive actions from report text.
///
/// The four scans are independent; a report can trigger several actions.
/// The list comes back sorted ascending by priority, ties kept in scan
/// order (fall, emergency, unusual, normal). If routing itself fails, the
/// result is a single manual-check emergency action: a decision-pipeline
/// failure must never silently produce zero actions.
pub fn route(report_text: &str) -> Vec<Action> {
    match scan(report_text) {
        Ok(actions) => {
            info!(count = actions.len(), "routed actions from report text");
            actions
        }
        Err(e) => {
            error!(error = %e, "action routing failed, emitting manual-check alert");
            vec![Action::manual_check(e)]
        }
    }
}

fn scan(report_text: &str) -> Result<Vec<Action>, serde_json::Error> {
    let lowered = report_text.to_lowercase();
    let mut actions = Vec::new();

    let fall_hits = matched_keywords(&lowered, FALL_KEYWORDS);
    if !fall_hits.is_empty() {
        actions.push(Action {
            action_type: ActionType::FallDetected,
            priority: 1,
            message: format!("Fall detected: {}...", excerpt(report_text)),
            metadata: serde_json::to_value(Hits {
                indicators: fall_hits,
                full_content: report_text,
            })?,
            requires_immediate_response: true,
        });
    }

    let emergency_hits = matched_keywords(&lowered, EMERGENCY_KEYWORDS);
    if !emergency_hits.is_empty() {
        actions.push(Action {
            action_type: ActionType::EmergencyAlert,
            priority: 1,
            message: format!("Emergency situation detected: {}...", excerpt(report_text)),
            metadata: serde_json::to_value(Hits {
                indicators: emergency_hits,
                full_content: report_text,
            })?,
            requires_immediate_response: true,
        });
    }

    let unusual_hits = matched_keywords(&lowered, UNUSUAL_KEYWORDS);
    if !unusual_hits.is_empty() {
        actions.push(Action {
            action_type: ActionType::UnusualActivity,
            priority: 3,
            message: format!("Unusual activity detected: {}...", excerpt(report_text)),
            metadata: serde_json::to_value(Hits {
                indicators: unusual_hits,
                full_content: report_text,
            })?,
            requires_immediate_response: false,
        });
    }

    if NORMAL_KEYWORDS.iter().any(|k| lowered.contains(k)) {
        actions.push(Action {
            action_type: ActionType::NormalActivity,
            priority: 5,
            message: format!("Normal activity confirmed: {}...", excerpt(report_text)),
            metadata: serde_json::json!({ "full_content": report_text }),
            requires_immediate_response: false,
        });
    }

    // Stable sort: equal priorities keep scan order.
    actions.sort_by_key(|a| a.priority);
    Ok(actions)
}

#[derive(serde::Serialize)]
struct Hits<'a> {
    indicators: Vec<&'static str>,
    full_content: &'a str,
}

fn matched_keywords(lowered: &str, keywords: &[&'static str]) -> Vec<&'static str> {
    keywords
        .iter()
        .filter(|k| lowered.contains(*k))
        .copied()
        .collect()
}

/// First 200 characters, respecting char boundaries.
fn excerpt(text: &str) -> &str {
    match text.char_indices().nth(200) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
