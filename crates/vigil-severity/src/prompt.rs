//! Prompt assembly for the reasoning step.

use vigil_core::{CombinedVerdict, SeverityReport};

/// Fixed system prompt describing the monitoring task and the severity
/// scale the model must answer with.
pub const SYSTEM_PROMPT: &str = "\
You are an AI assistant specialized in monitoring people in their living spaces, \
indoors or outdoors. Watch for potentially concerning events: falls, medical \
emergencies, unusual behavior, or safety concerns that require immediate attention.

You will receive a summary of the current event window (and possibly a camera \
frame), together with context from previous events. Examine posture, body angle, \
ground contact, and unusual stillness. Do not ignore small or distant figures.

Determine the severity level:
    0: No issues detected requiring immediate attention
    1: Possible issue detected requiring attention (soft alert)
    2: Issue requiring immediate action detected (high alert)

Respond with exactly this JSON output format:
{\"alert_level\":int,
\"reason\":string,
\"log_file_name\":string,
\"brief_description\":string,
\"full_description\":string}

Do not add any preamble or explanation - your correctly formatted JSON response \
will trigger the appropriate alerts.";

/// Format historical events into a context block for the prompt.
pub fn format_history(events: &[SeverityReport]) -> String {
    if events.is_empty() {
        return "No previous events found in the knowledge base.".to_string();
    }

    let mut context = String::from("Previous events from knowledge base:\n");
    for (i, event) in events.iter().enumerate() {
        context.push_str(&format!("{}. Time: {}\n", i + 1, event.timestamp));
        context.push_str(&format!(
            "   Alert Level: {}\n",
            u8::from(event.alert_level)
        ));
        context.push_str(&format!("   Reason: {}\n", event.reason));
        context.push_str(&format!("   Brief: {}\n\n", event.brief_description));
    }
    context
}

/// Build the per-event analysis prompt.
pub fn build_analysis_prompt(verdict: &CombinedVerdict, context: &str, timestamp: &str) -> String {
    let sources = verdict
        .input_sources
        .iter()
        .map(|m| m.to_string())
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "Analyze the following event window for elderly safety monitoring.\n\
         Use the timestamp '{timestamp}' for the log file name.\n\
         \n\
         Event ID: {event_id}\n\
         Input Sources: [{sources}]\n\
         Overall Safety Score: {score}/100\n\
         Priority Level: {priority}\n\
         Indicators: {indicators:?}\n\
         Note: {note}\n\
         \n\
         CONTEXT FROM PREVIOUS EVENTS:\n\
         {context}\n\
         \n\
         Use this historical context to help determine if the current situation is \
         normal, concerning, or requires immediate attention. Consider patterns, \
         frequency, and severity of similar past events.\n\
         \n\
         If no concerning activity is detected, set 'alert_level':0 and explain why.\n\
         Return only your valid formatted JSON (confirm no double quotes appear in \
         description text):",
        timestamp = timestamp,
        event_id = verdict.event_id,
        sources = sources,
        score = verdict.overall_safety_score,
        priority = verdict.priority_level,
        indicators = verdict.combined_indicators,
        note = verdict.note,
    )
}
