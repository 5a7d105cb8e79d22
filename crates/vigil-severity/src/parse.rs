//! Response parsing: content extraction and fenced-JSON handling.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use vigil_core::AlertLevel;

/// The reasoning model's wire shape. Must round-trip exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportWire {
    pub alert_level: AlertLevel,
    pub reason: String,
    pub log_file_name: String,
    pub brief_description: String,
    pub full_description: String,
}

/// Keys probed, in order, when digging the reply text out of a response
/// envelope. First successful extraction wins.
const EXTRACTION_KEYS: &[&str] = &["content", "text", "response", "output", "message", "completion"];

/// Extract the reply text from a model response envelope.
///
/// Different transports wrap the text differently: a bare string, a
/// `{"text": ...}` object, or a content-block array
/// (`[{"type": "text", "text": ...}]`). The strategies are tried in a fixed
/// order against each known key.
pub fn extract_content(response: &Value) -> Option<String> {
    if let Value::String(s) = response {
        return Some(s.clone());
    }

    let obj = response.as_object()?;
    for key in EXTRACTION_KEYS {
        if let Some(found) = obj.get(*key).and_then(extract_text_value) {
            return Some(found);
        }
    }
    None
}

fn extract_text_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Object(map) => map.get("text").and_then(Value::as_str).map(str::to_string),
        Value::Array(blocks) => blocks.iter().find_map(|block| {
            block
                .get("text")
                .and_then(Value::as_str)
                .map(str::to_string)
        }),
        _ => None,
    }
}

/// Strip surrounding Markdown code-fence markers, if any.
///
/// `"```json\n{...}\n```"` and the same object without fences must parse
/// identically.
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let inner = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    let inner = match inner.find("```") {
        Some(end) => &inner[..end],
        None => inner,
    };
    inner.trim()
}

/// Parse a (possibly fenced) reply into the wire shape.
pub fn parse_report(text: &str) -> Result<ReportWire, serde_json::Error> {
    serde_json::from_str(strip_code_fences(text))
}
