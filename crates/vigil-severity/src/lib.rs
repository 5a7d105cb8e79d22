//! Vigil Severity: the reasoning step and its fail-safe parsing
//!
//! Builds a natural-language prompt from a combined verdict plus recent
//! historical events, invokes the opaque multimodal reasoning model, and
//! parses the structured JSON judgment out of its reply. Every failure mode
//! (unreachable model, unparsable output) degrades to an
//! `alert_level = 0` fallback report; this stage never crashes the
//! pipeline and never hangs it.

pub mod classify;
pub mod parse;
pub mod prompt;
pub mod traits;

pub use classify::SeverityClassifier;
pub use parse::{extract_content, strip_code_fences, ReportWire};
pub use prompt::{build_analysis_prompt, format_history, SYSTEM_PROMPT};
pub use traits::{ImageAttachment, InferenceRequest, ModelError, ReasoningModel};
