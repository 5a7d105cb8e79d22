//! Vigil Actions: routing verdict text to side effects
//!
//! The router runs four independent keyword scans over a report's text and
//! emits zero or more prioritized actions. The executor dispatches each
//! action against the notification and speech channels with partial-failure
//! semantics: one action's error never aborts the batch.

pub mod channels;
pub mod executor;
pub mod messages;
pub mod router;

pub use channels::{ChannelError, MessageAttributes, Notifier, SpeechSynthesizer};
pub use executor::{ActionExecutor, ExecutionResult};
pub use messages::caregiver_message;
pub use router::route;
