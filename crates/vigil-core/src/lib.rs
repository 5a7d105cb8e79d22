//! Vigil Core: event windowing, data model, errors, and configuration
//!
//! The correlation pipeline works on fixed-size time buckets. Every capture
//! that lands inside the same bucket gets the same [`EventId`], which is how
//! independently-arriving audio and video samples of the same real-world
//! moment are joined back together downstream.

pub mod config;
pub mod error;
pub mod event;
pub mod model;

pub use config::PipelineConfig;
pub use error::VigilError;
pub use event::{EventId, Modality};
pub use model::{
    Action, ActionType, AlertLevel, CombinedVerdict, PriorityLevel, SeverityReport, SubAnalysis,
};

/// Crate version, surfaced by the API health endpoint.
pub const VIGIL_VERSION: &str = env!("CARGO_PKG_VERSION");
