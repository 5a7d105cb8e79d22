//! Vigil Analyzers: modality normalization over opaque classifiers
//!
//! Each analyzer wraps one opaque classifier (transcription or vision),
//! normalizes its output into a [`vigil_core::SubAnalysis`], and persists it
//! keyed by `(event_id, modality)`. A classifier failure degrades to a
//! `present = false` record rather than raising; the aggregator must
//! tolerate either modality being entirely absent.

pub mod audio;
pub mod traits;
pub mod video;

pub use audio::{scan_transcript, AudioAnalyzer};
pub use traits::{ClassifierError, DetectedLabel, FrameAnalysis, Transcriber, VisionClassifier};
pub use video::VideoAnalyzer;
