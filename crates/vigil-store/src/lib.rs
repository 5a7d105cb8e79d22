//! Vigil Store: keyed object storage for pipeline artifacts
//!
//! Every artifact the pipeline persists is a JSON object under a
//! deterministic key:
//!
//! ```text
//! events/audio/{event_id}.json      sub-analysis, audio modality
//! events/video/{event_id}.json      sub-analysis, video modality
//! events/combined/{event_id}.json   combined verdict
//! {source_key}_analysis.json        severity report, next to its source
//! knowledge-base/{ts}_{name}.json   report copy for historical retrieval
//! ```
//!
//! The backend is abstracted behind [`ObjectStore`] so components can be
//! constructed against an in-memory fake in tests.

pub mod keys;
pub mod repo;
pub mod store;

pub use repo::{EventRepo, KnowledgeBaseEntry};
pub use store::{FsStore, MemoryStore, ObjectStore, StoreError};
