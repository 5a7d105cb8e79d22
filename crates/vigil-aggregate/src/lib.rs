//! Vigil Aggregate: merging sub-analyses into one combined verdict
//!
//! Audio and video sub-analyses for the same event window arrive as
//! separate, asynchronous writes. The aggregator loads whatever has landed,
//! whether that is zero, one, or two records, and merges it into a single
//! [`vigil_core::CombinedVerdict`]. "Not yet present" and "never will be
//! present" are indistinguishable here and both degrade the same way.

pub mod aggregator;
pub mod merge;

pub use aggregator::Aggregator;
pub use merge::merge;
