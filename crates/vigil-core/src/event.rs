//! Event windowing: mapping wall-clock time onto canonical event identifiers.
//!
//! An event id names a fixed-duration bucket of wall-clock time
//! (default 30s). The id is the bucket's start instant formatted as
//! `YYYYMMDDTHHMMSSZ`, so ids sort lexicographically in time order and any
//! two instants inside the same bucket produce the same id.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default correlation window in seconds.
pub const DEFAULT_WINDOW_SECONDS: i64 = 30;

/// Canonical event id shape: `YYYYMMDDTHHMMSSZ`.
pub const EVENT_ID_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// One input channel contributing to a safety assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modality {
    Audio,
    Video,
}

impl Modality {
    /// Storage path segment for this modality.
    pub fn key_segment(&self) -> &'static str {
        match self {
            Modality::Audio => "audio",
            Modality::Video => "video",
        }
    }
}

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key_segment())
    }
}

/// Canonical identifier of one correlation window.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(String);

impl EventId {
    /// Derive the event id for an instant, truncating to `window_seconds`.
    ///
    /// Pure function of the timestamp and window size: every instant within
    /// the same window yields the same id. Window sizes below one second
    /// clamp to one.
    pub fn from_timestamp(now: DateTime<Utc>, window_seconds: i64) -> Self {
        let window_seconds = window_seconds.max(1);
        let epoch = now.timestamp();
        let window_start = epoch.div_euclid(window_seconds) * window_seconds;
        let start = Utc
            .timestamp_opt(window_start, 0)
            .single()
            .unwrap_or_else(|| Utc.timestamp_opt(0, 0).single().unwrap());
        EventId(start.format("%Y%m%dT%H%M%SZ").to_string())
    }

    /// Event id for the current instant with the default window.
    pub fn now() -> Self {
        Self::from_timestamp(Utc::now(), DEFAULT_WINDOW_SECONDS)
    }

    /// Wrap an already-formatted id (e.g. one received over the wire).
    ///
    /// The content is not checked here; callers handling untrusted input
    /// must reject ids for which [`EventId::is_well_formed`] is false
    /// before using them as storage keys.
    pub fn from_raw(raw: impl Into<String>) -> Self {
        EventId(raw.into())
    }

    /// Whether this id matches the canonical `YYYYMMDDTHHMMSSZ` shape.
    pub fn is_well_formed(&self) -> bool {
        NaiveDateTime::parse_from_str(&self.0, EVENT_ID_FORMAT).is_ok()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
