//! Core data types for action dispatch

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of one dispatched action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionReport {
    /// Action tag as sent by the model
    pub kind: String,

    /// When the action started
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub started_at: DateTime<Utc>,

    /// When the action (including the settle delay) finished
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub finished_at: DateTime<Utc>,

    /// Total latency in milliseconds
    pub latency_ms: u64,

    /// True when nothing was sent to the page
    pub noop: bool,

    /// Non-fatal problems met while executing (e.g. keys that failed)
    pub warnings: Vec<String>,
}

impl ActionReport {
    pub fn new(kind: impl Into<String>, started_at: DateTime<Utc>) -> Self {
        Self {
            kind: kind.into(),
            started_at,
            finished_at: started_at,
            latency_ms: 0,
            noop: false,
            warnings: Vec::new(),
        }
    }

    pub(crate) fn finish(mut self) -> Self {
        self.finished_at = Utc::now();
        self.latency_ms = (self.finished_at - self.started_at)
            .num_milliseconds()
            .max(0) as u64;
        self
    }
}
