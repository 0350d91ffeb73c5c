use super::session_status::SessionStatus;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// A pause nested inside a work session, excluded from worked time.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BreakSession {
    pub id: i64,
    pub work_session_id: i64,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub duration: Option<i64>, // seconds, set when the break ends
    pub notes: Option<String>,
    pub status: SessionStatus,
}

impl BreakSession {
    /// Elapsed seconds at `now` (or the final duration once closed).
    pub fn elapsed_at(&self, now: DateTime<Utc>) -> i64 {
        match self.duration {
            Some(d) => d,
            None => (now - self.start_time).num_seconds().max(0),
        }
    }
}

/// Identifies the break to close: either directly, or through the work
/// session that owns the active break.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakRef {
    Break(i64),
    WorkSession(i64),
}
