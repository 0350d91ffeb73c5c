use super::session_status::SessionStatus;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// A detected period of inactivity inside a work session.
/// Tracked for reporting only: it is not subtracted from work or break time.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IdleSession {
    pub id: i64,
    pub work_session_id: i64,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub duration: Option<i64>,
    pub status: SessionStatus,
}

impl IdleSession {
    pub fn elapsed_at(&self, now: DateTime<Utc>) -> i64 {
        match self.duration {
            Some(d) => d,
            None => (now - self.start_time).num_seconds().max(0),
        }
    }
}
