use super::session_status::SessionStatus;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// One clock-in → clock-out span for an employee.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkSession {
    pub id: i64,
    pub employee_id: String,
    pub clock_in_time: DateTime<Utc>,
    pub clock_out_time: Option<DateTime<Utc>>,
    pub total_break_time: i64, // seconds
    pub total_work_time: i64,  // seconds, (end - start) - breaks
    pub status: SessionStatus,
    pub notes: Option<String>,
    pub location: Option<String>,
}

impl WorkSession {
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Seconds of work between clock-in and `end`, net of `break_seconds`.
    /// Never negative.
    pub fn net_work_seconds(&self, end: DateTime<Utc>, break_seconds: i64) -> i64 {
        ((end - self.clock_in_time).num_seconds() - break_seconds).max(0)
    }

    /// Worked time as seen at `now`: stored total for closed sessions,
    /// computed live for the active one (`running_break` is the elapsed
    /// part of a break that is still open).
    pub fn worked_seconds_at(&self, now: DateTime<Utc>, running_break: i64) -> i64 {
        if self.is_active() {
            self.net_work_seconds(now, self.total_break_time + running_break)
        } else {
            self.total_work_time
        }
    }
}
