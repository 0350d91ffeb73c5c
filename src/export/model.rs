use crate::models::work_session::WorkSession;
use crate::utils::time::format_seconds;
use serde::Serialize;

/// Flat row used by the CSV and JSON exporters.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct SessionExport {
    pub id: i64,
    pub employee_id: String,
    pub clock_in_time: String,
    pub clock_out_time: String,
    pub status: String,
    pub total_work_seconds: i64,
    pub total_break_seconds: i64,
    pub worked: String,
    pub location: String,
    pub notes: String,
}

impl SessionExport {
    pub const HEADERS: [&'static str; 10] = [
        "id",
        "employee_id",
        "clock_in_time",
        "clock_out_time",
        "status",
        "total_work_seconds",
        "total_break_seconds",
        "worked",
        "location",
        "notes",
    ];

    /// `worked_seconds` is the live figure for a session still in progress.
    pub fn from_session(ws: &WorkSession, worked_seconds: i64) -> Self {
        Self {
            id: ws.id,
            employee_id: ws.employee_id.clone(),
            clock_in_time: ws.clock_in_time.to_rfc3339(),
            clock_out_time: ws
                .clock_out_time
                .map(|t| t.to_rfc3339())
                .unwrap_or_default(),
            status: ws.status.to_db_str().to_string(),
            total_work_seconds: worked_seconds,
            total_break_seconds: ws.total_break_time,
            worked: format_seconds(worked_seconds),
            location: ws.location.clone().unwrap_or_default(),
            notes: ws.notes.clone().unwrap_or_default(),
        }
    }

    pub fn to_record(&self) -> [String; 10] {
        [
            self.id.to_string(),
            self.employee_id.clone(),
            self.clock_in_time.clone(),
            self.clock_out_time.clone(),
            self.status.clone(),
            self.total_work_seconds.to_string(),
            self.total_break_seconds.to_string(),
            self.worked.clone(),
            self.location.clone(),
            self.notes.clone(),
        ]
    }
}
