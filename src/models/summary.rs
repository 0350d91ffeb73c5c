use super::{break_session::BreakSession, idle_session::IdleSession, work_session::WorkSession};
use chrono::NaiveDate;
use serde::Serialize;

/// Aggregated totals for one employee on one calendar day.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DailySummary {
    pub employee_id: String,
    pub date: NaiveDate,
    pub session_count: usize,
    pub total_work_time: i64,
    pub total_break_time: i64,
    pub total_idle_time: i64,
    pub in_progress: bool,
    pub sessions: Vec<WorkSession>,
}

impl DailySummary {
    pub fn empty(employee_id: &str, date: NaiveDate) -> Self {
        Self {
            employee_id: employee_id.to_string(),
            date,
            session_count: 0,
            total_work_time: 0,
            total_break_time: 0,
            total_idle_time: 0,
            in_progress: false,
            sessions: Vec::new(),
        }
    }
}

/// Totals over an inclusive date range, with the billable amount.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RangeSummary {
    pub employee_id: String,
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub days: Vec<DailySummary>,
    pub total_work_time: i64,
    pub total_break_time: i64,
    pub total_idle_time: i64,
    pub billable_hours: f64,
    pub hourly_rate: f64,
    pub amount: f64,
    pub currency: String,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EmployeeState {
    ClockedOut,
    ClockedIn,
    OnBreak,
}

impl EmployeeState {
    pub fn label(&self) -> &'static str {
        match self {
            EmployeeState::ClockedOut => "clocked out",
            EmployeeState::ClockedIn => "clocked in",
            EmployeeState::OnBreak => "on break",
        }
    }
}

/// Snapshot of where an employee currently is in the session lifecycle.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeStatus {
    pub employee_id: String,
    pub state: EmployeeState,
    pub idle: bool,
    pub work_session: Option<WorkSession>,
    pub active_break: Option<BreakSession>,
    pub active_idle: Option<IdleSession>,
    pub worked_seconds: i64,
}
