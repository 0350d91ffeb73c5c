//! Pure aggregation for daily and range summaries.

use crate::config::Config;
use crate::models::summary::{DailySummary, RangeSummary};
use crate::models::work_session::WorkSession;
use crate::utils::time::seconds_to_hours;
use chrono::{DateTime, NaiveDate, Utc};

/// Settings that turn worked time into money and decide day boundaries.
#[derive(Debug, Clone, PartialEq)]
pub struct BillingSettings {
    pub utc_offset_minutes: i32,
    pub hourly_rate: f64,
    pub currency: String,
}

impl Default for BillingSettings {
    fn default() -> Self {
        Self {
            utc_offset_minutes: 0,
            hourly_rate: 0.0,
            currency: "EUR".to_string(),
        }
    }
}

impl From<&Config> for BillingSettings {
    fn from(cfg: &Config) -> Self {
        Self {
            utc_offset_minutes: cfg.utc_offset_minutes,
            hourly_rate: cfg.hourly_rate,
            currency: cfg.currency.clone(),
        }
    }
}

/// A work session together with the live figures needed to summarize it.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub session: WorkSession,
    /// Elapsed seconds of a break that is still open (0 otherwise).
    pub running_break: i64,
    pub idle_seconds: i64,
}

fn round_cents(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

pub fn build_daily_summary(
    employee_id: &str,
    date: NaiveDate,
    snapshots: Vec<SessionSnapshot>,
    now: DateTime<Utc>,
) -> DailySummary {
    let mut out = DailySummary::empty(employee_id, date);

    for snap in snapshots {
        let s = &snap.session;
        out.total_work_time += s.worked_seconds_at(now, snap.running_break);
        out.total_break_time += s.total_break_time + snap.running_break;
        out.total_idle_time += snap.idle_seconds;
        out.in_progress |= s.is_active();
        out.sessions.push(snap.session);
    }

    out.session_count = out.sessions.len();
    out
}

pub fn build_range_summary(
    employee_id: &str,
    from: NaiveDate,
    to: NaiveDate,
    days: Vec<DailySummary>,
    billing: &BillingSettings,
) -> RangeSummary {
    let total_work_time: i64 = days.iter().map(|d| d.total_work_time).sum();
    let total_break_time = days.iter().map(|d| d.total_break_time).sum();
    let total_idle_time = days.iter().map(|d| d.total_idle_time).sum();
    let billable_hours = round_cents(seconds_to_hours(total_work_time));

    RangeSummary {
        employee_id: employee_id.to_string(),
        from,
        to,
        days,
        total_work_time,
        total_break_time,
        total_idle_time,
        billable_hours,
        hourly_rate: billing.hourly_rate,
        amount: round_cents(seconds_to_hours(total_work_time) * billing.hourly_rate),
        currency: billing.currency.clone(),
    }
}
