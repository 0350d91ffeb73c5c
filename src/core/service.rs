//! Session state engine.
//!
//! `NO_SESSION → CLOCKED_IN → (ON_BREAK ↔ CLOCKED_IN) → CLOCKED_OUT`, with
//! idle periods tracked alongside. Every transition runs in one
//! `BEGIN IMMEDIATE` transaction; the "one active session" rules are backed
//! by unique indexes, so a lost race surfaces as `Conflict`, never as a
//! second active row.

use crate::config::Config;
use crate::core::calculator::summary::{self, BillingSettings, SessionSnapshot};
use crate::db::initialize::init_db;
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::queries;
use crate::errors::{AppError, AppResult};
use crate::models::activity::{
    ApplicationActivity, NewApplicationActivity, NewWebsiteActivity, WebsiteActivity, domain_of,
};
use crate::models::break_session::{BreakRef, BreakSession};
use crate::models::idle_session::IdleSession;
use crate::models::summary::{DailySummary, EmployeeState, EmployeeStatus, RangeSummary};
use crate::models::work_session::WorkSession;
use crate::utils::date;
use crate::utils::time::{Clock, SystemClock};
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{Connection, TransactionBehavior};
use std::sync::Arc;

/// Longest range accepted by [`TimeTrackingService::get_range_summary`].
pub const MAX_SUMMARY_DAYS: i64 = 366;

pub struct TimeTrackingService {
    pool: DbPool,
    clock: Arc<dyn Clock>,
    billing: BillingSettings,
}

/// Trimmed, non-empty identifier or a validation error naming the field.
pub fn require_id<'a>(field: &str, value: &'a str) -> AppResult<&'a str> {
    let v = value.trim();
    if v.is_empty() {
        return Err(AppError::Validation(format!("{} is required", field)));
    }
    Ok(v)
}

fn clean_notes(notes: Option<&str>) -> Option<&str> {
    notes.map(str::trim).filter(|n| !n.is_empty())
}

/// Notes given when closing a session are appended to the opening ones.
fn merge_notes(existing: Option<&str>, extra: Option<&str>) -> Option<String> {
    match (clean_notes(existing), clean_notes(extra)) {
        (Some(a), Some(b)) => Some(format!("{}\n{}", a, b)),
        (Some(a), None) => Some(a.to_string()),
        (None, Some(b)) => Some(b.to_string()),
        (None, None) => None,
    }
}

/// Turns a unique-index failure into a conflict; other errors pass through.
fn conflict_on_unique(err: rusqlite::Error, msg: impl FnOnce() -> String) -> AppError {
    if queries::is_unique_violation(&err) {
        AppError::Conflict(msg())
    } else {
        AppError::Db(err)
    }
}

fn load_work_session(conn: &Connection, id: i64) -> AppResult<WorkSession> {
    queries::find_work_session(conn, id)?
        .ok_or_else(|| AppError::NotFound(format!("Work session {} not found", id)))
}

fn load_active_work_session(conn: &Connection, id: i64) -> AppResult<WorkSession> {
    match queries::find_work_session(conn, id)? {
        Some(ws) if ws.is_active() => Ok(ws),
        Some(_) => Err(AppError::NotFound(format!(
            "Work session {} is not active",
            id
        ))),
        None => Err(AppError::NotFound(format!("Work session {} not found", id))),
    }
}

impl TimeTrackingService {
    pub fn new(pool: DbPool, clock: Arc<dyn Clock>, billing: BillingSettings) -> Self {
        Self {
            pool,
            clock,
            billing,
        }
    }

    /// Open the configured database, apply pending migrations and use the
    /// system clock.
    pub fn open(cfg: &Config) -> AppResult<Self> {
        let pool = DbPool::with_timeout(&cfg.database, cfg.busy_timeout_ms)?;
        init_db(&pool.conn)?;
        Ok(Self::new(
            pool,
            Arc::new(SystemClock),
            BillingSettings::from(cfg),
        ))
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn conn(&self) -> &Connection {
        &self.pool.conn
    }

    // -----------------------------------------------------------------
    // Work sessions
    // -----------------------------------------------------------------

    pub fn clock_in(
        &mut self,
        employee_id: &str,
        notes: Option<&str>,
        location: Option<&str>,
    ) -> AppResult<WorkSession> {
        let employee_id = require_id("employeeId", employee_id)?;
        let now = self.clock.now();
        let already_in = || format!("Employee {} is already clocked in", employee_id);

        let tx = self
            .pool
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        if queries::find_active_work_session(&tx, employee_id)?.is_some() {
            return Err(AppError::Conflict(already_in()));
        }

        let id = queries::insert_work_session(
            &tx,
            employee_id,
            now,
            clean_notes(notes),
            clean_notes(location),
        )
        .map_err(|e| conflict_on_unique(e, already_in))?;

        ttlog(
            &tx,
            "clock_in",
            employee_id,
            &format!("Work session {} started", id),
        )?;
        let session = load_work_session(&tx, id)?;
        tx.commit()?;

        tracing::debug!(employee_id, work_session_id = id, "clocked in");
        Ok(session)
    }

    /// Clocking out while a break is open is rejected; any open idle
    /// session is closed at the clock-out time.
    pub fn clock_out(&mut self, employee_id: &str, notes: Option<&str>) -> AppResult<WorkSession> {
        let employee_id = require_id("employeeId", employee_id)?;
        let now = self.clock.now();

        let tx = self
            .pool
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let session = queries::find_active_work_session(&tx, employee_id)?.ok_or_else(|| {
            AppError::NotFound(format!(
                "No active work session for employee {}",
                employee_id
            ))
        })?;

        if let Some(br) = queries::find_active_break_session(&tx, session.id)? {
            return Err(AppError::Conflict(format!(
                "Employee {} is on break (break session {}); end the break before clocking out",
                employee_id, br.id
            )));
        }

        if let Some(idle) = queries::find_active_idle_session(&tx, session.id)? {
            let duration = idle.elapsed_at(now);
            queries::complete_idle_session(&tx, idle.id, now, duration)?;
            ttlog(
                &tx,
                "idle_end",
                employee_id,
                &format!(
                    "Idle {} closed at clock-out of work session {} after {}s",
                    idle.id, session.id, duration
                ),
            )?;
        }

        let total_work = session.net_work_seconds(now, session.total_break_time);
        let merged = merge_notes(session.notes.as_deref(), notes);

        let changed =
            queries::complete_work_session(&tx, session.id, now, total_work, merged.as_deref())?;
        if changed == 0 {
            return Err(AppError::NotFound(format!(
                "Work session {} is not active",
                session.id
            )));
        }

        ttlog(
            &tx,
            "clock_out",
            employee_id,
            &format!("Work session {} completed, worked {}s", session.id, total_work),
        )?;
        let closed = load_work_session(&tx, session.id)?;
        tx.commit()?;

        tracing::debug!(employee_id, work_session_id = session.id, total_work, "clocked out");
        Ok(closed)
    }

    pub fn get_active_work_session(&self, employee_id: &str) -> AppResult<Option<WorkSession>> {
        let employee_id = require_id("employeeId", employee_id)?;
        Ok(queries::find_active_work_session(&self.pool.conn, employee_id)?)
    }

    pub fn get_work_session(&self, id: i64) -> AppResult<WorkSession> {
        load_work_session(&self.pool.conn, id)
    }

    pub fn list_work_sessions(&self, employee_id: &str, limit: usize) -> AppResult<Vec<WorkSession>> {
        let employee_id = require_id("employeeId", employee_id)?;
        Ok(queries::list_work_sessions(&self.pool.conn, employee_id, limit)?)
    }

    /// Sessions whose clock-in falls on any day of `[from, to]`.
    pub fn work_sessions_between(
        &self,
        employee_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<Vec<WorkSession>> {
        let employee_id = require_id("employeeId", employee_id)?;
        if to < from {
            return Err(AppError::Validation(format!(
                "Invalid range: {} is after {}",
                from, to
            )));
        }
        let (start, _) = date::day_bounds(from, self.billing.utc_offset_minutes)?;
        let (_, end) = date::day_bounds(to, self.billing.utc_offset_minutes)?;
        Ok(queries::work_sessions_started_between(
            &self.pool.conn,
            employee_id,
            start,
            end,
        )?)
    }

    // -----------------------------------------------------------------
    // Breaks
    // -----------------------------------------------------------------

    pub fn start_break(&mut self, work_session_id: i64, notes: Option<&str>) -> AppResult<BreakSession> {
        let now = self.clock.now();
        let already_on_break = || format!("Work session {} already has an active break", work_session_id);

        let tx = self
            .pool
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let session = load_active_work_session(&tx, work_session_id)?;

        if queries::find_active_break_session(&tx, session.id)?.is_some() {
            return Err(AppError::Conflict(already_on_break()));
        }

        let id = queries::insert_break_session(&tx, session.id, now, clean_notes(notes))
            .map_err(|e| conflict_on_unique(e, already_on_break))?;

        ttlog(
            &tx,
            "break_start",
            &session.employee_id,
            &format!("Break {} started in work session {}", id, session.id),
        )?;
        let br = queries::find_break_session(&tx, id)?
            .ok_or_else(|| AppError::Other(format!("Break session {} vanished", id)))?;
        tx.commit()?;

        tracing::debug!(work_session_id, break_session_id = id, "break started");
        Ok(br)
    }

    /// Close the active break and add its duration to the owning work
    /// session's break total.
    pub fn end_break(&mut self, target: BreakRef, notes: Option<&str>) -> AppResult<BreakSession> {
        let now = self.clock.now();

        let tx = self
            .pool
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let br = match target {
            BreakRef::Break(id) => queries::find_break_session(&tx, id)?
                .filter(|b| b.status.is_active())
                .ok_or_else(|| AppError::NotFound(format!("No active break session {}", id)))?,
            BreakRef::WorkSession(ws) => queries::find_active_break_session(&tx, ws)?
                .ok_or_else(|| {
                    AppError::NotFound(format!("No active break for work session {}", ws))
                })?,
        };

        let duration = br.elapsed_at(now);
        let merged = merge_notes(br.notes.as_deref(), notes);

        if queries::complete_break_session(&tx, br.id, now, duration, merged.as_deref())? == 0 {
            return Err(AppError::NotFound(format!(
                "No active break session {}",
                br.id
            )));
        }
        if queries::add_break_time(&tx, br.work_session_id, duration, now)? == 0 {
            return Err(AppError::Conflict(format!(
                "Work session {} is no longer active",
                br.work_session_id
            )));
        }

        let owner = load_work_session(&tx, br.work_session_id)?;
        ttlog(
            &tx,
            "break_end",
            &owner.employee_id,
            &format!(
                "Break {} ended in work session {} after {}s",
                br.id, br.work_session_id, duration
            ),
        )?;
        let closed = queries::find_break_session(&tx, br.id)?
            .ok_or_else(|| AppError::Other(format!("Break session {} vanished", br.id)))?;
        tx.commit()?;

        tracing::debug!(break_session_id = br.id, duration, "break ended");
        Ok(closed)
    }

    pub fn get_active_break_session(&self, work_session_id: i64) -> AppResult<Option<BreakSession>> {
        Ok(queries::find_active_break_session(
            &self.pool.conn,
            work_session_id,
        )?)
    }

    pub fn list_break_sessions(&self, work_session_id: i64) -> AppResult<Vec<BreakSession>> {
        load_work_session(&self.pool.conn, work_session_id)?;
        Ok(queries::list_break_sessions(&self.pool.conn, work_session_id)?)
    }

    // -----------------------------------------------------------------
    // Idle detection
    // -----------------------------------------------------------------

    pub fn start_idle(&mut self, work_session_id: i64) -> AppResult<IdleSession> {
        let now = self.clock.now();
        let already_idle = || format!("Work session {} is already idle", work_session_id);

        let tx = self
            .pool
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let session = load_active_work_session(&tx, work_session_id)?;

        if queries::find_active_idle_session(&tx, session.id)?.is_some() {
            return Err(AppError::Conflict(already_idle()));
        }

        let id = queries::insert_idle_session(&tx, session.id, now)
            .map_err(|e| conflict_on_unique(e, already_idle))?;

        ttlog(
            &tx,
            "idle_start",
            &session.employee_id,
            &format!("Idle {} started in work session {}", id, session.id),
        )?;
        let idle = queries::find_idle_session(&tx, id)?
            .ok_or_else(|| AppError::Other(format!("Idle session {} vanished", id)))?;
        tx.commit()?;

        Ok(idle)
    }

    pub fn end_idle(&mut self, work_session_id: i64) -> AppResult<IdleSession> {
        let now = self.clock.now();

        let tx = self
            .pool
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let idle = queries::find_active_idle_session(&tx, work_session_id)?.ok_or_else(|| {
            AppError::NotFound(format!(
                "No active idle session for work session {}",
                work_session_id
            ))
        })?;

        let duration = idle.elapsed_at(now);
        if queries::complete_idle_session(&tx, idle.id, now, duration)? == 0 {
            return Err(AppError::NotFound(format!(
                "No active idle session {}",
                idle.id
            )));
        }

        let owner = load_work_session(&tx, work_session_id)?;
        ttlog(
            &tx,
            "idle_end",
            &owner.employee_id,
            &format!(
                "Idle {} ended in work session {} after {}s",
                idle.id, work_session_id, duration
            ),
        )?;
        let closed = queries::find_idle_session(&tx, idle.id)?
            .ok_or_else(|| AppError::Other(format!("Idle session {} vanished", idle.id)))?;
        tx.commit()?;

        Ok(closed)
    }

    pub fn get_active_idle_session(&self, work_session_id: i64) -> AppResult<Option<IdleSession>> {
        Ok(queries::find_active_idle_session(
            &self.pool.conn,
            work_session_id,
        )?)
    }

    pub fn list_idle_sessions(&self, work_session_id: i64) -> AppResult<Vec<IdleSession>> {
        load_work_session(&self.pool.conn, work_session_id)?;
        Ok(queries::list_idle_sessions(&self.pool.conn, work_session_id)?)
    }

    // -----------------------------------------------------------------
    // Activity log
    // -----------------------------------------------------------------

    pub fn log_application_activity(
        &mut self,
        work_session_id: i64,
        activity: &NewApplicationActivity,
    ) -> AppResult<ApplicationActivity> {
        activity.validate()?;
        let now = self.clock.now();

        let tx = self
            .pool
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        load_active_work_session(&tx, work_session_id)?;
        let id = queries::insert_application_activity(
            &tx,
            work_session_id,
            activity.application_name.trim(),
            clean_notes(activity.window_title.as_deref()),
            activity.duration,
            now,
        )?;

        let row = queries::find_application_activity(&tx, id)?
            .ok_or_else(|| AppError::Other(format!("Application activity {} vanished", id)))?;
        tx.commit()?;

        Ok(row)
    }

    pub fn log_website_activity(
        &mut self,
        work_session_id: i64,
        activity: &NewWebsiteActivity,
    ) -> AppResult<WebsiteActivity> {
        activity.validate()?;
        let now = self.clock.now();
        let domain = domain_of(&activity.url)
            .ok_or_else(|| AppError::Validation(format!("Invalid url '{}'", activity.url)))?;

        let tx = self
            .pool
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        load_active_work_session(&tx, work_session_id)?;
        let id = queries::insert_website_activity(
            &tx,
            work_session_id,
            activity.url.trim(),
            &domain,
            clean_notes(activity.title.as_deref()),
            activity.duration,
            now,
        )?;

        let row = queries::find_website_activity(&tx, id)?
            .ok_or_else(|| AppError::Other(format!("Website activity {} vanished", id)))?;
        tx.commit()?;

        Ok(row)
    }

    pub fn list_application_activity(&self, work_session_id: i64) -> AppResult<Vec<ApplicationActivity>> {
        load_work_session(&self.pool.conn, work_session_id)?;
        Ok(queries::list_application_activity(
            &self.pool.conn,
            work_session_id,
        )?)
    }

    pub fn list_website_activity(&self, work_session_id: i64) -> AppResult<Vec<WebsiteActivity>> {
        load_work_session(&self.pool.conn, work_session_id)?;
        Ok(queries::list_website_activity(
            &self.pool.conn,
            work_session_id,
        )?)
    }

    // -----------------------------------------------------------------
    // Read models
    // -----------------------------------------------------------------

    pub fn status(&self, employee_id: &str) -> AppResult<EmployeeStatus> {
        let employee_id = require_id("employeeId", employee_id)?;
        let now = self.clock.now();
        let conn = &self.pool.conn;

        let Some(session) = queries::find_active_work_session(conn, employee_id)? else {
            return Ok(EmployeeStatus {
                employee_id: employee_id.to_string(),
                state: EmployeeState::ClockedOut,
                idle: false,
                work_session: None,
                active_break: None,
                active_idle: None,
                worked_seconds: 0,
            });
        };

        let active_break = queries::find_active_break_session(conn, session.id)?;
        let active_idle = queries::find_active_idle_session(conn, session.id)?;
        let running = active_break.as_ref().map_or(0, |b| b.elapsed_at(now));

        Ok(EmployeeStatus {
            employee_id: employee_id.to_string(),
            state: if active_break.is_some() {
                EmployeeState::OnBreak
            } else {
                EmployeeState::ClockedIn
            },
            idle: active_idle.is_some(),
            worked_seconds: session.worked_seconds_at(now, running),
            work_session: Some(session),
            active_break,
            active_idle,
        })
    }

    fn snapshot(&self, session: WorkSession, now: DateTime<Utc>) -> AppResult<SessionSnapshot> {
        let conn = &self.pool.conn;
        let running_break = if session.is_active() {
            queries::find_active_break_session(conn, session.id)?
                .map_or(0, |b| b.elapsed_at(now))
        } else {
            0
        };
        let idle_seconds: i64 = queries::list_idle_sessions(conn, session.id)?
            .iter()
            .map(|i| i.elapsed_at(now))
            .sum();

        Ok(SessionSnapshot {
            session,
            running_break,
            idle_seconds,
        })
    }

    /// Totals for the sessions clocked in on `day`; the in-progress session
    /// is measured up to now.
    pub fn get_daily_summary(&self, employee_id: &str, day: NaiveDate) -> AppResult<DailySummary> {
        let employee_id = require_id("employeeId", employee_id)?;
        let now = self.clock.now();
        let (start, end) = date::day_bounds(day, self.billing.utc_offset_minutes)?;

        let sessions =
            queries::work_sessions_started_between(&self.pool.conn, employee_id, start, end)?;
        let mut snapshots = Vec::with_capacity(sessions.len());
        for s in sessions {
            snapshots.push(self.snapshot(s, now)?);
        }

        Ok(summary::build_daily_summary(employee_id, day, snapshots, now))
    }

    pub fn get_range_summary(
        &self,
        employee_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<RangeSummary> {
        let employee_id = require_id("employeeId", employee_id)?;
        if (to - from).num_days() >= MAX_SUMMARY_DAYS {
            return Err(AppError::Validation(format!(
                "Range {}..{} exceeds {} days",
                from, to, MAX_SUMMARY_DAYS
            )));
        }

        let mut days = Vec::new();
        for d in date::generate_range(from, to)? {
            days.push(self.get_daily_summary(employee_id, d)?);
        }

        Ok(summary::build_range_summary(
            employee_id,
            from,
            to,
            days,
            &self.billing,
        ))
    }

    /// Today's date at the configured offset.
    pub fn today(&self) -> AppResult<NaiveDate> {
        date::day_of(self.clock.now(), self.billing.utc_offset_minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::time::ManualClock;
    use chrono::{Duration, TimeZone};

    fn service_at(start: DateTime<Utc>) -> (TimeTrackingService, Arc<ManualClock>) {
        let pool = DbPool::open_in_memory().unwrap();
        init_db(&pool.conn).unwrap();
        let clock = Arc::new(ManualClock::new(start));
        let svc = TimeTrackingService::new(pool, clock.clone(), BillingSettings::default());
        (svc, clock)
    }

    fn nine_am() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 3, 9, 0, 0).unwrap()
    }

    #[test]
    fn clock_in_creates_active_session() {
        let (mut svc, _) = service_at(nine_am());
        let ws = svc
            .clock_in("emp-1", Some("morning"), Some("office"))
            .unwrap();

        assert!(ws.is_active());
        assert_eq!(ws.clock_in_time, nine_am());
        assert_eq!(ws.total_break_time, 0);
        assert_eq!(ws.notes.as_deref(), Some("morning"));
        assert_eq!(ws.location.as_deref(), Some("office"));
        assert_eq!(svc.get_active_work_session("emp-1").unwrap(), Some(ws));
    }

    #[test]
    fn second_clock_in_is_a_conflict() {
        let (mut svc, _) = service_at(nine_am());
        svc.clock_in("emp-1", None, None).unwrap();

        let err = svc.clock_in("emp-1", None, None).unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        // other employees are unaffected
        assert!(svc.clock_in("emp-2", None, None).is_ok());
    }

    #[test]
    fn blank_employee_id_is_a_validation_error() {
        let (mut svc, _) = service_at(nine_am());
        assert!(matches!(
            svc.clock_in("  ", None, None),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn clock_out_without_session_is_not_found() {
        let (mut svc, _) = service_at(nine_am());
        assert!(matches!(
            svc.clock_out("emp-1", None),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn clock_out_without_break_counts_full_span() {
        let (mut svc, clock) = service_at(nine_am());
        svc.clock_in("emp-1", None, None).unwrap();
        clock.advance(Duration::hours(8));

        let ws = svc.clock_out("emp-1", Some("done")).unwrap();
        assert!(!ws.is_active());
        assert_eq!(ws.clock_out_time, Some(nine_am() + Duration::hours(8)));
        assert_eq!(ws.total_work_time, 8 * 3600);
        assert_eq!(ws.notes.as_deref(), Some("done"));
        assert_eq!(svc.get_active_work_session("emp-1").unwrap(), None);
    }

    #[test]
    fn break_time_is_subtracted_from_work_time() {
        let (mut svc, clock) = service_at(nine_am());
        let ws = svc.clock_in("emp-1", None, None).unwrap();

        clock.advance(Duration::hours(3));
        svc.start_break(ws.id, Some("lunch")).unwrap();
        clock.advance(Duration::minutes(45));
        let br = svc.end_break(BreakRef::WorkSession(ws.id), None).unwrap();
        assert_eq!(br.duration, Some(45 * 60));
        assert_eq!(br.end_time, Some(nine_am() + Duration::minutes(225)));

        clock.advance(Duration::hours(4));
        let closed = svc.clock_out("emp-1", None).unwrap();

        let span = (closed.clock_out_time.unwrap() - closed.clock_in_time).num_seconds();
        assert_eq!(closed.total_break_time, 45 * 60);
        assert_eq!(closed.total_work_time, span - 45 * 60);
    }

    #[test]
    fn second_break_is_a_conflict_and_leaves_first_untouched() {
        let (mut svc, clock) = service_at(nine_am());
        let ws = svc.clock_in("emp-1", None, None).unwrap();
        let first = svc.start_break(ws.id, None).unwrap();

        clock.advance(Duration::minutes(5));
        assert!(matches!(
            svc.start_break(ws.id, None),
            Err(AppError::Conflict(_))
        ));

        assert_eq!(svc.get_active_break_session(ws.id).unwrap(), Some(first));
        assert_eq!(svc.list_break_sessions(ws.id).unwrap().len(), 1);
    }

    #[test]
    fn end_break_without_active_break_is_not_found() {
        let (mut svc, _) = service_at(nine_am());
        let ws = svc.clock_in("emp-1", None, None).unwrap();

        assert!(matches!(
            svc.end_break(BreakRef::WorkSession(ws.id), None),
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            svc.end_break(BreakRef::Break(99), None),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn end_break_by_break_id() {
        let (mut svc, clock) = service_at(nine_am());
        let ws = svc.clock_in("emp-1", None, None).unwrap();
        let br = svc.start_break(ws.id, Some("coffee")).unwrap();
        clock.advance(Duration::minutes(10));

        let closed = svc.end_break(BreakRef::Break(br.id), Some("back")).unwrap();
        assert_eq!(closed.duration, Some(600));
        assert_eq!(closed.notes.as_deref(), Some("coffee\nback"));
        assert!(!closed.status.is_active());

        // a closed break cannot be ended twice
        assert!(matches!(
            svc.end_break(BreakRef::Break(br.id), None),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn break_requires_active_work_session() {
        let (mut svc, _) = service_at(nine_am());
        assert!(matches!(
            svc.start_break(42, None),
            Err(AppError::NotFound(_))
        ));

        let ws = svc.clock_in("emp-1", None, None).unwrap();
        svc.clock_out("emp-1", None).unwrap();
        assert!(matches!(
            svc.start_break(ws.id, None),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn clock_out_during_break_is_rejected() {
        let (mut svc, _) = service_at(nine_am());
        let ws = svc.clock_in("emp-1", None, None).unwrap();
        svc.start_break(ws.id, None).unwrap();

        assert!(matches!(
            svc.clock_out("emp-1", None),
            Err(AppError::Conflict(_))
        ));
        assert!(svc.get_active_work_session("emp-1").unwrap().is_some());
    }

    #[test]
    fn idle_sessions_do_not_overlap_and_close_on_clock_out() {
        let (mut svc, clock) = service_at(nine_am());
        let ws = svc.clock_in("emp-1", None, None).unwrap();

        svc.start_idle(ws.id).unwrap();
        assert!(matches!(svc.start_idle(ws.id), Err(AppError::Conflict(_))));
        clock.advance(Duration::minutes(7));
        let idle = svc.end_idle(ws.id).unwrap();
        assert_eq!(idle.duration, Some(420));

        svc.start_idle(ws.id).unwrap();
        clock.advance(Duration::minutes(3));
        let closed = svc.clock_out("emp-1", None).unwrap();

        // idle time is not subtracted
        assert_eq!(closed.total_work_time, 10 * 60);
        let idles = svc.list_idle_sessions(ws.id).unwrap();
        assert_eq!(idles.len(), 2);
        assert!(idles.iter().all(|i| !i.status.is_active()));
        assert_eq!(idles[1].duration, Some(180));
    }

    #[test]
    fn end_idle_without_idle_is_not_found() {
        let (mut svc, _) = service_at(nine_am());
        let ws = svc.clock_in("emp-1", None, None).unwrap();
        assert!(matches!(svc.end_idle(ws.id), Err(AppError::NotFound(_))));
    }

    #[test]
    fn status_follows_the_state_machine() {
        let (mut svc, clock) = service_at(nine_am());
        assert_eq!(svc.status("emp-1").unwrap().state, EmployeeState::ClockedOut);

        let ws = svc.clock_in("emp-1", None, None).unwrap();
        clock.advance(Duration::hours(1));
        let st = svc.status("emp-1").unwrap();
        assert_eq!(st.state, EmployeeState::ClockedIn);
        assert_eq!(st.worked_seconds, 3600);

        svc.start_break(ws.id, None).unwrap();
        svc.start_idle(ws.id).unwrap();
        clock.advance(Duration::minutes(30));
        let st = svc.status("emp-1").unwrap();
        assert_eq!(st.state, EmployeeState::OnBreak);
        assert!(st.idle);
        assert_eq!(st.worked_seconds, 3600);
    }

    #[test]
    fn daily_summary_adds_completed_sessions() {
        let (mut svc, clock) = service_at(nine_am());

        svc.clock_in("emp-1", None, None).unwrap();
        clock.advance(Duration::hours(4));
        svc.clock_out("emp-1", None).unwrap();

        clock.advance(Duration::hours(1));
        svc.clock_in("emp-1", None, None).unwrap();
        clock.advance(Duration::hours(3));
        svc.clock_out("emp-1", None).unwrap();

        let day = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
        let summary = svc.get_daily_summary("emp-1", day).unwrap();
        assert_eq!(summary.session_count, 2);
        assert_eq!(summary.total_work_time, 7 * 3600);
        assert!(!summary.in_progress);

        let other_day = NaiveDate::from_ymd_opt(2025, 3, 4).unwrap();
        assert_eq!(
            svc.get_daily_summary("emp-1", other_day)
                .unwrap()
                .session_count,
            0
        );
    }

    #[test]
    fn daily_summary_includes_running_session_and_break() {
        let (mut svc, clock) = service_at(nine_am());
        let ws = svc.clock_in("emp-1", None, None).unwrap();
        clock.advance(Duration::hours(2));
        svc.start_break(ws.id, None).unwrap();
        clock.advance(Duration::minutes(20));

        let day = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
        let summary = svc.get_daily_summary("emp-1", day).unwrap();
        assert!(summary.in_progress);
        assert_eq!(summary.total_work_time, 2 * 3600);
        assert_eq!(summary.total_break_time, 20 * 60);
    }

    #[test]
    fn activity_requires_active_session() {
        let (mut svc, _) = service_at(nine_am());
        let ws = svc.clock_in("emp-1", None, None).unwrap();

        let app = svc
            .log_application_activity(
                ws.id,
                &NewApplicationActivity {
                    application_name: "editor".into(),
                    window_title: Some("main.rs".into()),
                    duration: 120,
                },
            )
            .unwrap();
        assert_eq!(app.application_name, "editor");

        let web = svc
            .log_website_activity(
                ws.id,
                &NewWebsiteActivity {
                    url: "https://www.docs.rs/chrono".into(),
                    title: None,
                    duration: 30,
                },
            )
            .unwrap();
        assert_eq!(web.domain, "docs.rs");

        svc.clock_out("emp-1", None).unwrap();
        let err = svc
            .log_application_activity(
                ws.id,
                &NewApplicationActivity {
                    application_name: "editor".into(),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        assert_eq!(svc.list_application_activity(ws.id).unwrap().len(), 1);
        assert_eq!(svc.list_website_activity(ws.id).unwrap().len(), 1);
    }

    #[test]
    fn transitions_are_audited() {
        let (mut svc, _) = service_at(nine_am());
        let ws = svc.clock_in("emp-1", None, None).unwrap();
        svc.start_break(ws.id, None).unwrap();
        svc.end_break(BreakRef::WorkSession(ws.id), None).unwrap();
        svc.clock_out("emp-1", None).unwrap();

        let ops: Vec<String> = crate::db::log::load_entries(svc.conn(), false)
            .unwrap()
            .into_iter()
            .map(|e| e.operation)
            .collect();
        assert_eq!(ops, ["clock_in", "break_start", "break_end", "clock_out"]);
    }

    #[test]
    fn range_summary_rejects_more_than_max_days() {
        let (svc, _) = service_at(nine_am());
        let from = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

        let last_ok = from + Duration::days(MAX_SUMMARY_DAYS - 1);
        let summary = svc.get_range_summary("emp-1", from, last_ok).unwrap();
        assert_eq!(summary.days.len() as i64, MAX_SUMMARY_DAYS);

        let too_far = from + Duration::days(MAX_SUMMARY_DAYS);
        assert!(matches!(
            svc.get_range_summary("emp-1", from, too_far),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn daily_summary_uses_configured_offset_for_day_attribution() {
        let late = Utc.with_ymd_and_hms(2025, 3, 3, 23, 30, 0).unwrap();
        let pool = DbPool::open_in_memory().unwrap();
        init_db(&pool.conn).unwrap();
        let clock = Arc::new(ManualClock::new(late));
        let billing = BillingSettings {
            utc_offset_minutes: 60,
            ..BillingSettings::default()
        };
        let mut svc = TimeTrackingService::new(pool, clock.clone(), billing);

        svc.clock_in("emp-1", None, None).unwrap();
        clock.advance(Duration::hours(1));
        svc.clock_out("emp-1", None).unwrap();

        let march_3 = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
        let march_4 = NaiveDate::from_ymd_opt(2025, 3, 4).unwrap();
        assert_eq!(svc.get_daily_summary("emp-1", march_3).unwrap().session_count, 0);

        let day = svc.get_daily_summary("emp-1", march_4).unwrap();
        assert_eq!(day.session_count, 1);
        assert_eq!(day.total_work_time, 3600);
    }

    #[test]
    fn clock_out_audits_the_idle_period_it_closes() {
        let (mut svc, clock) = service_at(nine_am());
        let ws = svc.clock_in("emp-1", None, None).unwrap();
        svc.start_idle(ws.id).unwrap();
        clock.advance(Duration::minutes(5));
        svc.clock_out("emp-1", None).unwrap();

        let ops: Vec<String> = crate::db::log::load_entries(svc.conn(), false)
            .unwrap()
            .into_iter()
            .map(|e| e.operation)
            .collect();
        assert_eq!(ops, ["clock_in", "idle_start", "idle_end", "clock_out"]);
    }
}
