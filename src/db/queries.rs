//! Row mappers and CRUD statements for the session store.
//!
//! Every write that changes a session's status is conditional on the row
//! still being `active`; callers check the affected row count.

use crate::models::activity::{ApplicationActivity, WebsiteActivity};
use crate::models::break_session::BreakSession;
use crate::models::idle_session::IdleSession;
use crate::models::session_status::SessionStatus;
use crate::models::work_session::WorkSession;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

/// Canonical text form for timestamps. Fixed width, so string comparison in
/// SQL orders the same way as time.
pub fn ts(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse_ts(idx: usize, raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn get_ts(row: &Row, col: &str) -> Result<DateTime<Utc>> {
    let idx = row.as_ref().column_index(col)?;
    let raw: String = row.get(idx)?;
    parse_ts(idx, &raw)
}

fn get_opt_ts(row: &Row, col: &str) -> Result<Option<DateTime<Utc>>> {
    let idx = row.as_ref().column_index(col)?;
    let raw: Option<String> = row.get(idx)?;
    raw.map(|r| parse_ts(idx, &r)).transpose()
}

fn get_status(row: &Row) -> Result<SessionStatus> {
    let idx = row.as_ref().column_index("status")?;
    let raw: String = row.get(idx)?;
    SessionStatus::from_db_str(&raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Text,
            format!("Invalid session status: {}", raw).into(),
        )
    })
}

/// True when `err` comes from a UNIQUE constraint (the active-session indexes).
pub fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

fn collect<T>(rows: impl Iterator<Item = Result<T>>) -> Result<Vec<T>> {
    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

// ---------------------------------------------------------------------------
// Work sessions
// ---------------------------------------------------------------------------

pub fn map_work_session(row: &Row) -> Result<WorkSession> {
    Ok(WorkSession {
        id: row.get("id")?,
        employee_id: row.get("employee_id")?,
        clock_in_time: get_ts(row, "clock_in_time")?,
        clock_out_time: get_opt_ts(row, "clock_out_time")?,
        total_break_time: row.get("total_break_time")?,
        total_work_time: row.get("total_work_time")?,
        status: get_status(row)?,
        notes: row.get("notes")?,
        location: row.get("location")?,
    })
}

pub fn insert_work_session(
    conn: &Connection,
    employee_id: &str,
    clock_in: DateTime<Utc>,
    notes: Option<&str>,
    location: Option<&str>,
) -> Result<i64> {
    let now = ts(clock_in);
    conn.execute(
        "INSERT INTO work_sessions
            (employee_id, clock_in_time, total_break_time, total_work_time, status,
             notes, location, created_at, updated_at)
         VALUES (?1, ?2, 0, 0, 'active', ?3, ?4, ?2, ?2)",
        params![employee_id, now, notes, location],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn find_work_session(conn: &Connection, id: i64) -> Result<Option<WorkSession>> {
    conn.query_row(
        "SELECT * FROM work_sessions WHERE id = ?1",
        [id],
        map_work_session,
    )
    .optional()
}

pub fn find_active_work_session(conn: &Connection, employee_id: &str) -> Result<Option<WorkSession>> {
    conn.query_row(
        "SELECT * FROM work_sessions WHERE employee_id = ?1 AND status = 'active'",
        [employee_id],
        map_work_session,
    )
    .optional()
}

/// Close an active work session. Returns the number of rows changed (0 when
/// the session was no longer active).
pub fn complete_work_session(
    conn: &Connection,
    id: i64,
    clock_out: DateTime<Utc>,
    total_work_time: i64,
    notes: Option<&str>,
) -> Result<usize> {
    let now = ts(clock_out);
    conn.execute(
        "UPDATE work_sessions
         SET clock_out_time = ?1, total_work_time = ?2, notes = ?3,
             status = 'completed', updated_at = ?1
         WHERE id = ?4 AND status = 'active'",
        params![now, total_work_time, notes, id],
    )
}

pub fn add_break_time(conn: &Connection, work_session_id: i64, seconds: i64, at: DateTime<Utc>) -> Result<usize> {
    conn.execute(
        "UPDATE work_sessions
         SET total_break_time = total_break_time + ?1, updated_at = ?2
         WHERE id = ?3 AND status = 'active'",
        params![seconds, ts(at), work_session_id],
    )
}

/// Sessions of `employee_id` whose clock-in falls in `[from, to)`.
pub fn work_sessions_started_between(
    conn: &Connection,
    employee_id: &str,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> Result<Vec<WorkSession>> {
    let mut stmt = conn.prepare_cached(
        "SELECT * FROM work_sessions
         WHERE employee_id = ?1 AND clock_in_time >= ?2 AND clock_in_time < ?3
         ORDER BY clock_in_time ASC",
    )?;
    let rows = stmt.query_map(params![employee_id, ts(from), ts(to)], map_work_session)?;
    collect(rows)
}

/// Most recent sessions first.
pub fn list_work_sessions(conn: &Connection, employee_id: &str, limit: usize) -> Result<Vec<WorkSession>> {
    let mut stmt = conn.prepare_cached(
        "SELECT * FROM work_sessions
         WHERE employee_id = ?1
         ORDER BY clock_in_time DESC
         LIMIT ?2",
    )?;
    let rows = stmt.query_map(params![employee_id, limit as i64], map_work_session)?;
    collect(rows)
}

// ---------------------------------------------------------------------------
// Break sessions
// ---------------------------------------------------------------------------

pub fn map_break_session(row: &Row) -> Result<BreakSession> {
    Ok(BreakSession {
        id: row.get("id")?,
        work_session_id: row.get("work_session_id")?,
        start_time: get_ts(row, "start_time")?,
        end_time: get_opt_ts(row, "end_time")?,
        duration: row.get("duration")?,
        notes: row.get("notes")?,
        status: get_status(row)?,
    })
}

pub fn insert_break_session(
    conn: &Connection,
    work_session_id: i64,
    start: DateTime<Utc>,
    notes: Option<&str>,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO break_sessions (work_session_id, start_time, notes, status)
         VALUES (?1, ?2, ?3, 'active')",
        params![work_session_id, ts(start), notes],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn find_break_session(conn: &Connection, id: i64) -> Result<Option<BreakSession>> {
    conn.query_row(
        "SELECT * FROM break_sessions WHERE id = ?1",
        [id],
        map_break_session,
    )
    .optional()
}

pub fn find_active_break_session(conn: &Connection, work_session_id: i64) -> Result<Option<BreakSession>> {
    conn.query_row(
        "SELECT * FROM break_sessions WHERE work_session_id = ?1 AND status = 'active'",
        [work_session_id],
        map_break_session,
    )
    .optional()
}

pub fn complete_break_session(
    conn: &Connection,
    id: i64,
    end: DateTime<Utc>,
    duration: i64,
    notes: Option<&str>,
) -> Result<usize> {
    conn.execute(
        "UPDATE break_sessions
         SET end_time = ?1, duration = ?2, notes = ?3, status = 'completed'
         WHERE id = ?4 AND status = 'active'",
        params![ts(end), duration, notes, id],
    )
}

pub fn list_break_sessions(conn: &Connection, work_session_id: i64) -> Result<Vec<BreakSession>> {
    let mut stmt = conn.prepare_cached(
        "SELECT * FROM break_sessions WHERE work_session_id = ?1 ORDER BY start_time ASC",
    )?;
    let rows = stmt.query_map([work_session_id], map_break_session)?;
    collect(rows)
}

// ---------------------------------------------------------------------------
// Idle sessions
// ---------------------------------------------------------------------------

pub fn map_idle_session(row: &Row) -> Result<IdleSession> {
    Ok(IdleSession {
        id: row.get("id")?,
        work_session_id: row.get("work_session_id")?,
        start_time: get_ts(row, "start_time")?,
        end_time: get_opt_ts(row, "end_time")?,
        duration: row.get("duration")?,
        status: get_status(row)?,
    })
}

pub fn insert_idle_session(conn: &Connection, work_session_id: i64, start: DateTime<Utc>) -> Result<i64> {
    conn.execute(
        "INSERT INTO idle_sessions (work_session_id, start_time, status)
         VALUES (?1, ?2, 'active')",
        params![work_session_id, ts(start)],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn find_idle_session(conn: &Connection, id: i64) -> Result<Option<IdleSession>> {
    conn.query_row(
        "SELECT * FROM idle_sessions WHERE id = ?1",
        [id],
        map_idle_session,
    )
    .optional()
}

pub fn find_active_idle_session(conn: &Connection, work_session_id: i64) -> Result<Option<IdleSession>> {
    conn.query_row(
        "SELECT * FROM idle_sessions WHERE work_session_id = ?1 AND status = 'active'",
        [work_session_id],
        map_idle_session,
    )
    .optional()
}

pub fn complete_idle_session(conn: &Connection, id: i64, end: DateTime<Utc>, duration: i64) -> Result<usize> {
    conn.execute(
        "UPDATE idle_sessions
         SET end_time = ?1, duration = ?2, status = 'completed'
         WHERE id = ?3 AND status = 'active'",
        params![ts(end), duration, id],
    )
}

pub fn list_idle_sessions(conn: &Connection, work_session_id: i64) -> Result<Vec<IdleSession>> {
    let mut stmt = conn.prepare_cached(
        "SELECT * FROM idle_sessions WHERE work_session_id = ?1 ORDER BY start_time ASC",
    )?;
    let rows = stmt.query_map([work_session_id], map_idle_session)?;
    collect(rows)
}

// ---------------------------------------------------------------------------
// Activity (append-only)
// ---------------------------------------------------------------------------

pub fn map_application_activity(row: &Row) -> Result<ApplicationActivity> {
    Ok(ApplicationActivity {
        id: row.get("id")?,
        work_session_id: row.get("work_session_id")?,
        application_name: row.get("application_name")?,
        window_title: row.get("window_title")?,
        duration: row.get("duration")?,
        recorded_at: get_ts(row, "recorded_at")?,
    })
}

pub fn map_website_activity(row: &Row) -> Result<WebsiteActivity> {
    Ok(WebsiteActivity {
        id: row.get("id")?,
        work_session_id: row.get("work_session_id")?,
        url: row.get("url")?,
        domain: row.get("domain")?,
        title: row.get("title")?,
        duration: row.get("duration")?,
        recorded_at: get_ts(row, "recorded_at")?,
    })
}

pub fn insert_application_activity(
    conn: &Connection,
    work_session_id: i64,
    application_name: &str,
    window_title: Option<&str>,
    duration: i64,
    recorded_at: DateTime<Utc>,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO application_activity
            (work_session_id, application_name, window_title, duration, recorded_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![work_session_id, application_name, window_title, duration, ts(recorded_at)],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn insert_website_activity(
    conn: &Connection,
    work_session_id: i64,
    url: &str,
    domain: &str,
    title: Option<&str>,
    duration: i64,
    recorded_at: DateTime<Utc>,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO website_activity
            (work_session_id, url, domain, title, duration, recorded_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![work_session_id, url, domain, title, duration, ts(recorded_at)],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn find_application_activity(conn: &Connection, id: i64) -> Result<Option<ApplicationActivity>> {
    conn.query_row(
        "SELECT * FROM application_activity WHERE id = ?1",
        [id],
        map_application_activity,
    )
    .optional()
}

pub fn find_website_activity(conn: &Connection, id: i64) -> Result<Option<WebsiteActivity>> {
    conn.query_row(
        "SELECT * FROM website_activity WHERE id = ?1",
        [id],
        map_website_activity,
    )
    .optional()
}

pub fn list_application_activity(conn: &Connection, work_session_id: i64) -> Result<Vec<ApplicationActivity>> {
    let mut stmt = conn.prepare_cached(
        "SELECT * FROM application_activity WHERE work_session_id = ?1 ORDER BY recorded_at ASC, id ASC",
    )?;
    let rows = stmt.query_map([work_session_id], map_application_activity)?;
    collect(rows)
}

pub fn list_website_activity(conn: &Connection, work_session_id: i64) -> Result<Vec<WebsiteActivity>> {
    let mut stmt = conn.prepare_cached(
        "SELECT * FROM website_activity WHERE work_session_id = ?1 ORDER BY recorded_at ASC, id ASC",
    )?;
    let rows = stmt.query_map([work_session_id], map_website_activity)?;
    collect(rows)
}
