//! Audit trail of state transitions, stored in the `log` table.

use crate::errors::AppResult;
use chrono::Utc;
use rusqlite::{Connection, params};

#[derive(Debug, Clone)]
pub struct LogEntry {
    pub id: i64,
    pub date: String,
    pub operation: String,
    pub target: String,
    pub message: String,
}

/// Write an internal log line into the `log` table.
pub fn ttlog(conn: &Connection, operation: &str, target: &str, message: &str) -> AppResult<()> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO log (date, operation, target, message)
         VALUES (?1, ?2, ?3, ?4)",
    )?;

    stmt.execute(params![Utc::now().to_rfc3339(), operation, target, message])?;

    Ok(())
}

/// All log rows, oldest first. Migration markers are skipped unless
/// `include_migrations` is set.
pub fn load_entries(conn: &Connection, include_migrations: bool) -> AppResult<Vec<LogEntry>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, date, operation, IFNULL(target, ''), message
         FROM log
         WHERE ?1 OR operation <> 'migration_applied'
         ORDER BY id ASC",
    )?;

    let rows = stmt.query_map([include_migrations], |row| {
        Ok(LogEntry {
            id: row.get(0)?,
            date: row.get(1)?,
            operation: row.get(2)?,
            target: row.get(3)?,
            message: row.get(4)?,
        })
    })?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
