use crate::db::migrate::applied_migrations;
use crate::db::pool::DbPool;
use crate::utils::colors::{CYAN, GREEN, GREY, RESET, YELLOW};
use rusqlite::{Connection, OptionalExtension};
use std::fs;

/// Row counts shown by `db --info`.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct DbCounts {
    pub employees: i64,
    pub work_sessions: i64,
    pub active_sessions: i64,
    pub break_sessions: i64,
    pub idle_sessions: i64,
    pub application_activity: i64,
    pub website_activity: i64,
}

fn count(conn: &Connection, sql: &str) -> rusqlite::Result<i64> {
    conn.query_row(sql, [], |row| row.get(0))
}

pub fn collect_counts(conn: &Connection) -> rusqlite::Result<DbCounts> {
    Ok(DbCounts {
        employees: count(conn, "SELECT COUNT(DISTINCT employee_id) FROM work_sessions")?,
        work_sessions: count(conn, "SELECT COUNT(*) FROM work_sessions")?,
        active_sessions: count(
            conn,
            "SELECT COUNT(*) FROM work_sessions WHERE status = 'active'",
        )?,
        break_sessions: count(conn, "SELECT COUNT(*) FROM break_sessions")?,
        idle_sessions: count(conn, "SELECT COUNT(*) FROM idle_sessions")?,
        application_activity: count(conn, "SELECT COUNT(*) FROM application_activity")?,
        website_activity: count(conn, "SELECT COUNT(*) FROM website_activity")?,
    })
}

pub fn print_db_info(pool: &mut DbPool, db_path: &str) -> rusqlite::Result<()> {
    println!();

    //
    // 1) FILE SIZE
    //
    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    let file_mb = (file_size as f64) / (1024.0 * 1024.0);

    println!("{}• File:{} {}{}{}", CYAN, RESET, YELLOW, db_path, RESET);
    println!("{}• Size:{} {:.2} MB", CYAN, RESET, file_mb);

    //
    // 2) COUNTS
    //
    let c = collect_counts(&pool.conn)?;
    for (label, value) in [
        ("Employees", c.employees),
        ("Work sessions", c.work_sessions),
        ("Active sessions", c.active_sessions),
        ("Break sessions", c.break_sessions),
        ("Idle sessions", c.idle_sessions),
        ("Application activity", c.application_activity),
        ("Website activity", c.website_activity),
    ] {
        println!("{}• {}:{} {}{}{}", CYAN, label, RESET, GREEN, value, RESET);
    }

    //
    // 3) DATE RANGE
    //
    let first: Option<String> = pool
        .conn
        .query_row("SELECT MIN(clock_in_time) FROM work_sessions", [], |row| {
            row.get(0)
        })
        .optional()?
        .flatten();
    let last: Option<String> = pool
        .conn
        .query_row("SELECT MAX(clock_in_time) FROM work_sessions", [], |row| {
            row.get(0)
        })
        .optional()?
        .flatten();

    let placeholder = format!("{GREY}--{RESET}");
    println!("{}• Clock-in range:{}", CYAN, RESET);
    println!("    from: {}", first.unwrap_or_else(|| placeholder.clone()));
    println!("    to:   {}", last.unwrap_or(placeholder));

    //
    // 4) SCHEMA
    //
    let migrations = applied_migrations(&pool.conn)?;
    println!("{}• Migrations applied:{} {}", CYAN, RESET, migrations.len());
    if let Some(latest) = migrations.last() {
        println!("    latest: {}", latest);
    }

    println!();
    Ok(())
}
